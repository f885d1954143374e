use std::time::Duration;

use clap::Parser as _;
use k8s_drain::DrainConfig;
use k8s_drain::NodeGroup;
use k8s_drain::NodeGroupDrainer;
use k8s_drain_evictor::Evictor;
use k8s_drain_evictor::EvictorConfig;
use k8s_drain_kubeapi::KubeApi;
use tracing_subscriber::EnvFilter;

use args::Args;

mod args;

const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let group = args.nodegroup();
    tracing::info!(
        group = group.name(),
        selector = group.selector(),
        undo = args.undo,
        "starting k8s-drain"
    );

    let kubeapi = KubeApi::with_request_timeout(args.request_timeout).await?;
    let evictor = Evictor::new(kubeapi.clone(), args.evictor_config());
    let mut drainer = NodeGroupDrainer::new(kubeapi, evictor, group, args.drain_config());

    if let Err(err) = drainer.drain().await {
        tracing::error!(group = drainer.group().name(), %err, "drain failed");
        return Err(err.into());
    }

    Ok(())
}
