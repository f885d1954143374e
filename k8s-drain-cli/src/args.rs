use super::*;

/// Cordon every node of a nodegroup and evict its pods, or uncordon it with `--undo`.
#[derive(Debug, clap::Parser)]
#[command(name = "k8s-drain", version, about)]
pub(crate) struct Args {
    /// Name of the nodegroup
    #[arg(long)]
    pub(crate) nodegroup: String,

    /// Label selector for the nodegroup's nodes, overriding the eksctl label
    #[arg(long, conflicts_with = "managed")]
    pub(crate) selector: Option<String>,

    /// Select nodes by the EKS managed nodegroup label
    #[arg(long)]
    pub(crate) managed: bool,

    /// How long to wait for the whole nodegroup to drain
    #[arg(long, default_value = "20m", value_parser = parse_duration)]
    pub(crate) timeout: Duration,

    /// Upper bound on the grace period given to each pod
    #[arg(long, default_value = "10m", value_parser = parse_duration)]
    pub(crate) max_grace_period: Duration,

    /// Uncordon the nodegroup instead of draining it
    #[arg(long)]
    pub(crate) undo: bool,

    /// Give up on a single API request after this long
    #[arg(long, default_value = "30s", value_parser = parse_duration)]
    pub(crate) request_timeout: Duration,

    /// Delete pods directly even when the cluster serves evictions
    #[arg(long)]
    pub(crate) disable_eviction: bool,

    /// Refuse to drain nodes running pods without a controller
    #[arg(long)]
    pub(crate) no_force: bool,

    /// Refuse to drain nodes running pods with emptyDir volumes
    #[arg(long)]
    pub(crate) keep_local_data: bool,

    /// Refuse to drain nodes running pods of DaemonSets not ignored by default
    #[arg(long)]
    pub(crate) no_ignore_daemonsets: bool,
}

impl Args {
    pub(crate) fn nodegroup(&self) -> NodeGroup {
        match &self.selector {
            Some(selector) => NodeGroup::new(&self.nodegroup, selector),
            None if self.managed => NodeGroup::managed(&self.nodegroup),
            None => NodeGroup::eksctl(&self.nodegroup),
        }
    }

    pub(crate) fn drain_config(&self) -> DrainConfig {
        DrainConfig::new(self.timeout).undo(self.undo)
    }

    pub(crate) fn evictor_config(&self) -> EvictorConfig {
        EvictorConfig {
            force: !self.no_force,
            delete_local_data: !self.keep_local_data,
            ignore_all_daemonsets: !self.no_ignore_daemonsets,
            ..EvictorConfig::default()
        }
        .max_grace_period(self.max_grace_period)
        .disable_eviction(self.disable_eviction)
    }
}

/// Parses a Go-style duration such as `90s`, `20m` or `1h30m`.
pub(crate) fn parse_duration(text: &str) -> Result<Duration, String> {
    let nanos = go_parse_duration::parse_duration(text)
        .map_err(|err| format!("invalid duration {text:?}: {err:?}"))?;
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| format!("negative duration {text:?}"))
}
