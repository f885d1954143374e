use std::fmt;
use std::future::Future;
use std::time::Duration;

use k8s_drain::Drainer;
use k8s_drain::PodDeleteList;
use k8s_drain::PodDeleteStatus;
use k8s_drain::PodSelectionError;
use k8s_drain_ext as k8s;
use k8s_drain_kubeapi::KubeApi;
use kube::ResourceExt as _;

use k8s::corev1;
use k8s::PodExt as _;

pub use config::DaemonSetRef;
pub use config::EvictorConfig;
pub use policy::DAEMONSET_ERROR;
pub use policy::DAEMONSET_WARNING;
pub use policy::LOCAL_STORAGE_ERROR;
pub use policy::LOCAL_STORAGE_WARNING;
pub use policy::UNMANAGED_ERROR;
pub use policy::UNMANAGED_WARNING;
pub use removal::Deletion;
pub use removal::Eviction;
pub use removal::GracePeriod;
pub use removal::Removal;
pub use removal::RemovePod;
pub use removal::DEFAULT_TERMINATION_GRACE_PERIOD;

mod config;
mod policy;
mod removal;

/// Decides which pods leave a node and removes them, by eviction when the
/// cluster serves it and by deletion otherwise.
#[derive(Debug)]
pub struct Evictor {
    kubeapi: KubeApi,
    config: EvictorConfig,
    removal: Option<Removal>,
}

impl Evictor {
    pub fn new(kubeapi: KubeApi, config: EvictorConfig) -> Self {
        Self {
            kubeapi,
            config,
            removal: None,
        }
    }

    pub fn config(&self) -> &EvictorConfig {
        &self.config
    }

    /// The strategy settled on by [`Drainer::can_use_evictions`], if it ran.
    pub fn removal(&self) -> Option<&Removal> {
        self.removal.as_ref()
    }

    async fn select_removal(&self) -> kube::Result<Removal> {
        let grace_period = self.config.grace_period();
        if self.config.disable_eviction {
            return Ok(Removal::Delete(Deletion::new(grace_period)));
        }

        let removal = match self.kubeapi.eviction_group_version().await? {
            Some(group_version) => {
                tracing::debug!(%group_version, "cluster serves pod evictions");
                Removal::Evict(Eviction::new(grace_period))
            }
            None => Removal::Delete(Deletion::new(grace_period)),
        };
        Ok(removal)
    }
}

impl Drainer for Evictor {
    async fn can_use_evictions(&mut self) -> kube::Result<()> {
        let removal = self.select_removal().await?;
        tracing::info!(strategy = %removal, "selected pod removal strategy");
        self.removal = Some(removal);
        Ok(())
    }

    async fn get_pods_for_deletion(&self, node: &str) -> (PodDeleteList, Vec<PodSelectionError>) {
        let pods = self.kubeapi.list_pods_on_node(node).await;
        match pods {
            Ok(pods) => {
                let list = self.config.pod_delete_list(pods);
                let errors = list.errors();
                (list, errors)
            }
            Err(err) => (PodDeleteList::default(), vec![PodSelectionError::List(err)]),
        }
    }

    async fn evict_or_delete_pod(&self, pod: &corev1::Pod) -> kube::Result<()> {
        match &self.removal {
            Some(removal) => removal.remove(&self.kubeapi, pod).await,
            None => {
                tracing::debug!("no removal strategy selected, deleting");
                let deletion = Deletion::new(self.config.grace_period());
                deletion.remove(&self.kubeapi, pod).await
            }
        }
    }
}
