use super::*;

pub const DAEMONSET_WARNING: &str = "ignoring DaemonSet-managed Pods";
pub const DAEMONSET_ERROR: &str = "cannot delete DaemonSet-managed Pods";
pub const LOCAL_STORAGE_WARNING: &str = "deleting Pods with local storage";
pub const LOCAL_STORAGE_ERROR: &str = "cannot delete Pods with local storage";
pub const UNMANAGED_WARNING: &str = "deleting Pods not managed by ReplicationController, ReplicaSet, Job, DaemonSet or StatefulSet";
pub const UNMANAGED_ERROR: &str = "cannot delete Pods not managed by ReplicationController, ReplicaSet, Job, DaemonSet or StatefulSet";

const DAEMON_SET_KIND: &str = "DaemonSet";

impl EvictorConfig {
    /// Decides what happens to `pod` when its node is drained.
    ///
    /// Mirror pods are never touched and finished pods are always deleted.
    /// Otherwise the first rule that keeps the pod on the node decides, and
    /// a pod that every rule lets go is deleted with the first warning met.
    pub fn classify(&self, pod: &corev1::Pod) -> PodDeleteStatus {
        if pod.is_mirror() {
            return PodDeleteStatus::Skip;
        }
        if pod.is_finished() {
            return PodDeleteStatus::Delete;
        }

        let verdicts = [
            self.daemonset_filter(pod),
            self.local_storage_filter(pod),
            self.unreplicated_filter(pod),
        ];
        let mut warning = None;
        for verdict in verdicts {
            match verdict {
                PodDeleteStatus::Delete => {}
                PodDeleteStatus::DeleteWithWarning(message) => {
                    warning.get_or_insert(message);
                }
                keep => return keep,
            }
        }
        warning.map_or(PodDeleteStatus::Delete, PodDeleteStatus::DeleteWithWarning)
    }

    /// Classifies every pod, keeping the listing order.
    pub fn pod_delete_list(&self, pods: impl IntoIterator<Item = corev1::Pod>) -> PodDeleteList {
        let mut list = PodDeleteList::default();
        for pod in pods {
            let status = self.classify(&pod);
            list.push(pod, status);
        }
        list
    }

    fn daemonset_filter(&self, pod: &corev1::Pod) -> PodDeleteStatus {
        let Some(owner) = pod.controlled_by(DAEMON_SET_KIND) else {
            return PodDeleteStatus::Delete;
        };

        let namespace = pod.metadata.namespace.as_deref().unwrap_or_default();
        if self
            .ignore_daemonsets
            .iter()
            .any(|daemonset| daemonset.matches(namespace, &owner.name))
        {
            PodDeleteStatus::Skip
        } else if self.ignore_all_daemonsets {
            PodDeleteStatus::SkipWithWarning(DAEMONSET_WARNING.to_string())
        } else {
            PodDeleteStatus::Refuse(DAEMONSET_ERROR.to_string())
        }
    }

    fn local_storage_filter(&self, pod: &corev1::Pod) -> PodDeleteStatus {
        if !pod.has_local_storage() {
            PodDeleteStatus::Delete
        } else if self.delete_local_data {
            PodDeleteStatus::DeleteWithWarning(LOCAL_STORAGE_WARNING.to_string())
        } else {
            PodDeleteStatus::Refuse(LOCAL_STORAGE_ERROR.to_string())
        }
    }

    fn unreplicated_filter(&self, pod: &corev1::Pod) -> PodDeleteStatus {
        if pod.controller().is_some() {
            PodDeleteStatus::Delete
        } else if self.force {
            PodDeleteStatus::DeleteWithWarning(UNMANAGED_WARNING.to_string())
        } else {
            PodDeleteStatus::Refuse(UNMANAGED_ERROR.to_string())
        }
    }
}
