use super::*;

/// The part of the Kubernetes API the drainer needs for nodes.
pub trait ClusterApi {
    /// Lists the current members of `group`. Never cached by the caller.
    fn list_group_members(
        &self,
        group: &NodeGroup,
    ) -> impl Future<Output = kube::Result<Vec<corev1::Node>>> + Send;

    /// Partial update of just `spec.unschedulable`.
    fn patch_node_cordon(
        &self,
        node: &str,
        desired: bool,
    ) -> impl Future<Output = kube::Result<()>> + Send;

    /// Full read-modify-write fallback for when the patch is rejected.
    fn replace_node(&self, node: &corev1::Node) -> impl Future<Output = kube::Result<()>> + Send;
}

/// Pod eviction policy: decides which pods leave a node and removes them.
pub trait Drainer {
    /// Checks whether the cluster serves the eviction API and settles on the
    /// removal strategy used by every later [`Drainer::evict_or_delete_pod`].
    fn can_use_evictions(&mut self) -> impl Future<Output = kube::Result<()>> + Send;

    fn get_pods_for_deletion(
        &self,
        node: &str,
    ) -> impl Future<Output = (PodDeleteList, Vec<PodSelectionError>)> + Send;

    fn evict_or_delete_pod(&self, pod: &corev1::Pod)
        -> impl Future<Output = kube::Result<()>> + Send;
}

/// The eviction policy's verdict on one pod.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PodDeleteStatus {
    Delete,
    DeleteWithWarning(String),
    Skip,
    SkipWithWarning(String),
    /// Left on the node and reported as an error
    Refuse(String),
}

impl PodDeleteStatus {
    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete | Self::DeleteWithWarning(_))
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            Self::DeleteWithWarning(message) | Self::SkipWithWarning(message) => Some(message),
            Self::Delete | Self::Skip | Self::Refuse(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PodDelete {
    pub pod: corev1::Pod,
    pub status: PodDeleteStatus,
}

/// The pods found on a node, each with the verdict of the eviction policy.
#[derive(Clone, Debug, Default)]
pub struct PodDeleteList {
    items: Vec<PodDelete>,
}

impl PodDeleteList {
    pub fn push(&mut self, pod: corev1::Pod, status: PodDeleteStatus) {
        self.items.push(PodDelete { pod, status });
    }

    pub fn items(&self) -> &[PodDelete] {
        &self.items
    }

    /// Pods to remove, in listing order.
    pub fn pods(&self) -> Vec<&corev1::Pod> {
        self.items
            .iter()
            .filter(|item| item.status.is_delete())
            .map(|item| &item.pod)
            .collect()
    }

    /// All warnings grouped by message, `"<message>: ns/a, ns/b"` joined with `"; "`.
    pub fn warnings(&self) -> String {
        let warnings = self.group_by_message(PodDeleteStatus::warning);
        warnings
            .into_iter()
            .map(|(message, pods)| format!("{message}: {}", pods.join(", ")))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// One error per refusal message.
    pub fn errors(&self) -> Vec<PodSelectionError> {
        let refusals = self.group_by_message(|status| match status {
            PodDeleteStatus::Refuse(message) => Some(message.as_str()),
            _ => None,
        });
        refusals
            .into_iter()
            .map(|(reason, pods)| PodSelectionError::Refused {
                reason: reason.to_string(),
                pods,
            })
            .collect()
    }

    fn group_by_message<'a>(
        &'a self,
        message: impl Fn(&'a PodDeleteStatus) -> Option<&'a str>,
    ) -> BTreeMap<&'a str, Vec<String>> {
        let mut grouped = BTreeMap::<&str, Vec<String>>::new();
        for item in &self.items {
            if let Some(message) = message(&item.status) {
                grouped
                    .entry(message)
                    .or_default()
                    .push(item.pod.namespaced_name());
            }
        }
        grouped
    }
}
