use super::*;

/// Grace period the kubelet applies to pods that do not set one.
pub const DEFAULT_TERMINATION_GRACE_PERIOD: Duration = Duration::from_secs(30);

/// Grace period handed to the API server when removing a pod.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GracePeriod {
    max: Option<Duration>,
}

impl GracePeriod {
    pub fn new(max: Option<Duration>) -> Self {
        Self { max }
    }

    /// Without a cap the pod's own value is passed on (or nothing, leaving
    /// the choice to the server). With a cap, a pod that sets nothing gets
    /// [`DEFAULT_TERMINATION_GRACE_PERIOD`], and the result never exceeds it.
    pub fn seconds(&self, pod: &corev1::Pod) -> Option<u32> {
        let requested = pod
            .termination_grace_period_seconds()
            .and_then(|seconds| u64::try_from(seconds).ok());
        let Some(max) = self.max else {
            return requested.and_then(|seconds| u32::try_from(seconds).ok());
        };

        let seconds = requested
            .unwrap_or(DEFAULT_TERMINATION_GRACE_PERIOD.as_secs())
            .min(max.as_secs());
        u32::try_from(seconds).ok()
    }
}

/// One way of getting a pod off its node.
pub trait RemovePod {
    fn remove(
        &self,
        kubeapi: &KubeApi,
        pod: &corev1::Pod,
    ) -> impl Future<Output = kube::Result<()>> + Send;
}

/// Eviction through the policy API, honouring PodDisruptionBudgets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Eviction {
    grace_period: GracePeriod,
}

impl Eviction {
    pub fn new(grace_period: GracePeriod) -> Self {
        Self { grace_period }
    }
}

impl RemovePod for Eviction {
    async fn remove(&self, kubeapi: &KubeApi, pod: &corev1::Pod) -> kube::Result<()> {
        let namespace = pod.namespace().unwrap_or_default();
        let grace_period_seconds = self.grace_period.seconds(pod);
        tracing::debug!(pod = %pod.namespaced_name(), grace_period_seconds, "evicting pod");
        kubeapi
            .evict_pod(&namespace, &pod.name_any(), grace_period_seconds)
            .await
    }
}

/// Plain deletion, for clusters that do not serve evictions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deletion {
    grace_period: GracePeriod,
}

impl Deletion {
    pub fn new(grace_period: GracePeriod) -> Self {
        Self { grace_period }
    }
}

impl RemovePod for Deletion {
    async fn remove(&self, kubeapi: &KubeApi, pod: &corev1::Pod) -> kube::Result<()> {
        let namespace = pod.namespace().unwrap_or_default();
        let grace_period_seconds = self.grace_period.seconds(pod);
        tracing::debug!(pod = %pod.namespaced_name(), grace_period_seconds, "deleting pod");
        kubeapi
            .delete_pod(&namespace, &pod.name_any(), grace_period_seconds)
            .await
    }
}

/// The strategy settled on once per drain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Removal {
    Evict(Eviction),
    Delete(Deletion),
}

impl RemovePod for Removal {
    async fn remove(&self, kubeapi: &KubeApi, pod: &corev1::Pod) -> kube::Result<()> {
        match self {
            Self::Evict(eviction) => eviction.remove(kubeapi, pod).await,
            Self::Delete(deletion) => deletion.remove(kubeapi, pod).await,
        }
    }
}

impl fmt::Display for Removal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evict(_) => f.write_str("eviction"),
            Self::Delete(_) => f.write_str("deletion"),
        }
    }
}
