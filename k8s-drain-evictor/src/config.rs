use super::*;

const KUBE_SYSTEM: &str = "kube-system";

/// A DaemonSet whose pods are left on the node without a warning.
///
/// Without a namespace the reference matches the name in any namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaemonSetRef {
    pub namespace: Option<String>,
    pub name: String,
}

impl DaemonSetRef {
    pub fn new(name: impl ToString) -> Self {
        Self {
            namespace: None,
            name: name.to_string(),
        }
    }

    pub fn namespaced(namespace: impl ToString, name: impl ToString) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            ..Self::new(name)
        }
    }

    pub fn matches(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref().is_none_or(|ns| ns == namespace)
    }
}

impl fmt::Display for DaemonSetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{namespace}/{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvictorConfig {
    /// Delete pods no controller would recreate
    pub force: bool,
    /// Delete pods using `emptyDir` volumes
    pub delete_local_data: bool,
    /// Leave every DaemonSet-managed pod in place, with a warning
    pub ignore_all_daemonsets: bool,
    /// DaemonSets whose pods are left in place silently
    pub ignore_daemonsets: Vec<DaemonSetRef>,
    /// Upper bound on the grace period given to each pod
    pub max_grace_period: Option<Duration>,
    /// Always delete, even when the cluster serves evictions
    pub disable_eviction: bool,
}

impl Default for EvictorConfig {
    fn default() -> Self {
        let ignore_daemonsets = vec![
            DaemonSetRef::namespaced(KUBE_SYSTEM, "aws-node"),
            DaemonSetRef::namespaced(KUBE_SYSTEM, "kube-proxy"),
            DaemonSetRef::new("node-exporter"),
            DaemonSetRef::new("prom-node-exporter"),
            DaemonSetRef::new("weave-scope"),
            DaemonSetRef::new("weave-scope-agent"),
            DaemonSetRef::new("weave-net"),
        ];
        Self {
            force: true,
            delete_local_data: true,
            ignore_all_daemonsets: true,
            ignore_daemonsets,
            max_grace_period: None,
            disable_eviction: false,
        }
    }
}

impl EvictorConfig {
    pub fn max_grace_period(self, max_grace_period: Duration) -> Self {
        Self {
            max_grace_period: Some(max_grace_period),
            ..self
        }
    }

    pub fn disable_eviction(self, disable_eviction: bool) -> Self {
        Self {
            disable_eviction,
            ..self
        }
    }

    pub fn grace_period(&self) -> GracePeriod {
        GracePeriod::new(self.max_grace_period)
    }
}
