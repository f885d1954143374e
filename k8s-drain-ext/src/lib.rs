pub use k8s_openapi::api::core::v1 as corev1;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;

/// Annotation the kubelet puts on static (mirror) pods.
pub const MIRROR_POD_ANNOTATION: &str = "kubernetes.io/config.mirror";

const POD_SUCCEEDED: &str = "Succeeded";
const POD_FAILED: &str = "Failed";

pub trait NodeExt {
    fn new(name: impl ToString) -> Self;
    fn is_unschedulable(&self) -> bool;
    fn unschedulable(self, unschedulable: bool) -> Self;
}

impl NodeExt for corev1::Node {
    fn new(name: impl ToString) -> Self {
        let metadata = metav1::ObjectMeta::new(name);
        Self {
            metadata,
            ..default()
        }
    }

    /// A node without a spec, or with the flag unset, is schedulable.
    fn is_unschedulable(&self) -> bool {
        self.spec
            .as_ref()
            .and_then(|spec| spec.unschedulable)
            .unwrap_or_default()
    }

    fn unschedulable(mut self, unschedulable: bool) -> Self {
        self.spec.get_or_insert_with(default).unschedulable = Some(unschedulable);
        self
    }
}

pub trait PodExt {
    /// `namespace/name`, the form used in drain warnings and errors.
    fn namespaced_name(&self) -> String;
    fn is_mirror(&self) -> bool;
    fn is_finished(&self) -> bool;
    fn controller(&self) -> Option<&metav1::OwnerReference>;
    /// The controller owner, if it is of `kind`.
    fn controlled_by(&self, kind: &str) -> Option<&metav1::OwnerReference>;
    fn has_local_storage(&self) -> bool;
    fn termination_grace_period_seconds(&self) -> Option<i64>;
}

impl PodExt for corev1::Pod {
    fn namespaced_name(&self) -> String {
        let namespace = self.metadata.namespace.as_deref().unwrap_or_default();
        let name = self.metadata.name.as_deref().unwrap_or_default();
        format!("{namespace}/{name}")
    }

    fn is_mirror(&self) -> bool {
        self.metadata
            .annotations
            .as_ref()
            .is_some_and(|annotations| annotations.contains_key(MIRROR_POD_ANNOTATION))
    }

    fn is_finished(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|status| status.phase.as_deref())
            .is_some_and(|phase| phase == POD_SUCCEEDED || phase == POD_FAILED)
    }

    fn controller(&self) -> Option<&metav1::OwnerReference> {
        self.metadata
            .owner_references
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|owner| owner.controller.unwrap_or_default())
    }

    fn controlled_by(&self, kind: &str) -> Option<&metav1::OwnerReference> {
        self.controller().filter(|owner| owner.kind == kind)
    }

    fn has_local_storage(&self) -> bool {
        self.spec
            .as_ref()
            .and_then(|spec| spec.volumes.as_deref())
            .unwrap_or_default()
            .iter()
            .any(|volume| volume.empty_dir.is_some())
    }

    fn termination_grace_period_seconds(&self) -> Option<i64> {
        self.spec
            .as_ref()
            .and_then(|spec| spec.termination_grace_period_seconds)
    }
}

pub trait ObjectMetaExt {
    fn new(name: impl ToString) -> Self;
    fn with_namespace(name: impl ToString, namespace: impl ToString) -> Self;
}

impl ObjectMetaExt for metav1::ObjectMeta {
    fn new(name: impl ToString) -> Self {
        let name = Some(name.to_string());
        Self { name, ..default() }
    }

    fn with_namespace(name: impl ToString, namespace: impl ToString) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            ..Self::new(name)
        }
    }
}

pub fn default<T: Default>() -> T {
    T::default()
}

#[cfg(test)]
mod tests;
