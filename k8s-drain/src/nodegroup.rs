use constcat::concat;

use super::*;

const EKSCTL_LABEL_PREFIX: &str = "alpha.eksctl.io/";

/// Label eksctl puts on every node of an unmanaged nodegroup.
pub const NODEGROUP_NAME_LABEL: &str = concat!(EKSCTL_LABEL_PREFIX, "nodegroup-name");

/// Label EKS puts on every node of a managed nodegroup.
pub const EKS_NODEGROUP_LABEL: &str = "eks.amazonaws.com/nodegroup";

/// A set of cluster nodes identified by a label selector.
///
/// The drainer never caches the members: every poll re-lists the nodes
/// matching `selector`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeGroup {
    name: String,
    selector: String,
}

impl NodeGroup {
    pub fn new(name: impl ToString, selector: impl ToString) -> Self {
        let name = name.to_string();
        let selector = selector.to_string();
        Self { name, selector }
    }

    pub fn eksctl(name: impl ToString) -> Self {
        let name = name.to_string();
        let selector = format!("{NODEGROUP_NAME_LABEL}={name}");
        Self { name, selector }
    }

    pub fn managed(name: impl ToString) -> Self {
        let name = name.to_string();
        let selector = format!("{EKS_NODEGROUP_LABEL}={name}");
        Self { name, selector }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn list_params(&self) -> api::ListParams {
        api::ListParams::default().labels(&self.selector)
    }
}

impl fmt::Display for NodeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
