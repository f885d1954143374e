use super::*;

/// Marks one node (un)schedulable with the smallest possible write.
#[derive(Debug)]
pub struct CordonHelper<'a> {
    node: &'a corev1::Node,
    desired: bool,
}

impl<'a> CordonHelper<'a> {
    pub fn new(node: &'a corev1::Node, desired: bool) -> Self {
        Self { node, desired }
    }

    pub fn is_update_required(&self) -> bool {
        self.node.is_unschedulable() != self.desired
    }

    /// Patches `spec.unschedulable`, falling back to replacing the whole node
    /// when the patch is rejected. Errors from either path end up in the outcome.
    pub async fn patch_or_replace<C: ClusterApi>(&self, api: &C) -> CordonOutcome {
        let name = self.node.name_any();
        let patched = api.patch_node_cordon(&name, self.desired).await;
        let patch_error = match patched {
            Ok(()) => return CordonOutcome::Patched,
            Err(err) => err,
        };

        let node = self.node.clone().unschedulable(self.desired);
        let replaced = api.replace_node(&node).await;
        match replaced {
            Ok(()) => CordonOutcome::Replaced { patch_error },
            Err(error) => CordonOutcome::Failed { patch_error, error },
        }
    }
}

/// What happened to a single node during a cordon pass.
///
/// Failures are diagnostics, not errors: a node that cannot be cordoned
/// still gets its pods evicted.
#[derive(Debug)]
pub enum CordonOutcome {
    Unchanged,
    Patched,
    Replaced {
        patch_error: kube::Error,
    },
    Failed {
        patch_error: kube::Error,
        error: kube::Error,
    },
}

impl CordonOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Patched | Self::Replaced { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Per-node outcomes of one cordon pass, keyed by node name.
#[derive(Debug, Default)]
pub struct CordonReport {
    desired: bool,
    outcomes: BTreeMap<String, CordonOutcome>,
}

impl CordonReport {
    fn new(desired: bool) -> Self {
        Self {
            desired,
            outcomes: BTreeMap::new(),
        }
    }

    pub fn desired(&self) -> bool {
        self.desired
    }

    pub fn outcome(&self, node: &str) -> Option<&CordonOutcome> {
        self.outcomes.get(node)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn changed(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_changed())
            .map(|(node, _)| node.as_str())
    }

    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_failed())
            .map(|(node, _)| node.as_str())
    }

    /// Every error met during the pass, including patch errors that the
    /// replace fallback recovered from.
    pub fn diagnostics(&self) -> impl Iterator<Item = (&str, &kube::Error)> {
        self.outcomes
            .iter()
            .flat_map(|(node, outcome)| match outcome {
                CordonOutcome::Unchanged | CordonOutcome::Patched => vec![],
                CordonOutcome::Replaced { patch_error } => vec![patch_error],
                CordonOutcome::Failed { patch_error, error } => vec![patch_error, error],
            }
            .into_iter()
            .map(move |err| (node.as_str(), err)))
    }
}

/// Brings every node in `nodes` to the `desired` cordon state.
///
/// Nodes already in that state cost no API call. Never fails.
pub async fn toggle_cordon<C: ClusterApi>(
    api: &C,
    desired: bool,
    nodes: &[corev1::Node],
) -> CordonReport {
    let action = cordon_status(desired);
    let mut report = CordonReport::new(desired);
    for node in nodes {
        let name = node.name_any();
        let helper = CordonHelper::new(node, desired);
        let outcome = if helper.is_update_required() {
            let outcome = helper.patch_or_replace(api).await;
            match &outcome {
                CordonOutcome::Patched => tracing::info!(node = name.as_str(), "{action} node"),
                CordonOutcome::Replaced { patch_error } => {
                    tracing::warn!(node = name.as_str(), %patch_error, "patch rejected, node replaced");
                    tracing::info!(node = name.as_str(), "{action} node");
                }
                CordonOutcome::Failed { patch_error, error } => {
                    tracing::warn!(node = name.as_str(), %patch_error, "patch rejected");
                    tracing::error!(node = name.as_str(), %error, "failed to {action} node");
                }
                CordonOutcome::Unchanged => {}
            }
            outcome
        } else {
            tracing::debug!(node = name.as_str(), "no need to {action} node");
            CordonOutcome::Unchanged
        };
        report.outcomes.insert(name, outcome);
    }
    report
}

fn cordon_status(desired: bool) -> &'static str {
    if desired {
        "cordon"
    } else {
        "uncordon"
    }
}
