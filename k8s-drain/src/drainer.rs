use super::*;

/// How long to wait after a node fails to drain before moving on.
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrainConfig {
    /// Overall budget for draining the whole nodegroup
    pub wait_timeout: Duration,
    /// Uncordon the nodegroup instead of draining it
    pub undo: bool,
}

impl DrainConfig {
    pub fn new(wait_timeout: Duration) -> Self {
        Self {
            wait_timeout,
            undo: false,
        }
    }

    pub fn undo(self, undo: bool) -> Self {
        Self { undo, ..self }
    }
}

/// Drains every node of a nodegroup, following the group as it changes.
///
/// Membership is re-listed on every iteration, so nodes added mid-drain
/// (e.g. by an autoscaler) are cordoned and drained in the same run, and
/// nodes that disappear are simply never visited again.
#[derive(Debug)]
pub struct NodeGroupDrainer<C, D> {
    cluster: C,
    drainer: D,
    group: NodeGroup,
    config: DrainConfig,
    cordon_report: Option<CordonReport>,
}

impl<C, D> NodeGroupDrainer<C, D>
where
    C: ClusterApi,
    D: Drainer,
{
    pub fn new(cluster: C, drainer: D, group: NodeGroup, config: DrainConfig) -> Self {
        Self {
            cluster,
            drainer,
            group,
            config,
            cordon_report: None,
        }
    }

    pub fn cluster(&self) -> &C {
        &self.cluster
    }

    pub fn drainer(&self) -> &D {
        &self.drainer
    }

    pub fn group(&self) -> &NodeGroup {
        &self.group
    }

    /// Outcome of the most recent cordon (or, with `undo`, uncordon) pass.
    pub fn cordon_report(&self) -> Option<&CordonReport> {
        self.cordon_report.as_ref()
    }

    /// Runs the drain (or, with `undo`, the uncordon) to completion.
    ///
    /// Returns the names of the drained nodes. Only an unusable eviction
    /// API, a failure to list the group or the overall timeout end the run
    /// early; node-level failures are logged and retried.
    ///
    /// The deadline is checked before each poll. A node pass already under
    /// way runs to completion, so a hung call is bounded by the client's
    /// request timeout rather than cancelled here.
    pub async fn drain(&mut self) -> Result<DrainedSet, DrainError> {
        self.drainer
            .can_use_evictions()
            .await
            .map_err(DrainError::Capability)?;

        let nodes = self.list_nodes().await?;
        if nodes.is_empty() {
            tracing::warn!(
                group = self.group.name(),
                selector = self.group.selector(),
                "no nodes found in nodegroup"
            );
            return Ok(DrainedSet::default());
        }

        if self.config.undo {
            self.toggle_cordon(false, &nodes).await;
            return Ok(DrainedSet::default());
        }

        let deadline = Instant::now() + self.config.wait_timeout;
        let mut drained = DrainedSet::default();
        loop {
            if Instant::now() >= deadline {
                return Err(self.timed_out(drained));
            }

            let nodes = self.list_nodes().await?;
            self.toggle_cordon(true, &nodes).await;

            let pending = drained.pending(&nodes);
            if pending.is_empty() {
                tracing::info!(group = self.group.name(), nodes = %drained, "drained all nodes");
                return Ok(drained);
            }

            tracing::debug!(already_drained = %drained, will_drain = ?pending, "polled nodegroup");

            for node in pending {
                let evicted = self.evict_pods(&node).await;
                match evicted {
                    Ok(count) => {
                        tracing::debug!(node, count, "pods to be evicted");
                        if count == 0 {
                            drained.insert(node);
                        }
                    }
                    Err(err) => {
                        tracing::warn!(
                            node,
                            %err,
                            retry_delay = ?RETRY_DELAY,
                            "pod eviction error, will retry after delay"
                        );
                        let retry_at = Instant::now() + RETRY_DELAY;
                        time::sleep_until(retry_at.min(deadline)).await;
                    }
                }
            }
        }
    }

    /// Cordons (`desired == true`) or uncordons every node in `nodes` and
    /// keeps the report for [`NodeGroupDrainer::cordon_report`].
    pub async fn toggle_cordon(&mut self, desired: bool, nodes: &[corev1::Node]) -> &CordonReport {
        let report = toggle_cordon(&self.cluster, desired, nodes).await;
        let failed = report.failed().collect::<Vec<_>>();
        if !failed.is_empty() {
            tracing::warn!(
                group = self.group.name(),
                nodes = ?failed,
                desired,
                "cordon state of some nodes could not be changed"
            );
        }
        self.cordon_report.insert(report)
    }

    /// One eviction pass over `node`.
    ///
    /// Returns the number of pods that had to be evicted when the pass
    /// started; zero means the node is drained. Pods are removed one at a
    /// time and the pass stops at the first failure, whose error carries the
    /// number of pods still left, the failing one included.
    pub async fn evict_pods(&self, node: &str) -> Result<usize, NodeError> {
        let (list, errors) = self.drainer.get_pods_for_deletion(node).await;
        if !errors.is_empty() {
            return Err(NodeError::PodSelection(errors));
        }

        let warnings = list.warnings();
        if !warnings.is_empty() {
            tracing::warn!(node, "{warnings}");
        }

        let pods = list.pods();
        let pending = pods.len();
        for (evicted, pod) in pods.into_iter().enumerate() {
            // TODO: back off when the API server answers 429 instead of failing the node
            self.drainer
                .evict_or_delete_pod(pod)
                .await
                .map_err(|source| NodeError::Eviction {
                    pod: pod.namespaced_name(),
                    pending: pending - evicted,
                    source,
                })?;
        }
        Ok(pending)
    }

    async fn list_nodes(&self) -> Result<Vec<corev1::Node>, DrainError> {
        self.cluster
            .list_group_members(&self.group)
            .await
            .map_err(|source| DrainError::Listing {
                group: self.group.name().to_string(),
                source,
            })
    }

    fn timed_out(&self, drained: DrainedSet) -> DrainError {
        DrainError::TimedOut {
            group: self.group.name().to_string(),
            timeout: self.config.wait_timeout,
            drained,
        }
    }
}
