use super::*;

/// Hard failures of a drain run; everything else is retried.
#[derive(Debug, thiserror::Error)]
pub enum DrainError {
    #[error("checking if cluster implements policy API: {0}")]
    Capability(#[source] kube::Error),

    #[error("listing nodes of nodegroup {group:?}: {source}")]
    Listing { group: String, source: kube::Error },

    #[error("timed out (after {timeout:?}) waiting for nodegroup {group:?} to be drained")]
    TimedOut {
        group: String,
        timeout: Duration,
        drained: DrainedSet,
    },
}

/// A node-level failure. The node stays pending and is retried on the next poll.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("selecting pods for deletion: {}", join(.0))]
    PodSelection(Vec<PodSelectionError>),

    #[error("evicting pod {pod} ({pending} pods pending): {source}")]
    Eviction {
        pod: String,
        pending: usize,
        source: kube::Error,
    },
}

impl NodeError {
    /// Pods still on the node when the error happened, as far as is known.
    pub fn pending(&self) -> usize {
        match self {
            Self::PodSelection(_) => 0,
            Self::Eviction { pending, .. } => *pending,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PodSelectionError {
    #[error("listing pods: {0}")]
    List(#[source] kube::Error),

    #[error("{reason}: {}", .pods.join(", "))]
    Refused { reason: String, pods: Vec<String> },
}

fn join(errors: &[PodSelectionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
