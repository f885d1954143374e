use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use k8s_drain_ext as k8s;
use kube::api;
use kube::ResourceExt as _;
use tokio::time;
use tokio::time::Instant;

use k8s::corev1;
use k8s::NodeExt as _;
use k8s::PodExt as _;

pub use cordon::toggle_cordon;
pub use cordon::CordonHelper;
pub use cordon::CordonOutcome;
pub use cordon::CordonReport;
pub use drained::DrainedSet;
pub use drainer::DrainConfig;
pub use drainer::NodeGroupDrainer;
pub use drainer::RETRY_DELAY;
pub use error::DrainError;
pub use error::NodeError;
pub use error::PodSelectionError;
pub use nodegroup::NodeGroup;
pub use nodegroup::EKS_NODEGROUP_LABEL;
pub use nodegroup::NODEGROUP_NAME_LABEL;
pub use traits::ClusterApi;
pub use traits::Drainer;
pub use traits::PodDelete;
pub use traits::PodDeleteList;
pub use traits::PodDeleteStatus;

mod cordon;
mod drained;
mod drainer;
mod error;
mod nodegroup;
mod traits;
