use std::fmt::Debug;
use std::time::Duration;

use k8s_drain::ClusterApi;
use k8s_drain::NodeGroup;
use k8s_drain_ext as k8s;
use k8s_openapi::serde_json::json;
use kube::api;
use kube::ResourceExt as _;

use k8s::corev1;
use k8s::metav1;

/// API group serving the Eviction subresource.
pub const POLICY_API_GROUP: &str = "policy";

const EVICTION_SUBRESOURCE: &str = "pods/eviction";
const EVICTION_KIND: &str = "Eviction";

#[derive(Clone)]
pub struct KubeApi {
    patch_params: api::PatchParams,
    post_params: api::PostParams,
    client: kube::Client,
}

impl KubeApi {
    /// Create a KubeApi configured with a default Kubernetes client.
    ///
    /// The client is inferred from the environment: `KUBECONFIG` or
    /// `~/.kube/config`, falling back to the in-cluster service account.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), kube::Error> {
    /// let api = k8s_drain_kubeapi::KubeApi::new().await?;
    /// // use `api`...
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new() -> kube::Result<Self> {
        kube::Client::try_default().await.map(Self::with_client)
    }

    /// Create a KubeApi whose requests give up after `timeout` without a response.
    ///
    /// Bounding every call keeps a single hung request from holding a drain
    /// past its deadline.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), kube::Error> {
    /// let timeout = std::time::Duration::from_secs(30);
    /// let api = k8s_drain_kubeapi::KubeApi::with_request_timeout(timeout).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_request_timeout(timeout: Duration) -> kube::Result<Self> {
        let mut config = kube::Config::infer()
            .await
            .map_err(kube::Error::InferConfig)?;
        config.read_timeout = Some(timeout);
        kube::Client::try_from(config).map(Self::with_client)
    }

    /// Create a KubeApi backed by the provided Kubernetes client.
    pub fn with_client(client: kube::Client) -> Self {
        Self {
            patch_params: api::PatchParams::default(),
            post_params: api::PostParams::default(),
            client,
        }
    }

    /// Lists the Pods scheduled onto `node`, across all namespaces.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example() -> kube::Result<()> {
    /// let api = k8s_drain_kubeapi::KubeApi::new().await?;
    /// let pods = api.list_pods_on_node("ip-192-168-10-20.ec2.internal").await?;
    /// println!("{} pods on the node", pods.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_pods_on_node(&self, node: &str) -> kube::Result<Vec<corev1::Pod>> {
        let lp = api::ListParams::default().fields(&format!("spec.nodeName={node}"));
        let pods = self.all_pods().list(&lp).await?;
        Ok(pods.items)
    }

    /// Requests a policy-respecting eviction of a Pod.
    ///
    /// An eviction blocked by a PodDisruptionBudget comes back as an error
    /// (HTTP 429); a Pod that is already gone counts as evicted.
    pub async fn evict_pod(
        &self,
        namespace: &str,
        name: &str,
        grace_period_seconds: Option<u32>,
    ) -> kube::Result<()> {
        let ep = api::EvictParams {
            delete_options: Some(delete_params(grace_period_seconds)),
            post_options: self.post_params.clone(),
        };
        let result = self.pods(namespace).evict(name, &ep).await;
        ignore_not_found(result, namespace, name)
    }

    /// Deletes a Pod directly, bypassing disruption budgets.
    ///
    /// Used when the cluster does not serve the eviction subresource. A Pod
    /// that is already gone counts as deleted.
    pub async fn delete_pod(
        &self,
        namespace: &str,
        name: &str,
        grace_period_seconds: Option<u32>,
    ) -> kube::Result<()> {
        let dp = delete_params(grace_period_seconds);
        let result = self.pods(namespace).delete(name, &dp).await;
        ignore_not_found(result, namespace, name)
    }

    /// Discovers whether the cluster serves Pod evictions.
    ///
    /// # Returns
    ///
    /// The preferred group-version of the policy API (e.g. `policy/v1`) when
    /// the `policy` group is served and the core API lists the
    /// `pods/eviction` subresource, `None` when either is missing. Fails only
    /// when discovery itself fails.
    pub async fn eviction_group_version(&self) -> kube::Result<Option<String>> {
        let groups = self.client.list_api_groups().await?;
        let Some(group_version) = policy_group_version(&groups) else {
            tracing::debug!("policy API group not served");
            return Ok(None);
        };

        let resources = self.client.list_core_api_resources("v1").await?;
        if serves_eviction(&resources) {
            Ok(Some(group_version))
        } else {
            tracing::debug!(%group_version, "{EVICTION_SUBRESOURCE} not served");
            Ok(None)
        }
    }

    fn nodes(&self) -> api::Api<corev1::Node> {
        api::Api::all(self.client.clone())
    }

    fn all_pods(&self) -> api::Api<corev1::Pod> {
        api::Api::all(self.client.clone())
    }

    fn pods(&self, namespace: &str) -> api::Api<corev1::Pod> {
        api::Api::namespaced(self.client.clone(), namespace)
    }
}

impl ClusterApi for KubeApi {
    async fn list_group_members(&self, group: &NodeGroup) -> kube::Result<Vec<corev1::Node>> {
        let lp = group.list_params();
        let nodes = self.nodes().list(&lp).await?;
        Ok(nodes.items)
    }

    async fn patch_node_cordon(&self, node: &str, desired: bool) -> kube::Result<()> {
        let patch = cordon_patch(desired);
        self.nodes()
            .patch(node, &self.patch_params, &api::Patch::Merge(&patch))
            .await?;
        Ok(())
    }

    async fn replace_node(&self, node: &corev1::Node) -> kube::Result<()> {
        self.nodes()
            .replace(&node.name_any(), &self.post_params, node)
            .await?;
        Ok(())
    }
}

impl Debug for KubeApi {
    /// Formats the `KubeApi` for debugging, redacting the `client`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeApi")
            .field("patch_params", &self.patch_params)
            .field("post_params", &self.post_params)
            .field("client", &"<kube::Client>")
            .finish()
    }
}

/// JSON merge patch touching nothing but `spec.unschedulable`.
pub fn cordon_patch(desired: bool) -> k8s_openapi::serde_json::Value {
    json!({
        "spec": {
            "unschedulable": desired
        }
    })
}

/// Preferred group-version of the `policy` API group, if served.
pub fn policy_group_version(groups: &metav1::APIGroupList) -> Option<String> {
    let group = groups
        .groups
        .iter()
        .find(|group| group.name == POLICY_API_GROUP)?;
    group
        .preferred_version
        .as_ref()
        .or_else(|| group.versions.first())
        .map(|version| version.group_version.clone())
}

/// Whether the core API resource list includes the Eviction subresource.
pub fn serves_eviction(resources: &metav1::APIResourceList) -> bool {
    resources
        .resources
        .iter()
        .any(|resource| resource.name == EVICTION_SUBRESOURCE && resource.kind == EVICTION_KIND)
}

fn delete_params(grace_period_seconds: Option<u32>) -> api::DeleteParams {
    api::DeleteParams {
        grace_period_seconds,
        ..k8s::default()
    }
}

fn ignore_not_found<T>(result: kube::Result<T>, namespace: &str, name: &str) -> kube::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(kube::Error::Api(status)) if status.code == 404 => {
            tracing::debug!(namespace, name, "pod already gone");
            Ok(())
        }
        Err(err) => Err(err),
    }
}
