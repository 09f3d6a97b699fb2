use std::fmt::Debug;
use std::path::Path;

use kube::api;
use kube::config;
use proxy_init_ext as k8s;
use thiserror::Error;

use k8s::ObjectMetaExt as _;
use k8s::corev1;
use k8s::metav1;
use k8s::Enodes;

#[derive(Debug, Error)]
pub enum KubeApiError {
    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] config::KubeconfigError),

    #[error("failed to load in-cluster config: {0}")]
    InCluster(#[from] config::InClusterError),

    #[error(transparent)]
    Kube(#[from] kube::Error),
}

pub struct KubeApi {
    patch_params: api::PatchParams,
    client: kube::Client,
}

impl KubeApi {
    /// Create a KubeApi from an explicit kubeconfig file, or from the pod's
    /// service account when `kubeconfig` is `None`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), proxy_init_kubeapi::KubeApiError> {
    /// let api = proxy_init_kubeapi::KubeApi::new(None).await?;
    /// // use `api`...
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(kubeconfig: Option<&Path>) -> Result<Self, KubeApiError> {
        let config = match kubeconfig {
            Some(path) => {
                let kubeconfig = config::Kubeconfig::read_from(path)?;
                let options = config::KubeConfigOptions::default();
                kube::Config::from_custom_kubeconfig(kubeconfig, &options).await?
            }
            None => kube::Config::incluster()?,
        };
        let client = kube::Client::try_from(config)?;
        Ok(Self::with_client(client))
    }

    /// Create a KubeApi backed by the provided Kubernetes client.
    pub fn with_client(client: kube::Client) -> Self {
        Self {
            patch_params: api::PatchParams::default(),
            client,
        }
    }

    /// Publish `enodes` as annotations on the given pod so that proxy
    /// informers can discover it.
    ///
    /// Uses a strategic merge patch, leaving every other annotation intact.
    pub async fn publish_enodes(
        &self,
        namespace: &str,
        pod: &str,
        enodes: &Enodes,
    ) -> kube::Result<corev1::Pod> {
        tracing::info!(namespace, pod, %enodes, "Publishing enodes");
        let patch = api::Patch::Strategic(enodes_patch(namespace, pod, enodes));
        self.pods(namespace)
            .patch(pod, self.patch_params(), &patch)
            .await
    }

    fn pods(&self, namespace: &str) -> api::Api<corev1::Pod> {
        api::Api::namespaced(self.client.clone(), namespace)
    }

    fn patch_params(&self) -> &api::PatchParams {
        &self.patch_params
    }
}

impl Debug for KubeApi {
    /// Formats the `KubeApi` for debugging while redacting the `client`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeApi")
            .field("patch_params", &self.patch_params)
            .field("client", &"<kube::Client>")
            .finish()
    }
}

/// Minimal pod naming the target and carrying only the enode annotations.
fn enodes_patch(namespace: &str, pod: &str, enodes: &Enodes) -> corev1::Pod {
    let metadata = metav1::ObjectMeta {
        annotations: Some(enodes.annotations()),
        ..metav1::ObjectMeta::with_namespace(pod, namespace)
    };
    corev1::Pod {
        metadata,
        ..k8s::default()
    }
}
