use std::path::Path;

use k8s_openapi::Resource;
use proxy_init_tools::{Docker, Kind, Kubectl, ToolError};
use serde::de::DeserializeOwned;

use crate::config::{ImageBuild, RunConfig};

/// The external collaborators of an e2e run.
///
/// Cluster deletion is synchronous because it runs from a drop guard.
pub(crate) trait Toolchain {
    async fn create_cluster(&self, config: &Path, node_image: &str) -> Result<(), ToolError>;

    async fn build_image(&self, image: &ImageBuild) -> Result<(), ToolError>;

    async fn load_image(&self, tag: &str) -> Result<(), ToolError>;

    async fn apply(&self, manifest: &Path) -> Result<(), ToolError>;

    async fn get<K>(&self, name: &str) -> Result<K, ToolError>
    where
        K: Resource + DeserializeOwned;

    async fn describe<K: Resource>(&self, name: &str) -> Result<(), ToolError>;

    fn delete_cluster(&self) -> Result<(), ToolError>;
}

/// `kind`, `docker` and `kubectl` sharing one kubeconfig.
#[derive(Debug)]
pub(crate) struct Toolset {
    kind: Kind,
    docker: Docker,
    kubectl: Kubectl,
}

impl Toolset {
    pub(crate) fn new(config: &RunConfig) -> Self {
        Self {
            kind: Kind::new(&config.cluster_name, &config.kubeconfig),
            docker: Docker,
            kubectl: Kubectl::new(&config.kubeconfig),
        }
    }
}

impl Toolchain for Toolset {
    async fn create_cluster(&self, config: &Path, node_image: &str) -> Result<(), ToolError> {
        self.kind.create_cluster(config, node_image).await
    }

    async fn build_image(&self, image: &ImageBuild) -> Result<(), ToolError> {
        self.docker.build(&image.tag, &image.context).await
    }

    async fn load_image(&self, tag: &str) -> Result<(), ToolError> {
        self.kind.load_docker_image(tag).await
    }

    async fn apply(&self, manifest: &Path) -> Result<(), ToolError> {
        self.kubectl.apply(manifest).await
    }

    async fn get<K>(&self, name: &str) -> Result<K, ToolError>
    where
        K: Resource + DeserializeOwned,
    {
        self.kubectl.get(name).await
    }

    async fn describe<K: Resource>(&self, name: &str) -> Result<(), ToolError> {
        self.kubectl.describe::<K>(name).await
    }

    fn delete_cluster(&self) -> Result<(), ToolError> {
        tracing::info!(cluster = self.kind.cluster_name(), "Deleting cluster");
        self.kind.delete_cluster()
    }
}
