use std::path::{Path, PathBuf};

use super::*;

/// `kind`, scoped to one named cluster.
#[derive(Clone, Debug)]
pub struct Kind {
    cluster_name: String,
    kubeconfig: PathBuf,
}

impl Kind {
    pub fn new(cluster_name: impl ToString, kubeconfig: impl Into<PathBuf>) -> Self {
        Self {
            cluster_name: cluster_name.to_string(),
            kubeconfig: kubeconfig.into(),
        }
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub async fn create_cluster(&self, config: &Path, node_image: &str) -> Result<(), ToolError> {
        self.create_command(config, node_image).run().await
    }

    pub async fn load_docker_image(&self, image: &str) -> Result<(), ToolError> {
        self.load_command(image).run().await
    }

    /// Blocking, so that it can run while a scope guard is dropped.
    pub fn delete_cluster(&self) -> Result<(), ToolError> {
        self.delete_command().run_blocking()
    }

    fn create_command(&self, config: &Path, node_image: &str) -> ToolCommand {
        let command = self
            .kind()
            .args(["create", "cluster", "--verbosity", "4", "--config"])
            .arg(config)
            .args(["--image", node_image]);
        self.named(command)
    }

    fn load_command(&self, image: &str) -> ToolCommand {
        let command = self.kind().args(["load", "docker-image", image]);
        self.named(command)
    }

    fn delete_command(&self) -> ToolCommand {
        let command = self.kind().args(["delete", "cluster"]);
        self.named(command)
    }

    fn kind(&self) -> ToolCommand {
        ToolCommand::new("kind").env("KUBECONFIG", &self.kubeconfig)
    }

    fn named(&self, command: ToolCommand) -> ToolCommand {
        command.args(["--name", self.cluster_name.as_str()])
    }
}
