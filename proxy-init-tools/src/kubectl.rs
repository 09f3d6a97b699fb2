use std::path::{Path, PathBuf};

use k8s_openapi::Resource;
use proxy_init_ext::resource_ref;
use serde::de::DeserializeOwned;

use super::*;

/// `kubectl` bound to one kubeconfig.
#[derive(Clone, Debug)]
pub struct Kubectl {
    kubeconfig: PathBuf,
}

impl Kubectl {
    pub fn new(kubeconfig: impl Into<PathBuf>) -> Self {
        let kubeconfig = kubeconfig.into();
        Self { kubeconfig }
    }

    pub async fn apply(&self, manifest: &Path) -> Result<(), ToolError> {
        self.apply_command(manifest).run().await
    }

    /// Fetch a single object and decode it into its typed representation.
    pub async fn get<K>(&self, name: &str) -> Result<K, ToolError>
    where
        K: Resource + DeserializeOwned,
    {
        self.get_command::<K>(name).json().await
    }

    /// Print `kubectl describe` for an object to the terminal.
    pub async fn describe<K: Resource>(&self, name: &str) -> Result<(), ToolError> {
        self.describe_command::<K>(name).run().await
    }

    fn apply_command(&self, manifest: &Path) -> ToolCommand {
        self.kubectl().args(["apply", "-f"]).arg(manifest)
    }

    fn describe_command<K: Resource>(&self, name: &str) -> ToolCommand {
        self.kubectl()
            .args(["describe", resource_ref::<K>(name).as_str()])
    }

    fn get_command<K: Resource>(&self, name: &str) -> ToolCommand {
        self.kubectl()
            .args(["get", resource_ref::<K>(name).as_str(), "-o", "json"])
    }

    fn kubectl(&self) -> ToolCommand {
        ToolCommand::new("kubectl").env("KUBECONFIG", &self.kubeconfig)
    }
}
