use std::path::PathBuf;

use clap::Parser;

/// Generate a throw-away proxy node key, import it into a geth keystore and
/// publish the proxy's enode URLs as annotations on its own pod.
#[derive(Debug, Parser)]
#[command(name = "proxy-init", version, about)]
pub(crate) struct Args {
    /// kubeconfig to use instead of the in-cluster service account
    #[arg(long)]
    pub(crate) kubeconfig: Option<PathBuf>,

    /// Where to write the generated node key
    #[arg(long)]
    pub(crate) private_key: PathBuf,

    /// Where to write the imported account address
    #[arg(long)]
    pub(crate) account_address: PathBuf,

    /// Namespace of the pod to annotate
    #[arg(long, default_value = "default")]
    pub(crate) pod_namespace: String,

    /// Name of the pod to annotate
    #[arg(long)]
    pub(crate) pod_name: String,

    /// Internal proxy address, host:port
    #[arg(long)]
    pub(crate) internal_address: String,

    /// External proxy address, host:port
    #[arg(long)]
    pub(crate) external_address: String,

    /// Memory backed directory for the keystore and its password
    #[arg(long, default_value = "/dev/shm")]
    pub(crate) secrets_dir: PathBuf,
}
