use std::path::PathBuf;
use std::time::Duration;

use time::ext::NumericalStdDuration as _;

pub(crate) const DEFAULT_CLUSTER_NAME: &str = "proxy-init-cluster";
pub(crate) const DEFAULT_KIND_CONFIG: &str = "e2e/kind.yaml";
pub(crate) const DEFAULT_KUBECONFIG: &str = "e2e/.kubeconfig";
pub(crate) const DEFAULT_KIND_IMAGE: &str = "kindest/node:v1.16.15";
pub(crate) const DEFAULT_IMAGE_TAG: &str = "mantalabs/proxy-init:e2e";
pub(crate) const RBAC_MANIFEST: &str = "e2e/rbac.yaml";
pub(crate) const STATEFULSET_MANIFEST: &str = "e2e/statefulset-tests.yaml";
pub(crate) const PROXY_STATEFULSET: &str = "proxy";
pub(crate) const PROXY_POD: &str = "proxy-0";

/// Everything a single e2e run needs, fixed before the first tool is invoked.
#[derive(Clone, Debug)]
pub(crate) struct RunConfig {
    pub(crate) cluster_name: String,
    pub(crate) create_cluster: bool,
    pub(crate) delete_cluster: bool,
    pub(crate) docker_build: bool,
    pub(crate) kind_config: PathBuf,
    pub(crate) kind_image: String,
    pub(crate) kubeconfig: PathBuf,
    pub(crate) image: ImageBuild,
    /// Applied in order
    pub(crate) manifests: Vec<PathBuf>,
    pub(crate) target: ProxyTarget,
    pub(crate) poll: PollPolicy,
}

#[derive(Clone, Debug)]
pub(crate) struct ImageBuild {
    pub(crate) tag: String,
    pub(crate) context: PathBuf,
}

/// The objects whose state decides whether the proxy came up.
#[derive(Clone, Debug)]
pub(crate) struct ProxyTarget {
    pub(crate) statefulset: String,
    pub(crate) pod: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PollPolicy {
    pub(crate) timeout: Duration,
    pub(crate) interval: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            cluster_name: DEFAULT_CLUSTER_NAME.to_string(),
            create_cluster: true,
            delete_cluster: true,
            docker_build: true,
            kind_config: PathBuf::from(DEFAULT_KIND_CONFIG),
            kind_image: DEFAULT_KIND_IMAGE.to_string(),
            kubeconfig: PathBuf::from(DEFAULT_KUBECONFIG),
            image: ImageBuild::default(),
            manifests: vec![
                PathBuf::from(RBAC_MANIFEST),
                PathBuf::from(STATEFULSET_MANIFEST),
            ],
            target: ProxyTarget::default(),
            poll: PollPolicy::default(),
        }
    }
}

impl Default for ImageBuild {
    fn default() -> Self {
        Self {
            tag: DEFAULT_IMAGE_TAG.to_string(),
            context: PathBuf::from("."),
        }
    }
}

impl Default for ProxyTarget {
    fn default() -> Self {
        Self {
            statefulset: PROXY_STATEFULSET.to_string(),
            pod: PROXY_POD.to_string(),
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            timeout: 90.std_seconds(),
            interval: 5.std_seconds(),
        }
    }
}
