use std::io;
use std::path::{self, PathBuf};
use std::time::Duration;

use clap::Parser;

use crate::config::{self, ImageBuild, PollPolicy, ProxyTarget, RunConfig};

/// Run the proxy-init end-to-end test against a local kind cluster.
///
/// With no arguments a full create, test and delete cycle is run.
#[derive(Debug, Parser)]
#[command(name = "proxy-init-e2e", version, about)]
pub(crate) struct Args {
    /// kind cluster configuration
    #[arg(long, default_value = config::DEFAULT_KIND_CONFIG)]
    kind_config: PathBuf,

    /// kubeconfig written by kind and handed to kubectl
    #[arg(long, default_value = config::DEFAULT_KUBECONFIG)]
    kubeconfig: PathBuf,

    /// Node image for the kind cluster
    #[arg(long, default_value = config::DEFAULT_KIND_IMAGE)]
    kind_image: String,

    /// Delete the cluster when the run finishes [default]
    #[arg(long, overrides_with = "no_delete_cluster")]
    delete_cluster: bool,

    /// Keep the cluster around after the run
    #[arg(long, overrides_with = "delete_cluster")]
    no_delete_cluster: bool,

    /// Create the cluster before testing [default]
    #[arg(long, overrides_with = "no_create_cluster")]
    create_cluster: bool,

    /// Reuse an existing cluster
    #[arg(long, overrides_with = "create_cluster")]
    no_create_cluster: bool,

    #[arg(long, env = "KIND_CLUSTER_NAME", default_value = config::DEFAULT_CLUSTER_NAME)]
    cluster_name: String,

    /// Build the proxy-init image and load it into the cluster [default]
    #[arg(long, overrides_with = "no_docker_build")]
    docker_build: bool,

    /// Use the image already loaded into the cluster
    #[arg(long, overrides_with = "docker_build")]
    no_docker_build: bool,

    /// How long to wait for the proxy, in seconds or as a duration like 2m30s
    #[arg(long, default_value = "90", value_parser = parse_duration)]
    timeout: Duration,

    /// Pause between readiness checks
    #[arg(long, default_value = "5", value_parser = parse_interval)]
    poll_interval: Duration,

    #[arg(long, default_value = config::DEFAULT_IMAGE_TAG)]
    image_tag: String,

    #[arg(long, default_value = ".")]
    build_context: PathBuf,

    /// Manifest to apply, may be repeated
    #[arg(
        long = "manifest",
        default_values = [config::RBAC_MANIFEST, config::STATEFULSET_MANIFEST]
    )]
    manifests: Vec<PathBuf>,

    #[arg(long, default_value = config::PROXY_STATEFULSET)]
    statefulset: String,

    #[arg(long, default_value = config::PROXY_POD)]
    pod: String,
}

impl Args {
    pub(crate) fn into_config(self) -> io::Result<RunConfig> {
        Ok(RunConfig {
            cluster_name: self.cluster_name,
            create_cluster: enabled(self.create_cluster, self.no_create_cluster),
            delete_cluster: enabled(self.delete_cluster, self.no_delete_cluster),
            docker_build: enabled(self.docker_build, self.no_docker_build),
            kind_config: self.kind_config,
            kind_image: self.kind_image,
            kubeconfig: path::absolute(self.kubeconfig)?,
            image: ImageBuild {
                tag: self.image_tag,
                context: self.build_context,
            },
            manifests: self.manifests,
            target: ProxyTarget {
                statefulset: self.statefulset,
                pod: self.pod,
            },
            poll: PollPolicy {
                timeout: self.timeout,
                interval: self.poll_interval,
            },
        })
    }
}

/// Paired `--x` / `--no-x` flags override each other, so at most one is set.
fn enabled(on: bool, off: bool) -> bool {
    on || !off
}

/// Seconds (fractions allowed) or a Go style duration string.
fn parse_duration(text: &str) -> Result<Duration, String> {
    if let Ok(secs) = text.parse::<f64>() {
        return Duration::try_from_secs_f64(secs)
            .map_err(|err| format!("invalid duration {text:?}: {err}"));
    }
    let nanos = go_parse_duration::parse_duration(text)
        .map_err(|err| format!("invalid duration {text:?}: {err:?}"))?;
    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| format!("invalid duration {text:?}: must not be negative"))
}

/// Like [`parse_duration`], but the loop must actually pause between polls.
fn parse_interval(text: &str) -> Result<Duration, String> {
    let interval = parse_duration(text)?;
    if interval.is_zero() {
        return Err(format!("invalid interval {text:?}: must be greater than zero"));
    }
    Ok(interval)
}
