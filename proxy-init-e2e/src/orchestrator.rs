use std::path::PathBuf;
use std::time::Duration;

use proxy_init_tools::ToolError;
use thiserror::Error;

use crate::config::RunConfig;
use crate::poll::{self, ProbeError};
use crate::teardown::ClusterTeardown;
use crate::toolchain::Toolchain;

#[derive(Debug, Error)]
pub(crate) enum RunError {
    #[error("failed to create kind cluster: {0}")]
    CreateCluster(#[source] ToolError),

    #[error("failed to build proxy-init image: {0}")]
    BuildImage(#[source] ToolError),

    #[error("failed to load image into kind: {0}")]
    LoadImage(#[source] ToolError),

    #[error("failed to apply {}: {source}", manifest.display())]
    Apply {
        manifest: PathBuf,
        #[source]
        source: ToolError,
    },

    #[error("proxy did not become ready: {0}")]
    Readiness(#[from] ProbeError),

    #[error("interrupted")]
    Interrupted,
}

/// Drive one e2e run: cluster, image, manifests, then wait for the proxy.
///
/// The cluster is deleted when this returns, whatever the outcome, unless
/// `delete_cluster` is off.
pub(crate) async fn run<T: Toolchain>(config: &RunConfig, tools: &T) -> Result<Duration, RunError> {
    let _teardown = config
        .delete_cluster
        .then(|| ClusterTeardown::new(tools, &config.cluster_name));

    if config.create_cluster {
        tracing::info!(cluster = %config.cluster_name, image = %config.kind_image, "Creating cluster");
        tools
            .create_cluster(&config.kind_config, &config.kind_image)
            .await
            .map_err(RunError::CreateCluster)?;
    }

    if config.docker_build {
        tracing::info!(tag = %config.image.tag, "Building image");
        tools
            .build_image(&config.image)
            .await
            .map_err(RunError::BuildImage)?;
        tools
            .load_image(&config.image.tag)
            .await
            .map_err(RunError::LoadImage)?;
    }

    for manifest in &config.manifests {
        tracing::info!(manifest = %manifest.display(), "Applying");
        tools
            .apply(manifest)
            .await
            .map_err(|source| RunError::Apply {
                manifest: manifest.clone(),
                source,
            })?;
    }

    let elapsed = poll::wait_until_ready(tools, &config.target, config.poll).await?;
    tracing::info!("Success ({:.1} seconds)", elapsed.as_secs_f64());
    Ok(elapsed)
}

#[cfg(test)]
mod tests {
    use proxy_init_ext::NotReady;

    use crate::config::PollPolicy;
    use crate::fake::{self, FakeToolchain};

    use super::*;

    fn ready() -> FakeToolchain {
        FakeToolchain::default()
            .respond("statefulsets/proxy", [fake::statefulset(2, Some(2))])
            .respond("pods/proxy-0", [fake::published_pod()])
    }

    #[tokio::test(start_paused = true)]
    async fn full_cycle_in_order() {
        let tools = ready();
        let elapsed = run(&RunConfig::default(), &tools).await.unwrap();

        assert_eq!(elapsed, Duration::ZERO);
        assert_eq!(
            tools.calls(),
            [
                "create cluster",
                "build mantalabs/proxy-init:e2e",
                "load mantalabs/proxy-init:e2e",
                "apply e2e/rbac.yaml",
                "apply e2e/statefulset-tests.yaml",
                "get statefulsets/proxy",
                "get pods/proxy-0",
                "delete cluster",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn skipped_steps() {
        let tools = ready();
        let config = RunConfig {
            create_cluster: false,
            delete_cluster: false,
            docker_build: false,
            ..RunConfig::default()
        };
        run(&config, &tools).await.unwrap();

        assert_eq!(
            tools.calls(),
            [
                "apply e2e/rbac.yaml",
                "apply e2e/statefulset-tests.yaml",
                "get statefulsets/proxy",
                "get pods/proxy-0",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn create_failure_still_deletes() {
        let tools = ready().fail("create");
        let err = run(&RunConfig::default(), &tools).await.unwrap_err();

        assert!(matches!(err, RunError::CreateCluster(_)));
        assert_eq!(tools.calls(), ["create cluster", "delete cluster"]);
    }

    #[tokio::test(start_paused = true)]
    async fn apply_failure_names_manifest() {
        let tools = ready().fail("apply");
        let err = run(&RunConfig::default(), &tools).await.unwrap_err();

        let RunError::Apply { manifest, .. } = &err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(manifest, &PathBuf::from("e2e/rbac.yaml"));
        assert_eq!(tools.count("apply e2e/statefulset-tests.yaml"), 0);
        assert_eq!(tools.count("delete cluster"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_deletes_after_diagnostics() {
        let tools = FakeToolchain::default()
            .respond("statefulsets/proxy", [fake::statefulset(3, None)]);
        let config = RunConfig {
            poll: PollPolicy {
                timeout: Duration::from_secs(3),
                interval: Duration::from_secs(1),
            },
            ..RunConfig::default()
        };
        let err = run(&config, &tools).await.unwrap_err();

        assert!(matches!(
            err,
            RunError::Readiness(ProbeError::NotReady(NotReady::Replicas { .. }))
        ));
        let calls = tools.calls();
        assert_eq!(
            calls[calls.len() - 3..],
            [
                "describe statefulsets/proxy",
                "describe pods/proxy-0",
                "delete cluster"
            ]
        );
        assert_eq!(tools.count("delete cluster"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_run_deletes_cluster() {
        let tools = FakeToolchain::default()
            .respond("statefulsets/proxy", [fake::statefulset(3, None)]);
        let config = RunConfig::default();

        let outcome = tokio::time::timeout(Duration::from_secs(12), run(&config, &tools)).await;

        assert!(outcome.is_err());
        assert_eq!(tools.count("delete cluster"), 1);
        assert_eq!(tools.count("describe pods/proxy-0"), 0);
    }
}
