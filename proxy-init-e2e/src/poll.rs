use std::time::Duration;

use proxy_init_ext::{NotReady, PodExt as _, StatefulSetExt as _, appsv1, corev1};
use proxy_init_tools::ToolError;
use thiserror::Error;
use tokio::time::{self, Instant};

use crate::config::{PollPolicy, ProxyTarget};
use crate::toolchain::Toolchain;

/// Stand-in deadline for timeouts too large to add to the current instant.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

#[derive(Debug, Error)]
pub(crate) enum ProbeError {
    #[error(transparent)]
    NotReady(#[from] NotReady),

    #[error(transparent)]
    Tool(#[from] ToolError),
}

impl ProbeError {
    /// Failures the cluster can still recover from before the deadline.
    pub(crate) fn is_retryable(&self) -> bool {
        match self {
            Self::NotReady(_) => true,
            Self::Tool(err) => err.is_exit_failure(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PollState {
    Polling,
    Succeeded,
    TimedOut,
}

impl PollState {
    fn next(outcome: &Result<(), ProbeError>, now: Instant, deadline: Instant) -> Self {
        match outcome {
            Ok(()) => Self::Succeeded,
            Err(_) if now < deadline => Self::Polling,
            Err(_) => Self::TimedOut,
        }
    }
}

/// Poll until the proxy is ready, returning how long that took.
///
/// On timeout the statefulset and pod are described before the last failure
/// is returned.
pub(crate) async fn wait_until_ready<T: Toolchain>(
    tools: &T,
    target: &ProxyTarget,
    policy: PollPolicy,
) -> Result<Duration, ProbeError> {
    let started = Instant::now();
    let deadline = started
        .checked_add(policy.timeout)
        .unwrap_or_else(|| started + FAR_FUTURE);

    loop {
        let outcome = probe(tools, target).await;
        let state = PollState::next(&outcome, Instant::now(), deadline);
        let Err(err) = outcome else {
            return Ok(started.elapsed());
        };
        if !err.is_retryable() {
            return Err(err);
        }
        if state == PollState::TimedOut {
            tracing::warn!(%err, timeout = ?policy.timeout, "Timed out waiting for the proxy");
            dump_diagnostics(tools, target).await;
            return Err(err);
        }
        tracing::info!(%err, "Waiting {} seconds...", policy.interval.as_secs_f64());
        time::sleep(policy.interval).await;
    }
}

async fn probe<T: Toolchain>(tools: &T, target: &ProxyTarget) -> Result<(), ProbeError> {
    let statefulset = tools
        .get::<appsv1::StatefulSet>(&target.statefulset)
        .await?;
    statefulset.ensure_replicas_ready()?;

    let pod = tools.get::<corev1::Pod>(&target.pod).await?;
    pod.ensure_enodes_published()?;
    Ok(())
}

async fn dump_diagnostics<T: Toolchain>(tools: &T, target: &ProxyTarget) {
    if let Err(err) = tools
        .describe::<appsv1::StatefulSet>(&target.statefulset)
        .await
    {
        tracing::warn!(%err, "Failed to describe statefulset");
    }
    if let Err(err) = tools.describe::<corev1::Pod>(&target.pod).await {
        tracing::warn!(%err, "Failed to describe pod");
    }
}
