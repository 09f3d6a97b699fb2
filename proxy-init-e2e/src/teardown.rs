use crate::toolchain::Toolchain;

/// Deletes the kind cluster when dropped.
///
/// Dropping happens on success, on error and when the run future is
/// abandoned after Ctrl-C, so deletion runs exactly once in every case.
/// Deletion failures are logged and never replace the run's own outcome.
#[derive(Debug)]
pub(crate) struct ClusterTeardown<'a, T: Toolchain> {
    tools: &'a T,
    cluster_name: &'a str,
}

impl<'a, T: Toolchain> ClusterTeardown<'a, T> {
    pub(crate) fn new(tools: &'a T, cluster_name: &'a str) -> Self {
        Self {
            tools,
            cluster_name,
        }
    }
}

impl<T: Toolchain> Drop for ClusterTeardown<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = self.tools.delete_cluster() {
            tracing::error!(%err, cluster = self.cluster_name, "Failed to delete cluster");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::fake::FakeToolchain;

    use super::*;

    #[test]
    fn deletes_once_on_drop() {
        let tools = FakeToolchain::default();
        {
            let _teardown = ClusterTeardown::new(&tools, "proxy-init-cluster");
            assert!(tools.calls().is_empty());
        }
        assert_eq!(tools.calls(), ["delete cluster"]);
    }

    #[test]
    fn deletion_failure_is_swallowed() {
        let tools = FakeToolchain::default().fail("delete");
        drop(ClusterTeardown::new(&tools, "proxy-init-cluster"));
        assert_eq!(tools.count("delete cluster"), 1);
    }
}
