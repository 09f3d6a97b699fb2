use thiserror::Error;

/// The proxy has not converged yet.
///
/// Every variant is a state the cluster is expected to leave on its own, so
/// callers treat it as retryable.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NotReady {
    #[error("statefulset {name:?} has no status yet")]
    MissingStatus { name: String },

    #[error(
        "statefulset {name:?} has {} of {replicas} replicas ready",
        .ready.unwrap_or_default()
    )]
    Replicas {
        name: String,
        replicas: i32,
        ready: Option<i32>,
    },

    #[error("pod {name:?} is missing annotation {key}")]
    MissingAnnotation { name: String, key: &'static str },
}
