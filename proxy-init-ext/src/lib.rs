pub use k8s_openapi as openapi;
pub use k8s_openapi::api::apps::v1 as appsv1;
pub use k8s_openapi::api::core::v1 as corev1;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;

pub use annotations::{Enodes, ANNOTATION_DOMAIN, EXTERNAL_ENODE_KEY, INTERNAL_ENODE_KEY};
pub use readiness::NotReady;

use openapi::Resource;

mod annotations;
mod readiness;

pub trait ObjectMetaExt {
    fn new(name: impl ToString) -> Self;
    fn with_namespace(name: impl ToString, namespace: impl ToString) -> Self;
}

impl ObjectMetaExt for metav1::ObjectMeta {
    fn new(name: impl ToString) -> Self {
        let name = Some(name.to_string());
        Self { name, ..default() }
    }

    fn with_namespace(name: impl ToString, namespace: impl ToString) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            ..Self::new(name)
        }
    }
}

/// Readiness of the proxy workload.
///
/// `readyReplicas` is omitted by the API server while init containers are
/// still running, so an absent count never matches `replicas`.
pub trait StatefulSetExt {
    fn ensure_replicas_ready(&self) -> Result<(), NotReady>;
}

impl StatefulSetExt for appsv1::StatefulSet {
    fn ensure_replicas_ready(&self) -> Result<(), NotReady> {
        let name = object_name(&self.metadata);
        let Some(status) = &self.status else {
            return Err(NotReady::MissingStatus { name });
        };
        let replicas = status.replicas;
        let ready = status.ready_replicas;
        if ready == Some(replicas) {
            Ok(())
        } else {
            Err(NotReady::Replicas {
                name,
                replicas,
                ready,
            })
        }
    }
}

pub trait PodExt {
    fn ensure_enodes_published(&self) -> Result<(), NotReady>;
}

impl PodExt for corev1::Pod {
    fn ensure_enodes_published(&self) -> Result<(), NotReady> {
        let annotations = self.metadata.annotations.as_ref();
        for key in [EXTERNAL_ENODE_KEY, INTERNAL_ENODE_KEY] {
            if !annotations.is_some_and(|annotations| annotations.contains_key(key)) {
                return Err(NotReady::MissingAnnotation {
                    name: object_name(&self.metadata),
                    key,
                });
            }
        }
        Ok(())
    }
}

/// `<resource>/<name>` reference as accepted by `kubectl get` and `kubectl describe`.
pub fn resource_ref<K: Resource>(name: &str) -> String {
    format!("{}/{name}", K::URL_PATH_SEGMENT)
}

pub fn default<T: Default>() -> T {
    T::default()
}

fn object_name(metadata: &metav1::ObjectMeta) -> String {
    metadata.name.clone().unwrap_or_default()
}
