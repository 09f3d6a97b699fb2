//! Recording stand-in for `kind`, `docker` and `kubectl`.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::os::unix::process::ExitStatusExt as _;
use std::path::Path;
use std::process::ExitStatus;

use k8s_openapi::Resource;
use proxy_init_ext::{EXTERNAL_ENODE_KEY, INTERNAL_ENODE_KEY, resource_ref};
use proxy_init_tools::ToolError;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::config::ImageBuild;
use crate::toolchain::Toolchain;

#[derive(Clone, Debug)]
pub(crate) enum Response {
    Json(Value),
    Exit(i32),
    Garbage,
}

/// Scripted `get` responses keyed by `<resource>/<name>`.
///
/// Responses are consumed in order and the last one repeats forever; a
/// resource without responses fails like a missing object. Operations named
/// in `fail` exit with status 1.
#[derive(Debug, Default)]
pub(crate) struct FakeToolchain {
    calls: RefCell<Vec<String>>,
    responses: RefCell<HashMap<String, VecDeque<Response>>>,
    failing: HashSet<&'static str>,
}

impl FakeToolchain {
    pub(crate) fn respond(
        self,
        resource: &str,
        responses: impl IntoIterator<Item = Response>,
    ) -> Self {
        self.responses
            .borrow_mut()
            .insert(resource.to_string(), responses.into_iter().collect());
        self
    }

    pub(crate) fn fail(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    fn record(&self, operation: &'static str, subject: impl AsRef<str>) -> Result<(), ToolError> {
        let call = format!("{operation} {}", subject.as_ref());
        self.calls.borrow_mut().push(call.clone());
        if self.failing.contains(operation) {
            Err(exit_failure(&call, 1))
        } else {
            Ok(())
        }
    }

    fn next_response(&self, resource: &str) -> Response {
        let mut responses = self.responses.borrow_mut();
        match responses.get_mut(resource) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Response::Exit(1)),
            Some(queue) => queue.front().cloned().unwrap_or(Response::Exit(1)),
            None => Response::Exit(1),
        }
    }
}

impl Toolchain for FakeToolchain {
    async fn create_cluster(&self, _config: &Path, _node_image: &str) -> Result<(), ToolError> {
        self.record("create", "cluster")
    }

    async fn build_image(&self, image: &ImageBuild) -> Result<(), ToolError> {
        self.record("build", &image.tag)
    }

    async fn load_image(&self, tag: &str) -> Result<(), ToolError> {
        self.record("load", tag)
    }

    async fn apply(&self, manifest: &Path) -> Result<(), ToolError> {
        self.record("apply", manifest.to_string_lossy())
    }

    async fn get<K>(&self, name: &str) -> Result<K, ToolError>
    where
        K: Resource + DeserializeOwned,
    {
        let resource = resource_ref::<K>(name);
        self.record("get", &resource)?;
        let command = format!("kubectl get {resource} -o json");
        let decode = |source| ToolError::Decode {
            command: command.clone(),
            source,
        };
        match self.next_response(&resource) {
            Response::Json(value) => serde_json::from_value(value).map_err(decode),
            Response::Exit(code) => Err(exit_failure(&command, code)),
            Response::Garbage => serde_json::from_str("<html>").map_err(decode),
        }
    }

    async fn describe<K: Resource>(&self, name: &str) -> Result<(), ToolError> {
        self.record("describe", resource_ref::<K>(name))
    }

    fn delete_cluster(&self) -> Result<(), ToolError> {
        self.record("delete", "cluster")
    }
}

pub(crate) fn exit_failure(command: &str, code: i32) -> ToolError {
    ToolError::Failed {
        command: command.to_string(),
        status: ExitStatus::from_raw(code << 8),
    }
}

pub(crate) fn statefulset(replicas: i32, ready: Option<i32>) -> Response {
    let mut status = json!({ "replicas": replicas });
    if let Some(ready) = ready {
        status["readyReplicas"] = json!(ready);
    }
    Response::Json(json!({
        "apiVersion": "apps/v1",
        "kind": "StatefulSet",
        "metadata": { "name": "proxy", "namespace": "default" },
        "status": status,
    }))
}

pub(crate) fn pod(annotations: Value) -> Response {
    Response::Json(json!({
        "apiVersion": "v1",
        "kind": "Pod",
        "metadata": { "name": "proxy-0", "namespace": "default", "annotations": annotations },
    }))
}

pub(crate) fn published_pod() -> Response {
    pod(json!({
        INTERNAL_ENODE_KEY: "enode://abcd@10.0.0.1:30303",
        EXTERNAL_ENODE_KEY: "enode://abcd@34.1.2.3:30303",
    }))
}
