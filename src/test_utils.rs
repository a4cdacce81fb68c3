// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type Route = (String, String);

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// A route can hold a sequence of responses; each request consumes one and the
/// last one keeps being served, which models a resource converging over time.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<Route, VecDeque<(u16, String)>>>>,
    requests: Arc<Mutex<Vec<Route>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a response for requests matching the method and exact path
    pub fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Queue one GET response per element, served in order
    pub fn on_get_sequence(self, path: &str, responses: &[(u16, String)]) -> Self {
        responses
            .iter()
            .fold(self, |mock, (status, body)| mock.on_get(path, *status, body))
    }

    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// Every (method, path) received so far, in arrival order
    pub fn requests(&self) -> Vec<Route> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received for the method and exact path
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, p)| m == method && p == path)
            .count()
    }

    fn next_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(&(method.to_string(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        self.requests
            .lock()
            .unwrap()
            .push((method.clone(), path.clone()));
        let (status, body) = self
            .next_response(&method, &path)
            .unwrap_or_else(|| (404, not_found_json("resource", &path)));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Spec fragment with the given `(node type, min_workers)` table and
/// autoscaler-desired worker names. The head node type is `head.node`.
pub fn cluster_spec_json(
    node_types: &[(&str, u32)],
    desired_workers: &[&str],
) -> serde_json::Value {
    let available_node_types: serde_json::Map<String, serde_json::Value> = node_types
        .iter()
        .map(|(name, min)| {
            let node_type = serde_json::json!({
                "vm_class": "best-effort-xlarge",
                "min_workers": min,
                "max_workers": 5
            });
            (name.to_string(), node_type)
        })
        .collect();
    let desired: serde_json::Map<String, serde_json::Value> = desired_workers
        .iter()
        .map(|name| (name.to_string(), serde_json::json!("ray.worker.default")))
        .collect();

    serde_json::json!({
        "api_server": {"location": "10.0.0.1"},
        "head_node": {"node_type": "head.node", "port": 6254},
        "common_node_config": {
            "vm_image": "vmi-ray",
            "storage_class": "wcp-storage",
            "vm_user": "ray-vm",
            "vm_password_salt_hash": "$6$salt$hash",
            "max_workers": 5,
            "available_node_types": available_node_types
        },
        "autoscaler_desired_workers": desired
    })
}

/// Create a mock VMRayCluster JSON response with the given spec and status
pub fn cluster_json_with(name: &str, spec: serde_json::Value, status: serde_json::Value) -> String {
    serde_json::json!({
        "apiVersion": "vmray.broadcom.com/v1alpha1",
        "kind": "VMRayCluster",
        "metadata": {
            "name": name,
            "namespace": "ray-e2e",
            "uid": "test-uid"
        },
        "spec": spec,
        "status": status
    })
    .to_string()
}

/// Create a mock VMRayCluster JSON response with a minimal spec
pub fn cluster_json(name: &str, status: serde_json::Value) -> String {
    cluster_json_with(name, cluster_spec_json(&[("head.node", 0)], &[]), status)
}

/// Create a mock VirtualMachineList JSON response, items in the given order
pub fn virtual_machine_list_json(names: &[&str]) -> String {
    let items: Vec<serde_json::Value> = names
        .iter()
        .map(|name| {
            serde_json::json!({
                "apiVersion": "vmoperator.vmware.com/v1alpha3",
                "kind": "VirtualMachine",
                "metadata": {"name": name, "namespace": "ray-e2e"},
                "spec": {"className": "best-effort-xlarge"}
            })
        })
        .collect();

    serde_json::json!({
        "apiVersion": "vmoperator.vmware.com/v1alpha3",
        "kind": "VirtualMachineList",
        "metadata": {"resourceVersion": "1"},
        "items": items
    })
    .to_string()
}

/// Create a successful delete Status response
pub fn status_success_json() -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "metadata": {},
        "status": "Success",
        "message": "",
        "reason": "",
        "code": 200
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} \"{}\" not found", resource, name),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// Create a 500 internal error response
pub fn internal_error_json() -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": "etcdserver: request timed out",
        "reason": "InternalError",
        "code": 500
    })
    .to_string()
}
