// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::CustomResource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "vmray.broadcom.com", version = "v1alpha1", kind = "VMRayCluster")]
#[kube(plural = "vmrayclusters")]
#[kube(namespaced)]
#[kube(status = "VMRayClusterStatus")]
pub struct VMRayClusterSpec {
    pub api_server: ApiServer,
    pub head_node: HeadNode,
    pub common_node_config: CommonNodeConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ray_docker_image: Option<String>,
    /// Written by the autoscaler only: worker name -> node type
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub autoscaler_desired_workers: BTreeMap<String, String>,
}

impl VMRayClusterSpec {
    /// Sum of `min_workers` over every node type except the head node's type
    pub fn minimum_worker_count(&self) -> u32 {
        let head_type = self.head_node.node_type.as_str();
        self.common_node_config
            .available_node_types
            .iter()
            .filter(|(name, _)| name.as_str() != head_type)
            .map(|(_, node_type)| node_type.min_workers)
            .sum()
    }

    /// Worker names the autoscaler currently asks for
    pub fn desired_worker_names(&self) -> impl Iterator<Item = &str> {
        self.autoscaler_desired_workers.keys().map(String::as_str)
    }

    pub fn desired_worker_count(&self) -> usize {
        self.autoscaler_desired_workers.len()
    }
}

impl VMRayCluster {
    /// Address the Ray client connects to: the service IP when published,
    /// otherwise the head node's own IP.
    pub fn service_ip(&self) -> Option<&str> {
        let status = self.status.as_ref()?;
        status
            .vm_service_status
            .as_ref()
            .and_then(|s| s.ip.as_deref())
            .or(status.head_node_status.as_ref().and_then(|h| h.ip.as_deref()))
            .filter(|ip| !ip.is_empty())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
pub struct ApiServer {
    pub location: String,
    #[serde(default)]
    pub ca_cert: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
pub struct HeadNode {
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default)]
    pub setup_commands: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
pub struct CommonNodeConfig {
    pub vm_image: String,
    pub storage_class: String,
    pub vm_user: String,
    pub vm_password_salt_hash: String,
    pub max_workers: u32,
    #[serde(default)]
    pub available_node_types: BTreeMap<String, NodeType>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
pub struct NodeType {
    pub vm_class: String,
    #[serde(default)]
    pub min_workers: u32,
    #[serde(default)]
    pub max_workers: u32,
    #[serde(default)]
    pub resources: NodeResources,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
pub struct NodeResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<u32>,
    /// Bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
pub struct VMRayClusterStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_node_status: Option<NodeStatus>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub current_workers: BTreeMap<String, NodeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_service_status: Option<ServiceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_state: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

/// Status of a single Ray node VM as reported by the operator
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
pub struct NodeStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ray_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl NodeStatus {
    pub fn with_vm_status(vm_status: &str) -> Self {
        NodeStatus {
            vm_status: Some(vm_status.to_string()),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
pub struct ServiceStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::api::ObjectMeta;

    fn make_spec(node_types: &[(&str, u32)], desired: &[&str]) -> VMRayClusterSpec {
        VMRayClusterSpec {
            head_node: HeadNode {
                node_type: "head.node".to_string(),
                ..Default::default()
            },
            common_node_config: CommonNodeConfig {
                available_node_types: node_types
                    .iter()
                    .map(|(name, min)| {
                        (
                            name.to_string(),
                            NodeType {
                                min_workers: *min,
                                ..Default::default()
                            },
                        )
                    })
                    .collect(),
                ..Default::default()
            },
            autoscaler_desired_workers: desired
                .iter()
                .map(|name| (name.to_string(), "ray.worker.default".to_string()))
                .collect(),
            ..Default::default()
        }
    }

    fn make_cluster(status: Option<VMRayClusterStatus>) -> VMRayCluster {
        VMRayCluster {
            metadata: ObjectMeta {
                name: Some("rc1".to_string()),
                namespace: Some("ray-e2e".to_string()),
                ..Default::default()
            },
            spec: make_spec(&[], &[]),
            status,
        }
    }

    #[test]
    fn test_minimum_worker_count_excludes_head_type() {
        let spec = make_spec(
            &[("head.node", 4), ("ray.worker.default", 2), ("ray.worker.gpu", 1)],
            &[],
        );

        assert_eq!(spec.minimum_worker_count(), 3);
    }

    #[test]
    fn test_minimum_worker_count_without_node_types() {
        let spec = make_spec(&[], &[]);
        assert_eq!(spec.minimum_worker_count(), 0);
    }

    #[test]
    fn test_desired_workers() {
        let spec = make_spec(&[], &["rc1-w-b", "rc1-w-a"]);

        assert_eq!(spec.desired_worker_count(), 2);
        assert_eq!(
            spec.desired_worker_names().collect::<Vec<_>>(),
            vec!["rc1-w-a", "rc1-w-b"]
        );
    }

    #[test]
    fn test_service_ip_prefers_service_status() {
        let cluster = make_cluster(Some(VMRayClusterStatus {
            head_node_status: Some(NodeStatus {
                ip: Some("192.168.0.5".to_string()),
                ..Default::default()
            }),
            vm_service_status: Some(ServiceStatus {
                ip: Some("10.10.0.3".to_string()),
            }),
            ..Default::default()
        }));

        assert_eq!(cluster.service_ip(), Some("10.10.0.3"));
    }

    #[test]
    fn test_service_ip_falls_back_to_head_ip() {
        let cluster = make_cluster(Some(VMRayClusterStatus {
            head_node_status: Some(NodeStatus {
                ip: Some("192.168.0.5".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }));

        assert_eq!(cluster.service_ip(), Some("192.168.0.5"));
    }

    #[test]
    fn test_service_ip_without_status() {
        assert_eq!(make_cluster(None).service_ip(), None);
    }

    #[test]
    fn test_status_deserializes_partial_document() {
        let status: VMRayClusterStatus = serde_json::from_value(serde_json::json!({
            "head_node_status": {"ip": "192.168.0.5"},
            "current_workers": {
                "rc1-w-1": {"vm_status": "running"},
                "rc1-w-2": {}
            }
        }))
        .unwrap();

        assert_eq!(status.head_node_status.unwrap().vm_status, None);
        assert_eq!(
            status.current_workers["rc1-w-1"],
            NodeStatus::with_vm_status("running")
        );
        assert_eq!(status.current_workers["rc1-w-2"].vm_status, None);
    }
}
