// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource documents submitted by the scenarios

use crate::config::Config;
use crate::types::cluster::{
    ApiServer, CommonNodeConfig, HeadNode, NodeResources, NodeType, VMRayClusterSpec,
};
use crate::types::{VMRayCluster, VMRayNodeConfig, VMRayNodeConfigSpec};
use std::collections::BTreeMap;

const VM_USER: &str = "ray-vm";
/// SHA-512 crypt of the test password
const VM_PASSWORD_SALT_HASH: &str = "$6$test1234$9/BUZHNkvq.c1miDDMG5cHLmM4V7gbYdGuF0//3gSIh//DOyi7ypPCs6EAA9b8/tidHottL6UG0tG/RqTgAAi/";
const HEAD_NODE_TYPE: &str = "head.node";
const WORKER_NODE_TYPE: &str = "ray.worker.default";
const HEAD_PORT: u16 = 6254;
const MAX_WORKERS: u32 = 5;
const WORKER_MIN: u32 = 2;
const WORKER_CPU: u32 = 4;
const WORKER_MEMORY_BYTES: u64 = 4 * 1024 * 1024 * 1024;
const RAY_DOCKER_IMAGE: &str = "rayproject/ray:2.9.0";

/// Cluster with an idle head node and one autoscaled worker pool
pub fn ray_cluster(config: &Config, name: &str) -> VMRayCluster {
    let available_node_types = BTreeMap::from([
        (
            HEAD_NODE_TYPE.to_string(),
            NodeType {
                vm_class: config.vm_class.clone(),
                min_workers: 0,
                max_workers: 1,
                resources: NodeResources {
                    cpu: Some(0),
                    memory: None,
                },
            },
        ),
        (
            WORKER_NODE_TYPE.to_string(),
            NodeType {
                vm_class: config.vm_class.clone(),
                min_workers: WORKER_MIN,
                max_workers: MAX_WORKERS,
                resources: NodeResources {
                    cpu: Some(WORKER_CPU),
                    memory: Some(WORKER_MEMORY_BYTES),
                },
            },
        ),
    ]);

    let spec = VMRayClusterSpec {
        api_server: ApiServer {
            location: config.server_address.clone(),
            ca_cert: String::new(),
        },
        head_node: HeadNode {
            node_type: HEAD_NODE_TYPE.to_string(),
            port: Some(HEAD_PORT),
            setup_commands: Vec::new(),
        },
        common_node_config: CommonNodeConfig {
            vm_image: config.vm_image.clone(),
            storage_class: config.storage_class.clone(),
            vm_user: VM_USER.to_string(),
            vm_password_salt_hash: VM_PASSWORD_SALT_HASH.to_string(),
            max_workers: MAX_WORKERS,
            available_node_types,
        },
        ray_docker_image: Some(RAY_DOCKER_IMAGE.to_string()),
        autoscaler_desired_workers: BTreeMap::new(),
    };

    let mut cluster = VMRayCluster::new(name, spec);
    cluster.metadata.namespace = Some(config.namespace.clone());
    cluster
}

pub fn node_config(config: &Config, name: &str) -> VMRayNodeConfig {
    let spec = VMRayNodeConfigSpec {
        vm_class: config.vm_class.clone(),
        vm_image: config.vm_image.clone(),
        storage_class: config.storage_class.clone(),
        vm_user: VM_USER.to_string(),
        vm_password_salt_hash: VM_PASSWORD_SALT_HASH.to_string(),
        nfs: None,
    };

    let mut node_config = VMRayNodeConfig::new(name, spec);
    node_config.metadata.namespace = Some(config.namespace.clone());
    node_config
}
