// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Environment variables read by `Config::from_env`
pub mod env_keys {
    pub const NAMESPACE: &str = "NAMESPACE";
    pub const KUBE_CONFIG_FILE: &str = "KUBE_CONFIG_FILE";
    pub const VM_IMAGE: &str = "VMI";
    pub const SERVER_ADDRESS: &str = "SUPERVISOR_IP";
    pub const VM_CLASS: &str = "VM_CLASS";
    pub const STORAGE_CLASS: &str = "STORAGE_CLASS";

    pub const CLUSTER_NAME: &str = "CLUSTER_NAME";
    pub const POLL_INTERVAL_SECS: &str = "POLL_INTERVAL_SECS";
    pub const HEAD_TIMEOUT_SECS: &str = "HEAD_TIMEOUT_SECS";
    pub const WORKER_TIMEOUT_SECS: &str = "WORKER_TIMEOUT_SECS";
    pub const RAY_JOB_COMMAND: &str = "RAY_JOB_COMMAND";
    pub const PRUNE_WORKERS: &str = "PRUNE_WORKERS";
}

pub const DEFAULT_CLUSTER_NAME: &str = "ray-cluster";

/// Prints one hostname per completed task on stdout
pub const DEFAULT_JOB_COMMAND: &str = "python3 jobs/hostnames.py";

/// Readiness polling defaults
pub mod poll {
    pub const INTERVAL_SECS: u64 = 10;
    pub const HEAD_TIMEOUT_SECS: u64 = 600;
    pub const WORKER_TIMEOUT_SECS: u64 = 900;
}

/// Values written into the cluster status by the operator
pub mod node_state {
    pub const RUNNING: &str = "running";
}

/// Ledger keys, one per workflow stage
pub mod stage {
    pub const CREATE: &str = "create";
    pub const FETCH: &str = "fetch";
    pub const HEAD_UP: &str = "head-is-up";
    pub const WORKERS_UP: &str = "workers-are-up";
    pub const JOB_SCALED_UP: &str = "job-scaled-up";
    pub const WORKERS_DELETED: &str = "workers-deleted";
    pub const DELETE: &str = "delete";
}

/// Worker VMs are named `<cluster>-w-<suffix>`
pub fn worker_name_prefix(cluster_name: &str) -> String {
    format!("{}-w-", cluster_name)
}

/// Port the Ray client server listens on inside the head node
pub const RAY_CLIENT_PORT: u16 = 10001;
