// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Waiting for a VMRayCluster to converge.

pub mod conditions;
pub mod poller;

pub use conditions::{all_nodes_match, head_node_running, node_matches, workers_running};
pub use poller::{wait_until_ready, PollOutcome, PollSettings};

use crate::kubernetes::ResourceClient;
use crate::types::VMRayCluster;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Wait until the head node of `name` reports `running`
#[instrument(skip(resources, cancel), fields(namespace = %resources.namespace()))]
pub async fn wait_for_head(
    resources: &ResourceClient,
    name: &str,
    settings: PollSettings,
    cancel: &CancellationToken,
) -> PollOutcome<VMRayCluster> {
    wait_until_ready(
        &format!("head node of {}", name),
        move || resources.get_cluster(name),
        head_node_running,
        settings,
        cancel,
    )
    .await
}

/// Wait until the autoscaler's desired workers of `name` are all `running`
#[instrument(skip(resources, cancel), fields(namespace = %resources.namespace()))]
pub async fn wait_for_workers(
    resources: &ResourceClient,
    name: &str,
    settings: PollSettings,
    cancel: &CancellationToken,
) -> PollOutcome<VMRayCluster> {
    wait_until_ready(
        &format!("workers of {}", name),
        move || resources.get_cluster(name),
        workers_running,
        settings,
        cancel,
    )
    .await
}
