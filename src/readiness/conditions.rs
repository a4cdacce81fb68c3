// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Predicates over a single VMRayCluster status snapshot

use crate::constants::node_state::RUNNING;
use crate::types::{NodeStatus, VMRayCluster};
use std::collections::BTreeMap;

/// True iff the node reports exactly the desired VM state.
/// A node without `vm_status` never matches.
pub fn node_matches(status: &NodeStatus, desired: &str) -> bool {
    status.vm_status.as_deref() == Some(desired)
}

/// True iff every named node is present in `current` and matches `desired`.
/// An empty name set matches vacuously.
pub fn all_nodes_match<'a, I>(
    current: &BTreeMap<String, NodeStatus>,
    names: I,
    desired: &str,
) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().all(|name| {
        current
            .get(name)
            .is_some_and(|status| node_matches(status, desired))
    })
}

pub fn head_node_running(cluster: &VMRayCluster) -> bool {
    cluster
        .status
        .as_ref()
        .and_then(|s| s.head_node_status.as_ref())
        .is_some_and(|head| node_matches(head, RUNNING))
}

/// The autoscaler asks for at least the configured minimum of workers and
/// every one of them is running. Both halves read the same snapshot.
pub fn workers_running(cluster: &VMRayCluster) -> bool {
    let spec = &cluster.spec;
    if (spec.minimum_worker_count() as usize) > spec.desired_worker_count() {
        return false;
    }

    let empty = BTreeMap::new();
    let current = cluster
        .status
        .as_ref()
        .map(|s| &s.current_workers)
        .unwrap_or(&empty);
    all_nodes_match(current, spec.desired_worker_names(), RUNNING)
}
