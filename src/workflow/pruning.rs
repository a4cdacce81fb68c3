// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deleting worker VMs out from under a running cluster

use crate::constants::worker_name_prefix;
use crate::error::Result;
use crate::kubernetes::ResourceClient;
use kube::ResourceExt;
use tracing::{info, instrument, warn};

/// Delete up to `count` worker VMs of `cluster_name`, in listing order.
///
/// Returns the names that were actually deleted; a failed delete is logged
/// and skipped, so the result can be shorter than `count`.
#[instrument(skip(resources), fields(namespace = %resources.namespace()))]
pub async fn delete_worker_nodes(
    resources: &ResourceClient,
    cluster_name: &str,
    count: usize,
) -> Result<Vec<String>> {
    let prefix = worker_name_prefix(cluster_name);
    let candidates: Vec<String> = resources
        .list_nodes()
        .await?
        .iter()
        .map(|vm| vm.name_any())
        .filter(|name| name.starts_with(&prefix))
        .take(count)
        .collect();

    if candidates.len() < count {
        warn!(
            "Only {} worker VMs match {}*, {} requested",
            candidates.len(),
            prefix,
            count
        );
    }

    let mut deleted = Vec::with_capacity(candidates.len());
    for name in candidates {
        match resources.delete_node(&name).await {
            Ok(()) => deleted.push(name),
            Err(e) => warn!("Failed to delete worker VM {}: {}", name, e),
        }
    }

    info!("Deleted {}/{} worker VMs", deleted.len(), count);
    Ok(deleted)
}
