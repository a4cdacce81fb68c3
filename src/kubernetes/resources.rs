// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespaced CRUD for the Ray custom resources and the VMs backing them

use crate::error::Result;
use crate::types::{VMRayCluster, VMRayNodeConfig, VirtualMachine};
use kube::{
    api::{DeleteParams, ListParams, PostParams},
    Api, Client, ResourceExt,
};
use tracing::{debug, info, instrument};

/// Namespaced access to the harness resources.
///
/// Every call returns a fresh document; nothing is cached between calls.
#[derive(Clone)]
pub struct ResourceClient {
    client: Client,
    namespace: String,
}

impl ResourceClient {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn clusters(&self) -> Api<VMRayCluster> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn node_configs(&self) -> Api<VMRayNodeConfig> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn nodes(&self) -> Api<VirtualMachine> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    #[instrument(
        skip(self, cluster),
        fields(namespace = %self.namespace, cluster = %cluster.name_any())
    )]
    pub async fn create_cluster(&self, cluster: &VMRayCluster) -> Result<VMRayCluster> {
        let created = self
            .clusters()
            .create(&PostParams::default(), cluster)
            .await?;
        info!("Created VMRayCluster {}/{}", self.namespace, created.name_any());
        Ok(created)
    }

    pub async fn get_cluster(&self, name: &str) -> Result<VMRayCluster> {
        debug!("Fetching VMRayCluster {}/{}", self.namespace, name);
        Ok(self.clusters().get(name).await?)
    }

    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn delete_cluster(&self, name: &str) -> Result<()> {
        self.clusters()
            .delete(name, &DeleteParams::default())
            .await?;
        info!("Deleted VMRayCluster {}/{}", self.namespace, name);
        Ok(())
    }

    #[instrument(
        skip(self, node_config),
        fields(namespace = %self.namespace, node_config = %node_config.name_any())
    )]
    pub async fn create_node_config(
        &self,
        node_config: &VMRayNodeConfig,
    ) -> Result<VMRayNodeConfig> {
        let created = self
            .node_configs()
            .create(&PostParams::default(), node_config)
            .await?;
        info!(
            "Created VMRayNodeConfig {}/{}",
            self.namespace,
            created.name_any()
        );
        Ok(created)
    }

    pub async fn get_node_config(&self, name: &str) -> Result<VMRayNodeConfig> {
        debug!("Fetching VMRayNodeConfig {}/{}", self.namespace, name);
        Ok(self.node_configs().get(name).await?)
    }

    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn delete_node_config(&self, name: &str) -> Result<()> {
        self.node_configs()
            .delete(name, &DeleteParams::default())
            .await?;
        info!("Deleted VMRayNodeConfig {}/{}", self.namespace, name);
        Ok(())
    }

    /// VirtualMachines in the namespace, in the order the API returns them
    pub async fn list_nodes(&self) -> Result<Vec<VirtualMachine>> {
        let list = self.nodes().list(&ListParams::default()).await?;
        debug!(
            "Found {} VirtualMachines in {}",
            list.items.len(),
            self.namespace
        );
        Ok(list.items)
    }

    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn delete_node(&self, name: &str) -> Result<()> {
        self.nodes().delete(name, &DeleteParams::default()).await?;
        info!("Deleted VirtualMachine {}/{}", self.namespace, name);
        Ok(())
    }
}
