// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client creation from the kubeconfig file named in the configuration

use crate::config::Config;
use crate::error::{HarnessError, Result};
use kube::{config::KubeConfigOptions, config::Kubeconfig, Client};
use tracing::{info, instrument};

/// Create a Kubernetes client for the supervisor cluster under test
#[instrument(skip(config), fields(kubeconfig = %config.kube_config_file))]
pub async fn create_client(config: &Config) -> Result<Client> {
    let kubeconfig = tokio::fs::read_to_string(&config.kube_config_file)
        .await
        .map_err(|e| {
            HarnessError::KubeconfigError(format!(
                "Failed to read {}: {}",
                config.kube_config_file, e
            ))
        })?;

    let client = create_client_from_kubeconfig(&kubeconfig).await?;
    info!("Connected to Kubernetes cluster");
    Ok(client)
}

/// Create a Kubernetes client from a kubeconfig string
async fn create_client_from_kubeconfig(kubeconfig: &str) -> Result<Client> {
    let kubeconfig_parsed: Kubeconfig = serde_yaml::from_str(kubeconfig)
        .map_err(|e| HarnessError::KubeconfigError(format!("Failed to parse kubeconfig: {}", e)))?;

    let client_config =
        kube::Config::from_custom_kubeconfig(kubeconfig_parsed, &KubeConfigOptions::default())
            .await
            .map_err(|e| HarnessError::KubeconfigError(format!("Failed to create config: {}", e)))?;

    Client::try_from(client_config)
        .map_err(|e| HarnessError::KubeconfigError(format!("Failed to create client: {}", e)))
}
