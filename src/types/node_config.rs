// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use kube::CustomResource;
use serde::{Deserialize, Serialize};

use super::cluster::Condition;

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "vmray.broadcom.com", version = "v1alpha1", kind = "VMRayNodeConfig")]
#[kube(plural = "vmraynodeconfigs")]
#[kube(namespaced)]
#[kube(status = "VMRayNodeConfigStatus")]
pub struct VMRayNodeConfigSpec {
    pub vm_class: String,
    pub vm_image: String,
    pub storage_class: String,
    pub vm_user: String,
    pub vm_password_salt_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfs: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
pub struct VMRayNodeConfigStatus {
    #[serde(rename = "Valid", default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_flag_reads_capitalised_field() {
        let config: VMRayNodeConfig = serde_json::from_value(serde_json::json!({
            "apiVersion": "vmray.broadcom.com/v1alpha1",
            "kind": "VMRayNodeConfig",
            "metadata": {"name": "nc1", "namespace": "ray-e2e"},
            "spec": {
                "vm_class": "best-effort-xlarge",
                "vm_image": "vmi-ray",
                "storage_class": "wcp-storage",
                "vm_user": "ray-vm",
                "vm_password_salt_hash": "$6$salt$hash"
            },
            "status": {"Valid": true}
        }))
        .unwrap();

        assert_eq!(config.status.and_then(|s| s.valid), Some(true));
    }

    #[test]
    fn test_status_omitted_until_reported() {
        let config = VMRayNodeConfig::new("nc1", VMRayNodeConfigSpec::default());
        let value = serde_json::to_value(&config).unwrap();
        assert!(config.status.is_none());
        assert!(value.get("status").is_none());
    }
}
