// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Missing configuration: {}", missing.join(", "))]
    ConfigurationError { missing: Vec<String> },

    #[error("Invalid configuration value for {name}: {reason}")]
    InvalidConfigError { name: String, reason: String },

    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load kubeconfig: {0}")]
    KubeconfigError(String),

    #[error("Ray job failed: {0}")]
    JobError(String),

    #[error("Validation failed for '{subject}': {}", failed.join(", "))]
    ValidationError { subject: String, failed: Vec<String> },
}

pub type Result<T> = std::result::Result<T, HarnessError>;
