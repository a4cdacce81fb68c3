// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{env_keys, poll};
use crate::error::{HarnessError, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Harness configuration, built once at startup and passed down.
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace all custom resources are created in
    pub namespace: String,
    pub kube_config_file: String,
    pub vm_image: String,
    /// Address of the Kubernetes API server the Ray nodes talk back to
    pub server_address: String,
    pub vm_class: String,
    pub storage_class: String,
    pub cluster_name: String,
    pub poll_interval: Duration,
    pub head_timeout: Duration,
    pub worker_timeout: Duration,
    /// Program and arguments used to submit the sample job
    pub job_command: Vec<String>,
    /// Number of worker VMs to delete after the cluster scaled up; 0 skips the stage
    pub prune_workers: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Every missing required key is collected before failing, so a single
    /// error names all of them.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut required = |key: &str| match lookup(key).filter(|v| !v.is_empty()) {
            Some(value) => value,
            None => {
                missing.push(key.to_string());
                String::new()
            }
        };

        let namespace = required(env_keys::NAMESPACE);
        let kube_config_file = required(env_keys::KUBE_CONFIG_FILE);
        let vm_image = required(env_keys::VM_IMAGE);
        let server_address = required(env_keys::SERVER_ADDRESS);
        let vm_class = required(env_keys::VM_CLASS);
        let storage_class = required(env_keys::STORAGE_CLASS);

        if !missing.is_empty() {
            return Err(HarnessError::ConfigurationError { missing });
        }

        let cluster_name = lookup(env_keys::CLUSTER_NAME)
            .unwrap_or_else(|| crate::constants::DEFAULT_CLUSTER_NAME.to_string());
        let poll_interval = Duration::from_secs(parse_or(
            &lookup,
            env_keys::POLL_INTERVAL_SECS,
            poll::INTERVAL_SECS,
        )?);
        let head_timeout = Duration::from_secs(parse_or(
            &lookup,
            env_keys::HEAD_TIMEOUT_SECS,
            poll::HEAD_TIMEOUT_SECS,
        )?);
        let worker_timeout = Duration::from_secs(parse_or(
            &lookup,
            env_keys::WORKER_TIMEOUT_SECS,
            poll::WORKER_TIMEOUT_SECS,
        )?);
        let prune_workers = parse_or(&lookup, env_keys::PRUNE_WORKERS, 0usize)?;

        if poll_interval.is_zero() {
            return Err(HarnessError::InvalidConfigError {
                name: env_keys::POLL_INTERVAL_SECS.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let job_command: Vec<String> = lookup(env_keys::RAY_JOB_COMMAND)
            .unwrap_or_else(|| crate::constants::DEFAULT_JOB_COMMAND.to_string())
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if job_command.is_empty() {
            return Err(HarnessError::InvalidConfigError {
                name: env_keys::RAY_JOB_COMMAND.to_string(),
                reason: "command is empty".to_string(),
            });
        }

        Ok(Config {
            namespace,
            kube_config_file,
            vm_image,
            server_address,
            vm_class,
            storage_class,
            cluster_name,
            poll_interval,
            head_timeout,
            worker_timeout,
            job_command,
            prune_workers,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| HarnessError::InvalidConfigError {
                name: key.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(default),
    }
}
