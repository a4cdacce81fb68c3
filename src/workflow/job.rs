// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Submitting the sample Ray job

use crate::error::{HarnessError, Result};
use std::collections::BTreeSet;
use std::future::Future;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Runs a distributed job against a Ray client address (`ray://host:port`)
/// and reports the hostname every task ran on.
pub trait JobRunner {
    fn run(&self, address: &str) -> impl Future<Output = Result<Vec<String>>> + Send;
}

/// Runs an external program with the Ray address as its last argument.
/// The program prints one hostname per finished task on stdout.
#[derive(Debug, Clone)]
pub struct CommandJobRunner {
    command: Vec<String>,
}

impl CommandJobRunner {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl JobRunner for CommandJobRunner {
    #[instrument(skip(self), fields(program = ?self.command.first()))]
    async fn run(&self, address: &str) -> Result<Vec<String>> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| HarnessError::JobError("job command is empty".to_string()))?;

        info!("Submitting job to {}", address);
        let output = Command::new(program)
            .args(args)
            .arg(address)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| HarnessError::JobError(format!("failed to start {}: {}", program, e)))?;

        if !output.status.success() {
            return Err(HarnessError::JobError(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let hostnames = parse_hostnames(&String::from_utf8_lossy(&output.stdout));
        debug!("Job returned {} results", hostnames.len());
        Ok(hostnames)
    }
}

fn parse_hostnames(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn distinct_hosts(hostnames: &[String]) -> usize {
    hostnames.iter().collect::<BTreeSet<_>>().len()
}
