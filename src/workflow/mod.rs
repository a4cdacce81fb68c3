// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! End-to-end scenarios over a VMRayCluster.
//!
//! Every stage records its outcome in the [`ValidationLedger`] under its own
//! key and only runs when the stage before it recorded `true`. A skipped stage
//! writes nothing, so the final report can tell "never attempted" apart from
//! "failed".

pub mod job;
pub mod pruning;

pub use job::{CommandJobRunner, JobRunner};

use crate::config::Config;
use crate::constants::{stage, RAY_CLIENT_PORT};
use crate::error::Result;
use crate::kubernetes::{manifests, ResourceClient};
use crate::ledger::ValidationLedger;
use crate::readiness::{self, PollOutcome, PollSettings};
use crate::types::VMRayCluster;
use job::distinct_hosts;
use kube::ResourceExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

/// Ledger keys of the node config round trip
pub mod node_config_stage {
    pub const CREATED: &str = "nodeconfig-created";
    pub const FETCHED: &str = "nodeconfig-fetched";
    pub const DELETED: &str = "nodeconfig-deleted";
}

/// Stages of the cluster lifecycle scenario, in execution order
const CLUSTER_STAGES: &[&str] = &[
    stage::CREATE,
    stage::FETCH,
    stage::HEAD_UP,
    stage::WORKERS_UP,
    stage::JOB_SCALED_UP,
    stage::WORKERS_DELETED,
    stage::DELETE,
];

pub struct Scenario<'a, J> {
    resources: &'a ResourceClient,
    config: &'a Config,
    jobs: &'a J,
    cancel: CancellationToken,
}

impl<'a, J: JobRunner> Scenario<'a, J> {
    pub fn new(
        resources: &'a ResourceClient,
        config: &'a Config,
        jobs: &'a J,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            resources,
            config,
            jobs,
            cancel,
        }
    }

    fn head_settings(&self) -> PollSettings {
        PollSettings::new(self.config.poll_interval, self.config.head_timeout)
    }

    fn worker_settings(&self) -> PollSettings {
        PollSettings::new(self.config.poll_interval, self.config.worker_timeout)
    }

    /// Full lifecycle of one cluster, followed by the verdict for it.
    ///
    /// Only a failure to create the cluster aborts early; every later problem
    /// ends up in the ledger and in the returned validation error.
    #[instrument(skip(self, ledger))]
    pub async fn run(&self, ledger: &mut ValidationLedger, name: &str) -> Result<()> {
        self.create_cluster(ledger, name).await?;
        self.fetch_cluster(ledger, name).await;
        self.wait_for_head(ledger, name).await;
        self.wait_for_workers(ledger, name).await;
        self.submit_job(ledger, name).await;
        if self.config.prune_workers > 0 {
            self.prune_workers(ledger, name, self.config.prune_workers)
                .await;
        }
        self.delete_cluster(ledger, name).await;

        report(ledger, name, CLUSTER_STAGES);
        let verdict = ledger.assert_all_passed(name);
        ledger.discard(name);
        verdict
    }

    /// Submit the cluster manifest. A rejected create is fatal for the scenario.
    #[instrument(skip(self, ledger))]
    pub async fn create_cluster(&self, ledger: &mut ValidationLedger, name: &str) -> Result<()> {
        let cluster = manifests::ray_cluster(self.config, name);
        match self.resources.create_cluster(&cluster).await {
            Ok(_) => {
                ledger.set(name, stage::CREATE, true);
                Ok(())
            }
            Err(e) => {
                error!("Failed to create VMRayCluster {}: {}", name, e);
                ledger.set(name, stage::CREATE, false);
                Err(e)
            }
        }
    }

    /// Read the cluster back and check the API returned the one just created
    #[instrument(skip(self, ledger))]
    pub async fn fetch_cluster(&self, ledger: &mut ValidationLedger, name: &str) {
        if !prior_passed(ledger, name, stage::CREATE, stage::FETCH) {
            return;
        }

        let fetched = match self.resources.get_cluster(name).await {
            Ok(cluster) if cluster.name_any() == name => true,
            Ok(cluster) => {
                error!("Fetched VMRayCluster {} instead of {}", cluster.name_any(), name);
                false
            }
            Err(e) => {
                error!("Failed to fetch VMRayCluster {}: {}", name, e);
                false
            }
        };
        ledger.set(name, stage::FETCH, fetched);
    }

    #[instrument(skip(self, ledger))]
    pub async fn wait_for_head(&self, ledger: &mut ValidationLedger, name: &str) {
        if !prior_passed(ledger, name, stage::CREATE, stage::HEAD_UP) {
            return;
        }

        let outcome =
            readiness::wait_for_head(self.resources, name, self.head_settings(), &self.cancel)
                .await;
        record_wait(ledger, name, stage::HEAD_UP, &outcome);
    }

    #[instrument(skip(self, ledger))]
    pub async fn wait_for_workers(&self, ledger: &mut ValidationLedger, name: &str) {
        if !prior_passed(ledger, name, stage::HEAD_UP, stage::WORKERS_UP) {
            return;
        }

        let outcome =
            readiness::wait_for_workers(self.resources, name, self.worker_settings(), &self.cancel)
                .await;
        record_wait(ledger, name, stage::WORKERS_UP, &outcome);
    }

    /// Run the sample job and check that the load made the autoscaler ask for
    /// more workers than the cluster started with.
    #[instrument(skip(self, ledger))]
    pub async fn submit_job(&self, ledger: &mut ValidationLedger, name: &str) {
        if !prior_passed(ledger, name, stage::WORKERS_UP, stage::JOB_SCALED_UP) {
            return;
        }

        let passed = match self.job_scaled_up(name).await {
            Ok(passed) => passed,
            Err(e) => {
                error!("Job stage for {} failed: {}", name, e);
                false
            }
        };
        ledger.set(name, stage::JOB_SCALED_UP, passed);
    }

    async fn job_scaled_up(&self, name: &str) -> Result<bool> {
        let cluster = self.resources.get_cluster(name).await?;
        let total_workers = cluster.spec.minimum_worker_count() as usize + 1;

        let Some(ip) = cluster.service_ip() else {
            error!("VMRayCluster {} has no service address", name);
            dump_snapshot(&cluster);
            return Ok(false);
        };
        let address = format!("ray://{}:{}", ip, RAY_CLIENT_PORT);

        let hostnames = self.jobs.run(&address).await?;
        let hosts = distinct_hosts(&hostnames);

        let cluster = self.resources.get_cluster(name).await?;
        let desired = cluster.spec.desired_worker_count();

        info!(
            "Job on {} ran on {} distinct hosts (expected {}), autoscaler desires {} workers",
            name, hosts, total_workers, desired
        );

        let passed = hosts == total_workers && desired > total_workers;
        if !passed {
            dump_snapshot(&cluster);
        }
        Ok(passed)
    }

    /// Delete `count` worker VMs; anything short of exactly `count` is a failure
    #[instrument(skip(self, ledger))]
    pub async fn prune_workers(&self, ledger: &mut ValidationLedger, name: &str, count: usize) {
        if !prior_passed(ledger, name, stage::WORKERS_UP, stage::WORKERS_DELETED) {
            return;
        }

        let deleted = match pruning::delete_worker_nodes(self.resources, name, count).await {
            Ok(deleted) => deleted.len(),
            Err(e) => {
                error!("Failed to list worker VMs of {}: {}", name, e);
                0
            }
        };
        ledger.set(name, stage::WORKERS_DELETED, deleted == count);
    }

    #[instrument(skip(self, ledger))]
    pub async fn delete_cluster(&self, ledger: &mut ValidationLedger, name: &str) {
        if !prior_passed(ledger, name, stage::CREATE, stage::DELETE) {
            return;
        }

        let deleted = match self.resources.delete_cluster(name).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to delete VMRayCluster {}: {}", name, e);
                false
            }
        };
        ledger.set(name, stage::DELETE, deleted);
    }

    /// Create, read back and delete a VMRayNodeConfig
    #[instrument(skip(self, ledger))]
    pub async fn node_config_round_trip(
        &self,
        ledger: &mut ValidationLedger,
        name: &str,
    ) -> Result<()> {
        let node_config = manifests::node_config(self.config, name);
        let created = match self.resources.create_node_config(&node_config).await {
            Ok(_) => true,
            Err(e) => {
                error!("Failed to create VMRayNodeConfig {}: {}", name, e);
                false
            }
        };
        ledger.set(name, node_config_stage::CREATED, created);

        if prior_passed(ledger, name, node_config_stage::CREATED, node_config_stage::FETCHED) {
            let fetched = match self.resources.get_node_config(name).await {
                Ok(fetched) => fetched.name_any() == name,
                Err(e) => {
                    error!("Failed to fetch VMRayNodeConfig {}: {}", name, e);
                    false
                }
            };
            ledger.set(name, node_config_stage::FETCHED, fetched);
        }

        if prior_passed(ledger, name, node_config_stage::CREATED, node_config_stage::DELETED) {
            let deleted = match self.resources.delete_node_config(name).await {
                Ok(()) => true,
                Err(e) => {
                    error!("Failed to delete VMRayNodeConfig {}: {}", name, e);
                    false
                }
            };
            ledger.set(name, node_config_stage::DELETED, deleted);
        }

        report(
            ledger,
            name,
            &[
                node_config_stage::CREATED,
                node_config_stage::FETCHED,
                node_config_stage::DELETED,
            ],
        );
        let verdict = ledger.assert_all_passed(name);
        ledger.discard(name);
        verdict
    }
}

/// Gate for `stage`: the prior stage must have recorded exactly `true`
fn prior_passed(ledger: &ValidationLedger, subject: &str, prior: &str, stage: &str) -> bool {
    match ledger.get(subject, prior) {
        Some(true) => true,
        Some(false) => {
            warn!("Skipping {} for {}: {} failed", stage, subject, prior);
            false
        }
        None => {
            warn!("Skipping {} for {}: {} never ran", stage, subject, prior);
            false
        }
    }
}

fn record_wait(
    ledger: &mut ValidationLedger,
    subject: &str,
    key: &str,
    outcome: &PollOutcome<VMRayCluster>,
) {
    if !outcome.ready {
        error!(
            "{} not reached for {} after {} attempts{}",
            key,
            subject,
            outcome.attempts,
            if outcome.cancelled { " (cancelled)" } else { "" }
        );
        match &outcome.last {
            Some(cluster) => dump_snapshot(cluster),
            None => error!("No snapshot of {} was ever fetched", subject),
        }
    }
    ledger.set(subject, key, outcome.ready);
}

/// Log the whole custom resource for post-mortem debugging
fn dump_snapshot(cluster: &VMRayCluster) {
    match serde_yaml::to_string(cluster) {
        Ok(yaml) => error!("Last observed VMRayCluster {}:\n{}", cluster.name_any(), yaml),
        Err(e) => error!("Failed to render VMRayCluster {}: {}", cluster.name_any(), e),
    }
}

fn report(ledger: &ValidationLedger, subject: &str, stages: &[&str]) {
    for key in stages {
        match ledger.get(subject, key) {
            Some(true) => info!("[{}] {}: passed", subject, key),
            Some(false) => error!("[{}] {}: FAILED", subject, key),
            None => info!("[{}] {}: not attempted", subject, key),
        }
    }
}
