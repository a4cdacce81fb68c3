// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use vmray_e2e::config::Config;
use vmray_e2e::kubernetes::{create_client, ResourceClient};
use vmray_e2e::ledger::ValidationLedger;
use vmray_e2e::workflow::{CommandJobRunner, Scenario};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting VMRayCluster end-to-end run");

    // Load configuration; every missing variable is reported at once
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: namespace={}, cluster={}",
        config.namespace, config.cluster_name
    );

    let client = create_client(&config).await?;
    let resources = ResourceClient::new(client, &config.namespace);
    let jobs = CommandJobRunner::new(config.job_command.clone());

    // Ctrl-C ends any wait in progress instead of sitting out its timeout
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling outstanding waits");
            on_interrupt.cancel();
        }
    });

    let scenario = Scenario::new(&resources, &config, &jobs, cancel);
    let mut ledger = ValidationLedger::new();
    let mut failures = 0;

    let node_config_name = format!("{}-nodeconfig", config.cluster_name);
    if let Err(e) = scenario
        .node_config_round_trip(&mut ledger, &node_config_name)
        .await
    {
        error!("{}", e);
        failures += 1;
    }

    if let Err(e) = scenario.run(&mut ledger, &config.cluster_name).await {
        error!("{}", e);
        failures += 1;
    }

    if failures > 0 {
        bail!("{} scenario(s) failed", failures);
    }

    info!("All scenarios passed");
    Ok(())
}
