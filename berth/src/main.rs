/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use berth::application::Applications;
use berth::config::scenario::Scenario;
use berth::config::PlannerConfig;
use berth::driver::Driver;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Berth offer/job planner.
///
/// Replays a scenario file (applications, jobs, offer batches) through the
/// offer-cycle driver and logs every launch / stock / decline decision.
///
/// Example:
///   berth --config planner.yaml --scenario demo.yaml --interval-ms 500
#[derive(Debug, Parser)]
#[command(name = "berth", about = "Berth offer/job planner", long_about = None)]
struct Cli {
    /// Path to the YAML planner configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Path to the YAML scenario to replay.
    #[arg(short = 's', long = "scenario")]
    scenario: PathBuf,

    /// Pause between offer cycles, in milliseconds.
    #[arg(short = 'i', long = "interval-ms", default_value_t = 0)]
    interval_ms: u64,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        config      = ?cli.config,
        scenario    = %cli.scenario.display(),
        interval_ms = cli.interval_ms,
        "Berth starting up..."
    );

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // ── Load configuration ────────────────────────────────────────────────────
    let config = match &cli.config {
        Some(path) => PlannerConfig::load_from_file(path)?,
        None => {
            warn!("No planner configuration file provided, using defaults");
            PlannerConfig::default()
        }
    };

    let scenario = Scenario::load_from_file(&cli.scenario)?;

    // ── Wire up the driver ────────────────────────────────────────────────────
    let mut registry = Applications::new();
    for app in scenario.applications {
        registry.load(app);
    }
    let planner = Box::new(config.naive_planner());
    let mut driver = Driver::new(planner, config, registry);

    for job in scenario.jobs {
        let label = job.to_string();
        driver
            .submit(job)
            .with_context(|| format!("Rejected scenario job {label}"))?;
    }

    // ── Replay offer cycles ───────────────────────────────────────────────────
    let interval = Duration::from_millis(cli.interval_ms);
    let cycle_count = scenario.cycles.len();

    for (i, cycle) in scenario.cycles.into_iter().enumerate() {
        for update in cycle.status {
            if let Err(e) = driver.on_status(update.job, update.state) {
                warn!(job = update.job, state = %update.state, "status update rejected: {e}");
            }
        }

        let outcome = driver.on_offers(cycle.offers)?;

        for launch in &outcome.launches {
            let ids: Vec<_> = launch.jobs.iter().filter_map(|j| j.id()).collect();
            info!(
                offer = %launch.offer,
                agent = %launch.agent,
                role  = %launch.role,
                jobs  = ?ids,
                "  launch"
            );
        }
        for id in &outcome.stocked {
            info!(offer = %id, "  stock");
        }
        for id in &outcome.declined {
            info!(offer = %id, "  decline");
        }

        if i + 1 < cycle_count && !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
    }

    let queue = driver.queue();
    info!(
        still_queued = queue.len(),
        launched     = queue.launched_count(),
        "Scenario complete"
    );

    Ok(())
}
