//! Scenario files replayed by the `berth` binary.
//!
//! A scenario stands in for the cluster and the submission surface: it
//! registers applications, submits jobs, then delivers a sequence of offer
//! batches (optionally preceded by task status updates).
//!
//! ```yaml
//! applications:
//!   - id: anon
//!     owner: nobody
//! jobs:
//!   - app_id: anon
//!     cmd: "sleep 10"
//!     resources: { cpu: 4, mem_mb: 128 }
//! cycles:
//!   - offers:
//!       - agent: agent-0
//!         resources: { cpu: 16, mem_mb: 512 }
//!   - status:
//!       - { job: 0, state: RUNNING }
//!     offers: []
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::application::Application;
use crate::job::{Job, JobId, JobState};
use crate::offer::{AgentId, Offer, OfferId};
use crate::resource::ResourceVector;

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    #[serde(default)]
    applications: Vec<Application>,
    #[serde(default)]
    jobs: Vec<Job>,
    #[serde(default)]
    cycles: Vec<CycleEntry>,
}

#[derive(Debug, Deserialize)]
struct CycleEntry {
    #[serde(default)]
    status: Vec<StatusUpdate>,
    #[serde(default)]
    offers: Vec<OfferEntry>,
}

/// Offer as written in a scenario.  `id` may be omitted.
#[derive(Debug, Deserialize)]
struct OfferEntry {
    #[serde(default)]
    id: Option<String>,
    agent: String,
    #[serde(default)]
    hostname: String,
    resources: ResourceVector,
}

impl From<OfferEntry> for Offer {
    fn from(e: OfferEntry) -> Self {
        let id = e.id.map(OfferId).unwrap_or_else(OfferId::random);
        Offer::new(id, AgentId(e.agent), e.resources).with_hostname(e.hostname)
    }
}

/// A cluster-reported state change for a launched job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StatusUpdate {
    pub job: JobId,
    pub state: JobState,
}

/// One offer cycle: status updates first, then the offer batch.
#[derive(Debug, Clone)]
pub struct Cycle {
    pub status: Vec<StatusUpdate>,
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub applications: Vec<Application>,
    pub jobs: Vec<Job>,
    pub cycles: Vec<Cycle>,
}

impl Scenario {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open scenario file: {}", path.display()))?;
        let scenario = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse scenario file: {}", path.display()))?;

        info!(
            applications = scenario.applications.len(),
            jobs         = scenario.jobs.len(),
            cycles       = scenario.cycles.len(),
            "Scenario loaded from {}",
            path.display()
        );
        Ok(scenario)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ScenarioFile = serde_yaml::from_str(content)?;
        Ok(Scenario {
            applications: file.applications,
            jobs: file.jobs,
            cycles: file
                .cycles
                .into_iter()
                .map(|c| Cycle {
                    status: c.status,
                    offers: c.offers.into_iter().map(Offer::from).collect(),
                })
                .collect(),
        })
    }
}
