//! Planner configuration loading.
//!
//! The expected YAML structure is:
//! ```yaml
//! planner:
//!   stock_size: 1
//!   role: "nobody"
//!   min_offer:
//!     cpu: 1.0
//!     mem_mb: 32
//!   max_offers_per_cycle: 512
//!   max_jobs_per_cycle: 4096
//! ```
//!
//! Every field is optional.  A missing `planner:` section yields
//! [`PlannerConfig::default`].

pub mod scenario;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::planner::NaivePlanner;
use crate::resource::ResourceVector;

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    planner: Option<PlannerSection>,
}

/// `planner:` section as it appears in the file.
///
/// `stock_size` is a `usize`, so a negative value fails deserialization
/// instead of reaching the planner.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlannerSection {
    #[serde(default)]
    stock_size: usize,
    #[serde(default = "default_role")]
    role: String,
    #[serde(default)]
    min_offer: Option<ResourceVector>,
    #[serde(default)]
    max_offers_per_cycle: Option<usize>,
    #[serde(default)]
    max_jobs_per_cycle: Option<usize>,
}

/// Serde default for `role`: `"*"` is the cluster manager's unreserved role.
fn default_role() -> String {
    String::from("*")
}

// ── Public data structures ────────────────────────────────────────────────────

/// Operator settings for the offer cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Offers to hold back as standby capacity every cycle.
    pub stock_size: usize,

    /// Role threaded through to acceptance bookkeeping.
    pub role: String,

    /// Offers that do not cover this vector are returned to the cluster.
    /// [`ResourceVector::ZERO`] disables the floor.
    pub min_offer: ResourceVector,

    /// Upper bound on offers considered per cycle; the excess is declined.
    pub max_offers_per_cycle: Option<usize>,

    /// Upper bound on queued jobs considered per cycle (oldest first).
    pub max_jobs_per_cycle: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            stock_size: 0,
            role: default_role(),
            min_offer: ResourceVector::ZERO,
            max_offers_per_cycle: None,
            max_jobs_per_cycle: None,
        }
    }
}

impl PlannerConfig {
    /// Parses `path` into a `PlannerConfig`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, the YAML is structurally
    /// invalid, or a value is out of range (negative `stock_size`, negative
    /// `min_offer.cpu`).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading planner configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))
    }

    /// Parses a YAML document held in memory.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;

        let Some(section) = file.planner else {
            debug!("No planner section, using defaults");
            return Ok(Self::default());
        };

        let config = PlannerConfig {
            stock_size: section.stock_size,
            role: section.role,
            min_offer: section.min_offer.unwrap_or(ResourceVector::ZERO),
            max_offers_per_cycle: section.max_offers_per_cycle,
            max_jobs_per_cycle: section.max_jobs_per_cycle,
        };

        info!(
            stock_size = config.stock_size,
            role       = %config.role,
            min_offer  = %config.min_offer,
            max_offers = ?config.max_offers_per_cycle,
            max_jobs   = ?config.max_jobs_per_cycle,
            "Planner configuration loaded"
        );

        Ok(config)
    }

    /// The reference planner configured with this file's offer floor.
    pub fn naive_planner(&self) -> NaivePlanner {
        NaivePlanner::with_min_offer(self.min_offer)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
