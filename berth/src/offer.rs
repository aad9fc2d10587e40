/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Resource offers granted by the cluster manager.
//!
//! An [`Offer`] is valid for exactly one planning pass.  The planner borrows
//! the offer slice it is handed and clones the offers it routes into the
//! [`Plan`](crate::planner::Plan); it never keeps one across calls.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resource::ResourceVector;

/// Opaque offer identifier assigned by the cluster manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(pub String);

impl OfferId {
    /// A fresh random id, for offers synthesised outside a real cluster.
    pub fn random() -> Self {
        OfferId(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OfferId {
    fn from(s: &str) -> Self {
        OfferId(s.to_string())
    }
}

/// Identity of the agent (node) that granted an offer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub String);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        AgentId(s.to_string())
    }
}

/// One grant of resources from one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub agent: AgentId,
    #[serde(default)]
    pub hostname: String,
    pub resources: ResourceVector,
}

impl Offer {
    pub fn new(id: impl Into<OfferId>, agent: impl Into<AgentId>, resources: ResourceVector) -> Self {
        Offer {
            id: id.into(),
            agent: agent.into(),
            hostname: String::new(),
            resources,
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }
}
