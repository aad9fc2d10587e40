/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Applications and the registry that resolves them.
//!
//! Every job is submitted under an application.  The planner does not look
//! applications up itself — the caller resolves each queued job once per pass
//! and hands the planner an [`AppJobPair`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::job::Job;

/// Application-level defaults shared by every job submitted under it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,

    /// Submitting user / key id.
    #[serde(default)]
    pub owner: String,

    /// Default container image for the application's jobs.  `None` runs the
    /// command directly on the agent.
    #[serde(default)]
    pub container_image: Option<String>,

    #[serde(default)]
    pub priority: i32,

    /// Jobs of a disabled application stay queued.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Application {
    pub fn new(id: impl Into<String>, owner: impl Into<String>) -> Self {
        Application {
            id: id.into(),
            owner: owner.into(),
            container_image: None,
            priority: 0,
            enabled: true,
        }
    }
}

/// A queued job together with the application it belongs to.
///
/// Built fresh for every planning pass; never persisted.
#[derive(Debug, Clone)]
pub struct AppJobPair {
    pub app: Arc<Application>,
    pub job: Job,
}

impl AppJobPair {
    pub fn new(app: Arc<Application>, job: Job) -> Self {
        AppJobPair { app, job }
    }
}

/// In-memory application registry keyed by application id.
#[derive(Debug, Default, Clone)]
pub struct Applications {
    apps: HashMap<String, Arc<Application>>,
}

impl Applications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<Arc<Application>> {
        self.apps.get(id).cloned()
    }

    /// Insert `app`, replacing any previous entry with the same id.
    pub fn load(&mut self, app: Application) {
        debug!(app = %app.id, owner = %app.owner, enabled = app.enabled, "application loaded");
        self.apps.insert(app.id.clone(), Arc::new(app));
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_unknown_is_none() {
        assert!(Applications::new().get("nope").is_none());
    }

    #[test]
    fn load_replaces_existing_entry() {
        let mut reg = Applications::new();
        reg.load(Application::new("anon", "alice"));
        let mut disabled = Application::new("anon", "bob");
        disabled.enabled = false;
        reg.load(disabled);

        assert_eq!(reg.len(), 1);
        let app = reg.get("anon").unwrap();
        assert_eq!(app.owner, "bob");
        assert!(!app.enabled);
    }

    #[test]
    fn yaml_application_is_enabled_by_default() {
        let app: Application = serde_yaml::from_str("id: anon\n").unwrap();
        assert!(app.enabled);
        assert_eq!(app.container_image, None);
    }
}
