/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Jobs and their lifecycle.
//!
//! ```text
//!            schedule()            cluster            cluster
//!  Queued ───────────────► Starting ──────► Running ──────► Finished
//!    │                        │                │           Failed
//!    │                        └────────────────┴─────────► Killed
//!    └──────────────────────────────────────────────────► Killed
//! ```
//!
//! Only `Queued → Starting` belongs to the planner.  Every other edge is driven
//! by cluster status updates through [`Job::advance`].
//!
//! # Value semantics
//! A `Job` is never mutated in place by a transition.  [`Job::schedule`] and
//! [`Job::advance`] borrow the current value and return the next one; the
//! caller swaps it into whatever collection owns the job.  A queue snapshot
//! being walked by the planner therefore never changes underneath it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resource::ResourceVector;
use crate::timestamp::Timestamp;

/// Numeric job id, assigned once at scheduling time.
pub type JobId = u64;

// ── JobState ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    /// Submitted, waiting for capacity.
    #[default]
    Queued,
    /// Assigned to an offer; launch call pending.
    Starting,
    /// The cluster confirmed the task started.
    Running,
    Finished,
    Failed,
    Killed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Finished | JobState::Failed | JobState::Killed)
    }

    /// Edges reachable through [`Job::advance`].  `Queued → Starting` is
    /// deliberately absent; it goes through [`Job::schedule`].
    fn can_advance_to(self, next: JobState) -> bool {
        use JobState::*;
        matches!(
            (self, next),
            (Queued, Killed)
                | (Starting, Running)
                | (Starting, Finished)
                | (Starting, Failed)
                | (Starting, Killed)
                | (Running, Finished)
                | (Running, Failed)
                | (Running, Killed)
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Queued => "QUEUED",
            JobState::Starting => "STARTING",
            JobState::Running => "RUNNING",
            JobState::Finished => "FINISHED",
            JobState::Failed => "FAILED",
            JobState::Killed => "KILLED",
        };
        f.write_str(s)
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// A lifecycle precondition was violated.  Always a programming error on the
/// caller's side, never a capacity condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    /// `schedule()` was called on a job that is no longer `Queued`.
    #[error("job is already scheduled (id {id:?}, state {state})")]
    AlreadyScheduled { id: Option<JobId>, state: JobState },

    /// `advance()` was asked to take an edge the state machine does not have.
    #[error("illegal job state transition {from} -> {to}")]
    IllegalTransition { from: JobState, to: JobState },
}

// ── Job ───────────────────────────────────────────────────────────────────────

/// A unit of work submitted under an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    // ── Identity ──────────────────────────────────────────────────────────────
    /// Owning application (key into [`Applications`](crate::application::Applications)).
    pub app_id: String,

    /// Optional human-readable name.
    #[serde(default)]
    pub name: Option<String>,

    /// Command line handed to the executor.
    pub cmd: String,

    /// Environment properties.  `BTreeMap` keeps keys unique and the
    /// iteration order stable.
    #[serde(default)]
    pub props: BTreeMap<String, String>,

    /// Submitter-supplied priority.  Carried through for application-level
    /// policy; the greedy planner ignores it.
    #[serde(default)]
    pub priority: i32,

    // ── Demand ────────────────────────────────────────────────────────────────
    pub resources: ResourceVector,

    // ── Lifecycle (owned by the state machine) ────────────────────────────────
    #[serde(default)]
    id: Option<JobId>,
    #[serde(default)]
    state: JobState,
    #[serde(default)]
    scheduled: Option<Timestamp>,
    #[serde(default)]
    started: Option<Timestamp>,
    #[serde(default)]
    finished: Option<Timestamp>,
}

impl Job {
    /// A new `Queued` job with no id and no properties.
    pub fn new(app_id: impl Into<String>, cmd: impl Into<String>, resources: ResourceVector) -> Self {
        Job {
            app_id: app_id.into(),
            name: None,
            cmd: cmd.into(),
            props: BTreeMap::new(),
            priority: 0,
            resources,
            id: None,
            state: JobState::Queued,
            scheduled: None,
            started: None,
            finished: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_props(mut self, props: BTreeMap<String, String>) -> Self {
        self.props = props;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn id(&self) -> Option<JobId> {
        self.id
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn scheduled(&self) -> Option<Timestamp> {
        self.scheduled
    }

    pub fn started(&self) -> Option<Timestamp> {
        self.started
    }

    pub fn finished(&self) -> Option<Timestamp> {
        self.finished
    }

    /// `Queued → Starting`: returns the scheduled copy carrying `id` and `at`.
    ///
    /// # Errors
    /// [`JobError::AlreadyScheduled`] if `self` is not `Queued`.
    pub fn schedule(&self, id: JobId, at: Timestamp) -> Result<Job, JobError> {
        if self.state != JobState::Queued {
            return Err(JobError::AlreadyScheduled {
                id: self.id,
                state: self.state,
            });
        }
        Ok(Job {
            id: Some(id),
            state: JobState::Starting,
            scheduled: Some(at),
            ..self.clone()
        })
    }

    /// Apply a cluster status update.
    ///
    /// `Running` records `started`; terminal states record `finished`.
    ///
    /// # Errors
    /// [`JobError::IllegalTransition`] for any edge not in the diagram above,
    /// including every edge out of a terminal state.
    pub fn advance(&self, next: JobState, at: Timestamp) -> Result<Job, JobError> {
        if !self.state.can_advance_to(next) {
            return Err(JobError::IllegalTransition {
                from: self.state,
                to: next,
            });
        }
        let mut job = self.clone();
        job.state = next;
        if next == JobState::Running {
            job.started = Some(at);
        }
        if next.is_terminal() {
            job.finished = Some(at);
        }
        Ok(job)
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "job#{id}")?,
            None => write!(f, "job(unscheduled)")?,
        }
        if let Some(name) = &self.name {
            write!(f, " '{name}'")?;
        }
        write!(f, " [{}] app={} {}", self.state, self.app_id, self.resources)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
