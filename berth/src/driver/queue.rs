/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! In-memory job store: a FIFO of waiting jobs plus the launched set.

use std::collections::{BTreeMap, VecDeque};

use crate::job::{Job, JobError, JobId, JobState};
use crate::planner::PlannerError;
use crate::timestamp::Timestamp;

/// Waiting jobs in submission order, and every job launched so far keyed by
/// its numeric id.
///
/// Launched jobs are kept after they reach a terminal state so callers can
/// still inspect them.
#[derive(Debug, Default)]
pub struct JobQueue {
    queued: VecDeque<Job>,
    launched: BTreeMap<JobId, Job>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `Queued` job at the tail.
    pub fn push(&mut self, job: Job) -> Result<(), JobError> {
        if job.state() != JobState::Queued {
            return Err(JobError::AlreadyScheduled {
                id: job.id(),
                state: job.state(),
            });
        }
        self.queued.push_back(job);
        Ok(())
    }

    /// Number of waiting jobs.
    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }

    /// Waiting jobs, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Job> + '_ {
        self.queued.iter()
    }

    pub fn get_launched(&self, id: JobId) -> Option<&Job> {
        self.launched.get(&id)
    }

    /// Launched jobs in id order.
    pub fn launched(&self) -> impl Iterator<Item = &Job> + '_ {
        self.launched.values()
    }

    pub fn launched_count(&self) -> usize {
        self.launched.len()
    }

    /// Launched jobs currently in `state`.
    pub fn launched_in(&self, state: JobState) -> impl Iterator<Item = &Job> + '_ {
        self.launched.values().filter(move |j| j.state() == state)
    }

    /// Remove the waiting job at `position` and return it `Killed`.
    pub fn cancel(&mut self, position: usize, at: Timestamp) -> Result<Option<Job>, JobError> {
        let Some(job) = self.queued.get(position) else {
            return Ok(None);
        };
        let killed = job.advance(JobState::Killed, at)?;
        self.queued.remove(position);
        Ok(Some(killed))
    }

    /// Drop the waiting jobs at `positions` (any order, duplicates ignored).
    pub(crate) fn remove_positions(&mut self, positions: &[usize]) {
        let mut sorted = positions.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        for pos in sorted {
            self.queued.remove(pos);
        }
    }

    /// Track a job the planner just moved to `Starting`.
    pub(crate) fn record_launched(&mut self, job: Job) {
        if let Some(id) = job.id() {
            self.launched.insert(id, job);
        }
    }

    pub(crate) fn advance_launched(
        &mut self,
        id: JobId,
        state: JobState,
        at: Timestamp,
    ) -> Result<&Job, PlannerError> {
        let slot = self
            .launched
            .get_mut(&id)
            .ok_or(PlannerError::UnknownJob { id })?;
        *slot = slot.advance(state, at)?;
        Ok(slot)
    }
}
