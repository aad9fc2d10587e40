/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-offer accumulator used during one planning pass.

use crate::job::Job;
use crate::offer::Offer;
use crate::resource::{ResourceError, ResourceVector};

/// Tracks what is left of one offer and which jobs have been placed on it.
///
/// Only the planner mutates an acceptor; once it is inside a
/// [`Plan`](super::Plan) the accessors below are the whole surface.
#[derive(Debug, Clone)]
pub struct OfferAcceptor {
    offer: Offer,
    role: String,
    remaining: ResourceVector,
    /// Assignment order — also the order of the launch call.
    jobs: Vec<Job>,
    /// `origins[k]` is the index of `jobs[k]` in the planner's input slice.
    origins: Vec<usize>,
}

impl OfferAcceptor {
    pub(crate) fn new(offer: Offer, role: &str) -> Self {
        OfferAcceptor {
            remaining: offer.resources,
            offer,
            role: role.to_string(),
            jobs: Vec::new(),
            origins: Vec::new(),
        }
    }

    pub fn offer(&self) -> &Offer {
        &self.offer
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn remaining(&self) -> &ResourceVector {
        &self.remaining
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// `(input index, scheduled job)` pairs in assignment order.
    pub fn assignments(&self) -> impl Iterator<Item = (usize, &Job)> + '_ {
        self.origins.iter().copied().zip(self.jobs.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Sum of the demands of every assigned job.
    pub fn used(&self) -> ResourceVector {
        self.jobs
            .iter()
            .fold(ResourceVector::ZERO, |acc, j| acc.add(&j.resources))
    }

    pub fn fits(&self, demand: &ResourceVector) -> bool {
        self.remaining.fits(demand)
    }

    /// Place `job` (taken from position `origin` of the planner's input) and
    /// charge its demand against the remaining capacity.
    ///
    /// On error the acceptor is unchanged.
    pub(crate) fn accept(&mut self, job: Job, origin: usize) -> Result<(), ResourceError> {
        self.remaining = self.remaining.subtract(&job.resources)?;
        self.jobs.push(job);
        self.origins.push(origin);
        Ok(())
    }

    pub fn into_parts(self) -> (Offer, Vec<Job>) {
        (self.offer, self.jobs)
    }
}
