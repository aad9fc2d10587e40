/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Result of one planning pass.

use crate::job::Job;
use crate::offer::Offer;

use super::OfferAcceptor;

/// Three disjoint partitions over the offers handed to the planner.
///
/// `offer_acceptors().len() + to_stock().len() + to_keep().len()` always equals
/// the number of input offers.  Within each partition the input order is
/// preserved.
#[derive(Debug, Clone)]
pub struct Plan {
    offer_acceptors: Vec<OfferAcceptor>,
    to_stock: Vec<Offer>,
    to_keep: Vec<Offer>,
    role: String,
}

impl Plan {
    pub(crate) fn new(
        offer_acceptors: Vec<OfferAcceptor>,
        to_stock: Vec<Offer>,
        to_keep: Vec<Offer>,
        role: &str,
    ) -> Self {
        Plan {
            offer_acceptors,
            to_stock,
            to_keep,
            role: role.to_string(),
        }
    }

    /// Offers considered for placement, each with zero or more jobs.
    pub fn offer_acceptors(&self) -> &[OfferAcceptor] {
        &self.offer_acceptors
    }

    /// Offers withheld as standby capacity.
    pub fn to_stock(&self) -> &[Offer] {
        &self.to_stock
    }

    /// Offers neither used nor stocked.
    pub fn to_keep(&self) -> &[Offer] {
        &self.to_keep
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn offer_count(&self) -> usize {
        self.offer_acceptors.len() + self.to_stock.len() + self.to_keep.len()
    }

    /// Every scheduled job, acceptor by acceptor, in assignment order.
    pub fn scheduled_jobs(&self) -> impl Iterator<Item = &Job> + '_ {
        self.offer_acceptors.iter().flat_map(|a| a.jobs().iter())
    }

    /// `(input index, scheduled job)` for every placed job.  The index points
    /// into the `jobs` slice the planner was called with.
    pub fn assignments(&self) -> impl Iterator<Item = (usize, &Job)> + '_ {
        self.offer_acceptors.iter().flat_map(|a| a.assignments())
    }

    pub fn scheduled_count(&self) -> usize {
        self.offer_acceptors.iter().map(|a| a.jobs().len()).sum()
    }

    pub fn into_parts(self) -> (Vec<OfferAcceptor>, Vec<Offer>, Vec<Offer>) {
        (self.offer_acceptors, self.to_stock, self.to_keep)
    }
}
