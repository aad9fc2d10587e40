/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Offer/job matching.
//!
//! A [`Planner`] turns one batch of [`Offer`]s and a snapshot of the job queue
//! into a [`Plan`]: which jobs run on which offer, which offers are held back
//! as stock, and which are handed back to the cluster.
//!
//! [`NaivePlanner`] is the reference policy — one greedy first-fit walk in
//! submission order.
//!
//! # Properties
//!
//! | Property | How it holds |
//! |---|---|
//! | Partition | Every input offer lands in exactly one of acceptors / stock / keep |
//! | No over-commit | An acceptor only takes a job its remaining vector `fits`; `subtract` is checked |
//! | FCFS | Jobs are walked once, oldest first, never reordered for packing efficiency |
//! | Determinism | No hashing, no randomness — output depends only on input order and values |
//! | Backpressure | A job that fits nowhere stays `Queued`; that is not an error |
//! | Statelessness | All per-pass state is local to `plan_with_ids()` |
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//! use berth::application::{AppJobPair, Application};
//! use berth::job::{Job, JobState};
//! use berth::offer::Offer;
//! use berth::planner::{NaivePlanner, Planner};
//! use berth::resource::ResourceVector;
//!
//! let app = Arc::new(Application::new("anon", "nobody"));
//! let offers = vec![Offer::new("o-0", "a-0", ResourceVector::new(16.0, 512, 0).unwrap())];
//! let jobs = vec![AppJobPair::new(app, Job::new("anon", "cmd", ResourceVector::new(4.0, 128, 0).unwrap()))];
//!
//! let plan = NaivePlanner::new().plan(&offers, &jobs, 0, "nobody").unwrap();
//! assert_eq!(plan.offer_acceptors()[0].jobs()[0].state(), JobState::Starting);
//! ```

pub mod acceptor;
pub mod error;
pub mod plan;

pub use acceptor::OfferAcceptor;
pub use error::PlannerError;
pub use plan::Plan;

use tracing::{debug, info};

use crate::application::AppJobPair;
use crate::job::{JobError, JobId, JobState};
use crate::offer::Offer;
use crate::resource::ResourceVector;
use crate::timestamp;

// ── IdCounter ─────────────────────────────────────────────────────────────────

/// Hands out job ids in increasing order.
#[derive(Copy, Clone, Default, Debug)]
pub struct IdCounter {
    counter: JobId,
}

impl IdCounter {
    pub fn new(initial_value: JobId) -> Self {
        Self {
            counter: initial_value,
        }
    }

    /// Return the current value and move past it.
    pub fn increment(&mut self) -> JobId {
        let value = self.counter;
        self.counter += 1;
        value
    }

    /// The id the next `increment()` will return.
    pub fn peek(&self) -> JobId {
        self.counter
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

/// A packing policy.
///
/// Implementations must be pure with respect to their inputs: the offers and
/// the job snapshot are only read, and the returned [`Plan`] carries scheduled
/// copies of the placed jobs.
pub trait Planner: Send + Sync {
    /// Short policy name for logs.
    fn name(&self) -> &'static str;

    /// Plan one pass, drawing job ids from `ids`.
    ///
    /// # Errors
    /// [`PlannerError::Job`] if any job in `jobs` is not `Queued`.
    fn plan_with_ids(
        &self,
        offers: &[Offer],
        jobs: &[AppJobPair],
        stock_size: usize,
        role: &str,
        ids: &mut IdCounter,
    ) -> Result<Plan, PlannerError>;

    /// Plan one pass with ids numbered from `0` in assignment order.
    fn plan(
        &self,
        offers: &[Offer],
        jobs: &[AppJobPair],
        stock_size: usize,
        role: &str,
    ) -> Result<Plan, PlannerError> {
        let mut ids = IdCounter::new(0);
        self.plan_with_ids(offers, jobs, stock_size, role, &mut ids)
    }
}

// ── NaivePlanner ──────────────────────────────────────────────────────────────

/// Greedy first-fit in submission order.
///
/// 1. Offers that do not cover `min_offer` go to `to_keep`.
/// 2. Of the rest, the **last** `min(stock_size, n)` go to `to_stock`.
/// 3. The remaining offers become acceptors, in input order.
/// 4. Each job (oldest first) goes to the first acceptor, at or after the
///    cursor, whose remaining capacity fits it.  Jobs that fit nowhere stay
///    `Queued`.
///
/// The cursor only moves forward: an acceptor is passed over for good once it
/// cannot fit the component-wise minimum demand of every job not yet walked,
/// because no later job can use it.  With equal-sized jobs this degenerates to
/// "fill acceptor 0, then 1, …".
#[derive(Debug, Clone, Default)]
pub struct NaivePlanner {
    min_offer: ResourceVector,
}

impl NaivePlanner {
    /// A planner with no offer floor — `to_keep` is always empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// A planner that returns offers smaller than `floor` to the cluster.
    pub fn with_min_offer(floor: ResourceVector) -> Self {
        NaivePlanner { min_offer: floor }
    }

    pub fn min_offer(&self) -> &ResourceVector {
        &self.min_offer
    }

    /// `floors[i]` = component-wise minimum demand over `jobs[i..]`.
    fn suffix_minimums(jobs: &[(usize, &AppJobPair)]) -> Vec<ResourceVector> {
        let mut floors = Vec::with_capacity(jobs.len());
        let mut acc: Option<ResourceVector> = None;
        for (_, pair) in jobs.iter().rev() {
            let demand = pair.job.resources;
            let next = match acc {
                Some(m) => m.min(&demand),
                None => demand,
            };
            floors.push(next);
            acc = Some(next);
        }
        floors.reverse();
        floors
    }
}

impl Planner for NaivePlanner {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn plan_with_ids(
        &self,
        offers: &[Offer],
        jobs: &[AppJobPair],
        stock_size: usize,
        role: &str,
        ids: &mut IdCounter,
    ) -> Result<Plan, PlannerError> {
        // ── Preconditions ─────────────────────────────────────────────────────
        if let Some(pair) = jobs.iter().find(|p| p.job.state() != JobState::Queued) {
            return Err(JobError::AlreadyScheduled {
                id: pair.job.id(),
                state: pair.job.state(),
            }
            .into());
        }

        // ── Partition offers ──────────────────────────────────────────────────
        let (usable, too_small): (Vec<&Offer>, Vec<&Offer>) = offers
            .iter()
            .partition(|o| o.resources.fits(&self.min_offer));
        let to_keep: Vec<Offer> = too_small.into_iter().cloned().collect();

        let stock_count = stock_size.min(usable.len());
        let split = usable.len() - stock_count;
        let to_stock: Vec<Offer> = usable[split..].iter().map(|o| (*o).clone()).collect();
        let mut acceptors: Vec<OfferAcceptor> = usable[..split]
            .iter()
            .map(|o| OfferAcceptor::new((*o).clone(), role))
            .collect();

        // ── Application policy ────────────────────────────────────────────────
        let placeable: Vec<(usize, &AppJobPair)> = jobs
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                if !p.app.enabled {
                    debug!(app = %p.app.id, job = %p.job, "application disabled, job stays queued");
                }
                p.app.enabled
            })
            .collect();

        // ── Pack ──────────────────────────────────────────────────────────────
        let floors = Self::suffix_minimums(&placeable);
        let mut cursor = 0usize;
        let mut scheduled = 0usize;

        for (i, &(origin, pair)) in placeable.iter().enumerate() {
            while cursor < acceptors.len() && !acceptors[cursor].fits(&floors[i]) {
                cursor += 1;
            }
            if cursor == acceptors.len() {
                debug!(
                    remaining = placeable.len() - i,
                    "all acceptors exhausted, remaining jobs stay queued"
                );
                break;
            }

            let demand = &pair.job.resources;
            let Some(offset) = acceptors[cursor..].iter().position(|a| a.fits(demand)) else {
                debug!(job = %pair.job, "no acceptor fits, job stays queued");
                continue;
            };
            let slot = cursor + offset;

            let job = pair.job.schedule(ids.increment(), timestamp::now())?;
            let target = &mut acceptors[slot];
            debug!(
                job   = %job,
                offer = %target.offer().id,
                agent = %target.offer().agent,
                "job assigned"
            );
            target.accept(job, origin)?;
            scheduled += 1;
        }

        let plan = Plan::new(acceptors, to_stock, to_keep, role);

        info!(
            planner    = self.name(),
            role       = role,
            offers     = offers.len(),
            jobs       = jobs.len(),
            acceptors  = plan.offer_acceptors().len(),
            stock      = plan.to_stock().len(),
            keep       = plan.to_keep().len(),
            scheduled  = scheduled,
            queued     = jobs.len() - scheduled,
            "=== planning pass complete ==="
        );

        Ok(plan)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
