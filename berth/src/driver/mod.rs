/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Offer-cycle driver.
//!
//! The driver is the single writer around the planner.  It owns the job
//! queue, resolves applications, calls the [`Planner`] once per offer batch,
//! and turns the resulting [`Plan`](crate::planner::Plan) into the actions a
//! cluster-manager client would issue:
//!
//! ```text
//!  offers ──► Driver::on_offers ──► Planner::plan_with_ids ──► Plan
//!                  │                                            │
//!                  │◄──────── scheduled jobs leave the queue ◄──┘
//!                  ▼
//!            CycleOutcome { launches, stocked, declined }
//! ```
//!
//! Status updates from the cluster come back through [`Driver::on_status`].
//!
//! # Concurrency
//! `Driver` methods take `&mut self`; overlapping planning passes are ruled
//! out by the borrow checker.  A multi-threaded host wraps the driver in a
//! `Mutex` and calls it from one scheduling task.

pub mod queue;

pub use queue::JobQueue;

use tracing::{debug, info, warn};

use crate::application::{AppJobPair, Applications};
use crate::config::PlannerConfig;
use crate::job::{Job, JobId, JobState};
use crate::offer::{AgentId, Offer, OfferId};
use crate::planner::{IdCounter, Planner, PlannerError};
use crate::timestamp;

// ── Outcome types ─────────────────────────────────────────────────────────────

/// One launch call: every job bundled against a single offer.
#[derive(Debug, Clone)]
pub struct Launch {
    pub offer: OfferId,
    pub agent: AgentId,
    pub role: String,
    /// In assignment order, all `Starting`.
    pub jobs: Vec<Job>,
}

/// What the cluster-manager client should do with one offer batch.
#[derive(Debug, Clone, Default)]
pub struct CycleOutcome {
    /// Sequence number of this cycle, starting at 1.
    pub cycle: u64,
    pub launches: Vec<Launch>,
    /// Offers to hold as standby capacity.
    pub stocked: Vec<OfferId>,
    /// Offers to decline: `to_keep`, empty acceptors, and anything over the
    /// per-cycle offer bound.
    pub declined: Vec<OfferId>,
    /// Jobs still waiting after this cycle.
    pub still_queued: usize,
}

impl CycleOutcome {
    pub fn launched_count(&self) -> usize {
        self.launches.iter().map(|l| l.jobs.len()).sum()
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

pub struct Driver {
    planner: Box<dyn Planner>,
    config: PlannerConfig,
    registry: Applications,
    queue: JobQueue,
    ids: IdCounter,
    cycles: u64,
}

impl Driver {
    pub fn new(planner: Box<dyn Planner>, config: PlannerConfig, registry: Applications) -> Self {
        info!(
            planner    = planner.name(),
            stock_size = config.stock_size,
            role       = %config.role,
            apps       = registry.len(),
            "driver initialised"
        );
        Driver {
            planner,
            config,
            registry,
            queue: JobQueue::new(),
            ids: IdCounter::new(0),
            cycles: 0,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Applications {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Applications {
        &mut self.registry
    }

    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    /// Accept a newly submitted job into the queue.
    ///
    /// # Errors
    /// * [`PlannerError::UnknownApplication`] — `job.app_id` is not registered.
    /// * [`PlannerError::Job`] — `job` is not `Queued`.
    pub fn submit(&mut self, job: Job) -> Result<(), PlannerError> {
        if self.registry.get(&job.app_id).is_none() {
            return Err(PlannerError::UnknownApplication {
                app_id: job.app_id.clone(),
            });
        }
        self.queue.push(job)?;
        Ok(())
    }

    /// Kill the queued job at `position` (0 = oldest).  Returns the killed job,
    /// or `None` if there is no such position.
    pub fn cancel_queued(&mut self, position: usize) -> Result<Option<Job>, PlannerError> {
        Ok(self.queue.cancel(position, timestamp::now())?)
    }

    /// Run one planning pass over `offers`.
    ///
    /// Jobs whose application has disappeared from the registry since
    /// submission are skipped for this cycle and stay queued.
    ///
    /// # Errors
    /// Propagates [`PlannerError`] from the planner; the queue is unchanged in
    /// that case.
    pub fn on_offers(&mut self, mut offers: Vec<Offer>) -> Result<CycleOutcome, PlannerError> {
        self.cycles += 1;
        let mut outcome = CycleOutcome {
            cycle: self.cycles,
            ..Default::default()
        };

        // ── Caller-side bounds ────────────────────────────────────────────────
        if let Some(max) = self.config.max_offers_per_cycle {
            if offers.len() > max {
                let excess = offers.split_off(max);
                warn!(
                    cycle   = self.cycles,
                    offered = max + excess.len(),
                    bound   = max,
                    "offer batch over bound, declining the excess"
                );
                outcome.declined.extend(excess.into_iter().map(|o| o.id));
            }
        }
        let job_limit = self.config.max_jobs_per_cycle.unwrap_or(usize::MAX);

        // ── Snapshot ──────────────────────────────────────────────────────────
        let mut pairs: Vec<AppJobPair> = Vec::new();
        let mut positions: Vec<usize> = Vec::new();
        for (pos, job) in self.queue.iter().enumerate().take(job_limit) {
            match self.registry.get(&job.app_id) {
                Some(app) => {
                    pairs.push(AppJobPair::new(app, job.clone()));
                    positions.push(pos);
                }
                None => warn!(app = %job.app_id, job = %job, "application no longer registered, skipping"),
            }
        }

        // ── Plan ──────────────────────────────────────────────────────────────
        let plan = self.planner.plan_with_ids(
            &offers,
            &pairs,
            self.config.stock_size,
            &self.config.role,
            &mut self.ids,
        )?;

        // ── Persist Queued → Starting ─────────────────────────────────────────
        let scheduled_positions: Vec<usize> =
            plan.assignments().map(|(origin, _)| positions[origin]).collect();
        self.queue.remove_positions(&scheduled_positions);

        let (acceptors, to_stock, to_keep) = plan.into_parts();
        for acceptor in acceptors {
            let role = acceptor.role().to_string();
            let (offer, jobs) = acceptor.into_parts();
            if jobs.is_empty() {
                outcome.declined.push(offer.id);
                continue;
            }
            for job in &jobs {
                self.queue.record_launched(job.clone());
            }
            debug!(offer = %offer.id, agent = %offer.agent, jobs = jobs.len(), "launch");
            outcome.launches.push(Launch {
                offer: offer.id,
                agent: offer.agent,
                role,
                jobs,
            });
        }
        outcome.stocked = to_stock.into_iter().map(|o| o.id).collect();
        outcome.declined.extend(to_keep.into_iter().map(|o| o.id));
        outcome.still_queued = self.queue.len();

        info!(
            cycle    = outcome.cycle,
            launches = outcome.launches.len(),
            launched = outcome.launched_count(),
            stocked  = outcome.stocked.len(),
            declined = outcome.declined.len(),
            queued   = outcome.still_queued,
            "offer cycle complete"
        );

        Ok(outcome)
    }

    /// Apply a cluster status update to a launched job.
    ///
    /// # Errors
    /// * [`PlannerError::UnknownJob`] — `id` was never launched by this driver.
    /// * [`PlannerError::Job`] — the transition is illegal for the job's
    ///   current state.
    pub fn on_status(&mut self, id: JobId, state: JobState) -> Result<&Job, PlannerError> {
        let job = self.queue.advance_launched(id, state, timestamp::now())?;
        info!(job = id, state = %job.state(), "status update applied");
        Ok(job)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Application;
    use crate::planner::{NaivePlanner, Plan};
    use crate::resource::ResourceVector;

    fn rv(cpu: f64, mem: u64) -> ResourceVector {
        ResourceVector::new(cpu, mem, 0).unwrap()
    }

    fn offers(n: usize) -> Vec<Offer> {
        (0..n)
            .map(|i| Offer::new(format!("o-{i}").as_str(), format!("a-{i}").as_str(), rv(16.0, 512)))
            .collect()
    }

    fn driver(config: PlannerConfig) -> Driver {
        let mut reg = Applications::new();
        reg.load(Application::new("anon", "nobody"));
        Driver::new(Box::new(NaivePlanner::new()), config, reg)
    }

    fn submit_n(d: &mut Driver, n: usize, cpu: f64, mem: u64) {
        for i in 0..n {
            d.submit(Job::new("anon", format!("cmd-{i}"), rv(cpu, mem)))
                .unwrap();
        }
    }

    // ── submit ────────────────────────────────────────────────────────────────

    #[test]
    fn submit_rejects_unknown_application() {
        let mut d = driver(PlannerConfig::default());
        let err = d.submit(Job::new("ghost", "cmd", rv(1.0, 1))).unwrap_err();
        assert!(matches!(err, PlannerError::UnknownApplication { app_id } if app_id == "ghost"));
        assert!(d.queue().is_empty());
    }

    #[test]
    fn submit_rejects_scheduled_job() {
        let mut d = driver(PlannerConfig::default());
        let job = Job::new("anon", "cmd", rv(1.0, 1))
            .schedule(0, timestamp::now())
            .unwrap();
        assert!(matches!(d.submit(job), Err(PlannerError::Job(_))));
    }

    // ── on_offers ─────────────────────────────────────────────────────────────

    #[test]
    fn cycle_launches_stocks_and_declines() {
        let mut d = driver(PlannerConfig {
            stock_size: 1,
            role: "nobody".into(),
            ..Default::default()
        });
        submit_n(&mut d, 8, 4.0, 128);

        let out = d.on_offers(offers(4)).unwrap();

        assert_eq!(out.cycle, 1);
        assert_eq!(out.launches.len(), 2);
        assert_eq!(out.launched_count(), 8);
        assert_eq!(out.stocked, [OfferId::from("o-3")]);
        // the empty acceptor is declined
        assert_eq!(out.declined, [OfferId::from("o-2")]);
        assert_eq!(out.still_queued, 0);
        assert!(out.launches.iter().all(|l| l.role == "nobody"));
        assert!(d.queue().is_empty());
        assert_eq!(d.queue().launched_count(), 8);
    }

    #[test]
    fn ids_stay_unique_across_cycles() {
        let mut d = driver(PlannerConfig::default());
        submit_n(&mut d, 6, 16.0, 512);

        let first = d.on_offers(offers(2)).unwrap();
        let second = d.on_offers(offers(2)).unwrap();
        let third = d.on_offers(offers(2)).unwrap();

        let ids: Vec<JobId> = [first, second, third]
            .iter()
            .flat_map(|o| o.launches.iter().flat_map(|l| l.jobs.iter().filter_map(Job::id)))
            .collect();
        assert_eq!(ids, [0, 1, 2, 3, 4, 5]);
        assert!(d.queue().is_empty());
    }

    #[test]
    fn unplaced_jobs_keep_their_queue_order() {
        let mut d = driver(PlannerConfig::default());
        d.submit(Job::new("anon", "big", rv(32.0, 64))).unwrap();
        d.submit(Job::new("anon", "small", rv(1.0, 1))).unwrap();
        d.submit(Job::new("anon", "huge", rv(64.0, 64))).unwrap();

        let out = d.on_offers(offers(1)).unwrap();

        assert_eq!(out.launched_count(), 1);
        let left: Vec<_> = d.queue().iter().map(|j| j.cmd().to_string()).collect();
        assert_eq!(left, ["big", "huge"]);
        assert!(d.queue().iter().all(|j| j.state() == JobState::Queued));
    }

    #[test]
    fn offer_bound_declines_excess() {
        let mut d = driver(PlannerConfig {
            max_offers_per_cycle: Some(2),
            ..Default::default()
        });
        let out = d.on_offers(offers(5)).unwrap();
        // 3 over the bound + 2 empty acceptors
        assert_eq!(out.declined.len(), 5);
        assert!(out.declined.contains(&OfferId::from("o-4")));
    }

    #[test]
    fn job_bound_limits_snapshot_to_oldest() {
        let mut d = driver(PlannerConfig {
            max_jobs_per_cycle: Some(2),
            ..Default::default()
        });
        submit_n(&mut d, 5, 1.0, 1);
        let out = d.on_offers(offers(1)).unwrap();
        assert_eq!(out.launched_count(), 2);
        assert_eq!(out.still_queued, 3);
        let cmds: Vec<_> = out.launches[0].jobs.iter().map(|j| j.cmd().to_string()).collect();
        assert_eq!(cmds, ["cmd-0", "cmd-1"]);
    }

    #[test]
    fn jobs_of_removed_application_stay_queued() {
        let mut d = driver(PlannerConfig::default());
        submit_n(&mut d, 1, 1.0, 1);
        *d.registry_mut() = Applications::new();
        let out = d.on_offers(offers(1)).unwrap();
        assert_eq!(out.launched_count(), 0);
        assert_eq!(out.still_queued, 1);
    }

    // ── on_status ─────────────────────────────────────────────────────────────

    #[test]
    fn status_updates_walk_the_lifecycle() {
        let mut d = driver(PlannerConfig::default());
        submit_n(&mut d, 1, 1.0, 1);
        d.on_offers(offers(1)).unwrap();

        assert_eq!(d.on_status(0, JobState::Running).unwrap().state(), JobState::Running);
        let done = d.on_status(0, JobState::Finished).unwrap();
        assert_eq!(done.state(), JobState::Finished);
        assert!(done.finished().is_some());

        let err = d.on_status(0, JobState::Running).unwrap_err();
        assert!(matches!(err, PlannerError::Job(_)));
    }

    #[test]
    fn status_for_unknown_job_is_an_error() {
        let mut d = driver(PlannerConfig::default());
        assert!(matches!(
            d.on_status(42, JobState::Running),
            Err(PlannerError::UnknownJob { id: 42 })
        ));
    }

    #[test]
    fn cancel_queued_kills_and_removes() {
        let mut d = driver(PlannerConfig::default());
        submit_n(&mut d, 2, 1.0, 1);
        let killed = d.cancel_queued(0).unwrap().unwrap();
        assert_eq!(killed.state(), JobState::Killed);
        assert_eq!(d.queue().len(), 1);
        assert!(d.cancel_queued(5).unwrap().is_none());
    }

    // ── Planner substitution ──────────────────────────────────────────────────

    /// Stocks every offer and places nothing.
    struct HoardEverything;

    impl Planner for HoardEverything {
        fn name(&self) -> &'static str {
            "hoard"
        }

        fn plan_with_ids(
            &self,
            offers: &[Offer],
            jobs: &[AppJobPair],
            _stock_size: usize,
            role: &str,
            ids: &mut IdCounter,
        ) -> Result<Plan, PlannerError> {
            NaivePlanner::new().plan_with_ids(offers, jobs, offers.len(), role, ids)
        }
    }

    #[test]
    fn alternative_policy_plugs_in() {
        let mut reg = Applications::new();
        reg.load(Application::new("anon", "nobody"));
        let mut d = Driver::new(Box::new(HoardEverything), PlannerConfig::default(), reg);
        submit_n(&mut d, 3, 1.0, 1);

        let out = d.on_offers(offers(3)).unwrap();

        assert_eq!(out.stocked.len(), 3);
        assert!(out.launches.is_empty());
        assert_eq!(out.still_queued, 3);
    }
}
