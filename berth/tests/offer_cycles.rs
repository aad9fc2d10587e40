/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! End-to-end offer cycles: scenario file → driver → planner → outcomes.

use std::sync::Arc;

use berth::application::{AppJobPair, Application, Applications};
use berth::config::scenario::Scenario;
use berth::config::PlannerConfig;
use berth::driver::Driver;
use berth::job::{Job, JobState};
use berth::offer::Offer;
use berth::planner::{NaivePlanner, Planner};
use berth::resource::ResourceVector;

const SCENARIO: &str = r#"
applications:
  - id: anon
    owner: nobody
  - id: paused
    owner: nobody
    enabled: false
jobs:
  - { app_id: anon, cmd: "a", resources: { cpu: 8, mem_mb: 256 } }
  - { app_id: anon, cmd: "b", resources: { cpu: 8, mem_mb: 256 } }
  - { app_id: paused, cmd: "p", resources: { cpu: 1, mem_mb: 1 } }
  - { app_id: anon, cmd: "c", resources: { cpu: 8, mem_mb: 256 } }
  - { app_id: anon, cmd: "d", resources: { cpu: 8, mem_mb: 256 } }
cycles:
  - offers:
      - { id: o-0, agent: a-0, resources: { cpu: 16, mem_mb: 512 } }
      - { id: o-1, agent: a-1, resources: { cpu: 16, mem_mb: 512 } }
  - status:
      - { job: 0, state: RUNNING }
      - { job: 1, state: FAILED }
    offers:
      - { id: o-2, agent: a-0, resources: { cpu: 16, mem_mb: 512 } }
      - { id: o-3, agent: a-1, resources: { cpu: 16, mem_mb: 512 } }
"#;

fn build_driver(config: PlannerConfig, scenario: &Scenario) -> Driver {
    let mut registry = Applications::new();
    for app in &scenario.applications {
        registry.load(app.clone());
    }
    let planner = Box::new(config.naive_planner());
    let mut driver = Driver::new(planner, config, registry);
    for job in &scenario.jobs {
        driver.submit(job.clone()).unwrap();
    }
    driver
}

#[test]
fn scenario_replays_across_two_cycles() {
    let scenario = Scenario::from_yaml_str(SCENARIO).unwrap();
    let config = PlannerConfig::from_yaml_str("planner:\n  stock_size: 1\n  role: batch\n").unwrap();
    let mut driver = build_driver(config, &scenario);
    let mut cycles = scenario.cycles.into_iter();

    // Cycle 1: one acceptor (o-0), one stock (o-1); "a" and "b" fill o-0.
    let first = cycles.next().unwrap();
    let out = driver.on_offers(first.offers).unwrap();
    assert_eq!(out.launches.len(), 1);
    assert_eq!(out.launches[0].offer.to_string(), "o-0");
    assert_eq!(out.launches[0].role, "batch");
    let cmds: Vec<_> = out.launches[0].jobs.iter().map(Job::cmd).collect();
    assert_eq!(cmds, ["a", "b"]);
    assert_eq!(out.stocked.len(), 1);
    assert_eq!(out.still_queued, 3);

    // Cycle 2: status updates land, then "c" and "d" go out; "p" never does.
    let second = cycles.next().unwrap();
    for update in second.status {
        driver.on_status(update.job, update.state).unwrap();
    }
    let out = driver.on_offers(second.offers).unwrap();
    let ids: Vec<_> = out
        .launches
        .iter()
        .flat_map(|l| l.jobs.iter().filter_map(Job::id))
        .collect();
    assert_eq!(ids, [2, 3]);
    assert_eq!(out.still_queued, 1);

    let queue = driver.queue();
    assert_eq!(queue.iter().next().map(Job::cmd), Some("p"));
    assert_eq!(queue.get_launched(0).map(Job::state), Some(JobState::Running));
    assert_eq!(queue.get_launched(1).map(Job::state), Some(JobState::Failed));
    assert_eq!(queue.launched_in(JobState::Starting).count(), 2);
}

#[test]
fn partition_and_capacity_hold_across_shapes() {
    let app = Arc::new(Application::new("anon", "nobody"));
    let shapes = [(1.0, 16), (2.0, 64), (3.0, 100), (4.0, 128), (6.0, 200), (16.0, 512)];
    let planner = NaivePlanner::new();

    for n_offers in 0..7 {
        for stock in 0..4 {
            let offers: Vec<Offer> = (0..n_offers)
                .map(|i| {
                    let cpu = 8.0 + 4.0 * (i % 3) as f64;
                    Offer::new(
                        format!("o-{i}").as_str(),
                        "agent",
                        ResourceVector::new(cpu, 512, 0).unwrap(),
                    )
                })
                .collect();
            let jobs: Vec<AppJobPair> = (0..25)
                .map(|k| {
                    let (c, m) = shapes[(k * 7) % shapes.len()];
                    let job = Job::new("anon", format!("j{k}"), ResourceVector::new(c, m, 0).unwrap());
                    AppJobPair::new(Arc::clone(&app), job)
                })
                .collect();

            let plan = planner.plan(&offers, &jobs, stock, "nobody").unwrap();

            assert_eq!(
                plan.offer_acceptors().len() + plan.to_stock().len() + plan.to_keep().len(),
                offers.len()
            );
            assert_eq!(plan.to_stock().len(), stock.min(offers.len()));
            for acceptor in plan.offer_acceptors() {
                assert!(acceptor.offer().resources.fits(&acceptor.used()));
                assert!(acceptor.jobs().iter().all(|j| j.state() == JobState::Starting));
            }

            // A job left queued ahead of a placed one must not fit anywhere.
            let placed: Vec<usize> = {
                let mut v: Vec<_> = plan.assignments().map(|(i, _)| i).collect();
                v.sort_unstable();
                v
            };
            for &p in &placed {
                let later = &jobs[p].job.resources;
                for (e, earlier) in jobs[..p].iter().enumerate() {
                    if placed.binary_search(&e).is_err() && later.fits(&earlier.job.resources) {
                        assert!(plan
                            .offer_acceptors()
                            .iter()
                            .all(|a| !a.remaining().fits(&earlier.job.resources)));
                    }
                }
            }
        }
    }
}
