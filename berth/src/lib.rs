/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Berth – offer/job matching for a cluster job queue
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── resource      – ResourceVector (cpu / mem / disk / gpu / ports)
//! ├── offer         – resource offers from the cluster manager
//! ├── job           – jobs and their lifecycle state machine
//! ├── application   – applications, registry, AppJobPair
//! ├── timestamp     – wall-clock helpers for job bookkeeping
//! ├── planner/      – Planner trait, NaivePlanner, OfferAcceptor, Plan
//! ├── driver/       – offer-cycle driver and in-memory job queue
//! └── config/       – YAML planner configuration and scenario files
//! ```

pub mod application;
pub mod config;
pub mod driver;
pub mod job;
pub mod offer;
pub mod planner;
pub mod resource;
pub mod timestamp;
