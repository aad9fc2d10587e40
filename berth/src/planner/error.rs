/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Error type for planning and for the offer-cycle driver.
//!
//! Capacity shortfall is **not** in here.  A job that fits nowhere stays
//! `Queued` and the pass succeeds; only precondition violations surface as
//! errors.
//!
//! | Variant | Raised by |
//! |---|---|
//! | `Job` | a non-`Queued` job handed to the planner, an illegal status update |
//! | `Resource` | an acceptor asked to take a job that does not fit |
//! | `UnknownApplication` | `Driver::submit` for an unregistered application |
//! | `UnknownJob` | `Driver::on_status` for an id the driver never launched |

use thiserror::Error;

use crate::job::{JobError, JobId};
use crate::resource::ResourceError;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Job(#[from] JobError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("application '{app_id}' is not registered")]
    UnknownApplication { app_id: String },

    #[error("no launched job with id {id}")]
    UnknownJob { id: JobId },
}
