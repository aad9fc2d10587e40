/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Wall-clock helpers for job bookkeeping.

use chrono::{DateTime, Duration, Utc};

/// Instant recorded on a job when it changes state.
pub type Timestamp = DateTime<Utc>;

/// Current time, truncated to whole milliseconds so timestamps survive an
/// RFC 3339 round-trip unchanged.
pub fn now() -> Timestamp {
    let t = Utc::now();
    let millis = t.timestamp_millis();
    DateTime::from_timestamp_millis(millis).unwrap_or(t)
}

/// `from` moved `secs` seconds into the past.
pub fn past(from: Timestamp, secs: i64) -> Timestamp {
    from - Duration::seconds(secs)
}

/// `later - earlier` in milliseconds.  Negative when the arguments are swapped.
pub fn diff_millis(later: Timestamp, earlier: Timestamp) -> i64 {
    (later - earlier).num_milliseconds()
}
