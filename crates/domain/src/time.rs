//! Time and timestamp helpers.

use std::time::Instant;

use chrono::{DateTime, Utc};

/// UTC timestamp used for `created_at`, `last_executed`, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Half-open creation-time window `(after, until]` used to pick events
/// that have not been handled yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedWindow {
    /// Exclusive lower bound; `None` means "since forever".
    pub after: Option<Timestamp>,
    /// Inclusive upper bound.
    pub until: Timestamp,
}

impl CreatedWindow {
    /// Everything created up to and including `until`.
    #[must_use]
    pub fn up_to(until: Timestamp) -> Self {
        Self { after: None, until }
    }

    #[must_use]
    pub fn contains(&self, ts: Timestamp) -> bool {
        self.after.is_none_or(|after| ts > after) && ts <= self.until
    }
}

/// The latest representable instant strictly before `ts`.
///
/// Used as a `last_executed` watermark so an event created at `ts` still
/// falls inside the next `(after, until]` window.
#[must_use]
pub fn just_before(ts: Timestamp) -> Timestamp {
    ts - chrono::Duration::nanoseconds(1)
}

/// Whole milliseconds elapsed since `start`, saturating at `u64::MAX`.
#[must_use]
pub fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
