//! crates/journal_core/src/clock.rs
//!
//! The world clock: converts wall-clock instants into integer "world days"
//! counted from a fixed epoch.

use chrono::{DateTime, Utc};

/// The default world epoch, RFC 3339. Overridable via configuration.
pub const DEFAULT_EPOCH: &str = "2025-12-20T00:00:00Z";

const SECONDS_PER_DAY: i64 = 86_400;

/// Computes whole days elapsed since a fixed epoch instant.
///
/// The epoch is injected at construction rather than read from a global so
/// tests can run against any instant.
#[derive(Debug, Clone, Copy)]
pub struct WorldClock {
    epoch: DateTime<Utc>,
}

impl WorldClock {
    pub fn new(epoch: DateTime<Utc>) -> Self {
        Self { epoch }
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    /// `floor((now - epoch) / 86400s)`, clamped to 0 for any `now` earlier
    /// than the epoch. Clock skew must never produce a negative day.
    pub fn day_for(&self, now: DateTime<Utc>) -> u32 {
        let elapsed = (now - self.epoch).num_seconds();
        if elapsed <= 0 {
            return 0;
        }
        (elapsed / SECONDS_PER_DAY) as u32
    }
}
