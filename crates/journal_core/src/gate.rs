//! crates/journal_core/src/gate.rs
//!
//! The submission gate: client-local heuristics that limit how often and
//! what a user may submit. Every check is advisory — the state lives in a
//! `GateStore` scoped to one client and is trivially cleared, so the gate
//! fails open whenever that storage misbehaves.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::ports::GateStore;

const KEY_LAST_DAY: &str = "last_day";
const KEY_LAST_SUBMIT_AT: &str = "last_submit_at";

fn day_text_key(day: u32) -> String {
    format!("day_text:{day}")
}

/// Collapses a submission body to its comparable form: trimmed, internal
/// whitespace runs squashed to one space, lowercased.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Tunable limits for the gate. Defaults match the richest variant of the
/// product: 12-character floor and one minute between submissions.
#[derive(Debug, Clone)]
pub struct GatePolicy {
    pub min_text_len: usize,
    pub min_interval: Duration,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            min_text_len: 12,
            min_interval: Duration::seconds(60),
        }
    }
}

/// Why a submission was turned away. The `Display` form is shown to the
/// user as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateReason {
    TooShort { min: usize },
    AlreadySubmittedToday,
    TooSoon { retry_after_secs: i64 },
    DuplicateText,
}

impl fmt::Display for GateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateReason::TooShort { min } => {
                write!(f, "Entry must be at least {min} characters long")
            }
            GateReason::AlreadySubmittedToday => {
                write!(f, "You already wrote an entry today; come back tomorrow")
            }
            GateReason::TooSoon { retry_after_secs } => {
                write!(f, "Please wait {retry_after_secs}s before writing again")
            }
            GateReason::DuplicateText => {
                write!(f, "You already sealed these exact words today")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Rejected(GateReason),
}

/// Evaluates the local submission heuristics against a `GateStore`.
pub struct SubmissionGate<S> {
    policy: GatePolicy,
    store: S,
}

impl<S: GateStore> SubmissionGate<S> {
    pub fn new(policy: GatePolicy, store: S) -> Self {
        Self { policy, store }
    }

    /// Runs the four checks in order: length floor, daily cap, minimum
    /// interval, duplicate suppression. Storage failures make the affected
    /// check pass.
    pub fn check(&self, now: DateTime<Utc>, day: u32, text: &str) -> GateDecision {
        let trimmed = text.trim();
        if trimmed.chars().count() < self.policy.min_text_len {
            return GateDecision::Rejected(GateReason::TooShort {
                min: self.policy.min_text_len,
            });
        }

        if let Some(last_day) = self.read(KEY_LAST_DAY) {
            if last_day.parse::<u32>() == Ok(day) {
                return GateDecision::Rejected(GateReason::AlreadySubmittedToday);
            }
        }

        if let Some(stamp) = self.read(KEY_LAST_SUBMIT_AT) {
            if let Ok(last_at) = DateTime::parse_from_rfc3339(&stamp) {
                let elapsed = now.signed_duration_since(last_at.with_timezone(&Utc));
                if elapsed < self.policy.min_interval {
                    let wait = (self.policy.min_interval - elapsed).num_seconds().max(1);
                    return GateDecision::Rejected(GateReason::TooSoon {
                        retry_after_secs: wait,
                    });
                }
            }
        }

        if let Some(previous) = self.read(&day_text_key(day)) {
            if previous == normalize(text) {
                return GateDecision::Rejected(GateReason::DuplicateText);
            }
        }

        GateDecision::Allowed
    }

    /// Persists the day marker, timestamp and normalized text after a
    /// successful insert. Best-effort: a failing store turns this into a
    /// no-op rather than an error surfaced to the user.
    pub fn record_submission(&self, now: DateTime<Utc>, day: u32, text: &str) {
        let _ = self.store.put(KEY_LAST_DAY, &day.to_string());
        let _ = self.store.put(KEY_LAST_SUBMIT_AT, &now.to_rfc3339());
        let _ = self.store.put(&day_text_key(day), &normalize(text));
    }

    // Fail open: an erroring store reads as empty.
    fn read(&self, key: &str) -> Option<String> {
        self.store.get(key).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::ports::{PortError, PortResult};
    use chrono::TimeZone;

    const LONG_ENOUGH: &str = "a sufficiently long entry";

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 22, hour, min, 0).unwrap()
    }

    fn gate() -> SubmissionGate<MemoryStore> {
        SubmissionGate::new(GatePolicy::default(), MemoryStore::new())
    }

    #[test]
    fn allows_a_fresh_submission() {
        assert_eq!(gate().check(at(9, 0), 2, LONG_ENOUGH), GateDecision::Allowed);
    }

    #[test]
    fn rejects_short_text() {
        let decision = gate().check(at(9, 0), 2, "  too short  ");
        assert_eq!(
            decision,
            GateDecision::Rejected(GateReason::TooShort { min: 12 })
        );
    }

    #[test]
    fn length_floor_counts_characters_not_bytes() {
        // 12 multibyte characters pass even though they are 36 bytes.
        let text = "世界记录十二个字符长度测试";
        assert_eq!(gate().check(at(9, 0), 2, text), GateDecision::Allowed);
    }

    #[test]
    fn enforces_the_daily_cap_until_the_day_changes() {
        let g = gate();
        g.record_submission(at(9, 0), 2, LONG_ENOUGH);

        let decision = g.check(at(12, 0), 2, "completely different words here");
        assert_eq!(
            decision,
            GateDecision::Rejected(GateReason::AlreadySubmittedToday)
        );

        // Next world day: the cap no longer applies.
        assert_eq!(
            g.check(at(12, 0), 3, "completely different words here"),
            GateDecision::Allowed
        );
    }

    #[test]
    fn enforces_the_minimum_interval_across_days() {
        let g = gate();
        let first = at(23, 59);
        g.record_submission(first, 2, LONG_ENOUGH);

        // 30 seconds later the day has rolled over but the interval has not.
        let soon = first + Duration::seconds(30);
        match g.check(soon, 3, "completely different words here") {
            GateDecision::Rejected(GateReason::TooSoon { retry_after_secs }) => {
                assert_eq!(retry_after_secs, 30);
            }
            other => panic!("expected TooSoon, got {other:?}"),
        }

        let later = first + Duration::seconds(61);
        assert_eq!(
            g.check(later, 3, "completely different words here"),
            GateDecision::Allowed
        );
    }

    #[test]
    fn rejects_normalized_duplicates_on_the_same_day() {
        // The daily cap would fire first, so point the day marker elsewhere
        // and let the duplicate check see the stored text for day 2.
        let g = gate();
        g.record_submission(at(9, 0), 2, "Hello   Journal World");
        let _ = g.store.put(KEY_LAST_DAY, "1");
        assert_eq!(
            g.check(at(9, 2), 2, "  hello journal\tworld "),
            GateDecision::Rejected(GateReason::DuplicateText)
        );
    }

    #[test]
    fn allows_the_same_text_on_a_different_day() {
        let g = gate();
        g.record_submission(at(9, 0), 2, "Hello Journal World");
        assert_eq!(
            g.check(at(9, 2) + Duration::days(1), 3, "Hello Journal World"),
            GateDecision::Allowed
        );
    }

    struct BrokenStore;

    impl GateStore for BrokenStore {
        fn get(&self, _key: &str) -> PortResult<Option<String>> {
            Err(PortError::Unexpected("storage unavailable".into()))
        }
        fn put(&self, _key: &str, _value: &str) -> PortResult<()> {
            Err(PortError::Unexpected("storage unavailable".into()))
        }
    }

    #[test]
    fn fails_open_when_storage_is_unavailable() {
        let g = SubmissionGate::new(GatePolicy::default(), BrokenStore);
        g.record_submission(at(9, 0), 2, LONG_ENOUGH);
        assert_eq!(g.check(at(9, 0), 2, LONG_ENOUGH), GateDecision::Allowed);
    }

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize("  Hello \t  WORLD\n"), "hello world");
        assert_eq!(normalize("already normal"), "already normal");
    }
}
