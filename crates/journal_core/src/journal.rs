//! crates/journal_core/src/journal.rs
//!
//! The journal orchestrator: composes the world clock, the submission gate
//! and the record collaborator into the two operations the product has —
//! write an entry and read the timeline.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::clock::WorldClock;
use crate::compose::{display_author, WriteMode};
use crate::domain::{NewRecord, Record};
use crate::gate::{GateDecision, GateReason, SubmissionGate};
use crate::ports::{GateStore, PortError, PortResult, RecordStore};
use crate::timeline::{build_timeline, Timeline};
use crate::view::ViewState;

/// What a user hands over when writing an entry.
#[derive(Debug, Clone)]
pub struct Submission {
    pub author: String,
    pub text: String,
    pub mode: WriteMode,
}

/// Why a submission did not produce a record. Gate rejections happen before
/// any collaborator call; backend failures leave all local state unchanged
/// so the caller can retry with the typed text intact.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    Rejected(GateReason),
    #[error(transparent)]
    Backend(#[from] PortError),
}

pub struct Journal<S> {
    records: Arc<dyn RecordStore>,
    gate: SubmissionGate<S>,
    clock: WorldClock,
}

impl<S: GateStore> Journal<S> {
    pub fn new(records: Arc<dyn RecordStore>, gate: SubmissionGate<S>, clock: WorldClock) -> Self {
        Self {
            records,
            gate,
            clock,
        }
    }

    pub fn clock(&self) -> &WorldClock {
        &self.clock
    }

    /// Validates locally, inserts, then persists the gate markers. The
    /// markers are written only once the insert has resolved, so a failed
    /// insert does not consume the daily slot.
    pub async fn submit(
        &self,
        user_id: Uuid,
        submission: Submission,
        now: DateTime<Utc>,
    ) -> Result<Record, SubmitError> {
        let day = self.clock.day_for(now);

        if let GateDecision::Rejected(reason) = self.gate.check(now, day, &submission.text) {
            return Err(SubmitError::Rejected(reason));
        }

        let text = submission.text.trim();
        let (title, body) = submission.mode.compose(text);
        let record = self
            .records
            .insert_record(NewRecord {
                user_id,
                author: display_author(&submission.author),
                title,
                body,
                day,
                heat: heat_score(),
                tags: vec!["signal".to_string(), submission.mode.tag().to_string()],
            })
            .await?;

        self.gate.record_submission(now, day, &submission.text);
        Ok(record)
    }

    /// Fetches, filters by the view state, then groups and sorts.
    pub async fn timeline(
        &self,
        owner: Option<Uuid>,
        view: &ViewState,
        max_days: usize,
        now: DateTime<Utc>,
    ) -> PortResult<Timeline> {
        let records = self.records.list_records(owner).await?;
        let current_day = self.clock.day_for(now);
        let filtered = view.filter(records, current_day);
        Ok(build_timeline(filtered, max_days, view.sort()))
    }
}

// 30..=99, matching the product's seeded popularity range.
fn heat_score() -> u8 {
    rand::thread_rng().gen_range(30u8..100)
}
