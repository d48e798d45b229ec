//! End-to-end journal flow against an in-memory record store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use journal_core::{
    GatePolicy, GateReason, Journal, MemoryStore, NewRecord, PortResult, Record, RecordStore,
    Submission, SubmissionGate, SubmitError, ViewState, WorldClock, WriteMode,
};

/// A record store fake that also counts insert attempts, so tests can
/// assert that local rejections never reach the collaborator.
#[derive(Default)]
struct FakeRecordStore {
    rows: Mutex<Vec<Record>>,
    inserts: AtomicUsize,
}

#[async_trait]
impl RecordStore for FakeRecordStore {
    async fn list_records(&self, owner: Option<Uuid>) -> PortResult<Vec<Record>> {
        let rows = self.rows.lock().unwrap();
        let mut out: Vec<Record> = rows
            .iter()
            .filter(|r| owner.map_or(true, |o| r.user_id == o))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn insert_record(&self, record: NewRecord) -> PortResult<Record> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let created = Record {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            author: record.author,
            title: record.title,
            body: record.body,
            day: record.day,
            heat: record.heat,
            tags: record.tags,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(created.clone());
        Ok(created)
    }
}

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 20, 0, 0, 0).unwrap()
}

fn journal(store: Arc<FakeRecordStore>) -> Journal<MemoryStore> {
    Journal::new(
        store,
        SubmissionGate::new(GatePolicy::default(), MemoryStore::new()),
        WorldClock::new(epoch()),
    )
}

fn submission(author: &str, text: &str) -> Submission {
    Submission {
        author: author.to_string(),
        text: text.to_string(),
        mode: WriteMode::Manifesto,
    }
}

#[tokio::test]
async fn first_entry_lands_under_day_zero() {
    let store = Arc::new(FakeRecordStore::default());
    let journal = journal(store.clone());
    let user = Uuid::new_v4();
    let now = epoch() + Duration::hours(3);

    let record = journal
        .submit(
            user,
            submission("Ada", "This is a sufficiently long first entry."),
            now,
        )
        .await
        .expect("first submission should pass the gate");
    assert_eq!(record.day, 0);
    assert_eq!(record.author, "Ada");
    assert!((30u8..100).contains(&record.heat));
    assert_eq!(record.tags, vec!["signal", "manifesto"]);

    let timeline = journal
        .timeline(Some(user), &ViewState::default(), 14, now)
        .await
        .unwrap();
    assert_eq!(timeline.days.len(), 1);
    assert_eq!(timeline.days[0].day, 0);
    assert_eq!(timeline.days[0].records.len(), 1);
    assert!(!timeline.has_more);
}

#[tokio::test]
async fn duplicate_and_short_texts_never_reach_the_store() {
    let store = Arc::new(FakeRecordStore::default());
    let journal = journal(store.clone());
    let user = Uuid::new_v4();
    let now = epoch() + Duration::hours(3);

    journal
        .submit(
            user,
            submission("Ada", "This is a sufficiently long first entry."),
            now,
        )
        .await
        .unwrap();
    assert_eq!(store.inserts.load(Ordering::SeqCst), 1);

    // Same-day retry hits the daily cap before any network call.
    let retry = journal
        .submit(
            user,
            submission("Ada", "this IS a   sufficiently long first entry."),
            now + Duration::minutes(5),
        )
        .await;
    assert!(matches!(
        retry,
        Err(SubmitError::Rejected(GateReason::AlreadySubmittedToday))
    ));
    assert_eq!(store.inserts.load(Ordering::SeqCst), 1);

    // Too-short text is rejected with a length error, again locally.
    let short = journal
        .submit(user, submission("Ada", "way short"), now + Duration::days(1))
        .await;
    assert!(matches!(
        short,
        Err(SubmitError::Rejected(GateReason::TooShort { min: 12 }))
    ));
    assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rapid_second_submission_waits_out_the_interval() {
    let store = Arc::new(FakeRecordStore::default());
    let journal = journal(store.clone());
    let user = Uuid::new_v4();

    // Submit just before midnight so the next world day arrives within the
    // minimum interval.
    let first = epoch() + Duration::hours(23) + Duration::minutes(59) + Duration::seconds(30);
    journal
        .submit(user, submission("Ada", "An entry sealed right before midnight."), first)
        .await
        .unwrap();

    let rushed = journal
        .submit(
            user,
            submission("Ada", "A different entry for the brand new day."),
            first + Duration::seconds(40),
        )
        .await;
    assert!(matches!(
        rushed,
        Err(SubmitError::Rejected(GateReason::TooSoon { .. }))
    ));

    let patient = journal
        .submit(
            user,
            submission("Ada", "A different entry for the brand new day."),
            first + Duration::seconds(90),
        )
        .await;
    assert!(patient.is_ok());
    assert_eq!(store.inserts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn timeline_is_scoped_to_the_owner() {
    let store = Arc::new(FakeRecordStore::default());
    let ada = Uuid::new_v4();
    let grace = Uuid::new_v4();
    let now = epoch() + Duration::days(2);

    // Separate journals: gate state is per client, the store is shared.
    journal(store.clone())
        .submit(ada, submission("Ada", "Ada writes her entry for the day."), now)
        .await
        .unwrap();
    journal(store.clone())
        .submit(grace, submission("Grace", "Grace writes her entry for the day."), now)
        .await
        .unwrap();

    let journal = journal(store);
    let mine = journal
        .timeline(Some(ada), &ViewState::default(), 14, now)
        .await
        .unwrap();
    assert_eq!(mine.days.len(), 1);
    assert_eq!(mine.days[0].records.len(), 1);
    assert_eq!(mine.days[0].records[0].author, "Ada");

    let all = journal
        .timeline(None, &ViewState::default(), 14, now)
        .await
        .unwrap();
    assert_eq!(all.days[0].records.len(), 2);
}
