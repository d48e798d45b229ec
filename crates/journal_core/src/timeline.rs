//! crates/journal_core/src/timeline.rs
//!
//! Groups records into per-day buckets and orders them for display.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Record;

/// Within-day ordering by `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone)]
pub struct DayGroup {
    pub day: u32,
    pub records: Vec<Record>,
}

#[derive(Debug, Clone)]
pub struct Timeline {
    pub days: Vec<DayGroup>,
    /// True when more day-groups exist than were rendered.
    pub has_more: bool,
}

/// Groups by day and orders the groups: day 0 pinned first when present,
/// the rest strictly descending, truncated to `max_days`. Within a day the
/// sort is stable, so records with identical timestamps keep their
/// insertion order.
pub fn build_timeline(records: Vec<Record>, max_days: usize, order: SortOrder) -> Timeline {
    let mut buckets: BTreeMap<u32, Vec<Record>> = BTreeMap::new();
    for record in records {
        buckets.entry(record.day).or_default().push(record);
    }

    let mut day_order: Vec<u32> = Vec::with_capacity(buckets.len());
    if buckets.contains_key(&0) {
        day_order.push(0);
    }
    day_order.extend(buckets.keys().rev().copied().filter(|d| *d != 0));

    let has_more = day_order.len() > max_days;
    day_order.truncate(max_days);

    let days = day_order
        .into_iter()
        .filter_map(|day| {
            let mut records = buckets.remove(&day)?;
            match order {
                SortOrder::Asc => records.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
                SortOrder::Desc => records.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            }
            Some(DayGroup { day, records })
        })
        .collect();

    Timeline { days, has_more }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn record(day: u32, minute: u32, author: &str) -> Record {
        Record {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            author: author.to_string(),
            title: "t".to_string(),
            body: "b".to_string(),
            day,
            heat: 50,
            tags: vec![],
            created_at: Utc.with_ymd_and_hms(2025, 12, 22, 10, minute, 0).unwrap(),
        }
    }

    #[test]
    fn day_zero_is_pinned_first_then_descending() {
        let records = vec![record(3, 0, "a"), record(0, 1, "b"), record(7, 2, "c"), record(1, 3, "d")];
        let timeline = build_timeline(records, 10, SortOrder::Desc);
        let days: Vec<u32> = timeline.days.iter().map(|g| g.day).collect();
        assert_eq!(days, vec![0, 7, 3, 1]);
        assert!(!timeline.has_more);
    }

    #[test]
    fn descending_without_genesis() {
        let records = vec![record(5, 0, "a"), record(2, 1, "b"), record(9, 2, "c")];
        let timeline = build_timeline(records, 10, SortOrder::Desc);
        let days: Vec<u32> = timeline.days.iter().map(|g| g.day).collect();
        assert_eq!(days, vec![9, 5, 2]);
    }

    #[test]
    fn truncation_reports_more_days() {
        let records = vec![record(0, 0, "a"), record(4, 1, "b"), record(3, 2, "c"), record(2, 3, "d")];
        let timeline = build_timeline(records, 2, SortOrder::Desc);
        let days: Vec<u32> = timeline.days.iter().map(|g| g.day).collect();
        assert_eq!(days, vec![0, 4]);
        assert!(timeline.has_more);
    }

    #[test]
    fn truncation_at_exact_count_has_no_more() {
        let records = vec![record(1, 0, "a"), record(2, 1, "b")];
        let timeline = build_timeline(records, 2, SortOrder::Desc);
        assert!(!timeline.has_more);
    }

    #[test]
    fn within_day_order_follows_the_toggle() {
        let records = vec![record(1, 5, "early"), record(1, 20, "late")];
        let asc = build_timeline(records.clone(), 5, SortOrder::Asc);
        let authors: Vec<&str> = asc.days[0].records.iter().map(|r| r.author.as_str()).collect();
        assert_eq!(authors, vec!["early", "late"]);

        let desc = build_timeline(records, 5, SortOrder::Desc);
        let authors: Vec<&str> = desc.days[0].records.iter().map(|r| r.author.as_str()).collect();
        assert_eq!(authors, vec!["late", "early"]);
    }

    #[test]
    fn identical_timestamps_keep_insertion_order() {
        let records = vec![record(1, 5, "first"), record(1, 5, "second"), record(1, 5, "third")];
        let timeline = build_timeline(records, 5, SortOrder::Desc);
        let authors: Vec<&str> = timeline.days[0]
            .records
            .iter()
            .map(|r| r.author.as_str())
            .collect();
        assert_eq!(authors, vec!["first", "second", "third"]);
    }
}
