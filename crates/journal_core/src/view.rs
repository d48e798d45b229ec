//! crates/journal_core/src/view.rs
//!
//! Shareable view state: the filter/sort/theme configuration mirrored into
//! URL query parameters so a copied link reproduces the same view.

use serde::{Deserialize, Serialize};

use crate::domain::Record;
use crate::timeline::SortOrder;

/// One view over the timeline. Every field is optional; an absent field
/// does not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Free-text search over title, body, author and tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Keep only this exact world day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    /// Keep only the current world day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub today: Option<bool>,
    /// Keep only day 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genesis: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
    /// Case-insensitive exact author match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Presentation passthrough; no filtering effect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl ViewState {
    /// Serializes to a URL query string. Re-parsing the result with
    /// [`ViewState::from_query`] yields an identical configuration.
    pub fn to_query(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self)
    }

    pub fn from_query(query: &str) -> Result<Self, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(query)
    }

    pub fn sort(&self) -> SortOrder {
        self.sort.unwrap_or_default()
    }

    /// Applies the filter parameters to a record set. `current_day` anchors
    /// the `today` flag.
    pub fn filter(&self, records: Vec<Record>, current_day: u32) -> Vec<Record> {
        records
            .into_iter()
            .filter(|r| self.matches(r, current_day))
            .collect()
    }

    fn matches(&self, record: &Record, current_day: u32) -> bool {
        if let Some(day) = self.day {
            if record.day != day {
                return false;
            }
        }
        if self.today == Some(true) && record.day != current_day {
            return false;
        }
        if self.genesis == Some(true) && record.day != 0 {
            return false;
        }
        if let Some(author) = &self.author {
            if !record.author.eq_ignore_ascii_case(author) {
                return false;
            }
        }
        if let Some(q) = &self.q {
            let needle = q.trim().to_lowercase();
            if !needle.is_empty() && !Self::haystack_contains(record, &needle) {
                return false;
            }
        }
        true
    }

    fn haystack_contains(record: &Record, needle: &str) -> bool {
        record.title.to_lowercase().contains(needle)
            || record.body.to_lowercase().contains(needle)
            || record.author.to_lowercase().contains(needle)
            || record.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}
