//! crates/journal_core/src/compose.rs
//!
//! Write modes: how the free text a user types becomes the stored
//! title/body pair.

use serde::{Deserialize, Serialize};

/// The author a record falls back to when the display name is blank.
pub const DEFAULT_AUTHOR: &str = "Founder";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    Short,
    #[default]
    Manifesto,
    Rule,
    Event,
}

impl WriteMode {
    /// Derives the stored title and body from trimmed free text.
    /// Truncation counts characters, not bytes.
    pub fn compose(&self, text: &str) -> (String, String) {
        match self {
            WriteMode::Short => (take_chars(text, 44), text.to_string()),
            WriteMode::Manifesto => (take_chars(text, 60), text.to_string()),
            WriteMode::Rule => (
                format!("Rule: {}", take_chars(text, 40)),
                format!("This rule is binding: {text}"),
            ),
            WriteMode::Event => (
                format!("Event: {}", take_chars(text, 40)),
                format!("This event matters: {text}"),
            ),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            WriteMode::Short => "short",
            WriteMode::Manifesto => "manifesto",
            WriteMode::Rule => "rule",
            WriteMode::Event => "event",
        }
    }
}

fn take_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

/// Falls back to [`DEFAULT_AUTHOR`] when the typed name is blank.
pub fn display_author(author: &str) -> String {
    let trimmed = author.trim();
    if trimmed.is_empty() {
        DEFAULT_AUTHOR.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_mode_keeps_the_body_and_clips_the_title() {
        let text = "x".repeat(50);
        let (title, body) = WriteMode::Short.compose(&text);
        assert_eq!(title.len(), 44);
        assert_eq!(body, text);
    }

    #[test]
    fn manifesto_mode_clips_at_sixty() {
        let text = "y".repeat(80);
        let (title, body) = WriteMode::Manifesto.compose(&text);
        assert_eq!(title.len(), 60);
        assert_eq!(body, text);
    }

    #[test]
    fn rule_mode_prefixes_title_and_body() {
        let (title, body) = WriteMode::Rule.compose("no edits after sealing");
        assert_eq!(title, "Rule: no edits after sealing");
        assert_eq!(body, "This rule is binding: no edits after sealing");
    }

    #[test]
    fn event_mode_prefixes_title_and_body() {
        let (title, body) = WriteMode::Event.compose("the world began");
        assert_eq!(title, "Event: the world began");
        assert_eq!(body, "This event matters: the world began");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "界".repeat(48);
        let (title, _) = WriteMode::Short.compose(&text);
        assert_eq!(title.chars().count(), 44);
    }

    #[test]
    fn blank_authors_become_the_default() {
        assert_eq!(display_author("   "), "Founder");
        assert_eq!(display_author(" Ada "), "Ada");
    }
}
