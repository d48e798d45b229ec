//! crates/journal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A single immutable journal entry. Once the backend has created it,
/// nothing in the application mutates or deletes it.
#[derive(Debug, Clone)]
pub struct Record {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author: String,
    pub title: String,
    pub body: String,
    /// Whole days elapsed since the world epoch, assigned once at insert.
    pub day: u32,
    /// Popularity score in 0..=100, assigned at insert.
    pub heat: u8,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// The fields the application supplies when inserting a record.
/// `id` and `created_at` are assigned by the backend.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub user_id: Uuid,
    pub author: String,
    pub title: String,
    pub body: String,
    pub day: u32,
    pub heat: u8,
    pub tags: Vec<String>,
}

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub verified: bool,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub verified_at: Option<DateTime<Utc>>,
}
