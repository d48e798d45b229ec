//! crates/journal_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{NewRecord, Record, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
/// The message is displayable: callers show it verbatim and never interpret it.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The record collaborator: exactly two capabilities, no transactions,
/// no joins, no multi-row operations.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Lists records ordered by `created_at` descending, optionally
    /// restricted to one owner.
    async fn list_records(&self, owner: Option<Uuid>) -> PortResult<Vec<Record>>;

    /// Inserts a single record and returns the created row with its
    /// server-assigned `id` and `created_at`.
    async fn insert_record(&self, record: NewRecord) -> PortResult<Record>;
}

/// The auth collaborator: account and session lifecycle.
#[async_trait]
pub trait AuthStore: Send + Sync {
    async fn create_user(
        &self,
        email: &str,
        hashed_password: &str,
        verification_token: &str,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    /// Marks the user owning `token` as verified.
    async fn verify_email(&self, token: &str) -> PortResult<()>;

    /// Replaces the stored verification token for an unverified account.
    async fn reissue_verification_token(&self, email: &str, token: &str) -> PortResult<()>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;
}

/// Durable key-value storage backing the submission gate. Implementations
/// are local and best-effort; the gate fails open whenever a call errors.
pub trait GateStore: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;
    fn put(&self, key: &str, value: &str) -> PortResult<()>;
}
