//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `RecordStore` and `AuthStore` ports from the `core` crate. It handles
//! all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use journal_core::domain::{NewRecord, Record, User, UserCredentials};
use journal_core::ports::{AuthStore, PortError, PortResult, RecordStore};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `RecordStore` and `AuthStore` ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct RecordRow {
    id: Uuid,
    user_id: Uuid,
    author: String,
    title: String,
    body: String,
    day: i32,
    heat: i16,
    tags: Vec<String>,
    created_at: DateTime<Utc>,
}

impl RecordRow {
    fn to_domain(self) -> Record {
        Record {
            id: self.id,
            user_id: self.user_id,
            author: self.author,
            title: self.title,
            body: self.body,
            day: self.day.max(0) as u32,
            heat: self.heat.clamp(0, 100) as u8,
            tags: self.tags,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    verified_at: Option<DateTime<Utc>>,
}

impl UserRow {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
            verified: self.verified_at.is_some(),
        }
    }
}

#[derive(FromRow)]
struct CredentialsRow {
    user_id: Uuid,
    email: String,
    hashed_password: String,
    verified_at: Option<DateTime<Utc>>,
}

impl CredentialsRow {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            email: self.email,
            hashed_password: self.hashed_password,
            verified_at: self.verified_at,
        }
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// `RecordStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecordStore for DbAdapter {
    async fn list_records(&self, owner: Option<Uuid>) -> PortResult<Vec<Record>> {
        let rows: Vec<RecordRow> = match owner {
            Some(user_id) => {
                sqlx::query_as(
                    "SELECT id, user_id, author, title, body, day, heat, tags, created_at \
                     FROM records WHERE user_id = $1 ORDER BY created_at DESC",
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as(
                    "SELECT id, user_id, author, title, body, day, heat, tags, created_at \
                     FROM records ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(unexpected)?;

        Ok(rows.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn insert_record(&self, record: NewRecord) -> PortResult<Record> {
        let row: RecordRow = sqlx::query_as(
            "INSERT INTO records (id, user_id, author, title, body, day, heat, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id, user_id, author, title, body, day, heat, tags, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(record.user_id)
        .bind(&record.author)
        .bind(&record.title)
        .bind(&record.body)
        .bind(record.day as i32)
        .bind(record.heat as i16)
        .bind(&record.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(row.to_domain())
    }
}

//=========================================================================================
// `AuthStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl AuthStore for DbAdapter {
    async fn create_user(
        &self,
        email: &str,
        hashed_password: &str,
        verification_token: &str,
    ) -> PortResult<User> {
        let row: UserRow = sqlx::query_as(
            "INSERT INTO users (user_id, email, hashed_password, verification_token) \
             VALUES ($1, $2, $3, $4) RETURNING user_id, email, verified_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .bind(verification_token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .map_or(false, |d| d.is_unique_violation())
            {
                PortError::Conflict("An account with this email already exists".to_string())
            } else {
                unexpected(e)
            }
        })?;

        Ok(row.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let row: CredentialsRow = sqlx::query_as(
            "SELECT user_id, email, hashed_password, verified_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("No account for {}", email)),
            _ => unexpected(e),
        })?;

        Ok(row.to_domain())
    }

    async fn verify_email(&self, token: &str) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE users SET verified_at = now(), verification_token = NULL \
             WHERE verification_token = $1 AND verified_at IS NULL",
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(
                "Verification link is invalid or already used".to_string(),
            ));
        }
        Ok(())
    }

    async fn reissue_verification_token(&self, email: &str, token: &str) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE users SET verification_token = $2 WHERE email = $1 AND verified_at IS NULL",
        )
        .bind(email)
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(
                "No unverified account for that email".to_string(),
            ));
        }
        Ok(())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let row: (Uuid,) =
            sqlx::query_as("SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()")
                .bind(session_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| match e {
                    sqlx::Error::RowNotFound => PortError::Unauthorized,
                    _ => unexpected(e),
                })?;
        Ok(row.0)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
}
