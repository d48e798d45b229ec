//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the record endpoints and the master
//! definition for the OpenAPI specification.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use journal_core::{
    DayGroup, Record, Submission, SubmitError, Timeline, ViewState, WriteMode,
};

use crate::web::middleware::SessionId;
use crate::web::state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_records_handler,
        insert_record_handler,
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        crate::web::auth::resend_handler,
        crate::web::auth::verify_handler,
    ),
    components(
        schemas(
            TimelineResponse,
            DayGroupView,
            RecordView,
            SubmitRequest,
            crate::web::auth::SignupRequest,
            crate::web::auth::LoginRequest,
            crate::web::auth::ResendRequest,
            crate::web::auth::AuthResponse,
            crate::web::auth::MessageResponse,
        )
    ),
    tags(
        (name = "World Journal API", description = "API endpoints for the append-only world journal.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct RecordView {
    pub id: Uuid,
    pub author: String,
    pub title: String,
    pub body: String,
    pub day: u32,
    pub heat: u8,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Record> for RecordView {
    fn from(r: Record) -> Self {
        Self {
            id: r.id,
            author: r.author,
            title: r.title,
            body: r.body,
            day: r.day,
            heat: r.heat,
            tags: r.tags,
            created_at: r.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DayGroupView {
    pub day: u32,
    pub records: Vec<RecordView>,
}

/// The grouped timeline. When the record collaborator fails, `days` is
/// empty and `error` carries the displayable message; the status stays 200.
#[derive(Serialize, ToSchema)]
pub struct TimelineResponse {
    pub days: Vec<DayGroupView>,
    pub has_more: bool,
    /// The current world day, so clients can label "today".
    pub current_day: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TimelineResponse {
    fn from_timeline(timeline: Timeline, current_day: u32) -> Self {
        Self {
            days: timeline
                .days
                .into_iter()
                .map(|DayGroup { day, records }| DayGroupView {
                    day,
                    records: records.into_iter().map(RecordView::from).collect(),
                })
                .collect(),
            has_more: timeline.has_more,
            current_day,
            error: None,
        }
    }

    fn from_error(message: String, current_day: u32) -> Self {
        Self {
            days: Vec::new(),
            has_more: false,
            current_day,
            error: Some(message),
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct SubmitRequest {
    #[serde(default)]
    pub author: String,
    pub text: String,
    /// One of `short`, `manifesto`, `rule`, `event`. Defaults to `manifesto`.
    #[serde(default)]
    #[schema(value_type = String)]
    pub mode: WriteMode,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the caller's records, grouped by world day.
///
/// The query string mirrors the shareable view state: copying a URL with
/// `q`, `day`, `today`, `genesis`, `sort`, `author` or `theme` reproduces
/// the same view.
#[utoipa::path(
    get,
    path = "/records",
    params(
        ("q" = Option<String>, Query, description = "Search across title, body, author and tags."),
        ("day" = Option<u32>, Query, description = "Keep only this world day."),
        ("today" = Option<bool>, Query, description = "Keep only the current world day."),
        ("genesis" = Option<bool>, Query, description = "Keep only day 0."),
        ("sort" = Option<String>, Query, description = "Within-day order: asc or desc."),
        ("author" = Option<String>, Query, description = "Exact author match, case-insensitive."),
        ("theme" = Option<String>, Query, description = "Presentation passthrough.")
    ),
    responses(
        (status = 200, description = "The grouped timeline", body = TimelineResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_records_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Extension(session): Extension<SessionId>,
    Query(view): Query<ViewState>,
) -> impl IntoResponse {
    let journal = state.journal_for(&session.0);
    let now = Utc::now();
    let current_day = state.clock.day_for(now);

    let response = match journal
        .timeline(Some(user_id), &view, state.config.max_timeline_days, now)
        .await
    {
        Ok(timeline) => TimelineResponse::from_timeline(timeline, current_day),
        Err(e) => {
            // Surface fetch failures as an empty timeline plus a message,
            // never a crash; the user presses refresh to retry.
            error!("Failed to list records: {:?}", e);
            TimelineResponse::from_error(e.to_string(), current_day)
        }
    };

    Json(response)
}

/// Append one record to the journal.
///
/// The submission gate runs before any insert: too-short, same-day,
/// too-frequent or duplicate entries come back as 422 without touching the
/// record store. Backend failures come back as 502 with the collaborator's
/// message so the client can retry with the typed text intact.
#[utoipa::path(
    post,
    path = "/records",
    request_body = SubmitRequest,
    responses(
        (status = 201, description = "Record sealed", body = RecordView),
        (status = 401, description = "Not logged in"),
        (status = 422, description = "Rejected by validation or the submission gate"),
        (status = 502, description = "The record store rejected the insert")
    )
)]
pub async fn insert_record_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Extension(session): Extension<SessionId>,
    Json(req): Json<SubmitRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let journal = state.journal_for(&session.0);
    let submission = Submission {
        author: req.author,
        text: req.text,
        mode: req.mode,
    };

    match journal.submit(user_id, submission, Utc::now()).await {
        Ok(record) => Ok((StatusCode::CREATED, Json(RecordView::from(record)))),
        Err(SubmitError::Rejected(reason)) => {
            Err((StatusCode::UNPROCESSABLE_ENTITY, reason.to_string()))
        }
        Err(SubmitError::Backend(e)) => {
            error!("Failed to insert record: {:?}", e);
            Err((StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}
