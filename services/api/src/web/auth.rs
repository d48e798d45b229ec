//! services/api/src/web/auth.rs
//!
//! Authentication endpoints: signup, login, logout, email verification and
//! verification resend. There is no real mailer behind the verification
//! flow; the "email" is a log line carrying the verify link, which keeps
//! the delivery concern outside this service.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use journal_core::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::middleware::session_cookie;
use crate::web::state::AppState;

const SESSION_TTL_DAYS: i64 = 30;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ResendRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct VerifyParams {
    pub token: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn message(text: &str) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.to_string(),
    })
}

fn session_cookie_header(session_id: &str) -> String {
    format!(
        "session={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        session_id,
        Duration::days(SESSION_TTL_DAYS).num_seconds()
    )
}

//=========================================================================================
// Error Mapping
//=========================================================================================

// Only a missing account is the caller's fault; database failures must not
// masquerade as bad credentials.
fn login_lookup_error(e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(_) => (
            StatusCode::UNAUTHORIZED,
            "Invalid email or password".to_string(),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Authentication error".to_string(),
        ),
    }
}

fn verification_error(e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create a new account and send a verification link
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created; verification required", body = MessageResponse),
        (status = 400, description = "Missing email or password"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Email and password are required".to_string(),
        ));
    }

    // 1. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to hash password".to_string(),
            )
        })?
        .to_string();

    // 2. Create the user with a fresh verification token
    let token = Uuid::new_v4().to_string();
    let user = state
        .auth
        .create_user(req.email.trim(), &password_hash, &token)
        .await
        .map_err(|e| {
            error!("Failed to create user: {:?}", e);
            match e {
                journal_core::PortError::Conflict(msg) => (StatusCode::CONFLICT, msg),
                other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
            }
        })?;

    // 3. "Send" the verification email
    info!(
        email = %user.email,
        "verification link: /auth/verify?token={}", token
    );

    Ok((
        StatusCode::CREATED,
        message("Check your inbox for a verification link, then log in."),
    ))
}

/// POST /auth/login - Login with a verified account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Email not verified"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Get user by email
    let user_creds = state
        .auth
        .get_user_by_email(req.email.trim())
        .await
        .map_err(|e| {
            error!("Failed to get user: {:?}", e);
            login_lookup_error(e)
        })?;

    // 2. Verify password
    let parsed_hash = PasswordHash::new(&user_creds.hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Authentication error".to_string(),
        )
    })?;

    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();

    if !valid {
        return Err((
            StatusCode::UNAUTHORIZED,
            "Invalid email or password".to_string(),
        ));
    }

    // 3. Unverified accounts cannot enter
    if user_creds.verified_at.is_none() {
        return Err((
            StatusCode::FORBIDDEN,
            "Please verify your email to continue.".to_string(),
        ));
    }

    // 4. Create the auth session
    let auth_session_id = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);
    state
        .auth
        .create_auth_session(&auth_session_id, user_creds.user_id, expires_at)
        .await
        .map_err(|e| {
            error!("Failed to create auth session: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create session".to_string(),
            )
        })?;

    let response = AuthResponse {
        user_id: user_creds.user_id,
        email: user_creds.email,
    };

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie_header(&auth_session_id))],
        Json(response),
    ))
}

/// POST /auth/logout - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let auth_session_id = session_cookie(&headers)
        .ok_or((StatusCode::UNAUTHORIZED, "No session found".to_string()))?;

    state
        .auth
        .delete_auth_session(auth_session_id)
        .await
        .map_err(|e| {
            error!("Failed to delete auth session: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to logout".to_string(),
            )
        })?;

    // Clear cookie
    let cookie = "session=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0";

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie.to_string())]))
}

/// POST /auth/resend - Reissue the verification link for an unverified account
#[utoipa::path(
    post,
    path = "/auth/resend",
    request_body = ResendRequest,
    responses(
        (status = 200, description = "Verification link reissued", body = MessageResponse),
        (status = 404, description = "No unverified account for that email"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn resend_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResendRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if req.email.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Email is required".to_string()));
    }

    let token = Uuid::new_v4().to_string();
    state
        .auth
        .reissue_verification_token(req.email.trim(), &token)
        .await
        .map_err(|e| {
            error!("Failed to reissue verification token: {:?}", e);
            verification_error(e)
        })?;

    info!(
        email = %req.email.trim(),
        "verification link: /auth/verify?token={}", token
    );

    Ok((
        StatusCode::OK,
        message("Verification email sent again (check your spam folder)."),
    ))
}

/// GET /auth/verify - Confirm an email address via its token
#[utoipa::path(
    get,
    path = "/auth/verify",
    params(("token" = String, Query, description = "The verification token from the email link.")),
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 404, description = "Invalid or used token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn verify_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<VerifyParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .auth
        .verify_email(&params.token)
        .await
        .map_err(|e| {
            error!("Failed to verify email: {:?}", e);
            verification_error(e)
        })?;

    Ok((
        StatusCode::OK,
        message("Email verified. You can log in now."),
    ))
}
