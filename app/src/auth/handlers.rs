//! HTTP handlers for sign-up, sign-in and session lookup.
//!
//! - POST /api/auth/signup - Register an account
//! - POST /api/auth/signin - Exchange credentials for a session token
//! - GET /api/auth/session - Describe the caller's session, if any
//!
//! bcrypt is CPU-bound, so hashing and verification run on the blocking pool.

use super::middleware::OptionalSession;
use crate::metrics;
use crate::server::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use eventbook_auth::utils::{validate_email, validate_password};
use eventbook_auth::{AuthError, PasswordHasher};
use eventbook_core::error::StoreError;
use eventbook_core::types::{NewUser, Role, User, UserId, normalize_email};
use eventbook_web::{AppError, JsonBody};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Sign-up form.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    /// Display name (optional)
    pub name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Plain-text password
    pub password: Option<String>,
}

/// Sign-in form.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    /// Email address
    pub email: Option<String>,
    /// Plain-text password
    pub password: Option<String>,
}

/// Response after registering.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    /// Success message
    pub message: String,
    /// The new account
    pub user: User,
}

/// Response after signing in.
#[derive(Debug, Serialize)]
pub struct SigninResponse {
    /// Session token for the `Authorization: Bearer` header
    pub token: String,
    /// The signed-in account
    pub user: User,
}

/// The identity carried by a session token.
#[derive(Debug, Serialize)]
pub struct SessionView {
    /// User ID
    pub id: UserId,
    /// Email
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Role
    pub role: Role,
}

/// Response for the session endpoint.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// The session's user, or `null` when anonymous
    pub user: Option<SessionView>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Hash a password on the blocking pool.
pub(crate) async fn hash_password(
    hasher: PasswordHasher,
    password: String,
) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::internal("An internal error occurred").with_source(e))?
        .map_err(AppError::from)
}

async fn verify_password(
    hasher: PasswordHasher,
    password: String,
    hash: String,
) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|e| AppError::internal("An internal error occurred").with_source(e))
}

// ============================================================================
// Handlers
// ============================================================================

/// Register a new account.
///
/// New accounts always get the `user` role.
///
/// # Errors
///
/// - 400 if email or password is missing
/// - 422 if the email is malformed or the password too short
/// - 409 if the email is already registered
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let (Some(email), Some(password)) = (present(request.email), present(request.password)) else {
        return Err(AppError::bad_request("Missing required fields"));
    };

    let email = normalize_email(&email);
    validate_email(&email)?;
    validate_password(&password)?;

    let password_hash = hash_password(state.passwords, password).await?;
    let new_user = NewUser {
        name: present(request.name).map(|n| n.trim().to_string()),
        email,
        password_hash,
        role: Role::User,
    };

    let user = state
        .users
        .create_user(new_user, state.clock.now())
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => AppError::from(AuthError::EmailTaken),
            other => AppError::from(other),
        })?;

    metrics::record_signup();
    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// Exchange email and password for a session token.
///
/// # Errors
///
/// - 400 if email or password is missing
/// - 401 if no account matches the credentials
pub async fn signin(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SigninRequest>,
) -> Result<Json<SigninResponse>, AppError> {
    let (Some(email), Some(password)) = (present(request.email), present(request.password)) else {
        return Err(AppError::bad_request("Email and password are required"));
    };

    let user = state
        .users
        .find_by_email(&normalize_email(&email))
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(state.passwords, password, user.password_hash.clone()).await? {
        tracing::info!(user_id = %user.id, "Rejected sign-in");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.tokens.issue(&user, state.clock.now())?;
    tracing::info!(user_id = %user.id, "User signed in");

    Ok(Json(SigninResponse { token, user }))
}

/// Describe the caller's session.
///
/// Always 200; anonymous callers get `{"user": null}`.
#[allow(clippy::unused_async)]
pub async fn session(OptionalSession(session): OptionalSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        user: session.map(|s| SessionView {
            id: s.user_id,
            email: s.claims.email,
            name: s.claims.name,
            role: s.claims.role,
        }),
    })
}
