//! Authentication extractors.
//!
//! Provides Axum extractors for:
//! - Bearer token extraction from the `Authorization` header
//! - Session validation (verifies the signed token against the clock)
//! - Role-based access control (admin checks)
//!
//! # Usage
//!
//! ```rust,ignore
//! use eventbook::auth::middleware::{RequireAdmin, SessionUser};
//!
//! // Require authentication
//! async fn my_bookings(session: SessionUser) -> Result<Json<BookingsResponse>, AppError> {
//!     // session.user_id is a verified user
//! }
//!
//! // Require admin role
//! async fn dashboard(admin: RequireAdmin) -> Result<Json<DashboardStats>, AppError> {
//!     // admin.user_id belongs to an administrator
//! }
//! ```

use crate::server::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use eventbook_auth::{AuthError, SessionClaims};
use eventbook_core::types::UserId;
use eventbook_web::error::AppError;

/// Bearer token extracted from `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::from(AuthError::MissingToken))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization format. Expected 'Bearer <token>'")
        })?;

        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer token"));
        }

        Ok(Self(token.to_string()))
    }
}

/// Authenticated session user.
///
/// Verifies the bearer token's signature and expiry. Use this as a handler
/// parameter to require authentication.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// The authenticated user ID
    pub user_id: UserId,
    /// Claims carried by the token
    pub claims: SessionClaims,
}

impl SessionUser {
    fn verify(token: &str, state: &AppState) -> Result<Self, AuthError> {
        let claims = state.tokens.verify(token, state.clock.now())?;
        Ok(Self {
            user_id: claims.user_id()?,
            claims,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = BearerToken::from_request_parts(parts, state).await?;
        Ok(Self::verify(&bearer.0, state)?)
    }
}

/// Session if the request carries a valid token, `None` otherwise.
///
/// Invalid or expired tokens are treated as anonymous rather than rejected.
#[derive(Debug, Clone)]
pub struct OptionalSession(pub Option<SessionUser>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Ok(bearer) = BearerToken::from_request_parts(parts, state).await else {
            return Ok(Self(None));
        };
        match SessionUser::verify(&bearer.0, state) {
            Ok(session) => Ok(Self(Some(session))),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unusable session token");
                Ok(Self(None))
            }
        }
    }
}

/// Require admin role.
///
/// Unauthenticated requests get 401; authenticated non-admins get 403.
#[derive(Debug, Clone)]
pub struct RequireAdmin {
    /// The authenticated admin user ID
    pub user_id: UserId,
    /// Claims carried by the token
    pub claims: SessionClaims,
}

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = SessionUser::from_request_parts(parts, state).await?;

        if !session.claims.is_admin() {
            tracing::warn!(user_id = %session.user_id, "Non-admin attempted admin access");
            return Err(AuthError::InsufficientPermissions {
                required: "admin".to_string(),
            }
            .into());
        }

        Ok(Self {
            user_id: session.user_id,
            claims: session.claims,
        })
    }
}
