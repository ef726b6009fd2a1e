//! Error types for web handlers.
//!
//! [`AppError`] is the single error type returned by handlers. Domain errors
//! convert into it through `From`, so handlers can use `?` and each domain
//! failure maps to exactly one status code.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use eventbook_auth::AuthError;
use eventbook_core::error::{BookingError, StoreError};
use eventbook_core::validation::ValidationError;
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Carries the HTTP status, a user-facing message, a machine-readable code
/// and, for server errors, an internal source that is logged but never sent
/// to the client.
///
/// # Examples
///
/// ```
/// use eventbook_web::AppError;
/// use axum::http::StatusCode;
///
/// let err = AppError::not_found("Event", "42");
/// assert_eq!(err.status(), StatusCode::NOT_FOUND);
/// assert_eq!(err.to_string(), "[NOT_FOUND] Event with id 42 not found");
/// ```
#[derive(Debug)]
pub struct AppError {
    /// HTTP status code
    status: StatusCode,
    /// Error message (user-facing)
    message: String,
    /// Error code (for client error handling)
    code: &'static str,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl AppError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, message: String, code: &'static str) -> Self {
        Self {
            status,
            message,
            code,
            source: None,
        }
    }

    /// Attach an internal source error.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// HTTP status of this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message.into(), "BAD_REQUEST")
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message.into(), "UNAUTHORIZED")
    }

    /// Create a 403 Forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message.into(), "FORBIDDEN")
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
            "NOT_FOUND",
        )
    }

    /// Create a 404 Not Found error with a custom message.
    #[must_use]
    pub fn route_not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message.into(), "NOT_FOUND")
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message.into(), "CONFLICT")
    }

    /// Create a 422 Unprocessable Entity error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            message.into(),
            "VALIDATION_ERROR",
        )
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            message.into(),
            "INTERNAL_SERVER_ERROR",
        )
    }

    /// Create a 502 Bad Gateway error.
    #[must_use]
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message.into(), "BAD_GATEWAY")
    }

    /// Create a 503 Service Unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            message.into(),
            "SERVICE_UNAVAILABLE",
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Error code (for client error handling).
    code: &'static str,
    /// Human-readable error message.
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    error = %source,
                    "Internal server error"
                ),
                None => tracing::error!(
                    status = %self.status,
                    code = self.code,
                    message = %self.message,
                    "Internal server error"
                ),
            }
        }

        let body = ErrorResponse {
            code: self.code,
            message: self.message,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("An internal error occurred").with_source(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::not_found(entity, id),
            StoreError::Duplicate(what) => Self::conflict(format!("Duplicate {what}")),
            StoreError::Database(_) => Self::internal("An internal error occurred").with_source(err),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::EventNotFound(_) => Self::route_not_found("Event not found"),
            BookingError::AlreadyBooked => Self::conflict(err.to_string()),
            BookingError::CapacityExceeded { .. } => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string(), "FULLY_BOOKED")
            }
            BookingError::Store(inner) => Self::internal("Failed to book event").with_source(inner),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::SessionExpired => Self::unauthorized(err.to_string()),
            AuthError::InsufficientPermissions { .. } => Self::forbidden(err.to_string()),
            AuthError::InvalidEmail | AuthError::WeakPassword { .. } => {
                Self::validation(err.to_string())
            }
            AuthError::EmailTaken => Self::conflict(err.to_string()),
            AuthError::Crypto(_) => Self::internal("An internal error occurred").with_source(err),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

/// Malformed or missing JSON bodies are client errors.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventbook_core::types::EventId;

    #[test]
    fn test_error_display() {
        let err = AppError::bad_request("Invalid input");
        assert_eq!(err.to_string(), "[BAD_REQUEST] Invalid input");
    }

    #[test]
    fn test_validation() {
        let err = AppError::validation("Email is required");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_booking_errors_map_to_statuses() {
        let cases = [
            (BookingError::EventNotFound(EventId::new()), StatusCode::NOT_FOUND),
            (BookingError::AlreadyBooked, StatusCode::CONFLICT),
            (BookingError::CapacityExceeded { capacity: 3 }, StatusCode::BAD_REQUEST),
            (
                BookingError::Store(StoreError::Database("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_fully_booked_has_its_own_code() {
        let err = AppError::from(BookingError::CapacityExceeded { capacity: 1 });
        assert_eq!(err.code(), "FULLY_BOOKED");
        assert_eq!(err.message(), "This event is fully booked");
    }

    #[test]
    fn test_database_details_are_hidden() {
        let err = AppError::from(StoreError::Database("password=hunter2".into()));
        assert_eq!(err.message(), "An internal error occurred");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_auth_errors_map_to_statuses() {
        assert_eq!(AppError::from(AuthError::SessionExpired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::from(AuthError::InsufficientPermissions { required: "admin".into() }).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::from(AuthError::EmailTaken).status(), StatusCode::CONFLICT);
        let crypto = AppError::from(AuthError::Crypto("bad cost".into()));
        assert_eq!(crypto.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(crypto.message(), "An internal error occurred");
        assert_eq!(
            AppError::from(AuthError::WeakPassword { min_length: 6 }).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
