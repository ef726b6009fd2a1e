//! Error types for authentication and authorization operations.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Failure modes of sign-up, sign-in and session checks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Authentication Errors
    // ═══════════════════════════════════════════════════════════

    /// Email or password did not match.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No session token accompanied the request.
    #[error("Authentication required")]
    MissingToken,

    /// The session token is malformed or its signature is wrong.
    #[error("Invalid session token")]
    InvalidToken,

    /// Session has expired.
    #[error("Session has expired")]
    SessionExpired,

    // ═══════════════════════════════════════════════════════════
    // Authorization Errors
    // ═══════════════════════════════════════════════════════════

    /// User lacks required permissions.
    #[error("Insufficient permissions: {required}")]
    InsufficientPermissions {
        /// Required role that was missing
        required: String,
    },

    // ═══════════════════════════════════════════════════════════
    // Registration Errors
    // ═══════════════════════════════════════════════════════════

    /// Email address is not well formed.
    #[error("Invalid email address")]
    InvalidEmail,

    /// Password is shorter than the minimum length.
    #[error("Password must be at least {min_length} characters")]
    WeakPassword {
        /// Minimum accepted length
        min_length: usize,
    },

    /// An account already exists for this email.
    #[error("An account with this email already exists")]
    EmailTaken,

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Password hashing or token signing failed.
    #[error("Crypto error: {0}")]
    Crypto(String),
}
