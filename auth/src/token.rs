//! Signed session tokens.
//!
//! A session is an HS256 JWT carrying the user's identity and role. The
//! token is self-contained: the server keeps no session table, and a token
//! stays valid until its `exp` claim passes.
//!
//! Expiry is checked against the caller's clock rather than the system
//! clock, so tests with a fixed clock get deterministic results.

use crate::error::{AuthError, Result};
use chrono::{DateTime, Duration, Utc};
use eventbook_core::types::{Role, User, UserId};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims stored in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub sub: String,
    /// Email at sign-in time
    pub email: String,
    /// Display name at sign-in time
    pub name: Option<String>,
    /// Role at sign-in time
    pub role: Role,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expires at (seconds since epoch)
    pub exp: i64,
}

impl SessionClaims {
    /// The user this session belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if `sub` is not a UUID.
    pub fn user_id(&self) -> Result<UserId> {
        Uuid::parse_str(&self.sub)
            .map(UserId::from_uuid)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Whether the session belongs to an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer signing with `secret`; tokens live for `ttl`.
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Lifetime of issued tokens.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user` at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Crypto`] if signing fails.
    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<String> {
        let claims = SessionClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Crypto(format!("Failed to sign session token: {e}")))
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidToken`] if the token is malformed or its signature is wrong
    /// - [`AuthError::SessionExpired`] if `exp` is not after `now`
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected session token");
                AuthError::InvalidToken
            })?
            .claims;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::SessionExpired);
        }
        Ok(claims)
    }
}
