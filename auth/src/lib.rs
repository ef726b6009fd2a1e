//! # Eventbook Auth
//!
//! Credentials and sessions for Eventbook.
//!
//! - [`password`]: bcrypt hashing
//! - [`token`]: signed, self-contained session tokens
//! - [`utils`]: email and password validation
//!
//! The HTTP surface (sign-up, sign-in, session extractors) lives in the
//! application crate; this crate has no web dependencies.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod password;
pub mod token;
pub mod utils;

pub use error::{AuthError, Result};
pub use password::PasswordHasher;
pub use token::{SessionClaims, TokenIssuer};
