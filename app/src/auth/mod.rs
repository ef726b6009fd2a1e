//! Sign-up, sign-in and session extractors.

pub mod handlers;
pub mod middleware;

pub use middleware::{BearerToken, OptionalSession, RequireAdmin, SessionUser};
