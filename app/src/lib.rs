//! # Eventbook
//!
//! Event listing and ticket booking as a JSON HTTP service.
//!
//! Users browse events, sign up, sign in and book tickets; administrators
//! manage events through a CRUD API. A booking is admitted only if the event
//! exists, the user has not booked it yet and tickets remain. That check and
//! the insert run atomically in the storage layer, so concurrent requests
//! never oversell an event.
//!
//! # Layout
//!
//! - [`config`]: environment configuration
//! - [`server`]: router, shared state, shutdown
//! - [`auth`]: sign-up, sign-in and session extractors
//! - [`api`]: events, bookings, admin, upload and seed endpoints
//! - [`media`]: image uploads
//! - [`metrics`]: Prometheus business metrics
//!
//! # Example
//!
//! ```
//! use eventbook::{AppState, build_router};
//! use eventbook_auth::{PasswordHasher, TokenIssuer};
//! use eventbook_core::environment::SystemClock;
//! use eventbook_testing::InMemoryStore;
//! use std::sync::Arc;
//!
//! let state = AppState::new(
//!     InMemoryStore::new(),
//!     Arc::new(SystemClock),
//!     TokenIssuer::new(b"secret", chrono::Duration::days(7)),
//!     PasswordHasher::default(),
//! );
//! let app = build_router(state);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod config;
pub mod media;
pub mod metrics;
pub mod server;

pub use config::Config;
pub use server::{AppState, build_router};
