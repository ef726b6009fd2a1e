//! Axum integration for Eventbook.
//!
//! The HTTP shell around the storage traits in `eventbook-core`:
//!
//! - [`AppError`]: one error type for every handler, rendered as
//!   `{ "code": ..., "message": ... }` with the right status code
//! - [`extractors`]: correlation ID and a JSON body extractor whose
//!   rejections are [`AppError`]s
//! - [`middleware`]: correlation ID propagation and per-request spans
//! - [`handlers`]: the liveness endpoint
//!
//! # Request Flow
//!
//! 1. **Correlation layer** assigns an ID and opens the request span
//! 2. **Extractors** parse the session, path and body
//! 3. **Handler** calls the storage traits
//! 4. **Domain errors** convert into [`AppError`] through `?`
//!
//! # Example
//!
//! ```ignore
//! use eventbook_web::{AppError, JsonBody, correlation_id_layer};
//! use axum::{Router, routing::post, Json};
//!
//! async fn book(
//!     State(state): State<AppState>,
//!     JsonBody(request): JsonBody<BookingRequest>,
//! ) -> Result<Json<BookingResponse>, AppError> {
//!     let booking = state.bookings.try_book(user, request.event_id, now).await?;
//!     Ok(Json(booking.into()))
//! }
//!
//! let app = Router::new()
//!     .route("/api/bookings", post(book))
//!     .layer(correlation_id_layer())
//!     .with_state(app_state);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

pub use error::AppError;
pub use extractors::{CorrelationId, JsonBody};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
