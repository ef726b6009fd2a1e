//! JSON API endpoints under `/api`.
//!
//! - [`events`]: public event listing and details
//! - [`bookings`]: booking tickets and listing the caller's bookings
//! - [`admin`]: dashboard and event management
//! - [`upload`]: image uploads for event artwork
//! - [`seed`]: sample data for development

pub mod admin;
pub mod bookings;
pub mod events;
pub mod seed;
pub mod upload;

use eventbook_core::types::EventId;
use eventbook_web::AppError;
use uuid::Uuid;

/// Parse an event ID from a path or body.
///
/// A malformed ID cannot name an existing event, so it is a 404.
pub(crate) fn parse_event_id(raw: &str) -> Result<EventId, AppError> {
    Uuid::parse_str(raw.trim())
        .map(EventId::from_uuid)
        .map_err(|_| AppError::route_not_found("Event not found"))
}
