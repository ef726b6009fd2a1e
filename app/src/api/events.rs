//! Public event endpoints.
//!
//! - GET /api/events - List events, soonest first, with optional filters
//! - GET /api/events/:id - Event details, plus whether the caller booked it

use super::parse_event_id;
use crate::auth::middleware::OptionalSession;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use eventbook_core::types::{DateOrder, EventFilter, EventSummary};
use eventbook_web::AppError;
use serde::Serialize;

/// Response for listing events.
#[derive(Debug, Serialize)]
pub struct ListEventsResponse {
    /// Matching events with creator name and booking count
    pub events: Vec<EventSummary>,
}

/// Event details response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    /// The event with creator name and booking count
    pub event: EventSummary,
    /// Tickets still available
    pub remaining_tickets: u64,
    /// Whether the caller holds a booking (always `false` when anonymous)
    pub booked_by_me: bool,
}

/// List events.
///
/// Query parameters `title` and `venue` match case-insensitive substrings;
/// `category` matches exactly.
///
/// # Example
///
/// ```bash
/// curl 'http://localhost:8080/api/events?title=jazz&venue=blue'
/// ```
///
/// # Errors
///
/// Returns 500 if storage fails.
pub async fn list_events(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> Result<Json<ListEventsResponse>, AppError> {
    let events = state
        .events
        .list_events(filter.normalized(), DateOrder::Ascending)
        .await?;

    Ok(Json(ListEventsResponse { events }))
}

/// Get one event.
///
/// # Errors
///
/// - 404 if the event does not exist
/// - 500 if storage fails
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    OptionalSession(session): OptionalSession,
) -> Result<Json<EventResponse>, AppError> {
    let event_id = parse_event_id(&id)?;

    let event = state
        .events
        .get_event(event_id)
        .await?
        .ok_or_else(|| AppError::route_not_found("Event not found"))?;

    let booked_by_me = match session {
        Some(session) => state.bookings.is_booked(session.user_id, event_id).await?,
        None => false,
    };

    Ok(Json(EventResponse {
        remaining_tickets: event.remaining_tickets(),
        event,
        booked_by_me,
    }))
}
