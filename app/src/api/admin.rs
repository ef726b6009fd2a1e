//! Administrator endpoints.
//!
//! - GET /api/admin/stats - Dashboard counts and recent events
//! - GET /api/admin/events - All events, latest date first
//! - POST /api/admin/events - Create an event
//! - GET /api/admin/events/:id - Event with creator and attendees
//! - PUT /api/admin/events/:id - Replace an event's editable fields
//! - DELETE /api/admin/events/:id - Delete an event and its bookings
//!
//! Every handler takes [`RequireAdmin`]: 401 without a session, 403 for
//! non-admins.

use super::parse_event_id;
use crate::auth::middleware::RequireAdmin;
use crate::metrics;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use eventbook_core::types::{DashboardStats, DateOrder, Event, EventDetail, EventFilter, EventSummary};
use eventbook_core::validation::EventForm;
use eventbook_web::{AppError, JsonBody};
use serde::Serialize;

/// Number of recent events on the dashboard.
pub const RECENT_EVENTS: u32 = 5;

/// Response for listing events.
#[derive(Debug, Serialize)]
pub struct AdminEventsResponse {
    /// All events with creator name and booking count
    pub events: Vec<EventSummary>,
}

/// Response after creating or updating an event.
#[derive(Debug, Serialize)]
pub struct EventChangeResponse {
    /// Success message
    pub message: String,
    /// The stored event
    pub event: Event,
}

/// Response for one event.
#[derive(Debug, Serialize)]
pub struct EventDetailResponse {
    /// Event with creator and attendees
    pub event: EventDetail,
}

/// Response after deleting an event.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEventResponse {
    /// Success message
    pub message: String,
    /// Bookings removed with the event
    pub deleted_bookings: u64,
}

/// Dashboard statistics.
///
/// # Errors
///
/// Returns 500 if storage fails.
pub async fn stats(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<DashboardStats>, AppError> {
    let (events_count, users_count, bookings_count, recent_events) = tokio::try_join!(
        state.events.count_events(),
        state.users.count_users(),
        state.bookings.count_bookings(),
        state.events.recent_events(RECENT_EVENTS),
    )?;

    Ok(Json(DashboardStats {
        events_count,
        users_count,
        bookings_count,
        recent_events,
    }))
}

/// List every event, latest date first.
///
/// # Errors
///
/// Returns 500 if storage fails.
pub async fn list_events(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<AdminEventsResponse>, AppError> {
    let events = state
        .events
        .list_events(EventFilter::default(), DateOrder::Descending)
        .await?;

    Ok(Json(AdminEventsResponse { events }))
}

/// Create an event owned by the calling admin.
///
/// A blank or invalid `imageUrl` is replaced by the placeholder image.
///
/// # Errors
///
/// - 400 if a required field is missing or invalid
/// - 500 if storage fails
pub async fn create_event(
    State(state): State<AppState>,
    admin: RequireAdmin,
    JsonBody(form): JsonBody<EventForm>,
) -> Result<(StatusCode, Json<EventChangeResponse>), AppError> {
    let draft = form.into_draft(None)?;
    let event = Event::from_draft(draft, admin.user_id, state.clock.now());
    let event = state.events.create_event(event).await?;

    metrics::record_event_change("created");
    tracing::info!(event_id = %event.id, admin_id = %admin.user_id, "Event created");

    Ok((
        StatusCode::CREATED,
        Json(EventChangeResponse {
            message: "Event created successfully".to_string(),
            event,
        }),
    ))
}

/// Get one event with its creator and attendees.
///
/// # Errors
///
/// - 404 if the event does not exist
/// - 500 if storage fails
pub async fn get_event(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<EventDetailResponse>, AppError> {
    let event = state
        .events
        .get_event_detail(parse_event_id(&id)?)
        .await?
        .ok_or_else(|| AppError::route_not_found("Event not found"))?;

    Ok(Json(EventDetailResponse { event }))
}

/// Replace an event's editable fields.
///
/// A blank or invalid `imageUrl` keeps the event's current image. The form
/// is validated before the event is looked up, so an invalid form is a 400
/// even for an unknown ID.
///
/// # Errors
///
/// - 400 if a required field is missing or invalid
/// - 404 if the event does not exist
/// - 500 if storage fails
pub async fn update_event(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<String>,
    JsonBody(form): JsonBody<EventForm>,
) -> Result<Json<EventChangeResponse>, AppError> {
    let event_id = parse_event_id(&id)?;
    let existing = state.events.get_event(event_id).await?;

    let draft = form.into_draft(
        existing
            .as_ref()
            .and_then(|summary| summary.event.image_url.as_deref()),
    )?;
    let mut event = existing
        .ok_or_else(|| AppError::route_not_found("Event not found"))?
        .event;

    event.apply_draft(draft, state.clock.now());
    let event = state.events.update_event(event).await?;

    metrics::record_event_change("updated");
    tracing::info!(event_id = %event.id, admin_id = %admin.user_id, "Event updated");

    Ok(Json(EventChangeResponse {
        message: "Event updated successfully".to_string(),
        event,
    }))
}

/// Delete an event together with all of its bookings.
///
/// # Errors
///
/// - 404 if the event does not exist
/// - 500 if storage fails
pub async fn delete_event(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<DeleteEventResponse>, AppError> {
    let event_id = parse_event_id(&id)?;
    let deleted_bookings = state.events.delete_event(event_id).await?;

    metrics::record_event_change("deleted");
    tracing::info!(
        event_id = %event_id,
        admin_id = %admin.user_id,
        deleted_bookings,
        "Event deleted"
    );

    Ok(Json(DeleteEventResponse {
        message: "Event deleted successfully".to_string(),
        deleted_bookings,
    }))
}
