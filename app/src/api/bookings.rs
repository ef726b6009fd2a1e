//! Booking endpoints.
//!
//! - POST /api/bookings - Book a ticket for an event
//! - GET /api/bookings - The caller's bookings with their events
//!
//! Admission (event exists, not booked twice, capacity left) and the insert
//! happen atomically inside [`eventbook_core::store::BookingLedger::try_book`].

use super::parse_event_id;
use crate::auth::middleware::SessionUser;
use crate::metrics;
use crate::server::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use eventbook_core::types::{Booking, BookingWithEvent};
use eventbook_web::{AppError, CorrelationId, JsonBody};
use serde::{Deserialize, Serialize};

/// Request to book an event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Event to book
    pub event_id: Option<String>,
}

/// Response after booking.
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    /// Success message
    pub message: String,
    /// The new booking
    pub booking: Booking,
}

/// Response for listing bookings.
#[derive(Debug, Serialize)]
pub struct ListBookingsResponse {
    /// Bookings, newest first, each with its event
    pub bookings: Vec<BookingWithEvent>,
}

/// Book a ticket.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/bookings \
///   -H "Authorization: Bearer <session_token>" \
///   -H "Content-Type: application/json" \
///   -d '{"eventId": "1f0e..."}'
/// ```
///
/// # Errors
///
/// - 400 if `eventId` is missing, or the event is fully booked
/// - 401 without a valid session
/// - 404 if the event does not exist
/// - 409 if the caller already booked it
/// - 500 if storage fails
pub async fn create_booking(
    State(state): State<AppState>,
    session: SessionUser,
    CorrelationId(correlation_id): CorrelationId,
    JsonBody(request): JsonBody<BookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let raw_id = request
        .event_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Event ID is required"))?;
    let event_id = parse_event_id(&raw_id)?;

    let booking = match state
        .bookings
        .try_book(session.user_id, event_id, state.clock.now())
        .await
    {
        Ok(booking) => booking,
        Err(e) => {
            metrics::record_booking(e.reason());
            tracing::info!(
                correlation_id = %correlation_id,
                user_id = %session.user_id,
                event_id = %event_id,
                reason = e.reason(),
                "Booking refused"
            );
            return Err(e.into());
        }
    };

    metrics::record_booking("created");
    tracing::info!(
        correlation_id = %correlation_id,
        booking_id = %booking.id,
        user_id = %session.user_id,
        event_id = %event_id,
        "Event booked"
    );

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            message: "Event booked successfully".to_string(),
            booking,
        }),
    ))
}

/// List the caller's bookings.
///
/// # Errors
///
/// - 401 without a valid session
/// - 500 if storage fails
pub async fn list_bookings(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<ListBookingsResponse>, AppError> {
    let bookings = state.bookings.bookings_for_user(session.user_id).await?;
    Ok(Json(ListBookingsResponse { bookings }))
}
