//! Router configuration for Eventbook.
//!
//! Builds the complete Axum router with all endpoints.

use super::state::AppState;
use crate::api::{admin, bookings, events, seed, upload};
use crate::auth::handlers as auth;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use eventbook_web::{AppError, correlation_id_layer, handlers::health_check};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Prometheus text exposition of the installed recorder.
#[allow(clippy::unused_async)]
async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}

#[allow(clippy::unused_async)]
async fn not_found() -> AppError {
    AppError::route_not_found("Not found")
}

/// Build the complete Axum router.
///
/// Configures all routes including:
/// - Health check and metrics
/// - Authentication endpoints
/// - Public event endpoints
/// - Booking endpoints
/// - Admin endpoints
/// - Image upload and seeding
///
/// Every response carries an `X-Correlation-ID` header.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Authentication
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
        .route("/auth/session", get(auth::session))
        // Public events
        .route("/events", get(events::list_events))
        .route("/events/:id", get(events::get_event))
        // Bookings
        .route(
            "/bookings",
            post(bookings::create_booking).get(bookings::list_bookings),
        )
        // Administration
        .route("/admin/stats", get(admin::stats))
        .route(
            "/admin/events",
            get(admin::list_events).post(admin::create_event),
        )
        .route(
            "/admin/events/:id",
            get(admin::get_event)
                .put(admin::update_event)
                .delete(admin::delete_event),
        )
        // Media and development data
        .route("/upload", post(upload::upload_image))
        .route("/seed", post(seed::seed).get(seed::seed));

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_endpoint))
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(correlation_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
