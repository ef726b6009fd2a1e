//! `/api/seed` - Sample data for development.
//!
//! Served only when `ENABLE_SEED_ROUTE=true`; otherwise the route answers 404
//! like any unknown path. Seeding is idempotent: it does nothing once any
//! event exists.

use crate::auth::handlers::hash_password;
use crate::server::state::AppState;
use axum::{Json, extract::State};
use chrono::Duration;
use eventbook_core::error::StoreError;
use eventbook_core::types::{Event, EventDraft, NewUser, Role, User};
use eventbook_core::validation::PLACEHOLDER_IMAGE;
use eventbook_web::AppError;
use serde::Serialize;

/// Email of the seeded administrator.
pub const SEED_ADMIN_EMAIL: &str = "admin@example.com";

/// Password of the seeded administrator.
pub const SEED_ADMIN_PASSWORD: &str = "password";

/// Response for the seed endpoint.
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    /// What happened
    pub message: String,
}

struct Sample {
    title: &'static str,
    description: &'static str,
    venue: &'static str,
    category: &'static str,
    days_ahead: i64,
    price: f64,
    tickets: i32,
}

const SAMPLES: [Sample; 3] = [
    Sample {
        title: "Web Development Workshop",
        description: "Learn the basics of web development with HTML, CSS, and JavaScript.",
        venue: "Tech Hub, 123 Main St",
        category: "Workshop",
        days_ahead: 7,
        price: 25.0,
        tickets: 30,
    },
    Sample {
        title: "Data Science Conference",
        description: "Join industry experts for a day of talks on the latest in data science.",
        venue: "Convention Center, 456 Park Ave",
        category: "Conference",
        days_ahead: 14,
        price: 99.0,
        tickets: 200,
    },
    Sample {
        title: "Mobile App Development Bootcamp",
        description: "Intensive 3-day bootcamp on building mobile apps with React Native.",
        venue: "Innovation Lab, 789 Tech Blvd",
        category: "Bootcamp",
        days_ahead: 21,
        price: 149.0,
        tickets: 50,
    },
];

async fn seed_admin(state: &AppState) -> Result<User, AppError> {
    if let Some(admin) = state.users.find_by_email(SEED_ADMIN_EMAIL).await? {
        return Ok(admin);
    }

    let password_hash = hash_password(state.passwords, SEED_ADMIN_PASSWORD.to_string()).await?;
    let admin = NewUser {
        name: Some("Admin User".to_string()),
        email: SEED_ADMIN_EMAIL.to_string(),
        password_hash,
        role: Role::Admin,
    };

    match state.users.create_user(admin, state.clock.now()).await {
        Ok(user) => Ok(user),
        // Lost a race with a concurrent seed request.
        Err(StoreError::Duplicate(_)) => state
            .users
            .find_by_email(SEED_ADMIN_EMAIL)
            .await?
            .ok_or_else(|| AppError::internal("Seed administrator disappeared")),
        Err(e) => Err(e.into()),
    }
}

/// Create the sample administrator and events unless events already exist.
///
/// Returns the number of events created.
///
/// # Errors
///
/// Returns an [`AppError`] if storage or password hashing fails.
pub async fn seed_sample_data(state: &AppState) -> Result<usize, AppError> {
    if state.events.count_events().await? > 0 {
        return Ok(0);
    }

    let admin = seed_admin(state).await?;
    let now = state.clock.now();

    for sample in &SAMPLES {
        let draft = EventDraft {
            title: sample.title.to_string(),
            description: sample.description.to_string(),
            venue: sample.venue.to_string(),
            category: Some(sample.category.to_string()),
            date: now + Duration::days(sample.days_ahead),
            price: sample.price,
            available_tickets: sample.tickets,
            image_url: PLACEHOLDER_IMAGE.to_string(),
        };
        state
            .events
            .create_event(Event::from_draft(draft, admin.id, now))
            .await?;
    }

    tracing::info!(count = SAMPLES.len(), "Seeded sample events");
    Ok(SAMPLES.len())
}

/// Seed the database.
///
/// # Errors
///
/// - 404 when the seed route is disabled
/// - 500 if storage fails
pub async fn seed(State(state): State<AppState>) -> Result<Json<SeedResponse>, AppError> {
    if !state.seed_enabled {
        return Err(AppError::route_not_found("Not found"));
    }

    let message = if seed_sample_data(&state).await? == 0 {
        "Database already has events"
    } else {
        "Sample events created successfully"
    };

    Ok(Json(SeedResponse {
        message: message.to_string(),
    }))
}
