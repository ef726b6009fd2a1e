//! Domain types for Eventbook.
//!
//! Value objects and entities shared by every layer: identifiers, users,
//! events, bookings and the read models built from them. All types serialize
//! with camelCase field names, which is the JSON wire format of the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EventId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `UserId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BookingId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Users
// ============================================================================

/// Role of a user account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can manage events through the admin API
    Admin,
    /// Ordinary user: browses and books events
    #[default]
    User,
}

impl Role {
    /// Database / token representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Returns `true` for administrators.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    // Accounts created before roles existed carry an empty role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" | "" => Ok(Self::User),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// A registered user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID
    pub id: UserId,
    /// Display name
    pub name: Option<String>,
    /// Unique, lowercase email address
    pub email: String,
    /// bcrypt hash of the password (never serialized)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Account role
    pub role: Role,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Data needed to register a new user.
#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    /// Display name
    pub name: Option<String>,
    /// Email address, already passed through [`normalize_email`]
    pub email: String,
    /// bcrypt hash of the password
    pub password_hash: String,
    /// Account role
    pub role: Role,
}

/// Normalise an email address for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ============================================================================
// Events
// ============================================================================

/// A bookable event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event ID
    pub id: EventId,
    /// Title
    pub title: String,
    /// Long description
    pub description: String,
    /// Where the event takes place
    pub venue: String,
    /// Optional category used for filtering
    pub category: Option<String>,
    /// When the event takes place
    pub date: DateTime<Utc>,
    /// Ticket price
    pub price: f64,
    /// Configured ticket count; `None` means the default capacity applies
    pub available_tickets: Option<i32>,
    /// Image URL or placeholder path
    pub image_url: Option<String>,
    /// Administrator who created the event
    pub creator_id: Option<UserId>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Maximum number of bookings this event accepts.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        crate::admission::effective_capacity(self.available_tickets)
    }

    /// Build a new event from a validated draft.
    #[must_use]
    pub fn from_draft(draft: EventDraft, creator_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: EventId::new(),
            title: draft.title,
            description: draft.description,
            venue: draft.venue,
            category: draft.category,
            date: draft.date,
            price: draft.price,
            available_tickets: Some(draft.available_tickets),
            image_url: Some(draft.image_url),
            creator_id: Some(creator_id),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields with a validated draft.
    pub fn apply_draft(&mut self, draft: EventDraft, now: DateTime<Utc>) {
        self.title = draft.title;
        self.description = draft.description;
        self.venue = draft.venue;
        self.category = draft.category;
        self.date = draft.date;
        self.price = draft.price;
        self.available_tickets = Some(draft.available_tickets);
        self.image_url = Some(draft.image_url);
        self.updated_at = now;
    }
}

/// Validated input for creating or updating an event.
///
/// Produced by [`crate::validation::EventForm::into_draft`].
#[derive(Clone, Debug, PartialEq)]
pub struct EventDraft {
    /// Title
    pub title: String,
    /// Long description
    pub description: String,
    /// Venue
    pub venue: String,
    /// Optional category
    pub category: Option<String>,
    /// Event date
    pub date: DateTime<Utc>,
    /// Ticket price
    pub price: f64,
    /// Ticket count (at least 1)
    pub available_tickets: i32,
    /// Image URL or placeholder path
    pub image_url: String,
}

/// Event as shown in listings: the event plus creator name and booking count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    /// The event itself
    #[serde(flatten)]
    pub event: Event,
    /// Name of the creating administrator
    pub creator_name: Option<String>,
    /// Number of bookings made so far
    pub booking_count: u64,
}

impl EventSummary {
    /// Tickets still available for booking.
    #[must_use]
    pub fn remaining_tickets(&self) -> u64 {
        u64::from(self.event.capacity()).saturating_sub(self.booking_count)
    }
}

/// A person holding a booking, as shown to administrators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    /// The booking
    pub booking_id: BookingId,
    /// Booker's name
    pub name: Option<String>,
    /// Booker's email
    pub email: String,
}

/// Administrator view of a single event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    /// Event with creator name and booking count
    #[serde(flatten)]
    pub summary: EventSummary,
    /// Email of the creating administrator
    pub creator_email: Option<String>,
    /// Everyone who booked the event
    pub attendees: Vec<Attendee>,
}

/// Listing filters. Every field is optional; empty strings are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct EventFilter {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Exact category
    pub category: Option<String>,
    /// Case-insensitive substring of the venue
    pub venue: Option<String>,
}

impl EventFilter {
    /// Drop blank values so they do not constrain the listing.
    #[must_use]
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }
        Self {
            title: keep(self.title),
            category: keep(self.category),
            venue: keep(self.venue),
        }
    }

    /// Whether an event passes this filter.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        let contains = |haystack: &str, needle: &str| {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        };
        self.title
            .as_deref()
            .is_none_or(|title| contains(&event.title, title))
            && self
                .category
                .as_deref()
                .is_none_or(|category| event.category.as_deref() == Some(category))
            && self
                .venue
                .as_deref()
                .is_none_or(|venue| contains(&event.venue, venue))
    }
}

/// Ordering of event listings by date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateOrder {
    /// Soonest first (public listing)
    #[default]
    Ascending,
    /// Latest first (admin listing)
    Descending,
}

// ============================================================================
// Bookings
// ============================================================================

/// A reserved ticket: one user, one event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Booking ID
    pub id: BookingId,
    /// Who booked
    pub user_id: UserId,
    /// What was booked
    pub event_id: EventId,
    /// When the booking was made
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Create a booking record for a user and an event.
    #[must_use]
    pub fn new(user_id: UserId, event_id: EventId, created_at: DateTime<Utc>) -> Self {
        Self {
            id: BookingId::new(),
            user_id,
            event_id,
            created_at,
        }
    }
}

/// A booking joined with its event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithEvent {
    /// The booking
    #[serde(flatten)]
    pub booking: Booking,
    /// The booked event
    pub event: Event,
}

// ============================================================================
// Dashboard
// ============================================================================

/// Totals shown on the admin dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of events
    pub events_count: u64,
    /// Number of registered users
    pub users_count: u64,
    /// Number of bookings across all events
    pub bookings_count: u64,
    /// Most recently created events
    pub recent_events: Vec<EventSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> Event {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().unwrap_or_default();
        Event {
            id: EventId::new(),
            title: "Rust Meetup".to_string(),
            description: "Monthly meetup".to_string(),
            venue: "Tech Hub, 123 Main St".to_string(),
            category: Some("Technology".to_string()),
            date: at,
            price: 0.0,
            available_tickets: Some(2),
            image_url: None,
            creator_id: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("user".parse::<Role>(), Ok(Role::User));
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: UserId::new(),
            name: Some("Ada".to_string()),
            email: "ada@example.com".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            role: Role::User,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap_or_default();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn event_serializes_camel_case() {
        let json = serde_json::to_value(sample_event()).unwrap_or_default();
        assert_eq!(json["availableTickets"], 2);
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("creatorId").is_some());
    }

    #[test]
    fn summary_flattens_event_fields() {
        let summary = EventSummary {
            event: sample_event(),
            creator_name: Some("Admin User".to_string()),
            booking_count: 1,
        };
        let json = serde_json::to_value(&summary).unwrap_or_default();
        assert_eq!(json["title"], "Rust Meetup");
        assert_eq!(json["bookingCount"], 1);
        assert_eq!(summary.remaining_tickets(), 1);
    }

    #[test]
    fn filter_matches_case_insensitive_substrings() {
        let event = sample_event();
        let filter = EventFilter {
            title: Some("rust".to_string()),
            category: Some("Technology".to_string()),
            venue: Some("TECH HUB".to_string()),
        };
        assert!(filter.matches(&event));

        let wrong_category = EventFilter {
            category: Some("technology".to_string()),
            ..EventFilter::default()
        };
        assert!(!wrong_category.matches(&event));
    }

    #[test]
    fn blank_filter_values_are_dropped() {
        let filter = EventFilter {
            title: Some("  ".to_string()),
            category: None,
            venue: Some(" hub ".to_string()),
        }
        .normalized();
        assert_eq!(filter.title, None);
        assert_eq!(filter.venue.as_deref(), Some("hub"));
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}
