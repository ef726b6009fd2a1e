//! Row types and their conversion into domain types.

use chrono::{DateTime, Utc};
use eventbook_core::error::StoreError;
use eventbook_core::types::{
    Attendee, Booking, BookingId, BookingWithEvent, Event, EventId, EventSummary, Role, User,
    UserId,
};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Columns selected for an event, prefixed for joins.
pub(crate) const EVENT_COLUMNS: &str = "e.id, e.title, e.description, e.venue, e.category, \
     e.date, e.price, e.available_tickets, e.image_url, e.creator_id, e.created_at, e.updated_at";

#[derive(Debug, FromRow)]
pub(crate) struct EventRow {
    id: Uuid,
    title: String,
    description: String,
    venue: String,
    category: Option<String>,
    date: DateTime<Utc>,
    price: f64,
    available_tickets: Option<i32>,
    image_url: Option<String>,
    creator_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            venue: row.venue,
            category: row.category,
            date: row.date,
            price: row.price,
            available_tickets: row.available_tickets,
            image_url: row.image_url,
            creator_id: row.creator_id.map(UserId::from_uuid),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct SummaryRow {
    #[sqlx(flatten)]
    event: EventRow,
    creator_name: Option<String>,
    creator_email: Option<String>,
    booking_count: i64,
}

impl SummaryRow {
    pub(crate) fn into_parts(self) -> (EventSummary, Option<String>) {
        let summary = EventSummary {
            event: self.event.into(),
            creator_name: self.creator_name,
            booking_count: u64::try_from(self.booking_count).unwrap_or_default(),
        };
        (summary, self.creator_email)
    }
}

impl From<SummaryRow> for EventSummary {
    fn from(row: SummaryRow) -> Self {
        row.into_parts().0
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    id: Uuid,
    name: Option<String>,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(&row.role)
            .map_err(|e| StoreError::Database(format!("Invalid role for user {}: {e}", row.id)))?;
        Ok(Self {
            id: UserId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct BookingRow {
    booking_id: Uuid,
    user_id: Uuid,
    booked_at: DateTime<Utc>,
    #[sqlx(flatten)]
    event: EventRow,
}

impl From<BookingRow> for BookingWithEvent {
    fn from(row: BookingRow) -> Self {
        let event: Event = row.event.into();
        Self {
            booking: Booking {
                id: BookingId::from_uuid(row.booking_id),
                user_id: UserId::from_uuid(row.user_id),
                event_id: event.id,
                created_at: row.booked_at,
            },
            event,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct AttendeeRow {
    booking_id: Uuid,
    name: Option<String>,
    email: String,
}

impl From<AttendeeRow> for Attendee {
    fn from(row: AttendeeRow) -> Self {
        Self {
            booking_id: BookingId::from_uuid(row.booking_id),
            name: row.name,
            email: row.email,
        }
    }
}

/// Build an `ILIKE` pattern matching `needle` anywhere, with wildcards escaped.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("jazz"), "%jazz%");
        assert_eq!(contains_pattern("100%_off"), "%100\\%\\_off%");
    }
}
