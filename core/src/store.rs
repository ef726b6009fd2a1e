//! Storage abstractions for events, bookings and users.
//!
//! Handlers hold these as `Arc<dyn Trait>` so the same router runs against
//! `PostgreSQL` in production and against the in-memory store in tests.
//!
//! # Implementations
//!
//! - `PostgresStore` (in `eventbook-postgres`): production storage
//! - `InMemoryStore` (in `eventbook-testing`): fast, deterministic tests
//!
//! # Dyn Compatibility
//!
//! Methods return [`StoreFuture`] instead of using `async fn` so the traits
//! stay object safe.

use crate::error::{BookingError, StoreError};
use crate::types::{
    Booking, BookingWithEvent, DateOrder, Event, EventDetail, EventFilter, EventId, EventSummary,
    NewUser, User, UserId,
};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by storage methods.
pub type StoreFuture<'a, T, E = StoreError> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Event catalog: the events and their read models.
pub trait EventCatalog: Send + Sync {
    /// List events matching `filter`, ordered by date.
    ///
    /// Each summary carries the creator's name and the event's booking count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn list_events(&self, filter: EventFilter, order: DateOrder) -> StoreFuture<'_, Vec<EventSummary>>;

    /// Load a single event with its creator name and booking count.
    ///
    /// Returns `None` when no event has this ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn get_event(&self, id: EventId) -> StoreFuture<'_, Option<EventSummary>>;

    /// Load an event together with its creator and attendees.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn get_event_detail(&self, id: EventId) -> StoreFuture<'_, Option<EventDetail>>;

    /// Insert a new event.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the insert fails.
    fn create_event(&self, event: Event) -> StoreFuture<'_, Event>;

    /// Replace an existing event's editable fields.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the event does not exist
    /// - [`StoreError::Database`] if the update fails
    fn update_event(&self, event: Event) -> StoreFuture<'_, Event>;

    /// Delete an event and all of its bookings.
    ///
    /// Returns the number of bookings removed.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if the event does not exist
    /// - [`StoreError::Database`] if the delete fails
    fn delete_event(&self, id: EventId) -> StoreFuture<'_, u64>;

    /// Number of events.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn count_events(&self) -> StoreFuture<'_, u64>;

    /// The `limit` most recently created events, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn recent_events(&self, limit: u32) -> StoreFuture<'_, Vec<EventSummary>>;
}

/// Booking ledger: who holds a ticket for what.
pub trait BookingLedger: Send + Sync {
    /// Atomically admit and record a booking.
    ///
    /// Implementations run [`crate::admission::admit`] and the insert as one
    /// unit: two concurrent calls for the last ticket, or for the same
    /// (user, event) pair, never both succeed.
    ///
    /// # Errors
    ///
    /// - [`BookingError::EventNotFound`] if the event does not exist
    /// - [`BookingError::AlreadyBooked`] if the user already booked it
    /// - [`BookingError::CapacityExceeded`] if no tickets remain
    /// - [`BookingError::Store`] on storage failure
    fn try_book(
        &self,
        user_id: UserId,
        event_id: EventId,
        now: DateTime<Utc>,
    ) -> StoreFuture<'_, Booking, BookingError>;

    /// A user's bookings with their events, newest booking first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn bookings_for_user(&self, user_id: UserId) -> StoreFuture<'_, Vec<BookingWithEvent>>;

    /// Whether the user holds a booking for the event.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn is_booked(&self, user_id: UserId, event_id: EventId) -> StoreFuture<'_, bool>;

    /// Number of bookings for one event.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn count_for_event(&self, event_id: EventId) -> StoreFuture<'_, u64>;

    /// Number of bookings across all events.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn count_bookings(&self) -> StoreFuture<'_, u64>;
}

/// Registered users.
pub trait UserDirectory: Send + Sync {
    /// Register a user. The email must already be normalized.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Duplicate`] if the email is taken
    /// - [`StoreError::Database`] if the insert fails
    fn create_user(&self, user: NewUser, now: DateTime<Utc>) -> StoreFuture<'_, User>;

    /// Look up a user by normalized email.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn find_by_email(&self, email: &str) -> StoreFuture<'_, Option<User>>;

    /// Look up a user by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn find_by_id(&self, id: UserId) -> StoreFuture<'_, Option<User>>;

    /// Number of registered users.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the query fails.
    fn count_users(&self) -> StoreFuture<'_, u64>;
}
