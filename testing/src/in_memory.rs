//! In-memory storage for fast, deterministic tests.
//!
//! [`InMemoryStore`] implements all three storage traits over a single set of
//! tables behind one mutex, so a booking's admission check and insert happen
//! under the same lock and concurrent `try_book` calls serialize.

use chrono::{DateTime, Utc};
use eventbook_core::admission::admit;
use eventbook_core::error::{BookingError, StoreError};
use eventbook_core::store::{BookingLedger, EventCatalog, StoreFuture, UserDirectory};
use eventbook_core::types::{
    Attendee, Booking, BookingWithEvent, DateOrder, Event, EventDetail, EventFilter, EventId,
    EventSummary, NewUser, User, UserId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    events: HashMap<EventId, Event>,
    bookings: Vec<Booking>,
}

impl Tables {
    fn booking_count(&self, event_id: EventId) -> u64 {
        self.bookings
            .iter()
            .filter(|b| b.event_id == event_id)
            .count() as u64
    }

    fn is_booked(&self, user_id: UserId, event_id: EventId) -> bool {
        self.bookings
            .iter()
            .any(|b| b.user_id == user_id && b.event_id == event_id)
    }

    fn summary(&self, event: &Event) -> EventSummary {
        EventSummary {
            event: event.clone(),
            creator_name: event
                .creator_id
                .and_then(|id| self.users.get(&id))
                .and_then(|u| u.name.clone()),
            booking_count: self.booking_count(event.id),
        }
    }
}

/// In-memory implementation of `EventCatalog`, `BookingLedger` and
/// `UserDirectory`.
///
/// Clones share the same tables.
///
/// # Example
///
/// ```
/// use eventbook_testing::InMemoryStore;
/// use eventbook_core::store::EventCatalog;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryStore::new();
/// assert_eq!(store.count_events().await?, 0);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Database("in-memory store lock poisoned".to_string()))
    }

    fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Tables) -> T,
    {
        Ok(f(&*self.lock()?))
    }

    /// Number of stored bookings
    ///
    /// Useful for assertions in tests.
    #[must_use]
    pub fn booking_len(&self) -> usize {
        self.lock().map(|t| t.bookings.len()).unwrap_or_default()
    }

    /// Remove every user, event and booking (for test isolation)
    pub fn clear(&self) {
        if let Ok(mut tables) = self.lock() {
            *tables = Tables::default();
        }
    }
}

impl EventCatalog for InMemoryStore {
    fn list_events(&self, filter: EventFilter, order: DateOrder) -> StoreFuture<'_, Vec<EventSummary>> {
        let filter = filter.normalized();
        let result = self.read(|t| {
            let mut events: Vec<&Event> = t.events.values().filter(|e| filter.matches(e)).collect();
            events.sort_by_key(|e| (e.date, e.created_at));
            if order == DateOrder::Descending {
                events.reverse();
            }
            events.into_iter().map(|e| t.summary(e)).collect()
        });
        Box::pin(async move { result })
    }

    fn get_event(&self, id: EventId) -> StoreFuture<'_, Option<EventSummary>> {
        let result = self.read(|t| t.events.get(&id).map(|e| t.summary(e)));
        Box::pin(async move { result })
    }

    fn get_event_detail(&self, id: EventId) -> StoreFuture<'_, Option<EventDetail>> {
        let result = self.read(|t| {
            t.events.get(&id).map(|event| {
                let mut bookings: Vec<&Booking> =
                    t.bookings.iter().filter(|b| b.event_id == id).collect();
                bookings.sort_by_key(|b| b.created_at);
                let attendees = bookings
                    .into_iter()
                    .filter_map(|b| {
                        t.users.get(&b.user_id).map(|u| Attendee {
                            booking_id: b.id,
                            name: u.name.clone(),
                            email: u.email.clone(),
                        })
                    })
                    .collect();
                EventDetail {
                    summary: t.summary(event),
                    creator_email: event
                        .creator_id
                        .and_then(|c| t.users.get(&c))
                        .map(|u| u.email.clone()),
                    attendees,
                }
            })
        });
        Box::pin(async move { result })
    }

    fn create_event(&self, event: Event) -> StoreFuture<'_, Event> {
        let result = self.lock().map(|mut t| {
            t.events.insert(event.id, event.clone());
            event
        });
        Box::pin(async move { result })
    }

    fn update_event(&self, event: Event) -> StoreFuture<'_, Event> {
        let result = self.lock().and_then(|mut t| match t.events.get_mut(&event.id) {
            Some(slot) => {
                *slot = event.clone();
                Ok(event)
            }
            None => Err(StoreError::event_not_found(event.id)),
        });
        Box::pin(async move { result })
    }

    fn delete_event(&self, id: EventId) -> StoreFuture<'_, u64> {
        let result = self.lock().and_then(|mut t| {
            if t.events.remove(&id).is_none() {
                return Err(StoreError::event_not_found(id));
            }
            let before = t.bookings.len();
            t.bookings.retain(|b| b.event_id != id);
            Ok((before - t.bookings.len()) as u64)
        });
        Box::pin(async move { result })
    }

    fn count_events(&self) -> StoreFuture<'_, u64> {
        let result = self.read(|t| t.events.len() as u64);
        Box::pin(async move { result })
    }

    fn recent_events(&self, limit: u32) -> StoreFuture<'_, Vec<EventSummary>> {
        let result = self.read(|t| {
            let mut events: Vec<&Event> = t.events.values().collect();
            events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            events
                .into_iter()
                .take(limit as usize)
                .map(|e| t.summary(e))
                .collect()
        });
        Box::pin(async move { result })
    }
}

impl BookingLedger for InMemoryStore {
    fn try_book(
        &self,
        user_id: UserId,
        event_id: EventId,
        now: DateTime<Utc>,
    ) -> StoreFuture<'_, Booking, BookingError> {
        let result = self.lock().map_err(BookingError::from).and_then(|mut t| {
            admit(
                event_id,
                t.events.get(&event_id),
                t.is_booked(user_id, event_id),
                t.booking_count(event_id),
            )?;
            let booking = Booking::new(user_id, event_id, now);
            t.bookings.push(booking.clone());
            Ok(booking)
        });
        Box::pin(async move { result })
    }

    fn bookings_for_user(&self, user_id: UserId) -> StoreFuture<'_, Vec<BookingWithEvent>> {
        let result = self.read(|t| {
            let mut bookings: Vec<BookingWithEvent> = t
                .bookings
                .iter()
                .filter(|b| b.user_id == user_id)
                .filter_map(|b| {
                    t.events.get(&b.event_id).map(|e| BookingWithEvent {
                        booking: b.clone(),
                        event: e.clone(),
                    })
                })
                .collect();
            bookings.sort_by(|a, b| b.booking.created_at.cmp(&a.booking.created_at));
            bookings
        });
        Box::pin(async move { result })
    }

    fn is_booked(&self, user_id: UserId, event_id: EventId) -> StoreFuture<'_, bool> {
        let result = self.read(|t| t.is_booked(user_id, event_id));
        Box::pin(async move { result })
    }

    fn count_for_event(&self, event_id: EventId) -> StoreFuture<'_, u64> {
        let result = self.read(|t| t.booking_count(event_id));
        Box::pin(async move { result })
    }

    fn count_bookings(&self) -> StoreFuture<'_, u64> {
        let result = self.read(|t| t.bookings.len() as u64);
        Box::pin(async move { result })
    }
}

impl UserDirectory for InMemoryStore {
    fn create_user(&self, user: NewUser, now: DateTime<Utc>) -> StoreFuture<'_, User> {
        let result = self.lock().and_then(|mut t| {
            if t.users.values().any(|u| u.email == user.email) {
                return Err(StoreError::Duplicate(format!("email {}", user.email)));
            }
            let created = User {
                id: UserId::new(),
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
                role: user.role,
                created_at: now,
            };
            t.users.insert(created.id, created.clone());
            Ok(created)
        });
        Box::pin(async move { result })
    }

    fn find_by_email(&self, email: &str) -> StoreFuture<'_, Option<User>> {
        let result = self.read(|t| t.users.values().find(|u| u.email == email).cloned());
        Box::pin(async move { result })
    }

    fn find_by_id(&self, id: UserId) -> StoreFuture<'_, Option<User>> {
        let result = self.read(|t| t.users.get(&id).cloned());
        Box::pin(async move { result })
    }

    fn count_users(&self) -> StoreFuture<'_, u64> {
        let result = self.read(|t| t.users.len() as u64);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::helpers::{draft, new_user};
    use crate::test_clock;
    use eventbook_core::environment::Clock;

    async fn seeded(tickets: i32) -> (InMemoryStore, User, Event) {
        let store = InMemoryStore::new();
        let now = test_clock().now();
        let admin = store.create_user(new_user("admin@example.com"), now).await.unwrap();
        let event = Event::from_draft(draft("Jazz Night", tickets), admin.id, now);
        let event = store.create_event(event).await.unwrap();
        (store, admin, event)
    }

    #[tokio::test]
    async fn summary_includes_creator_and_count() {
        let (store, admin, event) = seeded(10).await;
        store.try_book(admin.id, event.id, test_clock().now()).await.unwrap();

        let listing = store
            .list_events(EventFilter::default(), DateOrder::Ascending)
            .await
            .unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].booking_count, 1);
        assert_eq!(listing[0].creator_name, admin.name);
    }

    #[tokio::test]
    async fn same_date_events_ordered_by_creation() {
        let store = InMemoryStore::new();
        let now = test_clock().now();
        let admin = store.create_user(new_user("admin@example.com"), now).await.unwrap();

        let mut ids = Vec::new();
        for i in 0..8 {
            let created = now + chrono::Duration::minutes(i);
            let event = Event::from_draft(draft(&format!("Event {i}"), 10), admin.id, created);
            ids.push(store.create_event(event).await.unwrap().id);
        }

        let ascending: Vec<EventId> = store
            .list_events(EventFilter::default(), DateOrder::Ascending)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.event.id)
            .collect();
        assert_eq!(ascending, ids);

        let descending: Vec<EventId> = store
            .list_events(EventFilter::default(), DateOrder::Descending)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.event.id)
            .collect();
        ids.reverse();
        assert_eq!(descending, ids);
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let store = InMemoryStore::new();
        let now = test_clock().now();
        store.create_user(new_user("a@example.com"), now).await.unwrap();
        let err = store.create_user(new_user("a@example.com"), now).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn delete_cascades_to_bookings() {
        let (store, admin, event) = seeded(10).await;
        store.try_book(admin.id, event.id, test_clock().now()).await.unwrap();

        assert_eq!(store.delete_event(event.id).await.unwrap(), 1);
        assert_eq!(store.count_bookings().await.unwrap(), 0);
        assert!(store.get_event(event.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_resets_tables() {
        let (store, _, _) = seeded(10).await;
        store.clear();
        assert_eq!(store.count_events().await.unwrap(), 0);
        assert_eq!(store.count_users().await.unwrap(), 0);
    }
}
