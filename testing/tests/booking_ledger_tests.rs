//! Admission behaviour of the in-memory booking ledger

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use eventbook_core::admission::effective_capacity;
use eventbook_core::environment::Clock;
use eventbook_core::error::BookingError;
use eventbook_core::store::{BookingLedger, EventCatalog, UserDirectory};
use eventbook_core::types::{Event, EventId, UserId};
use eventbook_testing::{InMemoryStore, helpers, properties, test_clock};
use proptest::prelude::*;

async fn store_with_event(available_tickets: Option<i32>) -> (InMemoryStore, EventId) {
    let store = InMemoryStore::new();
    let now = test_clock().now();
    let admin = store
        .create_user(helpers::new_admin("admin@example.com"), now)
        .await
        .unwrap();
    let mut event = Event::from_draft(helpers::draft("Tech Conference", 1), admin.id, now);
    event.available_tickets = available_tickets;
    let event = store.create_event(event).await.unwrap();
    (store, event.id)
}

async fn register(store: &InMemoryStore, n: usize) -> Vec<UserId> {
    let now = test_clock().now();
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let user = store
            .create_user(helpers::new_user(&format!("user{i}@example.com")), now)
            .await
            .unwrap();
        ids.push(user.id);
    }
    ids
}

#[tokio::test]
async fn unknown_event_is_not_found() {
    let store = InMemoryStore::new();
    let missing = EventId::new();
    let err = store
        .try_book(UserId::new(), missing, test_clock().now())
        .await
        .unwrap_err();
    assert_eq!(err, BookingError::EventNotFound(missing));
}

#[tokio::test]
async fn second_booking_by_same_user_conflicts() {
    let (store, event_id) = store_with_event(Some(5)).await;
    let user = register(&store, 1).await[0];
    let now = test_clock().now();

    store.try_book(user, event_id, now).await.unwrap();
    let err = store.try_book(user, event_id, now).await.unwrap_err();

    assert_eq!(err, BookingError::AlreadyBooked);
    assert_eq!(store.count_for_event(event_id).await.unwrap(), 1);
}

#[tokio::test]
async fn single_ticket_event_admits_one_user() {
    let (store, event_id) = store_with_event(Some(1)).await;
    let users = register(&store, 2).await;
    let now = test_clock().now();

    store.try_book(users[0], event_id, now).await.unwrap();
    let err = store.try_book(users[1], event_id, now).await.unwrap_err();

    assert_eq!(err, BookingError::CapacityExceeded { capacity: 1 });
}

#[tokio::test]
async fn bookings_for_user_include_the_event() {
    let (store, event_id) = store_with_event(None).await;
    let user = register(&store, 1).await[0];
    store.try_book(user, event_id, test_clock().now()).await.unwrap();

    let bookings = store.bookings_for_user(user).await.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].event.id, event_id);
    assert!(store.is_booked(user, event_id).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_never_oversell() {
    let (store, event_id) = store_with_event(Some(3)).await;
    let users = register(&store, 20).await;
    let now = test_clock().now();

    let attempts = users.into_iter().map(|user| {
        let store = store.clone();
        tokio::spawn(async move { store.try_book(user, event_id, now).await })
    });
    let results = futures::future::join_all(attempts).await;

    let admitted = results
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .filter(Result::is_ok)
        .count();
    assert_eq!(admitted, 3);
    assert_eq!(store.count_for_event(event_id).await.unwrap(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicates_admit_once() {
    let (store, event_id) = store_with_event(Some(10)).await;
    let user = register(&store, 1).await[0];
    let now = test_clock().now();

    let attempts = (0..8).map(|_| {
        let store = store.clone();
        tokio::spawn(async move { store.try_book(user, event_id, now).await })
    });
    let results = futures::future::join_all(attempts).await;

    let admitted = results
        .into_iter()
        .map(|joined| joined.expect("task panicked"))
        .filter(Result::is_ok)
        .count();
    assert_eq!(admitted, 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn admitted_bookings_never_exceed_capacity(
        tickets in properties::available_tickets(),
        contenders in properties::contenders(),
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let admitted = runtime.block_on(async {
            let (store, event_id) = store_with_event(tickets).await;
            let users = register(&store, contenders).await;
            let now = test_clock().now();
            let mut admitted = 0_usize;
            for user in users {
                if store.try_book(user, event_id, now).await.is_ok() {
                    admitted += 1;
                }
            }
            admitted
        });

        let capacity = effective_capacity(tickets) as usize;
        prop_assert_eq!(admitted, contenders.min(capacity));
    }
}
