//! Booking admission rule.
//!
//! Decides whether a user may book an event. The checks run in a fixed
//! order and the first failing one wins:
//!
//! ```text
//! 1. event exists                      else EventNotFound
//! 2. user has no booking for the event else AlreadyBooked
//! 3. booked < capacity                 else CapacityExceeded
//! ```
//!
//! The rule is pure. Storage backends gather its inputs and call [`admit`]
//! inside the same transaction (or lock) that inserts the booking, so the
//! count cannot change between the check and the write.

use crate::error::BookingError;
use crate::types::{Event, EventId};

/// Capacity used when an event has no ticket count configured.
pub const DEFAULT_CAPACITY: u32 = 100;

/// Capacity of an event given its configured ticket count.
///
/// A missing count, or a count of zero or less, falls back to
/// [`DEFAULT_CAPACITY`].
#[must_use]
pub fn effective_capacity(available_tickets: Option<i32>) -> u32 {
    available_tickets
        .and_then(|n| u32::try_from(n).ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_CAPACITY)
}

/// Accepted booking attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Capacity the event was checked against
    pub capacity: u32,
    /// Tickets left once the new booking is stored
    pub remaining: u64,
}

/// Run the admission rule.
///
/// # Arguments
///
/// * `event_id` - The event being booked
/// * `event` - The stored event, if it exists
/// * `already_booked` - Whether the user already holds a booking for it
/// * `booked` - Number of bookings the event currently has
///
/// # Errors
///
/// Returns the first failing check as a [`BookingError`].
pub fn admit(
    event_id: EventId,
    event: Option<&Event>,
    already_booked: bool,
    booked: u64,
) -> Result<Admission, BookingError> {
    let event = event.ok_or(BookingError::EventNotFound(event_id))?;

    if already_booked {
        return Err(BookingError::AlreadyBooked);
    }

    let capacity = event.capacity();
    if booked >= u64::from(capacity) {
        return Err(BookingError::CapacityExceeded { capacity });
    }

    Ok(Admission {
        capacity,
        remaining: u64::from(capacity) - booked - 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Event;
    use chrono::Utc;
    use proptest::prelude::*;

    fn event_with_tickets(available_tickets: Option<i32>) -> Event {
        let now = Utc::now();
        Event {
            id: EventId::new(),
            title: "Data Science Conference".to_string(),
            description: "Talks".to_string(),
            venue: "Convention Center".to_string(),
            category: None,
            date: now,
            price: 99.0,
            available_tickets,
            image_url: None,
            creator_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn default_capacity_when_unset() {
        assert_eq!(effective_capacity(None), 100);
        assert_eq!(effective_capacity(Some(0)), 100);
        assert_eq!(effective_capacity(Some(-3)), 100);
        assert_eq!(effective_capacity(Some(30)), 30);
    }

    #[test]
    fn missing_event_is_checked_first() {
        let id = EventId::new();
        assert_eq!(admit(id, None, true, 1_000), Err(BookingError::EventNotFound(id)));
    }

    #[test]
    fn duplicate_wins_over_full_event() {
        let event = event_with_tickets(Some(1));
        assert_eq!(
            admit(event.id, Some(&event), true, 1),
            Err(BookingError::AlreadyBooked)
        );
    }

    #[test]
    fn last_ticket_is_admitted() {
        let event = event_with_tickets(Some(1));
        assert_eq!(
            admit(event.id, Some(&event), false, 0),
            Ok(Admission { capacity: 1, remaining: 0 })
        );
        assert_eq!(
            admit(event.id, Some(&event), false, 1),
            Err(BookingError::CapacityExceeded { capacity: 1 })
        );
    }

    #[test]
    fn unset_capacity_allows_one_hundred() {
        let event = event_with_tickets(None);
        assert!(admit(event.id, Some(&event), false, 99).is_ok());
        assert_eq!(
            admit(event.id, Some(&event), false, 100),
            Err(BookingError::CapacityExceeded { capacity: 100 })
        );
    }

    proptest! {
        #[test]
        fn admits_exactly_below_capacity(capacity in 1_i32..500, booked in 0_u64..1_000) {
            let event = event_with_tickets(Some(capacity));
            let result = admit(event.id, Some(&event), false, booked);
            prop_assert_eq!(result.is_ok(), booked < u64::from(capacity.unsigned_abs()));
        }

        #[test]
        fn duplicate_always_conflicts(capacity in 1_i32..500, booked in 0_u64..1_000) {
            let event = event_with_tickets(Some(capacity));
            prop_assert_eq!(
                admit(event.id, Some(&event), true, booked),
                Err(BookingError::AlreadyBooked)
            );
        }
    }
}
