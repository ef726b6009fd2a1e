//! Error types for storage and booking operations.

use crate::types::EventId;
use thiserror::Error;

/// Errors returned by the storage traits in [`crate::store`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Kind of record ("Event", "User", ...)
        entity: &'static str,
        /// Identifier that was looked up
        id: String,
    },

    /// A uniqueness constraint was violated.
    #[error("Duplicate {0}")]
    Duplicate(String),

    /// Database connection or query failure.
    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Shorthand for a missing event.
    #[must_use]
    pub fn event_not_found(id: EventId) -> Self {
        Self::NotFound {
            entity: "Event",
            id: id.to_string(),
        }
    }
}

/// Outcome of a rejected booking attempt.
///
/// The first three variants are the admission rule's failures, in the order
/// the rule checks them. Anything else is a storage failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The event does not exist.
    #[error("Event not found")]
    EventNotFound(EventId),

    /// The user already holds a booking for this event.
    #[error("You have already booked this event")]
    AlreadyBooked,

    /// Every ticket of the event has been booked.
    #[error("This event is fully booked")]
    CapacityExceeded {
        /// Capacity the event was checked against
        capacity: u32,
    },

    /// Storage failure while checking or inserting.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BookingError {
    /// Short label used for metrics and logs.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::EventNotFound(_) => "not_found",
            Self::AlreadyBooked => "conflict",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::Store(_) => "error",
        }
    }
}
