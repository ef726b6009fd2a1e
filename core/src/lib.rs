//! # Eventbook Core
//!
//! Domain types, storage traits and the booking admission rule.
//!
//! This crate has no I/O. Everything that touches a database or the network
//! lives behind the traits in [`store`] and [`environment`], which the
//! `eventbook-postgres` and `eventbook-testing` crates implement.
//!
//! ## Modules
//!
//! - [`types`]: users, events, bookings and their read models
//! - [`admission`]: the pure rule deciding whether a booking is accepted
//! - [`validation`]: admin event forms into validated drafts
//! - [`store`]: `EventCatalog`, `BookingLedger` and `UserDirectory`
//! - [`error`]: `StoreError` and `BookingError`
//!
//! ## Example
//!
//! ```
//! use eventbook_core::admission::{admit, effective_capacity};
//! use eventbook_core::types::EventId;
//!
//! assert_eq!(effective_capacity(None), 100);
//! assert!(admit(EventId::new(), None, false, 0).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod admission;
pub mod error;
pub mod store;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use error::{BookingError, StoreError};
pub use store::{BookingLedger, EventCatalog, StoreFuture, UserDirectory};

/// Environment module - injected dependencies
///
/// External dependencies that affect behaviour (currently only time) are
/// abstracted behind traits so tests can control them.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use eventbook_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let _now = clock.now();
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall-clock time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
