//! # Eventbook Testing
//!
//! Testing utilities and helpers for Eventbook.
//!
//! This crate provides:
//! - [`InMemoryStore`]: all storage traits backed by in-process tables
//! - Mock implementations of environment traits
//! - Builders for drafts and users
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```
//! use eventbook_testing::{InMemoryStore, helpers, test_clock};
//! use eventbook_core::environment::Clock;
//! use eventbook_core::store::{BookingLedger, EventCatalog, UserDirectory};
//! use eventbook_core::types::Event;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::new();
//! let now = test_clock().now();
//! let user = store.create_user(helpers::new_user("ada@example.com"), now).await?;
//! let event = store
//!     .create_event(Event::from_draft(helpers::draft("Jazz Night", 1), user.id, now))
//!     .await?;
//!
//! store.try_book(user.id, event.id, now).await?;
//! assert!(store.try_book(user.id, event.id, now).await.is_err());
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use eventbook_core::environment::Clock;

mod in_memory;

pub use in_memory::InMemoryStore;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use eventbook_testing::mocks::FixedClock;
    /// use eventbook_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Builders for common test data.
pub mod helpers {
    use super::mocks::test_clock;
    use super::Clock;
    use chrono::Duration;
    use eventbook_core::types::{EventDraft, NewUser, Role};

    /// A valid draft dated 30 days after the test clock.
    #[must_use]
    pub fn draft(title: &str, available_tickets: i32) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            description: format!("{title} description"),
            venue: "Convention Center".to_string(),
            category: Some("Conference".to_string()),
            date: test_clock().now() + Duration::days(30),
            price: 25.0,
            available_tickets,
            image_url: "/event-placeholder.jpg".to_string(),
        }
    }

    /// A regular user record with a dummy password hash.
    #[must_use]
    pub fn new_user(email: &str) -> NewUser {
        NewUser {
            name: email.split('@').next().map(str::to_string),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: Role::User,
        }
    }

    /// An administrator record with a dummy password hash.
    #[must_use]
    pub fn new_admin(email: &str) -> NewUser {
        NewUser {
            role: Role::Admin,
            ..new_user(email)
        }
    }
}

/// Property-based testing strategies using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Configured ticket counts, including unset and non-positive values.
    pub fn available_tickets() -> impl Strategy<Value = Option<i32>> {
        prop_oneof![
            Just(None),
            (-5_i32..=0).prop_map(Some),
            (1_i32..=20).prop_map(Some),
        ]
    }

    /// Number of distinct users competing for an event.
    pub fn contenders() -> impl Strategy<Value = usize> {
        1_usize..=30
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
