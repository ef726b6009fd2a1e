//! Application state for the Eventbook HTTP server.
//!
//! Contains all shared resources needed by HTTP handlers:
//! - Storage (event catalog, booking ledger, user directory)
//! - Clock, so tests can pin "now"
//! - Credentials (token issuer, password hasher)
//! - Image uploader
//! - Prometheus handle for `/metrics`

use crate::media::{DisabledUploader, ImageUploader};
use eventbook_auth::{PasswordHasher, TokenIssuer};
use eventbook_core::environment::Clock;
use eventbook_core::store::{BookingLedger, EventCatalog, UserDirectory};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via `Arc`) for each request.
#[derive(Clone)]
pub struct AppState {
    /// Events and their read models
    pub events: Arc<dyn EventCatalog>,
    /// Bookings, including the atomic admission check
    pub bookings: Arc<dyn BookingLedger>,
    /// Registered users
    pub users: Arc<dyn UserDirectory>,
    /// Source of the current time
    pub clock: Arc<dyn Clock>,
    /// Issues and verifies session tokens
    pub tokens: Arc<TokenIssuer>,
    /// Hashes and verifies passwords
    pub passwords: PasswordHasher,
    /// Stores uploaded images
    pub uploader: Arc<dyn ImageUploader>,
    /// Whether `/api/seed` is served
    pub seed_enabled: bool,
    /// Renders `/metrics` when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state backed by one store implementing all storage traits.
    ///
    /// Uploads start disabled, the seed route off and metrics absent.
    #[must_use]
    pub fn new<S>(
        store: S,
        clock: Arc<dyn Clock>,
        tokens: TokenIssuer,
        passwords: PasswordHasher,
    ) -> Self
    where
        S: EventCatalog + BookingLedger + UserDirectory + 'static,
    {
        let store = Arc::new(store);
        Self {
            events: store.clone(),
            bookings: store.clone(),
            users: store,
            clock,
            tokens: Arc::new(tokens),
            passwords,
            uploader: Arc::new(DisabledUploader),
            seed_enabled: false,
            metrics: None,
        }
    }

    /// Use `uploader` for `/api/upload`.
    #[must_use]
    pub fn with_uploader(mut self, uploader: Arc<dyn ImageUploader>) -> Self {
        self.uploader = uploader;
        self
    }

    /// Enable or disable `/api/seed`.
    #[must_use]
    pub const fn with_seed_route(mut self, enabled: bool) -> Self {
        self.seed_enabled = enabled;
        self
    }

    /// Serve `/metrics` from `handle`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tokens", &self.tokens)
            .field("passwords", &self.passwords)
            .field("seed_enabled", &self.seed_enabled)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}
