//! `PostgreSQL` storage for Eventbook.
//!
//! [`PostgresStore`] implements `EventCatalog`, `BookingLedger` and
//! `UserDirectory` from `eventbook-core` over a single connection pool.
//!
//! Bookings are admitted inside a transaction that locks the event row
//! (`SELECT ... FOR UPDATE`), so concurrent requests for the same event are
//! serialized. A unique `(user_id, event_id)` constraint backs up the
//! duplicate check.
//!
//! # Example
//!
//! ```no_run
//! use eventbook_postgres::{PoolSettings, PostgresStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PostgresStore::connect("postgres://localhost/eventbook", &PoolSettings::default()).await?;
//! store.migrate().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod rows;

use chrono::{DateTime, Utc};
use eventbook_core::admission::admit;
use eventbook_core::error::{BookingError, StoreError};
use eventbook_core::store::{BookingLedger, EventCatalog, StoreFuture, UserDirectory};
use eventbook_core::types::{
    Booking, BookingWithEvent, DateOrder, Event, EventDetail, EventFilter, EventId, EventSummary,
    NewUser, User, UserId,
};
use rows::{AttendeeRow, BookingRow, EVENT_COLUMNS, EventRow, SummaryRow, UserRow, contains_pattern};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while setting up the pool.
#[derive(Error, Debug)]
pub enum SetupError {
    /// Could not open the pool.
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// Migrations failed to apply.
    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Connection pool sizing and timeouts.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Maximum number of connections
    pub max_connections: u32,
    /// Connections kept open when idle
    pub min_connections: u32,
    /// Time allowed to acquire a connection
    pub connect_timeout: Duration,
    /// Time after which an idle connection is closed
    pub idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |e| StoreError::Database(format!("{context}: {e}"))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or_default()
}

/// `PostgreSQL` implementation of the Eventbook storage traits.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Connect`] if the database is unreachable.
    pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<Self, SetupError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.connect_timeout)
            .idle_timeout(settings.idle_timeout)
            .connect(database_url)
            .await
            .map_err(SetupError::Connect)?;
        Ok(Self::from_pool(pool))
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Migrate`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), SetupError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn summaries(
        &self,
        filter: &EventFilter,
        order_by: &'static str,
        limit: Option<i64>,
    ) -> Result<Vec<SummaryRow>, StoreError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS}, u.name AS creator_name, u.email AS creator_email,
                    COUNT(b.id) AS booking_count
             FROM events e
             LEFT JOIN users u ON u.id = e.creator_id
             LEFT JOIN bookings b ON b.event_id = e.id
             WHERE ($1::text IS NULL OR e.title ILIKE $1)
               AND ($2::text IS NULL OR e.category = $2)
               AND ($3::text IS NULL OR e.venue ILIKE $3)
             GROUP BY e.id, u.name, u.email
             ORDER BY {order_by}
             LIMIT $4"
        );
        sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(filter.title.as_deref().map(contains_pattern))
            .bind(filter.category.as_deref())
            .bind(filter.venue.as_deref().map(contains_pattern))
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list events"))
    }

    async fn summary_by_id(&self, id: EventId) -> Result<Option<SummaryRow>, StoreError> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS}, u.name AS creator_name, u.email AS creator_email,
                    COUNT(b.id) AS booking_count
             FROM events e
             LEFT JOIN users u ON u.id = e.creator_id
             LEFT JOIN bookings b ON b.event_id = e.id
             WHERE e.id = $1
             GROUP BY e.id, u.name, u.email"
        );
        sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to load event"))
    }
}

impl EventCatalog for PostgresStore {
    fn list_events(&self, filter: EventFilter, order: DateOrder) -> StoreFuture<'_, Vec<EventSummary>> {
        Box::pin(async move {
            let order_by = match order {
                DateOrder::Ascending => "e.date ASC, e.created_at ASC",
                DateOrder::Descending => "e.date DESC, e.created_at DESC",
            };
            let rows = self.summaries(&filter.normalized(), order_by, None).await?;
            Ok(rows.into_iter().map(EventSummary::from).collect())
        })
    }

    fn get_event(&self, id: EventId) -> StoreFuture<'_, Option<EventSummary>> {
        Box::pin(async move { Ok(self.summary_by_id(id).await?.map(EventSummary::from)) })
    }

    fn get_event_detail(&self, id: EventId) -> StoreFuture<'_, Option<EventDetail>> {
        Box::pin(async move {
            let Some(row) = self.summary_by_id(id).await? else {
                return Ok(None);
            };
            let (summary, creator_email) = row.into_parts();

            let attendees = sqlx::query_as::<_, AttendeeRow>(
                "SELECT b.id AS booking_id, u.name, u.email
                 FROM bookings b
                 JOIN users u ON u.id = b.user_id
                 WHERE b.event_id = $1
                 ORDER BY b.created_at ASC",
            )
            .bind(id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to load attendees"))?;

            Ok(Some(EventDetail {
                summary,
                creator_email,
                attendees: attendees.into_iter().map(Into::into).collect(),
            }))
        })
    }

    fn create_event(&self, event: Event) -> StoreFuture<'_, Event> {
        Box::pin(async move {
            sqlx::query(
                "INSERT INTO events
                    (id, title, description, venue, category, date, price,
                     available_tickets, image_url, creator_id, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
            )
            .bind(event.id.as_uuid())
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.venue)
            .bind(event.category.as_deref())
            .bind(event.date)
            .bind(event.price)
            .bind(event.available_tickets)
            .bind(event.image_url.as_deref())
            .bind(event.creator_id.map(|id| *id.as_uuid()))
            .bind(event.created_at)
            .bind(event.updated_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to create event"))?;

            tracing::debug!(event_id = %event.id, "Event created");
            Ok(event)
        })
    }

    fn update_event(&self, event: Event) -> StoreFuture<'_, Event> {
        Box::pin(async move {
            let result = sqlx::query(
                "UPDATE events
                 SET title = $2, description = $3, venue = $4, category = $5, date = $6,
                     price = $7, available_tickets = $8, image_url = $9, updated_at = $10
                 WHERE id = $1",
            )
            .bind(event.id.as_uuid())
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.venue)
            .bind(event.category.as_deref())
            .bind(event.date)
            .bind(event.price)
            .bind(event.available_tickets)
            .bind(event.image_url.as_deref())
            .bind(event.updated_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update event"))?;

            if result.rows_affected() == 0 {
                return Err(StoreError::event_not_found(event.id));
            }
            Ok(event)
        })
    }

    fn delete_event(&self, id: EventId) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(db_error("Failed to begin transaction"))?;

            let bookings = sqlx::query("DELETE FROM bookings WHERE event_id = $1")
                .bind(id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to delete bookings"))?
                .rows_affected();

            let deleted = sqlx::query("DELETE FROM events WHERE id = $1")
                .bind(id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to delete event"))?
                .rows_affected();

            if deleted == 0 {
                return Err(StoreError::event_not_found(id));
            }

            tx.commit()
                .await
                .map_err(db_error("Failed to commit transaction"))?;
            Ok(bookings)
        })
    }

    fn count_events(&self) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count events"))?;
            Ok(count(n))
        })
    }

    fn recent_events(&self, limit: u32) -> StoreFuture<'_, Vec<EventSummary>> {
        Box::pin(async move {
            let rows = self
                .summaries(&EventFilter::default(), "e.created_at DESC", Some(i64::from(limit)))
                .await?;
            Ok(rows.into_iter().map(EventSummary::from).collect())
        })
    }
}

impl BookingLedger for PostgresStore {
    fn try_book(
        &self,
        user_id: UserId,
        event_id: EventId,
        now: DateTime<Utc>,
    ) -> StoreFuture<'_, Booking, BookingError> {
        Box::pin(async move {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(db_error("Failed to begin transaction"))?;

            let sql = format!("SELECT {EVENT_COLUMNS} FROM events e WHERE e.id = $1 FOR UPDATE");
            let event: Option<Event> = sqlx::query_as::<_, EventRow>(&sql)
                .bind(event_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to lock event"))?
                .map(Event::from);

            let already_booked: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM bookings WHERE user_id = $1 AND event_id = $2)",
            )
            .bind(user_id.as_uuid())
            .bind(event_id.as_uuid())
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("Failed to check existing booking"))?;

            let booked: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE event_id = $1")
                .bind(event_id.as_uuid())
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error("Failed to count bookings"))?;

            let admission = admit(event_id, event.as_ref(), already_booked, count(booked))?;

            let booking = Booking::new(user_id, event_id, now);
            sqlx::query("INSERT INTO bookings (id, user_id, event_id, created_at) VALUES ($1, $2, $3, $4)")
                .bind(booking.id.as_uuid())
                .bind(user_id.as_uuid())
                .bind(event_id.as_uuid())
                .bind(booking.created_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        BookingError::AlreadyBooked
                    } else {
                        BookingError::Store(db_error("Failed to insert booking")(e))
                    }
                })?;

            tx.commit()
                .await
                .map_err(db_error("Failed to commit booking"))?;

            tracing::debug!(
                booking_id = %booking.id,
                %event_id,
                remaining = admission.remaining,
                "Booking stored"
            );
            Ok(booking)
        })
    }

    fn bookings_for_user(&self, user_id: UserId) -> StoreFuture<'_, Vec<BookingWithEvent>> {
        Box::pin(async move {
            let sql = format!(
                "SELECT b.id AS booking_id, b.user_id, b.created_at AS booked_at, {EVENT_COLUMNS}
                 FROM bookings b
                 JOIN events e ON e.id = b.event_id
                 WHERE b.user_id = $1
                 ORDER BY b.created_at DESC"
            );
            let rows = sqlx::query_as::<_, BookingRow>(&sql)
                .bind(user_id.as_uuid())
                .fetch_all(&self.pool)
                .await
                .map_err(db_error("Failed to list bookings"))?;
            Ok(rows.into_iter().map(Into::into).collect())
        })
    }

    fn is_booked(&self, user_id: UserId, event_id: EventId) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM bookings WHERE user_id = $1 AND event_id = $2)",
            )
            .bind(user_id.as_uuid())
            .bind(event_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to check booking"))
        })
    }

    fn count_for_event(&self, event_id: EventId) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE event_id = $1")
                .bind(event_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count bookings"))?;
            Ok(count(n))
        })
    }

    fn count_bookings(&self) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count bookings"))?;
            Ok(count(n))
        })
    }
}

impl UserDirectory for PostgresStore {
    fn create_user(&self, user: NewUser, now: DateTime<Utc>) -> StoreFuture<'_, User> {
        Box::pin(async move {
            let id = UserId::new();
            sqlx::query(
                "INSERT INTO users (id, name, email, password_hash, role, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(id.as_uuid())
            .bind(user.name.as_deref())
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::Duplicate(format!("email {}", user.email))
                } else {
                    db_error("Failed to create user")(e)
                }
            })?;

            Ok(User {
                id,
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
                role: user.role,
                created_at: now,
            })
        })
    }

    fn find_by_email(&self, email: &str) -> StoreFuture<'_, Option<User>> {
        let email = email.to_string();
        Box::pin(async move {
            sqlx::query_as::<_, UserRow>(
                "SELECT id, name, email, password_hash, role, created_at FROM users WHERE email = $1",
            )
            .bind(&email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to get user"))?
            .map(User::try_from)
            .transpose()
        })
    }

    fn find_by_id(&self, id: UserId) -> StoreFuture<'_, Option<User>> {
        Box::pin(async move {
            sqlx::query_as::<_, UserRow>(
                "SELECT id, name, email, password_hash, role, created_at FROM users WHERE id = $1",
            )
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to get user"))?
            .map(User::try_from)
            .transpose()
        })
    }

    fn count_users(&self) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count users"))?;
            Ok(count(n))
        })
    }
}
