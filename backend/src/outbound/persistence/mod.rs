//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL via Diesel with async support through `diesel-async` and
//! `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel models and domain types. No business logic lives here, with one
//!   deliberate exception: lifecycle-transition validation runs inside the
//!   write transaction so the check and the write cannot be separated.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed to
//!   the domain layer.
//! - **Constraints in the database**: payout arithmetic, rating bounds, GPS
//!   pairing, and uniqueness are CHECK/UNIQUE constraints defined by the
//!   migrations. The adapters map their violations to typed port errors.
//! - **Explicit fetching**: no adapter loads related records implicitly;
//!   each record set has its own port method.

mod diesel_booking_repository;
mod diesel_token_blacklist_repository;
mod diesel_webhook_event_repository;
pub mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_token_blacklist_repository::DieselTokenBlacklistRepository;
pub use diesel_webhook_event_repository::DieselWebhookEventRepository;
pub use migrations::{MigrationError, MigrationRunner, MigrationStatus, MIGRATIONS};
pub use pool::{DbPool, PoolConfig, PoolError};
