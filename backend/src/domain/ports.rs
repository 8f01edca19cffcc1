//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters.
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants instead of returning `anyhow::Result`.
//!
//! # Explicit fetching
//!
//! No port returns related aggregates implicitly. A booking never arrives
//! with its messages or proofs attached; callers request each record set
//! through a dedicated method. This keeps data-access cost visible at call
//! sites and rules out hidden query fan-out behind innocent-looking property
//! access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::booking::{Booking, BookingStatus, CancellationActor, Refund};
use super::evidence::{Message, ValidationProof};

/// Errors surfaced by the booking persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingRepositoryError {
    /// Database connectivity or pool failures.
    #[error("booking persistence connection failed: {message}")]
    Connection {
        /// Adapter-provided failure description.
        message: String,
    },
    /// The storage layer rejected the write (CHECK, UNIQUE, or FK violation).
    #[error("booking write rejected by storage constraint: {message}")]
    ConstraintViolation {
        /// Adapter-provided failure description.
        message: String,
    },
    /// The requested booking does not exist.
    #[error("booking {id} not found")]
    NotFound {
        /// Identifier that failed to resolve.
        id: Uuid,
    },
    /// The requested status change is not a legal lifecycle step.
    #[error("illegal booking transition from {from} to {to}")]
    IllegalTransition {
        /// Current persisted status.
        from: BookingStatus,
        /// Requested status.
        to: BookingStatus,
    },
    /// Catch-all for query failures that bubble up from the adapter.
    #[error("booking persistence failed: {message}")]
    Query {
        /// Adapter-provided failure description.
        message: String,
    },
}

impl BookingRepositoryError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for storage constraint rejections.
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            message: message.into(),
        }
    }

    /// Helper for generic query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Durable storage for bookings and their explicitly fetched satellites.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persist a new booking. The storage layer re-checks the payout
    /// arithmetic; a violation surfaces as
    /// [`BookingRepositoryError::ConstraintViolation`].
    async fn create(&self, booking: &Booking) -> Result<(), BookingRepositoryError>;

    /// Fetch a booking by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Transition a booking's status, validating the step against the
    /// lifecycle table inside the same transaction that writes it.
    async fn transition_status(
        &self,
        id: Uuid,
        to: BookingStatus,
    ) -> Result<Booking, BookingRepositoryError>;

    /// Record a cancellation outcome: status, actor, and computed refund, as
    /// one transactional write.
    async fn record_cancellation(
        &self,
        id: Uuid,
        actor: CancellationActor,
        refund: Refund,
    ) -> Result<Booking, BookingRepositoryError>;

    /// Explicitly fetch the chat messages for one booking, oldest first.
    async fn messages_for(&self, booking_id: Uuid)
        -> Result<Vec<Message>, BookingRepositoryError>;

    /// Explicitly fetch the inspection proofs for one booking, oldest first.
    async fn proofs_for(
        &self,
        booking_id: Uuid,
    ) -> Result<Vec<ValidationProof>, BookingRepositoryError>;
}

/// Errors surfaced by the webhook idempotency adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookEventRepositoryError {
    /// Database connectivity or pool failures.
    #[error("webhook event persistence connection failed: {message}")]
    Connection {
        /// Adapter-provided failure description.
        message: String,
    },
    /// Catch-all for query failures that bubble up from the adapter.
    #[error("webhook event persistence failed: {message}")]
    Query {
        /// Adapter-provided failure description.
        message: String,
    },
}

impl WebhookEventRepositoryError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for generic query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Outcome of attempting to claim a webhook event id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookClaim {
    /// First delivery; the caller should process the event.
    FirstSeen,
    /// The event id was already processed; the caller must skip it.
    Duplicate,
}

/// Idempotency markers for payment-processor webhook deliveries.
#[async_trait]
pub trait WebhookEventRepository: Send + Sync {
    /// Atomically claim an event id. Returns [`WebhookClaim::Duplicate`]
    /// without error when the id was claimed before; deliveries are
    /// at-least-once and replays are expected, not exceptional.
    async fn claim(
        &self,
        event_id: &str,
        event_type: &str,
    ) -> Result<WebhookClaim, WebhookEventRepositoryError>;
}

/// Errors surfaced by the token blacklist adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenBlacklistRepositoryError {
    /// Database connectivity or pool failures.
    #[error("token blacklist connection failed: {message}")]
    Connection {
        /// Adapter-provided failure description.
        message: String,
    },
    /// Catch-all for query failures that bubble up from the adapter.
    #[error("token blacklist persistence failed: {message}")]
    Query {
        /// Adapter-provided failure description.
        message: String,
    },
}

impl TokenBlacklistRepositoryError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for generic query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Revoked auth tokens, pruned by expiry.
#[async_trait]
pub trait TokenBlacklistRepository: Send + Sync {
    /// Record a revoked token hash with its natural expiry. Re-revoking an
    /// already blacklisted token is a no-op.
    async fn revoke(
        &self,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenBlacklistRepositoryError>;

    /// Whether a token hash has been revoked.
    async fn is_revoked(&self, token_hash: &str) -> Result<bool, TokenBlacklistRepositoryError>;

    /// Delete entries whose expiry has passed; returns the number pruned.
    /// Expired tokens fail validation on their own, so keeping the rows
    /// serves no purpose.
    async fn purge_expired(&self, now: DateTime<Utc>)
        -> Result<u64, TokenBlacklistRepositoryError>;
}
