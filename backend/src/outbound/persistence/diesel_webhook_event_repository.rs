//! PostgreSQL-backed `WebhookEventRepository` implementation using Diesel ORM.
//!
//! Payment-processor deliveries are at-least-once, so the adapter claims the
//! processor's event id with `ON CONFLICT DO NOTHING` against the unique
//! constraint. Zero affected rows means some earlier delivery already won;
//! that is a normal outcome, not an error.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{WebhookClaim, WebhookEventRepository, WebhookEventRepositoryError};

use super::models::NewProcessedWebhookEventRow;
use super::pool::{DbPool, PoolError};
use super::schema::processed_webhook_events;

/// Diesel-backed implementation of the `WebhookEventRepository` port.
#[derive(Clone)]
pub struct DieselWebhookEventRepository {
    pool: DbPool,
}

impl DieselWebhookEventRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain webhook repository errors.
fn map_pool_error(error: PoolError) -> WebhookEventRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            WebhookEventRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain webhook repository errors.
fn map_diesel_error(error: diesel::result::Error) -> WebhookEventRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            WebhookEventRepositoryError::connection("database connection error")
        }
        _ => WebhookEventRepositoryError::query("database error"),
    }
}

#[async_trait]
impl WebhookEventRepository for DieselWebhookEventRepository {
    async fn claim(
        &self,
        event_id: &str,
        event_type: &str,
    ) -> Result<WebhookClaim, WebhookEventRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewProcessedWebhookEventRow {
            id: Uuid::new_v4(),
            event_id,
            event_type,
        };

        let inserted = diesel::insert_into(processed_webhook_events::table)
            .values(&row)
            .on_conflict(processed_webhook_events::event_id)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if inserted == 0 {
            debug!(event_id, "duplicate webhook delivery skipped");
            Ok(WebhookClaim::Duplicate)
        } else {
            Ok(WebhookClaim::FirstSeen)
        }
    }
}
