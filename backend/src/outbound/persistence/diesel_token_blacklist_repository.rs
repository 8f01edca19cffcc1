//! PostgreSQL-backed `TokenBlacklistRepository` implementation using Diesel
//! ORM.
//!
//! Stores hashes of revoked auth tokens until their natural expiry. The
//! `expires_at` index exists for `purge_expired`, which a scheduled cleanup
//! job is expected to call periodically; revocation checks hit the unique
//! `token_hash` constraint instead.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{TokenBlacklistRepository, TokenBlacklistRepositoryError};

use super::models::NewBlacklistedTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::blacklisted_tokens;

/// Diesel-backed implementation of the `TokenBlacklistRepository` port.
#[derive(Clone)]
pub struct DieselTokenBlacklistRepository {
    pool: DbPool,
}

impl DieselTokenBlacklistRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain token blacklist errors.
fn map_pool_error(error: PoolError) -> TokenBlacklistRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            TokenBlacklistRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain token blacklist errors.
fn map_diesel_error(error: diesel::result::Error) -> TokenBlacklistRepositoryError {
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
            TokenBlacklistRepositoryError::connection("database connection error")
        }
        _ => TokenBlacklistRepositoryError::query("database error"),
    }
}

#[async_trait]
impl TokenBlacklistRepository for DieselTokenBlacklistRepository {
    async fn revoke(
        &self,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), TokenBlacklistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewBlacklistedTokenRow {
            id: Uuid::new_v4(),
            token_hash,
            expires_at,
        };

        // Re-revoking is a no-op; the unique constraint already holds the
        // earliest record.
        diesel::insert_into(blacklisted_tokens::table)
            .values(&row)
            .on_conflict(blacklisted_tokens::token_hash)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn is_revoked(
        &self,
        token_hash: &str,
    ) -> Result<bool, TokenBlacklistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(exists(
            blacklisted_tokens::table.filter(blacklisted_tokens::token_hash.eq(token_hash)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn purge_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<u64, TokenBlacklistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pruned = diesel::delete(
            blacklisted_tokens::table.filter(blacklisted_tokens::expires_at.lt(now)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        debug!(pruned, "expired blacklist entries removed");
        Ok(pruned as u64)
    }
}
