//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! This adapter implements the domain's `BookingRepository` port. Status
//! transitions are validated against the lifecycle table inside the same
//! transaction that writes them, so a stale caller can never skip a state.
//! Related records (messages, proofs) are fetched only through the explicit
//! port methods; nothing is loaded behind the domain's back.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::booking::{Booking, BookingFinancials, BookingStatus, CancellationActor, Refund};
use crate::domain::evidence::{GpsPoint, Message, ValidationProof};
use crate::domain::ports::{BookingRepository, BookingRepositoryError};

use super::models::{
    BookingCancellationUpdate, BookingRow, MessageRow, NewBookingRow, ValidationProofRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, messages, validation_proofs};

/// Diesel-backed implementation of the `BookingRepository` port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Transaction-internal error carrier.
///
/// `AsyncConnection::transaction` requires `From<diesel::result::Error>` on
/// its error type; wrapping keeps that requirement out of the domain port
/// error.
#[derive(Debug)]
enum TxError {
    Diesel(diesel::result::Error),
    Domain(BookingRepositoryError),
}

impl From<diesel::result::Error> for TxError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<TxError> for BookingRepositoryError {
    fn from(error: TxError) -> Self {
        match error {
            TxError::Diesel(err) => map_diesel_error(err),
            TxError::Domain(err) => err,
        }
    }
}

/// Map pool errors to domain booking repository errors.
fn map_pool_error(error: PoolError) -> BookingRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            BookingRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain booking repository errors.
fn map_diesel_error(error: diesel::result::Error) -> BookingRepositoryError {
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
        DieselError::NotFound => BookingRepositoryError::query("record not found"),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::CheckViolation
            | DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::ForeignKeyViolation
            | DatabaseErrorKind::NotNullViolation => {
                BookingRepositoryError::constraint(info.message().to_owned())
            }
            DatabaseErrorKind::ClosedConnection => {
                BookingRepositoryError::connection("database connection error")
            }
            _ => BookingRepositoryError::query("database error"),
        },
        _ => BookingRepositoryError::query("database error"),
    }
}

/// Convert a database row to a domain booking.
fn row_to_booking(row: BookingRow) -> Result<Booking, BookingRepositoryError> {
    let status: BookingStatus = row
        .status
        .parse()
        .map_err(|err| BookingRepositoryError::query(format!("corrupted status column: {err}")))?;
    let financials = BookingFinancials::new(row.total_price_cents, row.commission_cents)
        .map_err(|err| {
            BookingRepositoryError::query(format!("corrupted financial columns: {err}"))
        })?;
    let cancelled_by = row
        .cancelled_by
        .as_deref()
        .map(str::parse::<CancellationActor>)
        .transpose()
        .map_err(|err| {
            BookingRepositoryError::query(format!("corrupted cancelled_by column: {err}"))
        })?;
    let refund = match (row.refund_percent, row.refund_cents) {
        (Some(percent), Some(amount_cents)) => Some(Refund {
            percent,
            amount_cents,
        }),
        _ => None,
    };

    Ok(Booking {
        id: row.id,
        buyer_id: row.buyer_id,
        mechanic_id: row.mechanic_id,
        status,
        vehicle_description: row.vehicle_description,
        inspection_address: row.inspection_address,
        scheduled_at: row.scheduled_at,
        financials,
        cancelled_by,
        refund,
        check_in_code_hash: row.check_in_code_hash.map(|h| h.trim_end().to_owned()),
        diagnostic_requested: row.diagnostic_requested,
        refusal_reason: row.refusal_reason,
        proposed_time: row.proposed_time,
    })
}

fn row_to_message(row: MessageRow) -> Message {
    Message {
        id: row.id,
        booking_id: row.booking_id,
        sender_id: row.sender_id,
        is_template: row.is_template,
        content: row.content,
        created_at: row.created_at,
    }
}

fn row_to_proof(row: ValidationProofRow) -> ValidationProof {
    // The paired CHECK constraint guarantees both-or-neither; a half pair
    // here would mean the constraint was dropped, so it degrades to None.
    let gps = match (row.gps_lat, row.gps_lng) {
        (Some(lat), Some(lng)) => Some(GpsPoint { lat, lng }),
        _ => None,
    };
    ValidationProof {
        id: row.id,
        booking_id: row.booking_id,
        gps,
        photo_url: row.photo_url,
        extra_photo_urls: row.extra_photo_urls,
        created_at: row.created_at,
    }
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn create(&self, booking: &Booking) -> Result<(), BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewBookingRow {
            id: booking.id,
            buyer_id: booking.buyer_id,
            mechanic_id: booking.mechanic_id,
            status: booking.status.as_str(),
            vehicle_description: &booking.vehicle_description,
            inspection_address: &booking.inspection_address,
            scheduled_at: booking.scheduled_at,
            total_price_cents: booking.financials.total_price_cents(),
            commission_cents: booking.financials.commission_cents(),
            mechanic_payout_cents: booking.financials.mechanic_payout_cents(),
            check_in_code_hash: booking.check_in_code_hash.as_deref(),
            diagnostic_requested: booking.diagnostic_requested,
            refusal_reason: booking.refusal_reason.as_deref(),
            proposed_time: booking.proposed_time,
        };

        diesel::insert_into(bookings::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: uuid::Uuid) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = bookings::table
            .find(id)
            .select(BookingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_booking).transpose()
    }

    async fn transition_status(
        &self,
        id: uuid::Uuid,
        to: BookingStatus,
    ) -> Result<Booking, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = conn
            .transaction::<BookingRow, TxError, _>(|conn| {
                async move {
                    let current = bookings::table
                        .find(id)
                        .select(BookingRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?
                        .ok_or(TxError::Domain(BookingRepositoryError::NotFound { id }))?;

                    let from: BookingStatus = current.status.parse().map_err(|err| {
                        TxError::Domain(BookingRepositoryError::query(format!(
                            "corrupted status column: {err}"
                        )))
                    })?;
                    if !from.can_transition_to(to) {
                        return Err(TxError::Domain(
                            BookingRepositoryError::IllegalTransition { from, to },
                        ));
                    }

                    let updated = diesel::update(bookings::table.find(id))
                        .set(bookings::status.eq(to.as_str()))
                        .returning(BookingRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(updated)
                }
                .scope_boxed()
            })
            .await?;

        row_to_booking(row)
    }

    async fn record_cancellation(
        &self,
        id: uuid::Uuid,
        actor: CancellationActor,
        refund: Refund,
    ) -> Result<Booking, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = conn
            .transaction::<BookingRow, TxError, _>(|conn| {
                async move {
                    let current = bookings::table
                        .find(id)
                        .select(BookingRow::as_select())
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?
                        .ok_or(TxError::Domain(BookingRepositoryError::NotFound { id }))?;

                    let from: BookingStatus = current.status.parse().map_err(|err| {
                        TxError::Domain(BookingRepositoryError::query(format!(
                            "corrupted status column: {err}"
                        )))
                    })?;
                    if !from.can_transition_to(BookingStatus::Cancelled) {
                        return Err(TxError::Domain(
                            BookingRepositoryError::IllegalTransition {
                                from,
                                to: BookingStatus::Cancelled,
                            },
                        ));
                    }

                    let update = BookingCancellationUpdate {
                        status: BookingStatus::Cancelled.as_str(),
                        cancelled_by: actor.as_str(),
                        refund_percent: refund.percent,
                        refund_cents: refund.amount_cents,
                    };
                    let updated = diesel::update(bookings::table.find(id))
                        .set(&update)
                        .returning(BookingRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(updated)
                }
                .scope_boxed()
            })
            .await?;

        row_to_booking(row)
    }

    async fn messages_for(
        &self,
        booking_id: uuid::Uuid,
    ) -> Result<Vec<Message>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = messages::table
            .filter(messages::booking_id.eq(booking_id))
            .order(messages::created_at.asc())
            .select(MessageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_message).collect())
    }

    async fn proofs_for(
        &self,
        booking_id: uuid::Uuid,
    ) -> Result<Vec<ValidationProof>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = validation_proofs::table
            .filter(validation_proofs::booking_id.eq(booking_id))
            .order(validation_proofs::created_at.asc())
            .select(ValidationProofRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_proof).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn tx_error_maps_check_violations_to_constraint() {
        let diesel_err = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::CheckViolation,
            Box::new("bookings_payout_integrity_check".to_owned()),
        );
        let mapped: BookingRepositoryError = TxError::from(diesel_err).into();
        assert!(matches!(
            mapped,
            BookingRepositoryError::ConstraintViolation { .. }
        ));
    }

    #[rstest]
    fn tx_error_passes_domain_errors_through() {
        let id = uuid::Uuid::new_v4();
        let mapped: BookingRepositoryError =
            TxError::Domain(BookingRepositoryError::NotFound { id }).into();
        assert_eq!(mapped, BookingRepositoryError::NotFound { id });
    }
}
