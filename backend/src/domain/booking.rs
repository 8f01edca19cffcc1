//! Booking lifecycle: status machine, financial integrity, refund policy.
//!
//! The database enforces `mechanic_payout_cents = total_price_cents -
//! commission_cents` with a CHECK constraint; [`BookingFinancials`] enforces
//! the same arithmetic at construction so a violating value can never be
//! handed to the persistence layer in the first place. Both guards exist on
//! purpose: the domain check gives a typed error, the storage check defends
//! against every write path including direct administrative edits.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Booking lifecycle states, matching the `bookings.status` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Created by the buyer, awaiting the mechanic's answer.
    Pending,
    /// Accepted by the mechanic, awaiting payment.
    Accepted,
    /// Funds captured into escrow.
    Paid,
    /// Mechanic has checked in on site.
    InProgress,
    /// Inspection finished and report delivered.
    Completed,
    /// Cancelled by either party or an administrator.
    Cancelled,
    /// Declined by the mechanic before acceptance.
    Refused,
    /// Escalated to dispute resolution.
    Disputed,
}

impl BookingStatus {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Paid => "paid",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Refused => "refused",
            Self::Disputed => "disputed",
        }
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step.
    ///
    /// Everything not listed here is rejected; there are no implicit
    /// transitions and no self-loops.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted)
                | (Self::Pending, Self::Refused)
                | (Self::Pending, Self::Cancelled)
                | (Self::Accepted, Self::Paid)
                | (Self::Accepted, Self::Cancelled)
                | (Self::Paid, Self::InProgress)
                | (Self::Paid, Self::Cancelled)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Disputed)
                | (Self::Completed, Self::Disputed)
                | (Self::Disputed, Self::Completed)
                | (Self::Disputed, Self::Cancelled)
        )
    }

    /// Whether the booking has reached a state money can no longer move from
    /// without a dispute.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Refused)
    }
}

/// Parse failure for [`BookingStatus`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised booking status: {0}")]
pub struct BookingStatusParseError(pub String);

impl FromStr for BookingStatus {
    type Err = BookingStatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "paid" => Ok(Self::Paid),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "refused" => Ok(Self::Refused),
            "disputed" => Ok(Self::Disputed),
            other => Err(BookingStatusParseError(other.to_owned())),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who triggered a cancellation, matching `bookings.cancelled_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CancellationActor {
    /// The buyer withdrew the request.
    Buyer,
    /// The mechanic withdrew or refused.
    Mechanic,
    /// An administrator intervened.
    Admin,
}

impl CancellationActor {
    /// Stable storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Mechanic => "mechanic",
            Self::Admin => "admin",
        }
    }
}

/// Parse failure for [`CancellationActor`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised cancellation actor: {0}")]
pub struct CancellationActorParseError(pub String);

impl FromStr for CancellationActor {
    type Err = CancellationActorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "buyer" => Ok(Self::Buyer),
            "mechanic" => Ok(Self::Mechanic),
            "admin" => Ok(Self::Admin),
            other => Err(CancellationActorParseError(other.to_owned())),
        }
    }
}

/// Violations of the booking money invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FinancialsError {
    /// A monetary amount was negative.
    #[error("monetary amounts must not be negative")]
    NegativeAmount,
    /// Commission exceeded the total price.
    #[error("commission ({commission_cents}) exceeds total price ({total_price_cents})")]
    CommissionExceedsTotal {
        /// Total booking price in cents.
        total_price_cents: i64,
        /// Platform commission in cents.
        commission_cents: i64,
    },
}

/// Monetary breakdown of a booking in integer cents.
///
/// ## Invariants
/// - `total_price_cents >= 0` and `commission_cents >= 0`.
/// - `commission_cents <= total_price_cents`.
/// - `mechanic_payout_cents() == total_price_cents - commission_cents`,
///   always, because the payout is derived rather than stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFinancials {
    total_price_cents: i64,
    commission_cents: i64,
}

impl BookingFinancials {
    /// Build a breakdown from total price and commission.
    pub fn new(total_price_cents: i64, commission_cents: i64) -> Result<Self, FinancialsError> {
        if total_price_cents < 0 || commission_cents < 0 {
            return Err(FinancialsError::NegativeAmount);
        }
        if commission_cents > total_price_cents {
            return Err(FinancialsError::CommissionExceedsTotal {
                total_price_cents,
                commission_cents,
            });
        }
        Ok(Self {
            total_price_cents,
            commission_cents,
        })
    }

    /// Total booking price in cents.
    pub fn total_price_cents(self) -> i64 {
        self.total_price_cents
    }

    /// Platform commission in cents.
    pub fn commission_cents(self) -> i64 {
        self.commission_cents
    }

    /// Mechanic payout in cents; by construction always
    /// `total - commission`.
    pub fn mechanic_payout_cents(self) -> i64 {
        self.total_price_cents - self.commission_cents
    }
}

/// Outcome of a refund computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    /// Percentage of the total price returned to the buyer, 0..=100.
    pub percent: i16,
    /// Refunded amount in cents, `total * percent / 100` exactly.
    pub amount_cents: i64,
}

/// Cancellation notice threshold under which buyers forfeit half the price.
pub const SHORT_NOTICE: Duration = Duration::hours(24);

/// Refund percentage bands by actor and notice.
///
/// - Buyer cancelling with at least [`SHORT_NOTICE`] before the slot: 100%.
/// - Buyer cancelling inside the notice window: 50%.
/// - Mechanic cancelling or refusing, or an admin intervening: 100%.
pub fn cancellation_refund(
    financials: BookingFinancials,
    actor: CancellationActor,
    scheduled_at: DateTime<Utc>,
    cancelled_at: DateTime<Utc>,
) -> Refund {
    let percent: i16 = match actor {
        CancellationActor::Mechanic | CancellationActor::Admin => 100,
        CancellationActor::Buyer => {
            if scheduled_at - cancelled_at >= SHORT_NOTICE {
                100
            } else {
                50
            }
        }
    };
    refund_for_percent(financials, percent)
}

/// Refund for a dispute resolved in favour of `winner`.
///
/// Buyer wins the full price back; a mechanic win releases the escrow with no
/// refund.
pub fn dispute_refund(financials: BookingFinancials, winner: CancellationActor) -> Refund {
    let percent = match winner {
        CancellationActor::Buyer => 100,
        CancellationActor::Mechanic | CancellationActor::Admin => 0,
    };
    refund_for_percent(financials, percent)
}

fn refund_for_percent(financials: BookingFinancials, percent: i16) -> Refund {
    // Integer arithmetic keeps this exact for every percent in 0..=100; the
    // intermediate product fits i64 for any plausible price.
    let amount_cents = financials.total_price_cents() * i64::from(percent) / 100;
    Refund {
        percent,
        amount_cents,
    }
}

/// Booking aggregate as the domain sees it.
///
/// Related records (messages, proofs, disputes) are never carried here;
/// callers fetch them explicitly through the repository ports so data-access
/// cost stays visible at call sites.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    /// Stable booking identifier.
    pub id: Uuid,
    /// Buyer user id.
    pub buyer_id: Uuid,
    /// Mechanic user id.
    pub mechanic_id: Uuid,
    /// Current lifecycle state.
    pub status: BookingStatus,
    /// Free-text description of the vehicle under inspection.
    pub vehicle_description: String,
    /// Where the inspection takes place.
    pub inspection_address: String,
    /// Agreed slot.
    pub scheduled_at: DateTime<Utc>,
    /// Monetary breakdown.
    pub financials: BookingFinancials,
    /// Who cancelled, when cancelled.
    pub cancelled_by: Option<CancellationActor>,
    /// Refund granted on cancellation or dispute, if any.
    pub refund: Option<Refund>,
    /// SHA-256 hex digest of the one-time check-in code.
    pub check_in_code_hash: Option<String>,
    /// Whether the buyer asked for a diagnostic-tool reading.
    pub diagnostic_requested: bool,
    /// Mechanic's stated reason when refusing.
    pub refusal_reason: Option<String>,
    /// Alternate slot proposed by the mechanic.
    pub proposed_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn financials(total: i64, commission: i64) -> BookingFinancials {
        BookingFinancials::new(total, commission).expect("valid breakdown")
    }

    #[rstest]
    #[case(BookingStatus::Pending, BookingStatus::Accepted, true)]
    #[case(BookingStatus::Pending, BookingStatus::Refused, true)]
    #[case(BookingStatus::Pending, BookingStatus::Paid, false)]
    #[case(BookingStatus::Accepted, BookingStatus::Paid, true)]
    #[case(BookingStatus::Paid, BookingStatus::InProgress, true)]
    #[case(BookingStatus::Paid, BookingStatus::Completed, false)]
    #[case(BookingStatus::InProgress, BookingStatus::Disputed, true)]
    #[case(BookingStatus::Completed, BookingStatus::Pending, false)]
    #[case(BookingStatus::Cancelled, BookingStatus::Accepted, false)]
    #[case(BookingStatus::Disputed, BookingStatus::Completed, true)]
    fn transition_table(
        #[case] from: BookingStatus,
        #[case] to: BookingStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[rstest]
    #[case("pending", BookingStatus::Pending)]
    #[case("in_progress", BookingStatus::InProgress)]
    #[case("disputed", BookingStatus::Disputed)]
    fn status_round_trips(#[case] raw: &str, #[case] expected: BookingStatus) {
        assert_eq!(raw.parse::<BookingStatus>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    fn status_rejects_unknown_value() {
        assert!("archived".parse::<BookingStatus>().is_err());
    }

    #[rstest]
    fn payout_is_always_total_minus_commission() {
        let money = financials(15_000, 2_250);
        assert_eq!(money.mechanic_payout_cents(), 12_750);
    }

    #[rstest]
    fn financials_reject_negative_amounts() {
        assert_eq!(
            BookingFinancials::new(-1, 0),
            Err(FinancialsError::NegativeAmount)
        );
        assert_eq!(
            BookingFinancials::new(100, -1),
            Err(FinancialsError::NegativeAmount)
        );
    }

    #[rstest]
    fn financials_reject_commission_above_total() {
        assert!(matches!(
            BookingFinancials::new(100, 101),
            Err(FinancialsError::CommissionExceedsTotal { .. })
        ));
    }

    #[rstest]
    // 25h notice: full refund.
    #[case(CancellationActor::Buyer, 25, 100, 15_000)]
    // 2h notice: half refund.
    #[case(CancellationActor::Buyer, 2, 50, 7_500)]
    // Mechanic cancels: buyer is made whole regardless of notice.
    #[case(CancellationActor::Mechanic, 1, 100, 15_000)]
    #[case(CancellationActor::Admin, 1, 100, 15_000)]
    fn cancellation_refund_bands(
        #[case] actor: CancellationActor,
        #[case] notice_hours: i64,
        #[case] expected_percent: i16,
        #[case] expected_cents: i64,
    ) {
        let scheduled = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid");
        let cancelled = scheduled - Duration::hours(notice_hours);
        let refund = cancellation_refund(financials(15_000, 2_250), actor, scheduled, cancelled);
        assert_eq!(refund.percent, expected_percent);
        assert_eq!(refund.amount_cents, expected_cents);
    }

    #[rstest]
    fn exactly_24h_notice_counts_as_long_notice() {
        let scheduled = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid");
        let cancelled = scheduled - SHORT_NOTICE;
        let refund = cancellation_refund(
            financials(10_000, 1_000),
            CancellationActor::Buyer,
            scheduled,
            cancelled,
        );
        assert_eq!(refund.percent, 100);
    }

    #[rstest]
    fn dispute_refund_follows_winner() {
        let money = financials(20_000, 3_000);
        assert_eq!(
            dispute_refund(money, CancellationActor::Buyer).amount_cents,
            20_000
        );
        assert_eq!(
            dispute_refund(money, CancellationActor::Mechanic).amount_cents,
            0
        );
    }

    #[rstest]
    fn refund_arithmetic_is_exact_for_odd_totals() {
        // 50% of 9,999 cents truncates toward zero.
        let refund = refund_for_percent(financials(9_999, 0), 50);
        assert_eq!(refund.amount_cents, 4_999);
    }
}
