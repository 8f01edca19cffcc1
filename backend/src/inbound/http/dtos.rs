//! Request/response transfer schemas for the HTTP boundary.
//!
//! These types validate external input shape and bounds before anything
//! reaches the entity layer, and shape entity data for output. They are
//! deliberately distinct from the storage rows: the wire representation can
//! move without a schema migration and vice versa.
//!
//! Validation runs inside deserialisation via the serde `try_from` pattern,
//! so a handler can never observe an unvalidated value.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::booking::Booking;

/// Maximum length for review comments and suspension reasons.
const SHORT_TEXT_MAX: usize = 500;
/// Maximum length for dispute resolution notes.
const NOTES_MAX: usize = 2000;
/// Maximum suspension duration in days.
const SUSPENSION_DAYS_MAX: u16 = 365;

/// Field-level validation failures raised while deserialising a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldValidationError {
    /// A required text field was empty or whitespace-only.
    #[error("{field} must not be empty")]
    Empty {
        /// Offending field name.
        field: &'static str,
    },
    /// A text field exceeded its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending field name.
        field: &'static str,
        /// Maximum number of characters.
        max: usize,
    },
    /// A numeric field fell outside its allowed range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        /// Offending field name.
        field: &'static str,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
}

fn check_len(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), FieldValidationError> {
    if value.chars().count() > max {
        return Err(FieldValidationError::TooLong { field, max });
    }
    Ok(())
}

fn check_non_blank(field: &'static str, value: &str) -> Result<(), FieldValidationError> {
    if value.trim().is_empty() {
        return Err(FieldValidationError::Empty { field });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Review creation
// ---------------------------------------------------------------------------

/// Request payload for posting a review on a completed booking.
///
/// ## Invariants
/// - `rating` is between 1 and 5 inclusive.
/// - `comment`, when present, is at most 500 characters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "CreateReviewDto", into = "CreateReviewDto")]
pub struct CreateReviewRequest {
    #[schema(minimum = 1, maximum = 5, example = 5)]
    rating: i16,
    #[schema(max_length = 500)]
    comment: Option<String>,
}

impl CreateReviewRequest {
    /// Validate and construct a review request.
    pub fn new(rating: i16, comment: Option<String>) -> Result<Self, FieldValidationError> {
        if !(1..=5).contains(&rating) {
            return Err(FieldValidationError::OutOfRange {
                field: "rating",
                min: 1,
                max: 5,
            });
        }
        if let Some(comment) = &comment {
            check_len("comment", comment, SHORT_TEXT_MAX)?;
        }
        Ok(Self { rating, comment })
    }

    /// Star rating, 1..=5.
    pub fn rating(&self) -> i16 {
        self.rating
    }

    /// Free-text comment, when provided.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CreateReviewDto {
    rating: i16,
    comment: Option<String>,
}

impl From<CreateReviewRequest> for CreateReviewDto {
    fn from(value: CreateReviewRequest) -> Self {
        Self {
            rating: value.rating,
            comment: value.comment,
        }
    }
}

impl TryFrom<CreateReviewDto> for CreateReviewRequest {
    type Error = FieldValidationError;

    fn try_from(value: CreateReviewDto) -> Result<Self, Self::Error> {
        Self::new(value.rating, value.comment)
    }
}

// ---------------------------------------------------------------------------
// User suspension
// ---------------------------------------------------------------------------

/// Request payload for an administrator suspending a user.
///
/// ## Invariants
/// - `reason` is non-empty and at most 500 characters.
/// - `duration_days` is between 1 and 365 inclusive.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "SuspendUserDto", into = "SuspendUserDto")]
pub struct SuspendUserRequest {
    #[schema(max_length = 500, example = "Repeated no-shows at confirmed bookings")]
    reason: String,
    #[schema(minimum = 1, maximum = 365, example = 30)]
    duration_days: u16,
}

impl SuspendUserRequest {
    /// Validate and construct a suspension request.
    pub fn new(
        reason: impl Into<String>,
        duration_days: u16,
    ) -> Result<Self, FieldValidationError> {
        let reason = reason.into();
        check_non_blank("reason", &reason)?;
        check_len("reason", &reason, SHORT_TEXT_MAX)?;
        if !(1..=SUSPENSION_DAYS_MAX).contains(&duration_days) {
            return Err(FieldValidationError::OutOfRange {
                field: "durationDays",
                min: 1,
                max: i64::from(SUSPENSION_DAYS_MAX),
            });
        }
        Ok(Self {
            reason,
            duration_days,
        })
    }

    /// Stated moderation reason.
    pub fn reason(&self) -> &str {
        self.reason.as_str()
    }

    /// Suspension length in days, 1..=365.
    pub fn duration_days(&self) -> u16 {
        self.duration_days
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct SuspendUserDto {
    reason: String,
    duration_days: u16,
}

impl From<SuspendUserRequest> for SuspendUserDto {
    fn from(value: SuspendUserRequest) -> Self {
        Self {
            reason: value.reason,
            duration_days: value.duration_days,
        }
    }
}

impl TryFrom<SuspendUserDto> for SuspendUserRequest {
    type Error = FieldValidationError;

    fn try_from(value: SuspendUserDto) -> Result<Self, Self::Error> {
        Self::new(value.reason, value.duration_days)
    }
}

// ---------------------------------------------------------------------------
// Dispute resolution
// ---------------------------------------------------------------------------

/// Party a dispute is resolved in favour of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DisputeOutcome {
    /// Resolved in the buyer's favour: full refund.
    Buyer,
    /// Resolved in the mechanic's favour: escrow released.
    Mechanic,
}

/// Request payload for an administrator resolving a dispute.
///
/// ## Invariants
/// - `outcome` is one of the enumerated literals; anything else fails
///   deserialisation outright.
/// - `notes`, when present, is at most 2000 characters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "ResolveDisputeDto", into = "ResolveDisputeDto")]
pub struct ResolveDisputeRequest {
    outcome: DisputeOutcome,
    #[schema(max_length = 2000)]
    notes: Option<String>,
}

impl ResolveDisputeRequest {
    /// Validate and construct a dispute resolution request.
    pub fn new(
        outcome: DisputeOutcome,
        notes: Option<String>,
    ) -> Result<Self, FieldValidationError> {
        if let Some(notes) = &notes {
            check_len("notes", notes, NOTES_MAX)?;
        }
        Ok(Self { outcome, notes })
    }

    /// Winning party.
    pub fn outcome(&self) -> DisputeOutcome {
        self.outcome
    }

    /// Resolution notes, when provided.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ResolveDisputeDto {
    outcome: DisputeOutcome,
    notes: Option<String>,
}

impl From<ResolveDisputeRequest> for ResolveDisputeDto {
    fn from(value: ResolveDisputeRequest) -> Self {
        Self {
            outcome: value.outcome,
            notes: value.notes,
        }
    }
}

impl TryFrom<ResolveDisputeDto> for ResolveDisputeRequest {
    type Error = FieldValidationError;

    fn try_from(value: ResolveDisputeDto) -> Result<Self, Self::Error> {
        Self::new(value.outcome, value.notes)
    }
}

// ---------------------------------------------------------------------------
// Message creation
// ---------------------------------------------------------------------------

/// Request payload for sending a booking-scoped chat message.
///
/// ## Invariants
/// - `content` is non-empty and at most 500 characters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "CreateMessageDto", into = "CreateMessageDto")]
pub struct CreateMessageRequest {
    #[schema(min_length = 1, max_length = 500)]
    content: String,
    #[serde(default)]
    is_template: bool,
}

impl CreateMessageRequest {
    /// Validate and construct a message request.
    pub fn new(
        content: impl Into<String>,
        is_template: bool,
    ) -> Result<Self, FieldValidationError> {
        let content = content.into();
        check_non_blank("content", &content)?;
        check_len("content", &content, SHORT_TEXT_MAX)?;
        Ok(Self {
            content,
            is_template,
        })
    }

    /// Message body.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Whether the body came from a canned template.
    pub fn is_template(&self) -> bool {
        self.is_template
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CreateMessageDto {
    content: String,
    #[serde(default)]
    is_template: bool,
}

impl From<CreateMessageRequest> for CreateMessageDto {
    fn from(value: CreateMessageRequest) -> Self {
        Self {
            content: value.content,
            is_template: value.is_template,
        }
    }
}

impl TryFrom<CreateMessageDto> for CreateMessageRequest {
    type Error = FieldValidationError;

    fn try_from(value: CreateMessageDto) -> Result<Self, Self::Error> {
        Self::new(value.content, value.is_template)
    }
}

// ---------------------------------------------------------------------------
// Booking response shaping
// ---------------------------------------------------------------------------

/// Wire representation of a booking for API responses.
///
/// The check-in code hash never leaves the backend; refund fields appear
/// only once a cancellation or dispute resolution set them.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    /// Stable booking identifier.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    /// Buyer user id.
    #[schema(value_type = String)]
    pub buyer_id: Uuid,
    /// Mechanic user id.
    #[schema(value_type = String)]
    pub mechanic_id: Uuid,
    /// Lifecycle state.
    #[schema(example = "paid")]
    pub status: String,
    /// Agreed slot (RFC 3339).
    pub scheduled_at: chrono::DateTime<chrono::Utc>,
    /// Total price in cents.
    pub total_price_cents: i64,
    /// Platform commission in cents.
    pub commission_cents: i64,
    /// Mechanic payout in cents; always total minus commission.
    pub mechanic_payout_cents: i64,
    /// Refund percentage, once granted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_percent: Option<i16>,
    /// Refund amount in cents, once granted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_cents: Option<i64>,
    /// Whether a diagnostic-tool reading was requested.
    pub diagnostic_requested: bool,
}

impl From<&Booking> for BookingResponse {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            buyer_id: booking.buyer_id,
            mechanic_id: booking.mechanic_id,
            status: booking.status.as_str().to_owned(),
            scheduled_at: booking.scheduled_at,
            total_price_cents: booking.financials.total_price_cents(),
            commission_cents: booking.financials.commission_cents(),
            mechanic_payout_cents: booking.financials.mechanic_payout_cents(),
            refund_percent: booking.refund.map(|r| r.percent),
            refund_cents: booking.refund.map(|r| r.amount_cents),
            diagnostic_requested: booking.diagnostic_requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn long_string(len: usize) -> String {
        "x".repeat(len)
    }

    #[rstest]
    #[case(1)]
    #[case(5)]
    fn review_accepts_boundary_ratings(#[case] rating: i16) {
        let request = CreateReviewRequest::new(rating, None).expect("rating in range");
        assert_eq!(request.rating(), rating);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    fn review_rejects_out_of_range_ratings(#[case] rating: i16) {
        assert!(matches!(
            CreateReviewRequest::new(rating, None),
            Err(FieldValidationError::OutOfRange { field: "rating", .. })
        ));
    }

    #[rstest]
    fn review_comment_boundary() {
        assert!(CreateReviewRequest::new(5, Some(long_string(500))).is_ok());
        assert!(matches!(
            CreateReviewRequest::new(5, Some(long_string(501))),
            Err(FieldValidationError::TooLong { field: "comment", max: 500 })
        ));
    }

    #[rstest]
    fn review_validation_runs_inside_deserialisation() {
        let err = serde_json::from_str::<CreateReviewRequest>(r#"{"rating": 9}"#)
            .expect_err("rating out of range");
        assert!(err.to_string().contains("rating"));

        let ok: CreateReviewRequest =
            serde_json::from_str(r#"{"rating": 4, "comment": "thorough"}"#)
                .expect("valid payload");
        assert_eq!(ok.rating(), 4);
        assert_eq!(ok.comment(), Some("thorough"));
    }

    #[rstest]
    fn suspension_bounds() {
        assert!(SuspendUserRequest::new("spam", 1).is_ok());
        assert!(SuspendUserRequest::new("spam", 365).is_ok());
        assert!(SuspendUserRequest::new("spam", 0).is_err());
        assert!(SuspendUserRequest::new("spam", 366).is_err());
        assert!(SuspendUserRequest::new("   ", 10).is_err());
        assert!(SuspendUserRequest::new(long_string(501), 10).is_err());
    }

    #[rstest]
    fn dispute_outcome_literals() {
        let request: ResolveDisputeRequest =
            serde_json::from_str(r#"{"outcome": "buyer"}"#).expect("buyer is a valid literal");
        assert_eq!(request.outcome(), DisputeOutcome::Buyer);

        assert!(serde_json::from_str::<ResolveDisputeRequest>(r#"{"outcome": "platform"}"#)
            .is_err());
    }

    #[rstest]
    fn dispute_notes_boundary() {
        assert!(ResolveDisputeRequest::new(DisputeOutcome::Mechanic, Some(long_string(2000)))
            .is_ok());
        assert!(matches!(
            ResolveDisputeRequest::new(DisputeOutcome::Mechanic, Some(long_string(2001))),
            Err(FieldValidationError::TooLong { field: "notes", max: 2000 })
        ));
    }

    #[rstest]
    fn message_content_bounds() {
        assert!(CreateMessageRequest::new("a", false).is_ok());
        assert!(CreateMessageRequest::new(long_string(500), false).is_ok());
        assert!(CreateMessageRequest::new("", false).is_err());
        assert!(CreateMessageRequest::new(long_string(501), false).is_err());
    }

    #[rstest]
    fn message_is_template_defaults_to_false() {
        let request: CreateMessageRequest =
            serde_json::from_str(r#"{"content": "On my way"}"#).expect("valid payload");
        assert!(!request.is_template());
    }

    #[rstest]
    fn booking_response_hides_refund_until_set() {
        use crate::domain::booking::{BookingFinancials, BookingStatus};

        let booking = Booking {
            id: Uuid::new_v4(),
            buyer_id: Uuid::new_v4(),
            mechanic_id: Uuid::new_v4(),
            status: BookingStatus::Paid,
            vehicle_description: "2014 Clio, 89k km".to_owned(),
            inspection_address: "12 rue des Lilas, Lyon".to_owned(),
            scheduled_at: chrono::Utc::now(),
            financials: BookingFinancials::new(15_000, 2_250).expect("valid"),
            cancelled_by: None,
            refund: None,
            check_in_code_hash: Some("ab".repeat(32)),
            diagnostic_requested: true,
            refusal_reason: None,
            proposed_time: None,
        };

        let json = serde_json::to_value(BookingResponse::from(&booking)).expect("serialises");
        assert_eq!(json["mechanicPayoutCents"], 12_750);
        assert!(json.get("refundPercent").is_none());
        // The stored hash must never appear on the wire.
        assert!(json.get("checkInCodeHash").is_none());
        assert_eq!(json["status"], "paid");
    }
}
