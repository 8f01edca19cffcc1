//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    audit_logs, availabilities, blacklisted_tokens, bookings, diplomas, dispute_cases,
    mechanic_profiles, messages, processed_webhook_events, referral_codes, reports, reviews,
    users, validation_proofs,
};

// ---------------------------------------------------------------------------
// User models
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[expect(
    dead_code,
    reason = "entity mapping consumed once DieselUserRepository lands with the auth service"
)]
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub push_token: Option<String>,
    pub payment_customer_id: Option<String>,
    pub email_verification_code: Option<String>,
    pub email_verification_expires_at: Option<DateTime<Utc>>,
    pub email_verification_attempts: i32,
    pub password_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[expect(
    dead_code,
    reason = "entity mapping consumed once DieselUserRepository lands with the auth service"
)]
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub first_name: &'a str,
    pub last_name: Option<&'a str>,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

// ---------------------------------------------------------------------------
// Mechanic profile and availability models
// ---------------------------------------------------------------------------

/// Row struct for reading from the mechanic_profiles table.
#[expect(
    dead_code,
    reason = "entity mapping consumed once the mechanic onboarding service lands"
)]
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = mechanic_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MechanicProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_area: String,
    pub garage_address: Option<String>,
    pub has_diagnostic_tool: bool,
    pub payout_account_id: Option<String>,
    pub rating_avg: f32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the availabilities table.
#[expect(
    dead_code,
    reason = "entity mapping consumed once the scheduling service lands"
)]
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = availabilities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AvailabilityRow {
    pub id: Uuid,
    pub mechanic_id: Uuid,
    pub date: chrono::NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub is_booked: bool,
}

// ---------------------------------------------------------------------------
// Booking models
// ---------------------------------------------------------------------------

/// Row struct for reading from the bookings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub mechanic_id: Uuid,
    pub status: String,
    pub vehicle_description: String,
    pub inspection_address: String,
    pub scheduled_at: DateTime<Utc>,
    pub total_price_cents: i64,
    pub commission_cents: i64,
    #[expect(
        dead_code,
        reason = "derived column; the domain recomputes payout from total and commission"
    )]
    pub mechanic_payout_cents: i64,
    pub cancelled_by: Option<String>,
    pub refund_percent: Option<i16>,
    pub refund_cents: Option<i64>,
    pub check_in_code_hash: Option<String>,
    pub diagnostic_requested: bool,
    pub refusal_reason: Option<String>,
    pub proposed_time: Option<DateTime<Utc>>,
    #[expect(dead_code, reason = "schema field for audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new booking records.
///
/// `mechanic_payout_cents` is spelled out even though it is derived: the
/// database re-checks the arithmetic with its CHECK constraint on every
/// insert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub mechanic_id: Uuid,
    pub status: &'a str,
    pub vehicle_description: &'a str,
    pub inspection_address: &'a str,
    pub scheduled_at: DateTime<Utc>,
    pub total_price_cents: i64,
    pub commission_cents: i64,
    pub mechanic_payout_cents: i64,
    pub check_in_code_hash: Option<&'a str>,
    pub diagnostic_requested: bool,
    pub refusal_reason: Option<&'a str>,
    pub proposed_time: Option<DateTime<Utc>>,
}

/// Changeset struct for recording a cancellation outcome.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bookings)]
pub(crate) struct BookingCancellationUpdate<'a> {
    pub status: &'a str,
    pub cancelled_by: &'a str,
    pub refund_percent: i16,
    pub refund_cents: i64,
}

// ---------------------------------------------------------------------------
// Message and validation proof models
// ---------------------------------------------------------------------------

/// Row struct for reading from the messages table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MessageRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub sender_id: Uuid,
    pub is_template: bool,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the validation_proofs table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = validation_proofs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ValidationProofRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub photo_url: String,
    pub extra_photo_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Dispute, review, report models
// ---------------------------------------------------------------------------

/// Row struct for reading from the dispute_cases table.
#[expect(
    dead_code,
    reason = "entity mapping consumed once the moderation service lands"
)]
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = dispute_cases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DisputeCaseRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub opened_by: Uuid,
    pub status: String,
    pub reason: String,
    pub photo_urls: Vec<String>,
    pub resolution_outcome: Option<String>,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the reviews table.
#[expect(
    dead_code,
    reason = "entity mapping consumed once the rating service lands"
)]
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub author_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the reports table.
#[expect(
    dead_code,
    reason = "entity mapping consumed once report generation lands"
)]
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReportRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub pdf_url: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Support table models
// ---------------------------------------------------------------------------

/// Row struct for reading from the audit_logs table.
#[expect(
    dead_code,
    reason = "entity mapping consumed once the admin moderation surface lands"
)]
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = audit_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuditLogRow {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub target_type: String,
    pub target_id: String,
    pub metadata_json: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the blacklisted_tokens table.
#[expect(
    dead_code,
    reason = "revocation checks use existence projections; full rows only matter to admin tooling"
)]
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = blacklisted_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BlacklistedTokenRow {
    pub id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for recording a revoked token.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blacklisted_tokens)]
pub(crate) struct NewBlacklistedTokenRow<'a> {
    pub id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

/// Row struct for reading from the diplomas table.
#[expect(
    dead_code,
    reason = "entity mapping consumed once credential verification lands"
)]
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = diplomas)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DiplomaRow {
    pub id: Uuid,
    pub mechanic_id: Uuid,
    pub title: String,
    pub file_url: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the referral_codes table.
#[expect(
    dead_code,
    reason = "entity mapping consumed once referral tracking lands"
)]
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = referral_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReferralCodeRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub code: String,
    pub uses: i32,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for claiming a webhook event id.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = processed_webhook_events)]
pub(crate) struct NewProcessedWebhookEventRow<'a> {
    pub id: Uuid,
    pub event_id: &'a str,
    pub event_type: &'a str,
}
