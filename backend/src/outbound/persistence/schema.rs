//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.
//!
//! # Maintenance
//!
//! When migrations change the schema this file must be updated to match; the
//! `diesel print-schema` command can regenerate these definitions from a
//! migrated database. Note that the CHECK constraints (payout arithmetic,
//! rating bounds, GPS pairing) live only in the migrations; Diesel cannot
//! express them, but the database enforces them on every write path.

diesel::table! {
    /// Account identities for buyers, mechanics, and administrators.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        #[max_length = 100]
        first_name -> Varchar,
        #[max_length = 100]
        last_name -> Nullable<Varchar>,
        /// Unique login identifier.
        #[max_length = 255]
        email -> Varchar,
        #[max_length = 255]
        password_hash -> Varchar,
        /// One of `buyer`, `mechanic`, `admin` (CHECK constrained).
        #[max_length = 20]
        role -> Varchar,
        is_active -> Bool,
        /// Push-notification device token, when registered.
        #[max_length = 255]
        push_token -> Nullable<Varchar>,
        /// Payment-processor customer identifier.
        #[max_length = 255]
        payment_customer_id -> Nullable<Varchar>,
        #[max_length = 10]
        email_verification_code -> Nullable<Varchar>,
        email_verification_expires_at -> Nullable<Timestamptz>,
        email_verification_attempts -> Int4,
        /// Tokens issued before this instant are considered revoked.
        password_changed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Professional attributes of a mechanic.
    mechanic_profiles (id) {
        id -> Uuid,
        /// Owning user (unique; one profile per mechanic).
        user_id -> Uuid,
        /// Service location mode: `mobile`, `garage`, or `both`.
        #[max_length = 20]
        service_area -> Varchar,
        #[max_length = 500]
        garage_address -> Nullable<Varchar>,
        has_diagnostic_tool -> Bool,
        /// Payout-processor account identifier.
        #[max_length = 255]
        payout_account_id -> Nullable<Varchar>,
        /// Rating average, CHECK constrained to [0, 5].
        rating_avg -> Float4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// A mechanic's bookable time slot.
    availabilities (id) {
        id -> Uuid,
        mechanic_id -> Uuid,
        date -> Date,
        start_time -> Time,
        end_time -> Time,
        is_booked -> Bool,
    }
}

diesel::table! {
    /// Central transaction record between a buyer and a mechanic.
    ///
    /// Money columns are integer cents; the database CHECK-enforces
    /// `mechanic_payout_cents = total_price_cents - commission_cents`.
    bookings (id) {
        id -> Uuid,
        buyer_id -> Uuid,
        mechanic_id -> Uuid,
        /// Lifecycle state (CHECK constrained enum of eight states).
        #[max_length = 20]
        status -> Varchar,
        #[max_length = 500]
        vehicle_description -> Varchar,
        #[max_length = 500]
        inspection_address -> Varchar,
        scheduled_at -> Timestamptz,
        total_price_cents -> Int8,
        commission_cents -> Int8,
        mechanic_payout_cents -> Int8,
        /// Who cancelled: `buyer`, `mechanic`, or `admin`.
        #[max_length = 20]
        cancelled_by -> Nullable<Varchar>,
        refund_percent -> Nullable<Int2>,
        refund_cents -> Nullable<Int8>,
        /// SHA-256 hex digest of the one-time check-in code.
        #[max_length = 64]
        check_in_code_hash -> Nullable<Bpchar>,
        diagnostic_requested -> Bool,
        #[max_length = 500]
        refusal_reason -> Nullable<Varchar>,
        /// Alternate slot proposed by the mechanic.
        proposed_time -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        reminder_24h_sent -> Bool,
        reminder_1h_sent -> Bool,
        /// Mechanic position on the day of the inspection (paired CHECK).
        mechanic_lat -> Nullable<Float8>,
        mechanic_lng -> Nullable<Float8>,
        location_updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Booking-scoped chat entries.
    messages (id) {
        id -> Uuid,
        booking_id -> Uuid,
        sender_id -> Uuid,
        is_template -> Bool,
        #[max_length = 500]
        content -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// On-site inspection evidence.
    ///
    /// The database CHECK-enforces `(gps_lat IS NULL) = (gps_lng IS NULL)`.
    validation_proofs (id) {
        id -> Uuid,
        booking_id -> Uuid,
        gps_lat -> Nullable<Float8>,
        gps_lng -> Nullable<Float8>,
        #[max_length = 500]
        photo_url -> Varchar,
        extra_photo_urls -> Array<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Escalation records for contested bookings.
    dispute_cases (id) {
        id -> Uuid,
        booking_id -> Uuid,
        opened_by -> Uuid,
        #[max_length = 20]
        status -> Varchar,
        #[max_length = 2000]
        reason -> Varchar,
        photo_urls -> Array<Text>,
        /// `buyer` or `mechanic` once resolved.
        #[max_length = 20]
        resolution_outcome -> Nullable<Varchar>,
        #[max_length = 2000]
        resolution_notes -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One rating per booking (CHECK constrained to 1..=5).
    reviews (id) {
        id -> Uuid,
        booking_id -> Uuid,
        author_id -> Uuid,
        rating -> Int2,
        #[max_length = 500]
        comment -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Generated inspection report documents, one per booking.
    reports (id) {
        id -> Uuid,
        booking_id -> Uuid,
        #[max_length = 500]
        pdf_url -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Admin-action trail. `metadata_json` is an opaque structured payload.
    audit_logs (id) {
        id -> Uuid,
        actor_id -> Nullable<Uuid>,
        #[max_length = 100]
        action -> Varchar,
        #[max_length = 100]
        target_type -> Varchar,
        #[max_length = 100]
        target_id -> Varchar,
        metadata_json -> Nullable<Jsonb>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Revoked auth tokens, indexed by expiry for cleanup.
    blacklisted_tokens (id) {
        id -> Uuid,
        #[max_length = 255]
        token_hash -> Varchar,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Mechanic credentials pending or past verification.
    diplomas (id) {
        id -> Uuid,
        mechanic_id -> Uuid,
        #[max_length = 255]
        title -> Varchar,
        #[max_length = 500]
        file_url -> Varchar,
        verified -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Referral tracking.
    referral_codes (id) {
        id -> Uuid,
        owner_id -> Uuid,
        #[max_length = 20]
        code -> Varchar,
        uses -> Int4,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Webhook idempotency markers keyed by the processor's event id.
    processed_webhook_events (id) {
        id -> Uuid,
        #[max_length = 255]
        event_id -> Varchar,
        #[max_length = 100]
        event_type -> Varchar,
        processed_at -> Timestamptz,
    }
}

diesel::joinable!(mechanic_profiles -> users (user_id));
diesel::joinable!(availabilities -> users (mechanic_id));
diesel::joinable!(messages -> bookings (booking_id));
diesel::joinable!(messages -> users (sender_id));
diesel::joinable!(validation_proofs -> bookings (booking_id));
diesel::joinable!(dispute_cases -> bookings (booking_id));
diesel::joinable!(dispute_cases -> users (opened_by));
diesel::joinable!(reviews -> bookings (booking_id));
diesel::joinable!(reviews -> users (author_id));
diesel::joinable!(reports -> bookings (booking_id));
diesel::joinable!(audit_logs -> users (actor_id));
diesel::joinable!(diplomas -> users (mechanic_id));
diesel::joinable!(referral_codes -> users (owner_id));
// bookings references users twice (buyer_id, mechanic_id), so no single
// joinable! applies; joins against users go through explicit ON clauses.

diesel::allow_tables_to_appear_in_same_query!(
    audit_logs,
    availabilities,
    blacklisted_tokens,
    bookings,
    diplomas,
    dispute_cases,
    mechanic_profiles,
    messages,
    processed_webhook_events,
    referral_codes,
    reports,
    reviews,
    users,
    validation_proofs,
);
