//! Domain primitives and aggregates.
//!
//! Purpose: define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.

pub mod booking;
pub mod check_in;
pub mod csv;
pub mod display_name;
pub mod error;
pub mod evidence;
pub mod masking;
pub mod ports;
pub mod user;

pub use self::booking::{
    cancellation_refund, dispute_refund, Booking, BookingFinancials, BookingStatus,
    CancellationActor, FinancialsError, Refund,
};
pub use self::check_in::{generate_check_in_code, hash_check_in_code, verify_check_in_code};
pub use self::csv::sanitize_csv_cell;
pub use self::display_name::get_display_name;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::evidence::{GpsPoint, Message, ValidationProof};
pub use self::masking::mask_email;
pub use self::user::{EmailAddress, Role};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
