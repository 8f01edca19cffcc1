//! Booking-scoped records: chat messages and inspection evidence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A latitude/longitude pair.
///
/// The storage layer enforces `(gps_lat IS NULL) = (gps_lng IS NULL)` with a
/// CHECK constraint; in the domain the same invariant is structural: a proof
/// either has a whole [`GpsPoint`] or none, a lone coordinate cannot be
/// represented.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

/// On-site inspection evidence attached to a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationProof {
    /// Stable proof identifier.
    pub id: Uuid,
    /// Booking this evidence belongs to.
    pub booking_id: Uuid,
    /// Where the proof was captured, when recorded.
    pub gps: Option<GpsPoint>,
    /// Primary photo URL.
    pub photo_url: String,
    /// Additional photo URLs.
    pub extra_photo_urls: Vec<String>,
    /// Capture timestamp.
    pub created_at: DateTime<Utc>,
}

/// Booking-scoped chat entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Stable message identifier.
    pub id: Uuid,
    /// Booking the conversation belongs to.
    pub booking_id: Uuid,
    /// Authoring user.
    pub sender_id: Uuid,
    /// Whether the content came from a canned template rather than free text.
    pub is_template: bool,
    /// Message body.
    pub content: String,
    /// Send timestamp.
    pub created_at: DateTime<Utc>,
}
