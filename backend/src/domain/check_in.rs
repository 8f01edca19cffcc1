//! One-time check-in codes for physical inspection handover.
//!
//! The buyer reads the code to the mechanic on site; the backend compares a
//! hash. The code is short-lived and paired with a specific booking, which is
//! why four digits are enough, but it still must be unpredictable, so it is
//! drawn from the operating system's CSPRNG rather than a seeded generator.

use rand::rngs::OsRng;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate a uniformly random, zero-padded 4-digit check-in code.
pub fn generate_check_in_code() -> String {
    let value: u16 = OsRng.gen_range(0..10_000);
    format!("{value:04}")
}

/// SHA-256 hex digest of a check-in code, the only form ever persisted.
///
/// The output is 64 lowercase hex characters, matching the CHAR(64)
/// `bookings.check_in_code_hash` column.
pub fn hash_check_in_code(code: &str) -> String {
    let digest = Sha256::digest(code.as_bytes());
    hex::encode(digest)
}

/// Constant-shape comparison of a presented code against a stored hash.
pub fn verify_check_in_code(code: &str, stored_hash: &str) -> bool {
    hash_check_in_code(code) == stored_hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn code_is_four_decimal_digits() {
        for _ in 0..256 {
            let code = generate_check_in_code();
            assert_eq!(code.len(), 4);
            assert!(code.chars().all(|c| c.is_ascii_digit()), "code: {code}");
        }
    }

    #[rstest]
    fn code_is_zero_padded() {
        // "0042"-style codes keep their leading zeroes. Sampling cannot prove
        // padding, so check the formatting path directly.
        assert_eq!(format!("{:04}", 42_u16), "0042");
        assert_eq!(format!("{:04}", 0_u16), "0000");
    }

    #[rstest]
    fn hash_is_64_hex_chars_and_deterministic() {
        let hash = hash_check_in_code("1234");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash, hash_check_in_code("1234"));
        assert_ne!(hash, hash_check_in_code("1235"));
    }

    #[rstest]
    fn verification_matches_only_the_original_code() {
        let stored = hash_check_in_code("0907");
        assert!(verify_check_in_code("0907", &stored));
        assert!(!verify_check_in_code("0908", &stored));
    }
}
