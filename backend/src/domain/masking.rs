//! PII masking for log output.

use super::user::looks_like_email;

/// Fixed replacement emitted when nothing can safely be shown.
const FULL_MASK: &str = "***";

/// Mask an email address for logging.
///
/// Absent or implausible input becomes `***`. Otherwise the first character
/// of the local part is kept, followed by `***@` and the original domain:
/// `alice@test.com` → `a***@test.com`. A single-character local part keeps
/// that character rather than producing an empty prefix.
pub fn mask_email(email: Option<&str>) -> String {
    let Some(raw) = email else {
        return FULL_MASK.to_owned();
    };
    if !looks_like_email(raw) {
        return FULL_MASK.to_owned();
    }
    let Some((local, domain)) = raw.split_once('@') else {
        return FULL_MASK.to_owned();
    };
    let mut masked = String::with_capacity(raw.len());
    if let Some(first) = local.chars().next() {
        masked.push(first);
    }
    masked.push_str("***@");
    masked.push_str(domain);
    masked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("alice@test.com"), "a***@test.com")]
    #[case(Some("john.doe@example.co.uk"), "j***@example.co.uk")]
    #[case(Some("x@d.com"), "x***@d.com")]
    fn plausible_addresses_keep_first_char_and_domain(
        #[case] input: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(mask_email(input), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("not an email"))]
    #[case(Some("missing-at.example.com"))]
    #[case(Some("@no-local.com"))]
    fn questionable_input_is_fully_masked(#[case] input: Option<&str>) {
        assert_eq!(mask_email(input), "***");
    }
}
