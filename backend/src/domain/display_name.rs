//! User display-name derivation.

/// Derive the name shown in the UI and in notifications.
///
/// Preference order: "first last", then "first" alone, then the local part of
/// the email address. Total function; the worst input still yields a string.
pub fn get_display_name(
    first_name: Option<&str>,
    last_name: Option<&str>,
    email: &str,
) -> String {
    match (non_blank(first_name), non_blank(last_name)) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (Some(first), None) => first.to_owned(),
        (None, _) => email.split('@').next().unwrap_or_default().to_owned(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("Jean"), Some("Dupont"), "x@y.com", "Jean Dupont")]
    #[case(Some("Alice"), None, "x@y.com", "Alice")]
    #[case(None, None, "john.doe@example.com", "john.doe")]
    // A last name without a first name is not shown on its own.
    #[case(None, Some("Dupont"), "john.doe@example.com", "john.doe")]
    #[case(Some("  "), Some("Dupont"), "jd@example.com", "jd")]
    #[case(None, None, "not-an-email", "not-an-email")]
    fn derivation_preference_order(
        #[case] first: Option<&str>,
        #[case] last: Option<&str>,
        #[case] email: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(get_display_name(first, last, email), expected);
    }
}
