//! User identity primitives.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role determining what a user may do on the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Vehicle buyer requesting inspections.
    Buyer,
    /// Mobile mechanic performing inspections.
    Mechanic,
    /// Platform administrator and moderator.
    Admin,
}

impl Role {
    /// Stable storage representation, matching the `users.role` CHECK
    /// constraint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Mechanic => "mechanic",
            Self::Admin => "admin",
        }
    }
}

/// Parse failure for [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised role: {0}")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "buyer" => Ok(Self::Buyer),
            "mechanic" => Ok(Self::Mechanic),
            "admin" => Ok(Self::Admin),
            other => Err(RoleParseError(other.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors returned by [`EmailAddress::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// The address was empty after trimming.
    #[error("email address must not be empty")]
    Empty,
    /// The address lacked an `@` with content on both sides.
    #[error("email address must contain a local part and a domain")]
    Malformed,
}

/// Syntactically plausible email address.
///
/// Validation is intentionally shallow: one `@`, non-empty local part and
/// domain, domain contains a dot. Deliverability is the mail provider's
/// problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(value: impl Into<String>) -> Result<Self, EmailValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if !looks_like_email(&raw) {
            return Err(EmailValidationError::Malformed);
        }
        Ok(Self(raw))
    }

    /// Borrow the address as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Text before the `@`.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }

    /// Text after the `@`.
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map(|(_, d)| d).unwrap_or_default()
    }
}

/// Shallow structural check shared with the log-masking utility.
pub(crate) fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !value.chars().any(char::is_whitespace)
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("buyer", Role::Buyer)]
    #[case("mechanic", Role::Mechanic)]
    #[case("admin", Role::Admin)]
    fn role_round_trips(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    fn role_rejects_unknown_value() {
        assert!("superuser".parse::<Role>().is_err());
    }

    #[rstest]
    #[case("alice@test.com")]
    #[case("john.doe@example.co.uk")]
    fn email_accepts_plausible_addresses(#[case] raw: &str) {
        let email = EmailAddress::new(raw).expect("address is plausible");
        assert_eq!(email.as_str(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("no-at-sign")]
    #[case("@nodomainlocal")]
    #[case("trailing@")]
    #[case("two@@signs.com")]
    #[case("spaced out@example.com")]
    #[case("nodot@localhost")]
    fn email_rejects_malformed_addresses(#[case] raw: &str) {
        assert!(EmailAddress::new(raw).is_err());
    }

    #[rstest]
    fn email_exposes_parts() {
        let email = EmailAddress::new("john.doe@example.com").expect("valid");
        assert_eq!(email.local_part(), "john.doe");
        assert_eq!(email.domain(), "example.com");
    }
}
