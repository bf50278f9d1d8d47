//! EmailAddress value object for the `create-user` input schema.
//!
//! The check is purely syntactic: a local part, a single `@`, and a dotted
//! domain. It does not resolve domains or accept quoted local parts.

use crate::error::{DirectoryError, DirectoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A syntactically valid email address.
///
/// ## Validation Rules
///
/// - Exactly one `@`, with a non-empty local part before it
/// - No whitespace or control characters anywhere
/// - The domain has at least two dot-separated labels, none empty, and no
///   label starts or ends with `-`
///
/// ## Examples
///
/// ```rust
/// use user_directory::user::EmailAddress;
///
/// let email = EmailAddress::new("ada@example.com").unwrap();
/// assert_eq!(email.domain(), "example.com");
///
/// assert!(EmailAddress::new("not-an-address").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and wrap an address.
    pub fn new(value: impl Into<String>) -> DirectoryResult<Self> {
        let value = value.into();
        Self::validate(&value)?;
        Ok(Self(value))
    }

    /// The full address.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part after `@`.
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map(|(_, d)| d).unwrap_or_default()
    }

    /// Unwrap into the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }

    fn validate(value: &str) -> DirectoryResult<()> {
        let invalid = |message: &str| DirectoryError::invalid_input("email", message);

        if value.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(invalid("must not contain whitespace"));
        }

        let (local, domain) = value
            .split_once('@')
            .ok_or_else(|| invalid("must contain '@'"))?;

        if local.is_empty() {
            return Err(invalid("local part must not be empty"));
        }
        if domain.contains('@') {
            return Err(invalid("must contain exactly one '@'"));
        }

        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 {
            return Err(invalid("domain must contain a '.'"));
        }
        for label in labels {
            if label.is_empty() {
                return Err(invalid("domain labels must not be empty"));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(invalid("domain labels must not start or end with '-'"));
            }
        }

        Ok(())
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = DirectoryError;

    fn try_from(value: String) -> DirectoryResult<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for EmailAddress {
    type Error = DirectoryError;

    fn try_from(value: &str) -> DirectoryResult<Self> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}
