//! Identity keys: the normalized email or username a credential is stored under.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValidationError;

/// Normalize an identity for lookup/uniqueness checks.
pub fn normalize_identity(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email_normalized))
}

/// A trimmed, lowercased identity. Two keys are equal iff their raw inputs
/// compare equal case-insensitively.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Parse a username-style identity: any non-empty string after normalization.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = normalize_identity(raw);
        if normalized.is_empty() {
            return Err(ValidationError::EmptyIdentity);
        }
        Ok(Self(normalized))
    }

    /// Parse an identity that must also look like an email address.
    pub fn parse_email(raw: &str) -> Result<Self, ValidationError> {
        let key = Self::parse(raw)?;
        if !valid_email(&key.0) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(key)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IdentityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
