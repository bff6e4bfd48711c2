//! Authentication policy and tuning knobs.

use chrono::Duration;
use serde::Serialize;

use super::{
    error::{Error, Result, ValidationError},
    hasher::HasherConfig,
};

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;
pub const DEFAULT_MAX_PASSWORD_LENGTH: usize = 1024;
pub const DEFAULT_SESSION_TTL_SECONDS: u64 = 12 * 60 * 60;
/// Longest accepted session lifetime (100 years).
pub const MAX_SESSION_TTL_SECONDS: u64 = 100 * 365 * 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthConfig {
    min_password_length: usize,
    max_password_length: usize,
    email_identities: bool,
    session_ttl_seconds: u64,
    hasher: HasherConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            max_password_length: DEFAULT_MAX_PASSWORD_LENGTH,
            email_identities: true,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            hasher: HasherConfig::default(),
        }
    }
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_min_password_length(mut self, length: usize) -> Self {
        self.min_password_length = length;
        self
    }

    #[must_use]
    pub fn with_max_password_length(mut self, length: usize) -> Self {
        self.max_password_length = length;
        self
    }

    /// When false, any non-empty identity (e.g. a username) is accepted.
    #[must_use]
    pub fn with_email_identities(mut self, enabled: bool) -> Self {
        self.email_identities = enabled;
        self
    }

    /// Zero disables expiry.
    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: u64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_hasher(mut self, hasher: HasherConfig) -> Self {
        self.hasher = hasher;
        self
    }

    #[must_use]
    pub fn min_password_length(&self) -> usize {
        self.min_password_length
    }

    #[must_use]
    pub fn max_password_length(&self) -> usize {
        self.max_password_length
    }

    #[must_use]
    pub fn email_identities(&self) -> bool {
        self.email_identities
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> u64 {
        self.session_ttl_seconds
    }

    /// Session lifetime, or `None` when sessions never expire.
    ///
    /// # Errors
    /// Returns `Error::Config` when the TTL exceeds `MAX_SESSION_TTL_SECONDS`.
    pub fn session_ttl(&self) -> Result<Option<Duration>> {
        if self.session_ttl_seconds == 0 {
            return Ok(None);
        }
        if self.session_ttl_seconds > MAX_SESSION_TTL_SECONDS {
            return Err(Error::Config(format!(
                "session ttl of {} seconds exceeds {MAX_SESSION_TTL_SECONDS}",
                self.session_ttl_seconds
            )));
        }
        i64::try_from(self.session_ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .map(Some)
            .ok_or_else(|| Error::Config("session ttl out of range".to_string()))
    }

    #[must_use]
    pub fn hasher(&self) -> &HasherConfig {
        &self.hasher
    }

    /// Enforce the length policy, counted in characters rather than bytes.
    ///
    /// Empty passwords are always too short, even with a minimum of zero.
    ///
    /// # Errors
    /// Returns `PasswordTooShort` or `PasswordTooLong`.
    pub fn check_password_length(&self, plaintext: &str) -> Result<(), ValidationError> {
        let length = plaintext.chars().count();
        let min = self.min_password_length.max(1);
        if length < min {
            return Err(ValidationError::PasswordTooShort { min });
        }
        if length > self.max_password_length {
            return Err(ValidationError::PasswordTooLong {
                max: self.max_password_length,
            });
        }
        Ok(())
    }
}
