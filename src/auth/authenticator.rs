//! Signup and login checks over a credential store.
//!
//! Flow Overview:
//! - `register`: validate input, reject duplicates, hash, persist.
//! - `verify`: look up, compare digests, transparently upgrade stale hashes.
//! - `change_password` / `delete_account`: re-authenticate, then mutate.
//!
//! Security boundaries: plaintext only ever exists inside the `SecretString`
//! the caller hands in and the borrowed slice of it passed to the hasher.
//! Unknown identities run a dummy verify so the "no such user" and "wrong
//! password" paths cost the same.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    clock::{Clock, SystemClock},
    config::AuthConfig,
    error::{Error, Result, ValidationError},
    hasher::Hasher,
    identity::IdentityKey,
    store::{Credential, CredentialStore},
};

pub struct Authenticator {
    config: AuthConfig,
    hasher: Hasher,
    store: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
}

impl Authenticator {
    /// Build an authenticator using the hasher parameters from `config`.
    ///
    /// # Errors
    /// Returns `Error::Config` when the hasher parameters are invalid.
    pub fn new(config: AuthConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let hasher = Hasher::new(*config.hasher())?;
        Ok(Self::with_parts(config, hasher, store, Arc::new(SystemClock)))
    }

    pub fn with_parts(
        config: AuthConfig,
        hasher: Hasher,
        store: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        hasher.prepare_dummy();
        Self {
            config,
            hasher,
            store,
            clock,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn hasher(&self) -> &Hasher {
        &self.hasher
    }

    /// Parse a raw identity according to the configured identity policy.
    ///
    /// # Errors
    /// Returns the validation failure for empty or malformed identities.
    pub fn parse_identity(&self, raw: &str) -> Result<IdentityKey, ValidationError> {
        if self.config.email_identities() {
            IdentityKey::parse_email(raw)
        } else {
            IdentityKey::parse(raw)
        }
    }

    /// Create a new credential.
    ///
    /// # Errors
    /// `Error::Validation` for bad input, `Error::Conflict` when the identity is
    /// already registered (in any letter case), `Error::Store` on backend faults.
    #[instrument(skip_all)]
    pub fn register(
        &self,
        identity: &str,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<Credential> {
        let identity = self.parse_identity(identity)?;
        self.check_new_password(password, confirmation)?;

        if self.store.find_by_identity(&identity)?.is_some() {
            debug!(%identity, "Registration rejected: identity exists");
            return Err(Error::Conflict);
        }

        let digest = self.hasher.hash(password.expose_secret().as_bytes())?;
        let credential = Credential::new(identity, digest, self.clock.now());

        // The store has the final word on uniqueness if two signups race.
        self.store.save(credential.clone())?;

        info!(identity = %credential.identity, "Registered credential");

        Ok(credential)
    }

    /// Check a login attempt and return the normalized identity on success.
    ///
    /// # Errors
    /// `Error::AuthFailure` for unknown identities and wrong passwords alike;
    /// `Error::Store` when the backend cannot be queried.
    #[instrument(skip_all)]
    pub fn verify(&self, identity: &str, password: &SecretString) -> Result<IdentityKey> {
        let credential = self.authenticate(identity, password)?;

        if self.hasher.needs_rehash(&credential.digest) {
            self.upgrade_digest(credential.clone(), password);
        }

        debug!(identity = %credential.identity, "Password verified");

        Ok(credential.identity)
    }

    /// Replace the password after re-checking the current one.
    ///
    /// # Errors
    /// `Error::AuthFailure` when `current` is wrong, `Error::Validation` when the
    /// new password breaks policy, `Error::Store` on backend faults.
    #[instrument(skip_all)]
    pub fn change_password(
        &self,
        identity: &str,
        current: &SecretString,
        new: &SecretString,
        confirmation: &SecretString,
    ) -> Result<Credential> {
        let credential = self.authenticate(identity, current)?;
        self.check_new_password(new, confirmation)?;

        let digest = self.hasher.hash(new.expose_secret().as_bytes())?;
        let credential = credential.with_digest(digest, self.clock.now());
        self.store.replace(credential.clone())?;

        info!(identity = %credential.identity, "Password changed");

        Ok(credential)
    }

    /// Delete the credential after re-checking the password.
    ///
    /// Sessions are not touched here; pair with `SessionManager::revoke_all`.
    ///
    /// # Errors
    /// `Error::AuthFailure` when the password is wrong, `Error::Store` on
    /// backend faults.
    #[instrument(skip_all)]
    pub fn delete_account(&self, identity: &str, password: &SecretString) -> Result<IdentityKey> {
        let credential = self.authenticate(identity, password)?;
        self.store.delete(&credential.identity)?;

        info!(identity = %credential.identity, "Deleted credential");

        Ok(credential.identity)
    }

    fn authenticate(&self, identity: &str, password: &SecretString) -> Result<Credential> {
        let plaintext = password.expose_secret().as_bytes();

        let Ok(identity) = self.parse_identity(identity) else {
            self.hasher.verify_dummy(plaintext);
            return Err(Error::AuthFailure);
        };

        let Some(credential) = self.store.find_by_identity(&identity)? else {
            self.hasher.verify_dummy(plaintext);
            debug!(%identity, "Authentication failed: unknown identity");
            return Err(Error::AuthFailure);
        };

        if !self.hasher.verify(plaintext, &credential.digest) {
            debug!(%identity, "Authentication failed: password mismatch");
            return Err(Error::AuthFailure);
        }

        Ok(credential)
    }

    fn check_new_password(
        &self,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<(), ValidationError> {
        let plaintext = password.expose_secret();
        if plaintext != confirmation.expose_secret() {
            return Err(ValidationError::PasswordMismatch);
        }
        self.config.check_password_length(plaintext)
    }

    /// Re-hash with current parameters. Failures only cost us the upgrade.
    fn upgrade_digest(&self, credential: Credential, password: &SecretString) {
        let identity = credential.identity.clone();
        let digest = match self.hasher.hash(password.expose_secret().as_bytes()) {
            Ok(digest) => digest,
            Err(err) => {
                warn!(%identity, "Failed to rehash password: {err}");
                return;
            }
        };

        match self
            .store
            .replace(credential.with_digest(digest, self.clock.now()))
        {
            Ok(()) => info!(%identity, "Upgraded password hash parameters"),
            Err(err) => warn!(%identity, "Failed to store rehashed password: {err}"),
        }
    }
}
