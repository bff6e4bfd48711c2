//! Credential persistence boundary.
//!
//! The core only talks to `CredentialStore`; hosts plug in their database.
//! `MemoryCredentialStore` backs tests and single-process deployments.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{error::StoreError, hasher::PasswordDigest, identity::IdentityKey};

/// A persisted login credential. Only the digest is kept, never the plaintext.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub identity: IdentityKey,
    pub digest: PasswordDigest,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    #[must_use]
    pub fn new(identity: IdentityKey, digest: PasswordDigest, now: DateTime<Utc>) -> Self {
        Self {
            identity,
            digest,
            created_at: now,
            updated_at: now,
        }
    }

    /// Swap in a new digest, keeping the creation time.
    #[must_use]
    pub fn with_digest(self, digest: PasswordDigest, now: DateTime<Utc>) -> Self {
        Self {
            digest,
            updated_at: now,
            ..self
        }
    }
}

pub trait CredentialStore: Send + Sync {
    /// # Errors
    /// Returns `StoreError::Backend` when the backend cannot be queried.
    fn find_by_identity(&self, identity: &IdentityKey) -> Result<Option<Credential>, StoreError>;

    /// Insert a new credential.
    ///
    /// # Errors
    /// Returns `StoreError::Conflict` when the identity already exists; the
    /// existing record must be left untouched.
    fn save(&self, credential: Credential) -> Result<(), StoreError>;

    /// Overwrite an existing credential (password change, rehash).
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` when the identity does not exist.
    fn replace(&self, credential: Credential) -> Result<(), StoreError>;

    /// Remove a credential. Deleting a missing identity is not an error.
    ///
    /// # Errors
    /// Returns `StoreError::Backend` when the backend cannot be written.
    fn delete(&self, identity: &IdentityKey) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credentials: RwLock<HashMap<IdentityKey, Credential>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.credentials.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credentials.read().is_empty()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn find_by_identity(&self, identity: &IdentityKey) -> Result<Option<Credential>, StoreError> {
        Ok(self.credentials.read().get(identity).cloned())
    }

    fn save(&self, credential: Credential) -> Result<(), StoreError> {
        let mut credentials = self.credentials.write();
        if credentials.contains_key(&credential.identity) {
            return Err(StoreError::Conflict);
        }
        credentials.insert(credential.identity.clone(), credential);
        Ok(())
    }

    fn replace(&self, credential: Credential) -> Result<(), StoreError> {
        let mut credentials = self.credentials.write();
        match credentials.get_mut(&credential.identity) {
            Some(existing) => {
                *existing = credential;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn delete(&self, identity: &IdentityKey) -> Result<(), StoreError> {
        self.credentials.write().remove(identity);
        Ok(())
    }
}
