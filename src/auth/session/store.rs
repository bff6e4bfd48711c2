//! Session records and the pluggable table that holds them.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{hash_map::Entry, HashMap};
use ulid::Ulid;

use super::token::TokenHash;
use crate::auth::{error::StoreError, identity::IdentityKey};

/// A live session. `id` is safe to log; the token it was issued for is not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub id: Ulid,
    pub identity: IdentityKey,
    pub issued_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// Backing table for sessions, keyed by token hash.
///
/// Implementations must make each call atomic with respect to the others:
/// `get` never returns a half-written record, and `remove_if_expired` /
/// `purge_expired` re-check expiry against `now` while holding whatever
/// guards the table.
pub trait SessionStore: Send + Sync {
    /// # Errors
    /// Returns `StoreError::Conflict` when `key` is already present.
    fn insert_if_vacant(&self, key: TokenHash, session: Session) -> Result<(), StoreError>;

    /// # Errors
    /// Returns `StoreError::Backend` when the backend cannot be queried.
    fn get(&self, key: &TokenHash) -> Result<Option<Session>, StoreError>;

    /// # Errors
    /// Returns `StoreError::Backend` when the backend cannot be written.
    fn remove(&self, key: &TokenHash) -> Result<Option<Session>, StoreError>;

    /// Remove `key` only if its session is expired at `now`.
    ///
    /// # Errors
    /// Returns `StoreError::Backend` when the backend cannot be written.
    fn remove_if_expired(&self, key: &TokenHash, now: DateTime<Utc>) -> Result<bool, StoreError>;

    /// # Errors
    /// Returns `StoreError::Backend` when the backend cannot be written.
    fn remove_identity(&self, identity: &IdentityKey) -> Result<usize, StoreError>;

    /// # Errors
    /// Returns `StoreError::Backend` when the backend cannot be written.
    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;

    /// # Errors
    /// Returns `StoreError::Backend` when the backend cannot be queried.
    fn len(&self) -> Result<usize, StoreError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<TokenHash, Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn insert_if_vacant(&self, key: TokenHash, session: Session) -> Result<(), StoreError> {
        match self.sessions.write().entry(key) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                slot.insert(session);
                Ok(())
            }
        }
    }

    fn get(&self, key: &TokenHash) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.read().get(key).cloned())
    }

    fn remove(&self, key: &TokenHash) -> Result<Option<Session>, StoreError> {
        Ok(self.sessions.write().remove(key))
    }

    fn remove_if_expired(&self, key: &TokenHash, now: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut sessions = self.sessions.write();
        if sessions.get(key).is_some_and(|session| session.is_expired(now)) {
            sessions.remove(key);
            return Ok(true);
        }
        Ok(false)
    }

    fn remove_identity(&self, identity: &IdentityKey) -> Result<usize, StoreError> {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| &session.identity != identity);
        Ok(before - sessions.len())
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        Ok(before - sessions.len())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.sessions.read().len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::session::token::hash_session_token;
    use chrono::Duration;

    fn session(identity: &str, now: DateTime<Utc>, ttl: Option<i64>) -> Session {
        Session {
            id: Ulid::new(),
            identity: IdentityKey::parse(identity).unwrap(),
            issued_at: now,
            expires_at: ttl.map(|seconds| now + Duration::seconds(seconds)),
        }
    }

    #[test]
    fn session_expiry_boundary() {
        let now = Utc::now();
        let expiring = session("a@me.com", now, Some(1));
        assert!(!expiring.is_expired(now));
        assert!(expiring.is_expired(now + Duration::seconds(1)));

        let forever = session("a@me.com", now, None);
        assert!(!forever.is_expired(now + Duration::days(3650)));
    }

    #[test]
    fn insert_refuses_occupied_key() {
        let store = MemorySessionStore::new();
        let key = hash_session_token("token");
        let now = Utc::now();
        store.insert_if_vacant(key, session("a@me.com", now, None)).unwrap();
        assert_eq!(
            store.insert_if_vacant(key, session("b@me.com", now, None)),
            Err(StoreError::Conflict)
        );
        assert_eq!(
            store.get(&key).unwrap().map(|s| s.identity.to_string()),
            Some("a@me.com".to_string())
        );
    }

    #[test]
    fn remove_if_expired_leaves_live_sessions() {
        let store = MemorySessionStore::new();
        let key = hash_session_token("token");
        let now = Utc::now();
        store.insert_if_vacant(key, session("a@me.com", now, Some(10))).unwrap();

        assert!(!store.remove_if_expired(&key, now).unwrap());
        assert_eq!(store.len().unwrap(), 1);
        assert!(store
            .remove_if_expired(&key, now + Duration::seconds(10))
            .unwrap());
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn purge_and_remove_identity() {
        let store = MemorySessionStore::new();
        let now = Utc::now();
        store
            .insert_if_vacant(hash_session_token("1"), session("a@me.com", now, Some(1)))
            .unwrap();
        store
            .insert_if_vacant(hash_session_token("2"), session("a@me.com", now, None))
            .unwrap();
        store
            .insert_if_vacant(hash_session_token("3"), session("b@me.com", now, None))
            .unwrap();

        assert_eq!(store.purge_expired(now + Duration::seconds(5)).unwrap(), 1);
        let a = IdentityKey::parse("a@me.com").unwrap();
        assert_eq!(store.remove_identity(&a).unwrap(), 1);
        assert_eq!(store.len().unwrap(), 1);
        assert!(store.remove(&hash_session_token("3")).unwrap().is_some());
        assert!(store.remove(&hash_session_token("3")).unwrap().is_none());
    }
}
