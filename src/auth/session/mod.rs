//! Session issuance, validation and revocation.
//!
//! Flow Overview:
//! - `issue` mints a random token, stores its SHA-256 with the identity and an
//!   optional expiry, and hands the raw token back exactly once.
//! - `validate` hashes the presented token and checks expiry at read time, so a
//!   concurrent `sweep` can only ever remove entries `validate` would reject.
//! - `revoke` / `revoke_all` delete entries; revoking twice is a no-op.
//!
//! Callers only ever see `Error::Invalid`; the precise rejection reason is
//! logged at debug level.

pub mod store;
pub mod token;

use chrono::Duration;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use ulid::Ulid;

use self::{
    store::{MemorySessionStore, Session, SessionStore},
    token::{generate_session_token, hash_session_token, well_formed},
};
use super::{
    clock::{Clock, SystemClock},
    config::AuthConfig,
    error::{Error, Result, StoreError},
    identity::IdentityKey,
};

const ISSUE_ATTEMPTS: usize = 3;

/// Why a token was refused. Internal only; callers get `Error::Invalid`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("malformed token")]
    Malformed,
    #[error("unknown token")]
    Unknown,
    #[error("session expired")]
    Expired,
    #[error("session store unavailable")]
    Backend,
}

pub struct SessionManager {
    ttl: Option<Duration>,
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
}

impl SessionManager {
    pub fn new(ttl: Option<Duration>, store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { ttl, store, clock }
    }

    /// Process-local sessions using the TTL from `config`.
    ///
    /// # Errors
    /// `Error::Config` when the configured TTL is out of range.
    pub fn in_memory(config: &AuthConfig) -> Result<Self> {
        Ok(Self::new(
            config.session_ttl()?,
            Arc::new(MemorySessionStore::new()),
            Arc::new(SystemClock),
        ))
    }

    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Start a session for an authenticated identity and return its token.
    ///
    /// # Errors
    /// `Error::Token` when no unique token could be generated, `Error::Config`
    /// when the expiry does not fit the calendar, `Error::Store` on backend
    /// faults.
    #[instrument(skip_all, fields(identity = %identity))]
    pub fn issue(&self, identity: &IdentityKey) -> Result<String> {
        for _ in 0..ISSUE_ATTEMPTS {
            let token = generate_session_token()?;
            let issued_at = self.clock.now();
            let expires_at = match self.ttl {
                Some(ttl) => Some(issued_at.checked_add_signed(ttl).ok_or_else(|| {
                    Error::Config(format!("session expiry overflows with ttl {ttl}"))
                })?),
                None => None,
            };
            let session = Session {
                id: Ulid::new(),
                identity: identity.clone(),
                issued_at,
                expires_at,
            };
            let session_id = session.id;

            match self
                .store
                .insert_if_vacant(hash_session_token(&token), session)
            {
                Ok(()) => {
                    info!(%session_id, "Issued session");
                    return Ok(token);
                }
                Err(StoreError::Conflict) => {
                    warn!("Session token collision, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(Error::Token)
    }

    /// Resolve a token to its identity.
    ///
    /// # Errors
    /// `Error::Invalid` for malformed, unknown, expired or unreadable sessions.
    pub fn validate(&self, token: &str) -> Result<IdentityKey> {
        self.lookup(token)
            .map(|session| session.identity)
            .map_err(|rejection| {
                debug!(reason = %rejection, "Session rejected");
                Error::Invalid
            })
    }

    /// Full session record for a token, with the precise rejection reason.
    ///
    /// # Errors
    /// Returns the `Rejection` describing why the token is not usable.
    pub fn lookup(&self, token: &str) -> Result<Session, Rejection> {
        if !well_formed(token) {
            return Err(Rejection::Malformed);
        }

        let key = hash_session_token(token);
        let session = match self.store.get(&key) {
            Ok(Some(session)) => session,
            Ok(None) => return Err(Rejection::Unknown),
            Err(err) => {
                error!("Failed to lookup session: {err}");
                return Err(Rejection::Backend);
            }
        };

        let now = self.clock.now();
        if session.is_expired(now) {
            if let Err(err) = self.store.remove_if_expired(&key, now) {
                error!(session_id = %session.id, "Failed to drop expired session: {err}");
            }
            return Err(Rejection::Expired);
        }

        Ok(session)
    }

    /// End a session. Unknown or already revoked tokens are ignored.
    pub fn revoke(&self, token: &str) {
        if !well_formed(token) {
            return;
        }
        match self.store.remove(&hash_session_token(token)) {
            Ok(Some(session)) => info!(session_id = %session.id, "Revoked session"),
            Ok(None) => {}
            Err(err) => error!("Failed to delete session: {err}"),
        }
    }

    /// End every session belonging to `identity` and return how many ended.
    ///
    /// # Errors
    /// `Error::Store` on backend faults.
    #[instrument(skip_all, fields(identity = %identity))]
    pub fn revoke_all(&self, identity: &IdentityKey) -> Result<usize> {
        let revoked = self.store.remove_identity(identity)?;
        info!(revoked, "Revoked all sessions");
        Ok(revoked)
    }

    /// Drop every expired session and return how many were removed.
    ///
    /// # Errors
    /// `Error::Store` on backend faults.
    pub fn sweep(&self) -> Result<usize> {
        let purged = self.store.purge_expired(self.clock.now())?;
        if purged > 0 {
            debug!(purged, "Swept expired sessions");
        }
        Ok(purged)
    }

    /// Number of stored sessions, expired-but-unswept ones included.
    ///
    /// # Errors
    /// `Error::Store` on backend faults.
    pub fn session_count(&self) -> Result<usize> {
        Ok(self.store.len()?)
    }
}
