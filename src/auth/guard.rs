//! Single choke point for "who is making this call".

use std::sync::Arc;

use super::{
    error::{Error, Result},
    identity::IdentityKey,
    session::SessionManager,
};

/// Outcome of resolving a presented token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Identified(IdentityKey),
    Anonymous,
}

impl Access {
    #[must_use]
    pub fn identity(&self) -> Option<&IdentityKey> {
        match self {
            Self::Identified(identity) => Some(identity),
            Self::Anonymous => None,
        }
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

#[derive(Clone)]
pub struct AccessGuard {
    sessions: Arc<SessionManager>,
}

impl AccessGuard {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }

    /// Missing and invalid tokens both resolve to `Access::Anonymous`.
    pub fn resolve(&self, token: Option<&str>) -> Access {
        token
            .and_then(|token| self.sessions.validate(token).ok())
            .map_or(Access::Anonymous, Access::Identified)
    }

    /// Resolve a token into an identity, or fail for anonymous callers.
    ///
    /// # Errors
    /// Returns `Error::Invalid` when there is no valid session.
    pub fn require(&self, token: Option<&str>) -> Result<IdentityKey> {
        match self.resolve(token) {
            Access::Identified(identity) => Ok(identity),
            Access::Anonymous => Err(Error::Invalid),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::config::AuthConfig;

    #[test]
    fn resolve_known_and_unknown_tokens() {
        let sessions = Arc::new(SessionManager::in_memory(&AuthConfig::new()).unwrap());
        let guard = AccessGuard::new(sessions.clone());
        let shmee = IdentityKey::parse("shmee@me.com").unwrap();
        let token = sessions.issue(&shmee).unwrap();

        let access = guard.resolve(Some(&token));
        assert_eq!(access.identity(), Some(&shmee));
        assert!(guard.resolve(None).is_anonymous());
        assert!(guard.resolve(Some("bogus")).is_anonymous());
    }

    #[test]
    fn require_fails_for_anonymous() {
        let sessions = Arc::new(SessionManager::in_memory(&AuthConfig::new()).unwrap());
        let guard = AccessGuard::new(sessions.clone());
        assert!(matches!(guard.require(None), Err(Error::Invalid)));

        let shmee = IdentityKey::parse("shmee@me.com").unwrap();
        let token = sessions.issue(&shmee).unwrap();
        assert_eq!(guard.require(Some(&token)).unwrap(), shmee);

        sessions.revoke(&token);
        assert!(matches!(guard.require(Some(&token)), Err(Error::Invalid)));
    }
}
