//! Credential and session authentication core.
//!
//! Signup goes through [`Authenticator::register`], login through
//! [`Authenticator::verify`] followed by [`SessionManager::issue`]; later calls
//! present the token to [`AccessGuard::resolve`].

pub mod authenticator;
pub mod clock;
pub mod config;
pub mod error;
pub mod guard;
pub mod hasher;
pub mod identity;
pub mod session;
pub mod store;
pub mod sweeper;

pub use self::authenticator::Authenticator;
pub use self::clock::{Clock, ManualClock, SystemClock};
pub use self::config::AuthConfig;
pub use self::error::{Error, Result, StoreError, ValidationError};
pub use self::guard::{Access, AccessGuard};
pub use self::hasher::{Hasher, HasherConfig, PasswordDigest};
pub use self::identity::IdentityKey;
pub use self::session::{
    store::{MemorySessionStore, Session, SessionStore},
    Rejection, SessionManager,
};
pub use self::store::{Credential, CredentialStore, MemoryCredentialStore};
