//! # passgate (credential & session authentication)
//!
//! `passgate` is the authentication core a web or CLI front end sits on:
//! Argon2id password hashing, signup/login checks over a pluggable credential
//! store, and opaque session tokens with optional expiry.
//!
//! ## Passwords
//!
//! Plaintext passwords arrive as `secrecy::SecretString` and are only exposed
//! for the duration of a hash or verify call. Stored credentials carry a PHC
//! digest with the salt and cost embedded, so cost can be raised later and old
//! hashes are upgraded on the next successful login.
//!
//! ## Sessions
//!
//! Tokens are 256 random bits, URL-safe base64. The session table is keyed by
//! the SHA-256 of the token; raw tokens are returned to the caller once and
//! never stored or logged. Every failed lookup looks the same to the caller.

pub mod auth;
pub mod cli;

pub use auth::{
    Access, AccessGuard, AuthConfig, Authenticator, Credential, CredentialStore, Error, Hasher,
    HasherConfig, IdentityKey, MemoryCredentialStore, MemorySessionStore, PasswordDigest,
    SessionManager, SessionStore,
};

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
