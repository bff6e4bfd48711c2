//! Session token generation and at-rest hashing.

use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::auth::error::{Error, Result};

/// Random bytes per token (256 bits of entropy).
pub const TOKEN_BYTES: usize = 32;

/// Length of the URL-safe, unpadded base64 encoding of `TOKEN_BYTES`.
pub const TOKEN_LEN: usize = 43;

/// SHA-256 of a raw session token. Stores are keyed by this, never the token.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenHash([u8; 32]);

impl TokenHash {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for TokenHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, ..] = self.0;
        write!(f, "TokenHash({a:02x}{b:02x}{c:02x}{d:02x}..)")
    }
}

/// Create a new session token.
/// The raw value is only returned to the caller; stores keep a hash.
///
/// # Errors
/// Returns `Error::Token` if the OS random source fails.
pub fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.try_fill_bytes(&mut bytes).map_err(|_| Error::Token)?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

/// Hash a session token so raw values never reach the session store.
#[must_use]
pub fn hash_session_token(token: &str) -> TokenHash {
    TokenHash(Sha256::digest(token.as_bytes()).into())
}

/// Cheap shape check so garbage never reaches the store.
#[must_use]
pub fn well_formed(token: &str) -> bool {
    token.len() == TOKEN_LEN
        && Base64UrlUnpadded::decode_vec(token).is_ok_and(|bytes| bytes.len() == TOKEN_BYTES)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_tokens_are_well_formed() {
        let token = generate_session_token().unwrap();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(well_formed(&token));
        assert_eq!(
            Base64UrlUnpadded::decode_vec(&token).unwrap().len(),
            TOKEN_BYTES
        );
    }

    #[test]
    fn generated_tokens_do_not_repeat() {
        let tokens: HashSet<String> = (0..1000)
            .map(|_| generate_session_token().unwrap())
            .collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn well_formed_rejects_garbage() {
        assert!(!well_formed(""));
        assert!(!well_formed("not-a-token"));
        assert!(!well_formed(&"!".repeat(TOKEN_LEN)));
        assert!(!well_formed(&"A".repeat(TOKEN_LEN + 1)));
    }

    #[test]
    fn hash_session_token_stable() {
        let first = hash_session_token("token");
        let second = hash_session_token("token");
        let different = hash_session_token("other");
        assert_eq!(first, second);
        assert_ne!(first, different);
        assert!(!format!("{first:?}").contains("token"));
    }
}
