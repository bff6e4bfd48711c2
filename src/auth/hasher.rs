//! Argon2id password hashing.
//!
//! Digests are PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`), so the
//! salt and cost parameters travel with the digest and `verify` never needs the
//! hasher's current configuration to check an older hash.

use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::OnceLock};
use tracing::{instrument, warn};

use super::error::{Error, Result};

/// Tunable Argon2id cost parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HasherConfig {
    cost: u32,
    memory_kib: u32,
    parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            cost: Params::DEFAULT_T_COST,
            memory_kib: Params::DEFAULT_M_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HasherConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Iteration count; higher is slower for attackers and for us.
    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_memory_kib(mut self, memory_kib: u32) -> Self {
        self.memory_kib = memory_kib;
        self
    }

    #[must_use]
    pub fn with_parallelism(mut self, parallelism: u32) -> Self {
        self.parallelism = parallelism;
        self
    }

    #[must_use]
    pub fn cost(&self) -> u32 {
        self.cost
    }

    #[must_use]
    pub fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    #[must_use]
    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    fn params(&self) -> Result<Params> {
        Params::new(self.memory_kib, self.cost, self.parallelism, None)
            .map_err(|err| Error::Config(err.to_string()))
    }
}

/// A stored password hash in PHC string format. Never contains the plaintext.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a digest loaded from storage. The string is not validated here;
    /// `Hasher::verify` fails closed on malformed input.
    #[must_use]
    pub fn from_stored(phc: String) -> Self {
        Self(phc)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The PHC prefix is enough to debug parameter drift.
        let prefix = self.0.rsplitn(3, '$').last().unwrap_or_default();
        write!(f, "PasswordDigest({prefix}$..)")
    }
}

impl fmt::Display for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone)]
pub struct Hasher {
    config: HasherConfig,
    argon2: Argon2<'static>,
    dummy: OnceLock<PasswordDigest>,
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hasher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Hasher {
    /// Build a hasher for the given parameters.
    ///
    /// # Errors
    /// Returns `Error::Config` when Argon2 rejects the parameter combination.
    pub fn new(config: HasherConfig) -> Result<Self> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, config.params()?);

        Ok(Self {
            config,
            argon2,
            dummy: OnceLock::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &HasherConfig {
        &self.config
    }

    /// Hash a plaintext with a fresh random salt.
    ///
    /// # Errors
    /// Returns `Error::Encoding` for an empty plaintext or if Argon2 fails.
    #[instrument(skip_all, fields(cost = self.config.cost))]
    pub fn hash(&self, plaintext: &[u8]) -> Result<PasswordDigest> {
        if plaintext.is_empty() {
            return Err(Error::Encoding);
        }
        hash_with(&self.argon2, plaintext)
    }

    /// Check a plaintext against a stored digest in constant time.
    ///
    /// Malformed digests are logged and treated as a mismatch.
    #[instrument(skip_all)]
    pub fn verify(&self, plaintext: &[u8], digest: &PasswordDigest) -> bool {
        let parsed = match PasswordHash::new(digest.as_str()) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("Malformed password digest: {err}");
                return false;
            }
        };
        self.argon2.verify_password(plaintext, &parsed).is_ok()
    }

    /// Burn the same amount of work as a real `verify`, always failing.
    pub fn verify_dummy(&self, plaintext: &[u8]) -> bool {
        // An empty input still has to cost a full hash.
        let input: &[u8] = if plaintext.is_empty() { b"\0" } else { plaintext };
        let Some(dummy) = self.dummy_digest() else {
            return false;
        };
        PasswordHash::new(dummy.as_str())
            .map(|parsed| self.argon2.verify_password(input, &parsed).is_ok())
            .unwrap_or(false)
    }

    /// Compute the dummy digest now instead of on the first `verify_dummy`.
    ///
    /// Long-lived callers do this up front so the first unknown-identity
    /// login costs the same as every later one.
    pub fn prepare_dummy(&self) {
        self.dummy_digest();
    }

    fn dummy_digest(&self) -> Option<&PasswordDigest> {
        if let Some(dummy) = self.dummy.get() {
            return Some(dummy);
        }

        // Random, never-disclosed input so the dummy digest matches nothing.
        let mut filler = [0u8; 32];
        OsRng.fill_bytes(&mut filler);
        match hash_with(&self.argon2, &filler) {
            Ok(digest) => Some(self.dummy.get_or_init(|| digest)),
            Err(err) => {
                warn!("Failed to compute dummy digest: {err}");
                None
            }
        }
    }

    /// True when `digest` was produced with a different algorithm or cost than
    /// this hasher would use now, or cannot be parsed at all.
    #[must_use]
    pub fn needs_rehash(&self, digest: &PasswordDigest) -> bool {
        let Ok(parsed) = PasswordHash::new(digest.as_str()) else {
            return true;
        };
        if parsed.algorithm != Algorithm::Argon2id.ident()
            || parsed.version != Some(Version::V0x13.into())
        {
            return true;
        }
        match Params::try_from(&parsed) {
            Ok(params) => {
                params.t_cost() != self.config.cost
                    || params.m_cost() != self.config.memory_kib
                    || params.p_cost() != self.config.parallelism
            }
            Err(_) => true,
        }
    }
}

fn hash_with(argon2: &Argon2<'static>, plaintext: &[u8]) -> Result<PasswordDigest> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(plaintext, &salt)
        .map_err(|_| Error::Encoding)?
        .to_string();
    Ok(PasswordDigest(hash))
}
