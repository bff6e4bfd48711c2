use crate::auth::{AuthConfig, Hasher, PasswordDigest};
use crate::cli::{actions::read_password, globals::GlobalArgs};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use tracing::{instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub valid: bool,
    pub needs_rehash: bool,
}

/// Handle the verify action. Returns whether the password matched.
pub async fn handle(globals: &GlobalArgs, digest: String) -> Result<bool> {
    let password = read_password(std::io::stdin().lock())?;

    let outcome = check_password(globals.config.clone(), password, digest).await?;

    if outcome.valid {
        println!("valid");
        if outcome.needs_rehash {
            warn!("Digest parameters differ from the configured ones; rehash recommended");
        }
    } else {
        println!("invalid");
    }

    Ok(outcome.valid)
}

/// Verify off the async runtime.
///
/// # Errors
/// Returns an error if the configured hasher parameters are invalid.
#[instrument(skip_all)]
pub async fn check_password(
    config: AuthConfig,
    password: SecretString,
    digest: String,
) -> Result<Outcome> {
    tokio::task::spawn_blocking(move || -> Result<Outcome> {
        let hasher = Hasher::new(*config.hasher())?;
        let digest = PasswordDigest::from_stored(digest);
        Ok(Outcome {
            valid: hasher.verify(password.expose_secret().as_bytes(), &digest),
            needs_rehash: hasher.needs_rehash(&digest),
        })
    })
    .await?
}
