use crate::auth::{AuthConfig, Hasher, PasswordDigest};
use crate::cli::{actions::read_password, globals::GlobalArgs};
use anyhow::Result;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

/// Handle the hash action
pub async fn handle(globals: &GlobalArgs) -> Result<()> {
    let password = read_password(std::io::stdin().lock())?;

    let digest = hash_password(globals.config.clone(), password).await?;

    println!("{digest}");

    Ok(())
}

/// Hash off the async runtime; Argon2 is deliberately slow.
///
/// # Errors
/// Returns an error if the password breaks the length policy or hashing fails.
#[instrument(skip_all)]
pub async fn hash_password(config: AuthConfig, password: SecretString) -> Result<PasswordDigest> {
    config.check_password_length(password.expose_secret())?;

    let digest = tokio::task::spawn_blocking(move || -> Result<PasswordDigest> {
        let hasher = Hasher::new(*config.hasher())?;
        Ok(hasher.hash(password.expose_secret().as_bytes())?)
    })
    .await??;

    debug!("digest: {:?}", digest);

    Ok(digest)
}
