use crate::auth::AuthConfig;
use crate::cli::globals::GlobalArgs;
use anyhow::{Context, Result};

/// Handle the policy action
pub fn handle(globals: &GlobalArgs) -> Result<()> {
    println!("{}", render(&globals.config)?);
    Ok(())
}

/// Pretty JSON view of the effective configuration.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn render(config: &AuthConfig) -> Result<String> {
    serde_json::to_string_pretty(config).context("failed to serialize configuration")
}
