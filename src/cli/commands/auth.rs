use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::auth::{config::MAX_SESSION_TTL_SECONDS, AuthConfig, HasherConfig};

pub const ARG_HASH_COST: &str = "hash-cost";
pub const ARG_HASH_MEMORY_KIB: &str = "hash-memory-kib";
pub const ARG_HASH_PARALLELISM: &str = "hash-parallelism";
pub const ARG_MIN_PASSWORD_LENGTH: &str = "min-password-length";
pub const ARG_MAX_PASSWORD_LENGTH: &str = "max-password-length";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_USERNAMES: &str = "usernames";

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_hasher_args(command);
    with_policy_args(command)
}

fn with_hasher_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_HASH_COST)
                .long(ARG_HASH_COST)
                .help("Argon2id iteration count")
                .env("PASSGATE_HASH_COST")
                .default_value("2")
                .global(true)
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_HASH_MEMORY_KIB)
                .long(ARG_HASH_MEMORY_KIB)
                .help("Argon2id memory cost in KiB")
                .env("PASSGATE_HASH_MEMORY_KIB")
                .default_value("19456")
                .global(true)
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_HASH_PARALLELISM)
                .long(ARG_HASH_PARALLELISM)
                .help("Argon2id lanes")
                .env("PASSGATE_HASH_PARALLELISM")
                .default_value("1")
                .global(true)
                .value_parser(clap::value_parser!(u32)),
        )
}

fn with_policy_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_MIN_PASSWORD_LENGTH)
                .long(ARG_MIN_PASSWORD_LENGTH)
                .help("Minimum password length in characters")
                .env("PASSGATE_MIN_PASSWORD_LENGTH")
                .default_value("6")
                .global(true)
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new(ARG_MAX_PASSWORD_LENGTH)
                .long(ARG_MAX_PASSWORD_LENGTH)
                .help("Maximum password length in characters")
                .env("PASSGATE_MAX_PASSWORD_LENGTH")
                .default_value("1024")
                .global(true)
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Session lifetime in seconds, 0 disables expiry")
                .env("PASSGATE_SESSION_TTL_SECONDS")
                .default_value("43200")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(0..=MAX_SESSION_TTL_SECONDS)),
        )
        .arg(
            Arg::new(ARG_USERNAMES)
                .long(ARG_USERNAMES)
                .help("Accept plain usernames instead of requiring email identities")
                .env("PASSGATE_USERNAMES")
                .global(true)
                .action(ArgAction::SetTrue),
        )
}

pub struct Options;

impl Options {
    /// Build the auth configuration from parsed arguments.
    ///
    /// # Errors
    /// Returns an error if a defaulted argument is somehow missing.
    pub fn parse(matches: &ArgMatches) -> Result<AuthConfig> {
        let get_u32 = |id: &str| -> Result<u32> {
            matches
                .get_one::<u32>(id)
                .copied()
                .with_context(|| format!("missing required argument: --{id}"))
        };
        let get_usize = |id: &str| -> Result<usize> {
            matches
                .get_one::<usize>(id)
                .copied()
                .with_context(|| format!("missing required argument: --{id}"))
        };

        let hasher = HasherConfig::new()
            .with_cost(get_u32(ARG_HASH_COST)?)
            .with_memory_kib(get_u32(ARG_HASH_MEMORY_KIB)?)
            .with_parallelism(get_u32(ARG_HASH_PARALLELISM)?);

        let session_ttl_seconds = matches
            .get_one::<u64>(ARG_SESSION_TTL_SECONDS)
            .copied()
            .context("missing required argument: --session-ttl-seconds")?;

        Ok(AuthConfig::new()
            .with_hasher(hasher)
            .with_min_password_length(get_usize(ARG_MIN_PASSWORD_LENGTH)?)
            .with_max_password_length(get_usize(ARG_MAX_PASSWORD_LENGTH)?)
            .with_session_ttl_seconds(session_ttl_seconds)
            .with_email_identities(!matches.get_flag(ARG_USERNAMES)))
    }
}
