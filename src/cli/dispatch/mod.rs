//! Map parsed CLI arguments to an action plus the shared configuration.

use crate::cli::{
    actions::Action,
    commands::{self, auth, logging},
    globals::GlobalArgs,
};
use anyhow::{anyhow, Context, Result};

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or no subcommand was given.
pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let config = auth::Options::parse(matches)?;
    let mut globals = GlobalArgs::new(config);
    globals.set_log_json(matches.get_flag(logging::ARG_LOG_JSON));

    let action = match matches.subcommand() {
        Some((commands::CMD_HASH, _)) => Action::Hash,
        Some((commands::CMD_VERIFY, sub_m)) => Action::Verify {
            digest: sub_m
                .get_one::<String>(commands::ARG_DIGEST)
                .cloned()
                .context("missing required argument: --digest")?,
        },
        Some((commands::CMD_POLICY, _)) => Action::Policy,
        Some((name, _)) => return Err(anyhow!("unknown subcommand: {name}")),
        None => return Err(anyhow!("missing subcommand")),
    };

    Ok((action, globals))
}
