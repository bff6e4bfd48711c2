pub mod auth;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const CMD_HASH: &str = "hash";
pub const CMD_VERIFY: &str = "verify";
pub const CMD_POLICY: &str = "policy";
pub const ARG_DIGEST: &str = "digest";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("passgate")
        .about("Credential and session authentication")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(CMD_HASH)
                .about("Hash a password read from stdin and print the PHC digest"),
        )
        .subcommand(
            Command::new(CMD_VERIFY)
                .about("Check a password read from stdin against a stored digest")
                .arg(
                    Arg::new(ARG_DIGEST)
                        .short('d')
                        .long(ARG_DIGEST)
                        .help("Stored PHC digest, e.g. $argon2id$v=19$...")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_POLICY).about("Print the effective configuration as JSON"),
        );

    let command = auth::with_args(command);
    logging::with_args(command)
}
