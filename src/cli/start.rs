use crate::cli::{
    actions::Action,
    commands::{self, logging},
    dispatch::handler,
    globals::GlobalArgs,
};
use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Map verbosity count to tracing level
const fn get_verbosity_level(verbosity: u8) -> tracing::Level {
    match verbosity {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::WARN,
        2 => tracing::Level::INFO,
        3 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Start the CLI
///
/// # Errors
///
/// Returns an error if logging cannot be initialized or dispatch fails
pub fn start() -> Result<(Action, GlobalArgs)> {
    let matches = commands::new().get_matches();

    let verbosity_level = get_verbosity_level(
        matches
            .get_one::<u8>(logging::ARG_VERBOSITY)
            .copied()
            .unwrap_or(0),
    );

    let (action, globals) = handler(&matches)?;

    init_logging(verbosity_level, globals.log_json)?;

    Ok((action, globals))
}

/// Install the global subscriber. Logs go to stderr; stdout carries results.
fn init_logging(level: tracing::Level, json: bool) -> Result<()> {
    // RUST_LOG=
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false);

    if json {
        let subscriber = Registry::default()
            .with(fmt_layer.json())
            .with(env_filter);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(fmt_layer).with(env_filter);
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}
