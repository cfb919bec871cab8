//! Tracing subscriber setup

use crate::args::Cli;
use tablon_core::config::{load_from_file, LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// Logs go to stderr so previews and predicates on stdout stay readable.
pub fn init(cli: &Cli) {
    let config = load_from_file(&cli.config_file)
        .map(|c| c.logging)
        .unwrap_or_else(|_| LoggingConfig::default());
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.level
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}
