//! Logging and tracing initialization.
//!
//! Logs go to stderr so the CLI can keep stdout for progress lines and
//! carousel output.

use crate::config::LoggingConfig;

/// Filter directive used when `RUST_LOG` is unset.
///
/// `--verbose` raises CareLab's own crates to `debug` while keeping the
/// configured level for everything else.
pub fn filter_directive(config: &LoggingConfig, verbose: bool) -> String {
    if verbose {
        format!("{},carelab=debug", config.level)
    } else {
        config.level.clone()
    }
}

/// Initialize the tracing subscriber with the given configuration.
pub fn init_logging(config: &LoggingConfig, verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config, verbose)));

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(verbose)
            .without_time()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
}
