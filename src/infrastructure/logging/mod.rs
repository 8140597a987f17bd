// Logging module - Logging infrastructure
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use std::io;

/// Pick the default filter from the CLI verbosity flags
pub fn default_filter(verbose: bool, quiet: bool, log_level: &str) -> String {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        log_level
    };
    format!("splist={},warn", level)
}

/// Initialize logging system; `RUST_LOG` overrides the default filter
pub fn init_logging(default: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true)
        )
        .try_init()?;

    tracing::debug!("splist logging system initialized");
    Ok(())
}
