use crate::cli::args::Args;
use crate::cli::output::{ConsoleWriter, OutputWriter, RunSummary};
use crate::core::Lister;
use crate::domain::config::{Credentials, ListerConfig};
use crate::domain::error::{ListerError, ListerResult};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::http::ReqwestTransport;
use crate::infrastructure::logging::{default_filter, init_logging};
use std::sync::Arc;
use tracing::{debug, warn};

/// Execute a listing run from parsed arguments
pub async fn execute_command(args: Args) -> ListerResult<()> {
    let manager = ConfigManager::new(args.config.clone());
    let settings = manager.load_settings()?;

    if let Err(e) = init_logging(&default_filter(args.verbose, args.quiet, &settings.log_level)) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }
    if let Some(path) = manager.get_project_config_path() {
        debug!("Project settings file: {}", path.display());
    }

    let config = build_config(&args, Credentials::from_env()?);
    // Fail on bad input before any client is built.
    config.validate()?;

    let transport = ReqwestTransport::new().map_err(|e| ListerError::config(e.to_string()))?;
    let lister = Lister::new(Arc::new(transport), settings);
    let document = lister.run(&config).await?;

    if !args.quiet {
        let summary = RunSummary::new(&config.library_name, &config.output, &document);
        report_summary(&mut ConsoleWriter::stdout(args.format), &summary);
    }

    Ok(())
}

/// Print the console summary. The output file is already complete at this
/// point, so a failed write is only logged.
pub fn report_summary(writer: &mut dyn OutputWriter, summary: &RunSummary<'_>) {
    if let Err(e) = writer.write_summary(summary) {
        warn!("Failed to print summary: {}", e);
    }
}

/// Combine CLI flags with environment credentials
pub fn build_config(args: &Args, credentials: Credentials) -> ListerConfig {
    ListerConfig::new(args.site_url.clone(), credentials)
        .with_library_name(args.library_name.clone())
        .with_output(args.output.clone())
        .with_recursive(args.recursive)
        .with_pretty(!args.compact)
}
