use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::sync::Mutex;

use mztab::batch::{BatchConfig, BatchValidator, ReportFormat};
use mztab::config::ValidatorConfig;
use mztab::error::Level;
use mztab::parser::{MzTabParser, NoProgress};

use super::config::Config;

/// Validate mzTab files
pub fn run(
    files: Vec<PathBuf>,
    level: Option<Level>,
    max_errors: Option<usize>,
    threads: Option<usize>,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    // Load config file if provided
    let file_config = match config_path {
        Some(ref path) => {
            info!("Loading config from: {}", path.display());
            Config::from_file(path)?
        }
        None => Config::default(),
    };

    // CLI flags override config file, config file overrides defaults
    let mut validator_config = file_config.apply(ValidatorConfig::default());
    if let Some(level) = level {
        validator_config.level = level;
    }
    if let Some(max_errors) = max_errors {
        validator_config.max_errors = max_errors;
    }

    let mut batch_config = BatchConfig::default();
    if let Some(threads) = threads.or(file_config.batch.threads) {
        batch_config.threads = threads;
    }
    batch_config.format = if json {
        ReportFormat::Json
    } else if cfg!(feature = "colorized_output") {
        ReportFormat::Colored
    } else {
        ReportFormat::Plain
    };

    info!("mzTab Validator");
    info!("===============");
    info!("Files: {}", files.len());
    info!("Minimum level: {}", validator_config.level);
    info!("Max errors: {}", validator_config.max_errors);

    let validator = BatchValidator::new(MzTabParser::new(validator_config), batch_config);
    let output = Mutex::new(std::io::stdout());
    let summary = validator
        .validate(&files, &output, &NoProgress)
        .context("Batch validation failed")?;

    info!(
        "{} of {} files valid ({:.2}s)",
        summary.valid_count(),
        summary.reports.len(),
        summary.elapsed_seconds
    );

    // Exit with error code if validation failed
    if summary.failed_count() > 0 {
        std::process::exit(1);
    }

    Ok(())
}
