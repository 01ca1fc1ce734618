use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use mztab::error::Level;

mod config;
mod inspect;
mod validate;

/// mzTab Validator - Streaming validation of mzTab 1.0 files
#[derive(Parser)]
#[command(name = "mztab-validate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Minimum severity of the reported errors.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LevelArg {
    /// Report everything
    Info,
    /// Report warnings and errors
    Warn,
    /// Report errors only
    Error,
}

impl From<LevelArg> for Level {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Info => Level::Info,
            LevelArg::Warn => Level::Warn,
            LevelArg::Error => Level::Error,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate mzTab files
    Validate {
        /// Input mzTab files (.mzTab or .mzTab.gz)
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Minimum severity to report (default: info)
        #[arg(short, long, value_enum)]
        level: Option<LevelArg>,

        /// Stop validating a file after this many errors (default: 10000)
        #[arg(short = 'm', long)]
        max_errors: Option<usize>,

        /// Number of files validated in parallel (default: available cores)
        #[arg(short = 't', long)]
        threads: Option<usize>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display the metadata and tables of a valid mzTab file
    Inspect {
        /// Input mzTab file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Validate {
            files,
            level,
            max_errors,
            threads,
            config,
            json,
        } => validate::run(
            files,
            level.map(Level::from),
            max_errors,
            threads,
            config,
            json,
        ),
        Commands::Inspect { file } => inspect::run(file),
    }
}
