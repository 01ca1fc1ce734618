//! # mzTab Validator
//!
//! A command-line tool for validating mzTab 1.0 files.
//!
//! ## Usage
//!
//! ```bash
//! # Validate one or more files (gzip-compressed files are accepted)
//! mztab-validate validate results.mzTab more/*.mzTab.gz
//!
//! # Only report errors, stop after 100 of them, write JSON
//! mztab-validate validate --level error --max-errors 100 --json results.mzTab
//!
//! # Summarise the metadata and tables of a valid file
//! mztab-validate inspect results.mzTab
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity
    cli::init_logging(cli.verbosity());

    cli::dispatch(cli)
}
