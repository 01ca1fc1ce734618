//! # mzTab - A Streaming Validator for the mzTab Exchange Format
//!
//! `mztab` reads mzTab 1.0 files, the tab-separated format used to report
//! proteomics and metabolomics identification and quantification results,
//! and checks them line by line against the format's rules.
//!
//! ## Key Features
//!
//! - **Streaming**: Files are read one line at a time; memory use grows with the
//!   number of records kept, not with line length or file structure.
//!
//! - **Recoverable and fatal errors**: Bad cell values and malformed metadata are
//!   collected and validation continues; a line that breaks the section
//!   structure stops validation immediately.
//!
//! - **Bounded error list**: Errors below a minimum severity are dropped and the
//!   list refuses to grow past its capacity, so a badly broken file cannot
//!   exhaust memory.
//!
//! - **Typed model**: A valid file is assembled into [`file::MzTabFile`] with
//!   typed metadata, column schemas and records.
//!
//! - **Batch mode**: Many files are validated on a worker pool with one shared
//!   report stream.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mztab::prelude::*;
//!
//! let parser = MzTabParser::new(ValidatorConfig::default());
//! let outcome = parser.parse_file("results.mzTab", &NoProgress)?;
//!
//! match &outcome {
//!     ParseOutcome::Valid(file) => {
//!         println!("{} PSMs", file.psms().map_or(0, |t| t.len()));
//!     }
//!     _ => {
//!         let report = ValidationReport::from_outcome("results.mzTab", &outcome);
//!         println!("{}", report);
//!     }
//! }
//! # Ok::<(), mztab::parser::ReadError>(())
//! ```
//!
//! ## Section Order
//!
//! Every line starts with a prefix naming its section. Sections must appear in
//! this order; comments may appear anywhere:
//!
//! | Prefix | Section | Level |
//! |--------|---------|-------|
//! | COM | Comment | - |
//! | MTD | Metadata | 1 |
//! | PRH / PRT | Protein header / data | 2 / 3 |
//! | PEH / PEP | Peptide header / data | 4 / 5 |
//! | PSH / PSM | PSM header / data | 6 / 7 |
//! | SMH / SML | Small molecule header / data | 8 / 9 |
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`parser`]: Streaming orchestrator, progress reporting and cancellation
//! - [`section`]: Line prefixes and the section order state machine
//! - [`metadata`]: The metadata model and `MTD` line parser
//! - [`schema`]: Column schemas built from table header lines
//! - [`values`]: Cell value grammars
//! - [`error`]: The error catalog and bounded error list
//! - [`report`]: Text and JSON validation reports
//! - [`batch`]: Validation of many files on a worker pool

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
// Allow some patterns common in scientific code
#![allow(clippy::too_many_arguments)]

pub mod batch;
pub mod config;
pub mod cross_check;
pub mod error;
pub mod file;
pub mod metadata;
pub mod param;
pub mod parser;
pub mod report;
pub mod schema;
pub mod section;
pub mod values;

pub use cross_check::CrossCheck;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::batch::{BatchConfig, BatchSummary, BatchValidator, ReportFormat};
    pub use crate::config::ValidatorConfig;
    pub use crate::cross_check::CrossCheck;
    pub use crate::error::{ErrorList, Level, MzTabError};
    pub use crate::file::{MzTabFile, Record, Table};
    pub use crate::metadata::Metadata;
    pub use crate::param::Param;
    pub use crate::parser::{
        Abort, MzTabParser, NoProgress, ParseOutcome, Progress, ProgressCallback, ReadError,
    };
    pub use crate::report::{ReportStatus, ValidationReport};
    pub use crate::schema::ColumnSchema;
    pub use crate::section::{Section, TableKind};
    pub use crate::values::CellValue;
}
