//! Human and machine readable validation reports.

use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;
use serde::Serialize;

use crate::error::{Level, MzTabError, NO_ERRORS_SENTINEL};
use crate::parser::{ParseOutcome, ReadError};

/// Overall result of validating one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum ReportStatus {
    /// The file is valid
    Valid,
    /// The file was read completely and errors were found
    Invalid,
    /// Validation stopped early
    Aborted(String),
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Valid => write!(f, "VALID"),
            ReportStatus::Invalid => write!(f, "INVALID"),
            ReportStatus::Aborted(reason) => write!(f, "ABORTED: {}", reason),
        }
    }
}

/// Validation report for a single mzTab file
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Path of the file that was validated
    pub file_path: String,
    /// Overall result
    pub status: ReportStatus,
    /// Retained errors in file order
    pub errors: Vec<MzTabError>,
}

impl ValidationReport {
    /// Summarise a parse outcome
    pub fn from_outcome(file_path: impl Into<String>, outcome: &ParseOutcome) -> Self {
        let status = match outcome {
            ParseOutcome::Valid(_) => ReportStatus::Valid,
            ParseOutcome::Invalid { .. } => ReportStatus::Invalid,
            ParseOutcome::Aborted { reason, .. } => ReportStatus::Aborted(reason.to_string()),
        };
        Self {
            file_path: file_path.into(),
            status,
            errors: outcome
                .errors()
                .map(|errors| errors.iter().cloned().collect())
                .unwrap_or_default(),
        }
    }

    /// Report for a file that could not be read at all
    pub fn from_read_error(file_path: impl Into<String>, error: &ReadError) -> Self {
        Self {
            file_path: file_path.into(),
            status: ReportStatus::Aborted(error.to_string()),
            errors: Vec::new(),
        }
    }

    /// True unless the file is valid
    pub fn has_failures(&self) -> bool {
        self.status != ReportStatus::Valid
    }

    /// Count the errors of exactly the given severity
    pub fn count(&self, level: Level) -> usize {
        self.errors.iter().filter(|e| e.level() == level).count()
    }

    /// Render the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();

            output.push_str(&format!("{}\n", style("mzTab Validation Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("=======================").cyan()));
            output.push_str(&format!("{}: {}\n", style("File").bold(), self.file_path));
            let status = match &self.status {
                ReportStatus::Valid => style(self.status.to_string()).green().bold(),
                ReportStatus::Invalid => style(self.status.to_string()).red().bold(),
                ReportStatus::Aborted(_) => style(self.status.to_string()).magenta().bold(),
            };
            output.push_str(&format!("{}: {}\n", style("Outcome").bold(), status));
            output.push_str(&format!(
                "{}: {} info, {} warnings, {} errors\n\n",
                style("Summary").bold(),
                style(self.count(Level::Info)).cyan(),
                style(self.count(Level::Warn)).yellow(),
                style(self.count(Level::Error)).red()
            ));

            if self.errors.is_empty() {
                output.push_str(&format!("{}\n", style(NO_ERRORS_SENTINEL).green()));
            }
            for error in &self.errors {
                let line = error.to_string();
                let styled = match error.level() {
                    Level::Info => style(line).cyan(),
                    Level::Warn => style(line).yellow(),
                    Level::Error => style(line).red(),
                };
                output.push_str(&format!("{}\n", styled));
            }
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mzTab Validation Report")?;
        writeln!(f, "=======================")?;
        writeln!(f, "File: {}", self.file_path)?;
        writeln!(f, "Outcome: {}", self.status)?;
        writeln!(
            f,
            "Summary: {} info, {} warnings, {} errors",
            self.count(Level::Info),
            self.count(Level::Warn),
            self.count(Level::Error)
        )?;
        writeln!(f)?;

        if self.errors.is_empty() {
            writeln!(f, "{}", NO_ERRORS_SENTINEL)?;
        }
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}
