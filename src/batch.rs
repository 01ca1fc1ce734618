//! Batch validation of many files.
//!
//! Files are independent, so they are validated on a fixed-size worker pool
//! (with the `parallel` feature) and each finished report is appended to a
//! shared writer under a single lock.
//!
//! ```text
//! ┌───────────┐     ┌────────────┐     ┌─────────────────┐
//! │  files[]  │────▶│  Worker 0  │──┐  │                 │
//! │           │     │  Worker 1  │──┼─▶│ Mutex<Writer>   │
//! │           │     │  Worker N  │──┘  │                 │
//! └───────────┘     └────────────┘     └─────────────────┘
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use log::{info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::parser::{MzTabParser, ProgressCallback};
use crate::report::ValidationReport;

/// Errors that stop a batch
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Writing a report failed
    #[error("Failed to write report: {0}")]
    IoError(#[from] io::Error),

    /// The worker pool could not be created
    #[cfg(feature = "parallel")]
    #[error("Failed to build worker pool: {0}")]
    ThreadPoolError(#[from] rayon::ThreadPoolBuildError),
}

/// How each report is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Plain text banner and error list
    #[default]
    Plain,
    /// Text with terminal colors
    Colored,
    /// Pretty-printed JSON
    Json,
}

impl ReportFormat {
    fn render(self, report: &ValidationReport) -> io::Result<String> {
        match self {
            ReportFormat::Plain => Ok(report.to_string()),
            ReportFormat::Colored => Ok(report.format_colored()),
            ReportFormat::Json => report.to_json().map_err(io::Error::other),
        }
    }
}

/// Settings of a batch run
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of worker threads (defaults to available parallelism)
    pub threads: usize,
    /// Output format of the reports
    pub format: ReportFormat,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            threads: std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4),
            format: ReportFormat::default(),
        }
    }
}

/// Reports of a finished batch, in input order
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// One report per input file
    pub reports: Vec<ValidationReport>,
    /// Wall-clock time of the batch
    pub elapsed_seconds: f64,
}

impl BatchSummary {
    /// Number of valid files
    pub fn valid_count(&self) -> usize {
        self.reports.iter().filter(|r| !r.has_failures()).count()
    }

    /// Number of files that are invalid, aborted or unreadable
    pub fn failed_count(&self) -> usize {
        self.reports.len() - self.valid_count()
    }
}

/// Validates files on a worker pool
#[derive(Debug)]
pub struct BatchValidator {
    parser: MzTabParser,
    config: BatchConfig,
}

impl BatchValidator {
    /// Create a batch validator sharing one parser between workers
    pub fn new(parser: MzTabParser, config: BatchConfig) -> Self {
        Self { parser, config }
    }

    /// Validate every file, appending each report to `output` as soon as it is ready.
    ///
    /// # Errors
    /// [`BatchError`] if a report cannot be written or the pool cannot be built.
    /// Unreadable inputs are not errors; they get an aborted report.
    pub fn validate<W: Write + Send>(
        &self,
        files: &[PathBuf],
        output: &Mutex<W>,
        progress: &dyn ProgressCallback,
    ) -> Result<BatchSummary, BatchError> {
        let start_time = Instant::now();
        info!(
            "Validating {} files with {} workers",
            files.len(),
            self.config.threads
        );

        let results = self.run(files, output, progress)?;
        let reports = results.into_iter().collect::<Result<Vec<_>, _>>()?;

        let summary = BatchSummary {
            reports,
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
        };
        info!(
            "Batch finished in {:.2}s: {} valid, {} failed",
            summary.elapsed_seconds,
            summary.valid_count(),
            summary.failed_count()
        );
        Ok(summary)
    }

    #[cfg(feature = "parallel")]
    fn run<W: Write + Send>(
        &self,
        files: &[PathBuf],
        output: &Mutex<W>,
        progress: &dyn ProgressCallback,
    ) -> Result<Vec<io::Result<ValidationReport>>, BatchError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads.max(1))
            .build()?;
        Ok(pool.install(|| {
            files
                .par_iter()
                .map(|path| self.validate_one(path, output, progress))
                .collect()
        }))
    }

    #[cfg(not(feature = "parallel"))]
    fn run<W: Write + Send>(
        &self,
        files: &[PathBuf],
        output: &Mutex<W>,
        progress: &dyn ProgressCallback,
    ) -> Result<Vec<io::Result<ValidationReport>>, BatchError> {
        Ok(files
            .iter()
            .map(|path| self.validate_one(path, output, progress))
            .collect())
    }

    fn validate_one<W: Write>(
        &self,
        path: &Path,
        output: &Mutex<W>,
        progress: &dyn ProgressCallback,
    ) -> io::Result<ValidationReport> {
        let name = path.display().to_string();
        let report = match self.parser.parse_file(path, progress) {
            Ok(outcome) => ValidationReport::from_outcome(name, &outcome),
            Err(e) => {
                warn!("Cannot read {}: {}", name, e);
                ValidationReport::from_read_error(name, &e)
            }
        };

        let rendered = self.config.format.render(&report)?;
        let mut out = output
            .lock()
            .map_err(|_| io::Error::other("report writer lock poisoned"))?;
        writeln!(out, "{}", rendered)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidatorConfig;
    use crate::parser::{NoProgress, Progress};
    use crate::report::ReportStatus;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const VALID: &str = "MTD\tmzTab-version\t1.0.0\nMTD\tmzTab-mode\tSummary\n\
        MTD\tmzTab-type\tIdentification\nMTD\tdescription\tbatch\n\
        MTD\tms_run[1]-location\tfile:///data/run1.mzML\n";

    fn write_files(dir: &Path) -> Vec<PathBuf> {
        let files = [
            ("a.mztab", VALID.to_string()),
            ("b.mztab", "MTD\tmzTab-version\t1.0.0\n".to_string()),
            ("c.mztab", format!("{}PRT\tP12345\n", VALID)),
        ];
        files
            .iter()
            .map(|(name, text)| {
                let path = dir.join(name);
                std::fs::write(&path, text).unwrap();
                path
            })
            .collect()
    }

    fn validator(threads: usize, format: ReportFormat) -> BatchValidator {
        BatchValidator::new(
            MzTabParser::new(ValidatorConfig::default()),
            BatchConfig { threads, format },
        )
    }

    #[test]
    fn test_batch_reports_in_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut files = write_files(dir.path());
        files.push(dir.path().join("missing.mztab"));

        let output = Mutex::new(Vec::new());
        let summary = validator(2, ReportFormat::Plain)
            .validate(&files, &output, &NoProgress)
            .unwrap();

        let statuses: Vec<_> = summary.reports.iter().map(|r| &r.status).collect();
        assert_eq!(statuses[0], &ReportStatus::Valid);
        assert_eq!(statuses[1], &ReportStatus::Invalid);
        assert!(matches!(statuses[2], ReportStatus::Aborted(_)));
        assert!(matches!(statuses[3], ReportStatus::Aborted(_)));
        assert_eq!(summary.valid_count(), 1);
        assert_eq!(summary.failed_count(), 3);

        let text = String::from_utf8(output.into_inner().unwrap()).unwrap();
        for file in &files {
            assert!(text.contains(&format!("File: {}", file.display())));
        }
        assert_eq!(text.matches("mzTab Validation Report").count(), 4);
    }

    #[test]
    fn test_shared_progress_callback() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_files(dir.path());

        let lines = AtomicUsize::new(0);
        let progress = |_: &Progress| {
            lines.fetch_add(1, Ordering::Relaxed);
            true
        };
        let output = Mutex::new(Vec::new());
        validator(3, ReportFormat::Json)
            .validate(&files, &output, &progress)
            .unwrap();

        // The aborting PRT line of c.mztab reports no progress
        assert_eq!(lines.load(Ordering::Relaxed), 11);

        let text = String::from_utf8(output.into_inner().unwrap()).unwrap();
        assert_eq!(text.matches("\"file_path\"").count(), 3);
    }
}
