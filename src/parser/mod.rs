//! # Streaming mzTab Parser
//!
//! [`MzTabParser`] reads a tab-separated stream line by line and drives every
//! line through three stages:
//!
//! 1. the line prefix selects a [`Section`] (unknown prefixes are fatal),
//! 2. the [`SectionTracker`] checks the line against the section order,
//! 3. the section's [`SectionParser`] checks the fields and builds the model.
//!
//! Problems found in stage 3 are recoverable and end up in the
//! [`ErrorList`]. Structural problems from stages 1 and 2, an overflowing
//! error list and a cancelled progress callback stop the parse; the result is
//! then [`ParseOutcome::Aborted`].
//!
//! Blank lines, `MTH` lines and lines starting with `#` are skipped before
//! they reach the tracker. Gzip-compressed files are decompressed on the fly.
//!
//! ## Example
//!
//! ```rust
//! use mztab::config::ValidatorConfig;
//! use mztab::parser::{MzTabParser, NoProgress};
//!
//! let text = "MTD\tmzTab-version\t1.0.0\nPRT\tP12345\n";
//! let parser = MzTabParser::new(ValidatorConfig::default());
//! let outcome = parser.parse_str(text, &NoProgress).unwrap();
//! assert!(!outcome.is_valid());
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use flate2::read::GzDecoder;
use log::{debug, info, warn};

use crate::config::ValidatorConfig;
use crate::cross_check::CrossCheck;
use crate::error::{format, logical, ErrorList, MzTabError};
use crate::file::{Comment, MzTabFile};
use crate::metadata::{Metadata, MetadataParser};
use crate::section::{Section, SectionTracker, TableKind};

mod error;
mod progress;
mod table;


pub use error::{Abort, ReadError};
pub use progress::{NoProgress, Progress, ProgressCallback};
pub use table::{SectionParser, TableParser};

/// Result of parsing one input
#[derive(Debug)]
pub enum ParseOutcome {
    /// No error was retained; the assembled file
    Valid(Box<MzTabFile>),

    /// The whole input was read but errors were found
    Invalid {
        /// Every retained error
        errors: ErrorList,
    },

    /// Parsing stopped early
    Aborted {
        /// Why parsing stopped
        reason: Abort,
        /// Errors retained up to that point, the fatal one included
        errors: ErrorList,
    },
}

impl ParseOutcome {
    /// True if the input is a valid mzTab file
    pub fn is_valid(&self) -> bool {
        matches!(self, ParseOutcome::Valid(_))
    }

    /// The error list, for invalid and aborted inputs
    pub fn errors(&self) -> Option<&ErrorList> {
        match self {
            ParseOutcome::Valid(_) => None,
            ParseOutcome::Invalid { errors } | ParseOutcome::Aborted { errors, .. } => Some(errors),
        }
    }

    /// Why parsing stopped, if it did
    pub fn abort(&self) -> Option<&Abort> {
        match self {
            ParseOutcome::Aborted { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// The assembled file of a valid input
    pub fn file(&self) -> Option<&MzTabFile> {
        match self {
            ParseOutcome::Valid(file) => Some(file),
            _ => None,
        }
    }

    /// Take the assembled file of a valid input
    pub fn into_file(self) -> Option<MzTabFile> {
        match self {
            ParseOutcome::Valid(file) => Some(*file),
            _ => None,
        }
    }
}

/// Validating parser for mzTab 1.0 files
pub struct MzTabParser {
    config: ValidatorConfig,
    cross_checks: Vec<Box<dyn CrossCheck>>,
}

impl MzTabParser {
    /// Create a parser with the given settings
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            cross_checks: Vec::new(),
        }
    }

    /// Register a check to run over files that pass every other check
    pub fn with_cross_check<C: CrossCheck + 'static>(mut self, check: C) -> Self {
        self.cross_checks.push(Box::new(check));
        self
    }

    /// The parser settings
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Parse a file from disk; files ending in `.gz` are decompressed.
    ///
    /// Progress is reported against the on-disk size, so for compressed
    /// input it follows the compressed bytes read.
    ///
    /// # Errors
    /// A [`ReadError`] if the file cannot be opened or read.
    pub fn parse_file<P: AsRef<Path>>(
        &self,
        path: P,
        progress: &dyn ProgressCallback,
    ) -> Result<ParseOutcome, ReadError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let total_bytes = file.metadata().ok().map(|m| m.len());
        info!("Validating {}", path.display());

        let is_gzip = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("gz"));
        if is_gzip {
            let counter = Arc::new(AtomicU64::new(0));
            let reader = CountingReader {
                inner: file,
                count: Arc::clone(&counter),
            };
            self.parse_stream(GzDecoder::new(reader), total_bytes, Some(&counter), progress)
        } else {
            self.parse_stream(file, total_bytes, None, progress)
        }
    }

    /// Parse an uncompressed stream of `total_bytes` bytes, if known.
    ///
    /// # Errors
    /// A [`ReadError`] if the stream cannot be read or is not UTF-8.
    pub fn parse_reader<R: Read>(
        &self,
        reader: R,
        total_bytes: Option<u64>,
        progress: &dyn ProgressCallback,
    ) -> Result<ParseOutcome, ReadError> {
        self.parse_stream(reader, total_bytes, None, progress)
    }

    /// Parse in-memory text.
    ///
    /// # Errors
    /// See [`MzTabParser::parse_reader`].
    pub fn parse_str(&self, text: &str, progress: &dyn ProgressCallback) -> Result<ParseOutcome, ReadError> {
        self.parse_stream(text.as_bytes(), Some(text.len() as u64), None, progress)
    }

    fn parse_stream<R: Read>(
        &self,
        reader: R,
        total_bytes: Option<u64>,
        consumed: Option<&AtomicU64>,
        progress: &dyn ProgressCallback,
    ) -> Result<ParseOutcome, ReadError> {
        let mut reader = BufReader::new(reader);
        let mut state = ParseState::new(&self.config);
        let mut buffer = Vec::new();
        let mut bytes_read = 0u64;
        let mut line = 0usize;
        let interval = self.config.progress_interval;

        loop {
            buffer.clear();
            let n = reader.read_until(b'\n', &mut buffer)?;
            if n == 0 {
                break;
            }
            line += 1;
            bytes_read += n as u64;

            let text = std::str::from_utf8(&buffer)
                .map_err(|source| ReadError::Utf8Error { line, source })?
                .trim_end_matches(&['\n', '\r'][..]);
            let fields: Vec<&str> = text.split('\t').collect();

            let status = if is_skipped(text, &fields) {
                format!("Skipping line {}", line)
            } else {
                state.last_line = line;
                if let Err(reason) = state.guarded(line, |s| s.process_line(line, &fields)) {
                    return Ok(state.abort(reason));
                }
                format!("Parsing {} line {}", fields[0].trim(), line)
            };

            let report = Progress {
                line,
                bytes: consumed.map_or(bytes_read, |counter| counter.load(Ordering::Relaxed)),
                total_bytes,
                status,
            };
            if interval > 0 && line % interval == 0 {
                match report.percent() {
                    Some(pct) => debug!("Progress: {} lines ({:.1}%)", line, pct),
                    None => debug!("Progress: {} lines", line),
                }
            }
            if !progress.on_progress(&report) {
                return Ok(state.abort(Abort::Cancelled { line }));
            }
        }

        Ok(state.finish(&self.cross_checks))
    }
}

impl std::fmt::Debug for MzTabParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MzTabParser")
            .field("config", &self.config)
            .field(
                "cross_checks",
                &self.cross_checks.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Blank, `#` and `MTH` lines never reach the tracker
fn is_skipped(text: &str, fields: &[&str]) -> bool {
    text.trim().is_empty() || text.starts_with('#') || fields[0].trim() == "MTH"
}

/// Counts bytes pulled from the underlying file
struct CountingReader<R> {
    inner: R,
    count: Arc<AtomicU64>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

enum MetadataStage {
    Open(MetadataParser),
    Sealed(Metadata),
}

/// Everything that depends on the lines read so far
struct ParseState {
    tracker: SectionTracker,
    metadata: MetadataStage,
    tables: BTreeMap<TableKind, TableParser>,
    comments: Vec<Comment>,
    errors: ErrorList,
    current: Option<Section>,
    last_line: usize,
}

impl ParseState {
    fn new(config: &ValidatorConfig) -> Self {
        Self {
            tracker: SectionTracker::new(),
            metadata: MetadataStage::Open(MetadataParser::new()),
            tables: BTreeMap::new(),
            comments: Vec::new(),
            errors: ErrorList::new(config.level, config.max_errors),
            current: None,
            last_line: 0,
        }
    }

    /// Run `f`, turning a panic into an `Exception` error on `line`
    fn guarded<F>(&mut self, line: usize, f: F) -> Result<(), Abort>
    where
        F: FnOnce(&mut Self) -> Result<(), Abort>,
    {
        match panic::catch_unwind(AssertUnwindSafe(|| f(self))) {
            Ok(result) => result,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                warn!("Line {}: recovered from failure: {}", line, message);
                self.errors
                    .record(MzTabError::new(logical::EXCEPTION, line, &[&message]))?;
                Ok(())
            }
        }
    }

    fn process_line(&mut self, line: usize, fields: &[&str]) -> Result<(), Abort> {
        let prefix = fields[0].trim();
        let section = Section::from_prefix(prefix).ok_or_else(|| {
            Abort::Structural(MzTabError::new(format::LINE_PREFIX, line, &[&prefix]))
        })?;
        self.tracker.advance(section, line).map_err(Abort::Structural)?;

        if section != Section::Comment && self.current != Some(section) {
            debug!("Line {}: entering {} section", line, section);
            self.current = Some(section);
        }

        let mut issues = Vec::new();
        match section {
            Section::Comment => self.comments.push(Comment {
                line,
                text: fields[1..].join("\t"),
            }),
            Section::Metadata => {
                if let MetadataStage::Open(parser) = &mut self.metadata {
                    SectionParser::parse_line(parser, line, fields, &mut issues);
                }
            }
            _ => {
                self.seal(line, &mut issues);
                if let Some(table) = section.table() {
                    if section.is_header() {
                        let parser =
                            TableParser::from_header(table, line, fields, self.metadata(), &mut issues);
                        self.tables.insert(table, parser);
                    } else if let Some(parser) = self.tables.get_mut(&table) {
                        parser.parse_line(line, fields, &mut issues);
                    }
                }
            }
        }

        for issue in issues {
            self.errors.record(issue)?;
        }
        Ok(())
    }

    /// Close the metadata section, checking its mandatory properties
    fn seal(&mut self, line: usize, issues: &mut Vec<MzTabError>) {
        let stage = std::mem::replace(&mut self.metadata, MetadataStage::Sealed(Metadata::default()));
        self.metadata = match stage {
            MetadataStage::Open(parser) => MetadataStage::Sealed(parser.finish(line, issues)),
            sealed => sealed,
        };
    }

    fn metadata(&self) -> &Metadata {
        match &self.metadata {
            MetadataStage::Open(parser) => parser.metadata(),
            MetadataStage::Sealed(metadata) => metadata,
        }
    }

    fn abort(mut self, reason: Abort) -> ParseOutcome {
        if let Abort::Structural(error) = &reason {
            // The list may be full; the fatal error is still reported as the reason
            let _ = self.errors.record(error.clone());
        }
        warn!("Validation aborted: {}", reason);
        ParseOutcome::Aborted {
            reason,
            errors: self.errors,
        }
    }

    fn finish(mut self, cross_checks: &[Box<dyn CrossCheck>]) -> ParseOutcome {
        let mut issues = Vec::new();
        self.seal(self.last_line.max(1), &mut issues);
        for issue in issues {
            if let Err(overflow) = self.errors.record(issue) {
                return self.abort(overflow.into());
            }
        }

        let metadata = match std::mem::replace(&mut self.metadata, MetadataStage::Sealed(Metadata::default())) {
            MetadataStage::Sealed(metadata) => metadata,
            MetadataStage::Open(parser) => parser.finish(self.last_line, &mut Vec::new()),
        };
        let tables = std::mem::take(&mut self.tables)
            .into_iter()
            .map(|(kind, parser)| (kind, parser.into_table()))
            .collect();
        let file = MzTabFile::new(metadata, std::mem::take(&mut self.comments), tables);

        if self.errors.is_empty() {
            for check in cross_checks {
                let mut issues = Vec::new();
                check.check(&file, &mut issues);
                debug!("Cross check {} reported {} issues", check.name(), issues.len());
                for issue in issues {
                    if let Err(overflow) = self.errors.record(issue) {
                        return self.abort(overflow.into());
                    }
                }
            }
        }

        info!(
            "Validation finished after {} lines with {} errors",
            self.last_line,
            self.errors.len()
        );
        if self.errors.is_empty() {
            ParseOutcome::Valid(Box::new(file))
        } else {
            ParseOutcome::Invalid { errors: self.errors }
        }
    }
}
