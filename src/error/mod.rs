//! # Validation Error Model
//!
//! Every problem found in an mzTab file is reported as an [`MzTabError`]: a
//! catalogued [`ErrorType`] plus the line it was found on and the message
//! filled from the type's template.
//!
//! Errors are collected in an [`ErrorList`], which
//!
//! - ignores errors below a configurable minimum [`Level`],
//! - drops errors whose type and message were already recorded,
//! - refuses to grow past its capacity and reports [`ErrorListOverflow`] instead.
//!
//! ## Rendering
//!
//! Each error renders as a single line:
//!
//! ```text
//! [Error-2001] line 14: MTD line cannot appear after a PRT line
//! ```
//!
//! An empty list renders as the sentinel [`NO_ERRORS_SENTINEL`].

use std::collections::HashSet;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

mod catalog;

#[cfg(test)]
mod tests;

pub use catalog::{format, logical, ErrorCatalog};

/// Default capacity of an [`ErrorList`]
pub const DEFAULT_MAX_ERRORS: usize = 10_000;

/// Line written by [`ErrorList::render`] when there is nothing to report
pub const NO_ERRORS_SENTINEL: &str = "No errors found.";

/// Severity of an error, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Informational remark
    #[default]
    Info,
    /// Suspicious but acceptable content
    #[serde(alias = "warning")]
    Warn,
    /// A violation of the format
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Info => write!(f, "Info"),
            Level::Warn => write!(f, "Warn"),
            Level::Error => write!(f, "Error"),
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            _ => Err(format!(
                "Unknown level '{}'. Valid options: info, warn, error",
                s
            )),
        }
    }
}

/// Broad class of an error, independent of its severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// A single field does not follow its value grammar
    Format,
    /// Well-formed fields that violate a cross-field or cross-line rule
    Logical,
    /// Inconsistency against external reference data
    CrossCheck,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Format => write!(f, "Format"),
            Category::Logical => write!(f, "Logical"),
            Category::CrossCheck => write!(f, "CrossCheck"),
        }
    }
}

/// A catalogued kind of error with a message template.
///
/// Templates use positional placeholders `{0}`, `{1}`, ... which are filled by
/// [`ErrorType::fill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorType {
    /// Numeric code, unique within the catalog
    pub code: u16,
    /// Short name, e.g. `LineOrder`
    pub name: &'static str,
    /// Error category
    pub category: Category,
    /// Severity
    pub level: Level,
    /// Message template
    #[serde(skip)]
    pub template: &'static str,
}

impl ErrorType {
    /// Fill the template placeholders with the given arguments.
    ///
    /// Placeholders are filled in one pass, so argument text is never
    /// substituted again. Placeholders without a matching argument are left
    /// as they are.
    pub fn fill(&self, args: &[&dyn fmt::Display]) -> String {
        let mut message = String::with_capacity(self.template.len());
        let mut rest = self.template;
        while let Some(start) = rest.find('{') {
            message.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let placeholder = after.find('}').and_then(|end| {
                let arg = after[..end].parse::<usize>().ok().and_then(|i| args.get(i))?;
                Some((arg, end))
            });
            match placeholder {
                Some((arg, end)) => {
                    message.push_str(&arg.to_string());
                    rest = &after[end + 1..];
                }
                None => {
                    message.push('{');
                    rest = after;
                }
            }
        }
        message.push_str(rest);
        message
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.level, self.code, self.name)
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MzTabError {
    /// The kind of error
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    /// 1-based line number the error was found on
    pub line: usize,
    /// The filled message
    pub message: String,
}

static RENDERED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(Info|Warn|Error)-(\d+)\] line (\d+): (.*)$").expect("valid pattern")
});

impl MzTabError {
    /// Create an error by filling the template of `error_type`
    pub fn new(error_type: ErrorType, line: usize, args: &[&dyn fmt::Display]) -> Self {
        Self {
            error_type,
            line,
            message: error_type.fill(args),
        }
    }

    /// Severity of this error
    pub fn level(&self) -> Level {
        self.error_type.level
    }

    /// Parse a line written by [`ErrorList::render`] back into an error.
    ///
    /// Returns `None` when the line is not a rendered error, when the code is
    /// not in `catalog`, or when the severity does not match the catalogued one.
    pub fn from_rendered(line: &str, catalog: &ErrorCatalog) -> Option<Self> {
        let captures = RENDERED_PATTERN.captures(line.trim_end_matches(['\r', '\n']))?;
        let level: Level = captures[1].parse().ok()?;
        let code: u16 = captures[2].parse().ok()?;
        let line_number: usize = captures[3].parse().ok()?;
        let error_type = *catalog.lookup(code)?;
        if error_type.level != level {
            return None;
        }
        Some(Self {
            error_type,
            line: line_number,
            message: captures[4].to_string(),
        })
    }
}

impl fmt::Display for MzTabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}-{}] line {}: {}",
            self.error_type.level, self.error_type.code, self.line, self.message
        )
    }
}

/// Raised when an [`ErrorList`] is asked to hold more errors than its capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("too many errors: the error list is limited to {capacity} entries")]
pub struct ErrorListOverflow {
    /// Capacity of the list that overflowed
    pub capacity: usize,
}

/// Ordered, bounded and de-duplicated collection of [`MzTabError`]s
#[derive(Debug, Clone, Serialize)]
pub struct ErrorList {
    errors: Vec<MzTabError>,
    #[serde(skip)]
    seen: HashSet<(u16, String)>,
    capacity: usize,
    level: Level,
}

impl Default for ErrorList {
    fn default() -> Self {
        Self::new(Level::Info, DEFAULT_MAX_ERRORS)
    }
}

impl ErrorList {
    /// Create an empty list retaining errors at or above `level`, holding at most `capacity` errors
    pub fn new(level: Level, capacity: usize) -> Self {
        Self {
            errors: Vec::new(),
            seen: HashSet::new(),
            capacity,
            level,
        }
    }

    /// Record an error.
    ///
    /// Returns `Ok(false)` without storing anything when the error is below the
    /// minimum level or an error with the same type and message is already
    /// present, and `Ok(true)` once the error is appended.
    ///
    /// # Errors
    /// [`ErrorListOverflow`] when the list already holds `capacity` errors.
    pub fn record(&mut self, error: MzTabError) -> Result<bool, ErrorListOverflow> {
        if error.level() < self.level {
            return Ok(false);
        }
        let key = (error.error_type.code, error.message.clone());
        if self.seen.contains(&key) {
            return Ok(false);
        }
        if self.errors.len() >= self.capacity {
            return Err(ErrorListOverflow {
                capacity: self.capacity,
            });
        }
        self.seen.insert(key);
        self.errors.push(error);
        Ok(true)
    }

    /// True when no error was retained
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of retained errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Maximum number of errors this list holds
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Minimum retained severity
    pub fn level(&self) -> Level {
        self.level
    }

    /// Iterate over the errors in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, MzTabError> {
        self.errors.iter()
    }

    /// Count the retained errors of exactly the given severity
    pub fn count(&self, level: Level) -> usize {
        self.errors.iter().filter(|e| e.level() == level).count()
    }

    /// True if any retained error has severity [`Level::Error`]
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| e.level() == Level::Error)
    }

    /// Write every error on its own line, or [`NO_ERRORS_SENTINEL`] if there are none
    pub fn render<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        if self.errors.is_empty() {
            writeln!(writer, "{}", NO_ERRORS_SENTINEL)?;
            return Ok(());
        }
        for error in &self.errors {
            writeln!(writer, "{}", error)?;
        }
        Ok(())
    }

    /// Parse text written by [`ErrorList::render`], skipping lines that are not errors
    pub fn parse_rendered(text: &str, catalog: &ErrorCatalog) -> Vec<MzTabError> {
        text.lines()
            .filter_map(|line| MzTabError::from_rendered(line, catalog))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a MzTabError;
    type IntoIter = std::slice::Iter<'a, MzTabError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return writeln!(f, "{}", NO_ERRORS_SENTINEL);
        }
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}
