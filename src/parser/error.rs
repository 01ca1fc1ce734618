use crate::error::{ErrorListOverflow, MzTabError};

/// Failures reading the input stream.
///
/// These are not validation findings: they mean the input could not be read
/// at all, and no error list is produced.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// I/O error opening or reading the input
    #[error("Failed to read input: {0}")]
    IoError(#[from] std::io::Error),

    /// A line is not valid UTF-8
    #[error("Line {line} is not valid UTF-8: {source}")]
    Utf8Error {
        /// Physical line number
        line: usize,
        /// Decoding failure
        source: std::str::Utf8Error,
    },
}

/// Why a parse stopped before the end of the input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Abort {
    /// A line that breaks the section structure of the file
    #[error("structural error: {0}")]
    Structural(MzTabError),

    /// The error list reached its capacity
    #[error("{0}")]
    Overflow(#[from] ErrorListOverflow),

    /// The progress callback asked to stop
    #[error("cancelled at line {line}")]
    Cancelled {
        /// Last line parsed before stopping
        line: usize,
    },
}
