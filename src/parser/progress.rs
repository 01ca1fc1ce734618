use std::fmt;

/// Where a parse stands, reported once per line
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Current 1-based line
    pub line: usize,
    /// Bytes consumed from the underlying input
    pub bytes: u64,
    /// Size of the underlying input, when known
    pub total_bytes: Option<u64>,
    /// Human readable status
    pub status: String,
}

impl Progress {
    /// `bytes / total_bytes * 100`, when the total is known
    pub fn percent(&self) -> Option<f64> {
        match self.total_bytes {
            Some(total) if total > 0 => Some((self.bytes.min(total) as f64 / total as f64) * 100.0),
            _ => None,
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent() {
            Some(pct) => write!(f, "{} ({:.1}%)", self.status, pct),
            None => write!(f, "{}", self.status),
        }
    }
}

/// Receives progress reports during a parse.
///
/// Returning `false` cancels the parse. Callbacks must be callable from
/// several threads, since batch validation shares one callback between
/// workers.
pub trait ProgressCallback: Sync {
    /// Called after every parsed line
    fn on_progress(&self, progress: &Progress) -> bool;
}

impl<F> ProgressCallback for F
where
    F: Fn(&Progress) -> bool + Sync,
{
    fn on_progress(&self, progress: &Progress) -> bool {
        self(progress)
    }
}

/// A callback that ignores progress and never cancels
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_progress(&self, _progress: &Progress) -> bool {
        true
    }
}
