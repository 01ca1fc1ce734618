//! Checks against external reference data.
//!
//! A [`CrossCheck`] looks at a file that passed every structural and format
//! check, for example to compare declared species against a taxonomy or
//! modification accessions against Unimod. None are built in; callers
//! register their own with [`MzTabParser::with_cross_check`].
//!
//! Cross-check errors should use [`Category::CrossCheck`] error types with
//! codes in the 3xxx range.
//!
//! [`MzTabParser::with_cross_check`]: crate::parser::MzTabParser::with_cross_check
//! [`Category::CrossCheck`]: crate::error::Category::CrossCheck

use crate::error::MzTabError;
use crate::file::MzTabFile;

/// A consistency check over an assembled file
pub trait CrossCheck: Send + Sync {
    /// Name used in log messages
    fn name(&self) -> &str;

    /// Push every inconsistency found in `file` to `issues`
    fn check(&self, file: &MzTabFile, issues: &mut Vec<MzTabError>);
}
