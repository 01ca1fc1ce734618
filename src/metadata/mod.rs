//! # mzTab Metadata
//!
//! The metadata section is a list of `MTD` lines, each carrying one
//! key/value pair:
//!
//! ```text
//! MTD	mzTab-version	1.0.0
//! MTD	ms_run[1]-location	file:///data/run1.mzML
//! MTD	assay[2]-quantification_reagent	[PRIDE, PRIDE:0000115, iTRAQ reagent 115, ]
//! ```
//!
//! A key is either a scalar property name or an indexed element
//! `element[id]` followed by an optional `-sub-property`. Indexed elements
//! (ms runs, samples, assays, study variables, ...) are built incrementally:
//! their properties may arrive on separate lines in any order.
//!
//! Entities refer to one another by id (an assay names its ms run and its
//! sample). References are stored as ids and are not resolved here.

mod model;
mod parser;

#[cfg(test)]
mod tests;

pub use model::{
    Assay, ColumnUnit, Contact, CvDefinition, IndexMap, Instrument, Metadata, ModificationDef,
    Mode, MsRun, MzTabType, Publication, Sample, Software, StudyVariable,
};
pub use parser::MetadataParser;
