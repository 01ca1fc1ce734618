//! # Sections and Section Ordering
//!
//! An mzTab file is a sequence of sections identified by the first token of
//! each line. Every section has a level, and levels never decrease through a
//! file: metadata first, then each table's header line followed by its data
//! lines, in protein, peptide, PSM and small molecule order. Comment lines
//! are exempt and may appear anywhere.
//!
//! | Prefix | Section              | Level |
//! |--------|----------------------|-------|
//! | `COM`  | Comment              | 0     |
//! | `MTD`  | Metadata             | 1     |
//! | `PRH`  | Protein header       | 2     |
//! | `PRT`  | Protein              | 3     |
//! | `PEH`  | Peptide header       | 4     |
//! | `PEP`  | Peptide              | 5     |
//! | `PSH`  | PSM header           | 6     |
//! | `PSM`  | PSM                  | 7     |
//! | `SMH`  | Small molecule header| 8     |
//! | `SML`  | Small molecule       | 9     |
//!
//! [`SectionTracker`] enforces the ordering rules and reports violations as
//! fatal errors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{logical, MzTabError};

/// Structural region of an mzTab file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    /// `COM`
    Comment,
    /// `MTD`
    Metadata,
    /// `PRH`
    ProteinHeader,
    /// `PRT`
    Protein,
    /// `PEH`
    PeptideHeader,
    /// `PEP`
    Peptide,
    /// `PSH`
    PsmHeader,
    /// `PSM`
    Psm,
    /// `SMH`
    SmallMoleculeHeader,
    /// `SML`
    SmallMolecule,
}

impl Section {
    /// All sections in level order
    pub const ALL: [Section; 10] = [
        Section::Comment,
        Section::Metadata,
        Section::ProteinHeader,
        Section::Protein,
        Section::PeptideHeader,
        Section::Peptide,
        Section::PsmHeader,
        Section::Psm,
        Section::SmallMoleculeHeader,
        Section::SmallMolecule,
    ];

    /// Classify a line by its prefix token
    pub fn from_prefix(prefix: &str) -> Option<Section> {
        Self::ALL.into_iter().find(|s| s.prefix() == prefix)
    }

    /// The line prefix token
    pub fn prefix(&self) -> &'static str {
        match self {
            Section::Comment => "COM",
            Section::Metadata => "MTD",
            Section::ProteinHeader => "PRH",
            Section::Protein => "PRT",
            Section::PeptideHeader => "PEH",
            Section::Peptide => "PEP",
            Section::PsmHeader => "PSH",
            Section::Psm => "PSM",
            Section::SmallMoleculeHeader => "SMH",
            Section::SmallMolecule => "SML",
        }
    }

    /// Ordering level; comments are level 0 and exempt from ordering
    pub fn level(&self) -> u8 {
        match self {
            Section::Comment => 0,
            Section::Metadata => 1,
            Section::ProteinHeader => 2,
            Section::Protein => 3,
            Section::PeptideHeader => 4,
            Section::Peptide => 5,
            Section::PsmHeader => 6,
            Section::Psm => 7,
            Section::SmallMoleculeHeader => 8,
            Section::SmallMolecule => 9,
        }
    }

    /// True for the four table header sections
    pub fn is_header(&self) -> bool {
        matches!(
            self,
            Section::ProteinHeader
                | Section::PeptideHeader
                | Section::PsmHeader
                | Section::SmallMoleculeHeader
        )
    }

    /// True for the four table data sections
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            Section::Protein | Section::Peptide | Section::Psm | Section::SmallMolecule
        )
    }

    /// The table this header or data section belongs to
    pub fn table(&self) -> Option<TableKind> {
        match self {
            Section::ProteinHeader | Section::Protein => Some(TableKind::Protein),
            Section::PeptideHeader | Section::Peptide => Some(TableKind::Peptide),
            Section::PsmHeader | Section::Psm => Some(TableKind::Psm),
            Section::SmallMoleculeHeader | Section::SmallMolecule => {
                Some(TableKind::SmallMolecule)
            }
            Section::Comment | Section::Metadata => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// One of the four tabular sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TableKind {
    /// `PRH` / `PRT`
    Protein,
    /// `PEH` / `PEP`
    Peptide,
    /// `PSH` / `PSM`
    Psm,
    /// `SMH` / `SML`
    SmallMolecule,
}

impl TableKind {
    /// All tables in file order
    pub const ALL: [TableKind; 4] = [
        TableKind::Protein,
        TableKind::Peptide,
        TableKind::Psm,
        TableKind::SmallMolecule,
    ];

    /// Section of the header line
    pub fn header(&self) -> Section {
        match self {
            TableKind::Protein => Section::ProteinHeader,
            TableKind::Peptide => Section::PeptideHeader,
            TableKind::Psm => Section::PsmHeader,
            TableKind::SmallMolecule => Section::SmallMoleculeHeader,
        }
    }

    /// Section of the data lines
    pub fn data(&self) -> Section {
        match self {
            TableKind::Protein => Section::Protein,
            TableKind::Peptide => Section::Peptide,
            TableKind::Psm => Section::Psm,
            TableKind::SmallMolecule => Section::SmallMolecule,
        }
    }

    /// Prefix of quantification columns, e.g. `protein_abundance_assay[1]`.
    /// PSMs carry no abundance columns.
    pub fn abundance_prefix(&self) -> Option<&'static str> {
        match self {
            TableKind::Protein => Some("protein"),
            TableKind::Peptide => Some("peptide"),
            TableKind::Psm => None,
            TableKind::SmallMolecule => Some("smallmolecule"),
        }
    }

    /// Human readable name
    pub fn name(&self) -> &'static str {
        match self {
            TableKind::Protein => "protein",
            TableKind::Peptide => "peptide",
            TableKind::Psm => "PSM",
            TableKind::SmallMolecule => "small molecule",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracks the high-water-mark section and the header lines seen so far.
///
/// ```
/// use mztab::section::{Section, SectionTracker};
///
/// let mut tracker = SectionTracker::new();
/// assert!(tracker.advance(Section::Metadata, 1).is_ok());
/// assert!(tracker.advance(Section::ProteinHeader, 2).is_ok());
/// assert!(tracker.advance(Section::Protein, 3).is_ok());
/// assert!(tracker.advance(Section::Metadata, 4).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SectionTracker {
    level: u8,
    highest: Section,
    headers: [bool; 4],
}

impl Default for SectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionTracker {
    /// A tracker positioned at the metadata section
    pub fn new() -> Self {
        Self {
            level: Section::Metadata.level(),
            highest: Section::Metadata,
            headers: [false; 4],
        }
    }

    /// The section of the line that last raised the high-water-mark
    pub fn highest(&self) -> Section {
        self.highest
    }

    /// True once the header line of `table` has been accepted
    pub fn has_header(&self, table: TableKind) -> bool {
        self.headers[table.index()]
    }

    /// Accept a line of `section` found on `line`.
    ///
    /// # Errors
    /// The fatal `HeaderLine`, `LineOrder` or `NoHeaderLine` error, checked
    /// in that order. The tracker is left unchanged when a line is rejected.
    pub fn advance(&mut self, section: Section, line: usize) -> Result<(), MzTabError> {
        if section == Section::Comment {
            return Ok(());
        }

        let header_seen = section.table().map(|table| self.headers[table.index()]);
        if section.is_header() && header_seen == Some(true) {
            return Err(MzTabError::new(logical::HEADER_LINE, line, &[&section]));
        }

        if section.level() < self.level {
            return Err(MzTabError::new(
                logical::LINE_ORDER,
                line,
                &[&section, &self.highest],
            ));
        }

        if let (Some(table), Some(false)) = (section.table(), header_seen) {
            if section.is_data() {
                return Err(MzTabError::new(
                    logical::NO_HEADER_LINE,
                    line,
                    &[&section, &table.header()],
                ));
            }
        }

        if let Some(table) = section.table() {
            self.headers[table.index()] = true;
            // A header moves the mark straight to its data level
            self.level = table.data().level();
        } else {
            self.level = section.level();
        }
        self.highest = section;
        Ok(())
    }
}
