//! # Column Schema
//!
//! The columns of an mzTab table are not fixed: besides the stable columns of
//! each table, a header carries one column per declared search engine score,
//! per ms run (in `Complete` mode), per assay and study variable (in
//! `Quantification` files), and any number of `opt_` columns chosen by the
//! producing tool.
//!
//! A [`ColumnSchema`] is therefore derived once per table and file, from the
//! header line and the finished [`Metadata`](crate::metadata::Metadata), by
//! [`ColumnSchema::build`]. It is never changed afterwards.
//!
//! ## Column families
//!
//! | Family | Example | Kind |
//! |--------|---------|------|
//! | stable | `accession` | [`ColumnKind::Stable`] |
//! | search engine score | `best_search_engine_score[1]`, `search_engine_score[1]_ms_run[2]` | [`ColumnKind::Indexed`] |
//! | ms run counts | `num_psms_ms_run[1]` | [`ColumnKind::Indexed`] |
//! | abundance | `protein_abundance_assay[3]`, `peptide_abundance_stdev_study_variable[1]` | [`ColumnKind::Abundance`] |
//! | optional | `opt_global_cv_MS:1002217_decoy_peptide`, `opt_assay[1]_ratio` | [`ColumnKind::Optional`] |
//!
//! Positions in the [`PositionMapping`] count from the first column after the
//! line prefix: position 0 is the second field of a data line.

mod builder;
pub mod columns;


use std::collections::BTreeMap;

use serde::Serialize;

use crate::section::TableKind;
use crate::values::ValueType;

/// Family of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnKind {
    /// Present in every file
    Stable,
    /// One per declared search engine score or ms run
    Indexed,
    /// One per declared assay or study variable
    Abundance,
    /// `opt_` column chosen by the producing tool
    Optional,
}

/// A metadata element a column refers to, e.g. `assay[3]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ElementRef {
    /// Element name, e.g. `assay`
    pub element: String,
    /// 1-based id
    pub id: usize,
}

/// One accepted header column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// The header token
    pub header: String,
    /// Logical name: the header with its indices removed
    pub name: String,
    /// Column family
    pub kind: ColumnKind,
    /// Grammar of the cells
    pub value_type: ValueType,
    /// Required by the metadata or by the table definition
    pub mandatory: bool,
    /// Cells may hold `null`
    pub nullable: bool,
    /// Position after the line prefix
    pub position: usize,
    /// Elements referenced by the column's indices
    pub references: Vec<ElementRef>,
}

/// Header token to position mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PositionMapping {
    positions: BTreeMap<String, usize>,
}

impl PositionMapping {
    /// Position of a header token
    pub fn position(&self, header: &str) -> Option<usize> {
        self.positions.get(header).copied()
    }

    /// True if the token was accepted
    pub fn contains(&self, header: &str) -> bool {
        self.positions.contains_key(header)
    }

    /// Number of mapped tokens
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True if no token is mapped
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Mapped tokens and their positions, ordered by token
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.positions.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn insert(&mut self, header: String, position: usize) {
        self.positions.insert(header, position);
    }
}

/// The realised columns of one table in one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSchema {
    table: TableKind,
    width: usize,
    columns: Vec<Column>,
    mapping: PositionMapping,
}

impl ColumnSchema {
    /// The table this schema describes
    pub fn table(&self) -> TableKind {
        self.table
    }

    /// Number of header tokens after the prefix, recognised or not.
    /// Data lines must carry the same number of fields.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Accepted columns in header order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Accepted columns of one family, in header order
    pub fn columns_of(&self, kind: ColumnKind) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(move |c| c.kind == kind)
    }

    /// The column with the given header token
    pub fn column(&self, header: &str) -> Option<&Column> {
        let position = self.mapping.position(header)?;
        self.columns.iter().find(|c| c.position == position)
    }

    /// Header token to position mapping
    pub fn mapping(&self) -> &PositionMapping {
        &self.mapping
    }
}
