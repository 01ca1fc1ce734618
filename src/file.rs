//! The validated content of an mzTab file.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::metadata::Metadata;
use crate::schema::ColumnSchema;
use crate::section::TableKind;
use crate::values::CellValue;

/// One data line parsed against its table's schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Line the record was read from
    pub line: usize,
    /// Cell values in the order of [`ColumnSchema::columns`]
    pub cells: Vec<CellValue>,
}

/// A `COM` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    /// Line number
    pub line: usize,
    /// Text after the prefix
    pub text: String,
}

/// One table of a file: its schema and records keyed by line number
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// Schema built from the header line
    pub schema: ColumnSchema,
    /// Records keyed by line number
    pub records: BTreeMap<usize, Record>,
}

impl Table {
    /// An empty table with the given schema
    pub fn new(schema: ColumnSchema) -> Self {
        Self {
            schema,
            records: BTreeMap::new(),
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the table has a header but no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The value of `header` in `record`, if the column was mapped
    pub fn value<'a>(&self, record: &'a Record, header: &str) -> Option<&'a CellValue> {
        let index = self
            .schema
            .columns()
            .iter()
            .position(|c| c.header == header)?;
        record.cells.get(index)
    }
}

/// A fully validated mzTab file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MzTabFile {
    /// The metadata section
    pub metadata: Metadata,
    /// Comment lines in file order
    pub comments: Vec<Comment>,
    tables: BTreeMap<TableKind, Table>,
}

impl MzTabFile {
    pub(crate) fn new(metadata: Metadata, comments: Vec<Comment>, tables: BTreeMap<TableKind, Table>) -> Self {
        Self {
            metadata,
            comments,
            tables,
        }
    }

    /// The table of the given kind, if the file has one
    pub fn table(&self, kind: TableKind) -> Option<&Table> {
        self.tables.get(&kind)
    }

    /// Protein table
    pub fn proteins(&self) -> Option<&Table> {
        self.table(TableKind::Protein)
    }

    /// Peptide table
    pub fn peptides(&self) -> Option<&Table> {
        self.table(TableKind::Peptide)
    }

    /// PSM table
    pub fn psms(&self) -> Option<&Table> {
        self.table(TableKind::Psm)
    }

    /// Small molecule table
    pub fn small_molecules(&self) -> Option<&Table> {
        self.table(TableKind::SmallMolecule)
    }

    /// Present tables in file order
    pub fn tables(&self) -> impl Iterator<Item = (TableKind, &Table)> {
        self.tables.iter().map(|(k, v)| (*k, v))
    }
}
