use std::collections::BTreeSet;

use crate::error::{format, MzTabError};
use crate::file::{Record, Table};
use crate::metadata::{Metadata, MetadataParser};
use crate::schema::ColumnSchema;
use crate::section::TableKind;
use crate::values::{parse_value, CellValue};

/// Parses the lines of one section into its model.
///
/// Problems found on a line are pushed to `issues`; they never stop the
/// parse. Structural violations are caught earlier by the section tracker.
pub trait SectionParser {
    /// Parse one line split on tabs, prefix included
    fn parse_line(&mut self, line: usize, fields: &[&str], issues: &mut Vec<MzTabError>);
}

impl SectionParser for MetadataParser {
    fn parse_line(&mut self, line: usize, fields: &[&str], issues: &mut Vec<MzTabError>) {
        MetadataParser::parse_line(self, line, fields, issues);
    }
}

/// Parses the data lines of one table against the schema built from its header
#[derive(Debug)]
pub struct TableParser {
    table: Table,
    ms_runs: BTreeSet<usize>,
}

impl TableParser {
    /// Build the schema from a header line, prefix included
    pub fn from_header(
        kind: TableKind,
        line: usize,
        fields: &[&str],
        metadata: &Metadata,
        issues: &mut Vec<MzTabError>,
    ) -> Self {
        let tokens = fields.get(1..).unwrap_or_default();
        let (schema, schema_issues) = ColumnSchema::build(kind, tokens, metadata, line);
        issues.extend(schema_issues);
        Self {
            table: Table::new(schema),
            ms_runs: metadata.ms_runs.keys().copied().collect(),
        }
    }

    /// The schema of this table
    pub fn schema(&self) -> &ColumnSchema {
        &self.table.schema
    }

    /// Hand out the parsed table
    pub fn into_table(self) -> Table {
        self.table
    }

    fn parse_cell(&self, line: usize, fields: &[&str], index: usize, issues: &mut Vec<MzTabError>) -> CellValue {
        let column = &self.table.schema.columns()[index];
        let text = fields[column.position + 1].trim();
        match parse_value(column.value_type, text) {
            Ok(CellValue::Null) => {
                if !column.nullable {
                    issues.push(MzTabError::new(format::NOT_NULL, line, &[&column.header]));
                }
                CellValue::Null
            }
            Ok(CellValue::SpectraRefs(refs)) => {
                if let Some(undeclared) = refs.iter().find(|r| !self.ms_runs.contains(&r.ms_run)) {
                    let detail = format!("ms_run[{}] is not declared in the metadata", undeclared.ms_run);
                    issues.push(MzTabError::new(
                        format::SPECTRA_REF,
                        line,
                        &[&column.header, &text, &detail],
                    ));
                }
                CellValue::SpectraRefs(refs)
            }
            Ok(value) => value,
            Err(e) => {
                issues.push(MzTabError::new(
                    e.error_type,
                    line,
                    &[&column.header, &text, &e.detail],
                ));
                CellValue::Missing
            }
        }
    }
}

impl SectionParser for TableParser {
    fn parse_line(&mut self, line: usize, fields: &[&str], issues: &mut Vec<MzTabError>) {
        let expected = self.table.schema.width() + 1;
        if fields.len() != expected {
            issues.push(MzTabError::new(
                format::COUNT_MATCH,
                line,
                &[&fields.len(), &expected],
            ));
            return;
        }

        let cells = (0..self.table.schema.columns().len())
            .map(|index| self.parse_cell(line, fields, index, issues))
            .collect();
        self.table.records.insert(line, Record { line, cells });
    }
}
