use std::collections::HashSet;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use super::columns::{stable_columns, StableColumnDef};
use super::{Column, ColumnKind, ColumnSchema, ElementRef, PositionMapping};
use crate::error::{format, logical, ErrorType, MzTabError};
use crate::metadata::Metadata;
use crate::section::TableKind;
use crate::values::ValueType;

static BEST_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^best_search_engine_score\[(\d+)\]$").expect("valid pattern"));
static SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^search_engine_score\[(\d+)\]$").expect("valid pattern"));
static SCORE_PER_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^search_engine_score\[(\d+)\]_ms_run\[(\d+)\]$").expect("valid pattern")
});
static RUN_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^num_(psms|peptides_distinct|peptides_unique)_ms_run\[(\d+)\]$")
        .expect("valid pattern")
});
static ABUNDANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(protein|peptide|smallmolecule)_abundance_(assay|study_variable|stdev_study_variable|std_error_study_variable)\[(\d+)\]$",
    )
    .expect("valid pattern")
});
static OPTIONAL_SCOPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(global|(assay|study_variable|ms_run)\[(\d+)\])_(.+)$").expect("valid pattern")
});

/// Metadata element that declares the search engine scores of a table
fn score_element(table: TableKind) -> &'static str {
    match table {
        TableKind::Protein => "protein_search_engine_score",
        TableKind::Peptide => "peptide_search_engine_score",
        TableKind::Psm => "psm_search_engine_score",
        TableKind::SmallMolecule => "smallmolecule_search_engine_score",
    }
}

/// A classified header token, before it gets a position
struct ColumnSpec {
    name: String,
    kind: ColumnKind,
    value_type: ValueType,
    mandatory: bool,
    nullable: bool,
    references: Vec<ElementRef>,
}

impl ColumnSpec {
    fn stable(def: &StableColumnDef) -> Self {
        Self {
            name: def.name.to_string(),
            kind: ColumnKind::Stable,
            value_type: def.value_type,
            mandatory: def.mandatory,
            nullable: def.nullable,
            references: Vec::new(),
        }
    }

    fn indexed(name: impl Into<String>, kind: ColumnKind, value_type: ValueType, references: Vec<ElementRef>) -> Self {
        Self {
            name: name.into(),
            kind,
            value_type,
            mandatory: false,
            nullable: true,
            references,
        }
    }
}

fn element(element: &str, id: usize) -> ElementRef {
    ElementRef {
        element: element.to_string(),
        id,
    }
}

/// Classifies header tokens of one table, collecting problems on the way
struct Classifier<'a> {
    table: TableKind,
    line: usize,
    issues: &'a mut Vec<MzTabError>,
}

impl Classifier<'_> {
    fn reject(&mut self, error_type: ErrorType, args: &[&dyn std::fmt::Display]) -> Option<ColumnSpec> {
        self.issues.push(MzTabError::new(error_type, self.line, args));
        None
    }

    fn unknown(&mut self, token: &str) -> Option<ColumnSpec> {
        let table = self.table;
        self.reject(format::UNKNOWN_COLUMN, &[&token, &table])
    }

    fn id(&mut self, token: &str, text: &str) -> Option<usize> {
        match text.parse::<usize>() {
            Ok(id) if id > 0 => Some(id),
            _ => {
                let detail = format!("index \"{}\" must be a positive integer", text);
                self.reject(format::INDEXED_ELEMENT, &[&token, &detail]);
                None
            }
        }
    }

    fn classify(&mut self, token: &str) -> Option<ColumnSpec> {
        let table = self.table;
        if let Some(def) = stable_columns(table).iter().find(|d| d.name == token) {
            return Some(ColumnSpec::stable(def));
        }
        if let Some(rest) = token.strip_prefix("opt_") {
            return Some(self.optional(token, rest));
        }

        if let Some(captures) = BEST_SCORE.captures(token) {
            if table == TableKind::Psm {
                return self.unknown(token);
            }
            let id = self.id(token, &captures[1])?;
            return Some(ColumnSpec::indexed(
                "best_search_engine_score",
                ColumnKind::Indexed,
                ValueType::Double,
                vec![element(score_element(table), id)],
            ));
        }
        if let Some(captures) = SCORE_PER_RUN.captures(token) {
            if table == TableKind::Psm {
                return self.unknown(token);
            }
            let score = self.id(token, &captures[1])?;
            let run = self.id(token, &captures[2])?;
            return Some(ColumnSpec::indexed(
                "search_engine_score_ms_run",
                ColumnKind::Indexed,
                ValueType::Double,
                vec![element(score_element(table), score), element("ms_run", run)],
            ));
        }
        if let Some(captures) = SCORE.captures(token) {
            if table != TableKind::Psm {
                return self.unknown(token);
            }
            let id = self.id(token, &captures[1])?;
            return Some(ColumnSpec::indexed(
                "search_engine_score",
                ColumnKind::Indexed,
                ValueType::Double,
                vec![element(score_element(table), id)],
            ));
        }
        if let Some(captures) = RUN_COUNT.captures(token) {
            if table != TableKind::Protein {
                return self.unknown(token);
            }
            let run = self.id(token, &captures[2])?;
            return Some(ColumnSpec::indexed(
                format!("num_{}_ms_run", &captures[1]),
                ColumnKind::Indexed,
                ValueType::Integer,
                vec![element("ms_run", run)],
            ));
        }
        if let Some(captures) = ABUNDANCE.captures(token) {
            if table.abundance_prefix() != Some(&captures[1]) {
                return self.unknown(token);
            }
            let id = self.id(token, &captures[3])?;
            let target = if &captures[2] == "assay" {
                "assay"
            } else {
                "study_variable"
            };
            return Some(ColumnSpec::indexed(
                format!("{}_abundance_{}", &captures[1], &captures[2]),
                ColumnKind::Abundance,
                ValueType::Double,
                vec![element(target, id)],
            ));
        }

        if token.contains('[') {
            let detail = "not a recognised indexed column";
            self.reject(format::INDEXED_ELEMENT, &[&token, &detail])
        } else {
            self.unknown(token)
        }
    }

    /// `opt_<scope>_<name>`; a malformed scope is a warning and the column is kept
    fn optional(&mut self, token: &str, rest: &str) -> ColumnSpec {
        let mut references = Vec::new();
        match OPTIONAL_SCOPE.captures(rest) {
            Some(captures) => {
                if let (Some(name), Some(id)) = (captures.get(2), captures.get(3)) {
                    match id.as_str().parse::<usize>() {
                        Ok(id) if id > 0 => references.push(element(name.as_str(), id)),
                        _ => {
                            self.reject(logical::OPTIONAL_COLUMN_SCOPE, &[&token, &&captures[1]]);
                        }
                    }
                }
            }
            None => {
                let scope = rest.split('_').next().unwrap_or_default();
                self.reject(logical::OPTIONAL_COLUMN_SCOPE, &[&token, &scope]);
            }
        }
        ColumnSpec::indexed(token, ColumnKind::Optional, ValueType::String, references)
    }
}

/// Header tokens the metadata requires in `table`, with the error raised when one is missing
fn required_columns(table: TableKind, metadata: &Metadata) -> Vec<(String, ErrorType)> {
    let mut required = Vec::new();
    let scores = metadata.search_engine_score_ids(table);
    let runs: Vec<usize> = metadata.ms_runs.keys().copied().collect();

    for score in &scores {
        let header = if table == TableKind::Psm {
            format!("search_engine_score[{}]", score)
        } else {
            format!("best_search_engine_score[{}]", score)
        };
        required.push((header, format::INDEXED_COLUMN));
    }

    if metadata.is_complete() && table != TableKind::Psm {
        for score in &scores {
            for run in &runs {
                required.push((
                    format!("search_engine_score[{}]_ms_run[{}]", score, run),
                    format::INDEXED_COLUMN,
                ));
            }
        }
        if table == TableKind::Protein {
            for run in &runs {
                for count in ["psms", "peptides_distinct", "peptides_unique"] {
                    required.push((format!("num_{}_ms_run[{}]", count, run), format::INDEXED_COLUMN));
                }
            }
        }
    }

    if let (true, Some(prefix)) = (metadata.is_quantification(), table.abundance_prefix()) {
        if metadata.is_complete() {
            for assay in metadata.assays.keys() {
                required.push((
                    format!("{}_abundance_assay[{}]", prefix, assay),
                    format::ABUNDANCE_COLUMN,
                ));
            }
        }
        for variable in metadata.study_variables.keys() {
            for family in ["study_variable", "stdev_study_variable", "std_error_study_variable"] {
                required.push((
                    format!("{}_abundance_{}[{}]", prefix, family, variable),
                    format::ABUNDANCE_COLUMN,
                ));
            }
        }
    }
    required
}

fn is_declared(table: TableKind, metadata: &Metadata, reference: &ElementRef) -> bool {
    if reference.element == score_element(table) {
        metadata
            .search_engine_scores
            .get(&table)
            .is_some_and(|scores| scores.contains_key(&reference.id))
    } else {
        metadata.declares(&reference.element, reference.id)
    }
}

impl ColumnSchema {
    /// Build the schema of `table` from its header tokens (without the line
    /// prefix) and the finished metadata.
    ///
    /// Returns the schema together with every problem found in the header.
    /// Unrecognised and duplicated tokens are left out of the mapping but
    /// still count towards [`ColumnSchema::width`].
    pub fn build(
        table: TableKind,
        tokens: &[&str],
        metadata: &Metadata,
        line: usize,
    ) -> (ColumnSchema, Vec<MzTabError>) {
        let mut issues = Vec::new();
        let mut columns = Vec::new();
        let mut mapping = PositionMapping::default();

        let required = required_columns(table, metadata);
        let required_headers: HashSet<&str> = required.iter().map(|(h, _)| h.as_str()).collect();

        let mut classifier = Classifier {
            table,
            line,
            issues: &mut issues,
        };
        for (position, token) in tokens.iter().enumerate() {
            let token = token.trim();
            if mapping.contains(token) {
                classifier.reject(format::DUPLICATED_COLUMN, &[&token, &table]);
                continue;
            }
            let Some(found) = classifier.classify(token) else {
                continue;
            };
            for reference in &found.references {
                if !is_declared(table, metadata, reference) {
                    classifier.reject(
                        format::UNDECLARED_INDEX,
                        &[&token, &reference.element, &reference.id],
                    );
                }
            }
            mapping.insert(token.to_string(), position);
            columns.push(Column {
                header: token.to_string(),
                name: found.name,
                kind: found.kind,
                value_type: found.value_type,
                mandatory: found.mandatory || required_headers.contains(token),
                nullable: found.nullable,
                position,
                references: found.references,
            });
        }

        for def in stable_columns(table).iter().filter(|d| d.mandatory) {
            if !mapping.contains(def.name) {
                issues.push(MzTabError::new(format::STABLE_COLUMN, line, &[&def.name, &table]));
            }
        }
        for (header, error_type) in &required {
            if !mapping.contains(header) {
                issues.push(MzTabError::new(*error_type, line, &[header, &table]));
            }
        }

        debug!(
            "Built {} schema at line {}: {} of {} header columns mapped",
            table,
            line,
            mapping.len(),
            tokens.len()
        );

        let schema = ColumnSchema {
            table,
            width: tokens.len(),
            columns,
            mapping,
        };
        (schema, issues)
    }
}
