use std::collections::HashSet;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use super::model::{
    Assay, Contact, CvDefinition, IndexMap, Instrument, Metadata, ModificationDef, Mode, MsRun,
    MzTabType, Publication, Sample, Software, StudyVariable, ColumnUnit,
};
use crate::error::{format, logical, MzTabError};
use crate::param::Param;
use crate::section::TableKind;
use crate::values::{parse_value, CellValue, PublicationItem, ValueType};

/// `element[id]` optionally followed by `-sub-property`
static INDEXED_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_]+)\[([^\]]*)\](?:-(.+))?$").expect("valid pattern")
});

/// `name`, `name[id]` or `name[id]-rest` within a sub-property
static SUB_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_]+)(?:\[([^\]]*)\])?(?:-(.+))?$").expect("valid pattern")
});

static INDEXED_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z_]+)\[(\d+)\]$").expect("valid pattern"));

fn entity<T>(map: &mut IndexMap<T>, id: usize, make: impl FnOnce(usize) -> T) -> &mut T {
    map.entry(id).or_insert_with(|| make(id))
}

/// A metadata value together with the key and line it came from
struct Value<'a> {
    key: &'a str,
    text: &'a str,
    line: usize,
}

impl Value<'_> {
    /// Parse against `value_type`; `null` and grammar failures yield `None`,
    /// the latter with an error pushed to `issues`
    fn parse(&self, value_type: ValueType, issues: &mut Vec<MzTabError>) -> Option<CellValue> {
        match parse_value(value_type, self.text) {
            Ok(CellValue::Null) => None,
            Ok(value) => Some(value),
            Err(e) => {
                issues.push(MzTabError::new(
                    e.error_type,
                    self.line,
                    &[&self.key, &self.text, &e.detail],
                ));
                None
            }
        }
    }

    fn param(&self, issues: &mut Vec<MzTabError>) -> Option<Param> {
        match self.parse(ValueType::Param, issues)? {
            CellValue::Param(param) => Some(param),
            _ => None,
        }
    }

    fn params(&self, issues: &mut Vec<MzTabError>) -> Option<Vec<Param>> {
        match self.parse(ValueType::ParamList, issues)? {
            CellValue::ParamList(params) => Some(params),
            _ => None,
        }
    }

    fn text(&self) -> Option<String> {
        let text = self.text.trim();
        (!text.is_empty() && text != crate::values::NULL).then(|| text.to_string())
    }

    fn uri(&self, issues: &mut Vec<MzTabError>) -> Option<String> {
        match self.parse(ValueType::Uri, issues)? {
            CellValue::Uri(uri) => Some(uri),
            _ => None,
        }
    }

    fn email(&self, issues: &mut Vec<MzTabError>) -> Option<String> {
        match self.parse(ValueType::Email, issues)? {
            CellValue::Email(email) => Some(email),
            _ => None,
        }
    }

    fn publications(&self, issues: &mut Vec<MzTabError>) -> Option<Vec<PublicationItem>> {
        match self.parse(ValueType::Publication, issues)? {
            CellValue::Publications(items) => Some(items),
            _ => None,
        }
    }

    /// Comma separated `element[n]` references
    fn refs(&self, element: &str, issues: &mut Vec<MzTabError>) -> Option<Vec<usize>> {
        let text = self.text.trim();
        if text == crate::values::NULL {
            return None;
        }
        let ids: Option<Vec<usize>> = text
            .split(',')
            .map(|part| {
                let captures = INDEXED_REF.captures(part.trim())?;
                let id: usize = captures[2].parse().ok()?;
                (&captures[1] == element && id > 0).then_some(id)
            })
            .collect();
        if ids.is_none() {
            issues.push(MzTabError::new(
                format::INDEXED_REF,
                self.line,
                &[&self.key, &self.text, &element],
            ));
        }
        ids
    }

    fn single_ref(&self, element: &str, issues: &mut Vec<MzTabError>) -> Option<usize> {
        match self.refs(element, issues)?.as_slice() {
            [id] => Some(*id),
            _ => {
                issues.push(MzTabError::new(
                    format::INDEXED_REF,
                    self.line,
                    &[&self.key, &self.text, &element],
                ));
                None
            }
        }
    }
}

/// Split `name[id]-rest` within a sub-property
struct SubKey<'a> {
    name: &'a str,
    index: Option<usize>,
    rest: Option<&'a str>,
}

fn parse_index(key: &str, text: &str) -> Result<usize, MzTabError> {
    match text.trim().parse::<usize>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(MzTabError::new(
            format::INDEXED_ELEMENT,
            0,
            &[&key, &format!("index \"{}\" must be a positive integer", text)],
        )),
    }
}

fn parse_sub_key<'a>(key: &str, sub: &'a str) -> Result<SubKey<'a>, MzTabError> {
    let captures = SUB_KEY
        .captures(sub)
        .ok_or_else(|| MzTabError::new(format::METADATA_KEY, 0, &[&key]))?;
    let index = match captures.get(2) {
        Some(index) => Some(parse_index(key, index.as_str())?),
        None => None,
    };
    Ok(SubKey {
        name: captures.get(1).map_or("", |m| m.as_str()),
        index,
        rest: captures.get(3).map(|m| m.as_str()),
    })
}

fn table_from_name(name: &str) -> Option<TableKind> {
    match name {
        "protein" => Some(TableKind::Protein),
        "peptide" => Some(TableKind::Peptide),
        "psm" => Some(TableKind::Psm),
        "small_molecule" | "smallmolecule" => Some(TableKind::SmallMolecule),
        _ => None,
    }
}

/// Builds a [`Metadata`] from `MTD` lines.
///
/// Each property may be defined once; entities are created on the first line
/// that references their id, before the value of that line is checked.
///
/// # Example
///
/// ```
/// use mztab::metadata::MetadataParser;
///
/// let mut parser = MetadataParser::new();
/// let mut issues = Vec::new();
/// parser.parse_line(1, &["MTD", "mzTab-version", "1.0.0"], &mut issues);
/// parser.parse_line(2, &["MTD", "ms_run[1]-location", "file:///data/a.mzML"], &mut issues);
/// assert!(issues.is_empty());
/// assert_eq!(parser.metadata().ms_runs.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MetadataParser {
    metadata: Metadata,
    defined: HashSet<String>,
}

impl MetadataParser {
    /// Create a parser with empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// The metadata built so far
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Parse one `MTD` line split on tabs.
    ///
    /// Every problem is recoverable and pushed to `issues`; the property is
    /// left unset when its value does not parse.
    pub fn parse_line(&mut self, line: usize, fields: &[&str], issues: &mut Vec<MzTabError>) {
        // Trailing empty fields, as left by a trailing tab, are tolerated
        let extra_values = fields.iter().skip(3).any(|f| !f.trim().is_empty());
        if fields.len() < 3 || extra_values {
            issues.push(MzTabError::new(format::COUNT_MATCH, line, &[&fields.len(), &3]));
            return;
        }
        let key = fields[1].trim();
        if self.defined.contains(key) {
            issues.push(MzTabError::new(logical::DUPLICATE_DEFINITION, line, &[&key]));
            return;
        }

        let value = Value {
            key,
            text: fields[2].trim(),
            line,
        };
        match self.apply(&value, issues) {
            Ok(()) => {
                self.defined.insert(key.to_string());
            }
            Err(mut error) => {
                error.line = line;
                issues.push(error);
            }
        }
    }

    /// Check the mandatory properties and hand out the finished metadata.
    ///
    /// `line` is the line on which the metadata section ended.
    pub fn finish(self, line: usize, issues: &mut Vec<MzTabError>) -> Metadata {
        let metadata = self.metadata;
        let mut missing = |name: &str| {
            issues.push(MzTabError::new(logical::MANDATORY_METADATA, line, &[&name]));
        };

        if !self.defined.contains("mzTab-version") {
            missing("mzTab-version");
        }
        if !self.defined.contains("mzTab-mode") {
            missing("mzTab-mode");
        }
        if !self.defined.contains("mzTab-type") {
            missing("mzTab-type");
        }
        if !self.defined.contains("description") {
            missing("description");
        }
        if metadata.ms_runs.is_empty() {
            missing("ms_run[1]-location");
        }
        for run in metadata.ms_runs.values() {
            if run.location.is_none() {
                missing(&format!("ms_run[{}]-location", run.id));
            }
        }

        debug!(
            "Metadata section closed at line {}: {} ms runs, {} assays, {} study variables",
            line,
            metadata.ms_runs.len(),
            metadata.assays.len(),
            metadata.study_variables.len()
        );
        metadata
    }

    fn apply(&mut self, value: &Value<'_>, issues: &mut Vec<MzTabError>) -> Result<(), MzTabError> {
        let key = value.key;
        let md = &mut self.metadata;
        match key {
            "mzTab-version" => md.version = value.text(),
            "mzTab-mode" => match Mode::parse(value.text) {
                Some(mode) => md.mode = Some(mode),
                None => issues.push(MzTabError::new(format::MZTAB_MODE, value.line, &[&value.text])),
            },
            "mzTab-type" => match MzTabType::parse(value.text) {
                Some(t) => md.mztab_type = Some(t),
                None => issues.push(MzTabError::new(format::MZTAB_TYPE, value.line, &[&value.text])),
            },
            "mzTab-ID" => md.id = value.text(),
            "title" => md.title = value.text(),
            "description" => md.description = value.text(),
            "quantification_method" => md.quantification_method = value.param(issues),
            "false_discovery_rate" => md.false_discovery_rate = value.params(issues).unwrap_or_default(),
            _ => {
                if let Some(table) = key
                    .strip_suffix("-quantification_unit")
                    .and_then(table_from_name)
                    .filter(|t| *t != TableKind::Psm)
                {
                    if let Some(unit) = value.param(issues) {
                        md.quantification_units.insert(table, unit);
                    }
                } else if let Some(name) = key.strip_prefix("colunit-") {
                    let table = table_from_name(name)
                        .ok_or_else(|| MzTabError::new(format::METADATA_KEY, 0, &[&key]))?;
                    self.column_unit(table, value, issues);
                } else {
                    self.indexed(value, issues)?;
                }
            }
        }
        Ok(())
    }

    fn column_unit(&mut self, table: TableKind, value: &Value<'_>, issues: &mut Vec<MzTabError>) {
        let parsed = value.text.split_once('=').and_then(|(column, unit)| {
            let column = column.trim();
            let unit: Param = unit.trim().parse().ok()?;
            (!column.is_empty()).then(|| (column.to_string(), unit))
        });
        match parsed {
            Some((column, unit)) => self.metadata.column_units.push(ColumnUnit { table, column, unit }),
            None => issues.push(MzTabError::new(
                format::COLUMN_UNIT,
                value.line,
                &[&value.key, &value.text],
            )),
        }
    }

    fn indexed(&mut self, value: &Value<'_>, issues: &mut Vec<MzTabError>) -> Result<(), MzTabError> {
        let key = value.key;
        let unknown = || MzTabError::new(format::METADATA_KEY, 0, &[&key]);
        let captures = INDEXED_KEY.captures(key).ok_or_else(unknown)?;
        let element = captures.get(1).map_or("", |m| m.as_str());
        let id = parse_index(key, &captures[2])?;
        let sub = match captures.get(3) {
            Some(sub) => Some(parse_sub_key(key, sub.as_str())?),
            None => None,
        };
        let md = &mut self.metadata;

        match (element, sub) {
            ("sample_processing", None) => {
                let steps = entity(&mut md.sample_processing, id, |_| Vec::new());
                *steps = value.params(issues).unwrap_or_default();
            }
            ("instrument", Some(sub)) => {
                let slot = match (sub.name, sub.index, sub.rest) {
                    ("name", None, None) => 0,
                    ("source", None, None) => 1,
                    ("detector", None, None) => 2,
                    ("analyzer", Some(_), None) => 3,
                    _ => return Err(unknown()),
                };
                let instrument = entity(&mut md.instruments, id, |id| Instrument {
                    id,
                    ..Default::default()
                });
                let param = value.param(issues);
                match (slot, sub.index) {
                    (0, _) => instrument.name = param,
                    (1, _) => instrument.source = param,
                    (2, _) => instrument.detector = param,
                    (_, Some(index)) => {
                        if let Some(param) = param {
                            instrument.analyzers.insert(index, param);
                        }
                    }
                    _ => {}
                }
            }
            ("software", None) => {
                let software = entity(&mut md.software, id, |id| Software {
                    id,
                    ..Default::default()
                });
                software.param = value.param(issues);
            }
            ("software", Some(SubKey { name: "setting", index: Some(index), rest: None })) => {
                let software = entity(&mut md.software, id, |id| Software {
                    id,
                    ..Default::default()
                });
                if let Some(setting) = value.text() {
                    software.settings.insert(index, setting);
                }
            }
            (score, None) if score.ends_with("_search_engine_score") => {
                let table = score
                    .strip_suffix("_search_engine_score")
                    .and_then(table_from_name)
                    .ok_or_else(unknown)?;
                if let Some(param) = value.param(issues) {
                    md.search_engine_scores.entry(table).or_default().insert(id, param);
                }
            }
            ("publication", None) => {
                let publication = entity(&mut md.publications, id, |id| Publication {
                    id,
                    ..Default::default()
                });
                publication.items = value.publications(issues).unwrap_or_default();
            }
            ("contact", Some(sub)) if sub.index.is_none() && sub.rest.is_none() => {
                if !matches!(sub.name, "name" | "affiliation" | "email") {
                    return Err(unknown());
                }
                let contact = entity(&mut md.contacts, id, |id| Contact {
                    id,
                    ..Default::default()
                });
                match sub.name {
                    "name" => contact.name = value.text(),
                    "affiliation" => contact.affiliation = value.text(),
                    _ => contact.email = value.email(issues),
                }
            }
            ("uri", None) => {
                if let Some(uri) = value.uri(issues) {
                    md.uris.insert(id, uri);
                }
            }
            ("external_study_uri", None) => {
                if let Some(uri) = value.uri(issues) {
                    md.external_study_uris.insert(id, uri);
                }
            }
            ("fixed_mod" | "variable_mod", sub) => {
                let map = if element == "fixed_mod" {
                    &mut md.fixed_mods
                } else {
                    &mut md.variable_mods
                };
                modification_property(map, id, sub, value, issues).ok_or_else(unknown)?;
            }
            ("ms_run", Some(sub)) if sub.index.is_none() && sub.rest.is_none() => {
                if !matches!(
                    sub.name,
                    "format" | "location" | "id_format" | "fragmentation_method" | "hash" | "hash_method"
                ) {
                    return Err(unknown());
                }
                let run = entity(&mut md.ms_runs, id, |id| MsRun {
                    id,
                    ..Default::default()
                });
                match sub.name {
                    "format" => run.format = value.param(issues),
                    "location" => run.location = value.uri(issues),
                    "id_format" => run.id_format = value.param(issues),
                    "fragmentation_method" => {
                        run.fragmentation_method = value.params(issues).unwrap_or_default()
                    }
                    "hash" => run.hash = value.text(),
                    _ => run.hash_method = value.param(issues),
                }
            }
            ("custom", None) => {
                if let Some(param) = value.param(issues) {
                    md.custom.insert(id, param);
                }
            }
            ("sample", Some(sub)) if sub.rest.is_none() => {
                let indexed = matches!(sub.name, "species" | "tissue" | "cell_type" | "disease" | "custom");
                match (indexed, sub.index, sub.name) {
                    (true, Some(_), _) | (false, None, "description") => {}
                    _ => return Err(unknown()),
                }
                let sample = entity(&mut md.samples, id, |id| Sample {
                    id,
                    ..Default::default()
                });
                match (sub.name, sub.index) {
                    ("description", _) => sample.description = value.text(),
                    (name, Some(index)) => {
                        let target = match name {
                            "species" => &mut sample.species,
                            "tissue" => &mut sample.tissue,
                            "cell_type" => &mut sample.cell_type,
                            "disease" => &mut sample.disease,
                            _ => &mut sample.custom,
                        };
                        if let Some(param) = value.param(issues) {
                            target.insert(index, param);
                        }
                    }
                    _ => {}
                }
            }
            ("assay", Some(sub)) => {
                match (sub.name, sub.index, sub.rest) {
                    ("quantification_reagent" | "sample_ref" | "ms_run_ref", None, None) => {}
                    ("quantification_mod", Some(_), None | Some("site") | Some("position")) => {}
                    _ => return Err(unknown()),
                }
                let assay = entity(&mut md.assays, id, |id| Assay {
                    id,
                    ..Default::default()
                });
                match (sub.name, sub.index) {
                    ("quantification_reagent", _) => {
                        assay.quantification_reagent = value.param(issues)
                    }
                    ("sample_ref", _) => assay.sample_ref = value.single_ref("sample", issues),
                    ("ms_run_ref", _) => assay.ms_run_ref = value.single_ref("ms_run", issues),
                    (_, Some(index)) => {
                        let sub_property = sub.rest.map(|rest| SubKey {
                            name: rest,
                            index: None,
                            rest: None,
                        });
                        modification_property(
                            &mut assay.quantification_mods,
                            index,
                            sub_property,
                            value,
                            issues,
                        )
                        .ok_or_else(unknown)?;
                    }
                    _ => {}
                }
            }
            ("study_variable", Some(sub)) if sub.index.is_none() && sub.rest.is_none() => {
                if !matches!(sub.name, "assay_refs" | "sample_refs" | "description") {
                    return Err(unknown());
                }
                let variable = entity(&mut md.study_variables, id, |id| StudyVariable {
                    id,
                    ..Default::default()
                });
                match sub.name {
                    "assay_refs" => variable.assay_refs = value.refs("assay", issues).unwrap_or_default(),
                    "sample_refs" => {
                        variable.sample_refs = value.refs("sample", issues).unwrap_or_default()
                    }
                    _ => variable.description = value.text(),
                }
            }
            ("cv", Some(sub)) if sub.index.is_none() && sub.rest.is_none() => {
                if !matches!(sub.name, "label" | "full_name" | "version" | "url") {
                    return Err(unknown());
                }
                let cv = entity(&mut md.cvs, id, |id| CvDefinition {
                    id,
                    ..Default::default()
                });
                match sub.name {
                    "label" => cv.label = value.text(),
                    "full_name" => cv.full_name = value.text(),
                    "version" => cv.version = value.text(),
                    _ => cv.url = value.uri(issues),
                }
            }
            _ => return Err(unknown()),
        }
        Ok(())
    }
}

/// Set a property of a fixed, variable or quantification modification.
/// Returns `None` for an unknown sub-property.
fn modification_property(
    map: &mut IndexMap<ModificationDef>,
    id: usize,
    sub: Option<SubKey<'_>>,
    value: &Value<'_>,
    issues: &mut Vec<MzTabError>,
) -> Option<()> {
    let name = match &sub {
        None => None,
        Some(SubKey { name, index: None, rest: None }) if matches!(*name, "site" | "position") => {
            Some(*name)
        }
        Some(_) => return None,
    };
    let modification = entity(map, id, |id| ModificationDef {
        id,
        ..Default::default()
    });
    match name {
        None => modification.param = value.param(issues),
        Some("site") => modification.site = value.text(),
        Some(_) => modification.position = value.text(),
    }
    Some(())
}
