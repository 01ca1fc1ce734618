//! Integration tests for mztab
//!
//! These tests run whole files through the parser, from disk to report.

use std::fs;
use std::io::Write;
use std::sync::Mutex;

use flate2::write::GzEncoder;
use flate2::Compression;
use mztab::batch::{BatchConfig, BatchValidator, ReportFormat};
use mztab::config::ValidatorConfig;
use mztab::error::{format, logical, ErrorCatalog, ErrorList, Level};
use mztab::metadata::{Mode, MzTabType};
use mztab::parser::{Abort, MzTabParser, NoProgress, ParseOutcome};
use mztab::report::{ReportStatus, ValidationReport};
use mztab::schema::ColumnKind;
use mztab::section::TableKind;
use mztab::values::CellValue;
use tempfile::tempdir;

const QUANTIFICATION_METADATA: &[&str] = &[
    "MTD\tmzTab-version\t1.0.0",
    "MTD\tmzTab-mode\tComplete",
    "MTD\tmzTab-type\tQuantification",
    "MTD\tmzTab-ID\tPRIDE_1234",
    "MTD\tdescription\tLabel-free quantification of a serum sample",
    "MTD\tquantification_method\t[MS, MS:1001834, LC-MS label-free quantitation analysis, ]",
    "MTD\tprotein-quantification_unit\t[PRIDE, PRIDE:0000393, Relative quantification unit, ]",
    "MTD\tms_run[1]-location\tfile:///data/serum_run1.mzML",
    "MTD\tms_run[1]-format\t[MS, MS:1000584, mzML file, ]",
    "MTD\tprotein_search_engine_score[1]\t[MS, MS:1001171, Mascot:score, ]",
    "MTD\tfixed_mod[1]\t[UNIMOD, UNIMOD:4, Carbamidomethyl, ]",
    "MTD\tfixed_mod[1]-site\tC",
    "MTD\tvariable_mod[1]\t[MS, MS:1002454, No variable modifications searched, ]",
    "MTD\tassay[1]-quantification_reagent\t[MS, MS:1002038, unlabeled sample, ]",
    "MTD\tassay[1]-ms_run_ref\tms_run[1]",
    "MTD\tstudy_variable[1]-assay_refs\tassay[1]",
    "MTD\tstudy_variable[1]-description\tserum",
];

const PROTEIN_HEADER: &[&str] = &[
    "PRH",
    "accession",
    "description",
    "taxid",
    "species",
    "database",
    "database_version",
    "search_engine",
    "best_search_engine_score[1]",
    "search_engine_score[1]_ms_run[1]",
    "ambiguity_members",
    "modifications",
    "num_psms_ms_run[1]",
    "num_peptides_distinct_ms_run[1]",
    "num_peptides_unique_ms_run[1]",
    "protein_abundance_assay[1]",
    "protein_abundance_study_variable[1]",
    "protein_abundance_stdev_study_variable[1]",
    "protein_abundance_std_error_study_variable[1]",
    "opt_global_cv_MS:1002217_decoy_peptide",
];

const PROTEIN_ROWS: &[&[&str]] = &[
    &[
        "PRT",
        "P02768",
        "Serum albumin",
        "9606",
        "Homo sapiens",
        "UniProtKB",
        "2013_08",
        "[MS, MS:1001207, Mascot, ]",
        "46.2",
        "46.2",
        "null",
        "0",
        "12",
        "4",
        "3",
        "1.5E6",
        "1.5E6",
        "null",
        "null",
        "0",
    ],
    &[
        "PRT",
        "P01009",
        "Alpha-1-antitrypsin",
        "9606",
        "Homo sapiens",
        "UniProtKB",
        "2013_08",
        "[MS, MS:1001207, Mascot, ]",
        "31.9",
        "31.9",
        "P01011",
        "120-UNIMOD:35",
        "5",
        "2",
        "2",
        "INF",
        "NaN",
        "null",
        "null",
        "1",
    ],
];

fn join(fields: &[&str]) -> String {
    fields.join("\t")
}

fn quantification_file() -> String {
    let mut lines: Vec<String> = QUANTIFICATION_METADATA.iter().map(|l| l.to_string()).collect();
    lines.push("COM\tProteins quantified across one run".to_string());
    lines.push(join(PROTEIN_HEADER));
    lines.extend(PROTEIN_ROWS.iter().map(|row| join(row)));
    lines.join("\n") + "\n"
}

fn parse(text: &str) -> ParseOutcome {
    MzTabParser::new(ValidatorConfig::default())
        .parse_str(text, &NoProgress)
        .unwrap()
}

/// A complete quantification file parses into a typed model
#[test]
fn test_quantification_file_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("serum.mzTab");
    fs::write(&path, quantification_file()).unwrap();

    let outcome = MzTabParser::new(ValidatorConfig::default())
        .parse_file(&path, &NoProgress)
        .unwrap();
    assert!(outcome.is_valid(), "{:?}", outcome.errors());
    let file = outcome.into_file().unwrap();

    let metadata = &file.metadata;
    assert_eq!(metadata.mode, Some(Mode::Complete));
    assert_eq!(metadata.mztab_type, Some(MzTabType::Quantification));
    assert_eq!(metadata.id.as_deref(), Some("PRIDE_1234"));
    assert_eq!(metadata.assays[&1].ms_run_ref, Some(1));
    assert_eq!(metadata.study_variables[&1].assay_refs, vec![1]);
    assert_eq!(metadata.fixed_mods[&1].site.as_deref(), Some("C"));

    let proteins = file.proteins().unwrap();
    assert_eq!(proteins.len(), 2);
    assert_eq!(proteins.schema.width(), PROTEIN_HEADER.len() - 1);
    assert_eq!(proteins.schema.columns_of(ColumnKind::Abundance).count(), 4);
    assert_eq!(proteins.schema.mapping().position("protein_abundance_assay[1]"), Some(14));

    let first = &proteins.records[&20];
    assert_eq!(
        proteins.value(first, "accession"),
        Some(&CellValue::Text("P02768".to_string()))
    );
    assert_eq!(proteins.value(first, "num_psms_ms_run[1]"), Some(&CellValue::Integer(12)));
    let second = &proteins.records[&21];
    assert_eq!(
        proteins.value(second, "protein_abundance_assay[1]").and_then(CellValue::as_f64),
        Some(f64::INFINITY)
    );
    assert!(proteins
        .value(second, "protein_abundance_study_variable[1]")
        .and_then(CellValue::as_f64)
        .unwrap()
        .is_nan());

    assert_eq!(file.comments.len(), 1);
    assert!(file.table(TableKind::Peptide).is_none());
}

/// The same file compressed with gzip gives the same model
#[test]
fn test_gzip_input() {
    let dir = tempdir().unwrap();
    let plain = dir.path().join("serum.mzTab");
    let compressed = dir.path().join("serum.mzTab.gz");
    fs::write(&plain, quantification_file()).unwrap();

    let mut encoder = GzEncoder::new(fs::File::create(&compressed).unwrap(), Compression::best());
    encoder.write_all(quantification_file().as_bytes()).unwrap();
    encoder.finish().unwrap();

    let parser = MzTabParser::new(ValidatorConfig::default());
    let from_plain = parser.parse_file(&plain, &NoProgress).unwrap().into_file().unwrap();
    let from_gzip = parser.parse_file(&compressed, &NoProgress).unwrap().into_file().unwrap();
    assert_eq!(from_plain.metadata, from_gzip.metadata);
    assert_eq!(from_plain.comments, from_gzip.comments);

    // Records hold NaN, so compare the schema and the line numbers
    let (plain_proteins, gzip_proteins) = (from_plain.proteins().unwrap(), from_gzip.proteins().unwrap());
    assert_eq!(plain_proteins.schema, gzip_proteins.schema);
    assert!(plain_proteins.records.keys().eq(gzip_proteins.records.keys()));
}

/// Missing abundance columns are reported against the header line
#[test]
fn test_missing_abundance_column() {
    let header: Vec<&str> = PROTEIN_HEADER
        .iter()
        .copied()
        .filter(|c| *c != "protein_abundance_assay[1]")
        .collect();
    let mut lines: Vec<String> = QUANTIFICATION_METADATA.iter().map(|l| l.to_string()).collect();
    lines.push(join(&header));
    let outcome = parse(&(lines.join("\n") + "\n"));

    let errors = outcome.errors().unwrap();
    assert_eq!(errors.len(), 1);
    let error = errors.iter().next().unwrap();
    assert_eq!(error.error_type, format::ABUNDANCE_COLUMN);
    assert_eq!(error.line, 18);
}

/// Recoverable cell errors do not stop validation of later lines
#[test]
fn test_cell_errors_accumulate() {
    let mut text = quantification_file();
    let mut bad_row: Vec<&str> = PROTEIN_ROWS[0].to_vec();
    bad_row[1] = "null";
    bad_row[3] = "human";
    bad_row[12] = "twelve";
    text.push_str(&join(&bad_row));
    text.push('\n');

    let outcome = parse(&text);
    assert!(outcome.abort().is_none());
    let errors = outcome.errors().unwrap();
    let codes: Vec<u16> = errors.iter().map(|e| e.error_type.code).collect();
    assert_eq!(
        codes,
        vec![format::NOT_NULL.code, format::INTEGER.code, format::INTEGER.code]
    );
    assert!(errors.iter().all(|e| e.line == 22));
}

/// A fatal error keeps the errors found before it
#[test]
fn test_fatal_error_keeps_earlier_errors() {
    let mut lines: Vec<String> = QUANTIFICATION_METADATA.iter().map(|l| l.to_string()).collect();
    lines.push("MTD\tmzTab-mode\tPartial".to_string());
    lines.push(join(PROTEIN_HEADER));
    lines.push("PEP\tPEPTIDE".to_string());
    lines.push("PRT\tP02768".to_string());
    let outcome = parse(&(lines.join("\n") + "\n"));

    let errors = outcome.errors().unwrap();
    let codes: Vec<u16> = errors.iter().map(|e| e.error_type.code).collect();
    assert_eq!(
        codes,
        vec![logical::DUPLICATE_DEFINITION.code, logical::NO_HEADER_LINE.code]
    );
    assert!(matches!(outcome.abort(), Some(Abort::Structural(e)) if e.line == 20));
}

/// Rendered reports parse back into the same errors
#[test]
fn test_rendered_errors_round_trip() {
    let text = "MTD\tmzTab-version\t1.0.0\nMTD\tmzTab-mode\tSummary\nMTD\tms_run[0]-location\tfile:///a\n";
    let outcome = parse(text);
    let errors = outcome.errors().unwrap();

    let mut rendered = Vec::new();
    errors.render(&mut rendered).unwrap();
    let rendered = String::from_utf8(rendered).unwrap();
    let parsed = ErrorList::parse_rendered(&rendered, ErrorCatalog::standard());
    assert_eq!(parsed, errors.iter().cloned().collect::<Vec<_>>());

    let report = ValidationReport::from_outcome("broken.mzTab", &outcome);
    assert_eq!(report.status, ReportStatus::Invalid);
    assert_eq!(report.count(Level::Error), errors.len());
}

/// Batch mode validates every file and reports unreadable ones
#[test]
fn test_batch_validation() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.mzTab");
    let bad = dir.path().join("bad.mzTab");
    fs::write(&good, quantification_file()).unwrap();
    fs::write(&bad, "PRT\tP02768\n").unwrap();
    let files = vec![good, bad, dir.path().join("absent.mzTab")];

    let validator = BatchValidator::new(
        MzTabParser::new(ValidatorConfig::errors_only()),
        BatchConfig {
            threads: 2,
            format: ReportFormat::Plain,
        },
    );
    let output = Mutex::new(Vec::new());
    let summary = validator.validate(&files, &output, &NoProgress).unwrap();

    assert_eq!(summary.valid_count(), 1);
    assert_eq!(summary.failed_count(), 2);
    let text = String::from_utf8(output.into_inner().unwrap()).unwrap();
    assert_eq!(text.matches("Outcome: VALID").count(), 1);
    assert_eq!(text.matches("Outcome: ABORTED").count(), 2);
}
