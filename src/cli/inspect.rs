use anyhow::{Context, Result};
use std::path::PathBuf;

use mztab::config::ValidatorConfig;
use mztab::metadata::{Metadata, ModificationDef};
use mztab::param::known_terms;
use mztab::parser::{MzTabParser, NoProgress};
use mztab::report::ValidationReport;
use mztab::schema::ColumnKind;

/// Display the metadata and tables of an mzTab file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let parser = MzTabParser::new(ValidatorConfig::errors_only());
    let outcome = parser
        .parse_file(&file, &NoProgress)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let Some(mztab) = outcome.file() else {
        let report = ValidationReport::from_outcome(file.display().to_string(), &outcome);
        eprintln!("{}", report);
        std::process::exit(1);
    };

    println!("mzTab File Information");
    println!("======================");
    println!("File: {}", file.display());
    println!();

    print_metadata(&mztab.metadata);

    println!("Tables:");
    for (kind, table) in mztab.tables() {
        let schema = &table.schema;
        let optional = schema.columns_of(ColumnKind::Optional).count();
        println!(
            "  {:<15} {:>8} records, {:>3} columns ({} optional)",
            kind.name(),
            table.len(),
            schema.width(),
            optional
        );
    }
    if !mztab.comments.is_empty() {
        println!();
        println!("Comments: {}", mztab.comments.len());
    }

    Ok(())
}

fn print_metadata(metadata: &Metadata) {
    let unset = || "<unset>".to_string();

    println!("Metadata:");
    println!("  Version: {}", metadata.version.clone().unwrap_or_else(unset));
    println!(
        "  Mode: {}",
        metadata.mode.map(|m| m.to_string()).unwrap_or_else(unset)
    );
    println!(
        "  Type: {}",
        metadata.mztab_type.map(|t| t.to_string()).unwrap_or_else(unset)
    );
    if let Some(id) = &metadata.id {
        println!("  ID: {}", id);
    }
    if let Some(title) = &metadata.title {
        println!("  Title: {}", title);
    }
    println!("  MS runs: {}", metadata.ms_runs.len());
    for run in metadata.ms_runs.values() {
        println!(
            "    ms_run[{}]: {}",
            run.id,
            run.location.clone().unwrap_or_else(unset)
        );
    }
    println!("  Samples: {}", metadata.samples.len());
    println!("  Assays: {}", metadata.assays.len());
    println!("  Study variables: {}", metadata.study_variables.len());
    println!(
        "  Fixed modifications: {}",
        describe_mods(metadata.fixed_mods.values(), known_terms::NO_FIXED_MODIFICATIONS)
    );
    println!(
        "  Variable modifications: {}",
        describe_mods(
            metadata.variable_mods.values(),
            known_terms::NO_VARIABLE_MODIFICATIONS
        )
    );
    for (table, scores) in &metadata.search_engine_scores {
        for (id, score) in scores {
            println!("  {} search engine score[{}]: {}", table, id, score.name);
        }
    }
    println!();
}

/// Modification names, or "none searched" for the term that declares no modifications
fn describe_mods<'a>(mods: impl Iterator<Item = &'a ModificationDef>, none_term: &str) -> String {
    let names: Vec<&str> = mods
        .filter_map(|m| m.param.as_ref())
        .filter(|p| p.accession != none_term)
        .map(|p| p.name.as_str())
        .collect();
    if names.is_empty() {
        "none searched".to_string()
    } else {
        names.join(", ")
    }
}
