//! Stable columns of the four mzTab tables.
//!
//! Stable columns are present in every file regardless of its metadata. The
//! optional ones (`uri`, `reliability`, ...) are validated when present but
//! may be left out of the header.

use crate::section::TableKind;
use crate::values::ValueType;

/// A stable column of one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableColumnDef {
    /// Header token
    pub name: &'static str,
    /// Grammar of the cells
    pub value_type: ValueType,
    /// Must appear in the header
    pub mandatory: bool,
    /// Cells may hold `null`
    pub nullable: bool,
}

const fn required(name: &'static str, value_type: ValueType) -> StableColumnDef {
    StableColumnDef {
        name,
        value_type,
        mandatory: true,
        nullable: true,
    }
}

const fn not_null(name: &'static str, value_type: ValueType) -> StableColumnDef {
    StableColumnDef {
        name,
        value_type,
        mandatory: true,
        nullable: false,
    }
}

const fn optional(name: &'static str, value_type: ValueType) -> StableColumnDef {
    StableColumnDef {
        name,
        value_type,
        mandatory: false,
        nullable: true,
    }
}

/// Protein table (`PRH`/`PRT`)
pub const PROTEIN: &[StableColumnDef] = &[
    not_null("accession", ValueType::String),
    required("description", ValueType::String),
    required("taxid", ValueType::Integer),
    required("species", ValueType::String),
    required("database", ValueType::String),
    required("database_version", ValueType::String),
    required("search_engine", ValueType::ParamList),
    required("ambiguity_members", ValueType::StringList),
    required("modifications", ValueType::ModificationList),
    optional("uri", ValueType::Uri),
    optional("go_terms", ValueType::GoTermList),
    optional("protein_coverage", ValueType::Double),
    optional("reliability", ValueType::Reliability),
];

/// Peptide table (`PEH`/`PEP`)
pub const PEPTIDE: &[StableColumnDef] = &[
    not_null("sequence", ValueType::Sequence),
    required("accession", ValueType::String),
    required("unique", ValueType::Boolean),
    required("database", ValueType::String),
    required("database_version", ValueType::String),
    required("search_engine", ValueType::ParamList),
    required("modifications", ValueType::ModificationList),
    required("retention_time", ValueType::DoubleList),
    required("retention_time_window", ValueType::DoubleList),
    required("charge", ValueType::Integer),
    required("mass_to_charge", ValueType::Double),
    required("spectra_ref", ValueType::SpectraRef),
    optional("uri", ValueType::Uri),
    optional("reliability", ValueType::Reliability),
];

/// PSM table (`PSH`/`PSM`)
pub const PSM: &[StableColumnDef] = &[
    not_null("sequence", ValueType::Sequence),
    not_null("PSM_ID", ValueType::Integer),
    required("accession", ValueType::String),
    required("unique", ValueType::Boolean),
    required("database", ValueType::String),
    required("database_version", ValueType::String),
    required("search_engine", ValueType::ParamList),
    required("modifications", ValueType::ModificationList),
    required("retention_time", ValueType::DoubleList),
    required("charge", ValueType::Integer),
    required("exp_mass_to_charge", ValueType::Double),
    required("calc_mass_to_charge", ValueType::Double),
    required("spectra_ref", ValueType::SpectraRef),
    required("pre", ValueType::String),
    required("post", ValueType::String),
    required("start", ValueType::Integer),
    required("end", ValueType::Integer),
    optional("uri", ValueType::Uri),
    optional("reliability", ValueType::Reliability),
];

/// Small molecule table (`SMH`/`SML`)
pub const SMALL_MOLECULE: &[StableColumnDef] = &[
    required("identifier", ValueType::StringList),
    required("chemical_formula", ValueType::String),
    required("smiles", ValueType::StringList),
    required("inchi_key", ValueType::StringList),
    required("description", ValueType::String),
    required("exp_mass_to_charge", ValueType::Double),
    required("calc_mass_to_charge", ValueType::Double),
    required("charge", ValueType::Integer),
    required("retention_time", ValueType::DoubleList),
    required("taxid", ValueType::Integer),
    required("species", ValueType::String),
    required("database", ValueType::String),
    required("database_version", ValueType::String),
    required("spectra_ref", ValueType::SpectraRef),
    required("search_engine", ValueType::ParamList),
    required("modifications", ValueType::ModificationList),
    optional("uri", ValueType::Uri),
    optional("reliability", ValueType::Reliability),
];

/// Stable columns of `table`
pub fn stable_columns(table: TableKind) -> &'static [StableColumnDef] {
    match table {
        TableKind::Protein => PROTEIN,
        TableKind::Peptide => PEPTIDE,
        TableKind::Psm => PSM,
        TableKind::SmallMolecule => SMALL_MOLECULE,
    }
}
