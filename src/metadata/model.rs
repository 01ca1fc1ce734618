use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::param::Param;
use crate::section::TableKind;
use crate::values::PublicationItem;

/// Indexed sub-entities are kept in id order
pub type IndexMap<T> = BTreeMap<usize, T>;

/// `mzTab-mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Only the final results are reported
    Summary,
    /// Results are reported per ms run
    Complete,
}

impl Mode {
    pub(crate) fn parse(text: &str) -> Option<Self> {
        match text {
            "Summary" => Some(Mode::Summary),
            "Complete" => Some(Mode::Complete),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Summary => write!(f, "Summary"),
            Mode::Complete => write!(f, "Complete"),
        }
    }
}

/// `mzTab-type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MzTabType {
    /// Identification results only
    Identification,
    /// Identification and quantification results
    Quantification,
}

impl MzTabType {
    pub(crate) fn parse(text: &str) -> Option<Self> {
        match text {
            "Identification" => Some(MzTabType::Identification),
            "Quantification" => Some(MzTabType::Quantification),
            _ => None,
        }
    }
}

impl fmt::Display for MzTabType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MzTabType::Identification => write!(f, "Identification"),
            MzTabType::Quantification => write!(f, "Quantification"),
        }
    }
}

/// `ms_run[n]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MsRun {
    /// 1-based id
    pub id: usize,
    /// File format of the run
    pub format: Option<Param>,
    /// Location of the run file
    pub location: Option<String>,
    /// Format of the spectrum identifiers
    pub id_format: Option<Param>,
    /// Fragmentation methods
    pub fragmentation_method: Vec<Param>,
    /// Checksum of the run file
    pub hash: Option<String>,
    /// Checksum algorithm
    pub hash_method: Option<Param>,
}

/// `sample[n]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// 1-based id
    pub id: usize,
    /// `species[m]`
    pub species: IndexMap<Param>,
    /// `tissue[m]`
    pub tissue: IndexMap<Param>,
    /// `cell_type[m]`
    pub cell_type: IndexMap<Param>,
    /// `disease[m]`
    pub disease: IndexMap<Param>,
    /// Free text description
    pub description: Option<String>,
    /// `custom[m]`
    pub custom: IndexMap<Param>,
}

/// A modification declared in the metadata, with optional site and position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModificationDef {
    /// 1-based id
    pub id: usize,
    /// The modification
    pub param: Option<Param>,
    /// Amino acid or terminus the modification applies to
    pub site: Option<String>,
    /// `Anywhere`, `Protein N-term`, ...
    pub position: Option<String>,
}

/// `assay[n]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assay {
    /// 1-based id
    pub id: usize,
    /// Reagent used to label the sample
    pub quantification_reagent: Option<Param>,
    /// `quantification_mod[m]`
    pub quantification_mods: IndexMap<ModificationDef>,
    /// Id of the referenced `sample[n]`
    pub sample_ref: Option<usize>,
    /// Id of the referenced `ms_run[n]`
    pub ms_run_ref: Option<usize>,
}

/// `study_variable[n]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyVariable {
    /// 1-based id
    pub id: usize,
    /// Ids of the assays in this study variable
    pub assay_refs: Vec<usize>,
    /// Ids of the samples in this study variable
    pub sample_refs: Vec<usize>,
    /// Free text description
    pub description: Option<String>,
}

/// `instrument[n]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// 1-based id
    pub id: usize,
    /// Instrument name
    pub name: Option<Param>,
    /// Ion source
    pub source: Option<Param>,
    /// `analyzer[m]`
    pub analyzers: IndexMap<Param>,
    /// Detector
    pub detector: Option<Param>,
}

/// `software[n]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Software {
    /// 1-based id
    pub id: usize,
    /// Software name and version
    pub param: Option<Param>,
    /// `setting[m]`
    pub settings: IndexMap<String>,
}

/// `contact[n]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// 1-based id
    pub id: usize,
    /// Contact name
    pub name: Option<String>,
    /// Affiliation
    pub affiliation: Option<String>,
    /// Email address
    pub email: Option<String>,
}

/// `publication[n]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    /// 1-based id
    pub id: usize,
    /// PubMed and DOI identifiers
    pub items: Vec<PublicationItem>,
}

/// `cv[n]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CvDefinition {
    /// 1-based id
    pub id: usize,
    /// Label used in parameters, e.g. `MS`
    pub label: Option<String>,
    /// Full name of the vocabulary
    pub full_name: Option<String>,
    /// Version of the vocabulary
    pub version: Option<String>,
    /// Location of the vocabulary
    pub url: Option<String>,
}

/// Unit of a table column, declared with `colunit-<table>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnUnit {
    /// Table the column belongs to
    pub table: TableKind,
    /// Column header
    pub column: String,
    /// The unit
    pub unit: Param,
}

/// The metadata section of an mzTab file.
///
/// Built line by line by [`MetadataParser`](super::MetadataParser) and
/// read-only once the metadata section ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// `mzTab-version`
    pub version: Option<String>,
    /// `mzTab-mode`
    pub mode: Option<Mode>,
    /// `mzTab-type`
    pub mztab_type: Option<MzTabType>,
    /// `mzTab-ID`
    pub id: Option<String>,
    /// `title`
    pub title: Option<String>,
    /// `description`
    pub description: Option<String>,
    /// `quantification_method`
    pub quantification_method: Option<Param>,
    /// `<table>-quantification_unit`
    pub quantification_units: BTreeMap<TableKind, Param>,
    /// `false_discovery_rate`
    pub false_discovery_rate: Vec<Param>,
    /// `sample_processing[n]`
    pub sample_processing: IndexMap<Vec<Param>>,
    /// `instrument[n]`
    pub instruments: IndexMap<Instrument>,
    /// `software[n]`
    pub software: IndexMap<Software>,
    /// `<table>_search_engine_score[n]`
    pub search_engine_scores: BTreeMap<TableKind, IndexMap<Param>>,
    /// `publication[n]`
    pub publications: IndexMap<Publication>,
    /// `contact[n]`
    pub contacts: IndexMap<Contact>,
    /// `uri[n]`
    pub uris: IndexMap<String>,
    /// `external_study_uri[n]`
    pub external_study_uris: IndexMap<String>,
    /// `fixed_mod[n]`
    pub fixed_mods: IndexMap<ModificationDef>,
    /// `variable_mod[n]`
    pub variable_mods: IndexMap<ModificationDef>,
    /// `ms_run[n]`
    pub ms_runs: IndexMap<MsRun>,
    /// `custom[n]`
    pub custom: IndexMap<Param>,
    /// `sample[n]`
    pub samples: IndexMap<Sample>,
    /// `assay[n]`
    pub assays: IndexMap<Assay>,
    /// `study_variable[n]`
    pub study_variables: IndexMap<StudyVariable>,
    /// `cv[n]`
    pub cvs: IndexMap<CvDefinition>,
    /// `colunit-<table>`
    pub column_units: Vec<ColumnUnit>,
}

impl Metadata {
    /// True when the file reports quantification results
    pub fn is_quantification(&self) -> bool {
        self.mztab_type == Some(MzTabType::Quantification)
    }

    /// True when the file reports results per ms run
    pub fn is_complete(&self) -> bool {
        self.mode == Some(Mode::Complete)
    }

    /// Declared search engine score ids for a table
    pub fn search_engine_score_ids(&self, table: TableKind) -> Vec<usize> {
        self.search_engine_scores
            .get(&table)
            .map(|scores| scores.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Whether `element[id]` is declared, for the elements columns may refer to
    pub fn declares(&self, element: &str, id: usize) -> bool {
        match element {
            "ms_run" => self.ms_runs.contains_key(&id),
            "assay" => self.assays.contains_key(&id),
            "study_variable" => self.study_variables.contains_key(&id),
            "sample" => self.samples.contains_key(&id),
            _ => false,
        }
    }
}
