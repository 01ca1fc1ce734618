//! The fixed catalog of error types.
//!
//! Format errors use codes 1xxx, logical errors 2xxx. Cross-check errors
//! (3xxx) are reserved for [`crate::CrossCheck`] implementations and none are
//! built in.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::{Category, ErrorType, Level};

const fn format_error(code: u16, name: &'static str, level: Level, template: &'static str) -> ErrorType {
    ErrorType {
        code,
        name,
        category: Category::Format,
        level,
        template,
    }
}

const fn logical_error(code: u16, name: &'static str, level: Level, template: &'static str) -> ErrorType {
    ErrorType {
        code,
        name,
        category: Category::Logical,
        level,
        template,
    }
}

/// Errors raised when a single field or line does not follow its grammar
pub mod format {
    use super::{format_error, ErrorType, Level};

    /// The first field of a line is not a known section prefix
    pub const LINE_PREFIX: ErrorType = format_error(
        1001,
        "LinePrefix",
        Level::Error,
        "Line prefix \"{0}\" is not a recognised mzTab section prefix",
    );
    /// Wrong number of fields on a line
    pub const COUNT_MATCH: ErrorType = format_error(
        1002,
        "CountMatch",
        Level::Error,
        "Line has {0} fields but {1} were expected",
    );
    /// A malformed `element[id]` construct
    pub const INDEXED_ELEMENT: ErrorType = format_error(
        1003,
        "IndexedElement",
        Level::Error,
        "\"{0}\" is not a valid indexed element: {1}",
    );
    /// Unknown metadata key
    pub const METADATA_KEY: ErrorType = format_error(
        1004,
        "MetadataKey",
        Level::Error,
        "Metadata key \"{0}\" is not defined by mzTab",
    );
    /// Invalid `mzTab-mode`
    pub const MZTAB_MODE: ErrorType = format_error(
        1005,
        "MzTabMode",
        Level::Error,
        "mzTab-mode \"{0}\" must be Summary or Complete",
    );
    /// Invalid `mzTab-type`
    pub const MZTAB_TYPE: ErrorType = format_error(
        1006,
        "MzTabType",
        Level::Error,
        "mzTab-type \"{0}\" must be Identification or Quantification",
    );
    /// Invalid integer
    pub const INTEGER: ErrorType = format_error(
        1007,
        "Integer",
        Level::Error,
        "{0} \"{1}\" is not a valid integer",
    );
    /// Invalid double
    pub const DOUBLE: ErrorType = format_error(
        1008,
        "Double",
        Level::Error,
        "{0} \"{1}\" is not a valid double",
    );
    /// Invalid boolean
    pub const BOOLEAN: ErrorType = format_error(
        1009,
        "Boolean",
        Level::Error,
        "{0} \"{1}\" is not a valid boolean, expected 0 or 1",
    );
    /// Invalid `[label, accession, name, value]` parameter
    pub const PARAM: ErrorType = format_error(
        1010,
        "Param",
        Level::Error,
        "{0} \"{1}\" is not a valid parameter: {2}",
    );
    /// Invalid `|` separated parameter list
    pub const PARAM_LIST: ErrorType = format_error(
        1011,
        "ParamList",
        Level::Error,
        "{0} \"{1}\" is not a valid parameter list: {2}",
    );
    /// Invalid `|` separated string list
    pub const STRING_LIST: ErrorType = format_error(
        1012,
        "StringList",
        Level::Error,
        "{0} \"{1}\" is not a valid string list",
    );
    /// Invalid URI
    pub const URI: ErrorType = format_error(
        1013,
        "URI",
        Level::Error,
        "{0} \"{1}\" is not a valid URI: {2}",
    );
    /// Invalid email address
    pub const EMAIL: ErrorType = format_error(
        1014,
        "Email",
        Level::Error,
        "{0} \"{1}\" is not a valid email address",
    );
    /// Invalid publication list
    pub const PUBLICATION: ErrorType = format_error(
        1015,
        "Publication",
        Level::Error,
        "{0} \"{1}\" is not a valid publication, expected pubmed:<id> or doi:<id> items",
    );
    /// Invalid GO term list
    pub const GO_TERM_LIST: ErrorType = format_error(
        1016,
        "GoTermList",
        Level::Error,
        "{0} \"{1}\" is not a valid GO term list",
    );
    /// Invalid reliability
    pub const RELIABILITY: ErrorType = format_error(
        1017,
        "Reliability",
        Level::Error,
        "{0} \"{1}\" is not a valid reliability, expected 1, 2 or 3",
    );
    /// Invalid spectra reference
    pub const SPECTRA_REF: ErrorType = format_error(
        1018,
        "SpectraRef",
        Level::Error,
        "{0} \"{1}\" is not a valid spectra reference: {2}",
    );
    /// Invalid modification list
    pub const MODIFICATION_LIST: ErrorType = format_error(
        1019,
        "ModificationList",
        Level::Error,
        "{0} \"{1}\" is not a valid modification list: {2}",
    );
    /// Invalid `|` separated list of doubles
    pub const DOUBLE_LIST: ErrorType = format_error(
        1020,
        "DoubleList",
        Level::Error,
        "{0} \"{1}\" is not a valid list of doubles",
    );
    /// Invalid reference to an indexed metadata element
    pub const INDEXED_REF: ErrorType = format_error(
        1021,
        "IndexedRef",
        Level::Error,
        "{0} \"{1}\" is not a valid reference to {2}[n]",
    );
    /// Invalid `colunit-*` value
    pub const COLUMN_UNIT: ErrorType = format_error(
        1022,
        "ColumnUnit",
        Level::Error,
        "{0} \"{1}\" is not a valid column unit, expected <column>=<parameter>",
    );
    /// Mandatory stable column missing from a header
    pub const STABLE_COLUMN: ErrorType = format_error(
        1023,
        "StableColumn",
        Level::Error,
        "Mandatory column \"{0}\" is missing from the {1} header",
    );
    /// Abundance column required by the metadata is missing from a header
    pub const ABUNDANCE_COLUMN: ErrorType = format_error(
        1024,
        "AbundanceColumn",
        Level::Error,
        "Abundance column \"{0}\" is missing from the {1} header",
    );
    /// Score or ms-run column required by the metadata is missing from a header
    pub const INDEXED_COLUMN: ErrorType = format_error(
        1025,
        "IndexedColumn",
        Level::Error,
        "Column \"{0}\" is missing from the {1} header",
    );
    /// Header token matches no column definition
    pub const UNKNOWN_COLUMN: ErrorType = format_error(
        1026,
        "UnknownColumn",
        Level::Error,
        "Column \"{0}\" is not defined for the {1} section",
    );
    /// Header token appears twice
    pub const DUPLICATED_COLUMN: ErrorType = format_error(
        1027,
        "DuplicatedColumn",
        Level::Error,
        "Column \"{0}\" appears more than once in the {1} header",
    );
    /// Indexed column refers to an element the metadata does not declare
    pub const UNDECLARED_INDEX: ErrorType = format_error(
        1028,
        "UndeclaredIndex",
        Level::Warn,
        "Column \"{0}\" refers to {1}[{2}] which is not declared in the metadata",
    );
    /// `null` in a column that requires a value
    pub const NOT_NULL: ErrorType = format_error(
        1029,
        "NotNull",
        Level::Error,
        "Column \"{0}\" must not be null",
    );
    /// Invalid amino acid sequence
    pub const SEQUENCE: ErrorType = format_error(
        1030,
        "Sequence",
        Level::Error,
        "{0} \"{1}\" is not a valid amino acid sequence",
    );
}

/// Errors raised when well-formed content breaks a cross-field or cross-line rule
pub mod logical {
    use super::{logical_error, ErrorType, Level};

    /// A section appears after a later one
    pub const LINE_ORDER: ErrorType = logical_error(
        2001,
        "LineOrder",
        Level::Error,
        "{0} line cannot appear after a {1} line",
    );
    /// A section header appears twice
    pub const HEADER_LINE: ErrorType = logical_error(
        2002,
        "HeaderLine",
        Level::Error,
        "{0} header line is defined more than once",
    );
    /// A data line without its header
    pub const NO_HEADER_LINE: ErrorType = logical_error(
        2003,
        "NoHeaderLine",
        Level::Error,
        "{0} line appears before its {1} header line",
    );
    /// Unexpected failure while handling a single line
    pub const EXCEPTION: ErrorType = logical_error(
        2004,
        "Exception",
        Level::Error,
        "Unexpected failure while parsing line: {0}",
    );
    /// A metadata property is set twice
    pub const DUPLICATE_DEFINITION: ErrorType = logical_error(
        2005,
        "DuplicateDefinition",
        Level::Error,
        "Metadata property \"{0}\" is defined more than once",
    );
    /// A mandatory metadata property is missing
    pub const MANDATORY_METADATA: ErrorType = logical_error(
        2006,
        "MandatoryMetadata",
        Level::Error,
        "Mandatory metadata \"{0}\" is not defined",
    );
    /// An `opt_` column with a scope that is not global, assay, study variable or ms run
    pub const OPTIONAL_COLUMN_SCOPE: ErrorType = logical_error(
        2007,
        "OptionalColumnScope",
        Level::Warn,
        "Optional column \"{0}\" has an unrecognised scope \"{1}\"",
    );
}

pub(super) const ALL: &[ErrorType] = &[
    format::LINE_PREFIX,
    format::COUNT_MATCH,
    format::INDEXED_ELEMENT,
    format::METADATA_KEY,
    format::MZTAB_MODE,
    format::MZTAB_TYPE,
    format::INTEGER,
    format::DOUBLE,
    format::BOOLEAN,
    format::PARAM,
    format::PARAM_LIST,
    format::STRING_LIST,
    format::URI,
    format::EMAIL,
    format::PUBLICATION,
    format::GO_TERM_LIST,
    format::RELIABILITY,
    format::SPECTRA_REF,
    format::MODIFICATION_LIST,
    format::DOUBLE_LIST,
    format::INDEXED_REF,
    format::COLUMN_UNIT,
    format::STABLE_COLUMN,
    format::ABUNDANCE_COLUMN,
    format::INDEXED_COLUMN,
    format::UNKNOWN_COLUMN,
    format::DUPLICATED_COLUMN,
    format::UNDECLARED_INDEX,
    format::NOT_NULL,
    format::SEQUENCE,
    logical::LINE_ORDER,
    logical::HEADER_LINE,
    logical::NO_HEADER_LINE,
    logical::EXCEPTION,
    logical::DUPLICATE_DEFINITION,
    logical::MANDATORY_METADATA,
    logical::OPTIONAL_COLUMN_SCOPE,
];

static STANDARD: LazyLock<ErrorCatalog> = LazyLock::new(|| ErrorCatalog::from_types(ALL));

/// Read-only lookup of error types by code
#[derive(Debug, Clone)]
pub struct ErrorCatalog {
    by_code: HashMap<u16, ErrorType>,
}

impl ErrorCatalog {
    /// The built-in catalog, created on first use
    pub fn standard() -> &'static ErrorCatalog {
        &STANDARD
    }

    /// Build a catalog from a table of types; later duplicates of a code are ignored
    pub fn from_types(types: &[ErrorType]) -> Self {
        let mut by_code = HashMap::with_capacity(types.len());
        for error_type in types {
            by_code.entry(error_type.code).or_insert(*error_type);
        }
        Self { by_code }
    }

    /// Find the type with the given code
    pub fn lookup(&self, code: u16) -> Option<&ErrorType> {
        self.by_code.get(&code)
    }

    /// Number of catalogued types
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// True if the catalog holds no types
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// All catalogued types ordered by code
    pub fn types(&self) -> Vec<&ErrorType> {
        let mut types: Vec<_> = self.by_code.values().collect();
        types.sort_by_key(|t| t.code);
        types
    }
}
