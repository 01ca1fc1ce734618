//! # Cell and Metadata Value Grammars
//!
//! Every table cell and metadata value is checked against the grammar of its
//! declared [`ValueType`]. A value that does not follow its grammar yields a
//! [`ValueError`] naming the catalogued error type; the caller records it and
//! keeps going with [`CellValue::Missing`] in its place.
//!
//! The literal `null` marks an absent value in every position and is never a
//! grammar violation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{format, ErrorType};
use crate::param::{parse_param_list, Param};

mod modification;

pub use modification::{parse_modification_list, Modification, ModificationIdentifier, ModificationPosition};

/// The mzTab marker for an absent value
pub const NULL: &str = "null";

/// Grammar a value is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    /// Free text
    String,
    /// Signed integer
    Integer,
    /// Decimal or scientific double, `NaN`, `INF`, `-INF`
    Double,
    /// `0` or `1`
    Boolean,
    /// `[label, accession, name, value]`
    Param,
    /// `|` separated parameters
    ParamList,
    /// `|` separated strings
    StringList,
    /// `|` separated doubles
    DoubleList,
    /// Absolute URI
    Uri,
    /// Email address
    Email,
    /// `|` separated `pubmed:` / `doi:` identifiers
    Publication,
    /// `|` separated GO accessions
    GoTermList,
    /// `1`, `2` or `3`
    Reliability,
    /// `|` separated `ms_run[n]:spectrum id` references
    SpectraRef,
    /// Comma separated modifications, or `0` for none
    ModificationList,
    /// Upper case amino acid letters
    Sequence,
}

/// The estimated reliability of an identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reliability {
    /// `1`
    High,
    /// `2`
    Medium,
    /// `3`
    Poor,
}

/// Reference to a spectrum in a declared ms run
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpectraRef {
    /// 1-based ms run id
    pub ms_run: usize,
    /// Native spectrum reference, e.g. `scan=1234`
    pub reference: String,
}

/// A publication identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublicationItem {
    /// PubMed id
    PubMed(String),
    /// Digital object identifier
    Doi(String),
}

/// A parsed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// The literal `null`
    Null,
    /// A value that failed its grammar
    Missing,
    /// Free text
    Text(String),
    /// Integer value
    Integer(i64),
    /// Double value
    Double(f64),
    /// Boolean value
    Boolean(bool),
    /// Single parameter
    Param(Param),
    /// Parameter list
    ParamList(Vec<Param>),
    /// String list
    StringList(Vec<String>),
    /// Double list
    DoubleList(Vec<f64>),
    /// URI
    Uri(String),
    /// Email address
    Email(String),
    /// Publication identifiers
    Publications(Vec<PublicationItem>),
    /// GO accessions
    GoTerms(Vec<String>),
    /// Reliability
    Reliability(Reliability),
    /// Spectra references
    SpectraRefs(Vec<SpectraRef>),
    /// Modifications
    Modifications(Vec<Modification>),
    /// Amino acid sequence
    Sequence(String),
}

impl CellValue {
    /// True for `null` and for values that failed their grammar
    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Null | CellValue::Missing)
    }

    /// The value as a double, if it is one; `Missing` reads as NaN
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Double(v) => Some(*v),
            CellValue::Integer(v) => Some(*v as f64),
            CellValue::Missing => Some(f64::NAN),
            _ => None,
        }
    }

    /// The value as text, if it is free text or a sequence
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) | CellValue::Sequence(s) | CellValue::Uri(s) | CellValue::Email(s) => Some(s),
            _ => None,
        }
    }
}

/// A value that does not follow the grammar of its type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    /// Catalogued error type, named after the value kind
    pub error_type: ErrorType,
    /// Explanation of the failure, used by templates with a third placeholder
    pub detail: String,
}

impl ValueError {
    fn new(error_type: ErrorType, detail: impl Into<String>) -> Self {
        Self {
            error_type,
            detail: detail.into(),
        }
    }
}

static GO_TERM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^GO:\d{7}$").expect("valid pattern"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid pattern"));
static SPECTRA_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ms_run\[(\d+)\]:(.+)$").expect("valid pattern"));
static SEQUENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]+$").expect("valid pattern"));

/// Parse a double, accepting the mzTab spellings `NaN`, `INF` and `-INF`
pub fn parse_double(text: &str) -> Option<f64> {
    match text {
        "NaN" => Some(f64::NAN),
        "INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        _ => text.parse().ok(),
    }
}

/// Parse an mzTab boolean
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text.to_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn parse_list<T>(
    text: &str,
    error_type: ErrorType,
    item: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, ValueError> {
    text.split('|')
        .map(|part| item(part.trim()).ok_or_else(|| ValueError::new(error_type, part.trim())))
        .collect()
}

fn parse_spectra_ref(text: &str) -> Result<SpectraRef, String> {
    let captures = SPECTRA_REF
        .captures(text)
        .ok_or_else(|| format!("\"{}\" is not of the form ms_run[n]:reference", text))?;
    let ms_run: usize = captures[1]
        .parse()
        .map_err(|_| format!("ms_run index \"{}\" is too large", &captures[1]))?;
    if ms_run == 0 {
        return Err("ms_run indices start at 1".to_string());
    }
    Ok(SpectraRef {
        ms_run,
        reference: captures[2].to_string(),
    })
}

/// Check `text` against the grammar of `value_type`.
///
/// `text` is trimmed first; `null` always parses to [`CellValue::Null`].
///
/// # Errors
/// A [`ValueError`] naming the error type of the value kind when the text does
/// not follow the grammar.
pub fn parse_value(value_type: ValueType, text: &str) -> Result<CellValue, ValueError> {
    let text = text.trim();
    if text == NULL {
        return Ok(CellValue::Null);
    }

    match value_type {
        ValueType::String => Ok(CellValue::Text(text.to_string())),
        ValueType::Integer => text
            .parse()
            .map(CellValue::Integer)
            .map_err(|e| ValueError::new(format::INTEGER, e.to_string())),
        ValueType::Double => parse_double(text)
            .map(CellValue::Double)
            .ok_or_else(|| ValueError::new(format::DOUBLE, text)),
        ValueType::Boolean => parse_boolean(text)
            .map(CellValue::Boolean)
            .ok_or_else(|| ValueError::new(format::BOOLEAN, text)),
        ValueType::Param => text
            .parse()
            .map(CellValue::Param)
            .map_err(|e: crate::param::ParamError| ValueError::new(format::PARAM, e.to_string())),
        ValueType::ParamList => parse_param_list(text)
            .map(CellValue::ParamList)
            .map_err(|e| ValueError::new(format::PARAM_LIST, e.to_string())),
        ValueType::StringList => {
            let items: Vec<String> = text.split('|').map(|s| s.trim().to_string()).collect();
            if items.iter().any(String::is_empty) {
                Err(ValueError::new(format::STRING_LIST, "empty entry"))
            } else {
                Ok(CellValue::StringList(items))
            }
        }
        ValueType::DoubleList => {
            parse_list(text, format::DOUBLE_LIST, parse_double).map(CellValue::DoubleList)
        }
        ValueType::Uri => url::Url::parse(text)
            .map(|_| CellValue::Uri(text.to_string()))
            .map_err(|e| ValueError::new(format::URI, e.to_string())),
        ValueType::Email => {
            if EMAIL.is_match(text) {
                Ok(CellValue::Email(text.to_string()))
            } else {
                Err(ValueError::new(format::EMAIL, text))
            }
        }
        ValueType::Publication => parse_list(text, format::PUBLICATION, |item| {
            if let Some(id) = item.strip_prefix("pubmed:") {
                (!id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
                    .then(|| PublicationItem::PubMed(id.to_string()))
            } else {
                item.strip_prefix("doi:")
                    .filter(|id| !id.is_empty())
                    .map(|id| PublicationItem::Doi(id.to_string()))
            }
        })
        .map(CellValue::Publications),
        ValueType::GoTermList => parse_list(text, format::GO_TERM_LIST, |item| {
            GO_TERM.is_match(item).then(|| item.to_string())
        })
        .map(CellValue::GoTerms),
        ValueType::Reliability => match text {
            "1" => Ok(CellValue::Reliability(Reliability::High)),
            "2" => Ok(CellValue::Reliability(Reliability::Medium)),
            "3" => Ok(CellValue::Reliability(Reliability::Poor)),
            _ => Err(ValueError::new(format::RELIABILITY, text)),
        },
        ValueType::SpectraRef => text
            .split('|')
            .map(|part| parse_spectra_ref(part.trim()))
            .collect::<Result<Vec<_>, _>>()
            .map(CellValue::SpectraRefs)
            .map_err(|detail| ValueError::new(format::SPECTRA_REF, detail)),
        ValueType::ModificationList => parse_modification_list(text)
            .map(CellValue::Modifications)
            .map_err(|detail| ValueError::new(format::MODIFICATION_LIST, detail)),
        ValueType::Sequence => {
            if SEQUENCE.is_match(text) {
                Ok(CellValue::Sequence(text.to_string()))
            } else {
                Err(ValueError::new(format::SEQUENCE, text))
            }
        }
    }
}
