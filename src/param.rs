//! # Controlled Vocabulary Parameters
//!
//! mzTab writes controlled vocabulary (CV) terms and user parameters as
//! bracketed four-field tuples:
//!
//! ```text
//! [MS, MS:1001207, Mascot, 2.3]     CV parameter with a value
//! [PRIDE, PRIDE:0000114, iTRAQ, ]   CV parameter without a value
//! [, , my parameter, 42]            user parameter
//! ```
//!
//! A field that contains a comma must be enclosed in double quotes.
//!
//! ## Reference
//! - mzTab 1.0 format description, section 5.3 "Parameters"
//! - HUPO-PSI MS CV: https://github.com/HUPO-PSI/psi-ms-CV

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A CV parameter or user parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    /// CV label (e.g., "MS"), empty for user parameters
    pub cv_label: String,
    /// CV accession (e.g., "MS:1001207"), empty for user parameters
    pub accession: String,
    /// Human-readable name
    pub name: String,
    /// Optional value
    pub value: Option<String>,
}

impl Param {
    /// Create a CV parameter without a value
    pub fn cv(cv_label: &str, accession: &str, name: &str) -> Self {
        Self {
            cv_label: cv_label.to_string(),
            accession: accession.to_string(),
            name: name.to_string(),
            value: None,
        }
    }

    /// Create a user parameter
    pub fn user(name: &str, value: impl ToString) -> Self {
        Self {
            cv_label: String::new(),
            accession: String::new(),
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }

    /// Add a value to the parameter
    pub fn with_value(mut self, value: impl ToString) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// True for parameters without a CV label and accession
    pub fn is_user_param(&self) -> bool {
        self.cv_label.is_empty() && self.accession.is_empty()
    }
}

fn write_field(f: &mut fmt::Formatter<'_>, field: &str) -> fmt::Result {
    if field.contains(',') {
        write!(f, "\"{}\"", field)
    } else {
        write!(f, "{}", field)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        write_field(f, &self.cv_label)?;
        write!(f, ", ")?;
        write_field(f, &self.accession)?;
        write!(f, ", ")?;
        write_field(f, &self.name)?;
        write!(f, ", ")?;
        write_field(f, self.value.as_deref().unwrap_or_default())?;
        write!(f, "]")
    }
}

/// Reasons a parameter does not parse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    /// Missing the enclosing square brackets
    #[error("a parameter must be enclosed in '[' and ']'")]
    NotBracketed,

    /// Not exactly four fields
    #[error("a parameter needs 4 comma separated fields but {0} were found")]
    FieldCount(usize),

    /// Unbalanced double quote in a field
    #[error("unterminated double quote")]
    UnterminatedQuote,

    /// The name field is empty
    #[error("the parameter name is empty")]
    MissingName,

    /// Exactly one of CV label and accession is empty
    #[error("a CV parameter needs both a CV label and an accession")]
    IncompleteCv,

    /// An empty entry in a `|` separated list
    #[error("the list contains an empty entry")]
    EmptyEntry,
}

/// Split `text` on `separator` where the separator is not inside double quotes
fn split_quoted(text: &str, separator: char) -> Result<Vec<String>, ParamError> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for c in text.chars() {
        if c == '"' {
            quoted = !quoted;
        } else if c == separator && !quoted {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    if quoted {
        return Err(ParamError::UnterminatedQuote);
    }
    fields.push(current);
    Ok(fields)
}

/// Split `text` on `separator` where the separator is not inside square brackets
pub(crate) fn split_outside_brackets(text: &str, separator: char) -> Vec<&str> {
    let mut depth: usize = 0;
    let mut last = 0;
    let mut fields = Vec::new();
    for (index, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                fields.push(&text[last..index]);
                last = index + c.len_utf8();
            }
            _ => {}
        }
    }
    fields.push(&text[last..]);
    fields
}

impl FromStr for Param {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let inner = s
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or(ParamError::NotBracketed)?;

        let fields = split_quoted(inner, ',')?;
        if fields.len() != 4 {
            return Err(ParamError::FieldCount(fields.len()));
        }
        let mut fields = fields.into_iter().map(|f| f.trim().to_string());
        let cv_label = fields.next().unwrap_or_default();
        let accession = fields.next().unwrap_or_default();
        let name = fields.next().unwrap_or_default();
        let value = fields.next().filter(|v| !v.is_empty());

        if name.is_empty() {
            return Err(ParamError::MissingName);
        }
        if cv_label.is_empty() != accession.is_empty() {
            return Err(ParamError::IncompleteCv);
        }

        Ok(Self {
            cv_label,
            accession,
            name,
            value,
        })
    }
}

/// Parse a `|` separated list of parameters
pub fn parse_param_list(s: &str) -> Result<Vec<Param>, ParamError> {
    split_outside_brackets(s.trim(), '|')
        .into_iter()
        .map(|item| {
            if item.trim().is_empty() {
                Err(ParamError::EmptyEntry)
            } else {
                item.parse()
            }
        })
        .collect()
}

/// Well-known terms that carry meaning for mzTab validation
pub mod known_terms {
    /// MS:1002453 - No fixed modifications searched
    pub const NO_FIXED_MODIFICATIONS: &str = "MS:1002453";
    /// MS:1002454 - No variable modifications searched
    pub const NO_VARIABLE_MODIFICATIONS: &str = "MS:1002454";
}
