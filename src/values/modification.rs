//! Modification list grammar.
//!
//! ```text
//! 0                                        no modifications
//! 3-UNIMOD:35                              single position
//! 3|4-MOD:00412                            ambiguous position
//! 3[MS, MS:1001876, modification probability, 0.8]|4[...]-UNIMOD:21
//! CHEMMOD:+159.93                          position-less
//! 1-SUBST:R                                substitution
//! 7-UNIMOD:21|[MS, MS:1001524, fragment neutral loss, 97.98]
//! [MS, MS:1001524, fragment neutral loss, 63.99]
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::param::{split_outside_brackets, Param};

/// A position of a modification with an optional reliability parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModificationPosition {
    /// 0 for the N-terminus, sequence length + 1 for the C-terminus
    pub position: usize,
    /// Localisation reliability
    pub reliability: Option<Param>,
}

/// What the modification is
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModificationIdentifier {
    /// `UNIMOD:<n>`
    Unimod(u32),
    /// `MOD:<n>` (PSI-MOD)
    PsiMod(u32),
    /// `CHEMMOD:<mass delta or formula>`
    ChemMod(String),
    /// `SUBST:<residues>`
    Substitution(String),
    /// A neutral loss written as a parameter
    NeutralLoss(Param),
}

/// One entry of a modification list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modification {
    /// Candidate positions, empty when unlocalised
    pub positions: Vec<ModificationPosition>,
    /// The modification
    pub identifier: ModificationIdentifier,
    /// A neutral loss reported alongside the modification
    pub neutral_loss: Option<Param>,
}

static POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(\[.*\])?$").expect("valid pattern"));

fn parse_positions(text: &str) -> Option<Vec<ModificationPosition>> {
    split_outside_brackets(text, '|')
        .into_iter()
        .map(|part| {
            let captures = POSITION.captures(part.trim())?;
            let position = captures[1].parse().ok()?;
            let reliability = match captures.get(2) {
                Some(param) => Some(param.as_str().parse().ok()?),
                None => None,
            };
            Some(ModificationPosition {
                position,
                reliability,
            })
        })
        .collect()
}

fn parse_identifier(text: &str) -> Result<ModificationIdentifier, String> {
    let text = text.trim();
    if text.starts_with('[') {
        return text
            .parse()
            .map(ModificationIdentifier::NeutralLoss)
            .map_err(|e| format!("invalid neutral loss: {}", e));
    }
    let (kind, value) = text
        .split_once(':')
        .ok_or_else(|| format!("\"{}\" is not a modification identifier", text))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("\"{}\" has no value", text));
    }
    match kind.to_ascii_uppercase().as_str() {
        "UNIMOD" => value
            .parse()
            .map(ModificationIdentifier::Unimod)
            .map_err(|_| format!("\"{}\" is not a UNIMOD accession", text)),
        "MOD" => value
            .parse()
            .map(ModificationIdentifier::PsiMod)
            .map_err(|_| format!("\"{}\" is not a PSI-MOD accession", text)),
        "CHEMMOD" => Ok(ModificationIdentifier::ChemMod(value.to_string())),
        "SUBST" => {
            if value.bytes().all(|b| b.is_ascii_uppercase()) {
                Ok(ModificationIdentifier::Substitution(value.to_string()))
            } else {
                Err(format!("\"{}\" is not an amino acid substitution", text))
            }
        }
        _ => Err(format!("unknown modification kind \"{}\"", kind)),
    }
}

/// Find the first `-` outside brackets that ends a valid position prefix
fn split_positions(text: &str) -> Option<(Vec<ModificationPosition>, &str)> {
    let mut depth: usize = 0;
    for (index, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '-' if depth == 0 => {
                return parse_positions(&text[..index]).map(|p| (p, &text[index + 1..]));
            }
            _ => {}
        }
    }
    None
}

fn parse_modification(text: &str) -> Result<Modification, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("empty modification".to_string());
    }
    let (positions, rest) = split_positions(text).unwrap_or((Vec::new(), text));

    let mut parts = split_outside_brackets(rest, '|').into_iter();
    let identifier = parse_identifier(parts.next().unwrap_or_default())?;
    let neutral_loss = match parts.next() {
        Some(loss) => Some(
            loss.trim()
                .parse()
                .map_err(|e| format!("invalid neutral loss: {}", e))?,
        ),
        None => None,
    };
    if parts.next().is_some() {
        return Err(format!("\"{}\" has more than one neutral loss", text));
    }

    Ok(Modification {
        positions,
        identifier,
        neutral_loss,
    })
}

/// Parse a modification list; `0` means no modifications.
///
/// # Errors
/// A description of the first entry that does not parse.
pub fn parse_modification_list(text: &str) -> Result<Vec<Modification>, String> {
    let text = text.trim();
    if text == "0" {
        return Ok(Vec::new());
    }
    split_outside_brackets(text, ',')
        .into_iter()
        .map(parse_modification)
        .collect()
}
