//! Argument kinds and canonicalization.
//!
//! Every tool argument has a declared [`ArgKind`] that decides how raw
//! input is normalized into its canonical lookup key. Canonicalization is
//! idempotent: feeding a canonical string back in returns it unchanged.

pub mod text;
pub mod timeframe;

pub use text::{normalize_phone, normalize_plate, normalize_text, normalize_token_set, STOPWORDS};
pub use timeframe::{canonical_timeframe, overlap_minutes, parse_clock, parse_timeframe};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Declared kind of a tool argument; drives canonicalization and fuzzy
/// scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    Name,
    Timeframe,
    Plate,
    Phone,
    Location,
    SampleId,
    Text,
}

#[derive(Debug, Error)]
pub enum CanonicalError {
    #[error("name needs at least one token of four or more letters: {0:?}")]
    NameTooShort(String),
    #[error("unrecognized timeframe {0:?}; expected forms like \"20:10-20:20\" or \"8:10pm-8:20pm\"")]
    BadTimeframe(String),
    #[error("empty value for {0} argument")]
    EmptyValue(&'static str),
}

impl ArgKind {
    /// Alias table consulted after canonicalization, if any.
    pub fn alias_category(self) -> Option<&'static str> {
        match self {
            ArgKind::Name => Some("people"),
            ArgKind::Location => Some("locations"),
            ArgKind::Plate => Some("vehicles"),
            ArgKind::Phone => Some("phones"),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ArgKind::Name => "name",
            ArgKind::Timeframe => "timeframe",
            ArgKind::Plate => "plate",
            ArgKind::Phone => "phone",
            ArgKind::Location => "location",
            ArgKind::SampleId => "sample id",
            ArgKind::Text => "text",
        }
    }
}

/// Normalize a raw argument into its canonical lookup form, rejecting
/// values that cannot possibly match any scripted key.
pub fn canonicalize(kind: ArgKind, raw: &str) -> Result<String, CanonicalError> {
    match kind {
        ArgKind::Name => {
            let tokens = text::normalize_token_set(raw, true);
            // Letters only: a house number or plate fragment is not a name.
            if !tokens
                .iter()
                .any(|t| t.chars().filter(|c| c.is_alphabetic()).count() >= 4)
            {
                return Err(CanonicalError::NameTooShort(raw.to_string()));
            }
            Ok(text::normalize_text(raw))
        }
        ArgKind::Timeframe => timeframe::canonical_timeframe(raw)
            .ok_or_else(|| CanonicalError::BadTimeframe(raw.to_string())),
        ArgKind::Plate | ArgKind::SampleId => {
            non_empty(text::normalize_plate(raw), kind)
        }
        ArgKind::Phone => non_empty(text::normalize_phone(raw), kind),
        ArgKind::Location | ArgKind::Text => non_empty(text::normalize_text(raw), kind),
    }
}

/// Dataset-side keys are curated, so a value that fails strict
/// canonicalization falls back to plain text normalization instead of
/// failing the load.
pub fn canonicalize_lenient(kind: ArgKind, raw: &str) -> String {
    canonicalize(kind, raw).unwrap_or_else(|_| text::normalize_text(raw))
}

fn non_empty(value: String, kind: ArgKind) -> Result<String, CanonicalError> {
    if value.is_empty() {
        Err(CanonicalError::EmptyValue(kind.label()))
    } else {
        Ok(value)
    }
}
