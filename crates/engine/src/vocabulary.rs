// ABOUTME: Unit vocabularies recognised next to a size figure (gigabyte and megabyte spellings).
// ABOUTME: Compiles token lists into case-insensitive anchored regexes used by the size extractor.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::VocabularyError;

/// Number of small units (megabytes) in one large unit (gigabyte).
pub const SMALL_UNITS_PER_LARGE: f64 = 1024.0;

const DEFAULT_LARGE_TOKENS: &[&str] = &["گیگابایت", "گیگ", "gigabyte", "gig", "GB"];
const DEFAULT_SMALL_TOKENS: &[&str] = &["مگابایت", "مگ", "megabyte", "meg", "MB"];

/// Spellings and abbreviations of the two size units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitVocabulary {
    /// Tokens meaning "gigabyte".
    pub large: Vec<String>,
    /// Tokens meaning "megabyte".
    pub small: Vec<String>,
}

impl Default for UnitVocabulary {
    fn default() -> Self {
        Self {
            large: DEFAULT_LARGE_TOKENS.iter().map(|t| t.to_string()).collect(),
            small: DEFAULT_SMALL_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl UnitVocabulary {
    /// Builds a vocabulary from explicit token lists.
    pub fn new<L, S>(large: L, small: S) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            large: large.into_iter().map(Into::into).collect(),
            small: small.into_iter().map(Into::into).collect(),
        }
    }

    /// Compiles both token lists into anchored matchers.
    pub fn compile(&self) -> Result<CompiledVocabulary, VocabularyError> {
        Ok(CompiledVocabulary {
            large: anchored_regex("large", &self.large)?,
            small: anchored_regex("small", &self.small)?,
        })
    }
}

/// Matchers for "number, optional whitespace, unit token".
///
/// Capture group 1 holds the number, already in ASCII digits.
#[derive(Debug, Clone)]
pub struct CompiledVocabulary {
    pub(crate) large: Regex,
    pub(crate) small: Regex,
}

impl CompiledVocabulary {
    /// Returns the compiled default vocabulary.
    pub fn builtin() -> &'static CompiledVocabulary {
        &BUILTIN
    }
}

static BUILTIN: Lazy<CompiledVocabulary> = Lazy::new(|| {
    UnitVocabulary::default()
        .compile()
        .expect("builtin unit vocabulary compiles")
});

fn anchored_regex(unit: &'static str, tokens: &[String]) -> Result<Regex, VocabularyError> {
    let mut tokens: Vec<&str> = tokens
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err(VocabularyError::Empty { unit });
    }

    // Longest first so a full spelling wins over its abbreviation
    tokens.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    let alternation = tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    let pattern = format!(r"(?i)([0-9]+\.?[0-9]*)\s*(?:{})", alternation);
    Regex::new(&pattern).map_err(|source| VocabularyError::Regex { unit, source })
}
