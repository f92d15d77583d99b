// ABOUTME: Price and size extraction from free-form localized package text.
// ABOUTME: Sizes are unit-anchored first (GB, then MB) and fall back to a last-number heuristic.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::VocabularyError;
use crate::numerals::normalize_numerals;
use crate::vocabulary::{CompiledVocabulary, UnitVocabulary, SMALL_UNITS_PER_LARGE};

/// Unanchored digit runs, used only by the size heuristic.
static NUMBER_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+\.?[0-9]*").unwrap());

/// Longest leading decimal number of a cleaned price string.
static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]*\.?[0-9]*").unwrap());

/// Bare numbers above this are taken to be megabytes by the heuristic.
pub const HEURISTIC_SMALL_UNIT_THRESHOLD: f64 = 100.0;

/// How a size reading was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeBasis {
    /// Number directly followed by a gigabyte token.
    LargeUnit,
    /// Number directly followed by a megabyte token.
    SmallUnit,
    /// No unit next to any number; the last number was <= 100 and read as gigabytes.
    HeuristicLarge,
    /// No unit next to any number; the last number was > 100 and read as megabytes.
    HeuristicSmall,
    /// No digits at all.
    Absent,
}

impl SizeBasis {
    /// True when the unit was guessed rather than read from the text.
    pub fn is_heuristic(self) -> bool {
        matches!(self, SizeBasis::HeuristicLarge | SizeBasis::HeuristicSmall)
    }

    /// True when a unit token sat next to the number.
    pub fn is_anchored(self) -> bool {
        matches!(self, SizeBasis::LargeUnit | SizeBasis::SmallUnit)
    }
}

/// A size in gigabytes plus the way it was read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeReading {
    pub gigabytes: f64,
    pub basis: SizeBasis,
}

impl SizeReading {
    /// The "no size found" reading.
    pub const ABSENT: SizeReading = SizeReading {
        gigabytes: 0.0,
        basis: SizeBasis::Absent,
    };
}

/// Parses a price such as "۱۲,۵۰۰ تومان" into a plain amount.
///
/// Everything except ASCII digits and '.' is dropped after numeral
/// normalization, so currency words and thousands separators vanish. A minus
/// sign is dropped as well; negative prices cannot be represented.
///
/// The amount is the longest leading number of what remains, and anything
/// after it is ignored: a dotted currency abbreviation such as "ت.م." or a
/// sentence-final period leaves stray dots behind, and "1.250.000" reads as
/// 1.25. Returns 0 when no leading number exists.
pub fn extract_price(text: &str) -> f64 {
    let normalized = normalize_numerals(text);
    let digits: String = normalized
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    LEADING_NUMBER
        .find(&digits)
        .and_then(|m| parse_number(m.as_str()))
        .unwrap_or(0.0)
}

/// Parses a size string into gigabytes using the builtin vocabulary.
///
/// Returns 0 when the text contains no digits. See [`read_size`] for the
/// rules and for the variant that reports whether the unit was guessed.
pub fn extract_size(text: &str) -> f64 {
    read_size(text, CompiledVocabulary::builtin()).gigabytes
}

/// Reads a size in gigabytes and reports how the unit was determined.
///
/// Order of precedence:
/// 1. a number followed by a gigabyte token anywhere in the text;
/// 2. a number followed by a megabyte token, divided by 1024;
/// 3. otherwise the last number in the text, read as megabytes when it
///    exceeds 100 and as gigabytes otherwise.
///
/// Step 3 is a lossy guess. It assumes package strings put a duration first
/// and the size last ("30 روزه 200"), which holds for the source pages but is
/// not guaranteed. Callers that care should check [`SizeBasis::is_heuristic`].
pub fn read_size(text: &str, vocab: &CompiledVocabulary) -> SizeReading {
    let normalized = normalize_numerals(text);

    if let Some(value) = anchored_number(&vocab.large, &normalized) {
        return SizeReading {
            gigabytes: value,
            basis: SizeBasis::LargeUnit,
        };
    }

    if let Some(value) = anchored_number(&vocab.small, &normalized) {
        return SizeReading {
            gigabytes: value / SMALL_UNITS_PER_LARGE,
            basis: SizeBasis::SmallUnit,
        };
    }

    let last = NUMBER_RUN
        .find_iter(&normalized)
        .last()
        .and_then(|m| parse_number(m.as_str()));

    match last {
        Some(value) if value > HEURISTIC_SMALL_UNIT_THRESHOLD => {
            trace!(value, "size has no unit token, assuming megabytes");
            SizeReading {
                gigabytes: value / SMALL_UNITS_PER_LARGE,
                basis: SizeBasis::HeuristicSmall,
            }
        }
        Some(value) => {
            trace!(value, "size has no unit token, assuming gigabytes");
            SizeReading {
                gigabytes: value,
                basis: SizeBasis::HeuristicLarge,
            }
        }
        None => SizeReading::ABSENT,
    }
}

fn anchored_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_number(m.as_str()))
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Price and size extraction bound to one unit vocabulary.
#[derive(Debug, Clone)]
pub struct Extractor {
    vocab: CompiledVocabulary,
}

impl Extractor {
    /// Compiles `vocab` into a ready extractor.
    pub fn new(vocab: &UnitVocabulary) -> Result<Self, VocabularyError> {
        Ok(Self {
            vocab: vocab.compile()?,
        })
    }

    /// See [`extract_price`].
    pub fn price(&self, text: &str) -> f64 {
        extract_price(text)
    }

    /// See [`read_size`].
    pub fn size(&self, text: &str) -> SizeReading {
        read_size(text, &self.vocab)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            vocab: CompiledVocabulary::builtin().clone(),
        }
    }
}
