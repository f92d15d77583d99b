// ABOUTME: Error types for the pricing engine.
// ABOUTME: Extraction never fails; only building a custom unit vocabulary can.

use thiserror::Error;

/// Errors raised while compiling a unit vocabulary.
#[derive(Debug, Error)]
pub enum VocabularyError {
    /// A unit was configured without any usable token.
    #[error("{unit} unit vocabulary has no tokens")]
    Empty { unit: &'static str },

    /// The generated matcher could not be compiled.
    #[error("failed to compile {unit} unit matcher: {source}")]
    Regex {
        unit: &'static str,
        #[source]
        source: regex::Error,
    },
}
