// ABOUTME: Error types for page annotation setup and the reasons a package is skipped.
// ABOUTME: ConfigError covers configuration problems; SkipReason is a value, never propagated.

use std::io;
use std::path::PathBuf;

use gigprice_engine::VocabularyError;
use thiserror::Error;

/// Errors raised while loading or validating a [`crate::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A CSS locator failed to parse.
    #[error("invalid {field} selector: {css:?}")]
    InvalidSelector { field: &'static str, css: String },

    /// A fragment class name or style id is not a plain CSS identifier.
    #[error("{field} must be a plain CSS identifier, got {value:?}")]
    InvalidIdentifier { field: &'static str, value: String },

    /// The unit vocabulary could not be compiled.
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),

    /// The JSON configuration was malformed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    /// Creates an InvalidSelector error.
    pub fn invalid_selector(field: &'static str, css: impl Into<String>) -> Self {
        ConfigError::InvalidSelector {
            field,
            css: css.into(),
        }
    }
}

/// Why a package was left unaugmented.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("price element not found")]
    MissingPriceElement,

    #[error("size element not found")]
    MissingSizeElement,

    #[error("no price in {0:?}")]
    ZeroPrice(String),

    #[error("no size in {0:?}")]
    ZeroSize(String),

    /// Both values were positive but the quotient was not a usable number.
    #[error("price {price} over size {size} is not a finite metric")]
    Degenerate { price: String, size: String },
}
