// ABOUTME: Core pricing engine for data-package listings.
// ABOUTME: Provides numeral normalization, price/size extraction and the price-per-gigabyte metric.

//! Normalizes localized package text and derives a comparable cost per gigabyte.
//!
//! Everything here is pure: functions take text or numbers and return values,
//! with no I/O and no state kept between calls. Unusable input degrades to a
//! zero reading or a missing metric rather than an error.
//!
//! # Example
//!
//! ```
//! use gigprice_engine::{compute_metric, extract_price, extract_size};
//!
//! let price = extract_price("۴۵,۰۰۰ تومان");
//! let size = extract_size("۵۱۲ مگابایت");
//! let metric = compute_metric(price, size).unwrap();
//! assert_eq!(metric.display_value(), "90,000");
//! ```

pub mod error;
pub mod extract;
pub mod format;
pub mod metric;
pub mod numerals;
pub mod quote;
pub mod vocabulary;

pub use error::VocabularyError;
pub use extract::{extract_price, extract_size, read_size, Extractor, SizeBasis, SizeReading};
pub use format::group_thousands;
pub use metric::{compute_metric, Metric};
pub use numerals::normalize_numerals;
pub use quote::Quote;
pub use vocabulary::{CompiledVocabulary, UnitVocabulary, SMALL_UNITS_PER_LARGE};
