// ABOUTME: Page annotation layer for the price-per-gigabyte engine.
// ABOUTME: Re-exports Config, Annotator, the PackagePage hosts, the reactive Driver and the report API.

//! Applies the pricing engine to pages that list data packages.
//!
//! [`Annotator`] is the guarded entry point: it reads price and size text
//! from a package, attaches the metric in its side table and renders a
//! fragment, at most once per element. [`HtmlPage`] hosts a dom_query
//! document; [`MemoryPage`] is a synthetic host. [`Driver`] consumes page
//! events from a channel and re-runs the annotator on inserted nodes.
//!
//! # Example
//!
//! ```
//! use gigprice_page::{annotate_html, Config};
//!
//! let html = r#"<div class="card-templ-wrapper">
//!   <div class="card-description"><h6>۲۰ گیگ</h6></div>
//!   <div class="card-price"><span class="fa-number">۱۰۰,۰۰۰</span></div>
//! </div>"#;
//!
//! let annotated = annotate_html(html, &Config::default(), false).unwrap();
//! assert_eq!(annotated.report.packages[0].display.as_deref(), Some("5,000"));
//! ```

pub mod annotator;
pub mod config;
pub mod driver;
pub mod error;
pub mod fragment;
pub mod html;
pub mod memory;
pub mod page;
pub mod report;
pub mod table;

pub use crate::annotator::{Annotator, ProcessOutcome, ProcessSummary};
pub use crate::config::{CompiledLocators, Config, ConfigBuilder, FragmentStyle, Locators};
pub use crate::driver::{Driver, PageEvent};
pub use crate::error::{ConfigError, SkipReason};
pub use crate::fragment::Fragment;
pub use crate::html::{ElementId, HtmlPage};
pub use crate::memory::{MemoryPackage, MemoryPage};
pub use crate::page::PackagePage;
pub use crate::report::{annotate_html, Annotated, PackageReport, PackageStatus, PageReport};
pub use crate::table::MetricTable;
pub use gigprice_engine::{Metric, Quote, SizeBasis, SizeReading, UnitVocabulary};
