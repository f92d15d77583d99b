// ABOUTME: One-shot annotation of an HTML document with a serializable per-package report.
// ABOUTME: Used by the CLI for both annotated-HTML and JSON output.

use gigprice_engine::{Metric, SizeBasis};
use serde::Serialize;

use crate::annotator::{Annotator, ProcessOutcome, ProcessSummary};
use crate::config::Config;
use crate::error::ConfigError;
use crate::html::HtmlPage;
use crate::page::PackagePage;

/// What happened to one package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    Augmented,
    AlreadyProcessed,
    Skipped,
}

/// Per-package details for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageReport {
    /// Position in document order before any sorting.
    pub position: usize,
    pub price_text: Option<String>,
    pub size_text: Option<String>,
    pub price: Option<f64>,
    pub size_gb: Option<f64>,
    pub size_basis: Option<SizeBasis>,
    pub price_per_gb: Option<f64>,
    pub display: Option<String>,
    pub status: PackageStatus,
    pub reason: Option<String>,
}

impl PackageReport {
    fn new<P: PackagePage>(
        page: &P,
        position: usize,
        element: P::Element,
        outcome: &ProcessOutcome,
        metric: Option<Metric>,
    ) -> Self {
        let (status, quote, reason) = match outcome {
            ProcessOutcome::Augmented(quote) => (PackageStatus::Augmented, Some(quote), None),
            ProcessOutcome::AlreadyProcessed => (PackageStatus::AlreadyProcessed, None, None),
            ProcessOutcome::Skipped(reason) => {
                (PackageStatus::Skipped, None, Some(reason.to_string()))
            }
        };

        Self {
            position,
            price_text: page.price_text(element),
            size_text: page.size_text(element),
            price: quote.map(|q| q.price),
            size_gb: quote.map(|q| q.size.gigabytes),
            size_basis: quote.map(|q| q.size.basis),
            price_per_gb: metric.map(Metric::value),
            display: metric.map(Metric::display_value),
            status,
            reason,
        }
    }
}

/// Report over a whole document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageReport {
    pub packages: Vec<PackageReport>,
    pub summary: ProcessSummary,
    pub sorted: bool,
    /// Count of readings whose unit was guessed.
    pub heuristic_sizes: usize,
}

/// Annotated document plus its report.
#[derive(Debug, Clone)]
pub struct Annotated {
    pub html: String,
    pub report: PageReport,
}

/// Parses `html`, augments every package and optionally sorts each listing.
pub fn annotate_html(html: &str, config: &Config, sort: bool) -> Result<Annotated, ConfigError> {
    let mut page = HtmlPage::parse(html, config)?;
    let mut annotator = Annotator::new(config)?;

    let mut summary = ProcessSummary::default();
    let mut packages = Vec::new();
    for (position, element) in page.packages().into_iter().enumerate() {
        let outcome = annotator.process(&mut page, element);
        summary.record(&outcome);
        packages.push(PackageReport::new(
            &page,
            position,
            element,
            &outcome,
            annotator.metric(element),
        ));
    }

    if sort {
        annotator.sort_page(&mut page);
    }

    let heuristic_sizes = packages
        .iter()
        .filter(|p| p.size_basis.is_some_and(SizeBasis::is_heuristic))
        .count();

    Ok(Annotated {
        html: page.html(),
        report: PageReport {
            packages,
            summary,
            sorted: sort,
            heuristic_sizes,
        },
    })
}
