// ABOUTME: Guarded per-package processing and metric-based ordering of package elements.
// ABOUTME: Owns the metric side table; each element is extracted and rendered at most once.

use std::hash::Hash;

use gigprice_engine::{Extractor, Metric, Quote};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Config, FragmentStyle};
use crate::error::{ConfigError, SkipReason};
use crate::fragment::Fragment;
use crate::page::PackagePage;
use crate::table::MetricTable;

/// Result of one [`Annotator::process`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// Metric attached and fragment rendered.
    Augmented(Quote),
    /// The element already carried its augmentation; nothing was done.
    AlreadyProcessed,
    /// The element cannot be priced; nothing was done.
    Skipped(SkipReason),
}

impl ProcessOutcome {
    pub fn is_augmented(&self) -> bool {
        matches!(self, ProcessOutcome::Augmented(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, ProcessOutcome::Skipped(_))
    }
}

/// Counts of outcomes over a batch of elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    pub augmented: usize,
    pub already_processed: usize,
    pub skipped: usize,
}

impl ProcessSummary {
    pub fn record(&mut self, outcome: &ProcessOutcome) {
        match outcome {
            ProcessOutcome::Augmented(_) => self.augmented += 1,
            ProcessOutcome::AlreadyProcessed => self.already_processed += 1,
            ProcessOutcome::Skipped(_) => self.skipped += 1,
        }
    }

    pub fn merge(&mut self, other: ProcessSummary) {
        self.augmented += other.augmented;
        self.already_processed += other.already_processed;
        self.skipped += other.skipped;
    }

    pub fn total(&self) -> usize {
        self.augmented + self.already_processed + self.skipped
    }
}

/// Applies the pricing pipeline to package elements of one page.
#[derive(Debug, Clone)]
pub struct Annotator<E> {
    extractor: Extractor,
    fragment: FragmentStyle,
    metrics: MetricTable<E>,
}

impl<E: Copy + Eq + Hash + std::fmt::Debug> Annotator<E> {
    /// Builds an annotator from the vocabulary and fragment settings of `config`.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            extractor: Extractor::new(&config.vocabulary)?,
            fragment: config.fragment.clone(),
            metrics: MetricTable::new(),
        })
    }

    /// Processes one element unless it already carries its augmentation.
    ///
    /// An element counts as processed when it has a side-table entry, when the
    /// page stores a metric on it, or when it already shows a fragment. A stored
    /// metric is loaded into the side table so the element can still be ordered.
    /// Safe to call any number of times and on elements that are not packages.
    pub fn process<P>(&mut self, page: &mut P, element: E) -> ProcessOutcome
    where
        P: PackagePage<Element = E>,
    {
        if self.metrics.contains(element) {
            return ProcessOutcome::AlreadyProcessed;
        }
        if let Some(metric) = page.stored_metric(element) {
            self.metrics.attach(element, metric);
            return ProcessOutcome::AlreadyProcessed;
        }
        if page.has_fragment(element) {
            return ProcessOutcome::AlreadyProcessed;
        }

        let quote = match self.quote(page, element) {
            Ok(quote) => quote,
            Err(reason) => {
                warn!(?element, %reason, "skipping package");
                return ProcessOutcome::Skipped(reason);
            }
        };

        let Some(metric) = quote.metric else {
            let reason = SkipReason::Degenerate {
                price: quote.price.to_string(),
                size: quote.size.gigabytes.to_string(),
            };
            warn!(?element, %reason, "skipping package");
            return ProcessOutcome::Skipped(reason);
        };

        if quote.size.basis.is_heuristic() {
            debug!(
                ?element,
                gigabytes = quote.size.gigabytes,
                basis = ?quote.size.basis,
                "size unit guessed from a bare number"
            );
        }

        self.metrics.attach(element, metric);
        page.augment(element, &Fragment::new(metric, &self.fragment));
        debug!(?element, metric = metric.value(), "package augmented");

        ProcessOutcome::Augmented(quote)
    }

    /// Extracts the quote for an element without touching the page.
    pub fn quote<P>(&self, page: &P, element: E) -> Result<Quote, SkipReason>
    where
        P: PackagePage<Element = E>,
    {
        let price_text = page
            .price_text(element)
            .ok_or(SkipReason::MissingPriceElement)?;
        let size_text = page
            .size_text(element)
            .ok_or(SkipReason::MissingSizeElement)?;

        let quote = Quote::from_text(&self.extractor, &price_text, &size_text);
        if quote.price_missing() {
            return Err(SkipReason::ZeroPrice(price_text));
        }
        if quote.size_missing() {
            return Err(SkipReason::ZeroSize(size_text));
        }
        Ok(quote)
    }

    /// Processes each element in turn.
    pub fn process_all<P>(&mut self, page: &mut P, elements: &[E]) -> ProcessSummary
    where
        P: PackagePage<Element = E>,
    {
        let mut summary = ProcessSummary::default();
        for &element in elements {
            summary.record(&self.process(page, element));
        }
        summary
    }

    /// Metric attached to an element, if any.
    pub fn metric(&self, element: E) -> Option<Metric> {
        self.metrics.get(element)
    }

    /// The side table of attached metrics.
    pub fn metrics(&self) -> &MetricTable<E> {
        &self.metrics
    }

    /// Orders elements cheapest-per-gigabyte first.
    ///
    /// Metrics come from the side table only. Elements without one sort last.
    /// The sort is stable, so ties keep their input order and sorting an
    /// already sorted slice returns it unchanged.
    pub fn order_by_metric(&self, elements: &[E]) -> Vec<E> {
        let mut ordered = elements.to_vec();
        ordered.sort_by(|a, b| Metric::cmp_optional(self.metric(*a), self.metric(*b)));
        ordered
    }

    /// Orders sibling elements and applies the order to the page.
    pub fn sort_group<P>(&self, page: &mut P, elements: &[E]) -> Vec<E>
    where
        P: PackagePage<Element = E>,
    {
        let ordered = self.order_by_metric(elements);
        page.reorder(&ordered);
        ordered
    }

    /// Sorts every group of sibling packages on the page.
    ///
    /// Packages are grouped by parent in document order. Returns the number
    /// of groups sorted.
    pub fn sort_page<P>(&self, page: &mut P) -> usize
    where
        P: PackagePage<Element = E>,
    {
        let mut groups: Vec<(Option<E>, Vec<E>)> = Vec::new();
        for element in page.packages() {
            let parent = page.parent(element);
            match groups.iter_mut().find(|(p, _)| *p == parent) {
                Some((_, members)) => members.push(element),
                None => groups.push((parent, vec![element])),
            }
        }

        for (_, members) in &groups {
            self.sort_group(page, members);
        }
        info!(groups = groups.len(), "sorted packages by price per gigabyte");
        groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryPackage, MemoryPage};

    fn annotator() -> Annotator<usize> {
        Annotator::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_process_augments_once() {
        let mut page = MemoryPage::new();
        let el = page.add(MemoryPackage::new("۱۰۰,۰۰۰ تومان", "۲۰ گیگ"));
        let mut annotator = annotator();

        let first = annotator.process(&mut page, el);
        assert!(first.is_augmented());
        assert_eq!(annotator.process(&mut page, el), ProcessOutcome::AlreadyProcessed);

        assert_eq!(page.fragments(el).len(), 1);
        assert_eq!(page.fragments(el)[0].display, "5,000");
        assert_eq!(annotator.metric(el).map(Metric::value), Some(5_000.0));
        assert_eq!(annotator.metrics().len(), 1);
    }

    #[test]
    fn test_missing_fields_are_skipped() {
        let mut page = MemoryPage::new();
        let no_price = page.add(MemoryPackage::new("", "").without_price());
        let no_size = page.add(MemoryPackage::new("1000", "").without_size());
        let mut annotator = annotator();

        assert_eq!(
            annotator.process(&mut page, no_price),
            ProcessOutcome::Skipped(SkipReason::MissingPriceElement)
        );
        assert_eq!(
            annotator.process(&mut page, no_size),
            ProcessOutcome::Skipped(SkipReason::MissingSizeElement)
        );
        assert!(page.fragments(no_price).is_empty());
        assert!(annotator.metrics().is_empty());
    }

    #[test]
    fn test_zero_values_are_skipped() {
        let mut page = MemoryPage::new();
        let free = page.add(MemoryPackage::new("رایگان", "10 GB"));
        let unlimited = page.add(MemoryPackage::new("5000", "نامحدود"));
        let mut annotator = annotator();

        assert_eq!(
            annotator.process(&mut page, free),
            ProcessOutcome::Skipped(SkipReason::ZeroPrice("رایگان".to_string()))
        );
        assert_eq!(
            annotator.process(&mut page, unlimited),
            ProcessOutcome::Skipped(SkipReason::ZeroSize("نامحدود".to_string()))
        );
    }

    #[test]
    fn test_skipped_element_can_be_retried() {
        let mut page = MemoryPage::new();
        let el = page.add(MemoryPackage::new("", "10 GB"));
        let mut annotator = annotator();

        assert!(annotator.process(&mut page, el).is_skipped());
        page.set_price(el, "2000");
        assert!(annotator.process(&mut page, el).is_augmented());
    }

    #[test]
    fn test_existing_fragment_is_respected() {
        let mut page = MemoryPage::new();
        let el = page.add(MemoryPackage::new("1000", "10 GB").with_foreign_fragment());
        let mut annotator = annotator();

        assert_eq!(annotator.process(&mut page, el), ProcessOutcome::AlreadyProcessed);
        assert_eq!(annotator.metric(el), None);
    }

    #[test]
    fn test_stored_metric_is_rehydrated() {
        let mut page = MemoryPage::new();
        let el = page.add(MemoryPackage::new("1000", "10 GB").with_stored_metric(42.0));
        let mut annotator = annotator();

        assert_eq!(annotator.process(&mut page, el), ProcessOutcome::AlreadyProcessed);
        assert_eq!(annotator.metric(el).map(Metric::value), Some(42.0));
        assert!(page.fragments(el).is_empty());
    }

    #[test]
    fn test_order_by_metric_places_missing_last() {
        let mut page = MemoryPage::new();
        let a = page.add(MemoryPackage::new("300", "10 GB"));
        let b = page.add(MemoryPackage::new("", "10 GB"));
        let c = page.add(MemoryPackage::new("100", "10 GB"));
        let d = page.add(MemoryPackage::new("200", "10 GB"));
        let mut annotator = annotator();
        annotator.process_all(&mut page, &[a, b, c, d]);

        let ordered = annotator.order_by_metric(&[a, b, c, d]);
        assert_eq!(ordered, vec![c, d, a, b]);
        assert_eq!(annotator.order_by_metric(&ordered), ordered);
    }

    #[test]
    fn test_order_is_stable_for_ties() {
        let mut page = MemoryPage::new();
        let a = page.add(MemoryPackage::new("100", "1 GB"));
        let b = page.add(MemoryPackage::new("200", "2 GB"));
        let c = page.add(MemoryPackage::new("", ""));
        let d = page.add(MemoryPackage::new("", ""));
        let mut annotator = annotator();
        annotator.process_all(&mut page, &[a, b, c, d]);

        assert_eq!(annotator.order_by_metric(&[b, d, a, c]), vec![b, a, d, c]);
    }

    #[test]
    fn test_order_does_not_recompute() {
        let mut page = MemoryPage::new();
        let a = page.add(MemoryPackage::new("100", "1 GB"));
        let b = page.add(MemoryPackage::new("50", "1 GB"));
        let mut annotator = annotator();
        annotator.process_all(&mut page, &[a, b]);

        // Text changes after processing do not affect the order
        page.set_price(a, "1");
        assert_eq!(annotator.order_by_metric(&[a, b]), vec![b, a]);
    }

    #[test]
    fn test_sort_page_groups_by_parent() {
        let mut page = MemoryPage::new();
        let first = page.add_group(MemoryPage::ROOT);
        let second = page.add_group(MemoryPage::ROOT);
        let a = page.add_to(first, MemoryPackage::new("300", "1 GB"));
        let b = page.add_to(first, MemoryPackage::new("100", "1 GB"));
        let c = page.add_to(second, MemoryPackage::new("900", "1 GB"));
        let d = page.add_to(second, MemoryPackage::new("500", "1 GB"));
        let mut annotator = annotator();
        let elements = page.packages();
        annotator.process_all(&mut page, &elements);

        assert_eq!(annotator.sort_page(&mut page), 2);
        assert_eq!(page.packages(), vec![b, a, d, c]);
    }

    #[test]
    fn test_summary_counts() {
        let mut page = MemoryPage::new();
        let a = page.add(MemoryPackage::new("100", "1 GB"));
        let b = page.add(MemoryPackage::new("", "1 GB"));
        let mut annotator = annotator();

        let mut summary = annotator.process_all(&mut page, &[a, b]);
        summary.merge(annotator.process_all(&mut page, &[a]));
        assert_eq!(
            summary,
            ProcessSummary {
                augmented: 1,
                already_processed: 1,
                skipped: 1,
            }
        );
        assert_eq!(summary.total(), 3);
    }
}
