// ABOUTME: Reactive driver that re-runs the annotator as page events arrive on a channel.
// ABOUTME: Performs the initial scan, processes inserted nodes and applies sort requests in arrival order.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::annotator::{Annotator, ProcessSummary};
use crate::page::PackagePage;

/// Something that happened on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent<E> {
    /// A node was inserted; it may be a package or contain packages.
    Inserted(E),
    /// The user asked for the listing to be sorted.
    SortRequested,
}

/// Owns a page and its annotator and feeds page events through them.
///
/// Everything runs on the task that drives [`Driver::run`]; events are
/// handled one at a time in the order they were sent. The initial scan runs
/// once: either explicitly through [`Driver::scan`] or at the start of `run`.
#[derive(Debug)]
pub struct Driver<P: PackagePage> {
    page: P,
    annotator: Annotator<P::Element>,
    summary: ProcessSummary,
    sorts: usize,
    scanned: bool,
}

impl<P: PackagePage> Driver<P> {
    pub fn new(page: P, annotator: Annotator<P::Element>) -> Self {
        Self {
            page,
            annotator,
            summary: ProcessSummary::default(),
            sorts: 0,
            scanned: false,
        }
    }

    /// Processes every package already on the page.
    pub fn scan(&mut self) -> ProcessSummary {
        let packages = self.page.packages();
        let summary = self.annotator.process_all(&mut self.page, &packages);
        info!(
            found = packages.len(),
            augmented = summary.augmented,
            skipped = summary.skipped,
            "initial package scan"
        );
        self.summary.merge(summary);
        self.scanned = true;
        summary
    }

    /// True once the initial scan has run.
    pub fn scanned(&self) -> bool {
        self.scanned
    }

    /// Handles a single event.
    pub fn handle(&mut self, event: PageEvent<P::Element>) -> ProcessSummary {
        match event {
            PageEvent::Inserted(root) => {
                let packages = self.page.packages_within(root);
                debug!(?root, found = packages.len(), "nodes inserted");
                let summary = self.annotator.process_all(&mut self.page, &packages);
                self.summary.merge(summary);
                summary
            }
            PageEvent::SortRequested => {
                self.annotator.sort_page(&mut self.page);
                self.sorts += 1;
                ProcessSummary::default()
            }
        }
    }

    /// Scans the page unless [`Driver::scan`] already ran, then handles events
    /// until every sender is dropped.
    pub async fn run(&mut self, mut events: mpsc::Receiver<PageEvent<P::Element>>) -> ProcessSummary {
        if !self.scanned {
            self.scan();
        }
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        debug!(total = self.summary.total(), sorts = self.sorts, "event stream closed");
        self.summary
    }

    /// Totals over everything processed so far.
    pub fn summary(&self) -> ProcessSummary {
        self.summary
    }

    /// Number of sort requests handled.
    pub fn sorts(&self) -> usize {
        self.sorts
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Mutable access for simulating page changes between events.
    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn annotator(&self) -> &Annotator<P::Element> {
        &self.annotator
    }

    pub fn into_parts(self) -> (P, Annotator<P::Element>) {
        (self.page, self.annotator)
    }
}
