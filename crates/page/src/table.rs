// ABOUTME: Side table mapping package elements to their computed metric.
// ABOUTME: Entries are write-once; ordering reads metrics from here instead of recomputing.

use std::collections::HashMap;
use std::hash::Hash;

use gigprice_engine::Metric;

/// Metrics attached to elements, keyed by element handle.
#[derive(Debug, Clone)]
pub struct MetricTable<E> {
    entries: HashMap<E, Metric>,
}

impl<E> Default for MetricTable<E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<E: Copy + Eq + Hash> MetricTable<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `metric` unless the element already has one. Returns true if stored.
    pub fn attach(&mut self, element: E, metric: Metric) -> bool {
        if self.entries.contains_key(&element) {
            return false;
        }
        self.entries.insert(element, metric);
        true
    }

    pub fn get(&self, element: E) -> Option<Metric> {
        self.entries.get(&element).copied()
    }

    pub fn contains(&self, element: E) -> bool {
        self.entries.contains_key(&element)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
