// ABOUTME: Price-per-gigabyte metric computation with the degenerate-input policy.
// ABOUTME: A metric only exists when both price and size are strictly positive.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::format::group_thousands;

/// Cost of one gigabyte, in the page's currency. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metric(f64);

impl Metric {
    /// Wraps a raw value, rejecting anything that is not a finite positive number.
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Metric(value))
    }

    /// The unrounded value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Nearest integer, ties away from zero.
    pub fn rounded(self) -> f64 {
        self.0.round()
    }

    /// Rounded and grouped for display, e.g. `12,346`.
    pub fn display_value(self) -> String {
        group_thousands(self.rounded())
    }

    /// Total order used for sorting; `None` sorts after every metric.
    pub fn sort_key(metric: Option<Metric>) -> f64 {
        metric.map_or(f64::INFINITY, Metric::value)
    }

    /// Compares two optional metrics, placing missing ones last.
    pub fn cmp_optional(a: Option<Metric>, b: Option<Metric>) -> Ordering {
        Self::sort_key(a).total_cmp(&Self::sort_key(b))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_value())
    }
}

/// Divides price by size, or returns `None` when either is not strictly positive.
///
/// No rounding happens here. The check runs before the division, so zero or
/// negative inputs never produce zero, infinity or NaN.
pub fn compute_metric(price: f64, size: f64) -> Option<Metric> {
    if price.is_nan() || size.is_nan() || price <= 0.0 || size <= 0.0 {
        return None;
    }
    Metric::new(price / size)
}
