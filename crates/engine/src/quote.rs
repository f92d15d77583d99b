// ABOUTME: Combines price and size extraction with the metric for one package.
// ABOUTME: Quote keeps every intermediate value so callers can report why a metric is missing.

use serde::{Deserialize, Serialize};

use crate::extract::{Extractor, SizeReading};
use crate::metric::{compute_metric, Metric};

/// Everything derived from one package's price and size text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub size: SizeReading,
    pub metric: Option<Metric>,
}

impl Quote {
    /// Runs both extractors and the metric engine.
    pub fn from_text(extractor: &Extractor, price_text: &str, size_text: &str) -> Self {
        let price = extractor.price(price_text);
        let size = extractor.size(size_text);
        Self {
            price,
            size,
            metric: compute_metric(price, size.gigabytes),
        }
    }

    /// True when no price could be recovered.
    pub fn price_missing(&self) -> bool {
        self.price <= 0.0
    }

    /// True when no size could be recovered.
    pub fn size_missing(&self) -> bool {
        self.size.gigabytes <= 0.0
    }
}
