//! Daily price bar representation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar. Within a sequence dates are unique and strictly
/// increasing; `high >= max(open, close)` and `low <= min(open, close)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl MarketBar {
    /// A bar is usable by the simulator only if its close is a positive
    /// finite number. Bad feeds produce zero, negative or NaN closes.
    pub fn has_valid_close(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}
