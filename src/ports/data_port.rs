//! Market data port trait — the bar-source seam of the engine.

use crate::domain::error::EvotraderError;
use crate::domain::market::MarketBar;

/// Supplies an ordered sequence of daily bars with strictly increasing
/// dates. Implementations may read files or synthesize data; the engine
/// never mutates what they return.
pub trait MarketDataPort {
    fn fetch_bars(&self) -> Result<Vec<MarketBar>, EvotraderError>;
}
