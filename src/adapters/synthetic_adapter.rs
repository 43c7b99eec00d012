//! Synthetic market data adapter.
//!
//! Wraps the sample data generator behind the data port so the engine
//! can run without any input file. A seed makes the series
//! reproducible across invocations.

use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::error::EvotraderError;
use crate::domain::market::MarketBar;
use crate::domain::sample_data::generate_sample_data_with_rng;
use crate::ports::data_port::MarketDataPort;

pub struct SyntheticDataAdapter {
    days: usize,
    seed: Option<u64>,
}

impl SyntheticDataAdapter {
    pub fn new(days: usize, seed: Option<u64>) -> Self {
        Self { days, seed }
    }
}

impl MarketDataPort for SyntheticDataAdapter {
    fn fetch_bars(&self) -> Result<Vec<MarketBar>, EvotraderError> {
        let start = Utc::now().date_naive() - Duration::days(self.days as i64);
        let bars = match self.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                generate_sample_data_with_rng(self.days, start, &mut rng)
            }
            None => generate_sample_data_with_rng(self.days, start, &mut rand::thread_rng()),
        };
        Ok(bars)
    }
}
