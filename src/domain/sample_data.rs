//! Synthetic daily bar generation for testing and demo runs.
//!
//! Prices follow a trend-regime random walk: the per-day drift is
//! re-rolled every 30-50 days with random direction and magnitude, and
//! a noise term is layered on top. Closes never fall below a floor so
//! every generated bar has a valid positive close.

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;

use super::market::MarketBar;

/// Default sequence length, one trading year of calendar days.
pub const DEFAULT_SAMPLE_DAYS: usize = 252;

/// Closes are floored here so the walk cannot go non-positive.
const PRICE_FLOOR: f64 = 10.0;

/// Generate `days` synthetic bars ending today, using the thread RNG.
pub fn generate_sample_data(days: usize) -> Vec<MarketBar> {
    let start = Utc::now().date_naive() - Duration::days(days as i64);
    generate_sample_data_with_rng(days, start, &mut rand::thread_rng())
}

/// Generate `days` synthetic bars starting at `start_date`.
///
/// Starting price is uniform in [80, 120]; volume uniform in
/// [1,000,000, 6,000,000]; open/high/low are derived so that
/// `high >= max(open, close)` and `low <= min(open, close)` hold for
/// every bar. Dates are consecutive calendar days.
pub fn generate_sample_data_with_rng<R: Rng + ?Sized>(
    days: usize,
    start_date: NaiveDate,
    rng: &mut R,
) -> Vec<MarketBar> {
    let mut bars = Vec::with_capacity(days);
    let mut close = rng.gen_range(80.0..=120.0);
    let mut trend = 0.0_f64;
    let mut regime_remaining = 0usize;

    for day in 0..days {
        if regime_remaining == 0 {
            regime_remaining = rng.gen_range(30..=50);
            trend = rng.gen_range(-0.4..=0.4);
        }
        regime_remaining -= 1;

        let prev_close = close;
        let noise = rng.gen_range(-1.5..=1.5);
        close = (prev_close + trend + noise).max(PRICE_FLOOR);

        let open = (prev_close + rng.gen_range(-1.0..=1.0)).max(PRICE_FLOOR);
        let body_high = open.max(close);
        let body_low = open.min(close);
        let high = body_high + rng.gen_range(0.0..=1.5);
        let low = (body_low - rng.gen_range(0.0..=1.5)).max(PRICE_FLOOR / 2.0).min(body_low);

        bars.push(MarketBar {
            date: start_date + Duration::days(day as i64),
            open,
            high,
            low,
            close,
            volume: rng.gen_range(1_000_000..=6_000_000),
        });
    }

    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_bars(days: usize, seed: u64) -> Vec<MarketBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        generate_sample_data_with_rng(days, start, &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn generates_requested_length() {
        assert_eq!(generate_sample_data(252).len(), 252);
        assert_eq!(generate_sample_data(0).len(), 0);
    }

    #[test]
    fn dates_strictly_increase() {
        let bars = seeded_bars(300, 1);
        for w in bars.windows(2) {
            assert!(w[1].date > w[0].date);
        }
    }

    #[test]
    fn ohlc_invariants_hold() {
        let bars = seeded_bars(500, 2);
        for bar in &bars {
            assert!(bar.high >= bar.open.max(bar.close), "high below body");
            assert!(bar.low <= bar.open.min(bar.close), "low above body");
            assert!(bar.low > 0.0);
            assert!(bar.has_valid_close());
        }
    }

    #[test]
    fn closes_floored() {
        // a strongly bearish walk cannot push the close below the floor
        let bars = seeded_bars(2000, 3);
        for bar in &bars {
            assert!(bar.close >= 10.0);
        }
    }

    #[test]
    fn starting_price_in_band() {
        for seed in 0..20 {
            let bars = seeded_bars(1, seed);
            // first close is start price plus one day of trend + noise
            assert!(bars[0].close > 75.0 && bars[0].close < 125.0);
        }
    }

    #[test]
    fn volume_in_band() {
        let bars = seeded_bars(500, 4);
        for bar in &bars {
            assert!((1_000_000..=6_000_000).contains(&bar.volume));
        }
    }

    #[test]
    fn seeded_runs_reproduce() {
        let a = seeded_bars(100, 42);
        let b = seeded_bars(100, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = seeded_bars(100, 1);
        let b = seeded_bars(100, 2);
        assert_ne!(a, b);
    }
}
