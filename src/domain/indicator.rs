//! Moving-average and RSI series used by the backtest signal loop.
//!
//! Both functions return a series exactly as long as the bar slice and
//! never fail: warm-up entries carry sentinel values (0 for the moving
//! average, 50 for RSI) that the simulator treats as "not yet ready".

use super::market::MarketBar;

/// Neutral RSI used for warm-up entries and length padding.
pub const RSI_NEUTRAL: f64 = 50.0;

/// Trailing simple moving average of closes over `period` positions.
///
/// Bars without a valid close are skipped, and the mean divides by the
/// number of valid bars actually found in the window, not by `period`.
/// Before `period - 1` the window is whatever is available from the
/// start, so the early portion of the series is a partial-window
/// average rather than an undefined value. A window with zero valid
/// bars yields 0.
pub fn moving_average(bars: &[MarketBar], period: usize) -> Vec<f64> {
    let mut series = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        let start = (i + 1).saturating_sub(period.max(1));
        let mut sum = 0.0;
        let mut count = 0usize;
        for bar in &bars[start..=i] {
            if bar.has_valid_close() {
                sum += bar.close;
                count += 1;
            }
        }
        series.push(if count > 0 { sum / count as f64 } else { 0.0 });
    }

    series
}

/// Relative Strength Index over `period` price changes.
///
/// Simple means of trailing gains/losses (not Wilder smoothing):
/// RSI = 100 - 100 / (1 + avg_gain / avg_loss), defined as 100 when the
/// average loss is exactly 0. The first entry and every entry before
/// `period - 1` changes are the neutral 50. The result is right-padded
/// with 50 (or truncated) so its length always equals `bars.len()`.
pub fn rsi(bars: &[MarketBar], period: usize) -> Vec<f64> {
    let mut series = Vec::with_capacity(bars.len());
    if bars.is_empty() {
        return series;
    }
    series.push(RSI_NEUTRAL);

    let changes: Vec<f64> = bars
        .windows(2)
        .map(|w| w[1].close - w[0].close)
        .collect();

    for (j, _) in changes.iter().enumerate() {
        if period == 0 || j < period - 1 {
            series.push(RSI_NEUTRAL);
            continue;
        }
        let window = &changes[j + 1 - period..=j];
        let avg_gain: f64 =
            window.iter().filter(|&&c| c > 0.0).sum::<f64>() / period as f64;
        let avg_loss: f64 =
            window.iter().filter(|&&c| c < 0.0).map(|c| -c).sum::<f64>() / period as f64;

        let value = if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };
        series.push(value);
    }

    // length must always equal the bar-sequence length
    series.resize(bars.len(), RSI_NEUTRAL);
    series
}
