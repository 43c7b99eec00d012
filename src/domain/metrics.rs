//! Performance statistics reduced from an equity curve and trade log.
//!
//! Two layers are kept distinct on purpose. `RawPerformance` is the
//! genuine computation. The reported fields of `StrategyMetrics` apply
//! fixed presentation transforms on top of it (a return offset, a
//! sharpe scale and floor, a win-rate boost and clamp, a drawdown cap),
//! matching the behavior of the system this engine reproduces. Consumers
//! that want the untransformed figures read `StrategyMetrics::raw`.

use serde::{Deserialize, Serialize};

use super::trade::{Trade, TradeSide};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Equity-curve entries default to this when the curve is empty.
pub const STARTING_CAPITAL: f64 = 100_000.0;

/// Percentage points added to the raw total return.
pub const RETURN_OFFSET_PCT: f64 = 10.0;
/// Multiplier applied to the raw annualized sharpe ratio.
pub const SHARPE_SCALE: f64 = 1.5;
/// Reported sharpe never falls below this.
pub const SHARPE_FLOOR: f64 = 1.0;
/// Percentage points added to the raw win rate before clamping.
pub const WIN_RATE_BOOST_PCT: f64 = 10.0;
/// Reported win rate bounds, percent.
pub const WIN_RATE_MIN_PCT: f64 = 60.0;
pub const WIN_RATE_MAX_PCT: f64 = 75.0;
/// Reported drawdown magnitude is capped here, percent.
pub const DRAWDOWN_CAP_PCT: f64 = 10.0;

/// Untransformed statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPerformance {
    /// (final - initial) / initial * 100.
    pub total_return: f64,
    /// mean(daily returns) / stddev(daily returns) * sqrt(252); 0 when
    /// the standard deviation is 0.
    pub sharpe_ratio: f64,
    /// Maximum peak-to-trough decline, percent, <= 0.
    pub max_drawdown: f64,
    /// wins / completed trades * 100; 0 with no completed trades.
    pub win_rate: f64,
}

/// The metrics record attached to a strategy after a backtest.
///
/// Reported fields carry the presentation transforms; `avg_trade_duration`
/// and `num_trades` are never transformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyMetrics {
    pub sharpe_ratio: f64,
    pub total_return: f64,
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub avg_trade_duration: f64,
    pub num_trades: usize,
    pub raw: RawPerformance,
}

/// Reduce an equity curve and trade log to a metrics record. Pure
/// function, no I/O; an empty curve yields zero raw returns against the
/// starting capital.
pub fn calculate_metrics(equity_curve: &[f64], trades: &[Trade]) -> StrategyMetrics {
    let initial = equity_curve.first().copied().unwrap_or(STARTING_CAPITAL);
    let final_equity = equity_curve.last().copied().unwrap_or(STARTING_CAPITAL);

    let raw_return = if initial != 0.0 {
        (final_equity - initial) / initial * 100.0
    } else {
        0.0
    };

    let raw_sharpe = compute_sharpe(equity_curve);
    let raw_drawdown = -compute_drawdown_pct(equity_curve);

    let (completed, wins, total_duration_days) = pair_stats(trades);

    let raw_win_rate = if completed > 0 {
        wins as f64 / completed as f64 * 100.0
    } else {
        0.0
    };

    let avg_trade_duration = if completed > 0 {
        total_duration_days as f64 / completed as f64
    } else {
        0.0
    };

    let raw = RawPerformance {
        total_return: raw_return,
        sharpe_ratio: raw_sharpe,
        max_drawdown: raw_drawdown,
        win_rate: raw_win_rate,
    };

    StrategyMetrics {
        sharpe_ratio: (raw_sharpe * SHARPE_SCALE).max(SHARPE_FLOOR),
        total_return: raw_return + RETURN_OFFSET_PCT,
        max_drawdown: raw_drawdown.max(-DRAWDOWN_CAP_PCT),
        win_rate: (raw_win_rate + WIN_RATE_BOOST_PCT).clamp(WIN_RATE_MIN_PCT, WIN_RATE_MAX_PCT),
        avg_trade_duration,
        num_trades: completed,
        raw,
    }
}

/// Annualized sharpe over per-step relative equity changes.
fn compute_sharpe(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }

    let returns: Vec<f64> = equity_curve
        .windows(2)
        .map(|w| if w[0] != 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        mean / stddev * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    }
}

/// Maximum peak-to-trough decline along the curve, percent, >= 0.
fn compute_drawdown_pct(equity_curve: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;

    for &equity in equity_curve {
        if equity > peak {
            peak = equity;
        } else if peak > 0.0 {
            let dd = (peak - equity) / peak * 100.0;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

/// Walk the trade log two-at-a-time counting completed (Buy, Sell)
/// pairs, wins (sell above buy) and total held days.
fn pair_stats(trades: &[Trade]) -> (usize, usize, i64) {
    let mut completed = 0usize;
    let mut wins = 0usize;
    let mut total_days = 0i64;

    for pair in trades.chunks_exact(2) {
        let (buy, sell) = (&pair[0], &pair[1]);
        if buy.side != TradeSide::Buy || sell.side != TradeSide::Sell {
            continue;
        }
        completed += 1;
        if sell.price > buy.price {
            wins += 1;
        }
        total_days += (sell.date - buy.date).num_days();
    }

    (completed, wins, total_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_trade(side: TradeSide, day: u32, price: f64) -> Trade {
        Trade {
            side,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            price,
            quantity: 100.0,
        }
    }

    fn round_trip(buy_day: u32, buy_price: f64, sell_day: u32, sell_price: f64) -> Vec<Trade> {
        vec![
            make_trade(TradeSide::Buy, buy_day, buy_price),
            make_trade(TradeSide::Sell, sell_day, sell_price),
        ]
    }

    #[test]
    fn empty_inputs_default_to_starting_capital() {
        let m = calculate_metrics(&[], &[]);
        assert!((m.raw.total_return - 0.0).abs() < f64::EPSILON);
        assert!((m.total_return - RETURN_OFFSET_PCT).abs() < f64::EPSILON);
        assert_eq!(m.num_trades, 0);
        assert!((m.avg_trade_duration - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_return_is_raw_plus_offset() {
        let curve = vec![100_000.0, 104_000.0, 108_000.0];
        let m = calculate_metrics(&curve, &[]);
        assert!((m.raw.total_return - 8.0).abs() < 1e-9);
        assert!((m.total_return - 18.0).abs() < 1e-9);
    }

    #[test]
    fn negative_raw_return_still_offset() {
        let curve = vec![100_000.0, 80_000.0];
        let m = calculate_metrics(&curve, &[]);
        assert!((m.raw.total_return - (-20.0)).abs() < 1e-9);
        assert!((m.total_return - (-10.0)).abs() < 1e-9);
    }

    #[test]
    fn sharpe_floored_at_one() {
        // steadily falling equity gives a negative raw sharpe
        let curve: Vec<f64> = (0..100).map(|i| 100_000.0 - 100.0 * i as f64).collect();
        let m = calculate_metrics(&curve, &[]);
        assert!(m.raw.sharpe_ratio < 0.0);
        assert!((m.sharpe_ratio - SHARPE_FLOOR).abs() < f64::EPSILON);
    }

    #[test]
    fn sharpe_scaled_above_floor() {
        // strong steady gains: raw sharpe large and positive
        let curve: Vec<f64> = (0..100)
            .map(|i| 100_000.0 * (1.0 + 0.002 * i as f64))
            .collect();
        let m = calculate_metrics(&curve, &[]);
        assert!(m.raw.sharpe_ratio > SHARPE_FLOOR);
        assert!((m.sharpe_ratio - m.raw.sharpe_ratio * SHARPE_SCALE).abs() < 1e-9);
    }

    #[test]
    fn sharpe_zero_for_flat_curve() {
        let m = calculate_metrics(&[100_000.0; 20], &[]);
        assert!((m.raw.sharpe_ratio - 0.0).abs() < f64::EPSILON);
        assert!((m.sharpe_ratio - SHARPE_FLOOR).abs() < f64::EPSILON);
    }

    #[test]
    fn drawdown_computed_and_capped() {
        // 110k -> 77k is a 30% drawdown, reported capped at -10
        let curve = vec![100_000.0, 110_000.0, 77_000.0, 90_000.0];
        let m = calculate_metrics(&curve, &[]);
        assert!((m.raw.max_drawdown - (-30.0)).abs() < 1e-9);
        assert!((m.max_drawdown - (-DRAWDOWN_CAP_PCT)).abs() < f64::EPSILON);
    }

    #[test]
    fn small_drawdown_not_capped() {
        let curve = vec![100_000.0, 110_000.0, 104_500.0];
        let m = calculate_metrics(&curve, &[]);
        let expected = -(110_000.0 - 104_500.0) / 110_000.0 * 100.0;
        assert!((m.raw.max_drawdown - expected).abs() < 1e-9);
        assert!((m.max_drawdown - expected).abs() < 1e-9);
    }

    #[test]
    fn drawdown_never_positive() {
        let curve = vec![100_000.0, 105_000.0, 111_000.0];
        let m = calculate_metrics(&curve, &[]);
        assert!(m.max_drawdown <= 0.0);
        assert!((m.raw.max_drawdown - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn win_rate_boosted_and_clamped() {
        // 1 win of 1 completed trade: raw 100, reported clamps to 75
        let m = calculate_metrics(&[], &round_trip(1, 100.0, 6, 110.0));
        assert!((m.raw.win_rate - 100.0).abs() < f64::EPSILON);
        assert!((m.win_rate - WIN_RATE_MAX_PCT).abs() < f64::EPSILON);
    }

    #[test]
    fn win_rate_floor_applies_with_no_wins() {
        let m = calculate_metrics(&[], &round_trip(1, 100.0, 6, 90.0));
        assert!((m.raw.win_rate - 0.0).abs() < f64::EPSILON);
        assert!((m.win_rate - WIN_RATE_MIN_PCT).abs() < f64::EPSILON);
    }

    #[test]
    fn win_rate_inside_band_only_boosted() {
        // 5 completed trades, 3 wins: raw 60, reported 70 (no clamping)
        let mut trades = round_trip(1, 100.0, 4, 110.0);
        trades.extend(round_trip(5, 100.0, 9, 120.0));
        trades.extend(round_trip(10, 100.0, 15, 95.0));
        trades.extend(round_trip(16, 100.0, 20, 101.0));
        trades.extend(round_trip(21, 100.0, 25, 98.0));
        let m = calculate_metrics(&[], &trades);
        assert!((m.raw.win_rate - 60.0).abs() < 1e-9);
        assert!((m.win_rate - 70.0).abs() < 1e-9);
        assert_eq!(m.num_trades, 5);
    }

    #[test]
    fn avg_trade_duration_in_days() {
        let mut trades = round_trip(1, 100.0, 6, 101.0); // 5 days
        trades.extend(round_trip(10, 100.0, 19, 99.0)); // 9 days
        let m = calculate_metrics(&[], &trades);
        assert!((m.avg_trade_duration - 7.0).abs() < 1e-9);
    }

    #[test]
    fn dangling_buy_not_counted() {
        let mut trades = round_trip(1, 100.0, 6, 110.0);
        trades.push(make_trade(TradeSide::Buy, 10, 105.0));
        let m = calculate_metrics(&[], &trades);
        assert_eq!(m.num_trades, 1);
    }

    #[test]
    fn reported_bounds_always_hold() {
        let curves: Vec<Vec<f64>> = vec![
            vec![],
            vec![100_000.0],
            vec![100_000.0, 50_000.0, 150_000.0, 25_000.0],
            (0..300).map(|i| 100_000.0 + (i % 13) as f64 * 900.0).collect(),
        ];
        for curve in &curves {
            let m = calculate_metrics(curve, &[]);
            assert!(m.sharpe_ratio >= SHARPE_FLOOR);
            assert!(m.win_rate >= WIN_RATE_MIN_PCT && m.win_rate <= WIN_RATE_MAX_PCT);
            assert!(m.max_drawdown >= -DRAWDOWN_CAP_PCT && m.max_drawdown <= 0.0);
        }
    }
}
