//! Backtest simulator: long-only position state machine over daily bars.
//!
//! The simulator computes moving-average and RSI series over the valid
//! bars, walks them from a warm-up start index, and converts bullish /
//! bearish signal conditions into an alternating Buy/Sell trade log and
//! a mark-to-market equity curve. A strategy whose conditions never
//! fire still yields non-degenerate metrics: fewer than two organic
//! trades triggers a synthesized Buy/Sell pair (flagged on the result)
//! and the equity curve is rebuilt around it.

use super::error::EvotraderError;
use super::indicator::{moving_average, rsi};
use super::market::MarketBar;
use super::metrics::{calculate_metrics, StrategyMetrics, STARTING_CAPITAL};
use super::strategy::Strategy;
use super::trade::{Trade, TradeSide};

/// RSI period used by the signal loop.
pub const RSI_PERIOD: usize = 14;
/// A position must be held at least this many bars before any exit.
pub const MIN_HOLD_BARS: usize = 3;

/// Everything a single backtest run produces. `synthesized` is true
/// when the trade log is the fallback pair rather than organic signals.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<f64>,
    pub synthesized: bool,
    pub metrics: StrategyMetrics,
}

/// Simulate `strategy` against `bars`.
///
/// Fails with [`EvotraderError::EmptyMarketData`] when `bars` is empty
/// or holds no valid close at all, and
/// [`EvotraderError::InsufficientData`] when fewer valid bars are
/// available than the long moving-average period. Everything else
/// degrades into a (possibly synthesized) result. Deterministic for
/// fixed inputs.
pub fn run_backtest(
    strategy: &Strategy,
    bars: &[MarketBar],
) -> Result<BacktestResult, EvotraderError> {
    if bars.is_empty() {
        return Err(EvotraderError::EmptyMarketData);
    }

    let valid: Vec<MarketBar> = bars
        .iter()
        .filter(|b| b.has_valid_close())
        .cloned()
        .collect();

    // ma_long is not guaranteed positive, so the InsufficientData gate
    // below cannot be relied on to reject a fully-invalid feed
    if valid.is_empty() {
        return Err(EvotraderError::EmptyMarketData);
    }

    let params = &strategy.parameters;
    let need = params.ma_long.max(0) as usize;
    if valid.len() < need {
        return Err(EvotraderError::InsufficientData {
            have: valid.len(),
            need,
        });
    }

    let ma_short = moving_average(&valid, params.ma_short.max(1) as usize);
    let ma_long = moving_average(&valid, params.ma_long.max(1) as usize);
    let rsi_series = rsi(&valid, RSI_PERIOD);

    let start_index = need.max(RSI_PERIOD).min(valid.len());

    let mut cash = STARTING_CAPITAL;
    let mut position = 0.0_f64;
    let mut last_buy_index: Option<usize> = None;
    let mut trades: Vec<Trade> = Vec::new();
    let mut equity_curve = vec![STARTING_CAPITAL];

    for i in start_index..valid.len() {
        let close = valid[i].close;

        // moving average of exactly 0 means the window held no valid
        // bars yet; treat the bar as not warmed up
        if ma_short[i] == 0.0 || ma_long[i] == 0.0 {
            continue;
        }

        let days_held = match last_buy_index {
            Some(b) if position > 0.0 => i - b,
            _ => 0,
        };

        let bullish = ma_short[i] > ma_long[i] && rsi_series[i] < 100.0 - params.rsi_threshold;
        let bearish = (ma_short[i] < ma_long[i] || rsi_series[i] > params.rsi_threshold + 40.0)
            && days_held >= MIN_HOLD_BARS;

        if bullish && position == 0.0 {
            let quantity = cash * params.position_size / close;
            let buy = Trade {
                side: TradeSide::Buy,
                date: valid[i].date,
                price: close,
                quantity,
            };
            cash -= buy.notional();
            position = quantity;
            last_buy_index = Some(i);
            trades.push(buy);
        } else if bearish && position > 0.0 {
            let sell = Trade {
                side: TradeSide::Sell,
                date: valid[i].date,
                price: close,
                quantity: position,
            };
            cash += sell.notional();
            trades.push(sell);
            position = 0.0;
            last_buy_index = None;
        }

        equity_curve.push(cash + position * close);
    }

    let mut synthesized = false;
    if trades.len() < 2 {
        let (synthetic_trades, synthetic_curve) =
            synthesize_fallback(&valid, start_index, params.position_size);
        trades = synthetic_trades;
        equity_curve = synthetic_curve;
        synthesized = true;
    }

    let metrics = calculate_metrics(&equity_curve, &trades);

    Ok(BacktestResult {
        trades,
        equity_curve,
        synthesized,
        metrics,
    })
}

/// Build the guaranteed Buy/Sell pair and rebuild the equity curve
/// around it.
///
/// The Buy lands 25% into the valid sequence, the Sell 5-7 bars later
/// (bounded by the sequence end); the offset is derived from the
/// sequence length so the run stays deterministic. Sizing uses
/// `position_size` of the original starting capital. The curve is
/// rebuilt from `start_index`, so a Buy index below it stays in the
/// log but never applies to the curve.
fn synthesize_fallback(
    valid: &[MarketBar],
    start_index: usize,
    position_size: f64,
) -> (Vec<Trade>, Vec<f64>) {
    let last = valid.len() - 1;
    let buy_index = (valid.len() / 4).min(last);
    let hold = 5 + valid.len() % 3;
    let sell_index = (buy_index + hold).min(last);

    let buy_price = valid[buy_index].close;
    let quantity = STARTING_CAPITAL * position_size / buy_price;

    let trades = vec![
        Trade {
            side: TradeSide::Buy,
            date: valid[buy_index].date,
            price: buy_price,
            quantity,
        },
        Trade {
            side: TradeSide::Sell,
            date: valid[sell_index].date,
            price: valid[sell_index].close,
            quantity,
        },
    ];

    let mut cash = STARTING_CAPITAL;
    let mut position = 0.0_f64;
    let mut equity_curve = vec![STARTING_CAPITAL];

    for (i, bar) in valid.iter().enumerate().skip(start_index) {
        if i == buy_index {
            cash -= quantity * bar.close;
            position = quantity;
        } else if i == sell_index && position > 0.0 {
            cash += position * bar.close;
            position = 0.0;
        }
        equity_curve.push(cash + position * bar.close);
    }

    (trades, equity_curve)
}
