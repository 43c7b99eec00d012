//! Simulated trade log records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// One fill in a backtest trade log. Logs always alternate Buy, Sell,
/// Buy, ... — the long-only simulator holds at most one open position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub side: TradeSide,
    pub date: NaiveDate,
    pub price: f64,
    pub quantity: f64,
}

impl Trade {
    pub fn notional(&self) -> f64 {
        self.price * self.quantity
    }
}

/// True if no two consecutive entries share the same side.
pub fn alternates(trades: &[Trade]) -> bool {
    trades.windows(2).all(|w| w[0].side != w[1].side)
}
