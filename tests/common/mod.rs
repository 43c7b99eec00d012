#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use evotrader::domain::error::EvotraderError;
pub use evotrader::domain::market::MarketBar;
use evotrader::domain::strategy::{Strategy, StrategyParameters};
use evotrader::ports::data_port::MarketDataPort;

pub struct MockBarPort {
    pub bars: Vec<MarketBar>,
    pub error: Option<String>,
}

impl MockBarPort {
    pub fn new() -> Self {
        Self {
            bars: Vec::new(),
            error: None,
        }
    }

    pub fn with_bars(mut self, bars: Vec<MarketBar>) -> Self {
        self.bars = bars;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl MarketDataPort for MockBarPort {
    fn fetch_bars(&self) -> Result<Vec<MarketBar>, EvotraderError> {
        if let Some(reason) = &self.error {
            return Err(EvotraderError::DataLoad {
                reason: reason.clone(),
            });
        }
        Ok(self.bars.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> MarketBar {
    MarketBar {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1_000_000,
    }
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<MarketBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| MarketBar {
            date: start + Duration::days(i as i64),
            open: c,
            high: c * 1.01,
            low: c * 0.99,
            close: c,
            volume: 1_000_000,
        })
        .collect()
}

/// Decline, zigzag rise, zigzag fall, zigzag rise. The zigzag phases
/// keep RSI off its extremes so the crossover conditions can fire.
pub fn trending_closes(len: usize) -> Vec<f64> {
    let mut closes = Vec::with_capacity(len);
    let mut price: f64 = 100.0;
    for i in 0..len {
        let step = if i < 60 {
            -0.2
        } else if i < 130 {
            if i % 2 == 0 { 1.5 } else { -1.0 }
        } else if i < 190 {
            if i % 2 == 0 { -1.5 } else { 1.0 }
        } else {
            if i % 2 == 0 { 1.5 } else { -1.0 }
        };
        price += step;
        closes.push(price.max(5.0));
    }
    closes
}

pub fn make_strategy(ma_short: i64, ma_long: i64) -> Strategy {
    Strategy::base(
        "Test",
        StrategyParameters {
            ma_short,
            ma_long,
            rsi_threshold: 30.0,
            position_size: 0.15,
            stop_loss: None,
            take_profit: None,
        },
    )
}
