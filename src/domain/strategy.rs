//! Strategy identity, parameters and lineage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::metrics::StrategyMetrics;

/// Tunable parameters driving the backtest signal logic.
///
/// `ma_long > ma_short` is expected but not enforced; the simulator
/// tolerates either ordering. `stop_loss`/`take_profit` are reserved
/// fields carried across the boundary but not wired to any exit logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParameters {
    pub ma_short: i64,
    pub ma_long: i64,
    pub rsi_threshold: f64,
    pub position_size: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyType {
    Base,
    Optimized,
    Hybrid,
}

/// A strategy is immutable once created; metrics are attached after a
/// backtest run via [`Strategy::with_metrics`], never mutated in place.
/// Strategies form a forest: `parent_id` records the base strategy a
/// variant was perturbed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: Uuid,
    pub owner: Option<String>,
    pub name: String,
    pub strategy_type: StrategyType,
    pub parameters: StrategyParameters,
    pub metrics: Option<StrategyMetrics>,
    pub created_at: DateTime<Utc>,
    pub parent_id: Option<Uuid>,
}

impl Strategy {
    /// Create a root strategy with no lineage and no metrics.
    pub fn base(name: impl Into<String>, parameters: StrategyParameters) -> Self {
        Strategy {
            id: Uuid::new_v4(),
            owner: None,
            name: name.into(),
            strategy_type: StrategyType::Base,
            parameters,
            metrics: None,
            created_at: Utc::now(),
            parent_id: None,
        }
    }

    /// Return a copy of this strategy with metrics attached.
    pub fn with_metrics(&self, metrics: StrategyMetrics) -> Self {
        Strategy {
            metrics: Some(metrics),
            ..self.clone()
        }
    }
}
