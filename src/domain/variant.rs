//! Parameter variant generation for iterative strategy search.
//!
//! Variants perturb a base strategy's parameters within hard bounds and
//! record lineage through `parent_id`. No market data is consulted; the
//! generator is the only randomized engine operation besides synthetic
//! sample data, and both accept an external RNG for seeded runs.

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use super::strategy::{Strategy, StrategyParameters, StrategyType};

/// Position size is forced into this band for every descendant,
/// regardless of the ancestor's value.
pub const POSITION_SIZE_MIN: f64 = 0.10;
pub const POSITION_SIZE_MAX: f64 = 0.20;
/// Moving-average period floors.
pub const MA_SHORT_FLOOR: i64 = 10;
pub const MA_LONG_FLOOR: i64 = 30;
/// RSI threshold bounds.
pub const RSI_THRESHOLD_MIN: f64 = 25.0;
pub const RSI_THRESHOLD_MAX: f64 = 35.0;

/// Default variant batch size.
pub const DEFAULT_VARIANT_COUNT: usize = 10;

/// Generate `count` perturbed copies of `base` using the thread RNG.
pub fn generate_variants(base: &Strategy, count: usize) -> Vec<Strategy> {
    generate_variants_with_rng(base, count, &mut rand::thread_rng())
}

/// Generate `count` perturbed copies of `base`.
///
/// Each variant gets a fresh id, `parent_id = base.id` and type
/// `Optimized`. Perturbations are independent per variant:
/// - `position_size` scaled by uniform [0.8, 1.4], clamped to [0.10, 0.20]
/// - `ma_short` + uniform [-5, +5], floored at 10
/// - `ma_long` + uniform [-10, +10], floored at 30
/// - `rsi_threshold` + uniform [-5, +5], clamped to [25, 35]
///
/// No ordering between `ma_short` and `ma_long` is enforced; the
/// simulator tolerates `ma_short >= ma_long`.
pub fn generate_variants_with_rng<R: Rng + ?Sized>(
    base: &Strategy,
    count: usize,
    rng: &mut R,
) -> Vec<Strategy> {
    (0..count)
        .map(|i| Strategy {
            id: Uuid::new_v4(),
            owner: base.owner.clone(),
            name: format!("{} variant {}", base.name, i + 1),
            strategy_type: StrategyType::Optimized,
            parameters: perturb(&base.parameters, rng),
            metrics: None,
            created_at: Utc::now(),
            parent_id: Some(base.id),
        })
        .collect()
}

fn perturb<R: Rng + ?Sized>(base: &StrategyParameters, rng: &mut R) -> StrategyParameters {
    let position_size = (base.position_size * rng.gen_range(0.8..=1.4))
        .clamp(POSITION_SIZE_MIN, POSITION_SIZE_MAX);

    let ma_short =
        ((base.ma_short as f64 + rng.gen_range(-5.0..=5.0)).round() as i64).max(MA_SHORT_FLOOR);
    let ma_long =
        ((base.ma_long as f64 + rng.gen_range(-10.0..=10.0)).round() as i64).max(MA_LONG_FLOOR);

    let rsi_threshold = (base.rsi_threshold + rng.gen_range(-5.0..=5.0))
        .clamp(RSI_THRESHOLD_MIN, RSI_THRESHOLD_MAX);

    StrategyParameters {
        ma_short,
        ma_long,
        rsi_threshold,
        position_size,
        stop_loss: base.stop_loss,
        take_profit: base.take_profit,
    }
}
