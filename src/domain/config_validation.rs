//! Configuration validation.
//!
//! Validates the [strategy] and [evolution] sections before a run.

use crate::domain::error::EvotraderError;
use crate::ports::config_port::ConfigPort;

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), EvotraderError> {
    validate_ma_periods(config)?;
    validate_rsi_threshold(config)?;
    validate_position_size(config)?;
    validate_reserved_exits(config)?;
    Ok(())
}

pub fn validate_evolution_config(config: &dyn ConfigPort) -> Result<(), EvotraderError> {
    let variants = config.get_int("evolution", "variants", 10);
    if variants < 1 {
        return Err(invalid("evolution", "variants", "must be at least 1"));
    }
    let days = config.get_int("evolution", "days", 252);
    if days < 1 {
        return Err(invalid("evolution", "days", "must be at least 1"));
    }
    Ok(())
}

fn validate_ma_periods(config: &dyn ConfigPort) -> Result<(), EvotraderError> {
    let ma_short = config.get_int("strategy", "ma_short", 20);
    if ma_short < 1 {
        return Err(invalid("strategy", "ma_short", "must be at least 1"));
    }
    let ma_long = config.get_int("strategy", "ma_long", 50);
    if ma_long < 1 {
        return Err(invalid("strategy", "ma_long", "must be at least 1"));
    }
    Ok(())
}

fn validate_rsi_threshold(config: &dyn ConfigPort) -> Result<(), EvotraderError> {
    let value = config.get_double("strategy", "rsi_threshold", 30.0);
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(
            "strategy",
            "rsi_threshold",
            "must be between 0 and 100",
        ));
    }
    Ok(())
}

fn validate_position_size(config: &dyn ConfigPort) -> Result<(), EvotraderError> {
    let value = config.get_double("strategy", "position_size", 0.15);
    if value <= 0.0 || value > 1.0 {
        return Err(invalid(
            "strategy",
            "position_size",
            "must be a fraction in (0, 1]",
        ));
    }
    Ok(())
}

fn validate_reserved_exits(config: &dyn ConfigPort) -> Result<(), EvotraderError> {
    for key in ["stop_loss", "take_profit"] {
        let value = config.get_double("strategy", key, 0.0);
        if value < 0.0 {
            return Err(invalid("strategy", key, "must be non-negative"));
        }
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> EvotraderError {
    EvotraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
