//! Core engine types and logic.

pub mod market;
pub mod strategy;
pub mod indicator;
pub mod variant;
pub mod trade;
pub mod backtest;
pub mod metrics;
pub mod sample_data;
pub mod config_validation;
pub mod error;
