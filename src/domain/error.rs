//! Engine and surface error types.
//!
//! Only two errors terminate a backtest call: `EmptyMarketData` and
//! `InsufficientData`. Everything else the simulator encounters
//! (indicator length mismatches, warm-up zeros, missing RSI entries)
//! recovers locally and degrades into a result. The remaining variants
//! belong to the outer surfaces (config loading, data files).

/// Top-level error type for evotrader.
#[derive(Debug, thiserror::Error)]
pub enum EvotraderError {
    #[error("no usable market data supplied")]
    EmptyMarketData,

    #[error("insufficient market data: have {have} valid bars, need {need}")]
    InsufficientData { have: usize, need: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data load error: {reason}")]
    DataLoad { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&EvotraderError> for std::process::ExitCode {
    fn from(err: &EvotraderError) -> Self {
        let code: u8 = match err {
            EvotraderError::Io(_) => 1,
            EvotraderError::ConfigParse { .. }
            | EvotraderError::ConfigMissing { .. }
            | EvotraderError::ConfigInvalid { .. } => 2,
            EvotraderError::DataLoad { .. } => 3,
            EvotraderError::EmptyMarketData | EvotraderError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
