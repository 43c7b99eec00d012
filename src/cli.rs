//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::cmp::Ordering;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvBarAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::synthetic_adapter::SyntheticDataAdapter;
use crate::domain::backtest::{run_backtest, BacktestResult};
use crate::domain::config_validation::{validate_evolution_config, validate_strategy_config};
use crate::domain::market::MarketBar;
use crate::domain::metrics::StrategyMetrics;
use crate::domain::sample_data::{generate_sample_data, generate_sample_data_with_rng};
use crate::domain::strategy::{Strategy, StrategyParameters};
use crate::domain::variant::{generate_variants, generate_variants_with_rng, DEFAULT_VARIANT_COUNT};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "evotrader", about = "Strategy evolution engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate variants of the base strategy and rank them by backtest
    Evolve {
        #[arg(short, long)]
        config: PathBuf,
        /// CSV bar file; synthetic data is generated when omitted
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        days: Option<usize>,
        #[arg(long)]
        variants: Option<usize>,
        /// Seed for synthetic data and variant perturbation
        #[arg(long)]
        seed: Option<u64>,
        /// Write the ranked results as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Backtest the base strategy alone
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data: Option<PathBuf>,
        #[arg(long)]
        days: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Generate a synthetic bar file
    SampleData {
        #[arg(long, default_value_t = 252)]
        days: usize,
        #[arg(short, long, default_value = "sample_data.csv")]
        output: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Evolve {
            config,
            data,
            days,
            variants,
            seed,
            output,
        } => run_evolve(
            &config,
            data.as_ref(),
            days,
            variants,
            seed,
            output.as_ref(),
        ),
        Command::Backtest {
            config,
            data,
            days,
            seed,
        } => run_backtest_command(&config, data.as_ref(), days, seed),
        Command::SampleData { days, output, seed } => run_sample_data(days, &output, seed),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Build the base strategy from the [strategy] config section,
/// applying the engine defaults for absent keys.
pub fn build_base_strategy(config: &dyn ConfigPort) -> Strategy {
    let name = config
        .get_string("strategy", "name")
        .unwrap_or_else(|| "Base Strategy".to_string());

    let parameters = StrategyParameters {
        ma_short: config.get_int("strategy", "ma_short", 20),
        ma_long: config.get_int("strategy", "ma_long", 50),
        rsi_threshold: config.get_double("strategy", "rsi_threshold", 30.0),
        position_size: config.get_double("strategy", "position_size", 0.15),
        stop_loss: parse_optional_double(config, "strategy", "stop_loss"),
        take_profit: parse_optional_double(config, "strategy", "take_profit"),
    };

    let mut strategy = Strategy::base(name, parameters);
    strategy.owner = config.get_string("strategy", "owner");
    strategy
}

fn parse_optional_double(config: &dyn ConfigPort, section: &str, key: &str) -> Option<f64> {
    config
        .get_string(section, key)
        .and_then(|s| s.trim().parse().ok())
}

fn fetch_bars(
    data_path: Option<&PathBuf>,
    config: &dyn ConfigPort,
    days_override: Option<usize>,
    seed: Option<u64>,
) -> Result<Vec<MarketBar>, ExitCode> {
    let days = days_override
        .unwrap_or_else(|| config.get_int("evolution", "days", 252).max(0) as usize);

    let configured_path = config.get_string("data", "path").map(PathBuf::from);
    let path = data_path.cloned().or(configured_path);

    let bars = match path {
        Some(p) => {
            eprintln!("Loading bars from {}", p.display());
            CsvBarAdapter::new(p).fetch_bars()
        }
        None => {
            eprintln!("Generating {} days of synthetic data", days);
            SyntheticDataAdapter::new(days, seed).fetch_bars()
        }
    };

    bars.map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

#[derive(Serialize)]
struct RankedEntry<'a> {
    rank: usize,
    synthesized: bool,
    strategy: &'a Strategy,
}

fn run_evolve(
    config_path: &PathBuf,
    data_path: Option<&PathBuf>,
    days: Option<usize>,
    variant_count: Option<usize>,
    seed: Option<u64>,
    output_path: Option<&PathBuf>,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_evolution_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 2: Build base strategy
    let base = build_base_strategy(&adapter);
    eprintln!(
        "Base strategy: {} (ma {}/{}, rsi {}, size {:.2})",
        base.name,
        base.parameters.ma_short,
        base.parameters.ma_long,
        base.parameters.rsi_threshold,
        base.parameters.position_size,
    );

    // Stage 3: Fetch market data
    let bars = match fetch_bars(data_path, &adapter, days, seed) {
        Ok(b) => b,
        Err(code) => return code,
    };

    // Stage 4: Backtest the base
    let base_result = match run_backtest(&base, &bars) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let base = base.with_metrics(base_result.metrics.clone());

    // Stage 5: Generate variants
    let count = variant_count.unwrap_or_else(|| {
        adapter
            .get_int("evolution", "variants", DEFAULT_VARIANT_COUNT as i64)
            .max(0) as usize
    });
    eprintln!("Generating {} variants", count);
    let variants = match seed {
        Some(s) => generate_variants_with_rng(&base, count, &mut StdRng::seed_from_u64(s)),
        None => generate_variants(&base, count),
    };

    // Stage 6: Backtest every variant
    let mut ranked: Vec<(Strategy, BacktestResult)> = vec![(base, base_result)];
    for variant in variants {
        match run_backtest(&variant, &bars) {
            Ok(result) => {
                let variant = variant.with_metrics(result.metrics.clone());
                ranked.push((variant, result));
            }
            Err(e) => {
                eprintln!("warning: skipping {} ({})", variant.name, e);
            }
        }
    }

    // Stage 7: Rank by reported sharpe
    ranked.sort_by(|a, b| {
        b.1.metrics
            .sharpe_ratio
            .partial_cmp(&a.1.metrics.sharpe_ratio)
            .unwrap_or(Ordering::Equal)
    });

    eprintln!("\n=== Leaderboard ===");
    for (rank, (strategy, result)) in ranked.iter().enumerate() {
        let tag = if result.synthesized { " [synthesized]" } else { "" };
        eprintln!(
            "  {:>2}. {:<32} sharpe {:>5.2}  return {:>7.2}%  dd {:>6.1}%  win {:>5.1}%  trades {}{}",
            rank + 1,
            strategy.name,
            result.metrics.sharpe_ratio,
            result.metrics.total_return,
            result.metrics.max_drawdown,
            result.metrics.win_rate,
            result.metrics.num_trades,
            tag,
        );
    }

    // Stage 8: Optional JSON report
    if let Some(output) = output_path {
        let entries: Vec<RankedEntry> = ranked
            .iter()
            .enumerate()
            .map(|(i, (strategy, result))| RankedEntry {
                rank: i + 1,
                synthesized: result.synthesized,
                strategy,
            })
            .collect();

        let json = match serde_json::to_string_pretty(&entries) {
            Ok(j) => j,
            Err(e) => {
                eprintln!("error: failed to serialize results: {e}");
                return ExitCode::from(1);
            }
        };
        if let Err(e) = fs::write(output, json) {
            eprintln!("error: failed to write {}: {}", output.display(), e);
            return ExitCode::from(1);
        }
        eprintln!("\nResults written to: {}", output.display());
    }

    ExitCode::SUCCESS
}

fn run_backtest_command(
    config_path: &PathBuf,
    data_path: Option<&PathBuf>,
    days: Option<usize>,
    seed: Option<u64>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let strategy = build_base_strategy(&adapter);
    let bars = match fetch_bars(data_path, &adapter, days, seed) {
        Ok(b) => b,
        Err(code) => return code,
    };

    eprintln!("Running backtest: {} over {} bars", strategy.name, bars.len());
    let result = match run_backtest(&strategy, &bars) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_metrics(&result.metrics, result.synthesized);
    ExitCode::SUCCESS
}

fn print_metrics(metrics: &StrategyMetrics, synthesized: bool) {
    eprintln!("\n=== Results ===");
    if synthesized {
        eprintln!("  (no organic signals; trades were synthesized)");
    }
    eprintln!(
        "Total Return:     {:.2}%  (raw {:.2}%)",
        metrics.total_return, metrics.raw.total_return
    );
    eprintln!(
        "Sharpe Ratio:     {:.2}  (raw {:.2})",
        metrics.sharpe_ratio, metrics.raw.sharpe_ratio
    );
    eprintln!(
        "Max Drawdown:     {:.1}%  (raw {:.1}%)",
        metrics.max_drawdown, metrics.raw.max_drawdown
    );
    eprintln!(
        "Win Rate:         {:.1}%  (raw {:.1}%)",
        metrics.win_rate, metrics.raw.win_rate
    );
    eprintln!("Completed Trades: {}", metrics.num_trades);
    eprintln!("Avg Duration:     {:.1} days", metrics.avg_trade_duration);
}

fn run_sample_data(days: usize, output: &PathBuf, seed: Option<u64>) -> ExitCode {
    eprintln!("Generating {} days of synthetic data", days);
    let bars = match seed {
        Some(s) => {
            let start = chrono::Utc::now().date_naive() - chrono::Duration::days(days as i64);
            generate_sample_data_with_rng(days, start, &mut StdRng::seed_from_u64(s))
        }
        None => generate_sample_data(days),
    };

    match CsvBarAdapter::write_bars(output, &bars) {
        Ok(()) => {
            eprintln!("Wrote {} bars to {}", bars.len(), output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_evolution_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let strategy = build_base_strategy(&adapter);
    eprintln!("\nStrategy:");
    eprintln!("  name:          {}", strategy.name);
    eprintln!("  ma_short:      {}", strategy.parameters.ma_short);
    eprintln!("  ma_long:       {}", strategy.parameters.ma_long);
    eprintln!("  rsi_threshold: {}", strategy.parameters.rsi_threshold);
    eprintln!("  position_size: {}", strategy.parameters.position_size);

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
