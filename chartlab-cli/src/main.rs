//! ChartLab CLI: candle aggregation, chart analysis and feed refresh commands.
//!
//! Commands:
//! - `aggregate`: bucket a feed dump of ticks into candles (JSON to stdout)
//! - `analyze`: run indicators, signals, backtest and model output for a stored ticker
//! - `refresh`: pull every ticker from a feed directory into the candle store

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use chartlab_core::data::{aggregate, decode_ticks};
use chartlab_runner::{
    analysis_json, analyze_ticker, refresh_tickers, run_refresh_loop, AnalysisConfig,
    ChartAnalysis, CsvCandleStore, JsonTickSource, RunError,
};

#[derive(Parser)]
#[command(
    name = "chartlab",
    about = "ChartLab CLI, candle charts, crossover signals and model filters"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bucket a JSON feed dump of ticks into candles.
    Aggregate {
        /// Feed dump: JSON array of {contractRate, contractQuantity, time}.
        #[arg(long)]
        input: PathBuf,

        /// Bucket width in minutes.
        #[arg(long, default_value_t = 60)]
        minutes: u32,

        /// Local offset from UTC in minutes. Defaults to the config value (+05:45).
        #[arg(long)]
        utc_offset: Option<i32>,
    },
    /// Analyse one ticker from the candle store.
    Analyze {
        #[arg(long)]
        ticker: String,

        /// Candle store directory.
        #[arg(long, default_value = "data")]
        store: PathBuf,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the chart bucket width.
        #[arg(long)]
        minutes: Option<u32>,

        /// Include the MACD series in the output.
        #[arg(long, default_value_t = false)]
        show_macd: bool,

        /// Directory for `<TICKER>.json`. Prints to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Refresh every ticker in a feed directory into the candle store.
    Refresh {
        /// Directory of `<TICKER>.json` feed dumps.
        #[arg(long)]
        feed: PathBuf,

        /// Candle store directory.
        #[arg(long, default_value = "data")]
        store: PathBuf,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Run a single pass instead of repeating on the configured interval.
        #[arg(long, default_value_t = false)]
        once: bool,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Aggregate {
            input,
            minutes,
            utc_offset,
        } => run_aggregate(&input, minutes, utc_offset),
        Commands::Analyze {
            ticker,
            store,
            config,
            minutes,
            show_macd,
            output,
        } => run_analyze(&ticker, &store, config, minutes, show_macd, output),
        Commands::Refresh {
            feed,
            store,
            config,
            once,
        } => run_refresh(&feed, &store, config, once),
    }
}

/// Structured logs to stderr, INFO unless `RUST_LOG` says otherwise.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn run_aggregate(input: &Path, minutes: u32, utc_offset: Option<i32>) -> Result<()> {
    if minutes == 0 {
        bail!("--minutes must be at least 1");
    }
    let offset = utc_offset.unwrap_or(AnalysisConfig::default().feed.utc_offset_minutes);
    let payload = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let ticks = decode_ticks(&payload, offset)?;
    let candles = aggregate(&ticks, minutes);
    info!(ticks = ticks.len(), candles = candles.len(), minutes, "aggregated");
    println!("{}", serde_json::to_string_pretty(&candles)?);
    Ok(())
}

fn run_analyze(
    ticker: &str,
    store_dir: &Path,
    config_path: Option<PathBuf>,
    minutes: Option<u32>,
    show_macd: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(minutes) = minutes {
        config.chart.bucket_minutes = minutes;
    }
    config.chart.show_macd |= show_macd;
    config.validate()?;

    let store = CsvCandleStore::open(store_dir)?;
    let analysis = match analyze_ticker(&store, ticker, &config) {
        Err(RunError::NoCandles(_)) => {
            bail!(
                "no candles stored for {ticker} in {}; stored tickers: {}",
                store_dir.display(),
                store.tickers()?.join(", ")
            )
        }
        result => result?,
    };
    let json = analysis_json(&analysis)?;

    match output {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let path = dir.join(format!("{ticker}.json"));
            std::fs::write(&path, json)?;
            print_summary(&analysis);
            println!("Analysis saved to: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_refresh(
    feed: &Path,
    store_dir: &Path,
    config_path: Option<PathBuf>,
    once: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let source = JsonTickSource::new(feed, config.feed.utc_offset_minutes);
    let store = CsvCandleStore::open(store_dir)?;

    if !once {
        let interval = Duration::from_secs(config.refresh.interval_minutes * 60);
        info!(
            interval_minutes = config.refresh.interval_minutes,
            "starting refresh loop"
        );
        run_refresh_loop(&source, &store, config.refresh.bucket_minutes, interval);
    }

    let summary = refresh_tickers(&source, &store, config.refresh.bucket_minutes)?;
    println!(
        "Refreshed {} ticker(s) in {} ms",
        summary.updated(),
        summary.elapsed_ms
    );
    let failed = summary.failed();
    if !failed.is_empty() {
        bail!("refresh failed for: {}", failed.join(", "));
    }
    Ok(())
}

fn print_summary(analysis: &ChartAnalysis) {
    println!("Ticker:  {}", analysis.ticker);
    println!("Candles: {}", analysis.candles.len());
    if let Some(signals) = &analysis.signals {
        println!("Signals: {}", signals.len());
    }
    if let Some(report) = &analysis.filter_report {
        println!(
            "Filter:  {}/{} accepted, avg confidence {:.2}",
            report.accepted_signals, report.original_signals, report.average_confidence
        );
        for note in &report.notes {
            println!("         {note}");
        }
    }
    if let Some(bt) = &analysis.backtest {
        println!(
            "Backtest: {} trades, {} wins, {} losses ({:.0}% win rate), profit {:.2}, max drawdown {:.2}",
            bt.total_trades,
            bt.wins,
            bt.losses,
            bt.win_rate() * 100.0,
            bt.total_profit,
            bt.max_drawdown
        );
    }
    match &analysis.prediction {
        Some(p) => println!(
            "KNN:     {:?} ({:.0}%) {}",
            p.direction,
            p.confidence * 100.0,
            p.explanation
        ),
        None => println!("KNN:     not enough data"),
    }
}
