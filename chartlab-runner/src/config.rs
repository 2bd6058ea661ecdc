//! TOML analysis configuration.
//!
//! Every section is optional; missing keys take the defaults below.
//!
//! ```toml
//! [chart]
//! bucket_minutes = 60
//! sma_period = 20
//! ema_period = 10
//! rsi_period = 14
//! show_macd = false
//!
//! [macd]
//! fast = 12
//! slow = 26
//! signal = 9
//!
//! [backtest]
//! stop_loss_pct = 2.0
//! take_profit_pct = 5.0
//!
//! [model]
//! sma_period = 20
//! ema_period = 10
//! rsi_period = 14
//! future_offset = 3
//! tree_count = 25
//! neighbors = 7
//! seed = 42
//!
//! [feed]
//! utc_offset_minutes = 345
//!
//! [refresh]
//! bucket_minutes = 5
//! interval_minutes = 60
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use chartlab_core::backtest::BacktestConfig;
use chartlab_core::data::DEFAULT_UTC_OFFSET_MINUTES;
use chartlab_core::indicators::{IndicatorRequest, MacdParams};
use chartlab_core::ml::{DEFAULT_FUTURE_OFFSET, DEFAULT_NEIGHBORS, DEFAULT_TREE_COUNT};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub chart: ChartSection,
    pub macd: MacdParams,
    pub backtest: BacktestConfig,
    pub model: ModelSection,
    pub feed: FeedSection,
    pub refresh: RefreshSection,
}

/// Chart width and the user-facing indicator periods.
///
/// A period of `None` or `<= 1` leaves that indicator out of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSection {
    pub bucket_minutes: u32,
    pub sma_period: Option<usize>,
    pub ema_period: Option<usize>,
    pub rsi_period: Option<usize>,
    pub show_macd: bool,
}

impl Default for ChartSection {
    fn default() -> Self {
        Self {
            bucket_minutes: 60,
            sma_period: Some(20),
            ema_period: Some(10),
            rsi_period: Some(14),
            show_macd: false,
        }
    }
}

/// Periods and hyperparameters of the model layer, independent of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSection {
    pub sma_period: usize,
    pub ema_period: usize,
    pub rsi_period: usize,
    pub future_offset: usize,
    pub tree_count: usize,
    pub neighbors: usize,
    pub seed: u64,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            sma_period: 20,
            ema_period: 10,
            rsi_period: 14,
            future_offset: DEFAULT_FUTURE_OFFSET,
            tree_count: DEFAULT_TREE_COUNT,
            neighbors: DEFAULT_NEIGHBORS,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSection {
    /// Offset of exchange-local time from UTC.
    pub utc_offset_minutes: i32,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

/// Background refresh: candles are stored at `bucket_minutes` and re-bucketed
/// to the chart width at analysis time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshSection {
    pub bucket_minutes: u32,
    pub interval_minutes: u64,
}

impl Default for RefreshSection {
    fn default() -> Self {
        Self {
            bucket_minutes: 5,
            interval_minutes: 60,
        }
    }
}

impl ChartSection {
    /// Indicator request for the chart; periods `<= 1` are dropped.
    pub fn indicator_request(&self, macd: MacdParams) -> IndicatorRequest {
        let keep = |p: Option<usize>| p.filter(|&p| p > 1);
        IndicatorRequest {
            sma_period: keep(self.sma_period),
            ema_period: keep(self.ema_period),
            rsi_period: keep(self.rsi_period),
            macd: Some(macd),
        }
    }
}

impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.chart.bucket_minutes == 0 || self.refresh.bucket_minutes == 0 {
            return invalid("bucket_minutes must be >= 1");
        }
        if self.macd.fast == 0 || self.macd.slow == 0 || self.macd.signal == 0 {
            return invalid("macd periods must be >= 1");
        }
        let pct_ok = |v: f64| v.is_finite() && v > 0.0;
        if !pct_ok(self.backtest.stop_loss_pct) || !pct_ok(self.backtest.take_profit_pct) {
            return invalid("backtest percentages must be positive");
        }
        if self.backtest.stop_loss_pct >= 100.0 {
            return invalid("stop_loss_pct must be below 100");
        }
        let m = &self.model;
        if m.sma_period == 0 || m.ema_period == 0 || m.rsi_period == 0 {
            return invalid("model periods must be >= 1");
        }
        if m.future_offset == 0 {
            return invalid("future_offset must be >= 1");
        }
        if m.neighbors == 0 {
            return invalid("neighbors must be >= 1");
        }
        if self.refresh.interval_minutes == 0 {
            return invalid("refresh interval_minutes must be >= 1");
        }
        Ok(())
    }
}
