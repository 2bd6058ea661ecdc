//! ChartLab Runner: configuration, storage, refresh and analysis orchestration.
//!
//! This crate builds on `chartlab-core` to provide:
//! - TOML analysis configuration with validated defaults
//! - File-backed tick source (JSON feed dumps) and CSV candle store
//! - Parallel per-ticker refresh with failure isolation
//! - Single-ticker chart analysis producing one result aggregate

pub mod analysis;
pub mod config;
pub mod refresh;
pub mod runner;
pub mod store;

pub use analysis::{analyze, ChartAnalysis, PeriodSeries};
pub use config::{
    AnalysisConfig, ChartSection, ConfigError, FeedSection, ModelSection, RefreshSection,
};
pub use refresh::{refresh_tickers, run_refresh_loop, RefreshSummary, TickerOutcome};
pub use runner::{analysis_json, analyze_ticker, RunError};
pub use store::{CsvCandleStore, JsonTickSource};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_is_send_sync() {
        assert_send::<AnalysisConfig>();
        assert_sync::<AnalysisConfig>();
    }

    #[test]
    fn analysis_is_send_sync() {
        assert_send::<ChartAnalysis>();
        assert_sync::<ChartAnalysis>();
    }

    #[test]
    fn stores_are_send_sync() {
        assert_send::<CsvCandleStore>();
        assert_sync::<CsvCandleStore>();
        assert_send::<JsonTickSource>();
        assert_sync::<JsonTickSource>();
    }

    #[test]
    fn refresh_summary_is_send_sync() {
        assert_send::<RefreshSummary>();
        assert_sync::<RefreshSummary>();
    }

    #[test]
    fn run_error_is_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }
}
