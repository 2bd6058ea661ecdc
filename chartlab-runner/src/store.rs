//! File-backed tick source and candle store.
//!
//! - `JsonTickSource` reads one feed payload per ticker from `<dir>/<TICKER>.json`.
//! - `CsvCandleStore` keeps one CSV per ticker at `<dir>/<TICKER>.csv`.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chartlab_core::data::{
    check_candles, decode_ticks, merge_candles, CandleStore, DataError, TickSource,
};
use chartlab_core::domain::{Candle, Tick};

/// Tickers become file names; anything beyond this alphabet is rejected.
fn checked_ticker(ticker: &str) -> Result<&str, DataError> {
    let ok = !ticker.is_empty()
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !ticker.starts_with('.');
    if ok {
        Ok(ticker)
    } else {
        Err(DataError::Other(format!("invalid ticker name: {ticker:?}")))
    }
}

/// File stems with the given extension, sorted.
fn stems_with_extension(dir: &Path, extension: &str) -> Result<Vec<String>, DataError> {
    let mut stems = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.push(stem.to_string());
        }
    }
    stems.sort();
    Ok(stems)
}

#[derive(Debug, Clone)]
pub struct JsonTickSource {
    dir: PathBuf,
    utc_offset_minutes: i32,
}

impl JsonTickSource {
    pub fn new(dir: impl Into<PathBuf>, utc_offset_minutes: i32) -> Self {
        Self {
            dir: dir.into(),
            utc_offset_minutes,
        }
    }
}

impl TickSource for JsonTickSource {
    fn name(&self) -> &str {
        "json-feed"
    }

    fn list_tickers(&self) -> Result<Vec<String>, DataError> {
        stems_with_extension(&self.dir, "json")
    }

    fn fetch_ticks(&self, ticker: &str) -> Result<Vec<Tick>, DataError> {
        let path = self.dir.join(format!("{}.json", checked_ticker(ticker)?));
        if !path.exists() {
            return Err(DataError::TickerNotFound {
                ticker: ticker.to_string(),
            });
        }
        let payload = fs::read_to_string(&path)?;
        decode_ticks(&payload, self.utc_offset_minutes)
    }
}

#[derive(Debug, Clone)]
pub struct CsvCandleStore {
    dir: PathBuf,
}

impl CsvCandleStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn tickers(&self) -> Result<Vec<String>, DataError> {
        stems_with_extension(&self.dir, "csv")
    }

    fn path_for(&self, ticker: &str) -> Result<PathBuf, DataError> {
        Ok(self.dir.join(format!("{}.csv", checked_ticker(ticker)?)))
    }

    fn write_all(&self, path: &Path, candles: &[Candle]) -> Result<(), DataError> {
        // Write next to the target and rename so readers never see a torn file.
        let tmp = path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_writer(File::create(&tmp)?);
            for candle in candles {
                writer
                    .serialize(candle)
                    .map_err(|e| DataError::Store(e.to_string()))?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl CandleStore for CsvCandleStore {
    fn load(&self, ticker: &str) -> Result<Vec<Candle>, DataError> {
        let path = self.path_for(ticker)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&path).map_err(|e| DataError::Store(e.to_string()))?;
        let candles = reader
            .deserialize()
            .collect::<Result<Vec<Candle>, _>>()
            .map_err(|e| DataError::Store(format!("{}: {e}", path.display())))?;
        check_candles(ticker, &candles)?;
        // Files edited by hand may be out of order.
        Ok(merge_candles(Vec::new(), &candles))
    }

    fn upsert(&self, ticker: &str, candles: &[Candle]) -> Result<(), DataError> {
        let path = self.path_for(ticker)?;
        check_candles(ticker, candles)?;
        let merged = merge_candles(self.load(ticker)?, candles);
        self.write_all(&path, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn candle(hour: u32, close: f64) -> Candle {
        Candle {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10.0,
        }
    }

    #[test]
    fn csv_store_round_trips_and_upserts() {
        let dir = TempDir::new().unwrap();
        let store = CsvCandleStore::open(dir.path()).unwrap();

        assert!(store.load("NABIL").unwrap().is_empty());
        store.upsert("NABIL", &[candle(11, 100.0), candle(12, 101.0)]).unwrap();
        store.upsert("NABIL", &[candle(12, 105.0), candle(13, 106.0)]).unwrap();

        let loaded = store.load("NABIL").unwrap();
        let closes: Vec<f64> = loaded.iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![100.0, 105.0, 106.0]);
        assert_eq!(store.tickers().unwrap(), vec!["NABIL".to_string()]);
    }

    #[test]
    fn malformed_rows_are_rejected() {
        let dir = TempDir::new().unwrap();
        let store = CsvCandleStore::open(dir.path()).unwrap();

        let mut inverted = candle(12, 101.0);
        inverted.high = 90.0;
        assert!(matches!(
            store.upsert("NABIL", &[candle(11, 100.0), inverted]),
            Err(DataError::Store(_))
        ));
        assert!(!dir.path().join("NABIL.csv").exists());

        // A hand-edited file with negative volume fails to load.
        fs::write(
            dir.path().join("NICA.csv"),
            "timestamp,open,high,low,close,volume\n2024-03-05T11:00:00,10,11,9,10,-5\n",
        )
        .unwrap();
        let err = store.load("NICA").unwrap_err();
        assert!(err.to_string().contains("malformed candle at 2024-03-05 11:00"));
    }

    #[test]
    fn rejects_path_like_tickers() {
        let dir = TempDir::new().unwrap();
        let store = CsvCandleStore::open(dir.path()).unwrap();
        assert!(store.load("../etc").is_err());
        assert!(store.upsert("a/b", &[]).is_err());
    }

    #[test]
    fn json_source_lists_and_decodes() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("NICA.json"),
            r#"[{"contractRate": 500.0, "contractQuantity": 10, "time": 1709615700}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let source = JsonTickSource::new(dir.path(), 345);
        assert_eq!(source.list_tickers().unwrap(), vec!["NICA".to_string()]);

        let ticks = source.fetch_ticks("NICA").unwrap();
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].price, 500.0);
        assert_eq!(ticks[0].quantity, 10.0);
    }

    #[test]
    fn json_source_unknown_ticker() {
        let dir = TempDir::new().unwrap();
        let source = JsonTickSource::new(dir.path(), 345);
        assert!(matches!(
            source.fetch_ticks("NOPE"),
            Err(DataError::TickerNotFound { .. })
        ));
    }
}
