//! CSV file data adapter.
//!
//! Reads daily bars from a single `date,open,high,low,close,volume`
//! file and can write generated bars back out in the same layout.

use crate::domain::error::EvotraderError;
use crate::domain::market::MarketBar;
use crate::ports::data_port::MarketDataPort;
use std::path::{Path, PathBuf};

pub struct CsvBarAdapter {
    path: PathBuf,
}

impl CsvBarAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Write `bars` to `path` with a header row.
    pub fn write_bars<P: AsRef<Path>>(path: P, bars: &[MarketBar]) -> Result<(), EvotraderError> {
        let mut writer =
            csv::Writer::from_path(path.as_ref()).map_err(|e| EvotraderError::DataLoad {
                reason: format!("failed to open {} for writing: {}", path.as_ref().display(), e),
            })?;
        for bar in bars {
            writer.serialize(bar).map_err(|e| EvotraderError::DataLoad {
                reason: format!("CSV write error: {}", e),
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl MarketDataPort for CsvBarAdapter {
    fn fetch_bars(&self) -> Result<Vec<MarketBar>, EvotraderError> {
        let mut rdr =
            csv::Reader::from_path(&self.path).map_err(|e| EvotraderError::DataLoad {
                reason: format!("failed to read {}: {}", self.path.display(), e),
            })?;

        let mut bars = Vec::new();
        for result in rdr.deserialize() {
            let bar: MarketBar = result.map_err(|e| EvotraderError::DataLoad {
                reason: format!("CSV parse error in {}: {}", self.path.display(), e),
            })?;
            bars.push(bar);
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn write_test_csv(content: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bars.csv");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn fetch_bars_reads_rows() {
        let (_dir, path) = write_test_csv(
            "date,open,high,low,close,volume\n\
             2024-01-15,100.0,110.0,90.0,105.0,50000\n\
             2024-01-16,105.0,115.0,100.0,110.0,60000\n",
        );
        let adapter = CsvBarAdapter::new(path);
        let bars = adapter.fetch_bars().unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 110.0);
        assert_eq!(bars[0].low, 90.0);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[0].volume, 50000);
    }

    #[test]
    fn fetch_bars_sorts_by_date() {
        let (_dir, path) = write_test_csv(
            "date,open,high,low,close,volume\n\
             2024-01-17,110.0,120.0,105.0,115.0,55000\n\
             2024-01-15,100.0,110.0,90.0,105.0,50000\n\
             2024-01-16,105.0,115.0,100.0,110.0,60000\n",
        );
        let adapter = CsvBarAdapter::new(path);
        let bars = adapter.fetch_bars().unwrap();

        let dates: Vec<_> = bars.iter().map(|b| b.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn fetch_bars_errors_for_missing_file() {
        let adapter = CsvBarAdapter::new(PathBuf::from("/nonexistent/bars.csv"));
        assert!(matches!(
            adapter.fetch_bars(),
            Err(EvotraderError::DataLoad { .. })
        ));
    }

    #[test]
    fn fetch_bars_errors_for_malformed_row() {
        let (_dir, path) = write_test_csv(
            "date,open,high,low,close,volume\n\
             2024-01-15,100.0,110.0,90.0,not_a_price,50000\n",
        );
        let adapter = CsvBarAdapter::new(path);
        assert!(matches!(
            adapter.fetch_bars(),
            Err(EvotraderError::DataLoad { .. })
        ));
    }

    #[test]
    fn write_then_fetch_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let bars = vec![
            MarketBar {
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                open: 50.0,
                high: 55.0,
                low: 48.0,
                close: 52.5,
                volume: 1_200_000,
            },
            MarketBar {
                date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                open: 52.5,
                high: 53.0,
                low: 49.0,
                close: 50.0,
                volume: 900_000,
            },
        ];

        CsvBarAdapter::write_bars(&path, &bars).unwrap();
        let read_back = CsvBarAdapter::new(path).fetch_bars().unwrap();
        assert_eq!(read_back, bars);
    }
}
