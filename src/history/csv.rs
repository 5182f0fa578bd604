use std::io::Read;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::PredictError;
use crate::types::{Instrument, PriceBar, PriceSeries};

use super::HistorySource;

/// Date layouts accepted in history files. The catalog mixes vendor exports,
/// so day-first and slash-separated forms appear alongside ISO dates.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"];

/// Pandas-written files sometimes carry a midnight timestamp on each row.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S"];

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: Decimal,
    #[serde(rename = "High")]
    high: Decimal,
    #[serde(rename = "Low")]
    low: Decimal,
    #[serde(rename = "Close")]
    close: Decimal,
    #[serde(rename = "Volume", default)]
    volume: Option<Decimal>,
}

/// Reads daily price history from per-instrument CSV files in a data
/// directory. Each call opens the file again, matching how the serving
/// catalog is refreshed by replacing files on disk.
#[derive(Debug, Clone)]
pub struct CsvHistorySource {
    data_dir: PathBuf,
}

impl CsvHistorySource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn path_for(&self, instrument: Instrument) -> PathBuf {
        self.data_dir.join(instrument.data_file())
    }
}

#[async_trait]
impl HistorySource for CsvHistorySource {
    async fn load(&self, instrument: Instrument) -> Result<PriceSeries, PredictError> {
        let path = self.path_for(instrument);
        // Not named `display`: tracing's macros shadow that name with
        // `tracing::field::display` inside event expansions.
        let path_str = path.display().to_string();
        let file = std::fs::File::open(&path).map_err(|source| PredictError::Io {
            path: path_str.clone(),
            source,
        })?;
        let series = read_series(file, &path_str)?;
        debug!(
            "Loaded {} bars for {} from {}",
            series.len(),
            instrument,
            path_str
        );
        Ok(series)
    }
}

/// Parses CSV bytes into a date-sorted series. `path` is only used to label
/// errors; reading from memory in tests passes a synthetic name.
fn read_series(reader: impl Read, path: &str) -> Result<PriceSeries, PredictError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut bars = Vec::new();

    for (idx, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = record.map_err(|err| PredictError::MalformedData {
            path: path.to_string(),
            reason: err.to_string(),
        })?;
        let date = parse_date(&row.date).ok_or_else(|| PredictError::MalformedData {
            path: path.to_string(),
            reason: format!("unparseable date '{}' on data row {}", row.date, idx + 1),
        })?;
        bars.push(PriceBar {
            date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }

    Ok(PriceSeries::from_bars(bars))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }
    None
}
