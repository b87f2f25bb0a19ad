//! CSV file feed adapters.
//!
//! Prices live in `<base>/<symbol>.csv` with a header row containing `date` and
//! `close` columns (case-insensitive, other columns ignored). Macro series live
//! in `<base>/<series_id>.csv` with the date in the first column and the value in
//! the second; blank or `.` values mark missing observations and are skipped.

use crate::domain::error::CycleError;
use crate::domain::macro_data::MacroSeries;
use crate::domain::observation::Observation;
use crate::ports::macro_port::MacroFeed;
use crate::ports::price_port::PriceFeed;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

const PRICE_SOURCE: &str = "price";
const MACRO_SOURCE: &str = "macro";

fn read_csv(source: &str, path: &Path) -> Result<csv::Reader<std::io::Cursor<String>>, CycleError> {
    let content = fs::read_to_string(path)
        .map_err(|e| CycleError::feed(source, format!("failed to read {}: {}", path.display(), e)))?;
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(std::io::Cursor::new(content)))
}

fn parse_date(source: &str, value: &str) -> Result<NaiveDate, CycleError> {
    // timestamps such as "2024-01-01 00:00:00+00:00" keep only the date part
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| CycleError::feed(source, format!("invalid date '{}': {}", value, e)))
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

impl PriceFeed for CsvPriceAdapter {
    fn fetch_daily_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Observation>, CycleError> {
        let path = self.csv_path(symbol);
        let mut rdr = read_csv(PRICE_SOURCE, &path)?;

        let headers = rdr
            .headers()
            .map_err(|e| CycleError::feed(PRICE_SOURCE, format!("CSV header error: {}", e)))?
            .clone();
        let date_col = column_index(&headers, "date")
            .ok_or_else(|| CycleError::feed(PRICE_SOURCE, "missing date column"))?;
        let close_col = column_index(&headers, "close")
            .ok_or_else(|| CycleError::feed(PRICE_SOURCE, "missing close column"))?;

        let mut observations = Vec::new();
        for result in rdr.records() {
            let record = result
                .map_err(|e| CycleError::feed(PRICE_SOURCE, format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(date_col)
                .ok_or_else(|| CycleError::feed(PRICE_SOURCE, "missing date value"))?;
            let date = parse_date(PRICE_SOURCE, date_str)?;
            if date < start_date || date > end_date {
                continue;
            }

            let close_str = record.get(close_col).unwrap_or_default();
            if close_str.is_empty() {
                tracing::debug!(%date, "skipping row without close");
                continue;
            }
            let close: f64 = close_str.parse().map_err(|e| {
                CycleError::feed(PRICE_SOURCE, format!("invalid close value '{}': {}", close_str, e))
            })?;

            observations.push(Observation::new(date, close));
        }

        observations.sort_by_key(|o| o.date);
        tracing::debug!(symbol, rows = observations.len(), "loaded price observations");
        Ok(observations)
    }
}

pub struct CsvMacroAdapter {
    base_path: PathBuf,
}

impl CsvMacroAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }
}

impl MacroFeed for CsvMacroAdapter {
    fn fetch_series(
        &self,
        series_id: &str,
        start_date: NaiveDate,
        _api_key: &str,
    ) -> Result<MacroSeries, CycleError> {
        let path = self.base_path.join(format!("{}.csv", series_id));
        let mut rdr = read_csv(MACRO_SOURCE, &path)?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result
                .map_err(|e| CycleError::feed(MACRO_SOURCE, format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(0)
                .ok_or_else(|| CycleError::feed(MACRO_SOURCE, "missing date column"))?;
            let date = parse_date(MACRO_SOURCE, date_str)?;
            if date < start_date {
                continue;
            }

            let value_str = record.get(1).unwrap_or_default();
            if value_str.is_empty() || value_str == "." {
                continue;
            }
            let value: f64 = value_str.parse().map_err(|e| {
                CycleError::feed(MACRO_SOURCE, format!("invalid value '{}': {}", value_str, e))
            })?;
            points.push((date, value));
        }

        tracing::debug!(series_id, rows = points.len(), "loaded macro series");
        Ok(MacroSeries::new(series_id, points))
    }
}
