#![allow(dead_code)]

use chrono::NaiveDate;
use halvcycle::domain::error::CycleError;
use halvcycle::domain::frame::TimeSeriesFrame;
use halvcycle::domain::macro_data::MacroSeries;
pub use halvcycle::domain::observation::Observation;
use halvcycle::ports::macro_port::MacroFeed;
use halvcycle::ports::price_port::PriceFeed;
use std::collections::HashMap;

pub struct MockPriceFeed {
    pub data: HashMap<String, Vec<Observation>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceFeed {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_observations(mut self, symbol: &str, observations: Vec<Observation>) -> Self {
        self.data.insert(symbol.to_string(), observations);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PriceFeed for MockPriceFeed {
    fn fetch_daily_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Observation>, CycleError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(CycleError::Feed {
                source_name: "mock price".into(),
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|obs| {
                obs.iter()
                    .filter(|o| o.date >= start_date && o.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub struct MockMacroFeed {
    pub series: HashMap<String, Vec<(NaiveDate, f64)>>,
    pub errors: HashMap<String, String>,
}

impl MockMacroFeed {
    pub fn new() -> Self {
        Self {
            series: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, series_id: &str, points: Vec<(NaiveDate, f64)>) -> Self {
        self.series.insert(series_id.to_string(), points);
        self
    }

    pub fn with_error(mut self, series_id: &str, reason: &str) -> Self {
        self.errors.insert(series_id.to_string(), reason.to_string());
        self
    }
}

impl MacroFeed for MockMacroFeed {
    fn fetch_series(
        &self,
        series_id: &str,
        start_date: NaiveDate,
        _api_key: &str,
    ) -> Result<MacroSeries, CycleError> {
        if let Some(reason) = self.errors.get(series_id) {
            return Err(CycleError::Feed {
                source_name: "mock macro".into(),
                reason: reason.clone(),
            });
        }
        let points = self
            .series
            .get(series_id)
            .map(|p| p.iter().filter(|(d, _)| *d >= start_date).copied().collect())
            .unwrap_or_default();
        Ok(MacroSeries::new(series_id, points))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One observation per consecutive day starting at `start`.
pub fn generate_observations(start: NaiveDate, closes: &[f64]) -> Vec<Observation> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Observation::new(start + chrono::Duration::days(i as i64), close))
        .collect()
}

pub fn make_frame(start: NaiveDate, closes: &[f64]) -> TimeSeriesFrame {
    TimeSeriesFrame::new(generate_observations(start, closes)).unwrap()
}

/// Gently rising prices with a weekly wobble so both gains and losses occur.
pub fn wavy_closes(count: usize, start_price: f64) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            start_price * (1.0 + 0.002 * t + 0.03 * (t * 0.9).sin())
        })
        .collect()
}

/// Monthly points on the first of each month from `start` for `months` months.
pub fn monthly_points(start: NaiveDate, months: u32, first: f64, step: f64) -> Vec<(NaiveDate, f64)> {
    (0..months)
        .filter_map(|k| {
            start
                .checked_add_months(chrono::Months::new(k))
                .map(|d| (d, first + step * k as f64))
        })
        .collect()
}
