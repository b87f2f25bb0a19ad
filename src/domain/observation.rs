//! Daily close observation.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub close: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    /// Fractional change from `prev_close`: close / prev_close - 1
    pub fn pct_change(&self, prev_close: f64) -> f64 {
        self.close / prev_close - 1.0
    }
}
