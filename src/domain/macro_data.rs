//! Lower-frequency macro series (money supply, policy rate) and their
//! alignment onto the daily observation grid.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct MacroSeries {
    pub series_id: String,
    points: Vec<(NaiveDate, f64)>,
}

impl MacroSeries {
    /// Points are sorted by date; for duplicate dates the last one supplied wins.
    pub fn new(series_id: impl Into<String>, mut points: Vec<(NaiveDate, f64)>) -> Self {
        points.sort_by_key(|(d, _)| *d);
        let mut deduped: Vec<(NaiveDate, f64)> = Vec::with_capacity(points.len());
        for (date, value) in points {
            match deduped.last_mut() {
                Some(last) if last.0 == date => last.1 = value,
                _ => deduped.push((date, value)),
            }
        }
        Self {
            series_id: series_id.into(),
            points: deduped,
        }
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|(d, _)| *d)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Carry the last known value forward onto `grid` (ascending dates).
    ///
    /// Grid dates before the first point stay `None`.
    pub fn forward_fill(&self, grid: &[NaiveDate]) -> Vec<Option<f64>> {
        let mut filled = Vec::with_capacity(grid.len());
        let mut cursor = 0;
        let mut current: Option<f64> = None;

        for date in grid {
            while cursor < self.points.len() && self.points[cursor].0 <= *date {
                current = Some(self.points[cursor].1);
                cursor += 1;
            }
            filled.push(current);
        }

        if !grid.is_empty() && filled.iter().all(Option::is_none) {
            tracing::warn!(
                series = %self.series_id,
                "macro series has no values on or before the observation range"
            );
        }

        filled
    }
}

/// Macro fields aligned 1:1 with a frame's observation dates.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroFields {
    pub m2_supply: Vec<Option<f64>>,
    pub fed_rate: Vec<Option<f64>>,
}

impl MacroFields {
    pub fn align(m2: &MacroSeries, fed_rate: &MacroSeries, grid: &[NaiveDate]) -> Self {
        Self {
            m2_supply: m2.forward_fill(grid),
            fed_rate: fed_rate.forward_fill(grid),
        }
    }
}
