//! TimeSeriesFrame: ordered daily observations plus aligned macro fields.

use crate::domain::error::CycleError;
use crate::domain::macro_data::{MacroFields, MacroSeries};
use crate::domain::observation::Observation;
use chrono::NaiveDate;

#[derive(Debug, Clone, Default)]
pub struct TimeSeriesFrame {
    observations: Vec<Observation>,
    macro_fields: Option<MacroFields>,
}

impl TimeSeriesFrame {
    /// Builds a frame from observations that must be strictly ascending by date
    /// with positive closes.
    pub fn new(observations: Vec<Observation>) -> Result<Self, CycleError> {
        for pair in observations.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(CycleError::UnorderedObservations {
                    date: pair[1].date,
                    previous: pair[0].date,
                });
            }
        }
        if let Some(bad) = observations
            .iter()
            .find(|o| !(o.close.is_finite() && o.close > 0.0))
        {
            return Err(CycleError::NonPositiveClose {
                date: bad.date,
                close: bad.close,
            });
        }

        Ok(Self {
            observations,
            macro_fields: None,
        })
    }

    /// Returns a new frame with both macro series forward-filled onto this
    /// frame's dates.
    pub fn with_macro(&self, m2: &MacroSeries, fed_rate: &MacroSeries) -> Self {
        let fields = MacroFields::align(m2, fed_rate, &self.dates());
        Self {
            observations: self.observations.clone(),
            macro_fields: Some(fields),
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    pub fn m2_supply(&self) -> Option<&[Option<f64>]> {
        self.macro_fields.as_ref().map(|m| m.m2_supply.as_slice())
    }

    pub fn fed_rate(&self) -> Option<&[Option<f64>]> {
        self.macro_fields.as_ref().map(|m| m.fed_rate.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(date: &str, close: f64) -> Observation {
        Observation::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), close)
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn new_keeps_gapped_dates() {
        let frame = TimeSeriesFrame::new(vec![
            obs("2024-01-01", 100.0),
            obs("2024-01-02", 101.0),
            obs("2024-01-04", 102.0),
        ])
        .unwrap();

        assert_eq!(frame.len(), 3);
        assert_eq!(frame.dates(), vec![d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 4)]);
        assert_eq!(frame.observations()[1].close, 101.0);
        assert_eq!(frame.first_date(), Some(d(2024, 1, 1)));
        assert_eq!(frame.last_date(), Some(d(2024, 1, 4)));
    }

    #[test]
    fn new_rejects_descending_dates() {
        let err = TimeSeriesFrame::new(vec![obs("2024-01-02", 1.0), obs("2024-01-01", 1.0)])
            .unwrap_err();
        assert!(matches!(err, CycleError::UnorderedObservations { .. }));
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let err = TimeSeriesFrame::new(vec![obs("2024-01-01", 1.0), obs("2024-01-01", 2.0)])
            .unwrap_err();
        assert!(matches!(err, CycleError::UnorderedObservations { .. }));
    }

    #[test]
    fn new_rejects_non_positive_close() {
        let err = TimeSeriesFrame::new(vec![obs("2024-01-01", 1.0), obs("2024-01-02", 0.0)])
            .unwrap_err();
        assert!(matches!(err, CycleError::NonPositiveClose { .. }));
    }

    #[test]
    fn empty_frame_is_valid() {
        let frame = TimeSeriesFrame::new(vec![]).unwrap();
        assert!(frame.is_empty());
        assert!(frame.last_date().is_none());
        assert!(frame.m2_supply().is_none());
    }

    #[test]
    fn with_macro_aligns_without_mutating_source() {
        let frame = TimeSeriesFrame::new(vec![
            obs("2024-01-01", 100.0),
            obs("2024-01-02", 101.0),
            obs("2024-02-01", 102.0),
        ])
        .unwrap();
        let m2 = MacroSeries::new("M2SL", vec![(d(2024, 1, 1), 20_800.0), (d(2024, 2, 1), 20_900.0)]);
        let rate = MacroSeries::new("FEDFUNDS", vec![(d(2024, 1, 2), 5.33)]);

        let joined = frame.with_macro(&m2, &rate);

        assert!(frame.m2_supply().is_none());
        assert_eq!(
            joined.m2_supply().unwrap(),
            &[Some(20_800.0), Some(20_800.0), Some(20_900.0)]
        );
        assert_eq!(joined.fed_rate().unwrap(), &[None, Some(5.33), Some(5.33)]);
        assert_eq!(joined.len(), frame.len());
    }
}
