//! Simple moving average.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i])
//! Warmup: first (n-1) observations are undefined. n == 0 is undefined everywhere.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::observation::Observation;

/// Trailing mean over `period` values, aligned to the input.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                let window = &values[i + 1 - period..=i];
                Some(window.iter().sum::<f64>() / period as f64)
            }
        })
        .collect()
}

/// Trailing mean where any undefined value inside the window leaves that
/// window undefined.
pub fn rolling_mean_defined(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            values[i + 1 - period..=i]
                .iter()
                .copied()
                .sum::<Option<f64>>()
                .map(|total| total / period as f64)
        })
        .collect()
}

pub fn calculate_sma(observations: &[Observation], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = observations.iter().map(|o| o.close).collect();
    IndicatorSeries::from_parts(
        IndicatorType::Sma(period),
        observations.iter().map(|o| o.date),
        rolling_mean(&closes, period),
    )
}

/// SMA(n) * 2, the long-cycle band drawn over price.
pub fn calculate_sma_doubled(observations: &[Observation], period: usize) -> IndicatorSeries {
    let sma = calculate_sma(observations, period);
    IndicatorSeries::from_parts(
        IndicatorType::SmaDoubled(period),
        observations.iter().map(|o| o.date),
        sma.values.iter().map(|p| p.value.map(|v| v * 2.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn make_obs(prices: &[f64]) -> Vec<Observation> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Observation::new(start + chrono::Duration::days(i as i64), close))
            .collect()
    }

    #[test]
    fn sma_warmup() {
        let series = calculate_sma(&make_obs(&[1.0, 2.0, 3.0, 4.0]), 3);
        assert_eq!(series.raw(), vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn sma_period_longer_than_series() {
        let series = calculate_sma(&make_obs(&[1.0, 2.0]), 5);
        assert_eq!(series.valid_count(), 0);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn sma_zero_period() {
        let series = calculate_sma(&make_obs(&[1.0, 2.0]), 0);
        assert_eq!(series.raw(), vec![None, None]);
    }

    #[test]
    fn sma_empty() {
        assert!(calculate_sma(&[], 111).is_empty());
    }

    #[test]
    fn rolling_mean_defined_skips_windows_with_gaps() {
        let values = [Some(1.0), Some(3.0), None, Some(5.0), Some(7.0)];
        let out = rolling_mean_defined(&values, 2);
        assert_eq!(out, vec![None, Some(2.0), None, None, Some(6.0)]);
    }

    #[test]
    fn sma_doubled() {
        let series = calculate_sma_doubled(&make_obs(&[10.0, 20.0, 30.0]), 2);
        assert_eq!(series.indicator_type, IndicatorType::SmaDoubled(2));
        assert_eq!(series.raw(), vec![None, Some(30.0), Some(50.0)]);
    }

    #[test]
    fn sma_indicator_type() {
        let series = calculate_sma(&make_obs(&[1.0]), 111);
        assert_eq!(series.indicator_type, IndicatorType::Sma(111));
    }

    proptest! {
        #[test]
        fn sma_of_constant_is_constant(
            price in 0.01f64..1_000_000.0,
            period in 1usize..60,
            extra in 0usize..40,
        ) {
            let obs = make_obs(&vec![price; period + extra]);
            let series = calculate_sma(&obs, period);
            for point in &series.values[period - 1..] {
                let v = point.value.unwrap();
                assert_relative_eq!(v, price, max_relative = 1e-12);
            }
        }
    }
}
