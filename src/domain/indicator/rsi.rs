//! RSI (Relative Strength Index).
//!
//! Average gain/loss are simple means over the last n price changes:
//! - change[i] = C[i] - C[i-1]
//! - avg_gain = mean(max(change, 0)), avg_loss = mean(max(-change, 0))
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100 (this includes a flat window)
//!
//! Warmup: first n observations are undefined (need n price changes).
//! A change touching an undefined close is undefined, and so is every window
//! containing it.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator::sma::rolling_mean_defined;
use crate::domain::observation::Observation;

/// RSI over a close series with possible holes. Shared by the daily and
/// monthly paths.
pub fn rsi_from_closes(closes: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if closes.is_empty() {
        return Vec::new();
    }
    if period == 0 {
        return vec![None; closes.len()];
    }

    let (gains, losses): (Vec<Option<f64>>, Vec<Option<f64>>) = closes
        .windows(2)
        .map(|w| match (w[0], w[1]) {
            (Some(prev), Some(curr)) => {
                let change = curr - prev;
                (Some(change.max(0.0)), Some((-change).max(0.0)))
            }
            _ => (None, None),
        })
        .unzip();

    let avg_gains = rolling_mean_defined(&gains, period);
    let avg_losses = rolling_mean_defined(&losses, period);

    let mut values = Vec::with_capacity(closes.len());
    values.push(None);
    values.extend(
        avg_gains
            .into_iter()
            .zip(avg_losses)
            .map(|(gain, loss)| match (gain, loss) {
                (Some(gain), Some(loss)) => Some(rsi_value(gain, loss)),
                _ => None,
            }),
    );
    values
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

pub fn calculate_rsi(observations: &[Observation], period: usize) -> IndicatorSeries {
    let closes: Vec<Option<f64>> = observations.iter().map(|o| Some(o.close)).collect();
    IndicatorSeries::from_parts(
        IndicatorType::Rsi(period),
        observations.iter().map(|o| o.date),
        rsi_from_closes(&closes, period),
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
    fn rsi_empty() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_single_observation() {
        let series = calculate_rsi(&make_obs(&[100.0]), 14);
        assert_eq!(series.len(), 1);
        assert!(!series.values[0].is_valid());
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let series = calculate_rsi(&make_obs(&prices), 14);

        assert_eq!(series.len(), 15);
        for i in 0..14 {
            assert!(!series.values[i].is_valid(), "observation {} should be undefined", i);
        }
        assert!(series.values[14].is_valid());
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&make_obs(&prices), 14);
        assert_eq!(series.value_at(14), Some(100.0));
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_obs(&prices), 14);
        assert_relative_eq!(series.value_at(14).unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rsi_flat_window_is_100() {
        let series = calculate_rsi(&make_obs(&[50.0; 20]), 14);
        assert_eq!(series.value_at(13), None);
        assert_eq!(series.value_at(19), Some(100.0));
    }

    #[test]
    fn rsi_simple_mean_known_value() {
        // changes: +2, -1, +3, -2 ; period 2 at last index -> gains [3,0], losses [0,2]
        let series = calculate_rsi(&make_obs(&[10.0, 12.0, 11.0, 14.0, 12.0]), 2);
        // avg_gain 1.5, avg_loss 1.0 -> 100 - 100/2.5 = 60
        assert_relative_eq!(series.value_at(4).unwrap(), 60.0, epsilon = 1e-12);
        // index 2: gains [2,0] losses [0,1] -> rs 2 -> 66.67
        assert_relative_eq!(series.value_at(2).unwrap(), 200.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn rsi_window_forgets_old_changes() {
        // a big early loss falls out of the 3-change window
        let series = calculate_rsi(&make_obs(&[100.0, 50.0, 51.0, 52.0, 53.0]), 3);
        assert!(series.value_at(3).unwrap() < 100.0);
        assert_eq!(series.value_at(4), Some(100.0));
    }

    #[test]
    fn rsi_undefined_across_missing_close() {
        let closes = [Some(10.0), Some(12.0), None, Some(11.0), Some(13.0), Some(14.0)];
        let rsi = rsi_from_closes(&closes, 2);
        // changes: +2, -, -, +2, +1
        assert_eq!(rsi, vec![None, None, None, None, None, Some(100.0)]);
    }

    #[test]
    fn rsi_zero_period() {
        let series = calculate_rsi(&make_obs(&[1.0, 2.0]), 0);
        assert_eq!(series.valid_count(), 0);
    }

    #[test]
    fn rsi_indicator_type() {
        let series = calculate_rsi(&make_obs(&[1.0]), 14);
        assert_eq!(series.indicator_type, IndicatorType::Rsi(14));
    }

    proptest! {
        #[test]
        fn rsi_bounded(prices in proptest::collection::vec(1.0f64..100_000.0, 2..120)) {
            let series = calculate_rsi(&make_obs(&prices), 14);
            for v in series.values.iter().filter_map(|p| p.value) {
                prop_assert!((0.0..=100.0).contains(&v), "RSI {} out of range", v);
            }
        }

        #[test]
        fn rsi_increasing_series_is_100(start in 1.0f64..1000.0, len in 15usize..80) {
            let prices: Vec<f64> = (0..len).map(|i| start + i as f64).collect();
            let series = calculate_rsi(&make_obs(&prices), 14);
            for v in series.values[14..].iter().map(|p| p.value) {
                prop_assert_eq!(v, Some(100.0));
            }
        }
    }
}
