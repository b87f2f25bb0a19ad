//! Price-to-moving-average ratio.
//!
//! MEYER(n)[i] = C[i] / SMA(n)[i]
//! The same ratio is published as both Momentum and the Meyer Multiple.

use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::observation::Observation;

fn price_to_sma(observations: &[Observation], period: usize) -> Vec<Option<f64>> {
    let sma = calculate_sma(observations, period);
    observations
        .iter()
        .zip(&sma.values)
        .map(|(obs, point)| point.value.map(|avg| obs.close / avg))
        .collect()
}

pub fn calculate_meyer_multiple(observations: &[Observation], period: usize) -> IndicatorSeries {
    IndicatorSeries::from_parts(
        IndicatorType::MeyerMultiple(period),
        observations.iter().map(|o| o.date),
        price_to_sma(observations, period),
    )
}

pub fn calculate_momentum(observations: &[Observation], period: usize) -> IndicatorSeries {
    IndicatorSeries::from_parts(
        IndicatorType::Momentum(period),
        observations.iter().map(|o| o.date),
        price_to_sma(observations, period),
    )
}
