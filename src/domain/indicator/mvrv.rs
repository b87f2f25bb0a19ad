//! MVRV Z-Score valuation metric.
//!
//! market_value[i]   = C[i] * supply
//! realized_value[i] = SMA(n)[i] * supply
//! z[i] = (market_value[i] - realized_value[i]) / STDDEV(realized_value[all defined])
//!
//! The normalizer is the sample standard deviation over the whole history
//! supplied, not a rolling window, so appending history changes every reading
//! through the denominator only. A zero or undefined normalizer leaves the
//! whole series undefined.

use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::sample_stddev;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::observation::Observation;

pub fn calculate_realized_value(
    observations: &[Observation],
    period: usize,
    circulating_supply: f64,
) -> IndicatorSeries {
    let sma = calculate_sma(observations, period);
    IndicatorSeries::from_parts(
        IndicatorType::RealizedValue(period),
        observations.iter().map(|o| o.date),
        sma.values.iter().map(|p| p.value.map(|v| v * circulating_supply)),
    )
}

/// Whole-history sample standard deviation of the defined realized values.
pub fn realized_value_normalizer(realized: &IndicatorSeries) -> Option<f64> {
    let defined: Vec<f64> = realized.values.iter().filter_map(|p| p.value).collect();
    sample_stddev(&defined).filter(|sd| *sd > 0.0 && sd.is_finite())
}

pub fn calculate_mvrv_z_score(
    observations: &[Observation],
    period: usize,
    circulating_supply: f64,
) -> IndicatorSeries {
    let realized = calculate_realized_value(observations, period, circulating_supply);
    let normalizer = realized_value_normalizer(&realized);

    if normalizer.is_none() && realized.valid_count() > 0 {
        tracing::warn!(
            period,
            points = realized.valid_count(),
            "realized value has no spread; MVRV Z-Score undefined"
        );
    }

    IndicatorSeries::from_parts(
        IndicatorType::MvrvZScore(period),
        observations.iter().map(|o| o.date),
        observations.iter().zip(&realized.values).map(|(obs, rv)| {
            let sd = normalizer?;
            let realized_value = rv.value?;
            let market_value = obs.close * circulating_supply;
            Some((market_value - realized_value) / sd)
        }),
    )
}
