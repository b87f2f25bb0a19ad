//! Volatility: rolling sample standard deviation of daily percentage returns.
//!
//! return[i] = C[i] / C[i-1] - 1 (undefined at i = 0)
//! VOLATILITY(n)[i] = STDDEV(return[i-n+1..=i])
//! Warmup: first n observations are undefined.

use crate::domain::indicator::stddev::rolling_stddev;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::observation::Observation;

pub fn daily_returns(observations: &[Observation]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(observations.len());
    for (i, obs) in observations.iter().enumerate() {
        if i == 0 {
            returns.push(None);
        } else {
            returns.push(Some(obs.pct_change(observations[i - 1].close)));
        }
    }
    returns
}

pub fn calculate_volatility(observations: &[Observation], period: usize) -> IndicatorSeries {
    IndicatorSeries::from_parts(
        IndicatorType::Volatility(period),
        observations.iter().map(|o| o.date),
        rolling_stddev(&daily_returns(observations), period),
    )
}
