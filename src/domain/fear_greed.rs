//! Fear/Greed composite score.
//!
//! FG = 100 * [ (momentum - 1) / (3 - 1) + (1 - volatility) + (rsi - 30) / (70 - 30) ] / 3
//!
//! The three sub-scores are averaged unweighted and the average is clamped to
//! [0, 100] afterwards; individual terms are never clamped. Any undefined input
//! makes that date undefined.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};

pub const FEAR_GREED_MIN: f64 = 0.0;
pub const FEAR_GREED_MAX: f64 = 100.0;

const MOMENTUM_FLOOR: f64 = 1.0;
const MOMENTUM_CEIL: f64 = 3.0;
const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;

/// Unclamped weighted average of the three sub-scores.
pub fn raw_score(momentum: f64, volatility: f64, rsi: f64) -> f64 {
    let momentum_term = (momentum - MOMENTUM_FLOOR) / (MOMENTUM_CEIL - MOMENTUM_FLOOR);
    let calm_term = 1.0 - volatility;
    let rsi_term = (rsi - RSI_OVERSOLD) / (RSI_OVERBOUGHT - RSI_OVERSOLD);
    100.0 * (momentum_term + calm_term + rsi_term) / 3.0
}

/// Clamped score for a single date.
pub fn fear_greed_score(momentum: f64, volatility: f64, rsi: f64) -> Option<f64> {
    let raw = raw_score(momentum, volatility, rsi);
    if raw.is_nan() {
        return None;
    }
    Some(raw.clamp(FEAR_GREED_MIN, FEAR_GREED_MAX))
}

/// Combines date-aligned momentum, volatility and RSI series.
pub fn calculate_fear_greed(
    momentum: &IndicatorSeries,
    volatility: &IndicatorSeries,
    rsi: &IndicatorSeries,
) -> IndicatorSeries {
    debug_assert_eq!(momentum.len(), volatility.len());
    debug_assert_eq!(momentum.len(), rsi.len());

    IndicatorSeries::from_parts(
        IndicatorType::FearGreed,
        momentum.values.iter().map(|p| p.date),
        momentum
            .values
            .iter()
            .zip(&volatility.values)
            .zip(&rsi.values)
            .map(|((m, v), r)| fear_greed_score(m.value?, v.value?, r.value?)),
    )
}
