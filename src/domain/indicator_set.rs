//! Rolling indicator set computed from a TimeSeriesFrame.
//!
//! Every series is date-aligned 1:1 with the frame's observations and is
//! recomputed in full on each call.

use crate::domain::frame::TimeSeriesFrame;
use crate::domain::indicator::meyer::{calculate_meyer_multiple, calculate_momentum};
use crate::domain::indicator::mvrv::{calculate_mvrv_z_score, calculate_realized_value};
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::{calculate_sma, calculate_sma_doubled};
use crate::domain::indicator::volatility::calculate_volatility;
use crate::domain::indicator::IndicatorSeries;

pub const DEFAULT_CIRCULATING_SUPPLY: f64 = 19_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    pub rsi: usize,
    pub volatility: usize,
    pub ma_short: usize,
    pub ma_meyer: usize,
    pub ma_long: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            rsi: 14,
            volatility: 30,
            ma_short: 111,
            ma_meyer: 200,
            ma_long: 350,
        }
    }
}

impl WindowConfig {
    /// Longest window, i.e. the history needed before every daily series is defined.
    pub fn longest(&self) -> usize {
        [self.rsi + 1, self.volatility + 1, self.ma_short, self.ma_meyer, self.ma_long]
            .into_iter()
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct RollingIndicatorSet {
    pub ma_short: IndicatorSeries,
    pub ma_long_x2: IndicatorSeries,
    pub momentum: IndicatorSeries,
    pub meyer_multiple: IndicatorSeries,
    pub volatility: IndicatorSeries,
    pub rsi_daily: IndicatorSeries,
    pub realized_value: IndicatorSeries,
    pub mvrv_z_score: IndicatorSeries,
}

impl RollingIndicatorSet {
    pub fn compute(
        frame: &TimeSeriesFrame,
        windows: &WindowConfig,
        circulating_supply: f64,
    ) -> Self {
        let obs = frame.observations();
        tracing::debug!(
            observations = obs.len(),
            longest_window = windows.longest(),
            "computing rolling indicators"
        );

        let set = Self {
            ma_short: calculate_sma(obs, windows.ma_short),
            ma_long_x2: calculate_sma_doubled(obs, windows.ma_long),
            momentum: calculate_momentum(obs, windows.ma_meyer),
            meyer_multiple: calculate_meyer_multiple(obs, windows.ma_meyer),
            volatility: calculate_volatility(obs, windows.volatility),
            rsi_daily: calculate_rsi(obs, windows.rsi),
            realized_value: calculate_realized_value(obs, windows.ma_meyer, circulating_supply),
            mvrv_z_score: calculate_mvrv_z_score(obs, windows.ma_meyer, circulating_supply),
        };
        for series in set.all() {
            tracing::debug!(
                indicator = %series.indicator_type,
                defined = series.valid_count(),
                "indicator computed"
            );
        }
        set
    }

    pub fn all(&self) -> [&IndicatorSeries; 8] {
        [
            &self.ma_short,
            &self.ma_long_x2,
            &self.momentum,
            &self.meyer_multiple,
            &self.volatility,
            &self.rsi_daily,
            &self.realized_value,
            &self.mvrv_z_score,
        ]
    }
}
