//! Analysis pipeline: fetch -> frame -> indicators -> composite -> monthly RSI
//! -> classification, plus the halving countdown.
//!
//! AnalysisConfig carries every parameter explicitly; nothing is read from
//! process-wide state.

use crate::domain::error::CycleError;
use crate::domain::fear_greed::calculate_fear_greed;
use crate::domain::frame::TimeSeriesFrame;
use crate::domain::halving::{DEFAULT_NEXT_HALVING_OFFSET, HalvingCalendar, HalvingEvent};
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries};
use crate::domain::indicator_set::{DEFAULT_CIRCULATING_SUPPLY, RollingIndicatorSet, WindowConfig};
use crate::domain::macro_data::MacroSeries;
use crate::domain::regime::{RegimeThresholds, ZoneInterval, ZoneLabel, classify, merge_spans};
use crate::domain::resample::{MonthlyClose, calculate_monthly_rsi, resample_monthly};
use crate::ports::macro_port::MacroFeed;
use crate::ports::price_port::PriceFeed;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::str::FromStr;

pub const DEFAULT_SYMBOL: &str = "BTC-USD";
pub const DEFAULT_M2_SERIES: &str = "M2SL";
pub const DEFAULT_RATE_SERIES: &str = "FEDFUNDS";
pub const DEFAULT_API_KEY: &str = "default_key";
pub const API_KEY_ENV: &str = "FRED_API_KEY";

pub fn default_history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub symbol: String,
    /// First date requested from the price feed.
    pub history_start: NaiveDate,
    /// Display window; computation always uses the full history.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub circulating_supply: f64,
    pub windows: WindowConfig,
    pub thresholds: RegimeThresholds,
    pub next_halving_offset: usize,
    pub api_key: String,
    pub m2_series: String,
    pub rate_series: String,
}

impl AnalysisConfig {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            history_start: default_history_start(),
            start_date,
            end_date,
            circulating_supply: DEFAULT_CIRCULATING_SUPPLY,
            windows: WindowConfig::default(),
            thresholds: RegimeThresholds::default(),
            next_halving_offset: DEFAULT_NEXT_HALVING_OFFSET,
            api_key: DEFAULT_API_KEY.to_string(),
            m2_series: DEFAULT_M2_SERIES.to_string(),
            rate_series: DEFAULT_RATE_SERIES.to_string(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Resolves the macro API key: explicit override, then config, then env, then default.
pub fn resolve_api_key(
    override_key: Option<&str>,
    config_key: Option<&str>,
    env_key: Option<&str>,
) -> String {
    [override_key, config_key, env_key]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|k| !k.is_empty())
        .unwrap_or(DEFAULT_API_KEY)
        .to_string()
}

/// Named display windows, all relative to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPreset {
    Full,
    AroundYear,
    LastFiveYears,
    LastYear,
    LastMonth,
    LastWeek,
}

impl DisplayPreset {
    pub fn range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let days = |n: i64| chrono::Duration::days(n);
        let jan1 = |year: i32| NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(today);
        match self {
            DisplayPreset::Full => (jan1(2015), jan1(2026)),
            DisplayPreset::AroundYear => (jan1(today.year() - 1), jan1(today.year() + 1)),
            DisplayPreset::LastFiveYears => (today - days(5 * 365), today + days(365)),
            DisplayPreset::LastYear => (today - days(365), today + days(365)),
            DisplayPreset::LastMonth => (today - days(30), today + days(30)),
            DisplayPreset::LastWeek => (today - days(7), today + days(7)),
        }
    }
}

impl FromStr for DisplayPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "full" => Ok(DisplayPreset::Full),
            "around-year" => Ok(DisplayPreset::AroundYear),
            "last-5-years" | "last-five-years" => Ok(DisplayPreset::LastFiveYears),
            "last-year" => Ok(DisplayPreset::LastYear),
            "last-month" => Ok(DisplayPreset::LastMonth),
            "last-week" => Ok(DisplayPreset::LastWeek),
            other => Err(format!("unknown preset '{}'", other)),
        }
    }
}

/// Fetches prices and both macro series and joins them into a frame.
///
/// A failing macro series is aligned as empty, so only its own field is
/// undefined; the other series and the prices are kept.
pub fn fetch_frame(
    price_feed: &dyn PriceFeed,
    macro_feed: &dyn MacroFeed,
    config: &AnalysisConfig,
    today: NaiveDate,
) -> Result<TimeSeriesFrame, CycleError> {
    let observations = price_feed.fetch_daily_closes(&config.symbol, config.history_start, today)?;
    let frame = TimeSeriesFrame::new(observations)?;

    let m2 = fetch_macro_or_empty(macro_feed, &config.m2_series, config);
    let rate = fetch_macro_or_empty(macro_feed, &config.rate_series, config);
    Ok(frame.with_macro(&m2, &rate))
}

fn fetch_macro_or_empty(
    macro_feed: &dyn MacroFeed,
    series_id: &str,
    config: &AnalysisConfig,
) -> MacroSeries {
    macro_feed
        .fetch_series(series_id, config.history_start, &config.api_key)
        .unwrap_or_else(|e| {
            tracing::warn!(series = series_id, error = %e, "macro feed unavailable; field left undefined");
            MacroSeries::new(series_id, Vec::new())
        })
}

#[derive(Debug, Clone)]
pub struct CycleReport {
    pub frame: TimeSeriesFrame,
    pub indicators: RollingIndicatorSet,
    pub fear_greed: IndicatorSeries,
    pub monthly: Vec<MonthlyClose>,
    pub monthly_rsi: IndicatorSeries,
    pub zones: Vec<ZoneInterval>,
    pub calendar: HalvingCalendar,
    pub next_halving: Option<HalvingEvent>,
    pub days_until_top: Option<i64>,
    pub months_until_top: Option<i64>,
    pub halving_months: Vec<NaiveDate>,
}

/// One reported daily row; `None` cells are undefined readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub date: NaiveDate,
    pub close: f64,
    pub ma_short: Option<f64>,
    pub ma_long_x2: Option<f64>,
    pub rsi_daily: Option<f64>,
    pub volatility: Option<f64>,
    pub meyer_multiple: Option<f64>,
    pub mvrv_z_score: Option<f64>,
    pub fear_greed: Option<f64>,
    pub m2_supply: Option<f64>,
    pub fed_rate: Option<f64>,
    /// Label of the interval starting on this date; `None` for the last date.
    pub zone: Option<ZoneLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRow {
    pub month_end: NaiveDate,
    /// Empty for a calendar month with no observation.
    pub last_date: Option<NaiveDate>,
    pub close: Option<f64>,
    pub rsi_monthly: Option<f64>,
}

pub fn run_analysis(
    frame: &TimeSeriesFrame,
    config: &AnalysisConfig,
    calendar: &HalvingCalendar,
    today: NaiveDate,
) -> CycleReport {
    let indicators = RollingIndicatorSet::compute(frame, &config.windows, config.circulating_supply);
    let fear_greed = calculate_fear_greed(
        &indicators.momentum,
        &indicators.volatility,
        &indicators.rsi_daily,
    );
    let monthly = resample_monthly(frame);
    let monthly_rsi = calculate_monthly_rsi(frame, config.windows.rsi);
    let zones = classify(
        &indicators.rsi_daily,
        &indicators.meyer_multiple,
        &indicators.mvrv_z_score,
        &config.thresholds,
    );

    let offset = config.next_halving_offset;
    tracing::debug!(
        observations = frame.len(),
        months = monthly.len(),
        zones = zones.len(),
        "analysis complete"
    );

    CycleReport {
        frame: frame.clone(),
        indicators,
        fear_greed,
        monthly,
        monthly_rsi,
        zones,
        calendar: calendar.clone(),
        next_halving: calendar.next_halving(offset),
        days_until_top: calendar.days_until_top(offset, today),
        months_until_top: calendar.months_until_top(offset, today),
        halving_months: calendar.halving_months(),
    }
}

impl CycleReport {
    pub fn last_data_day(&self) -> Option<NaiveDate> {
        self.frame.last_date()
    }

    pub fn zone_spans(&self) -> Vec<ZoneInterval> {
        merge_spans(&self.zones)
    }

    /// Intervals starting inside `[start, end]`, matching the reported rows.
    pub fn zones_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<ZoneInterval> {
        self.zones
            .iter()
            .filter(|z| z.start >= start && z.start <= end)
            .copied()
            .collect()
    }

    /// Daily rows whose date falls inside `[start, end]`.
    pub fn rows_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<ReportRow> {
        let ind = &self.indicators;
        let m2 = self.frame.m2_supply();
        let rate = self.frame.fed_rate();

        self.frame
            .observations()
            .iter()
            .enumerate()
            .filter(|(_, obs)| obs.date >= start && obs.date <= end)
            .map(|(i, obs)| ReportRow {
                date: obs.date,
                close: obs.close,
                ma_short: ind.ma_short.value_at(i),
                ma_long_x2: ind.ma_long_x2.value_at(i),
                rsi_daily: ind.rsi_daily.value_at(i),
                volatility: ind.volatility.value_at(i),
                meyer_multiple: ind.meyer_multiple.value_at(i),
                mvrv_z_score: ind.mvrv_z_score.value_at(i),
                fear_greed: self.fear_greed.value_at(i),
                m2_supply: m2.and_then(|v| v.get(i).copied().flatten()),
                fed_rate: rate.and_then(|v| v.get(i).copied().flatten()),
                zone: self.zones.get(i).map(|z| z.label),
            })
            .collect()
    }

    pub fn monthly_rows_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<MonthlyRow> {
        self.monthly
            .iter()
            .enumerate()
            .filter(|(_, m)| {
                let day = m.last_date.unwrap_or(m.month_end);
                day >= start && day <= end
            })
            .map(|(i, m)| MonthlyRow {
                month_end: m.month_end,
                last_date: m.last_date,
                close: m.close,
                rsi_monthly: self.monthly_rsi.value_at(i),
            })
            .collect()
    }

    /// Latest defined reading of each headline indicator.
    pub fn latest(&self) -> LatestReadings {
        LatestReadings {
            close: self.frame.observations().last().map(|o| o.close),
            rsi_daily: self.indicators.rsi_daily.last_valid(),
            rsi_monthly: self.monthly_rsi.last_valid(),
            meyer_multiple: self.indicators.meyer_multiple.last_valid(),
            mvrv_z_score: self.indicators.mvrv_z_score.last_valid(),
            fear_greed: self.fear_greed.last_valid(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatestReadings {
    pub close: Option<f64>,
    pub rsi_daily: Option<IndicatorPoint>,
    pub rsi_monthly: Option<IndicatorPoint>,
    pub meyer_multiple: Option<IndicatorPoint>,
    pub mvrv_z_score: Option<IndicatorPoint>,
    pub fear_greed: Option<IndicatorPoint>,
}
