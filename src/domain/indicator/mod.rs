//! Window-based indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: a single dated reading; `None` means insufficient data
//! - `IndicatorType`: indicator identity + window parameters (usable as a map key)
//! - `IndicatorSeries`: a date-aligned series of readings
//!
//! Undefined readings are never coerced to zero.

pub mod meyer;
pub mod mvrv;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod volatility;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl IndicatorPoint {
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    /// Moving average multiplied by two (the MA350x2 line).
    SmaDoubled(usize),
    Rsi(usize),
    MonthlyRsi(usize),
    Volatility(usize),
    Momentum(usize),
    MeyerMultiple(usize),
    RealizedValue(usize),
    MvrvZScore(usize),
    FearGreed,
}

impl IndicatorType {
    /// Column name used in reports.
    pub fn column_name(&self) -> String {
        match self {
            IndicatorType::Sma(period) => format!("MA{}", period),
            IndicatorType::SmaDoubled(period) => format!("MA{}x2", period),
            IndicatorType::Rsi(_) => "RSI_daily".to_string(),
            IndicatorType::MonthlyRsi(_) => "RSI_monthly".to_string(),
            IndicatorType::Volatility(_) => "Volatility".to_string(),
            IndicatorType::Momentum(_) => "Momentum".to_string(),
            IndicatorType::MeyerMultiple(_) => "MeyerMultiple".to_string(),
            IndicatorType::RealizedValue(_) => "RealizedValue".to_string(),
            IndicatorType::MvrvZScore(_) => "MVRVZScore".to_string(),
            IndicatorType::FearGreed => "FearGreedIndex".to_string(),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::SmaDoubled(period) => write!(f, "SMA({})x2", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::MonthlyRsi(period) => write!(f, "RSI_MONTHLY({})", period),
            IndicatorType::Volatility(period) => write!(f, "VOLATILITY({})", period),
            IndicatorType::Momentum(period) => write!(f, "MOMENTUM({})", period),
            IndicatorType::MeyerMultiple(period) => write!(f, "MEYER({})", period),
            IndicatorType::RealizedValue(period) => write!(f, "REALIZED({})", period),
            IndicatorType::MvrvZScore(period) => write!(f, "MVRV_Z({})", period),
            IndicatorType::FearGreed => write!(f, "FEAR_GREED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Zips `dates` with `values`; both must have the same length.
    pub fn from_parts(
        indicator_type: IndicatorType,
        dates: impl IntoIterator<Item = NaiveDate>,
        values: impl IntoIterator<Item = Option<f64>>,
    ) -> Self {
        let values = dates
            .into_iter()
            .zip(values)
            .map(|(date, value)| IndicatorPoint { date, value })
            .collect();
        Self {
            indicator_type,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(|p| p.value)
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.values
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .and_then(|i| self.values[i].value)
    }

    pub fn raw(&self) -> Vec<Option<f64>> {
        self.values.iter().map(|p| p.value).collect()
    }

    /// Most recent defined reading.
    pub fn last_valid(&self) -> Option<IndicatorPoint> {
        self.values.iter().rev().find(|p| p.is_valid()).copied()
    }

    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|p| p.is_valid()).count()
    }
}
