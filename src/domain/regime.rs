//! Rule-based risk-zone classification.
//!
//! Two gates are evaluated independently for every observation except the last:
//! - Overheat: RSI > 70 && Meyer > 1 && MVRV-Z >= 1
//! - Extreme:  RSI >= 70 && Meyer > 2 && MVRV-Z >= 2
//!
//! When both hold, Extreme wins (labels are ordered None < Overheat < Extreme).
//! A label covers the half-open interval [date[i], date[i+1]); the final
//! observation has no following date and is never labelled. Undefined readings
//! fail every gate.

use crate::domain::indicator::IndicatorSeries;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ZoneLabel {
    #[default]
    None,
    Overheat,
    Extreme,
}

impl ZoneLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneLabel::None => "none",
            ZoneLabel::Overheat => "overheat",
            ZoneLabel::Extreme => "extreme",
        }
    }
}

impl serde::Serialize for ZoneLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for ZoneLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegimeThresholds {
    pub overheat_rsi: f64,
    pub overheat_meyer: f64,
    pub overheat_mvrv: f64,
    pub extreme_rsi: f64,
    pub extreme_meyer: f64,
    pub extreme_mvrv: f64,
}

impl Default for RegimeThresholds {
    fn default() -> Self {
        Self {
            overheat_rsi: 70.0,
            overheat_meyer: 1.0,
            overheat_mvrv: 1.0,
            extreme_rsi: 70.0,
            extreme_meyer: 2.0,
            extreme_mvrv: 2.0,
        }
    }
}

/// Indicator readings for one date.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DayReadings {
    pub rsi: Option<f64>,
    pub meyer_multiple: Option<f64>,
    pub mvrv_z_score: Option<f64>,
}

impl RegimeThresholds {
    pub fn is_overheat(&self, r: &DayReadings) -> bool {
        matches!(
            (r.rsi, r.meyer_multiple, r.mvrv_z_score),
            (Some(rsi), Some(meyer), Some(mvrv))
                if rsi > self.overheat_rsi && meyer > self.overheat_meyer && mvrv >= self.overheat_mvrv
        )
    }

    pub fn is_extreme(&self, r: &DayReadings) -> bool {
        matches!(
            (r.rsi, r.meyer_multiple, r.mvrv_z_score),
            (Some(rsi), Some(meyer), Some(mvrv))
                if rsi >= self.extreme_rsi && meyer > self.extreme_meyer && mvrv >= self.extreme_mvrv
        )
    }

    pub fn classify_day(&self, readings: &DayReadings) -> ZoneLabel {
        let mut label = ZoneLabel::None;
        if self.is_overheat(readings) {
            label = label.max(ZoneLabel::Overheat);
        }
        if self.is_extreme(readings) {
            label = label.max(ZoneLabel::Extreme);
        }
        label
    }
}

/// Label for `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: ZoneLabel,
}

/// Classifies every interval between consecutive dates of the aligned series.
pub fn classify(
    rsi: &IndicatorSeries,
    meyer_multiple: &IndicatorSeries,
    mvrv_z_score: &IndicatorSeries,
    thresholds: &RegimeThresholds,
) -> Vec<ZoneInterval> {
    debug_assert_eq!(rsi.len(), meyer_multiple.len());
    debug_assert_eq!(rsi.len(), mvrv_z_score.len());

    let intervals: Vec<ZoneInterval> = rsi
        .values
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let readings = DayReadings {
                rsi: pair[0].value,
                meyer_multiple: meyer_multiple.value_at(i),
                mvrv_z_score: mvrv_z_score.value_at(i),
            };
            ZoneInterval {
                start: pair[0].date,
                end: pair[1].date,
                label: thresholds.classify_day(&readings),
            }
        })
        .collect();

    tracing::debug!(
        intervals = intervals.len(),
        flagged = intervals.iter().filter(|z| z.label != ZoneLabel::None).count(),
        "classified zone intervals"
    );
    intervals
}

/// Merges adjacent intervals with the same non-`None` label into `[start, end)` spans.
pub fn merge_spans(intervals: &[ZoneInterval]) -> Vec<ZoneInterval> {
    let mut spans: Vec<ZoneInterval> = Vec::new();
    for interval in intervals.iter().filter(|z| z.label != ZoneLabel::None) {
        match spans.last_mut() {
            Some(span) if span.label == interval.label && span.end == interval.start => {
                span.end = interval.end;
            }
            _ => spans.push(*interval),
        }
    }
    spans
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneCounts {
    pub none: usize,
    pub overheat: usize,
    pub extreme: usize,
}

pub fn count_zones(intervals: &[ZoneInterval]) -> ZoneCounts {
    intervals
        .iter()
        .fold(ZoneCounts::default(), |mut counts, z| {
            match z.label {
                ZoneLabel::None => counts.none += 1,
                ZoneLabel::Overheat => counts.overheat += 1,
                ZoneLabel::Extreme => counts.extreme += 1,
            }
            counts
        })
}
