//! Monthly resampling and monthly RSI.
//!
//! Each calendar month is represented by its last available observation and
//! labelled with the month's final calendar day. Every calendar month between
//! the first and last observation is present; a month with no observation has
//! no close, and RSI windows touching it are undefined. Monthly RSI is
//! recomputed from these closes, so a period of 14 means 14 months.

use crate::domain::frame::TimeSeriesFrame;
use crate::domain::indicator::rsi::rsi_from_closes;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use chrono::{Datelike, Months, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyClose {
    /// Final calendar day of the month.
    pub month_end: NaiveDate,
    /// Date of the observation that supplied the close.
    pub last_date: Option<NaiveDate>,
    pub close: Option<f64>,
}

impl MonthlyClose {
    fn empty(month_end: NaiveDate) -> Self {
        Self {
            month_end,
            last_date: None,
            close: None,
        }
    }
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

pub fn resample_monthly(frame: &TimeSeriesFrame) -> Vec<MonthlyClose> {
    let mut months: Vec<MonthlyClose> = Vec::new();

    for obs in frame.observations() {
        let end = month_end(obs.date);
        if let Some(current) = months.last_mut() {
            if current.month_end == end {
                current.last_date = Some(obs.date);
                current.close = Some(obs.close);
                continue;
            }
            let mut gap = next_month_end(current.month_end);
            while gap < end {
                months.push(MonthlyClose::empty(gap));
                gap = next_month_end(gap);
            }
        }
        months.push(MonthlyClose {
            month_end: end,
            last_date: Some(obs.date),
            close: Some(obs.close),
        });
    }

    months
}

fn next_month_end(end: NaiveDate) -> NaiveDate {
    end.succ_opt().map(month_end).unwrap_or(NaiveDate::MAX)
}

pub fn calculate_monthly_rsi(frame: &TimeSeriesFrame, period: usize) -> IndicatorSeries {
    let months = resample_monthly(frame);
    let closes: Vec<Option<f64>> = months.iter().map(|m| m.close).collect();
    tracing::debug!(months = months.len(), period, "computing monthly RSI");

    IndicatorSeries::from_parts(
        IndicatorType::MonthlyRsi(period),
        months.iter().map(|m| m.month_end),
        rsi_from_closes(&closes, period),
    )
}
