//! CSV report adapter.
//!
//! Daily output has one row per observation in the display window; undefined
//! readings are empty cells. Column names follow the configured windows
//! (e.g. `MA111`, `MA350x2`).

use crate::domain::analysis::CycleReport;
use crate::domain::error::CycleError;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

pub struct CsvReportAdapter;

fn report_err(e: impl std::fmt::Display) -> CycleError {
    CycleError::Report {
        reason: e.to_string(),
    }
}

pub fn daily_header(report: &CycleReport) -> Vec<String> {
    let ind = &report.indicators;
    vec![
        "date".to_string(),
        "close".to_string(),
        ind.ma_short.indicator_type.column_name(),
        ind.ma_long_x2.indicator_type.column_name(),
        ind.rsi_daily.indicator_type.column_name(),
        ind.volatility.indicator_type.column_name(),
        ind.meyer_multiple.indicator_type.column_name(),
        ind.mvrv_z_score.indicator_type.column_name(),
        report.fear_greed.indicator_type.column_name(),
        "m2_supply".to_string(),
        "fed_rate".to_string(),
        "zone".to_string(),
    ]
}

fn write_rows<W: Write, T: Serialize>(
    writer: W,
    header: &[String],
    rows: &[T],
) -> Result<(), CycleError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(header).map_err(report_err)?;
    for row in rows {
        wtr.serialize(row).map_err(report_err)?;
    }
    wtr.flush()?;
    Ok(())
}

impl CsvReportAdapter {
    pub fn write_daily_to<W: Write>(
        &self,
        writer: W,
        report: &CycleReport,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), CycleError> {
        let rows = report.rows_between(start_date, end_date);
        write_rows(writer, &daily_header(report), &rows)
    }

    pub fn write_monthly_to<W: Write>(
        &self,
        writer: W,
        report: &CycleReport,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), CycleError> {
        let header: Vec<String> = ["month_end", "last_date", "close"]
            .iter()
            .map(|s| s.to_string())
            .chain(std::iter::once(
                report.monthly_rsi.indicator_type.column_name(),
            ))
            .collect();
        let rows = report.monthly_rows_between(start_date, end_date);
        write_rows(writer, &header, &rows)
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        report: &CycleReport,
        start_date: NaiveDate,
        end_date: NaiveDate,
        output_path: &str,
    ) -> Result<(), CycleError> {
        let file = std::fs::File::create(output_path)?;
        self.write_daily_to(file, report, start_date, end_date)
    }

    fn write_monthly(
        &self,
        report: &CycleReport,
        start_date: NaiveDate,
        end_date: NaiveDate,
        output_path: &str,
    ) -> Result<(), CycleError> {
        let file = std::fs::File::create(output_path)?;
        self.write_monthly_to(file, report, start_date, end_date)
    }
}
