//! Report output port.

use crate::domain::analysis::CycleReport;
use crate::domain::error::CycleError;
use chrono::NaiveDate;

/// Port for writing analysis output for a display window.
pub trait ReportPort {
    fn write(
        &self,
        report: &CycleReport,
        start_date: NaiveDate,
        end_date: NaiveDate,
        output_path: &str,
    ) -> Result<(), CycleError>;

    /// Writes the monthly closes and monthly RSI for the same window.
    fn write_monthly(
        &self,
        report: &CycleReport,
        start_date: NaiveDate,
        end_date: NaiveDate,
        output_path: &str,
    ) -> Result<(), CycleError>;
}
