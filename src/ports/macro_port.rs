//! Macro statistics feed port (money supply, policy rate).

use crate::domain::error::CycleError;
use crate::domain::macro_data::MacroSeries;
use chrono::NaiveDate;

pub trait MacroFeed {
    /// Date-indexed values of `series_id` from `start_date` onward.
    fn fetch_series(
        &self,
        series_id: &str,
        start_date: NaiveDate,
        api_key: &str,
    ) -> Result<MacroSeries, CycleError>;
}
