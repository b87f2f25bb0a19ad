//! Daily price feed port.

use crate::domain::error::CycleError;
use crate::domain::observation::Observation;
use chrono::NaiveDate;

pub trait PriceFeed {
    /// Ascending, de-duplicated daily closes for `symbol` within `[start_date, end_date]`.
    fn fetch_daily_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Observation>, CycleError>;
}
