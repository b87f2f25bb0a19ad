//! Halving schedule and the cycle-top windows derived from it.
//!
//! The schedule is hardcoded: four historical halvings followed by projected
//! ones at a ~1424-day cadence. Each halving anchors an expected top window
//! 16..=18 months later.

use chrono::{Months, NaiveDate};

const KNOWN_HALVINGS: [(i32, u32, u32); 4] = [
    (2012, 11, 28),
    (2016, 7, 9),
    (2020, 5, 11),
    (2024, 4, 10),
];

const PROJECTED_HALVINGS: [(i32, u32, u32); 5] = [
    (2028, 3, 6),
    (2032, 1, 29),
    (2035, 12, 23),
    (2039, 11, 16),
    (2043, 10, 11),
];

pub const PROJECTION_CADENCE_DAYS: i64 = 1424;
pub const TOP_WINDOW_START_MONTHS: u32 = 16;
pub const TOP_WINDOW_END_MONTHS: u32 = 18;
/// Counted from the end of the default schedule; selects 2024-04-10.
pub const DEFAULT_NEXT_HALVING_OFFSET: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalvingEvent {
    pub date: NaiveDate,
    pub projected: bool,
}

impl HalvingEvent {
    pub fn top_window(&self) -> ProjectedTopWindow {
        ProjectedTopWindow {
            start: add_months(self.date, TOP_WINDOW_START_MONTHS),
            end: add_months(self.date, TOP_WINDOW_END_MONTHS),
        }
    }

    /// Month anchors 16, 17 and 18 months after the halving.
    pub fn top_months(&self) -> Vec<NaiveDate> {
        (TOP_WINDOW_START_MONTHS..=TOP_WINDOW_END_MONTHS)
            .map(|k| add_months(self.date, k))
            .collect()
    }
}

/// Inclusive `[start, end]` window of an expected cycle top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectedTopWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ProjectedTopWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Calendar months are clamped to the month's last day, e.g. Jan 31 + 1 = Feb 29.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

pub fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalvingCalendar {
    events: Vec<HalvingEvent>,
}

impl Default for HalvingCalendar {
    fn default() -> Self {
        let known = KNOWN_HALVINGS.iter().map(|&t| (t, false));
        let projected = PROJECTED_HALVINGS.iter().map(|&t| (t, true));
        let events = known
            .chain(projected)
            .filter_map(|((y, m, d), projected)| {
                NaiveDate::from_ymd_opt(y, m, d).map(|date| HalvingEvent { date, projected })
            })
            .collect();
        Self { events }
    }
}

impl HalvingCalendar {
    pub fn events(&self) -> &[HalvingEvent] {
        &self.events
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.events.iter().map(|e| e.date).collect()
    }

    /// Appends projected halvings at the fixed cadence until one lands past `horizon`.
    ///
    /// Extending shifts which event a fixed end offset selects.
    pub fn extended_to(&self, horizon: NaiveDate) -> Self {
        let mut events = self.events.clone();
        while let Some(last) = events.last().copied() {
            if last.date > horizon {
                break;
            }
            match last
                .date
                .checked_add_signed(chrono::Duration::days(PROJECTION_CADENCE_DAYS))
            {
                Some(date) => events.push(HalvingEvent {
                    date,
                    projected: true,
                }),
                None => break,
            }
        }
        Self { events }
    }

    /// All halving-month anchors (three per halving), in schedule order.
    pub fn halving_months(&self) -> Vec<NaiveDate> {
        self.events.iter().flat_map(|e| e.top_months()).collect()
    }

    /// Shading spans `[m - 1 month, m + 1 month]` around each halving-month anchor.
    pub fn shading_spans(&self) -> Vec<(NaiveDate, NaiveDate)> {
        self.halving_months()
            .into_iter()
            .map(|m| (sub_months(m, 1), add_months(m, 1)))
            .collect()
    }

    pub fn top_windows(&self) -> Vec<ProjectedTopWindow> {
        self.events.iter().map(|e| e.top_window()).collect()
    }

    /// The countdown event: `offset` positions from the end of the schedule.
    pub fn next_halving(&self, offset: usize) -> Option<HalvingEvent> {
        if offset == 0 {
            return None;
        }
        self.events
            .len()
            .checked_sub(offset)
            .and_then(|i| self.events.get(i))
            .copied()
    }

    /// First scheduled halving strictly after `today`.
    pub fn first_after(&self, today: NaiveDate) -> Option<HalvingEvent> {
        self.events.iter().find(|e| e.date > today).copied()
    }

    /// Signed days from `today` to the end of the countdown event's top window.
    /// Negative once the window has passed.
    pub fn days_until_top(&self, offset: usize, today: NaiveDate) -> Option<i64> {
        self.next_halving(offset)
            .map(|e| (e.top_window().end - today).num_days())
    }

    /// `days_until_top` in 30-day months, rounded toward negative infinity.
    pub fn months_until_top(&self, offset: usize, today: NaiveDate) -> Option<i64> {
        self.days_until_top(offset, today).map(|d| d.div_euclid(30))
    }
}
