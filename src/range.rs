//! Date range construction
//!
//! Builds the continuous day sequence a grid is laid out from. The sequence
//! starts on the Monday on or before the requested start so the first column
//! of the grid is always a full week.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::history::ObservationLookup;
use crate::models::DayCount;

/// An inclusive `[start, end]` window of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Create a window, rejecting `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> GridResult<Self> {
        if end < start {
            return Err(GridError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The year ending on `today`: starts on the same calendar day one year
    /// earlier (Feb 29 falls back to Feb 28).
    pub fn trailing_year(today: NaiveDate) -> GridResult<Self> {
        let start = today
            .checked_sub_months(Months::new(12))
            .ok_or(GridError::DateOverflow { date: today })?;
        Self::new(start, today)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// The most recent Monday on or before `date`.
pub fn first_monday(date: NaiveDate) -> GridResult<NaiveDate> {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back))
        .ok_or(GridError::DateOverflow { date })
}

/// One `DayCount` per date in `[first_monday(start), end]`, counts taken from
/// `lookup` (missing dates count zero).
pub fn build_range(
    start: NaiveDate,
    end: NaiveDate,
    lookup: &ObservationLookup,
) -> GridResult<Vec<DayCount>> {
    if end < start {
        return Err(GridError::InvalidRange { start, end });
    }
    let first = first_monday(start)?;
    Ok(first
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| DayCount {
            date,
            count: lookup.count(date),
        })
        .collect())
}
