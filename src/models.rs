//! Core data models for heatgrid
//!
//! These models describe the calendar grid handed to a rendering layer:
//! days carry their date and raw count next to the intensity bucket, and
//! spacer cells are a distinct variant rather than a magic `-1`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::intensity::Thresholds;

/// A validated observation: `count` events happened on `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub count: u64,
}

/// An observation as delivered by the retrieval collaborator, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    pub date: String,
    pub count: i64,
}

/// One calendar day with its count, before intensities are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// A classified calendar day.
///
/// `intensity` is 0 exactly when `count` is 0, and `1..=9` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    pub count: u64,
    pub intensity: u8,
}

impl Day {
    /// Tooltip text, e.g. `1,234 commands on Mon, Jan 1, 2024`.
    pub fn caption(&self, unit: &str) -> String {
        format!(
            "{} {} on {}",
            format_count(self.count),
            unit,
            self.date.format("%a, %b %-d, %Y")
        )
    }
}

/// A single grid cell: either a real day or a spacer used for weekday alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Day(Day),
    Spacer,
}

impl Cell {
    pub fn as_day(&self) -> Option<&Day> {
        match self {
            Cell::Day(day) => Some(day),
            Cell::Spacer => None,
        }
    }

    pub fn is_spacer(&self) -> bool {
        matches!(self, Cell::Spacer)
    }

    /// Count in the legacy encoding where spacers are `-1`.
    pub fn sentinel_count(&self) -> i64 {
        match self {
            Cell::Day(day) => i64::try_from(day.count).unwrap_or(i64::MAX),
            Cell::Spacer => -1,
        }
    }

    /// Intensity in the legacy encoding where spacers are `-1`.
    pub fn sentinel_intensity(&self) -> i8 {
        match self {
            Cell::Day(day) => day.intensity as i8,
            Cell::Spacer => -1,
        }
    }
}

/// Up to seven cells, Monday first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub cells: Vec<Cell>,
}

impl Week {
    /// A week pre-filled with `spacers` spacer cells.
    pub fn with_spacers(spacers: usize) -> Self {
        Self {
            cells: vec![Cell::Spacer; spacers],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn days(&self) -> impl Iterator<Item = &Day> + '_ {
        self.cells.iter().filter_map(Cell::as_day)
    }
}

/// A calendar month of weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Month {
    /// Short English month name ("Jan")
    pub label: String,
    pub year: i32,
    /// 1-based month number
    pub month: u32,
    pub weeks: Vec<Week>,
}

impl Month {
    pub fn days(&self) -> impl Iterator<Item = &Day> + '_ {
        self.weeks.iter().flat_map(Week::days)
    }
}

/// The finished grid for one date window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarGrid {
    /// Requested window start (inclusive)
    pub start: NaiveDate,
    /// Requested window end (inclusive)
    pub end: NaiveDate,
    /// First day of the grid, the Monday on or before `start`
    pub first_monday: NaiveDate,
    pub months: Vec<Month>,
    /// Log-scale thresholds, absent when no day had a nonzero count
    pub thresholds: Option<Thresholds>,
    /// Pre-aggregated total passed through from the data source
    pub total: Option<u64>,
}

impl CalendarGrid {
    /// All real days in date order, spacers removed.
    pub fn days(&self) -> impl Iterator<Item = &Day> + '_ {
        self.months.iter().flat_map(Month::days)
    }

    /// Sum of the per-day counts in the grid (including the Monday padding).
    pub fn observed_total(&self) -> u64 {
        self.days().map(|d| d.count).sum()
    }

    /// Number of days with at least one event.
    pub fn active_days(&self) -> usize {
        self.days().filter(|d| d.count > 0).count()
    }

    /// Day with the highest count; the earliest one wins ties.
    pub fn busiest_day(&self) -> Option<&Day> {
        self.days()
            .filter(|d| d.count > 0)
            .fold(None, |best: Option<&Day>, d| match best {
                Some(b) if b.count >= d.count => Some(b),
                _ => Some(d),
            })
    }

    /// How many days fall into each intensity bucket, index = bucket.
    pub fn intensity_histogram(&self) -> [usize; 10] {
        let mut histogram = [0usize; 10];
        for day in self.days() {
            if let Some(slot) = histogram.get_mut(day.intensity as usize) {
                *slot += 1;
            }
        }
        histogram
    }
}

/// Format a count with thousands separators: `1234567` → `1,234,567`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_caption() {
        let day = Day {
            date: date("2024-01-01"),
            count: 1234,
            intensity: 5,
        };
        assert_eq!(day.caption("commands"), "1,234 commands on Mon, Jan 1, 2024");
    }

    #[test]
    fn test_sentinels_distinguish_spacer_from_empty_day() {
        let empty = Cell::Day(Day {
            date: date("2024-01-01"),
            count: 0,
            intensity: 0,
        });
        assert_eq!(empty.sentinel_count(), 0);
        assert_eq!(empty.sentinel_intensity(), 0);
        assert_eq!(Cell::Spacer.sentinel_count(), -1);
        assert_eq!(Cell::Spacer.sentinel_intensity(), -1);
    }

    #[test]
    fn test_cell_serializes_with_kind_tag() {
        let json = serde_json::to_value(Cell::Spacer).unwrap();
        assert_eq!(json["kind"], "spacer");

        let day = Cell::Day(Day {
            date: date("2024-01-03"),
            count: 5,
            intensity: 4,
        });
        let json = serde_json::to_value(day).unwrap();
        assert_eq!(json["kind"], "day");
        assert_eq!(json["date"], "2024-01-03");
        assert_eq!(json["count"], 5);
        assert_eq!(json["intensity"], 4);

        let back: Cell = serde_json::from_value(json).unwrap();
        assert_eq!(back, day);
    }

    #[test]
    fn test_week_with_spacers() {
        let week = Week::with_spacers(3);
        assert_eq!(week.len(), 3);
        assert!(week.cells.iter().all(Cell::is_spacer));
        assert_eq!(week.days().count(), 0);
    }
}
