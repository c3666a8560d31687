//! Month and week grouping
//!
//! Lays a classified day sequence out as months of Monday-first weeks. The
//! first week of each month is front-padded with spacers so every day sits
//! in its weekday row; trailing weeks are left short.

use chrono::{Datelike, NaiveDate};

use crate::models::{Cell, Day, Month, Week};

/// Weekday row, Monday = 0 … Sunday = 6.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// Short English month name, e.g. "Jan".
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b").to_string()
}

/// Fold state: months already closed, the open month and the open week.
#[derive(Debug, Default)]
struct Grouping {
    months: Vec<Month>,
    current: Option<Month>,
    week: Week,
}

impl Grouping {
    fn push(self, day: Day) -> Self {
        let Grouping {
            mut months,
            current,
            mut week,
        } = self;
        let column = weekday_index(day.date);

        let mut month = match current {
            Some(month) if month.year == day.date.year() && month.month == day.date.month() => {
                month
            }
            other => {
                if let Some(mut closing) = other {
                    if !week.is_empty() {
                        closing.weeks.push(week);
                    }
                    months.push(closing);
                }
                week = Week::with_spacers(column);
                Month {
                    label: month_label(day.date),
                    year: day.date.year(),
                    month: day.date.month(),
                    weeks: Vec::new(),
                }
            }
        };

        week.cells.push(Cell::Day(day));
        if column == 6 {
            month.weeks.push(std::mem::take(&mut week));
        }

        Grouping {
            months,
            current: Some(month),
            week,
        }
    }

    fn finish(self) -> Vec<Month> {
        let Grouping {
            mut months,
            current,
            week,
        } = self;
        if let Some(mut last) = current {
            if !week.is_empty() {
                last.weeks.push(week);
            }
            months.push(last);
        }
        months
    }
}

/// Partition an ordered, continuous day sequence into months and weeks.
///
/// Months appear only when at least one of their days is present.
pub fn group_by_month<I>(days: I) -> Vec<Month>
where
    I: IntoIterator<Item = Day>,
{
    days.into_iter()
        .fold(Grouping::default(), Grouping::push)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn days(from: &str, to: &str) -> Vec<Day> {
        let end = date(to);
        date(from)
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| Day {
                date,
                count: 0,
                intensity: 0,
            })
            .collect()
    }

    #[test]
    fn test_weekday_index() {
        assert_eq!(weekday_index(date("2024-01-01")), 0); // Monday
        assert_eq!(weekday_index(date("2024-01-07")), 6); // Sunday
        assert_eq!(weekday_index(date("2024-01-03")), 2);
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(date("2024-01-15")), "Jan");
        assert_eq!(month_label(date("2024-09-01")), "Sep");
    }

    #[test]
    fn test_empty_input() {
        assert!(group_by_month(Vec::new()).is_empty());
    }

    #[test]
    fn test_single_month_two_weeks() {
        let months = group_by_month(days("2024-01-01", "2024-01-10"));
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].label, "Jan");
        assert_eq!(months[0].weeks.len(), 2);
        assert_eq!(months[0].weeks[0].len(), 7);
        assert_eq!(months[0].weeks[1].len(), 3);
        assert!(months[0].weeks.iter().flat_map(|w| &w.cells).all(|c| !c.is_spacer()));
    }

    #[test]
    fn test_month_boundary_pads_first_week() {
        // 2024-02-01 is a Thursday
        let months = group_by_month(days("2024-01-29", "2024-02-11"));
        assert_eq!(months.len(), 2);

        let jan = &months[0];
        assert_eq!(jan.label, "Jan");
        assert_eq!(jan.weeks.len(), 1);
        assert_eq!(jan.weeks[0].len(), 3);

        let feb = &months[1];
        assert_eq!(feb.label, "Feb");
        let first = &feb.weeks[0];
        assert_eq!(first.len(), 7);
        assert!(first.cells[..3].iter().all(Cell::is_spacer));
        assert_eq!(first.cells[3].as_day().unwrap().date, date("2024-02-01"));
        assert_eq!(feb.weeks[1].len(), 7);

        let all: Vec<NaiveDate> = months.iter().flat_map(|m| m.days()).map(|d| d.date).collect();
        assert_eq!(all.len(), 14);
        assert_eq!(all.first(), Some(&date("2024-01-29")));
        assert_eq!(all.last(), Some(&date("2024-02-11")));
    }

    #[test]
    fn test_month_starting_on_monday_gets_no_spacers() {
        // 2024-04-01 is a Monday
        let months = group_by_month(days("2024-03-25", "2024-04-03"));
        assert_eq!(months[1].label, "Apr");
        assert_eq!(months[1].weeks[0].len(), 3);
        assert!(months[1].weeks[0].cells.iter().all(|c| !c.is_spacer()));
    }

    #[test]
    fn test_month_ending_on_sunday_has_no_empty_week() {
        // 2024-03-31 is a Sunday
        let months = group_by_month(days("2024-03-25", "2024-04-01"));
        assert_eq!(months[0].weeks.len(), 1);
        assert_eq!(months[1].weeks.len(), 1);
        assert!(months.iter().flat_map(|m| &m.weeks).all(|w| !w.is_empty()));
    }

    #[test]
    fn test_same_month_in_different_years_stays_separate() {
        let months = group_by_month(days("2023-01-30", "2024-01-02"));
        assert_eq!(months.len(), 13);
        assert_eq!((months[0].year, months[0].month), (2023, 1));
        assert_eq!((months[12].year, months[12].month), (2024, 1));
    }

    #[test]
    fn test_weeks_never_exceed_seven_and_only_first_week_has_spacers() {
        let months = group_by_month(days("2023-06-05", "2024-06-05"));
        for month in &months {
            for (i, week) in month.weeks.iter().enumerate() {
                assert!(week.len() <= 7);
                if i > 0 {
                    assert!(week.cells.iter().all(|c| !c.is_spacer()));
                }
            }
            let first = &month.weeks[0];
            let spacers = first.cells.iter().take_while(|c| c.is_spacer()).count();
            let first_day = first.cells[spacers].as_day().unwrap();
            assert_eq!(spacers, weekday_index(first_day.date));
        }
    }
}
