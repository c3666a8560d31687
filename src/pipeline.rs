//! Heatmap pipeline
//!
//! Orchestrates the grid build:
//! 1. Build the Monday-aligned day range
//! 2. Classify days into intensity buckets
//! 3. Group days into months and weeks
//!
//! Any failure aborts the run; a partial grid is never returned.

use tracing::{debug, info};

use crate::calendar::group_by_month;
use crate::config::GridConfig;
use crate::error::GridResult;
use crate::history::ObservationLookup;
use crate::intensity::{classify, Thresholds};
use crate::models::{CalendarGrid, RawObservation};
use crate::range::{build_range, first_monday, DateWindow};

/// Full grid pipeline for one date window.
#[derive(Debug, Clone, Default)]
pub struct HeatmapPipeline {
    config: GridConfig,
    /// Pre-aggregated total passed through to the grid
    total: Option<u64>,
}

impl HeatmapPipeline {
    /// Create a new pipeline with the given configuration.
    pub fn new(config: GridConfig) -> Self {
        Self {
            config,
            total: None,
        }
    }

    /// Attach a grand total to pass through unchanged.
    pub fn with_total(mut self, total: Option<u64>) -> Self {
        self.total = total;
        self
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Build the grid for `window` from already-indexed observations.
    pub fn run(&self, lookup: &ObservationLookup, window: DateWindow) -> GridResult<CalendarGrid> {
        let range = build_range(window.start(), window.end(), lookup)?;
        debug!(
            "Built range of {} days from {} to {}",
            range.len(),
            range.first().map(|d| d.date).unwrap_or(window.start()),
            window.end()
        );

        let (days, thresholds) = classify(&range, self.config.bucket_rule());
        debug!(
            "Classified {} days ({} active) with the {} rule",
            days.len(),
            days.iter().filter(|d| d.count > 0).count(),
            self.config.bucket_rule()
        );

        let months = group_by_month(days);
        info!(
            "Grouped {} to {} into {} months",
            window.start(),
            window.end(),
            months.len()
        );

        Ok(CalendarGrid {
            start: window.start(),
            end: window.end(),
            first_monday: first_monday(window.start())?,
            months,
            thresholds,
            total: self.total,
        })
    }

    /// Validate a raw payload with the configured duplicate policy, then build.
    pub fn run_raw(&self, raw: &[RawObservation], window: DateWindow) -> GridResult<CalendarGrid> {
        let lookup = ObservationLookup::from_raw(raw, self.config.duplicate_policy())?;
        self.run(&lookup, window)
    }

    /// Thresholds for `window` without grouping, `None` when nothing happened.
    pub fn thresholds(
        &self,
        lookup: &ObservationLookup,
        window: DateWindow,
    ) -> GridResult<Option<Thresholds>> {
        let range = build_range(window.start(), window.end(), lookup)?;
        Ok(Thresholds::from_counts(range.iter().map(|d| d.count)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;
    use crate::history::DuplicatePolicy;
    use crate::intensity::BucketRule;
    use crate::config::IntensityConfig;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn raw(date: &str, count: i64) -> RawObservation {
        RawObservation {
            date: date.to_string(),
            count,
        }
    }

    fn window(start: &str, end: &str) -> DateWindow {
        DateWindow::new(date(start), date(end)).unwrap()
    }

    #[test]
    fn test_run_raw_scenario() {
        let grid = HeatmapPipeline::default()
            .with_total(Some(55))
            .run_raw(
                &[raw("2024-01-07", 50), raw("2024-01-03", 5)],
                window("2024-01-01", "2024-01-10"),
            )
            .unwrap();

        assert_eq!(grid.first_monday, date("2024-01-01"));
        assert_eq!(grid.total, Some(55));
        assert_eq!(grid.months.len(), 1);
        assert_eq!(grid.months[0].weeks.len(), 2);
        let by_date: Vec<(NaiveDate, u8)> = grid.days().map(|d| (d.date, d.intensity)).collect();
        assert_eq!(by_date.len(), 10);
        assert_eq!(by_date[2], (date("2024-01-03"), 4));
        assert_eq!(by_date[6], (date("2024-01-07"), 9));
    }

    #[test]
    fn test_ceiling_rule_from_config() {
        let config = GridConfig {
            intensity: IntensityConfig {
                rule: Some(BucketRule::Ceiling),
            },
            ..Default::default()
        };
        let grid = HeatmapPipeline::new(config)
            .run_raw(&[raw("2024-01-03", 5)], window("2024-01-01", "2024-01-10"))
            .unwrap();
        let active: Vec<u8> = grid.days().filter(|d| d.count > 0).map(|d| d.intensity).collect();
        assert_eq!(active, vec![1]);
    }

    #[test]
    fn test_errors_abort_the_run() {
        let pipeline = HeatmapPipeline::default();
        let err = pipeline
            .run_raw(&[raw("2024-01-03", -1)], window("2024-01-01", "2024-01-10"))
            .unwrap_err();
        assert!(matches!(err, GridError::NegativeCount { .. }));

        let config = GridConfig {
            history: crate::config::HistoryConfig {
                duplicates: Some(DuplicatePolicy::Reject),
            },
            ..Default::default()
        };
        let err = HeatmapPipeline::new(config)
            .run_raw(
                &[raw("2024-01-03", 1), raw("2024-01-03", 2)],
                window("2024-01-01", "2024-01-10"),
            )
            .unwrap_err();
        assert!(matches!(err, GridError::DuplicateDate { .. }));
    }

    #[test]
    fn test_thresholds_only() {
        let pipeline = HeatmapPipeline::default();
        let empty = ObservationLookup::default();
        assert!(pipeline
            .thresholds(&empty, window("2024-01-01", "2024-01-10"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_observations_outside_window_are_ignored() {
        let grid = HeatmapPipeline::default()
            .run_raw(
                &[raw("2023-12-25", 100), raw("2024-01-05", 3)],
                window("2024-01-01", "2024-01-07"),
            )
            .unwrap();
        assert_eq!(grid.observed_total(), 3);
        assert_eq!(grid.intensity_histogram()[9], 1);
    }
}
