//! heatgrid - contribution heatmap grids from sparse daily counts
//!
//! Turns a sparse list of `(date, count)` observations into a calendar grid
//! ready for a GitHub-style heatmap: a Monday-aligned run of days, bucketed
//! into intensities 0-9 on a log scale, grouped into months and weeks.
//!
//! ```rust,ignore
//! use heatgrid::{DateWindow, HeatmapPipeline, GridConfig};
//!
//! let raw = heatgrid::history::parse_history_json(&payload)?;
//! let window = DateWindow::trailing_year(today)?;
//! let grid = HeatmapPipeline::new(GridConfig::default()).run_raw(&raw, window)?;
//! ```

pub mod calendar;
pub mod config;
pub mod error;
pub mod history;
pub mod intensity;
pub mod models;
pub mod pipeline;
pub mod range;
pub mod reporters;

pub use config::GridConfig;
pub use error::{GridError, GridResult};
pub use history::{DuplicatePolicy, ObservationLookup};
pub use intensity::{BucketRule, Thresholds};
pub use models::{CalendarGrid, Cell, Day, DayCount, Month, Observation, RawObservation, Week};
pub use pipeline::HeatmapPipeline;
pub use range::DateWindow;
