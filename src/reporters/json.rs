//! JSON reporter
//!
//! Outputs the full CalendarGrid as pretty-printed JSON: months, weeks and
//! cells in layout order, each day with its date, raw count and intensity.

use crate::models::CalendarGrid;
use anyhow::Result;

/// Render grid as JSON
pub fn render(grid: &CalendarGrid) -> Result<String> {
    Ok(serde_json::to_string_pretty(grid)?)
}
