//! Output reporters for calendar grids
//!
//! Supports two output formats:
//! - `json` - The full grid, for a rendering layer or further processing
//! - `text` - A terminal summary of the grid

mod json;
mod text;

use crate::models::CalendarGrid;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: json, text", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

/// Render a grid in the specified format
pub fn report(grid: &CalendarGrid, format: &str, unit: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(grid, fmt, unit)
}

/// Render a grid using an OutputFormat enum
pub fn report_with_format(grid: &CalendarGrid, format: OutputFormat, unit: &str) -> Result<String> {
    match format {
        OutputFormat::Json => json::render(grid),
        OutputFormat::Text => text::render(grid, unit),
    }
}
