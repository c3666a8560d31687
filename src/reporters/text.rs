//! Text (terminal) reporter

use crate::intensity::PERCENTILES;
use crate::models::{format_count, CalendarGrid};
use anyhow::Result;
use console::style;
use std::fmt::Write as _;

/// Render grid as a terminal summary
pub fn render(grid: &CalendarGrid, unit: &str) -> Result<String> {
    let mut out = String::new();
    let day_count = grid.days().count();

    // Header
    writeln!(
        out,
        "\n{}  {} to {}",
        style("heatgrid").bold(),
        grid.start,
        grid.end
    )?;
    writeln!(out, "{}", style("──────────────────────────────────────").dim())?;
    if let Some(total) = grid.total {
        write!(out, "Total: {} {}  ", style(format_count(total)).bold(), unit)?;
    }
    writeln!(
        out,
        "Observed: {}  Active days: {}/{}  Grid starts: {}",
        format_count(grid.observed_total()),
        grid.active_days(),
        day_count,
        grid.first_monday
    )?;
    if let Some(busiest) = grid.busiest_day() {
        writeln!(out, "Busiest: {}", busiest.caption(unit))?;
    }
    out.push('\n');

    // Months
    writeln!(out, "{}", style("MONTHS").bold())?;
    for month in &grid.months {
        let days = month.days().count();
        let events: u64 = month.days().map(|d| d.count).sum();
        writeln!(
            out,
            "  {} {}  {:>2} weeks  {:>2} days  {:>10} {}",
            month.label,
            month.year,
            month.weeks.len(),
            days,
            format_count(events),
            unit
        )?;
    }
    out.push('\n');

    // Buckets
    writeln!(out, "{}", style("INTENSITY").bold())?;
    let histogram = grid.intensity_histogram();
    for (bucket, days) in histogram.iter().enumerate() {
        writeln!(out, "  {}  {:>4} days", bucket, days)?;
    }

    match &grid.thresholds {
        Some(thresholds) => {
            out.push('\n');
            writeln!(out, "{}", style("THRESHOLDS").bold())?;
            for (pct, count) in PERCENTILES.iter().zip(thresholds.as_counts()) {
                writeln!(out, "  p{:<3} {:>10.1} {}", pct, count, unit)?;
            }
        }
        None => {
            writeln!(out, "\n{}", style("No activity in range").dim())?;
        }
    }

    Ok(out)
}
