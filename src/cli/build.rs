//! Build and thresholds commands

use anyhow::{Context, Result};
use chrono::NaiveDate;
use console::style;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use heatgrid::config::GridConfig;
use heatgrid::history::{parse_history_json, parse_total_json};
use heatgrid::intensity::PERCENTILES;
use heatgrid::{reporters, DateWindow, HeatmapPipeline, ObservationLookup};

use super::InputArgs;

/// Run the build command
pub fn run(
    mut config: GridConfig,
    input: &InputArgs,
    total: Option<u64>,
    total_file: Option<&Path>,
    format: Option<&str>,
    output: Option<&Path>,
    rule: Option<&str>,
) -> Result<()> {
    // Flags override config
    if let Some(rule) = rule {
        config.intensity.rule = Some(rule.parse().map_err(anyhow::Error::msg)?);
    }
    if let Some(format) = format {
        config.defaults.format = Some(format.to_string());
    }
    apply_duplicates(&mut config, input)?;

    let total = match total_file {
        Some(path) => Some(
            parse_total_json(&read_input(path)?)
                .with_context(|| format!("Invalid total in {}", path.display()))?,
        ),
        None => total,
    };

    let (lookup, window) = load_input(&config, input)?;
    let pipeline = HeatmapPipeline::new(config).with_total(total);
    let grid = pipeline.run(&lookup, window)?;

    let config = pipeline.config();
    let rendered = reporters::report(&grid, config.format(), config.unit())?;

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Wrote {} months to {}",
                style("✓").green(),
                grid.months.len(),
                style(path.display()).cyan()
            );
        }
        None => {
            print!("{}", rendered);
            if !rendered.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}

/// Run the thresholds command
pub fn thresholds(mut config: GridConfig, input: &InputArgs) -> Result<()> {
    apply_duplicates(&mut config, input)?;
    let (lookup, window) = load_input(&config, input)?;
    let thresholds = HeatmapPipeline::new(config).thresholds(&lookup, window)?;

    match thresholds {
        Some(t) => {
            for ((pct, log), count) in PERCENTILES.iter().zip(t.values()).zip(t.as_counts()) {
                println!("p{:<3} {:.3}  ({:.1})", pct, log, count);
            }
        }
        None => println!("No activity between {} and {}", window.start(), window.end()),
    }
    Ok(())
}

fn apply_duplicates(config: &mut GridConfig, input: &InputArgs) -> Result<()> {
    if let Some(policy) = &input.duplicates {
        config.history.duplicates = Some(policy.parse().map_err(anyhow::Error::msg)?);
    }
    Ok(())
}

/// Read and validate observations, and resolve the window.
fn load_input(config: &GridConfig, input: &InputArgs) -> Result<(ObservationLookup, DateWindow)> {
    let window = resolve_window(input.start, input.end, today())?;
    let payload = read_input(&input.history)?;
    let raw = parse_history_json(&payload)
        .with_context(|| format!("Invalid history in {}", input.history.display()))?;
    debug!("Read {} observations", raw.len());
    let lookup = ObservationLookup::from_raw(&raw, config.duplicate_policy())?;
    Ok((lookup, window))
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Fill in missing window bounds: `end` defaults to `today`, `start` to one
/// year before `end`.
fn resolve_window(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<DateWindow> {
    let end = end.unwrap_or(today);
    let window = match start {
        Some(start) => DateWindow::new(start, end)?,
        None => DateWindow::trailing_year(end)?,
    };
    Ok(window)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}
