//! CLI command definitions and handlers

mod build;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use console::style;
use std::path::{Path, PathBuf};

use heatgrid::config::{GridConfig, CONFIG_FILENAME};

/// Parse a `YYYY-MM-DD` date argument
fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    heatgrid::history::parse_date(s).map_err(|e| e.to_string())
}

/// heatgrid - contribution heatmap grids from sparse daily counts
#[derive(Parser, Debug)]
#[command(name = "heatgrid")]
#[command(
    version,
    about = "Turn sparse daily event counts into a Monday-aligned, percentile-bucketed calendar heatmap grid",
    after_help = "\
Examples:
  heatgrid build --history history.json                 Trailing year ending today, JSON grid
  heatgrid build --start 2024-01-01 --end 2024-12-31 < history.json
  heatgrid build --history history.json --format text   Terminal summary
  heatgrid thresholds --history history.json            Show the nine percentile thresholds
  heatgrid config init                                  Write an example heatgrid.toml

Input format: [{\"date\": \"YYYY-MM-DD\", \"count\": 12}, ...]"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the observations come from and which window to cover
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// History JSON file ("-" for stdin)
    #[arg(long, default_value = "-")]
    pub history: PathBuf,

    /// First day of the window, inclusive (default: one year before --end)
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// Last day of the window, inclusive (default: today)
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,

    /// How to treat repeated dates: last-wins, reject
    #[arg(long, value_parser = ["last-wins", "reject"])]
    pub duplicates: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the calendar grid for a date window
    Build {
        #[command(flatten)]
        input: InputArgs,

        /// Grand total to pass through to the grid
        #[arg(long, conflicts_with = "total_file")]
        total: Option<u64>,

        /// JSON file holding {"total": n}
        #[arg(long)]
        total_file: Option<PathBuf>,

        /// Output format: json, text
        #[arg(long, short = 'f', value_parser = ["json", "text", "txt"])]
        format: Option<String>,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Bucket rule: reached, ceiling
        #[arg(long, value_parser = ["reached", "ceiling"])]
        rule: Option<String>,
    },

    /// Print the log-scale percentile thresholds for a date window
    Thresholds {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write an example heatgrid.toml in the current directory
    Init,
    /// Show the effective configuration
    Show,
}

pub fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = GridConfig::load(&cwd);

    match cli.command {
        Commands::Build {
            input,
            total,
            total_file,
            format,
            output,
            rule,
        } => build::run(
            config,
            &input,
            total,
            total_file.as_deref(),
            format.as_deref(),
            output.as_deref(),
            rule.as_deref(),
        ),

        Commands::Thresholds { input } => build::thresholds(config, &input),

        Commands::Config { action } => run_config_action(action, &cwd, &config),
    }
}

fn run_config_action(action: ConfigAction, cwd: &Path, config: &GridConfig) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = GridConfig::init_project_config(cwd)?;
            println!(
                "{} Config at {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
            Ok(())
        }
        ConfigAction::Show => show_config(cwd, config),
    }
}

fn show_config(cwd: &Path, config: &GridConfig) -> Result<()> {
    let found = |p: &Path| if p.exists() { "✓" } else { "(not found)" };
    println!("Config paths:");
    if let Some(user_path) = GridConfig::user_config_path() {
        println!("  User:    {} {}", user_path.display(), found(&user_path));
    }
    let project = cwd.join(CONFIG_FILENAME);
    println!("  Project: {} {}", project.display(), found(&project));
    println!();
    print!("{}", toml::to_string_pretty(&config.effective())?);
    Ok(())
}
