//! Droughtline CLI
//!
//! Command-line interface for the drought timeline heatmap:
//! - Render the chart as SVG
//! - Run hover queries
//! - Summarize years
//! - Export the model as JSON

use anyhow::Context;
use clap::{Parser, Subcommand};
use droughtline::loader::{load_dataset, source_for};
use droughtline::model::{hover, BoundaryYear, DroughtModel, IncompletePolicy};
use droughtline::{generate_default_config, summarize, Config, HoverState, LoggingConfig, SvgRenderer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "droughtline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Monthly drought-severity timeline heatmap")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Dataset file path or URL (overrides config)
    #[arg(short, long, global = true)]
    pub dataset: Option<String>,

    /// Boundary year: earliest, latest or a year (overrides config)
    #[arg(long, global = true)]
    pub boundary_year: Option<BoundaryYear>,

    /// Policy for years missing months: reject or skip (overrides config)
    #[arg(long, global = true)]
    pub incomplete_years: Option<IncompletePolicy>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the chart as SVG
    Render {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Show the hover state for this year
        #[arg(long, requires = "hover_x")]
        hover_year: Option<i32>,
        /// Pointer offset inside the hovered year's cell
        #[arg(long, requires = "hover_year")]
        hover_x: Option<f64>,
    },

    /// Resolve a pointer offset inside a year's cell
    Hover {
        /// Year whose cell is hovered
        #[arg(short, long)]
        year: i32,
        /// Horizontal offset inside the cell
        #[arg(short, long)]
        x: f64,
    },

    /// Per-year dry-share summary
    Summary,

    /// Export the model as JSON
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_output(output.as_ref(), &generate_default_config());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(dataset) = &cli.dataset {
        config.dataset.location = dataset.clone();
    }
    if let Some(boundary) = cli.boundary_year {
        config.model.boundary_year = boundary;
    }
    if let Some(policy) = cli.incomplete_years {
        config.model.incomplete_years = policy;
    }

    init_logging(&config.logging);
    tracing::debug!("Droughtline v{}", env!("CARGO_PKG_VERSION"));

    let source = source_for(&config.dataset.location);
    let normalized = load_dataset(source.as_ref())
        .await
        .with_context(|| format!("Could not load dataset {}", config.dataset.location))?;
    let model = DroughtModel::build(normalized.records, &config.model)?;

    let renderer =
        SvgRenderer::new(config.chart.dimensions).annotate_boundary(config.chart.annotate_boundary);
    let layout = renderer.layout(&model);

    match cli.command {
        Commands::Render {
            output,
            hover_year,
            hover_x,
        } => {
            let mut state = HoverState::new();
            if let (Some(year), Some(x)) = (hover_year, hover_x) {
                if state.pointer_move(&layout, &model, year, x).is_none() {
                    tracing::warn!("Offset {} is outside the cell of {}", x, year);
                }
            }
            write_output(output.as_ref(), &renderer.render_with_state(&model, &state))?;
        }

        Commands::Hover { year, x } => {
            let group = model
                .group(year)
                .with_context(|| format!("Year {} not in dataset", year))?;

            match hover(&layout, group, x) {
                Some(result) if cli.format == "json" => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                Some(result) => {
                    println!(
                        "{:<10} | month {:>2} (index {:>2}) | dry {}",
                        result.label, result.month, result.month_index, result.percent_label
                    );
                }
                None => {
                    eprintln!(
                        "Offset {} is outside the cell of {} (width {:.1})",
                        x,
                        year,
                        layout.overlay_width(group)
                    );
                    std::process::exit(1);
                }
            }
        }

        Commands::Summary => {
            let summaries = summarize(&model);
            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                println!(
                    "{:<6} | {:<6} | {:<8} | {:<10} | {:<8}",
                    "Year", "Months", "Mean dry", "Peak month", "Peak dry"
                );
                println!("{}", "-".repeat(50));
                for s in summaries {
                    println!(
                        "{:<6} | {:<6} | {:<8} | {:<10} | {:<8}",
                        s.year,
                        s.months,
                        pct(s.mean_dry),
                        s.peak_month
                            .map(|m| droughtline::model::month_abbrev(m).to_string())
                            .unwrap_or_else(|| "-".to_string()),
                        pct(s.peak_dry)
                    );
                }
            }
        }

        Commands::Export { output } => {
            write_output(output.as_ref(), &serde_json::to_string_pretty(&model)?)?;
        }

        Commands::Config { .. } => unreachable!("handled before loading"),
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("droughtline={}", logging.level)));

    // Logs go to stderr so stdout stays clean for SVG/JSON output
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn write_output(path: Option<&PathBuf>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn pct(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}%", v * 100.0))
        .unwrap_or_else(|| "-".to_string())
}
