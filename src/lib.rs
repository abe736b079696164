//! # Droughtline
//!
//! Drought stream-chart data model - turns a monthly drought-severity table
//! into stacked, grid-addressable year groups, answers pointer hover
//! queries, and renders the result as an SVG timeline heatmap.
//!
//! ## Features
//!
//! - **Tolerant normalization**: malformed category fields become "no data"
//! - **Year stacking**: boundary records and cumulative category bands
//! - **Decade grid**: pure year/month/fraction coordinate mapping
//! - **Hover queries**: pointer offset to month and dry-area share
//!
//! ## Modules
//!
//! - [`model`]: Normalizer, grouper/stacker, grid mapper, hover engine
//! - [`loader`]: Single asynchronous dataset fetch (file or HTTP)
//! - [`render`]: SVG output and hover display state
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use droughtline::loader::{load_dataset, source_for};
//! use droughtline::model::*;
//! use droughtline::render::SvgRenderer;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load once
//!     let source = source_for("data/pdsi.csv");
//!     let normalized = load_dataset(source.as_ref()).await?;
//!
//!     // Build the immutable model
//!     let options = ModelOptions {
//!         boundary_year: BoundaryYear::Latest,
//!         ..Default::default()
//!     };
//!     let model = DroughtModel::build(normalized.records, &options)?;
//!
//!     // Query and render
//!     let renderer = SvgRenderer::new(ChartDimensions::default());
//!     let layout = renderer.layout(&model);
//!     if let Some(group) = model.group(2013) {
//!         println!("{:?}", hover(&layout, group, 1.0));
//!     }
//!     std::fs::write("chart.svg", renderer.render(&model))?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod loader;
pub mod model;
pub mod render;
pub mod summary;

// Re-export top-level types for convenience
pub use model::{
    hover, BoundaryYear, ChartDimensions, DroughtModel, GridLayout, GridPosition, HoverResult,
    IncompletePolicy, ModelError, ModelOptions, ModelResult, RawRecord, Severity, StackFrame,
    YearGroup,
};

pub use loader::{load_dataset, source_for, DatasetSource, FileSource, HttpSource, LoadError};

pub use render::{FocusBar, HoverState, SvgRenderer};

pub use config::{generate_default_config, Config, ConfigError, LoggingConfig};

pub use summary::{summarize, YearSummary};
