//! Drought Stream-Chart Data Model
//!
//! This module turns a flat monthly drought table into render-ready data:
//!
//! - **types**: Core data structures (RawRecord, YearGroup, StackFrame)
//! - **normalize**: Parse raw rows into typed records
//! - **stack**: Group by year, add boundary records, stack categories
//! - **grid**: Decade-grid placement and month/fraction coordinates
//! - **hover**: Pointer offset to month and dry share
//! - **error**: Error types
//!
//! # Pipeline
//!
//! ```text
//!   CSV rows → normalize → RawRecord[] → group + stack → DroughtModel
//!                                                         │
//!                       GridLayout ◄──────────────────────┤
//!                           │                             │
//!                pointer x ─┴──────────► hover ◄──────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use droughtline::model::*;
//!
//! let records = vec![RawRecord::new(
//!     2013,
//!     1,
//!     0,
//!     [Some(0.1), Some(0.2), Some(0.26), Some(0.2), Some(0.1), Some(0.1), Some(0.04)],
//! )];
//! let model = DroughtModel::build(records, &ModelOptions::default()).unwrap();
//!
//! let layout = GridLayout::new(&ChartDimensions::default(), model.max_row());
//! let group = model.group(2013).unwrap();
//! let result = hover(&layout, group, layout.month_to_x(1.5)).unwrap();
//! assert_eq!(result.label, "Jan 2013");
//! ```

pub mod error;
pub mod grid;
pub mod hover;
pub mod normalize;
pub mod stack;
pub mod types;

// Re-export commonly used types
pub use error::{ModelError, ModelResult, NormalizeError, NormalizeResult};
pub use grid::{BandScale, ChartDimensions, GridIndex, GridLayout, Margin};
pub use hover::{hover, month_abbrev, percent_label, HoverResult};
pub use normalize::{parse_key, parse_value, Normalized, RecordNormalizer};
pub use stack::{group_by_year, resolve_boundary_year, stack, BOUNDARY_MONTH, TRAILING_MONTH};
pub use types::{
    Band, BoundaryYear, CategoryValues, DroughtModel, GridPosition, IncompletePolicy,
    ModelOptions, RawRecord, Severity, StackFrame, YearGroup, CATEGORY_COUNT, DRY_CATEGORY_COUNT,
    SUM_TOLERANCE,
};
