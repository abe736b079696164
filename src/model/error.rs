//! Data model error types
//!
//! Defines all errors that can occur while grouping, stacking and placing
//! year groups on the decade grid.

use thiserror::Error;

/// Errors that can occur while building the drought model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A year group was constructed without any real records
    #[error("Degenerate year group: year {0} has no records")]
    DegenerateYearGroup(i32),

    /// A regular year does not cover all twelve months
    #[error("Incomplete year {year}: expected 12 months, found {months}")]
    IncompleteYear { year: i32, months: usize },

    /// The same month appears more than once within a year
    #[error("Duplicate month {month} in year {year}")]
    DuplicateMonth { year: i32, month: u32 },

    /// The boundary year must consist of a single real month
    #[error("Boundary year {year} must have exactly one record, found {records}")]
    BoundaryYearShape { year: i32, records: usize },

    /// An explicitly configured boundary year is absent from the dataset
    #[error("Boundary year {0} not present in dataset")]
    UnknownBoundaryYear(i32),

    /// Two years were placed on the same grid cell
    #[error("Grid cell (col {col}, row {row}) claimed by both {first} and {second}")]
    CellCollision {
        col: u32,
        row: u32,
        first: i32,
        second: i32,
    },

    /// The dataset contains no records at all
    #[error("Dataset is empty")]
    EmptyDataset,
}

/// Structural problems in the tabular input that make a row unusable
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// A required column is absent from the header
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// The key is not a `YYYYMM` string with month 1-12
    #[error("Line {line}: invalid key {key:?}")]
    InvalidKey { line: usize, key: String },
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// Result type alias for normalization
pub type NormalizeResult<T> = Result<T, NormalizeError>;
