//! Core data types for the drought stream-chart model
//!
//! This module defines the fundamental types used throughout the model:
//! - `Severity`: The seven fixed drought-severity categories
//! - `RawRecord`: One normalized month of the dataset
//! - `StackFrame` and `Band`: Cumulative category offsets for one month
//! - `YearGroup`: All records of a year plus its stacked series
//! - `DroughtModel`: The immutable result handed to renderers

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of fixed severity categories per month
pub const CATEGORY_COUNT: usize = 7;

/// The first three categories are the "dry" ones summed by hover queries
pub const DRY_CATEGORY_COUNT: usize = 3;

/// Per-category values of one month, `None` where the field was malformed
pub type CategoryValues = [Option<f64>; CATEGORY_COUNT];

/// Slack allowed when checking that a month's categories sum to at most 1
pub const SUM_TOLERANCE: f64 = 1e-6;

/// Drought-severity category, in fixed stacking order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    ExtremeDrought,
    SevereDrought,
    ModerateDrought,
    NearNormal,
    ModeratelyMoist,
    VeryMoist,
    ExtremelyMoist,
}

impl Severity {
    /// All categories in stacking order
    pub fn all() -> &'static [Severity; CATEGORY_COUNT] {
        &[
            Severity::ExtremeDrought,
            Severity::SevereDrought,
            Severity::ModerateDrought,
            Severity::NearNormal,
            Severity::ModeratelyMoist,
            Severity::VeryMoist,
            Severity::ExtremelyMoist,
        ]
    }

    /// Position in the stacking order (also the dataset column name)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Severity> {
        Severity::all().get(index).copied()
    }

    /// Name of the dataset column holding this category
    pub fn column(self) -> String {
        self.index().to_string()
    }

    pub fn is_dry(self) -> bool {
        self.index() < DRY_CATEGORY_COUNT
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::ExtremeDrought => write!(f, "extreme drought"),
            Severity::SevereDrought => write!(f, "severe drought"),
            Severity::ModerateDrought => write!(f, "moderate drought"),
            Severity::NearNormal => write!(f, "near normal"),
            Severity::ModeratelyMoist => write!(f, "moderately moist"),
            Severity::VeryMoist => write!(f, "very moist"),
            Severity::ExtremelyMoist => write!(f, "extremely moist"),
        }
    }
}

/// Placement of a year on the decade grid
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GridPosition {
    /// Last digit of the year
    pub col: u32,
    /// Row index supplied by the dataset
    pub row: u32,
}

impl GridPosition {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// One normalized month of the dataset
///
/// Immutable after normalization; synthetic boundary records are produced
/// with [`RawRecord::with_month`] rather than by mutating a real one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawRecord {
    /// Original `YYYYMM` key
    pub key: String,
    pub year: i32,
    /// Month number, 1-12 for real records (2 or 13 for synthetic ones)
    pub month: u32,
    /// Grid row, `None` where the field was malformed
    pub row: Option<u32>,
    pub col: u32,
    /// Fraction of area per severity category
    pub values: CategoryValues,
}

impl RawRecord {
    /// Create a record from its decomposed key parts
    pub fn new(year: i32, month: u32, row: u32, values: CategoryValues) -> Self {
        Self {
            key: format!("{:04}{:02}", year, month),
            year,
            month,
            row: Some(row),
            col: year.rem_euclid(10) as u32,
            values,
        }
    }

    /// Copy of this record with a different month (used for boundary points)
    pub fn with_month(&self, month: u32) -> Self {
        Self {
            month,
            ..self.clone()
        }
    }

    pub fn value(&self, severity: Severity) -> Option<f64> {
        self.values[severity.index()]
    }

    /// Grid cell, `None` without a usable row
    pub fn position(&self) -> Option<GridPosition> {
        self.row.map(|row| GridPosition::new(self.col, row))
    }

    /// Sum of the dry categories, `None` if any of them is missing
    pub fn dry_fraction(&self) -> Option<f64> {
        self.values[..DRY_CATEGORY_COUNT]
            .iter()
            .try_fold(0.0, |acc, v| v.map(|v| acc + v))
    }

    /// Sum of all categories that carry data
    pub fn total(&self) -> f64 {
        self.values.iter().flatten().sum()
    }

    /// Number of categories whose field failed to parse
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Whether the categories add up to more than the whole area
    pub fn is_overfull(&self) -> bool {
        self.total() > 1.0 + SUM_TOLERANCE
    }
}

/// Vertical extent of one category inside a stack frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
}

impl Band {
    pub fn height(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Cumulative category offsets for one (possibly synthetic) month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StackFrame {
    pub month: u32,
    /// Indexed by [`Severity::index`]; `None` where the value is missing
    pub category_bounds: [Option<Band>; CATEGORY_COUNT],
}

impl StackFrame {
    pub fn band(&self, severity: Severity) -> Option<Band> {
        self.category_bounds[severity.index()]
    }

    /// Highest defined upper bound (the cumulative total of the month)
    pub fn top(&self) -> f64 {
        self.category_bounds
            .iter()
            .flatten()
            .map(|b| b.upper)
            .fold(0.0, f64::max)
    }
}

/// All records of one year together with their stacked series
///
/// Created once by the grouper and never mutated afterwards.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearGroup {
    pub(crate) year: i32,
    pub(crate) records: Vec<RawRecord>,
    pub(crate) real_months: usize,
    pub(crate) boundary: bool,
    pub(crate) stacked_series: Vec<StackFrame>,
}

impl YearGroup {
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Real records followed by the synthetic boundary record
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    /// Only the records present in the dataset
    pub fn real_records(&self) -> &[RawRecord] {
        &self.records[..self.real_months]
    }

    pub fn synthetic_record(&self) -> &RawRecord {
        &self.records[self.real_months]
    }

    pub fn is_boundary(&self) -> bool {
        self.boundary
    }

    pub fn stacked_series(&self) -> &[StackFrame] {
        &self.stacked_series
    }

    /// Grid cell, taken from the first record; `None` if it has no row
    pub fn position(&self) -> Option<GridPosition> {
        self.records[0].position()
    }

    /// Whether the year starts a decade (labelled differently)
    pub fn is_decade(&self) -> bool {
        self.year.rem_euclid(10) == 0
    }
}

/// Which year is treated as the partial boundary year
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "BoundaryYearRepr", into = "BoundaryYearRepr")]
pub enum BoundaryYear {
    /// The first year present in the dataset
    #[default]
    Earliest,
    /// The last year present in the dataset
    Latest,
    /// An explicit year
    Year(i32),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum BoundaryYearRepr {
    Year(i32),
    Named(String),
}

impl TryFrom<BoundaryYearRepr> for BoundaryYear {
    type Error = String;

    fn try_from(repr: BoundaryYearRepr) -> Result<Self, Self::Error> {
        match repr {
            BoundaryYearRepr::Year(year) => Ok(BoundaryYear::Year(year)),
            BoundaryYearRepr::Named(name) => name.parse(),
        }
    }
}

impl From<BoundaryYear> for BoundaryYearRepr {
    fn from(boundary: BoundaryYear) -> Self {
        match boundary {
            BoundaryYear::Year(year) => BoundaryYearRepr::Year(year),
            other => BoundaryYearRepr::Named(other.to_string()),
        }
    }
}

impl FromStr for BoundaryYear {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "earliest" | "first" => Ok(BoundaryYear::Earliest),
            "latest" | "last" => Ok(BoundaryYear::Latest),
            other => other
                .parse::<i32>()
                .map(BoundaryYear::Year)
                .map_err(|_| format!("Invalid boundary year: {}", s)),
        }
    }
}

impl std::fmt::Display for BoundaryYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryYear::Earliest => write!(f, "earliest"),
            BoundaryYear::Latest => write!(f, "latest"),
            BoundaryYear::Year(year) => write!(f, "{}", year),
        }
    }
}

/// What to do with a regular year that lacks some months
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IncompletePolicy {
    /// Fail the whole model build
    #[default]
    Reject,
    /// Drop the year and keep going
    Skip,
}

impl FromStr for IncompletePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(IncompletePolicy::Reject),
            "skip" => Ok(IncompletePolicy::Skip),
            _ => Err(format!("Invalid incomplete-year policy: {}", s)),
        }
    }
}

/// Options controlling how records are grouped into years
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ModelOptions {
    #[serde(default)]
    pub boundary_year: BoundaryYear,
    #[serde(default)]
    pub incomplete_years: IncompletePolicy,
}

/// The immutable drought model consumed by renderers
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DroughtModel {
    pub(crate) groups: Vec<YearGroup>,
    pub(crate) max_row: u32,
    pub(crate) boundary_year: i32,
    pub(crate) overfull_months: usize,
}

impl DroughtModel {
    /// Year groups in first-seen order
    pub fn groups(&self) -> &[YearGroup] {
        &self.groups
    }

    pub fn group(&self, year: i32) -> Option<&YearGroup> {
        self.groups.iter().find(|g| g.year == year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.groups.iter().map(|g| g.year)
    }

    pub fn max_row(&self) -> u32 {
        self.max_row
    }

    pub fn boundary_year(&self) -> i32 {
        self.boundary_year
    }

    /// Months whose categories sum to more than 1
    pub fn overfull_months(&self) -> usize {
        self.overfull_months
    }

    pub fn boundary_group(&self) -> Option<&YearGroup> {
        self.group(self.boundary_year)
    }
}
