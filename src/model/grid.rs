//! Grid coordinate mapping
//!
//! Places every year group on a decade grid (one column per last digit of
//! the year, one row per dataset row) and maps months and stacked fractions
//! to offsets inside a cell. All functions here are pure; they know nothing
//! about how the chart is finally drawn.
//!
//! # Layout
//!
//! ```text
//!   col 0   col 1   ...   col 9
//! +-------+-------+     +-------+   row 0
//! | 1900  | 1901  | ... | 1909  |
//! +-------+-------+     +-------+
//!            (row gap)
//! +-------+-------+     +-------+   row 1
//! | 1910  | 1911  | ... | 1919  |
//! ```
//!
//! Inside a cell the x axis runs from month 1 (left edge) to month 13
//! (right edge) and the y axis from fraction 1 (top) to fraction 0 (bottom).

use super::error::{ModelError, ModelResult};
use super::types::{DroughtModel, GridPosition, YearGroup};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of grid columns (one per decimal digit)
pub const GRID_COLUMNS: usize = 10;

/// Months covered by one cell width
pub const MONTH_SLOTS: f64 = 12.0;

/// Month at the left edge of a cell
pub const FIRST_MONTH: f64 = 1.0;

/// Month at the right edge of a cell
pub const LAST_EDGE_MONTH: f64 = 13.0;

/// Highest month a hover query may resolve to
pub const LAST_MONTH: f64 = 12.0;

const COLUMN_PADDING: f64 = 0.01;
const ROW_PADDING: f64 = 0.5;

/// Space around the chart area
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 20.0,
            bottom: 20.0,
            left: 10.0,
        }
    }
}

/// Outer size of the chart
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChartDimensions {
    #[serde(default = "default_container_size")]
    pub width: f64,
    #[serde(default = "default_container_size")]
    pub height: f64,
    #[serde(default)]
    pub margin: Margin,
}

fn default_container_size() -> f64 {
    1100.0
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self {
            width: default_container_size(),
            height: default_container_size(),
            margin: Margin::default(),
        }
    }
}

impl ChartDimensions {
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }
}

/// Evenly spaced bands with inner padding and no outer padding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    step: f64,
    padding_inner: f64,
}

impl BandScale {
    pub fn new(count: usize, range: f64, padding_inner: f64) -> Self {
        let span = (count as f64 - padding_inner).max(1.0);
        Self {
            count,
            step: range / span,
            padding_inner,
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn bandwidth(&self) -> f64 {
        self.step * (1.0 - self.padding_inner)
    }

    /// Start offset of band `index`, `None` outside the domain
    pub fn position(&self, index: usize) -> Option<f64> {
        (index < self.count).then(|| self.step * index as f64)
    }
}

/// Geometry of the decade grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    columns: BandScale,
    rows: BandScale,
}

impl GridLayout {
    /// Layout for a grid with rows `0..=max_row`
    pub fn new(dimensions: &ChartDimensions, max_row: u32) -> Self {
        Self {
            columns: BandScale::new(GRID_COLUMNS, dimensions.inner_width(), COLUMN_PADDING),
            rows: BandScale::new(max_row as usize + 1, dimensions.inner_height(), ROW_PADDING),
        }
    }

    pub fn for_model(dimensions: &ChartDimensions, model: &DroughtModel) -> Self {
        Self::new(dimensions, model.max_row())
    }

    pub fn cell_width(&self) -> f64 {
        self.columns.bandwidth()
    }

    pub fn cell_height(&self) -> f64 {
        self.rows.bandwidth()
    }

    /// Width of one month slot
    pub fn month_width(&self) -> f64 {
        self.cell_width() / MONTH_SLOTS
    }

    /// Top-left corner of a cell relative to the chart area
    pub fn cell_origin(&self, cell: GridPosition) -> Option<(f64, f64)> {
        Some((
            self.columns.position(cell.col as usize)?,
            self.rows.position(cell.row as usize)?,
        ))
    }

    /// Horizontal offset of a (possibly fractional) month inside a cell
    pub fn month_to_x(&self, month: f64) -> f64 {
        (month - FIRST_MONTH) / (LAST_EDGE_MONTH - FIRST_MONTH) * self.cell_width()
    }

    /// Continuous month estimate for a horizontal offset inside a cell
    pub fn x_to_month(&self, x: f64) -> f64 {
        let width = self.cell_width();
        if width <= 0.0 {
            return FIRST_MONTH;
        }
        FIRST_MONTH + x / width * (LAST_EDGE_MONTH - FIRST_MONTH)
    }

    /// Vertical offset of a stacked fraction inside a cell (0 at the bottom)
    pub fn fraction_to_y(&self, fraction: f64) -> f64 {
        (1.0 - fraction) * self.cell_height()
    }

    /// Width of the pointer-sensitive area of a year
    ///
    /// The boundary year only covers its single month slot.
    pub fn overlay_width(&self, group: &YearGroup) -> f64 {
        if group.is_boundary() {
            self.month_width()
        } else {
            self.cell_width()
        }
    }
}

/// Lookup from year to grid cell
#[derive(Debug, Clone, Default)]
pub struct GridIndex {
    cells: HashMap<i32, GridPosition>,
}

impl GridIndex {
    /// Index the groups, failing if two of them share a cell
    ///
    /// Groups without a grid row are left out.
    pub fn new(groups: &[YearGroup]) -> ModelResult<Self> {
        let mut cells = HashMap::with_capacity(groups.len());
        let mut occupied: HashMap<GridPosition, i32> = HashMap::with_capacity(groups.len());

        for group in groups {
            let Some(cell) = group.position() else {
                continue;
            };
            if let Some(&first) = occupied.get(&cell) {
                return Err(ModelError::CellCollision {
                    col: cell.col,
                    row: cell.row,
                    first,
                    second: group.year(),
                });
            }
            occupied.insert(cell, group.year());
            cells.insert(group.year(), cell);
        }

        Ok(Self { cells })
    }

    pub fn year_to_cell(&self, year: i32) -> Option<GridPosition> {
        self.cells.get(&year).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl DroughtModel {
    /// Grid cell of a year, taken from its first record
    pub fn year_to_cell(&self, year: i32) -> Option<GridPosition> {
        self.group(year).and_then(YearGroup::position)
    }
}
