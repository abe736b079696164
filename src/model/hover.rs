//! Hover queries
//!
//! Resolves a pointer offset inside a year's cell to a month and the share
//! of area in the dry categories for that month. Each query is a pure
//! function of the year group, the layout and the offset; nothing is
//! remembered between calls.

use super::grid::{GridLayout, FIRST_MONTH, LAST_MONTH};
use super::types::{Severity, YearGroup, DRY_CATEGORY_COUNT};
use chrono::Month;
use serde::Serialize;

/// Answer to a hover query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HoverResult {
    pub year: i32,
    /// Zero-based index into the real records of the year
    pub month_index: usize,
    /// Month number of the resolved record
    pub month: u32,
    /// e.g. `"Jan 2013"`
    pub label: String,
    /// Sum of the dry categories, `None` if one of them has no data
    pub dry_fraction: Option<f64>,
    /// Rounded percentage, e.g. `"56%"`
    pub percent_label: String,
    /// Left edge of the resolved month slot
    pub month_x: f64,
}

/// Resolve a horizontal offset inside the year's cell
///
/// Returns `None` when the offset lies outside the year's overlay.
pub fn hover(layout: &GridLayout, group: &YearGroup, x: f64) -> Option<HoverResult> {
    if !(0.0..=layout.overlay_width(group)).contains(&x) {
        return None;
    }

    let estimate = layout.x_to_month(x).min(LAST_MONTH);
    let last_index = group.real_records().len().saturating_sub(1);
    let month_index = ((estimate - FIRST_MONTH).floor().max(0.0) as usize).min(last_index);

    let record = &group.real_records()[month_index];
    let dry_fraction = stacked_dry_fraction(group, month_index);

    Some(HoverResult {
        year: group.year(),
        month_index,
        month: record.month,
        label: format!("{} {}", month_abbrev(record.month), group.year()),
        dry_fraction,
        percent_label: percent_label(dry_fraction),
        month_x: layout.month_to_x(FIRST_MONTH + month_index as f64),
    })
}

/// Dry share read from the stacked series: the upper bound of the last dry band
fn stacked_dry_fraction(group: &YearGroup, month_index: usize) -> Option<f64> {
    let frame = group.stacked_series().get(month_index)?;
    Severity::all()[..DRY_CATEGORY_COUNT]
        .iter()
        .try_fold(0.0, |_, severity| frame.band(*severity).map(|b| b.upper))
}

/// Three-letter English month name
pub fn month_abbrev(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| &m.name()[..3])
        .unwrap_or("???")
}

pub fn percent_label(fraction: Option<f64>) -> String {
    match fraction {
        Some(f) => format!("{}%", (f * 100.0).round()),
        None => "n/a".to_string(),
    }
}
