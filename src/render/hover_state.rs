//! Mutable hover display state
//!
//! The model and its hover queries are pure. Whatever is currently shown on
//! screen (which year is hovered, where the focus bar sits, what the labels
//! read) lives here and is owned by the rendering side only.

use crate::model::{hover, DroughtModel, GridLayout, HoverResult, YearGroup};
use serde::Serialize;

/// Highlight drawn over the hovered month, in chart-area coordinates
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct FocusBar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Current hover display state
#[derive(Debug, Clone, Default)]
pub struct HoverState {
    active: Option<HoverResult>,
    focus: Option<FocusBar>,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a pointer move over `year`'s cell at local offset `x`
    ///
    /// The latest call replaces whatever was shown before. Moving outside
    /// the year's overlay clears the state.
    pub fn pointer_move(
        &mut self,
        layout: &GridLayout,
        model: &DroughtModel,
        year: i32,
        x: f64,
    ) -> Option<&HoverResult> {
        let Some(group) = model.group(year) else {
            self.pointer_leave();
            return None;
        };

        match hover(layout, group, x) {
            Some(result) => {
                self.focus = focus_bar(layout, group, &result);
                self.active = Some(result);
            }
            None => self.pointer_leave(),
        }
        self.active.as_ref()
    }

    /// Handle the pointer leaving a cell
    pub fn pointer_leave(&mut self) {
        self.active = None;
        self.focus = None;
    }

    pub fn active(&self) -> Option<&HoverResult> {
        self.active.as_ref()
    }

    pub fn focus_bar(&self) -> Option<FocusBar> {
        self.focus
    }

    /// Label under a year cell: the hovered month or just the year
    pub fn year_label(&self, group: &YearGroup) -> String {
        match &self.active {
            Some(result) if result.year == group.year() => result.label.clone(),
            _ => group.year().to_string(),
        }
    }

    /// Percent label above a year cell, only while that year is hovered
    pub fn percent_label(&self, group: &YearGroup) -> Option<(f64, &str)> {
        self.active
            .as_ref()
            .filter(|r| r.year == group.year())
            .map(|r| (r.month_x, r.percent_label.as_str()))
    }
}

fn focus_bar(layout: &GridLayout, group: &YearGroup, result: &HoverResult) -> Option<FocusBar> {
    let (cell_x, cell_y) = layout.cell_origin(group.position()?)?;
    let fraction = result.dry_fraction?;
    let y = layout.fraction_to_y(fraction);

    Some(FocusBar {
        x: cell_x + result.month_x,
        y: cell_y + y,
        width: layout.month_width(),
        height: layout.cell_height() - y,
    })
}
