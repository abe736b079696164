//! Static SVG output
//!
//! Draws one group per year on the decade grid. Each group holds a step
//! area per severity category, the year label, a hidden percent label and
//! the transparent overlay used for pointer tracking. Missing category
//! values break the area into separate sub-paths instead of being drawn
//! as zero.

use super::hover_state::HoverState;
use crate::model::{
    month_abbrev, ChartDimensions, DroughtModel, GridLayout, Severity, StackFrame, YearGroup,
};
use std::fmt::Write;

/// Writes the drought model as an SVG document
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    dimensions: ChartDimensions,
    annotate_boundary: bool,
}

impl SvgRenderer {
    pub fn new(dimensions: ChartDimensions) -> Self {
        Self {
            dimensions,
            annotate_boundary: true,
        }
    }

    /// Builder method: toggle the boundary-year annotation
    pub fn annotate_boundary(mut self, enabled: bool) -> Self {
        self.annotate_boundary = enabled;
        self
    }

    pub fn layout(&self, model: &DroughtModel) -> GridLayout {
        GridLayout::for_model(&self.dimensions, model)
    }

    /// Render without any hover state
    pub fn render(&self, model: &DroughtModel) -> String {
        self.render_with_state(model, &HoverState::new())
    }

    /// Render, reflecting the current hover state in labels and focus bar
    pub fn render_with_state(&self, model: &DroughtModel, state: &HoverState) -> String {
        let layout = self.layout(model);
        let margin = self.dimensions.margin;
        let mut out = String::new();

        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            fmt_num(self.dimensions.width),
            fmt_num(self.dimensions.height)
        );
        let _ = writeln!(
            out,
            r#"<g transform="translate({},{})">"#,
            fmt_num(margin.left),
            fmt_num(margin.top)
        );
        out.push_str("<g class=\"chart\">\n");

        for group in model.groups() {
            self.write_year_group(&mut out, &layout, group, state);
        }

        out.push_str("</g>\n");

        match state.focus_bar() {
            Some(bar) => {
                let _ = writeln!(
                    out,
                    r#"<rect class="focus-bar" x="{}" y="{}" width="{}" height="{}"/>"#,
                    fmt_num(bar.x),
                    fmt_num(bar.y),
                    fmt_num(bar.width),
                    fmt_num(bar.height)
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    r#"<rect class="focus-bar" width="{}" style="display: none"/>"#,
                    fmt_num(layout.month_width())
                );
            }
        }

        out.push_str("</g>\n</svg>\n");
        out
    }

    fn write_year_group(
        &self,
        out: &mut String,
        layout: &GridLayout,
        group: &YearGroup,
        state: &HoverState,
    ) {
        let Some((x, y)) = group.position().and_then(|cell| layout.cell_origin(cell)) else {
            tracing::warn!("Year {} has no grid cell, not drawn", group.year());
            return;
        };

        let _ = writeln!(
            out,
            r#"<g class="year-group" transform="translate({},{})">"#,
            fmt_num(x),
            fmt_num(y)
        );

        let class = if group.is_decade() {
            "year-label decade"
        } else {
            "year-label"
        };
        let _ = writeln!(
            out,
            r#"<text class="{}" y="{}" dy="0.35em">{}</text>"#,
            class,
            fmt_num(layout.cell_height() + 10.0),
            escape(&state.year_label(group))
        );

        for severity in Severity::all() {
            let d = area_path(layout, group.stacked_series(), *severity);
            if d.is_empty() {
                continue;
            }
            let _ = writeln!(
                out,
                r#"<path class="year-area cat-{}" d="{}"/>"#,
                severity.index(),
                d
            );
        }

        match state.percent_label(group) {
            Some((label_x, text)) => {
                let _ = writeln!(
                    out,
                    r#"<text class="percent-label" x="{}" y="-8" dy="0.35em">{}</text>"#,
                    fmt_num(label_x),
                    escape(text)
                );
            }
            None => {
                out.push_str(
                    "<text class=\"percent-label\" y=\"-8\" dy=\"0.35em\" style=\"display: none\"></text>\n",
                );
            }
        }

        let _ = writeln!(
            out,
            r#"<rect class="year-overlay" width="{}" height="{}" fill="none" pointer-events="all"/>"#,
            fmt_num(layout.overlay_width(group)),
            fmt_num(layout.cell_height())
        );

        if group.is_boundary() && self.annotate_boundary {
            write_annotation(out, layout, group);
        }

        out.push_str("</g>\n");
    }
}

fn write_annotation(out: &mut String, layout: &GridLayout, group: &YearGroup) {
    let record = &group.real_records()[0];
    let Some(dry) = record.dry_fraction() else {
        return;
    };

    let slot = layout.month_width();
    let mid = layout.cell_height() / 2.0;
    let _ = writeln!(
        out,
        r#"<line class="annotation-line" x1="{}" x2="{}" y1="{}" y2="{}"/>"#,
        fmt_num(slot),
        fmt_num(slot + 10.0),
        fmt_num(mid),
        fmt_num(mid)
    );
    let _ = writeln!(
        out,
        r#"<text class="annotation" x="{}" y="{}" dy="0.35em">{}</text>"#,
        fmt_num(slot + 14.0),
        fmt_num(mid),
        escape(&format!(
            "During {} {}, {}% of the area was in moderate to extreme drought.",
            month_abbrev(record.month),
            group.year(),
            (dry * 100.0).round()
        ))
    );
}

/// Step-after area for one category across a year's frames
///
/// Each run of frames with a defined band becomes one closed sub-path:
/// the upper edge is drawn left to right, each value holding until the
/// next month, then the lower edge right to left.
pub fn area_path(layout: &GridLayout, frames: &[StackFrame], severity: Severity) -> String {
    let mut d = String::new();
    let mut run: Vec<(f64, f64, f64)> = Vec::new();

    for frame in frames {
        match frame.band(severity) {
            Some(band) => run.push((
                layout.month_to_x(frame.month as f64),
                layout.fraction_to_y(band.lower),
                layout.fraction_to_y(band.upper),
            )),
            None => flush_run(&mut d, &mut run),
        }
    }
    flush_run(&mut d, &mut run);
    d
}

fn flush_run(d: &mut String, run: &mut Vec<(f64, f64, f64)>) {
    if run.is_empty() {
        return;
    }

    let (x0, _, top0) = run[0];
    let _ = write!(d, "M{},{}", fmt_num(x0), fmt_num(top0));
    for pair in run.windows(2) {
        let (_, _, prev_top) = pair[0];
        let (x, _, top) = pair[1];
        let _ = write!(d, "L{},{}L{},{}", fmt_num(x), fmt_num(prev_top), fmt_num(x), fmt_num(top));
    }

    let (x_last, bottom_last, _) = run[run.len() - 1];
    let _ = write!(d, "L{},{}", fmt_num(x_last), fmt_num(bottom_last));
    for pair in run.windows(2).rev() {
        let (x, bottom, _) = pair[0];
        let (next_x, _, _) = pair[1];
        let _ = write!(d, "L{},{}L{},{}", fmt_num(next_x), fmt_num(bottom), fmt_num(x), fmt_num(bottom));
    }
    d.push('Z');
    run.clear();
}

/// Two decimals, trailing zeros trimmed
fn fmt_num(value: f64) -> String {
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
