//! Rendering Adapter
//!
//! Consumes the immutable [`DroughtModel`](crate::model::DroughtModel) and
//! owns all display state:
//! - `svg`: static SVG document of the whole chart
//! - `hover_state`: focus bar and labels for the current pointer position

mod hover_state;
mod svg;

pub use hover_state::{FocusBar, HoverState};
pub use svg::{area_path, SvgRenderer};
