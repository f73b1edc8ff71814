//! Pure math/data for drawing the hello-stroke glyph.
//!
//! This crate contains geometry primitives, color definitions, brushes, and
//! the path/arc-length machinery behind the trim reveal. It has no
//! dependencies and knows nothing about runtimes or renderers.

mod brush;
mod color;
mod geometry;
mod path;

pub use brush::*;
pub use color::*;
pub use geometry::*;
pub use path::*;

pub mod prelude {
    pub use crate::brush::{Brush, GradientStop};
    pub use crate::color::Color;
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::path::{LineCap, LineJoin, Path, PathMeasure, StrokeStyle};
}
