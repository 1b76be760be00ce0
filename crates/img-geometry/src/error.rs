//! Geometry validation errors.

use std::fmt;

/// Error returned when a shape cannot be built from the given coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The second corner lies left of or above the first one.
    InvertedRectangle {
        x0: u32,
        y0: u32,
        x1: u32,
        y1: u32,
    },
    /// A rectangle of zero width or height was requested.
    EmptyRectangle,
    /// A polygon needs at least three vertices.
    DegeneratePolygon { vertices: usize },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InvertedRectangle { x0, y0, x1, y1 } => write!(
                f,
                "rectangle corner ({}, {}) lies before ({}, {})",
                x1, y1, x0, y0
            ),
            GeometryError::EmptyRectangle => write!(f, "rectangle has no area"),
            GeometryError::DegeneratePolygon { vertices } => {
                write!(f, "polygon needs at least 3 vertices, got {}", vertices)
            }
        }
    }
}

impl std::error::Error for GeometryError {}
