//! Points, rectangles and polygons on the pixel grid.

use crate::{GeometryError, Size};

/// A single pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel {
    pub x: u32,
    pub y: u32,
}

impl Pixel {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn is_inside(&self, size: Size) -> bool {
        self.x < size.width && self.y < size.height
    }
}

/// Axis-aligned rectangle with inclusive corners `(x0, y0)` and `(x1, y1)`.
///
/// The constructor guarantees `x0 <= x1` and `y0 <= y1`, so width and height
/// are always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Rectangle {
    /// Build a rectangle from its top-left and bottom-right corners (inclusive).
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Result<Self, GeometryError> {
        if x1 < x0 || y1 < y0 {
            return Err(GeometryError::InvertedRectangle { x0, y0, x1, y1 });
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    /// Build a rectangle from its top-left corner and extent.
    pub fn from_origin_size(origin: Pixel, size: Size) -> Result<Self, GeometryError> {
        if size.is_empty() {
            return Err(GeometryError::EmptyRectangle);
        }
        Self::new(
            origin.x,
            origin.y,
            origin.x.saturating_add(size.width - 1),
            origin.y.saturating_add(size.height - 1),
        )
    }

    pub fn x0(&self) -> u32 {
        self.x0
    }

    pub fn y0(&self) -> u32 {
        self.y0
    }

    pub fn x1(&self) -> u32 {
        self.x1
    }

    pub fn y1(&self) -> u32 {
        self.y1
    }

    pub fn top_left(&self) -> Pixel {
        Pixel::new(self.x0, self.y0)
    }

    pub fn bottom_right(&self) -> Pixel {
        Pixel::new(self.x1, self.y1)
    }

    pub fn width(&self) -> u32 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0 + 1
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// True when every covered pixel lies inside an image of `size`.
    pub fn fits_within(&self, size: Size) -> bool {
        self.bottom_right().is_inside(size)
    }

    pub fn contains(&self, pixel: Pixel) -> bool {
        (self.x0..=self.x1).contains(&pixel.x) && (self.y0..=self.y1).contains(&pixel.y)
    }
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {})..=({}, {})",
            self.x0, self.y0, self.x1, self.y1
        )
    }
}

/// Closed polygon given by its vertices in drawing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polygon {
    vertices: Vec<Pixel>,
}

impl Polygon {
    pub fn new(vertices: Vec<Pixel>) -> Result<Self, GeometryError> {
        if vertices.len() < 3 {
            return Err(GeometryError::DegeneratePolygon {
                vertices: vertices.len(),
            });
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Pixel] {
        &self.vertices
    }

    /// Smallest rectangle covering every vertex.
    pub fn bounding_box(&self) -> Rectangle {
        let (mut x0, mut y0, mut x1, mut y1) = (u32::MAX, u32::MAX, 0, 0);
        for v in &self.vertices {
            x0 = x0.min(v.x);
            y0 = y0.min(v.y);
            x1 = x1.max(v.x);
            y1 = y1.max(v.y);
        }
        Rectangle { x0, y0, x1, y1 }
    }
}
