//! img-geometry: pixel-space geometry for image values
//!
//! Integer coordinates on the pixel grid, with `x` growing to the right and
//! `y` growing downwards. Rectangles are inclusive on both corners, so a
//! rectangle from `(0, 0)` to `(0, 0)` covers exactly one pixel.
//!
//! ```
//! use img_geometry::{Rectangle, Size};
//!
//! let rect = Rectangle::new(2, 1, 5, 3).unwrap();
//! assert_eq!(rect.width(), 4);
//! assert_eq!(rect.height(), 3);
//! assert!(rect.fits_within(Size::new(6, 4)));
//! ```

mod error;
mod shape;
mod size;

pub use error::GeometryError;
pub use shape::{Pixel, Polygon, Rectangle};
pub use size::Size;
