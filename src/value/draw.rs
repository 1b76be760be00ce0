use super::ImageValue;
use crate::error::{ImageError, Result};
use img_geometry::{Pixel, Polygon, Rectangle};

/// Overlay drawing on an image. Each call returns a new image.
///
/// No backend draws yet; every method fails with
/// [`ImageError::NotImplemented`].
pub trait Draw: Sized {
    fn draw_pixel(&self, pixel: Pixel) -> Result<Self>;

    fn draw_rectangle(&self, rectangle: &Rectangle) -> Result<Self>;

    fn draw_polygon(&self, polygon: &Polygon) -> Result<Self>;

    fn draw_text(&self, origin: Pixel, text: &str) -> Result<Self>;
}

impl Draw for ImageValue {
    fn draw_pixel(&self, _pixel: Pixel) -> Result<Self> {
        Err(ImageError::NotImplemented("draw_pixel"))
    }

    fn draw_rectangle(&self, _rectangle: &Rectangle) -> Result<Self> {
        Err(ImageError::NotImplemented("draw_rectangle"))
    }

    fn draw_polygon(&self, _polygon: &Polygon) -> Result<Self> {
        Err(ImageError::NotImplemented("draw_polygon"))
    }

    fn draw_text(&self, _origin: Pixel, _text: &str) -> Result<Self> {
        Err(ImageError::NotImplemented("draw_text"))
    }
}
