use super::{ImageValue, Storage};
use crate::codec::buffer;
use crate::error::{ImageError, Result};
use crate::models::Resampling;
use image::imageops::FilterType;
use img_geometry::Rectangle;
use ndarray::s;

impl ImageValue {
    /// Cut out `rect` (inclusive corners).
    ///
    /// For buffers, `copy = false` yields a view sharing the parent's storage;
    /// with layout normalization on, that view is then copied into row-major
    /// order like any other non-contiguous buffer. Image objects can only be
    /// cropped by copying, so `copy = false` is refused for them.
    pub fn crop(&self, rect: &Rectangle, copy: bool) -> Result<ImageValue> {
        if !rect.fits_within(self.size) {
            return Err(ImageError::CropOutOfBounds {
                rect: *rect,
                size: self.size,
            });
        }
        let (x0, y0) = (rect.x0() as usize, rect.y0() as usize);
        let (x1, y1) = (rect.x1() as usize, rect.y1() as usize);

        let cut = |b: &buffer::PixelBuffer| {
            let view = b.clone().slice_move(s![y0..=y1, x0..=x1, ..]);
            if copy {
                buffer::contiguous_copy(&view)
            } else {
                view
            }
        };

        let storage = match &self.storage {
            Storage::Bgr(b) => Storage::Bgr(cut(b)),
            Storage::Rgb(b) => Storage::Rgb(cut(b)),
            Storage::Object(image) => {
                if !copy {
                    return Err(ImageError::UnsupportedOption(
                        "image objects can only be cropped with copy = true".into(),
                    ));
                }
                Storage::Object(image.crop_imm(rect.x0(), rect.y0(), rect.width(), rect.height()))
            }
        };

        tracing::debug!(%rect, copy, representation = %self.representation(), "Cropped image");
        Ok(ImageValue::assemble(
            storage,
            self.metadata.clone(),
            self.normalize_layout,
        ))
    }

    /// Resize to exactly `width` x `height` with the default (bilinear) filter.
    pub fn resize(&self, width: u32, height: u32) -> Result<ImageValue> {
        self.resize_with(width, height, Resampling::default())
    }

    /// Resize to exactly `width` x `height`, keeping the representation.
    pub fn resize_with(&self, width: u32, height: u32, filter: Resampling) -> Result<ImageValue> {
        if width == 0 || height == 0 {
            return Err(ImageError::UnsupportedOption(format!(
                "cannot resize to {}x{}",
                width, height
            )));
        }
        let filter: FilterType = filter.into();

        // Resampling treats channels independently, so buffer channel order
        // does not matter here.
        let storage = match &self.storage {
            Storage::Bgr(b) => Storage::Bgr(buffer::resize(b, width, height, filter)?),
            Storage::Rgb(b) => Storage::Rgb(buffer::resize(b, width, height, filter)?),
            Storage::Object(image) => Storage::Object(image.resize_exact(width, height, filter)),
        };

        tracing::debug!(
            from = %self.size,
            width,
            height,
            ?filter,
            "Resized image"
        );
        Ok(ImageValue::assemble(
            storage,
            self.metadata.clone(),
            self.normalize_layout,
        ))
    }
}
