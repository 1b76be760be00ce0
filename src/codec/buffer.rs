//! ndarray pixel buffers: layout checks, channel order and the array codec.
//!
//! Buffers are `height x width x channel` arrays of 8-bit samples. The array
//! codec reads and writes blue-first channel order, the way most capture and
//! vision pipelines hand frames around.

use crate::error::{ImageError, Result};
use crate::models::EncoderOptions;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use ndarray::{ArcArray, Array3, Axis, Ix3};
use std::path::Path;

/// Shared, copy-on-write pixel array.
pub type PixelBuffer = ArcArray<u8, Ix3>;

/// Anything that can become a [`PixelBuffer`] without copying.
pub trait IntoPixelBuffer {
    fn into_pixel_buffer(self) -> PixelBuffer;
}

impl IntoPixelBuffer for PixelBuffer {
    fn into_pixel_buffer(self) -> PixelBuffer {
        self
    }
}

impl IntoPixelBuffer for Array3<u8> {
    fn into_pixel_buffer(self) -> PixelBuffer {
        self.into_shared()
    }
}

/// True when the buffer occupies one unbroken row-major block.
pub fn is_contiguous(buffer: &PixelBuffer) -> bool {
    buffer.is_standard_layout()
}

/// Copy into a fresh row-major block, even if the input already is one.
pub fn contiguous_copy(buffer: &PixelBuffer) -> PixelBuffer {
    buffer.as_standard_layout().into_owned().into_shared()
}

/// Return the buffer itself when already contiguous, a row-major copy otherwise.
pub fn normalize(buffer: PixelBuffer) -> PixelBuffer {
    if is_contiguous(&buffer) {
        buffer
    } else {
        contiguous_copy(&buffer)
    }
}

/// Swap channels 0 and 2, leaving the rest alone.
///
/// Gray and gray+alpha buffers carry no colour order and come back unchanged
/// (as a row-major copy).
pub fn swap_red_blue(buffer: &PixelBuffer) -> PixelBuffer {
    if buffer.dim().2 < 3 {
        return contiguous_copy(buffer);
    }
    Array3::from_shape_fn(buffer.dim(), |(y, x, c)| {
        let source = match c {
            0 => 2,
            2 => 0,
            other => other,
        };
        buffer[[y, x, source]]
    })
    .into_shared()
}

/// Build a row-major buffer from interleaved samples.
pub fn from_raw(height: usize, width: usize, channels: usize, raw: Vec<u8>) -> Result<PixelBuffer> {
    Array3::from_shape_vec((height, width, channels), raw)
        .map(|array| array.into_shared())
        .map_err(|e| ImageError::InvalidBuffer(e.to_string()))
}

/// Wrap a red-first buffer in an image object. Channel count picks the
/// object's colour type: 1 gray, 2 gray+alpha, 3 RGB, 4 RGBA.
pub fn to_object(buffer: &PixelBuffer) -> Result<DynamicImage> {
    object_from(buffer, false)
}

/// Wrap a blue-first buffer in an image object, reordering channels on the way.
pub fn bgr_to_object(buffer: &PixelBuffer) -> Result<DynamicImage> {
    object_from(buffer, true)
}

fn object_from(buffer: &PixelBuffer, swap: bool) -> Result<DynamicImage> {
    let (height, width, channels) = buffer.dim();
    let (w, h) = (width as u32, height as u32);
    // `iter` walks in logical order, whatever the memory layout.
    let mut raw: Vec<u8> = buffer.iter().copied().collect();
    if swap && channels >= 3 {
        for pixel in raw.chunks_exact_mut(channels) {
            pixel.swap(0, 2);
        }
    }
    let image = match channels {
        1 => GrayImage::from_raw(w, h, raw).map(DynamicImage::ImageLuma8),
        2 => GrayAlphaImage::from_raw(w, h, raw).map(DynamicImage::ImageLumaA8),
        3 => RgbImage::from_raw(w, h, raw).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(w, h, raw).map(DynamicImage::ImageRgba8),
        _ => {
            return Err(ImageError::UnsupportedChannels {
                operation: "image object conversion",
                channels,
            })
        }
    };
    image.ok_or_else(|| {
        ImageError::InvalidBuffer(format!("{}x{}x{} samples do not fit", height, width, channels))
    })
}

/// Flatten an image object into a red-first buffer.
///
/// 8-bit objects keep their channel count; deeper objects are reduced to
/// 8-bit RGB, or RGBA when they carry alpha.
pub fn from_object(image: &DynamicImage) -> Result<PixelBuffer> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let (channels, raw) = match image {
        DynamicImage::ImageLuma8(b) => (1, b.as_raw().clone()),
        DynamicImage::ImageLumaA8(b) => (2, b.as_raw().clone()),
        DynamicImage::ImageRgb8(b) => (3, b.as_raw().clone()),
        DynamicImage::ImageRgba8(b) => (4, b.as_raw().clone()),
        other if other.color().has_alpha() => (4, other.to_rgba8().into_raw()),
        other => (3, other.to_rgb8().into_raw()),
    };
    from_raw(height, width, channels, raw)
}

/// Reduce a decoded file to a 3-channel red-first buffer, whatever colour
/// type the encoder picked.
pub fn rgb_from_object(image: &DynamicImage) -> Result<PixelBuffer> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    from_raw(height as usize, width as usize, 3, rgb.into_raw())
}

/// Reduce a decoded file to a 3-channel blue-first buffer.
pub fn bgr_from_object(image: &DynamicImage) -> Result<PixelBuffer> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut raw = rgb.into_raw();
    for pixel in raw.chunks_exact_mut(3) {
        pixel.swap(0, 2);
    }
    from_raw(height as usize, width as usize, 3, raw)
}

/// Decode a file into a 3-channel blue-first buffer.
pub fn decode_bgr(path: &Path) -> Result<PixelBuffer> {
    bgr_from_object(&open(path)?)
}

/// Decode a file into a 3-channel red-first buffer.
pub fn decode_rgb(path: &Path) -> Result<PixelBuffer> {
    rgb_from_object(&open(path)?)
}

fn open(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| ImageError::decode(path.display(), e))
}

/// Encode a blue-first buffer into file bytes of the given format.
pub fn encode_bgr(
    buffer: &PixelBuffer,
    format: ImageFormat,
    options: &EncoderOptions,
) -> Result<Vec<u8>> {
    super::object::encode(&bgr_to_object(buffer)?, format, options)
}

/// Encode a red-first buffer into file bytes of the given format.
pub fn encode_rgb(
    buffer: &PixelBuffer,
    format: ImageFormat,
    options: &EncoderOptions,
) -> Result<Vec<u8>> {
    super::object::encode(&to_object(buffer)?, format, options)
}

/// Resample a buffer to `width` x `height`, keeping its channel count.
///
/// Buffers with an object colour type go through the image resizer in one
/// piece; any other channel count is resampled one plane at a time.
pub fn resize(buffer: &PixelBuffer, width: u32, height: u32, filter: FilterType) -> Result<PixelBuffer> {
    let channels = buffer.dim().2;
    if (1..=4).contains(&channels) {
        let resized = to_object(buffer)?.resize_exact(width, height, filter);
        return from_object(&resized);
    }

    let (src_h, src_w) = (buffer.dim().0 as u32, buffer.dim().1 as u32);
    let mut out = Array3::<u8>::zeros((height as usize, width as usize, channels));
    for c in 0..channels {
        let samples: Vec<u8> = buffer.index_axis(Axis(2), c).iter().copied().collect();
        let plane = GrayImage::from_raw(src_w, src_h, samples).ok_or_else(|| {
            ImageError::InvalidBuffer(format!("channel {} does not fit {}x{}", c, src_w, src_h))
        })?;
        let scaled = imageops::resize(&plane, width, height, filter);
        for (x, y, pixel) in scaled.enumerate_pixels() {
            out[[y as usize, x as usize, c]] = pixel.0[0];
        }
    }
    Ok(out.into_shared())
}
