//! Encoder for image objects, the only path that can embed the metadata field.

use super::embedded::{self, METADATA_FIELD};
use crate::error::{ImageError, Result};
use crate::models::EncoderOptions;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Encode `image` as `format`, applying `options`.
///
/// `options.embedded_metadata`, when set, becomes the metadata field of the
/// output. Only PNG and JPEG can hold it; other formats fail.
pub fn encode(image: &DynamicImage, format: ImageFormat, options: &EncoderOptions) -> Result<Vec<u8>> {
    if options.jpeg_quality.is_some() && format != ImageFormat::Jpeg {
        return Err(ImageError::Encode(format!(
            "jpeg_quality is not supported for {:?}",
            format
        )));
    }
    let comment = options.embedded_metadata.as_deref();

    tracing::debug!(
        ?format,
        width = image.width(),
        height = image.height(),
        color = ?image.color(),
        embed = comment.is_some(),
        "Encoding image object"
    );

    match format {
        ImageFormat::Png => encode_png(image, comment, options.optimize()),
        ImageFormat::Jpeg => {
            let quality = options
                .jpeg_quality
                .unwrap_or(EncoderOptions::DEFAULT_JPEG_QUALITY);
            let jpeg = encode_jpeg(image, quality)?;
            match comment {
                Some(text) => embedded::insert_jpeg_comment(&jpeg, text),
                None => Ok(jpeg),
            }
        }
        other => {
            if comment.is_some() {
                return Err(ImageError::Encode(format!(
                    "{:?} files cannot carry embedded metadata",
                    other
                )));
            }
            if options.optimize() {
                tracing::debug!(format = ?other, "Size optimization not available, ignoring");
            }
            let mut buf = Cursor::new(Vec::new());
            image
                .write_to(&mut buf, other)
                .map_err(|e| ImageError::Encode(e.to_string()))?;
            Ok(buf.into_inner())
        }
    }
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(ImageError::Encode(format!(
            "jpeg_quality must be within 1..=100, got {}",
            quality
        )));
    }
    let mut buf = Vec::new();
    image
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Encode through the `png` crate so the metadata chunk can be added, then
/// optionally re-compress with oxipng.
fn encode_png(image: &DynamicImage, comment: Option<&[u8]>, optimize: bool) -> Result<Vec<u8>> {
    let (color_type, bit_depth, data) = png_layout(image);

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width(), image.height());
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        // Fast when oxipng re-compresses afterwards
        encoder.set_compression(if optimize {
            png::Compression::Fast
        } else {
            png::Compression::Default
        });
        if let Some(comment) = comment {
            let text = std::str::from_utf8(comment)
                .map_err(|e| ImageError::Encode(format!("embedded metadata is not UTF-8: {}", e)))?;
            encoder
                .add_itxt_chunk(METADATA_FIELD.to_string(), text.to_string())
                .map_err(|e| ImageError::Encode(e.to_string()))?;
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| ImageError::Encode(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| ImageError::Encode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    if !optimize {
        return Ok(png_bytes);
    }

    // Keep every ancillary chunk: the metadata lives in one. Colour type and
    // bit depth stay as written so decoders see the channels that were saved.
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::None,
            optimize_alpha: false,
            bit_depth_reduction: false,
            color_type_reduction: false,
            palette_reduction: false,
            grayscale_reduction: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => Ok(optimized),
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, keeping unoptimized output");
            Ok(png_bytes)
        }
    }
}

/// PNG colour type, bit depth and big-endian sample bytes for an image object.
fn png_layout(image: &DynamicImage) -> (png::ColorType, png::BitDepth, Vec<u8>) {
    use png::{BitDepth, ColorType};

    match image {
        DynamicImage::ImageLuma8(b) => (ColorType::Grayscale, BitDepth::Eight, b.as_raw().clone()),
        DynamicImage::ImageLumaA8(b) => (ColorType::GrayscaleAlpha, BitDepth::Eight, b.as_raw().clone()),
        DynamicImage::ImageRgb8(b) => (ColorType::Rgb, BitDepth::Eight, b.as_raw().clone()),
        DynamicImage::ImageRgba8(b) => (ColorType::Rgba, BitDepth::Eight, b.as_raw().clone()),
        DynamicImage::ImageLuma16(b) => (ColorType::Grayscale, BitDepth::Sixteen, big_endian(b.as_raw())),
        DynamicImage::ImageLumaA16(b) => (ColorType::GrayscaleAlpha, BitDepth::Sixteen, big_endian(b.as_raw())),
        DynamicImage::ImageRgb16(b) => (ColorType::Rgb, BitDepth::Sixteen, big_endian(b.as_raw())),
        DynamicImage::ImageRgba16(b) => (ColorType::Rgba, BitDepth::Sixteen, big_endian(b.as_raw())),
        other if other.color().has_alpha() => {
            (ColorType::Rgba, BitDepth::Sixteen, big_endian(other.to_rgba16().as_raw()))
        }
        other => (ColorType::Rgb, BitDepth::Sixteen, big_endian(other.to_rgb16().as_raw())),
    }
}

fn big_endian(samples: &[u16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_be_bytes()).collect()
}
