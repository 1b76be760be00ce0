//! The embedded comment field that carries an image's JSON metadata.
//!
//! - PNG: an `iTXt` chunk keyed [`METADATA_FIELD`], written ahead of the image
//!   data. `tEXt` chunks with the same keyword are accepted on read.
//! - JPEG: a `COM` segment whose payload is the keyword, a NUL byte, then the
//!   text. It is placed after SOI and any leading APPn segments.
//!
//! Other containers have no such field.

use crate::error::{ImageError, Result};
use image::ImageFormat;
use std::io::Cursor;

/// Identifier of the field holding the metadata text.
pub const METADATA_FIELD: &str = "UserComment";

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const MARKER_SOS: u8 = 0xDA;
const MARKER_EOI: u8 = 0xD9;
const MARKER_COM: u8 = 0xFE;

/// Largest payload a single JPEG segment can hold (length field counts itself).
const JPEG_MAX_PAYLOAD: usize = u16::MAX as usize - 2;

/// Return the raw bytes of the metadata field, or `None` when the file has no
/// such field or the container cannot hold one.
pub fn read_field(bytes: &[u8]) -> Result<Option<Vec<u8>>> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => read_png_field(bytes),
        Ok(ImageFormat::Jpeg) => Ok(read_jpeg_field(bytes)),
        _ => Ok(None),
    }
}

fn read_png_field(bytes: &[u8]) -> Result<Option<Vec<u8>>> {
    let decoder = png::Decoder::new(Cursor::new(bytes));
    let reader = decoder
        .read_info()
        .map_err(|e| ImageError::MetadataDecode(e.to_string()))?;
    let info = reader.info();

    if let Some(chunk) = info
        .utf8_text
        .iter()
        .find(|chunk| chunk.keyword == METADATA_FIELD)
    {
        let text = chunk
            .get_text()
            .map_err(|e| ImageError::MetadataDecode(e.to_string()))?;
        return Ok(Some(text.into_bytes()));
    }

    Ok(info
        .uncompressed_latin1_text
        .iter()
        .find(|chunk| chunk.keyword == METADATA_FIELD)
        .map(|chunk| chunk.text.clone().into_bytes()))
}

fn read_jpeg_field(bytes: &[u8]) -> Option<Vec<u8>> {
    let prefix = jpeg_comment_prefix();
    JpegSegments::new(bytes)?
        .filter(|segment| segment.marker == MARKER_COM)
        .find_map(|segment| {
            segment
                .payload(bytes)
                .strip_prefix(prefix.as_slice())
                .map(<[u8]>::to_vec)
        })
}

/// Insert a metadata `COM` segment into an encoded JPEG stream.
pub fn insert_jpeg_comment(jpeg: &[u8], text: &[u8]) -> Result<Vec<u8>> {
    let segments = JpegSegments::new(jpeg)
        .ok_or_else(|| ImageError::Encode("encoder output is not a JPEG stream".into()))?;

    let mut payload = jpeg_comment_prefix();
    payload.extend_from_slice(text);
    if payload.len() > JPEG_MAX_PAYLOAD {
        return Err(ImageError::Encode(format!(
            "metadata is {} bytes, a JPEG comment holds at most {}",
            text.len(),
            JPEG_MAX_PAYLOAD - METADATA_FIELD.len() - 1
        )));
    }

    // Keep APP0 (JFIF) / APP1 (Exif) first so readers still recognise the file.
    let insert_at = segments
        .take_while(|segment| matches!(segment.marker, 0xE0..=0xEF))
        .last()
        .map_or(JPEG_SOI.len(), |segment| segment.end);

    let length = (payload.len() + 2) as u16;
    let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
    out.extend_from_slice(&jpeg[..insert_at]);
    out.extend_from_slice(&[0xFF, MARKER_COM]);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[insert_at..]);
    Ok(out)
}

fn jpeg_comment_prefix() -> Vec<u8> {
    let mut prefix = METADATA_FIELD.as_bytes().to_vec();
    prefix.push(0);
    prefix
}

/// A marker segment in the JPEG header, located by byte offsets.
#[derive(Debug, Clone, Copy)]
struct JpegSegment {
    marker: u8,
    /// Offset of the first payload byte (after marker and length).
    payload_start: usize,
    /// Offset one past the last byte of the segment.
    end: usize,
}

impl JpegSegment {
    fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.payload_start..self.end]
    }
}

/// Walks length-prefixed header segments, stopping at start-of-scan.
struct JpegSegments<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> JpegSegments<'a> {
    fn new(data: &'a [u8]) -> Option<Self> {
        if data.len() < 4 || data[..2] != JPEG_SOI {
            return None;
        }
        Some(Self { data, pos: 2 })
    }
}

impl Iterator for JpegSegments<'_> {
    type Item = JpegSegment;

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.data;
        loop {
            if self.pos + 1 >= data.len() || data[self.pos] != 0xFF {
                return None;
            }
            let marker = data[self.pos + 1];
            match marker {
                // fill byte
                0xFF => self.pos += 1,
                // standalone markers carry no length
                0x01 | 0xD0..=0xD7 => self.pos += 2,
                MARKER_SOS | MARKER_EOI => return None,
                _ => break,
            }
        }

        if self.pos + 3 >= data.len() {
            return None;
        }
        let length = u16::from_be_bytes([data[self.pos + 2], data[self.pos + 3]]) as usize;
        let end = self.pos + 2 + length;
        if length < 2 || end > data.len() {
            return None;
        }

        let segment = JpegSegment {
            marker: data[self.pos + 1],
            payload_start: self.pos + 4,
            end,
        };
        self.pos = end;
        Some(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, image::Rgb([10, 200, 30])));
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_plain_png_has_no_field() {
        assert_eq!(read_field(&encoded(ImageFormat::Png)).unwrap(), None);
    }

    #[test]
    fn test_plain_jpeg_has_no_field() {
        assert_eq!(read_field(&encoded(ImageFormat::Jpeg)).unwrap(), None);
    }

    #[test]
    fn test_bmp_has_no_field() {
        assert_eq!(read_field(&encoded(ImageFormat::Bmp)).unwrap(), None);
    }

    #[test]
    fn test_unknown_bytes_have_no_field() {
        assert_eq!(read_field(b"definitely not an image").unwrap(), None);
    }

    #[test]
    fn test_jpeg_comment_round_trip() {
        let jpeg = encoded(ImageFormat::Jpeg);
        let tagged = insert_jpeg_comment(&jpeg, br#"{"label":"cat"}"#).unwrap();

        assert_eq!(
            read_field(&tagged).unwrap(),
            Some(br#"{"label":"cat"}"#.to_vec())
        );
        // Still decodes as an image.
        let decoded = image::load_from_memory(&tagged).unwrap();
        assert_eq!(decoded.width(), 8);
    }

    #[test]
    fn test_jpeg_comment_after_app_segments() {
        let jpeg = encoded(ImageFormat::Jpeg);
        let tagged = insert_jpeg_comment(&jpeg, b"{}").unwrap();
        let markers: Vec<u8> = JpegSegments::new(&tagged)
            .unwrap()
            .map(|segment| segment.marker)
            .collect();
        let com = markers.iter().position(|&m| m == MARKER_COM).unwrap();
        assert!(markers[..com].iter().all(|m| (0xE0..=0xEF).contains(m)));
    }

    #[test]
    fn test_foreign_jpeg_comment_ignored() {
        let jpeg = encoded(ImageFormat::Jpeg);
        let mut tagged = jpeg[..2].to_vec();
        let payload = b"made with some editor";
        tagged.extend_from_slice(&[0xFF, MARKER_COM]);
        tagged.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        tagged.extend_from_slice(payload);
        tagged.extend_from_slice(&jpeg[2..]);

        assert_eq!(read_field(&tagged).unwrap(), None);
    }

    #[test]
    fn test_jpeg_comment_too_large() {
        let jpeg = encoded(ImageFormat::Jpeg);
        let text = vec![b'x'; JPEG_MAX_PAYLOAD];
        let err = insert_jpeg_comment(&jpeg, &text).unwrap_err();
        assert!(matches!(err, ImageError::Encode(_)));
    }

    #[test]
    fn test_insert_into_non_jpeg_fails() {
        let err = insert_jpeg_comment(&encoded(ImageFormat::Png), b"{}").unwrap_err();
        assert!(matches!(err, ImageError::Encode(_)));
    }
}
