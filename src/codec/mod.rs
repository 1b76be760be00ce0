//! Collaborators behind the image value: the array codec, the image-object
//! encoder and the embedded comment field.

pub mod buffer;
pub mod embedded;
pub mod object;

pub use buffer::{IntoPixelBuffer, PixelBuffer};
pub use embedded::METADATA_FIELD;

use crate::error::{ImageError, Result};
use image::ImageFormat;
use std::path::Path;

/// Container format implied by the destination path's extension.
pub fn format_for_path(path: &Path) -> Result<ImageFormat> {
    ImageFormat::from_path(path)
        .map_err(|e| ImageError::Encode(format!("{}: {}", path.display(), e)))
}
