use crate::models::Representation;
use img_geometry::{GeometryError, Rectangle, Size};
use thiserror::Error;

pub type Result<T, E = ImageError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Representation {representation} does not match a {source_kind} source")]
    TypeMismatch {
        representation: Representation,
        source_kind: &'static str,
    },

    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Embedded metadata is not valid JSON: {0}")]
    MetadataDecode(String),

    #[error("Metadata cannot be serialized: {0}")]
    MetadataEncode(serde_json::Error),

    #[error("Option `{0}` is set by the metadata writer and cannot be supplied by the caller")]
    ConflictingOption(&'static str),

    #[error("Unsupported option: {0}")]
    UnsupportedOption(String),

    #[error("{operation} does not support {channels}-channel buffers")]
    UnsupportedChannels {
        operation: &'static str,
        channels: usize,
    },

    #[error("Invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error("Crop {rect} exceeds image bounds {size}")]
    CropOutOfBounds { rect: Rectangle, size: Size },

    #[error("Invalid geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

impl ImageError {
    pub(crate) fn decode(path: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        ImageError::Decode {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}
