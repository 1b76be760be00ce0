//! The image value: one pixel source plus the tag saying how to read it.
//!
//! An [`ImageValue`] holds whichever layout it was built from and converts
//! only when asked for another one. Every operation returns a new value;
//! the stored pixels are never modified in place.

mod convert;
mod draw;
mod io;
mod transform;

pub use draw::Draw;

use crate::codec::buffer::{self, IntoPixelBuffer, PixelBuffer};
use crate::error::{ImageError, Result};
use crate::models::{LayoutWarning, Metadata, Representation};
use image::DynamicImage;
use img_geometry::Size;
use ndarray::Array3;
use serde::de::DeserializeOwned;

/// Untagged pixel source handed to [`ImageValue::new`].
#[derive(Debug, Clone)]
pub enum Source {
    Buffer(PixelBuffer),
    Object(DynamicImage),
}

impl Source {
    fn kind(&self) -> &'static str {
        match self {
            Source::Buffer(_) => "pixel buffer",
            Source::Object(_) => "image object",
        }
    }
}

impl From<PixelBuffer> for Source {
    fn from(buffer: PixelBuffer) -> Self {
        Source::Buffer(buffer)
    }
}

impl From<Array3<u8>> for Source {
    fn from(array: Array3<u8>) -> Self {
        Source::Buffer(array.into_shared())
    }
}

impl From<DynamicImage> for Source {
    fn from(image: DynamicImage) -> Self {
        Source::Object(image)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Storage {
    Bgr(PixelBuffer),
    Rgb(PixelBuffer),
    Object(DynamicImage),
}

impl Storage {
    fn representation(&self) -> Representation {
        match self {
            Storage::Bgr(_) => Representation::Bgr,
            Storage::Rgb(_) => Representation::Rgb,
            Storage::Object(_) => Representation::Object,
        }
    }

    fn size(&self) -> Size {
        match self {
            Storage::Bgr(b) | Storage::Rgb(b) => {
                let (height, width, _) = b.dim();
                Size::new(width as u32, height as u32)
            }
            Storage::Object(image) => Size::new(image.width(), image.height()),
        }
    }
}

/// An image in one of several in-memory layouts, with optional metadata.
#[derive(Debug, Clone)]
pub struct ImageValue {
    storage: Storage,
    metadata: Option<Metadata>,
    normalize_layout: bool,
    size: Size,
    warnings: Vec<LayoutWarning>,
}

impl ImageValue {
    /// Build a value from an untagged source.
    ///
    /// Fails with [`ImageError::TypeMismatch`] when `representation` does not
    /// fit the source. With `normalize_layout`, a non-contiguous buffer is
    /// copied into row-major order; without it the buffer is kept and a
    /// [`LayoutWarning`] is recorded.
    pub fn new(
        source: impl Into<Source>,
        representation: Representation,
        metadata: Option<Metadata>,
        normalize_layout: bool,
    ) -> Result<Self> {
        let source = source.into();
        let storage = match (source, representation) {
            (Source::Buffer(b), Representation::Bgr) => Storage::Bgr(b),
            (Source::Buffer(b), Representation::Rgb) => Storage::Rgb(b),
            (Source::Object(image), Representation::Object) => Storage::Object(image),
            (source, representation) => {
                return Err(ImageError::TypeMismatch {
                    representation,
                    source_kind: source.kind(),
                })
            }
        };
        Ok(Self::assemble(storage, metadata, normalize_layout))
    }

    /// Blue-first buffer, normalized to row-major layout.
    pub fn from_bgr(buffer: impl IntoPixelBuffer) -> Self {
        Self::assemble(Storage::Bgr(buffer.into_pixel_buffer()), None, true)
    }

    /// Red-first buffer, normalized to row-major layout.
    pub fn from_rgb(buffer: impl IntoPixelBuffer) -> Self {
        Self::assemble(Storage::Rgb(buffer.into_pixel_buffer()), None, true)
    }

    pub fn from_object(image: DynamicImage) -> Self {
        Self::assemble(Storage::Object(image), None, true)
    }

    /// Replace the attached metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Change the layout policy. Switching it on normalizes the current buffer.
    pub fn with_normalize_layout(self, normalize_layout: bool) -> Self {
        Self::assemble(self.storage, self.metadata, normalize_layout)
    }

    /// Single entry point for every value the crate hands out, so the layout
    /// policy and cached size are applied uniformly.
    pub(crate) fn assemble(
        storage: Storage,
        metadata: Option<Metadata>,
        normalize_layout: bool,
    ) -> Self {
        let mut warnings = Vec::new();
        let storage = match storage {
            Storage::Bgr(b) => {
                Storage::Bgr(check_layout(b, Representation::Bgr, normalize_layout, &mut warnings))
            }
            Storage::Rgb(b) => {
                Storage::Rgb(check_layout(b, Representation::Rgb, normalize_layout, &mut warnings))
            }
            object @ Storage::Object(_) => object,
        };
        let size = storage.size();

        Self {
            storage,
            metadata,
            normalize_layout,
            size,
            warnings,
        }
    }

    pub fn representation(&self) -> Representation {
        self.storage.representation()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Samples per pixel as stored (an object reports its colour type's count).
    pub fn channels(&self) -> usize {
        match &self.storage {
            Storage::Bgr(b) | Storage::Rgb(b) => b.dim().2,
            Storage::Object(image) => image.color().channel_count() as usize,
        }
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn into_metadata(self) -> Option<Metadata> {
        self.metadata
    }

    /// Deserialize the metadata record into a typed structure.
    pub fn metadata_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.metadata
            .as_ref()
            .map(|m| {
                serde_json::from_value(serde_json::Value::Object(m.clone()))
                    .map_err(|e| ImageError::MetadataDecode(e.to_string()))
            })
            .transpose()
    }

    pub fn normalize_layout(&self) -> bool {
        self.normalize_layout
    }

    /// Layout warnings raised while building this value.
    pub fn warnings(&self) -> &[LayoutWarning] {
        &self.warnings
    }

    pub(crate) fn storage(&self) -> &Storage {
        &self.storage
    }
}

fn check_layout(
    buffer: PixelBuffer,
    representation: Representation,
    normalize_layout: bool,
    warnings: &mut Vec<LayoutWarning>,
) -> PixelBuffer {
    if buffer::is_contiguous(&buffer) {
        return buffer;
    }
    if normalize_layout {
        tracing::debug!(%representation, shape = ?buffer.shape(), "Copying non-contiguous buffer");
        return buffer::normalize(buffer);
    }

    let warning = LayoutWarning {
        representation,
        shape: [buffer.dim().0, buffer.dim().1, buffer.dim().2],
        strides: [buffer.strides()[0], buffer.strides()[1], buffer.strides()[2]],
    };
    tracing::warn!(%warning, "Accepting non-contiguous buffer, buffer consumers may misbehave");
    warnings.push(warning);
    buffer
}
