use super::{ImageValue, Storage};
use crate::codec::buffer::{self, PixelBuffer};
use crate::error::Result;
use crate::models::Representation;
use image::DynamicImage;
use std::borrow::Cow;

impl ImageValue {
    /// Pixels as a red-first buffer. Free when the value already holds one.
    pub fn as_rgb(&self) -> Result<PixelBuffer> {
        match &self.storage {
            Storage::Rgb(b) => Ok(self.settle(b)),
            Storage::Bgr(b) => {
                tracing::debug!("Converting BGR buffer to RGB");
                Ok(buffer::swap_red_blue(b))
            }
            Storage::Object(image) => {
                tracing::debug!("Converting image object to RGB buffer");
                buffer::from_object(image)
            }
        }
    }

    /// Pixels as a blue-first buffer. Free when the value already holds one.
    pub fn as_bgr(&self) -> Result<PixelBuffer> {
        match &self.storage {
            Storage::Bgr(b) => Ok(self.settle(b)),
            Storage::Rgb(b) => {
                tracing::debug!("Converting RGB buffer to BGR");
                Ok(buffer::swap_red_blue(b))
            }
            Storage::Object(image) => {
                tracing::debug!("Converting image object to BGR buffer");
                Ok(buffer::swap_red_blue(&buffer::from_object(image)?))
            }
        }
    }

    /// Pixels as an image object, borrowed when the value already holds one.
    pub fn as_object(&self) -> Result<Cow<'_, DynamicImage>> {
        match &self.storage {
            Storage::Object(image) => Ok(Cow::Borrowed(image)),
            Storage::Rgb(b) => {
                tracing::debug!("Converting RGB buffer to image object");
                buffer::to_object(b).map(Cow::Owned)
            }
            Storage::Bgr(b) => {
                tracing::debug!("Converting BGR buffer to image object");
                buffer::bgr_to_object(b).map(Cow::Owned)
            }
        }
    }

    /// A new value holding `representation`, with the same metadata and policy.
    pub fn convert(&self, representation: Representation) -> Result<ImageValue> {
        let storage = match representation {
            Representation::Bgr => Storage::Bgr(self.as_bgr()?),
            Representation::Rgb => Storage::Rgb(self.as_rgb()?),
            Representation::Object => Storage::Object(self.as_object()?.into_owned()),
        };
        Ok(ImageValue::assemble(
            storage,
            self.metadata.clone(),
            self.normalize_layout,
        ))
    }

    /// Hand out a stored buffer under the layout policy.
    fn settle(&self, stored: &PixelBuffer) -> PixelBuffer {
        if self.normalize_layout {
            buffer::normalize(stored.clone())
        } else {
            stored.clone()
        }
    }
}
