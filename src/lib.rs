//! lazyimg - images that convert only when asked
//!
//! An [`ImageValue`] wraps a blue-first array, a red-first array or an
//! `image::DynamicImage`, and hands out whichever layout the caller needs,
//! converting at most once. A free-form JSON record can ride along and is
//! persisted in the file's embedded comment field.
//!
//! ```
//! use lazyimg::{ImageValue, Representation};
//! use ndarray::Array3;
//!
//! let image = ImageValue::from_bgr(Array3::<u8>::zeros((4, 4, 3)));
//! let rgb = image.as_rgb().unwrap();
//!
//! assert_eq!(rgb.dim(), (4, 4, 3));
//! assert_eq!(image.representation(), Representation::Bgr);
//! assert_eq!((image.width(), image.height()), (4, 4));
//! ```

pub mod codec;
pub mod error;
pub mod models;
pub mod value;

pub use codec::{IntoPixelBuffer, PixelBuffer, METADATA_FIELD};
pub use error::{ImageError, Result};
pub use img_geometry::{GeometryError, Pixel, Polygon, Rectangle, Size};
pub use models::{
    EncoderOptions, LayoutWarning, LoadOptions, Metadata, Representation, Resampling, SaveOptions,
};
pub use value::{Draw, ImageValue, Source};
