pub mod metadata;
pub mod options;
pub mod representation;

pub use metadata::{LayoutWarning, Metadata};
pub use options::{EncoderOptions, LoadOptions, Resampling, SaveOptions};
pub use representation::Representation;
