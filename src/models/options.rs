use serde::Deserialize;

/// Resampling filter used by `resize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resampling {
    Nearest,
    #[default]
    Bilinear,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<Resampling> for image::imageops::FilterType {
    fn from(resampling: Resampling) -> Self {
        use image::imageops::FilterType;
        match resampling {
            Resampling::Nearest => FilterType::Nearest,
            Resampling::Bilinear => FilterType::Triangle,
            Resampling::CatmullRom => FilterType::CatmullRom,
            Resampling::Gaussian => FilterType::Gaussian,
            Resampling::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Options handed to the file encoder.
///
/// Unset fields fall back to encoder defaults: `optimize` is on, JPEG quality
/// is [`EncoderOptions::DEFAULT_JPEG_QUALITY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Re-compress the output for size (PNG only; ignored elsewhere).
    pub optimize: Option<bool>,

    /// JPEG quality 1-100. Rejected for other formats.
    pub jpeg_quality: Option<u8>,

    /// Raw bytes for the embedded comment field. Reserved for the metadata
    /// writer when the image carries metadata.
    pub embedded_metadata: Option<Vec<u8>>,
}

impl EncoderOptions {
    pub const DEFAULT_JPEG_QUALITY: u8 = 90;

    pub fn optimize(&self) -> bool {
        self.optimize.unwrap_or(true)
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = Some(optimize);
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality);
        self
    }

    pub fn with_embedded_metadata(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.embedded_metadata = Some(bytes.into());
        self
    }
}

/// Options for saving an image to disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveOptions {
    /// Embed the image's metadata (if any) in the file.
    #[serde(default = "default_save_metadata")]
    pub save_metadata: bool,

    #[serde(default)]
    pub encoder: EncoderOptions,
}

fn default_save_metadata() -> bool {
    true
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            save_metadata: default_save_metadata(),
            encoder: EncoderOptions::default(),
        }
    }
}

/// Options for loading an image from disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Recover the JSON record from the file's embedded comment field.
    pub load_metadata: bool,
}
