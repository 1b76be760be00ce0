use serde::Deserialize;
use std::fmt;

/// Which in-memory layout an image currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Row-major `height x width x channel` array, blue first.
    Bgr,
    /// Row-major `height x width x channel` array, red first.
    Rgb,
    /// An `image::DynamicImage` with its own internal pixel layout.
    Object,
}

impl Representation {
    pub const ALL: [Representation; 3] = [
        Representation::Bgr,
        Representation::Rgb,
        Representation::Object,
    ];

    /// True for the two array-backed layouts.
    pub fn is_buffer(&self) -> bool {
        matches!(self, Representation::Bgr | Representation::Rgb)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Representation::Bgr => "BGR",
            Representation::Rgb => "RGB",
            Representation::Object => "OBJECT",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
