use crate::models::Representation;

/// Free-form JSON record attached to an image and persisted in the file.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Recorded when a non-contiguous buffer is accepted without normalization.
///
/// Buffer-consuming routines may misbehave on such layouts; the warning lets
/// callers detect that instead of relying on the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutWarning {
    pub representation: Representation,
    pub shape: [usize; 3],
    pub strides: [isize; 3],
}

impl std::fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} buffer of shape {:?} is not contiguous (strides {:?})",
            self.representation, self.shape, self.strides
        )
    }
}
