use super::{ImageValue, Storage};
use crate::codec::{self, buffer, embedded, object};
use crate::error::{ImageError, Result};
use crate::models::{EncoderOptions, LoadOptions, Metadata, Representation, SaveOptions};
use std::path::Path;

impl ImageValue {
    /// Decode a file into `representation`.
    ///
    /// Without metadata, buffers come straight from the array codec and
    /// objects from the object decoder. With metadata, the file always goes
    /// through the object decoder, because only it sees the embedded field;
    /// the result is then converted once. Buffers are 3-channel either way,
    /// so the two paths agree on shape.
    pub fn load(
        path: impl AsRef<Path>,
        representation: Representation,
        options: LoadOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let loaded = if options.load_metadata {
            Self::load_with_metadata(path, representation)?
        } else {
            let storage = match representation {
                Representation::Bgr => Storage::Bgr(buffer::decode_bgr(path)?),
                Representation::Rgb => Storage::Rgb(buffer::decode_rgb(path)?),
                Representation::Object => Storage::Object(
                    image::open(path).map_err(|e| ImageError::decode(path.display(), e))?,
                ),
            };
            Self::assemble(storage, None, true)
        };

        tracing::info!(
            path = %path.display(),
            %representation,
            width = loaded.width(),
            height = loaded.height(),
            metadata = loaded.metadata.is_some(),
            "Loaded image"
        );
        Ok(loaded)
    }

    pub fn open_bgr(path: impl AsRef<Path>, load_metadata: bool) -> Result<Self> {
        Self::load(path, Representation::Bgr, LoadOptions { load_metadata })
    }

    pub fn open_rgb(path: impl AsRef<Path>, load_metadata: bool) -> Result<Self> {
        Self::load(path, Representation::Rgb, LoadOptions { load_metadata })
    }

    pub fn open_object(path: impl AsRef<Path>, load_metadata: bool) -> Result<Self> {
        Self::load(path, Representation::Object, LoadOptions { load_metadata })
    }

    fn load_with_metadata(path: &Path, representation: Representation) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| ImageError::decode(path.display(), e))?;
        let decoded =
            image::load_from_memory(&bytes).map_err(|e| ImageError::decode(path.display(), e))?;
        let metadata = parse_metadata(embedded::read_field(&bytes)?)?;

        let storage = match representation {
            Representation::Bgr => Storage::Bgr(buffer::bgr_from_object(&decoded)?),
            Representation::Rgb => Storage::Rgb(buffer::rgb_from_object(&decoded)?),
            Representation::Object => Storage::Object(decoded),
        };
        Ok(Self::assemble(storage, metadata, true))
    }

    /// Save with default options: metadata embedded, size optimization on.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.save_with(path, &SaveOptions::default())
    }

    /// Encode to the format implied by `path`'s extension and write the file.
    ///
    /// Metadata is embedded only when `options.save_metadata` is set and the
    /// value carries some; the caller may not set the embedded field then.
    pub fn save_with(&self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
        let path = path.as_ref();
        let format = codec::format_for_path(path)?;
        let embed = options.save_metadata && self.metadata.is_some();

        let via_object = embed || options.encoder.embedded_metadata.is_some();
        let bytes = match &self.storage {
            Storage::Bgr(b) if !via_object => buffer::encode_bgr(b, format, &options.encoder)?,
            Storage::Rgb(b) if !via_object => buffer::encode_rgb(b, format, &options.encoder)?,
            _ => {
                let encoder = self.object_encoder_options(&options.encoder, embed)?;
                object::encode(&*self.as_object()?, format, &encoder)?
            }
        };

        std::fs::write(path, &bytes)
            .map_err(|e| ImageError::Encode(format!("{}: {}", path.display(), e)))?;

        tracing::info!(
            path = %path.display(),
            bytes = bytes.len(),
            metadata = embed,
            "Saved image"
        );
        Ok(())
    }

    fn object_encoder_options(&self, requested: &EncoderOptions, embed: bool) -> Result<EncoderOptions> {
        let mut encoder = requested.clone();
        if let (true, Some(metadata)) = (embed, &self.metadata) {
            if encoder.embedded_metadata.is_some() {
                return Err(ImageError::ConflictingOption("embedded_metadata"));
            }
            encoder.embedded_metadata =
                Some(serde_json::to_vec(metadata).map_err(ImageError::MetadataEncode)?);
        }
        Ok(encoder)
    }
}

/// Absent field means no metadata; a present field must be a JSON object.
fn parse_metadata(field: Option<Vec<u8>>) -> Result<Option<Metadata>> {
    field
        .map(|bytes| {
            serde_json::from_slice::<Metadata>(&bytes)
                .map_err(|e| ImageError::MetadataDecode(e.to_string()))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample() -> ImageValue {
        ImageValue::from_bgr(Array3::from_shape_fn((5, 7, 3), |(y, x, c)| {
            (y * 50 + x * 9 + c * 80) as u8
        }))
    }

    fn label() -> Metadata {
        match json!({"label": "cat", "score": 0.87}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_parse_metadata_absent() {
        assert_eq!(parse_metadata(None).unwrap(), None);
    }

    #[test]
    fn test_parse_metadata_invalid_json() {
        let err = parse_metadata(Some(b"{not json".to_vec())).unwrap_err();
        assert!(matches!(err, ImageError::MetadataDecode(_)));
    }

    #[test]
    fn test_parse_metadata_requires_object() {
        let err = parse_metadata(Some(b"[1, 2]".to_vec())).unwrap_err();
        assert!(matches!(err, ImageError::MetadataDecode(_)));
    }

    #[test]
    fn test_png_buffer_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.png");
        let image = sample();
        image.save(&path).unwrap();

        let loaded = ImageValue::open_bgr(&path, false).unwrap();
        assert_eq!(loaded.as_bgr().unwrap(), image.as_bgr().unwrap());
        assert!(loaded.metadata().is_none());
    }

    #[test]
    fn test_rgb_load_matches_bgr_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.png");
        sample().save(&path).unwrap();

        let bgr = ImageValue::open_bgr(&path, false).unwrap();
        let rgb = ImageValue::open_rgb(&path, false).unwrap();
        assert_eq!(rgb.representation(), Representation::Rgb);
        assert_eq!(rgb.as_rgb().unwrap(), bgr.as_rgb().unwrap());
    }

    #[test]
    fn test_metadata_round_trip_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tagged.png");
        sample().with_metadata(label()).save(&path).unwrap();

        for representation in Representation::ALL {
            let loaded = ImageValue::load(&path, representation, LoadOptions { load_metadata: true }).unwrap();
            assert_eq!(loaded.representation(), representation);
            assert_eq!(loaded.metadata(), Some(&label()));
            assert_eq!(loaded.as_bgr().unwrap(), sample().as_bgr().unwrap());
        }
    }

    #[test]
    fn test_zero_image_keeps_shape_through_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zeros.png");
        ImageValue::from_bgr(Array3::<u8>::zeros((4, 4, 3)))
            .with_metadata(label())
            .save(&path)
            .unwrap();

        let tagged = ImageValue::open_bgr(&path, true).unwrap();
        let plain = ImageValue::open_bgr(&path, false).unwrap();
        assert_eq!(tagged.as_bgr().unwrap().dim(), (4, 4, 3));
        assert_eq!(tagged.as_bgr().unwrap(), plain.as_bgr().unwrap());
        assert_eq!(tagged.metadata(), Some(&label()));
    }

    #[test]
    fn test_rgb_value_saves_in_colour_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rgb.png");
        let rgb = sample().convert(Representation::Rgb).unwrap();
        rgb.save(&path).unwrap();

        let loaded = ImageValue::open_rgb(&path, false).unwrap();
        assert_eq!(loaded.as_rgb().unwrap(), rgb.as_rgb().unwrap());
    }

    #[test]
    fn test_metadata_not_loaded_unless_asked() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tagged.png");
        sample().with_metadata(label()).save(&path).unwrap();

        let loaded = ImageValue::open_object(&path, false).unwrap();
        assert!(loaded.metadata().is_none());
    }

    #[test]
    fn test_save_metadata_disabled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("untagged.png");
        let options = SaveOptions {
            save_metadata: false,
            ..Default::default()
        };
        sample().with_metadata(label()).save_with(&path, &options).unwrap();

        let loaded = ImageValue::open_rgb(&path, true).unwrap();
        assert!(loaded.metadata().is_none());
    }

    #[test]
    fn test_conflicting_option_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conflict.png");
        let options = SaveOptions {
            save_metadata: true,
            encoder: EncoderOptions::default().with_embedded_metadata(b"{}".to_vec()),
        };
        let err = sample().with_metadata(label()).save_with(&path, &options).unwrap_err();
        assert!(matches!(err, ImageError::ConflictingOption("embedded_metadata")));
        assert!(!path.exists());
    }

    #[test]
    fn test_caller_supplied_field_without_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("raw.png");
        let options = SaveOptions {
            save_metadata: true,
            encoder: EncoderOptions::default().with_embedded_metadata(br#"{"by":"caller"}"#.to_vec()),
        };
        sample().save_with(&path, &options).unwrap();

        let loaded = ImageValue::open_bgr(&path, true).unwrap();
        assert_eq!(loaded.metadata().unwrap()["by"], "caller");
    }

    #[test]
    fn test_invalid_embedded_json_fails_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        let options = SaveOptions {
            save_metadata: false,
            encoder: EncoderOptions::default().with_embedded_metadata(b"{oops".to_vec()),
        };
        sample().save_with(&path, &options).unwrap();

        let err = ImageValue::open_rgb(&path, true).unwrap_err();
        assert!(matches!(err, ImageError::MetadataDecode(_)));
        // Without metadata the file is still readable.
        assert!(ImageValue::open_rgb(&path, false).is_ok());
    }

    #[test]
    fn test_unknown_extension_fails_encode() {
        let dir = TempDir::new().unwrap();
        let err = sample().save(dir.path().join("image.unknown")).unwrap_err();
        assert!(matches!(err, ImageError::Encode(_)));
    }

    #[test]
    fn test_load_missing_file() {
        for load_metadata in [false, true] {
            for representation in Representation::ALL {
                let err = ImageValue::load(
                    "/nonexistent/file.png",
                    representation,
                    LoadOptions { load_metadata },
                )
                .unwrap_err();
                assert!(matches!(err, ImageError::Decode { .. }));
            }
        }
    }

    #[test]
    fn test_load_garbage_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.png");
        std::fs::write(&path, b"not an image at all").unwrap();
        let err = ImageValue::open_object(&path, true).unwrap_err();
        assert!(matches!(err, ImageError::Decode { .. }));
    }
}
