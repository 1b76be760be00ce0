//! Test images and metadata records.

use lazyimg::{ImageValue, Metadata};
use ndarray::Array3;
use serde_json::json;

/// BGR buffer whose every sample differs from its neighbours.
pub fn gradient_bgr(height: usize, width: usize) -> Array3<u8> {
    Array3::from_shape_fn((height, width, 3), |(y, x, c)| {
        ((y * 37 + x * 11 + c * 90) % 256) as u8
    })
}

/// Smooth BGR image that survives JPEG compression with small error.
pub fn smooth_bgr(height: usize, width: usize) -> Array3<u8> {
    Array3::from_shape_fn((height, width, 3), |(y, x, c)| match c {
        0 => (x * 255 / width.max(1)) as u8,
        1 => 128,
        _ => (y * 255 / height.max(1)) as u8,
    })
}

pub fn gradient_image() -> ImageValue {
    ImageValue::from_bgr(gradient_bgr(12, 16))
}

/// `{"label": "cat", "score": 0.87}`
pub fn cat_label() -> Metadata {
    as_metadata(json!({"label": "cat", "score": 0.87}))
}

/// Nested record exercising every JSON value kind.
pub fn nested_record() -> Metadata {
    as_metadata(json!({
        "detections": [
            {"box": [1, 2, 30, 40], "class": "dog", "confidence": 0.5},
            {"box": [5, 6, 7, 8], "class": "cat", "confidence": 1e-9}
        ],
        "camera": {"id": "cam-07", "exposure_ms": 16.6667, "gain": null},
        "reviewed": false,
        "note": "naïve café ☕ \"quoted\"",
        "frame": 18446744073709551615u64
    }))
}

pub fn as_metadata(value: serde_json::Value) -> Metadata {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("metadata fixture must be an object, got {}", other),
    }
}
