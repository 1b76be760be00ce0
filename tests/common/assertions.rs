//! Assertion helpers for tests.

use lazyimg::{ImageValue, PixelBuffer};
use pretty_assertions::assert_eq;

/// Assert two values hold the same pixels, compared in RGB order.
pub fn assert_same_pixels(actual: &ImageValue, expected: &ImageValue) {
    assert_eq!(actual.size(), expected.size(), "Image sizes differ");
    let (a, e) = (actual.as_rgb().unwrap(), expected.as_rgb().unwrap());
    assert!(
        a == e,
        "Pixels differ: {} of {} samples mismatch",
        a.iter().zip(e.iter()).filter(|(x, y)| x != y).count(),
        e.len()
    );
}

/// Assert every sample is within `tolerance` of the expected one.
pub fn assert_close_pixels(actual: &PixelBuffer, expected: &PixelBuffer, tolerance: u8) {
    assert_eq!(actual.dim(), expected.dim(), "Buffer shapes differ");
    let worst = actual
        .iter()
        .zip(expected.iter())
        .map(|(a, e)| a.abs_diff(*e))
        .max()
        .unwrap_or(0);
    assert!(
        worst <= tolerance,
        "Largest sample difference {} exceeds tolerance {}",
        worst,
        tolerance
    );
}

/// Assert the file starts with the PNG signature.
pub fn assert_png_file(path: &std::path::Path) {
    let bytes = std::fs::read(path).unwrap();
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "Expected PNG file, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}
