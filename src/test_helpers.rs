//! Shared test utilities for the simple-snap test suite.
//!
//! Synthetic image generators (no fixtures on disk — tests make the exact
//! JPEG they need) and pixel read-back for save-path assertions.

use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, Rgb, RgbImage};
use std::path::Path;

// =========================================================================
// Synthetic images
// =========================================================================

/// Write a JPEG with a deterministic gradient pattern.
///
/// Useful when only dimensions matter; the content exercises the decoder
/// with more than a flat field.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    write_jpeg(path, &img);
}

/// Write a JPEG filled with a single color.
///
/// Flat fields survive JPEG encoding nearly unchanged, so pixel assertions
/// against these need only a small tolerance.
pub fn create_solid_jpeg(path: &Path, width: u32, height: u32, color: [u8; 3]) {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    write_jpeg(path, &img);
}

fn write_jpeg(path: &Path, img: &RgbImage) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    JpegEncoder::new_with_quality(writer, 95)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
}

/// Write raw bytes to a path (corrupt-file scenarios).
pub fn write_bytes(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}

// =========================================================================
// Read-back
// =========================================================================

/// Read one RGB pixel back from an encoded image file.
pub fn read_pixel(path: &Path, x: u32, y: u32) -> [u8; 3] {
    let img = image::open(path).unwrap().into_rgb8();
    img.get_pixel(x, y).0
}
