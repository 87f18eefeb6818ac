//! Two-pass photo loading bounded by a display viewport.
//!
//! Pass one reads only the image header ([`image::image_dimensions`]), so no
//! pixel memory is allocated for the sizing decision. Pass two decodes and
//! shrinks by the integer downsample factor from
//! [`calculations`](super::calculations), so the raster handed back scales
//! with the viewport rather than with the source resolution. A 4000x3000
//! capture previewed in a 1280x800 viewport comes back as ~1333x1000, not
//! twelve megapixels.
//!
//! The pure-Rust decoders cannot subsample while decoding, so pass two
//! decodes at full size and reduces immediately; the full-size raster is
//! transient and dropped before return.

use super::calculations::{downsample_factor, downsampled_dimensions};
use super::params::Viewport;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, RgbaImage, imageops};
use log::debug;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("preview viewport has a zero edge; display not laid out yet")]
    ViewportEmpty,
}

/// First pass: dimensions straight from the header, no pixel allocation.
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32), LoadError> {
    image::image_dimensions(path)
        .map_err(|e| LoadError::Decode(format!("{}: {e}", path.display())))
}

fn decode(path: &Path) -> Result<DynamicImage, LoadError> {
    ImageReader::open(path)
        .map_err(LoadError::Io)?
        .decode()
        .map_err(|e| LoadError::Decode(format!("{}: {e}", path.display())))
}

/// Decode a photo downsampled to fit a viewport.
///
/// Returns [`LoadError::ViewportEmpty`] when the viewport has a zero edge —
/// the caller should defer and retry once the display is laid out. A source
/// already smaller than the viewport decodes at full size; nothing is ever
/// upscaled.
pub fn load_scaled_to_fit(path: &Path, viewport: Viewport) -> Result<RgbaImage, LoadError> {
    let source = probe_dimensions(path)?;
    let factor = downsample_factor(source, viewport).ok_or(LoadError::ViewportEmpty)?;

    let image = decode(path)?;
    if factor == 1 {
        return Ok(image.into_rgba8());
    }

    let (width, height) = downsampled_dimensions(source, factor);
    debug!(
        "downsampled {} by {factor}: {}x{} -> {width}x{height}",
        path.display(),
        source.0,
        source.1,
    );
    Ok(imageops::resize(&image, width, height, FilterType::Triangle))
}

/// Full-resolution decode for the save path.
pub fn load_full(path: &Path) -> Result<DynamicImage, LoadError> {
    decode(path)
}
