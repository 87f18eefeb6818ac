//! Pure calculation functions for preview decode geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::Viewport;

/// Calculate the integer downsample factor for decoding into a viewport.
///
/// The factor is `floor(min(source_w / viewport_w, source_h / viewport_h))`,
/// clamped to at least 1 so a source smaller than the viewport decodes at
/// full size. Returns `None` for an empty viewport (a zero edge means the
/// display is not laid out yet); callers treat that as "defer the load".
///
/// # Arguments
/// * `source` - Source image dimensions as (width, height)
/// * `viewport` - Display region the decode must fit
///
/// # Returns
/// * Downsample factor >= 1, or `None` when the viewport is empty
///
/// # Examples
/// ```
/// # use simple_snap::imaging::calculations::downsample_factor;
/// # use simple_snap::imaging::Viewport;
/// // 1000x500 into a 100x100 viewport → min(10, 5) = 5
/// assert_eq!(downsample_factor((1000, 500), Viewport::new(100, 100)), Some(5));
///
/// // Source already smaller than the viewport → full size
/// assert_eq!(downsample_factor((50, 40), Viewport::new(100, 100)), Some(1));
/// ```
pub fn downsample_factor(source: (u32, u32), viewport: Viewport) -> Option<u32> {
    if viewport.is_empty() {
        return None;
    }
    let (src_w, src_h) = source;
    Some((src_w / viewport.width).min(src_h / viewport.height).max(1))
}

/// Calculate the dimensions of a raster decoded at a downsample factor.
///
/// Both edges shrink by the same integer divisor, so aspect ratio is
/// preserved up to truncation. Edges never fall below 1 pixel.
///
/// # Arguments
/// * `source` - Source image dimensions (width, height)
/// * `factor` - Downsample factor (>= 1)
///
/// # Returns
/// * `(width, height)` - Raster dimensions after downsampling
pub fn downsampled_dimensions(source: (u32, u32), factor: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    ((src_w / factor).max(1), (src_h / factor).max(1))
}
