//! Parameter types for the capture/adjust/save pipeline.
//!
//! These types describe *what* an operation should do, not *how*. They are
//! the interface between the [`session`](crate::session) controller (which
//! decides when things happen) and the pixel-level modules
//! ([`filter`](super::filter), [`loader`](super::loader)) that do the work.
//! All of them clamp or validate on construction so downstream code never
//! re-checks ranges.
//!
//! ## Types
//!
//! - [`Brightness`] — Adjustment scalar (0–200, 100 = neutral). Clamped on construction.
//! - [`JpegQuality`] — Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`Viewport`] — Display region the preview decode is bounded by.

/// Brightness adjustment scalar (0-200).
///
/// 100 is neutral; below darkens, above brightens. The raw value is only
/// meaningful once mapped to filter parameters by
/// [`LightingFilter::for_brightness`](super::LightingFilter::for_brightness).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brightness(u32);

impl Brightness {
    /// The neutral midpoint: no adjustment at all.
    pub const NEUTRAL: Brightness = Brightness(100);

    pub fn new(value: u32) -> Self {
        Self(value.min(200))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_neutral(self) -> bool {
        self.0 == 100
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegQuality(u8);

impl JpegQuality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for JpegQuality {
    fn default() -> Self {
        Self(90)
    }
}

/// Display region a preview must fit within.
///
/// A zero edge means the display is not laid out yet; loaders treat that
/// as "defer the load", never as an arithmetic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}
