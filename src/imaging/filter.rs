//! The lighting filter: a per-channel affine color transform.
//!
//! A single brightness scalar (0-200) maps to a multiply color and an add
//! color; each output channel is `clamp(in * multiply / 255 + add, 0, 255)`.
//! The mapping is exhaustive over the scalar's range:
//!
//! | Brightness | multiply            | add                       |
//! |------------|---------------------|---------------------------|
//! | 100        | 255 (no-op)         | 0 (no-op)                 |
//! | above 100  | 255 (no-op)         | `round(255 * (b/100 - 1))`|
//! | below 100  | `round(255 * b/100)`| 0                         |
//!
//! The filter is tiny, `Copy`, and recomputed from scratch on every
//! brightness change; there is no accumulated state, so repeated
//! adjustments never compound. Application touches the RGB channels only —
//! alpha passes through untouched.

use super::params::Brightness;
use image::{RgbImage, Rgba, RgbaImage};
use rayon::prelude::*;

/// Per-channel multiply+add transform derived from a [`Brightness`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightingFilter {
    /// Multiplier numerator per RGB channel; the denominator is 255,
    /// so 255 leaves the channel untouched.
    pub multiply: [u8; 3],
    /// Additive term per RGB channel; 0 leaves the channel untouched.
    pub add: [u8; 3],
}

impl LightingFilter {
    /// The no-op transform: full multiply, zero add.
    pub const IDENTITY: LightingFilter = LightingFilter {
        multiply: [255; 3],
        add: [0; 3],
    };

    /// Map a brightness scalar to filter parameters.
    ///
    /// The neutral midpoint takes an explicit branch so identity is exact
    /// by construction, not a property of float rounding in the two ramps.
    ///
    /// # Examples
    /// ```
    /// # use simple_snap::imaging::{Brightness, LightingFilter};
    /// assert_eq!(LightingFilter::for_brightness(Brightness::NEUTRAL), LightingFilter::IDENTITY);
    ///
    /// // 150 → add = round(255 * 0.5) = 128 on every channel
    /// let boost = LightingFilter::for_brightness(Brightness::new(150));
    /// assert_eq!(boost.add, [128; 3]);
    /// assert_eq!(boost.multiply, [255; 3]);
    /// ```
    pub fn for_brightness(brightness: Brightness) -> Self {
        let value = brightness.value();
        if value == 100 {
            return Self::IDENTITY;
        }
        if value > 100 {
            let add = (255.0 * (value as f32 / 100.0 - 1.0)).round() as u8;
            Self {
                multiply: [255; 3],
                add: [add; 3],
            }
        } else {
            let multiply = (255.0 * (value as f32 / 100.0)).round() as u8;
            Self {
                multiply: [multiply; 3],
                add: [0; 3],
            }
        }
    }

    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// Transform one channel value.
    ///
    /// Integer arithmetic throughout: `v * 255 / 255` is exactly `v`, so the
    /// identity filter is a true no-op down to the last bit.
    #[inline]
    fn apply_channel(self, channel: usize, value: u8) -> u8 {
        let scaled = u32::from(value) * u32::from(self.multiply[channel]) / 255;
        (scaled + u32::from(self.add[channel])).min(255) as u8
    }

    /// Transform one RGBA pixel. Alpha passes through.
    pub fn apply_to_pixel(self, pixel: Rgba<u8>) -> Rgba<u8> {
        let Rgba([r, g, b, a]) = pixel;
        Rgba([
            self.apply_channel(0, r),
            self.apply_channel(1, g),
            self.apply_channel(2, b),
            a,
        ])
    }

    /// Transform every pixel of an RGBA raster in place.
    pub fn apply_to_rgba(self, image: &mut RgbaImage) {
        let samples: &mut [u8] = image;
        self.apply_to_samples(samples, 4);
    }

    /// Transform every pixel of an RGB raster in place.
    pub fn apply_to_rgb(self, image: &mut RgbImage) {
        let samples: &mut [u8] = image;
        self.apply_to_samples(samples, 3);
    }

    /// Shared application over interleaved 8-bit samples. Only the first
    /// three samples of each pixel change, whatever the stride.
    fn apply_to_samples(self, samples: &mut [u8], channels: usize) {
        if self.is_identity() {
            return;
        }
        samples.par_chunks_exact_mut(channels).for_each(|pixel| {
            for channel in 0..3 {
                pixel[channel] = self.apply_channel(channel, pixel[channel]);
            }
        });
    }
}

impl Default for LightingFilter {
    fn default() -> Self {
        Self::IDENTITY
    }
}
