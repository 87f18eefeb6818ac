//! Image operations — pure Rust via the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Probe** | `image::image_dimensions` (header only, no pixels) |
//! | **Preview decode** | `ImageReader` + integer downsample (Triangle) |
//! | **Lighting filter** | multiply/add affine transform, rayon over raw samples |
//! | **Encode** | `image::codecs::jpeg::JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for downsample geometry (unit testable)
//! - **Parameters**: Clamped value types describing what to do
//! - **Filter**: The brightness-derived color transform and its application
//! - **Loader**: Two-pass decode bounded by the display viewport

pub mod calculations;
pub mod filter;
pub mod loader;
pub mod params;

pub use filter::LightingFilter;
pub use loader::{LoadError, load_full, load_scaled_to_fit, probe_dimensions};
pub use params::{Brightness, JpegQuality, Viewport};
