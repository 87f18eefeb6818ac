//! # Simple Snap
//!
//! A minimal capture-and-brighten tool for one-shot photo sessions. An
//! external collaborator (camera command or file import) writes the photo;
//! simple-snap bounds the preview to the display viewport, maps a single
//! brightness scalar to a lighting filter, and saves the adjusted image
//! back over the original file.
//!
//! # Architecture: One Session, One Save At A Time
//!
//! Everything hangs off the [`session::Session`] controller, which drives
//! four small stages:
//!
//! ```text
//! 1. Capture   collaborator  →  photo_<timestamp>.jpg   (external black box)
//! 2. Preview   photo         →  viewport-bounded raster (two-pass decode)
//! 3. Adjust    brightness    →  multiply/add filter     (pure, per tick)
//! 4. Save      photo+filter  →  full-res JPEG rewrite   (background worker)
//! ```
//!
//! The stages stay separate for three reasons:
//!
//! - **Responsiveness**: adjustment recomputes six parameter bytes, never
//!   pixels; the expensive full-resolution work happens only on save, off
//!   the interactive path.
//! - **Memory**: the preview raster scales with the viewport, not the
//!   sensor — a phone-sized capture never sits in memory at full size just
//!   to be looked at.
//! - **Testability**: capture is a trait, the filter math is pure, and the
//!   session is driven the same way by a CLI, a GUI shell, or a test.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | The controller — capture/adjust/save lifecycle and its state rules |
//! | [`capture`] | [`CaptureBackend`](capture::CaptureBackend) trait + command/import collaborators |
//! | [`imaging`] | Two-pass viewport-bounded decode, the lighting filter, pure geometry math |
//! | [`store`] | Pictures directory: timestamped unique names, byte persistence |
//! | [`worker`] | Background save thread with an exactly-once outcome handle |
//! | [`config`] | `snap.toml` loading and validation |
//!
//! # Design Decisions
//!
//! ## UI-Free Core
//!
//! Nothing in this crate draws. The session exposes observable state —
//! [`save_enabled`](session::Session::save_enabled),
//! [`adjustment_visible`](session::Session::adjustment_visible), the
//! rendered preview — and any frontend (the bundled CLI included) decides
//! what to do with it. Mutual exclusion for saves lives in the session as
//! an explicit single-slot flag, not in the enabled/disabled state of some
//! button.
//!
//! ## Two-Pass Preview Decode
//!
//! Previews are decoded in two passes: header only for dimensions, then a
//! full decode reduced by an integer downsample factor
//! (`floor(min(source/viewport))` per axis, never below 1). The factor
//! math is pure and lives in [`imaging::calculations`], so the sizing
//! behavior is tested without ever decoding a pixel.
//!
//! ## Non-Destructive Adjustment
//!
//! Brightness never modifies the preview raster. Each slider tick derives
//! a fresh multiply/add parameter pair from the scalar, and rendering
//! applies it to a copy. There is no accumulated state to drift: brightness
//! 150 means the same thing no matter how the control got there.
//!
//! ## Saves As Jobs, Not Callbacks
//!
//! A save is a value ([`worker::SaveJob`]) handed to a worker thread, with
//! a handle ([`worker::PendingSave`]) the caller consumes to learn the
//! two-valued outcome — saved or not. A worker that panics reads as "not
//! saved"; an outcome can never be delivered twice because reading it
//! consumes the handle. Rich failure detail goes to the log, where it is
//! useful, instead of into the caller's control flow, where it all
//! collapses to the same notification anyway.

pub mod capture;
pub mod config;
pub mod imaging;
pub mod session;
pub mod store;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_helpers;
