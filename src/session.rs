//! The photo session controller: one capture, live adjustment, one save at
//! a time.
//!
//! [`Session`] owns the full lifecycle — trigger a capture, hold the
//! viewport-bounded preview, map brightness changes to filter parameters,
//! and hand saves to the background worker. It is UI-free: a frontend polls
//! [`save_enabled`](Session::save_enabled) /
//! [`adjustment_visible`](Session::adjustment_visible) and renders
//! [`rendered_preview`](Session::rendered_preview) however it likes.
//!
//! ## State rules
//!
//! - A new photo is committed only when the capture collaborator reports
//!   success; any failure leaves the previous photo, preview and
//!   brightness exactly as they were.
//! - A successful capture resets brightness to neutral — adjustments
//!   belong to a photo, not to the session.
//! - At most one save runs at a time. The guard is a plain bool, not a
//!   lock: every trigger comes through `&mut self`, so there is a single
//!   actor and nothing to race.

use crate::capture::{CaptureBackend, CaptureError};
use crate::imaging::loader::{self, LoadError};
use crate::imaging::{Brightness, JpegQuality, LightingFilter, Viewport};
use crate::store::{ImageStore, PhotoRef, StoreError};
use crate::worker::{self, PendingSave, SaveJob, SaveOutcome};
use image::RgbaImage;
use log::{debug, info};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no photo captured yet")]
    NoPhoto,
    #[error("a save is already in flight")]
    SaveInFlight,
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error("preview failed: {0}")]
    Preview(#[from] LoadError),
    #[error("storage failed: {0}")]
    Store(#[from] StoreError),
}

/// One interactive capture/adjust/save session.
pub struct Session<C: CaptureBackend> {
    store: ImageStore,
    backend: C,
    viewport: Viewport,
    quality: JpegQuality,
    photo: Option<PhotoRef>,
    preview: Option<RgbaImage>,
    brightness: Brightness,
    filter: LightingFilter,
    save_in_flight: bool,
}

impl<C: CaptureBackend> Session<C> {
    pub fn new(store: ImageStore, backend: C, viewport: Viewport, quality: JpegQuality) -> Self {
        Self {
            store,
            backend,
            viewport,
            quality,
            photo: None,
            preview: None,
            brightness: Brightness::NEUTRAL,
            filter: LightingFilter::IDENTITY,
            save_in_flight: false,
        }
    }

    /// Trigger a capture and, on success, make it the live photo.
    ///
    /// Allocates a fresh timestamped path, hands it to the capture
    /// collaborator, then commits: the new photo replaces the old one,
    /// brightness resets to neutral, and the preview is loaded for the
    /// current viewport. On collaborator failure nothing is committed.
    ///
    /// A preview that cannot load yet (empty viewport) returns the error
    /// but keeps the photo committed — call
    /// [`load_preview`](Self::load_preview) to retry once the display is
    /// laid out.
    pub fn capture(&mut self) -> Result<PhotoRef, SessionError> {
        let photo = self.store.allocate()?;
        self.backend.capture(photo.path())?;
        info!("captured {}", photo.path().display());

        self.photo = Some(photo.clone());
        self.preview = None;
        self.brightness = Brightness::NEUTRAL;
        self.filter = LightingFilter::IDENTITY;

        self.load_preview()?;
        Ok(photo)
    }

    /// (Re)load the viewport-bounded preview for the live photo.
    ///
    /// Split out from [`capture`](Self::capture) so a deferred load can be
    /// retried after [`set_viewport`](Self::set_viewport).
    pub fn load_preview(&mut self) -> Result<(), SessionError> {
        let photo = self.photo.as_ref().ok_or(SessionError::NoPhoto)?;
        let preview = loader::load_scaled_to_fit(photo.path(), self.viewport)?;
        debug!(
            "preview {}x{} for {}",
            preview.width(),
            preview.height(),
            photo.path().display()
        );
        self.preview = Some(preview);
        Ok(())
    }

    /// Update the preview viewport (e.g. after the display is laid out or
    /// resized). Takes effect on the next [`load_preview`](Self::load_preview).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Move the brightness control and recompute the filter parameters.
    ///
    /// This is the per-tick path of a live slider: two small parameter
    /// triples are derived, nothing else happens. The preview raster is
    /// never modified, so any number of adjustments compose from the
    /// original pixels rather than from each other.
    pub fn set_brightness(&mut self, brightness: Brightness) -> Result<(), SessionError> {
        if self.photo.is_none() {
            return Err(SessionError::NoPhoto);
        }
        self.brightness = brightness;
        self.filter = LightingFilter::for_brightness(brightness);
        debug!("brightness {} -> {:?}", brightness.value(), self.filter);
        Ok(())
    }

    /// The preview with the current filter applied, as fresh pixels.
    ///
    /// Filters a copy on every call; the stored preview stays pristine.
    pub fn rendered_preview(&self) -> Option<RgbaImage> {
        let preview = self.preview.as_ref()?;
        let mut rendered = preview.clone();
        self.filter.apply_to_rgba(&mut rendered);
        Some(rendered)
    }

    /// Hand the live photo and current filter to a background save worker.
    ///
    /// Rejected while a previous save is still in flight — the outcome must
    /// come back through [`finish_save`](Self::finish_save) (or the whole
    /// cycle via [`save_blocking`](Self::save_blocking)) first. The filter
    /// is captured now; later brightness changes don't affect this save.
    pub fn request_save(&mut self) -> Result<PendingSave, SessionError> {
        if self.save_in_flight {
            return Err(SessionError::SaveInFlight);
        }
        let photo = self.photo.clone().ok_or(SessionError::NoPhoto)?;

        self.save_in_flight = true;
        debug!("save requested for {}", photo.path().display());
        Ok(worker::spawn(SaveJob {
            photo,
            filter: self.filter,
            quality: self.quality,
            store: self.store.clone(),
        }))
    }

    /// Record that the pending save delivered its outcome, re-enabling the
    /// save trigger. Called with the result of
    /// [`PendingSave::wait`](crate::worker::PendingSave::wait) in hand,
    /// whatever it was — saved or not, the slot is free again.
    pub fn finish_save(&mut self) {
        self.save_in_flight = false;
    }

    /// Run one full save cycle, blocking until the outcome arrives.
    ///
    /// Convenience for sequential drivers; the pixel work still happens on
    /// the worker thread.
    pub fn save_blocking(&mut self) -> Result<SaveOutcome, SessionError> {
        let pending = self.request_save()?;
        let outcome = pending.wait();
        self.finish_save();
        Ok(outcome)
    }

    pub fn photo(&self) -> Option<&PhotoRef> {
        self.photo.as_ref()
    }

    pub fn preview(&self) -> Option<&RgbaImage> {
        self.preview.as_ref()
    }

    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    pub fn filter(&self) -> LightingFilter {
        self.filter
    }

    pub fn save_in_flight(&self) -> bool {
        self.save_in_flight
    }

    /// Whether a save trigger would be accepted right now.
    pub fn save_enabled(&self) -> bool {
        self.photo.is_some() && !self.save_in_flight
    }

    /// Whether the brightness control has anything to act on.
    pub fn adjustment_visible(&self) -> bool {
        self.preview.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::tests::{MockCapture, MockOutcome};
    use crate::test_helpers::read_pixel;
    use tempfile::TempDir;

    fn session_with(
        tmp: &TempDir,
        outcomes: impl IntoIterator<Item = MockOutcome>,
        viewport: Viewport,
    ) -> Session<MockCapture> {
        Session::new(
            ImageStore::new(tmp.path().join("pictures")),
            MockCapture::with_outcomes(outcomes),
            viewport,
            JpegQuality::default(),
        )
    }

    // =========================================================================
    // capture
    // =========================================================================

    #[test]
    fn fresh_session_has_nothing_to_adjust_or_save() {
        let tmp = TempDir::new().unwrap();
        let session = session_with(&tmp, [], Viewport::new(50, 50));

        assert!(session.photo().is_none());
        assert!(!session.save_enabled());
        assert!(!session.adjustment_visible());
        assert!(session.rendered_preview().is_none());
    }

    #[test]
    fn capture_commits_photo_and_viewport_bounded_preview() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, [MockOutcome::Write(200, 100)], Viewport::new(50, 50));

        let photo = session.capture().unwrap();
        assert!(photo.path().is_file());
        assert_eq!(session.photo(), Some(&photo));
        assert!(session.save_enabled());
        assert!(session.adjustment_visible());

        // min(200/50, 100/50) = 2 → 100x50
        let preview = session.preview().unwrap();
        assert_eq!((preview.width(), preview.height()), (100, 50));
    }

    #[test]
    fn capture_resets_brightness_to_neutral() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(
            &tmp,
            [MockOutcome::Write(80, 40), MockOutcome::Write(80, 40)],
            Viewport::new(50, 50),
        );

        session.capture().unwrap();
        session.set_brightness(Brightness::new(180)).unwrap();
        assert_eq!(session.brightness().value(), 180);

        session.capture().unwrap();
        assert!(session.brightness().is_neutral());
        assert!(session.filter().is_identity());
    }

    #[test]
    fn failed_capture_keeps_the_previous_photo_and_adjustment() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(
            &tmp,
            [MockOutcome::Write(80, 40), MockOutcome::Decline],
            Viewport::new(50, 50),
        );

        let first = session.capture().unwrap();
        session.set_brightness(Brightness::new(130)).unwrap();

        let result = session.capture();
        assert!(matches!(result, Err(SessionError::Capture(_))));

        // Everything from before the failed attempt is still live.
        assert_eq!(session.photo(), Some(&first));
        assert_eq!(session.brightness().value(), 130);
        assert!(session.adjustment_visible());
        assert!(session.save_enabled());
    }

    #[test]
    fn failed_first_capture_leaves_the_session_empty() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, [MockOutcome::Decline], Viewport::new(50, 50));

        assert!(session.capture().is_err());
        assert!(session.photo().is_none());
        assert!(!session.save_enabled());
        assert!(!session.adjustment_visible());
    }

    #[test]
    fn empty_viewport_defers_the_preview_but_commits_the_capture() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, [MockOutcome::Write(80, 40)], Viewport::new(0, 0));

        let result = session.capture();
        assert!(matches!(
            result,
            Err(SessionError::Preview(LoadError::ViewportEmpty))
        ));

        // The photo is live even though nothing can be shown yet.
        assert!(session.photo().is_some());
        assert!(session.save_enabled());
        assert!(!session.adjustment_visible());

        // Once the display reports its size the preview loads fine.
        session.set_viewport(Viewport::new(50, 50));
        session.load_preview().unwrap();
        assert!(session.adjustment_visible());
    }

    // =========================================================================
    // brightness
    // =========================================================================

    #[test]
    fn set_brightness_requires_a_photo() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, [], Viewport::new(50, 50));

        let result = session.set_brightness(Brightness::new(150));
        assert!(matches!(result, Err(SessionError::NoPhoto)));
    }

    #[test]
    fn rendered_preview_brightens_without_touching_the_stored_raster() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, [MockOutcome::Write(80, 40)], Viewport::new(50, 50));
        session.capture().unwrap();

        let before = *session.preview().unwrap().get_pixel(5, 5);
        session.set_brightness(Brightness::new(150)).unwrap();

        let rendered = session.rendered_preview().unwrap();
        // Solid 200-gray + add 128 saturates.
        assert!(rendered.get_pixel(5, 5)[0] >= 250);

        // The stored preview is untouched, so adjustments never compound.
        assert_eq!(session.preview().unwrap().get_pixel(5, 5), &before);
        let again = session.rendered_preview().unwrap();
        assert_eq!(again.get_pixel(5, 5), rendered.get_pixel(5, 5));
    }

    // =========================================================================
    // save
    // =========================================================================

    #[test]
    fn save_requires_a_photo() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, [], Viewport::new(50, 50));

        assert!(matches!(
            session.request_save(),
            Err(SessionError::NoPhoto)
        ));
    }

    #[test]
    fn only_one_save_runs_at_a_time() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, [MockOutcome::Write(80, 40)], Viewport::new(50, 50));
        session.capture().unwrap();

        let pending = session.request_save().unwrap();
        assert!(session.save_in_flight());
        assert!(!session.save_enabled());
        assert!(matches!(
            session.request_save(),
            Err(SessionError::SaveInFlight)
        ));

        assert!(pending.wait().is_saved());
        session.finish_save();
        assert!(session.save_enabled());

        // The slot is free again regardless of the delivered outcome.
        let pending = session.request_save().unwrap();
        pending.wait();
        session.finish_save();
    }

    #[test]
    fn save_blocking_applies_the_filter_to_the_stored_file() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, [MockOutcome::Write(64, 32)], Viewport::new(50, 50));

        let photo = session.capture().unwrap();
        session.set_brightness(Brightness::new(150)).unwrap();

        let outcome = session.save_blocking().unwrap();
        assert!(outcome.is_saved());
        assert!(session.save_enabled());

        // Mock captures are solid 200-gray; +128 clamps to white.
        let pixel = read_pixel(photo.path(), 3, 3);
        assert!(pixel[0] >= 250, "expected saturated pixel, got {pixel:?}");
    }

    #[test]
    fn save_captures_the_filter_at_request_time() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, [MockOutcome::Write(64, 32)], Viewport::new(50, 50));

        let photo = session.capture().unwrap();
        session.set_brightness(Brightness::new(0)).unwrap();

        let pending = session.request_save().unwrap();
        // Racing adjustment: must not leak into the in-flight save.
        session.set_brightness(Brightness::new(200)).unwrap();

        assert!(pending.wait().is_saved());
        session.finish_save();

        let pixel = read_pixel(photo.path(), 3, 3);
        assert!(pixel[0] <= 5, "expected blacked-out pixel, got {pixel:?}");
    }
}
