//! Background save: decode, filter, encode, persist — off the interactive
//! path.
//!
//! Each save gets its own worker thread and a single-use channel back to
//! the caller. The handle ([`PendingSave`]) is consumed when the outcome is
//! read, so a result can never be observed twice; a worker that dies
//! without reporting (panic, poisoned decode) reads as
//! [`SaveOutcome::NotSaved`], never as a hang or a crash of the caller.
//!
//! The outcome is deliberately two-valued. Decode, encode and write
//! failures are worth distinguishing in the log, not in the caller's
//! control flow — whatever went wrong, the answer to "is my photo safe?"
//! is the same.

use crate::imaging::loader::{self, LoadError};
use crate::imaging::{JpegQuality, LightingFilter};
use crate::store::{ImageStore, PhotoRef, StoreError};
use image::ImageEncoder;
use image::codecs::jpeg::JpegEncoder;
use log::{debug, warn};
use std::io::Cursor;
use std::sync::mpsc;
use std::thread;
use thiserror::Error;

/// Two-valued result of a save request, delivered exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    NotSaved,
}

impl SaveOutcome {
    /// The user-facing notification for this outcome.
    pub fn message(self) -> &'static str {
        match self {
            SaveOutcome::Saved => "photo saved",
            SaveOutcome::NotSaved => "photo not saved",
        }
    }

    pub fn is_saved(self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

/// Everything a save needs, owned by the worker thread for its duration.
///
/// The filter and quality are captured at request time; brightness changes
/// made while the save runs do not leak into it.
pub struct SaveJob {
    pub photo: PhotoRef,
    pub filter: LightingFilter,
    pub quality: JpegQuality,
    pub store: ImageStore,
}

/// Handle to a save in flight.
///
/// Consumed by [`wait`](Self::wait) or [`try_wait`](Self::try_wait); once
/// either returns an outcome the save is over and the handle is gone.
pub struct PendingSave {
    receiver: mpsc::Receiver<SaveOutcome>,
}

/// Result of a non-blocking poll on a [`PendingSave`].
pub enum SavePoll {
    Done(SaveOutcome),
    Pending(PendingSave),
}

impl PendingSave {
    /// Block until the worker finishes and return the outcome.
    ///
    /// A worker that died without reporting counts as not saved.
    pub fn wait(self) -> SaveOutcome {
        self.receiver.recv().unwrap_or(SaveOutcome::NotSaved)
    }

    /// Non-blocking poll; hands the handle back while the save still runs.
    pub fn try_wait(self) -> SavePoll {
        match self.receiver.try_recv() {
            Ok(outcome) => SavePoll::Done(outcome),
            Err(mpsc::TryRecvError::Empty) => SavePoll::Pending(self),
            Err(mpsc::TryRecvError::Disconnected) => SavePoll::Done(SaveOutcome::NotSaved),
        }
    }
}

/// Run a save job on a dedicated background thread.
pub fn spawn(job: SaveJob) -> PendingSave {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        // The caller may have dropped the handle already; that's fine.
        let _ = sender.send(run(&job));
    });
    PendingSave { receiver }
}

fn run(job: &SaveJob) -> SaveOutcome {
    match save_altered(job) {
        Ok(()) => {
            debug!("saved {}", job.photo.path().display());
            SaveOutcome::Saved
        }
        Err(e) => {
            warn!("save failed for {}: {e}", job.photo.path().display());
            SaveOutcome::NotSaved
        }
    }
}

/// Save-path failures. Callers only ever see the collapsed [`SaveOutcome`];
/// this type exists so the log can say which stage gave out.
#[derive(Error, Debug)]
enum SaveError {
    #[error("decode failed: {0}")]
    Load(#[from] LoadError),
    #[error("encode failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("write failed: {0}")]
    Store(#[from] StoreError),
}

/// Decode at full resolution, apply the filter, re-encode, overwrite.
///
/// Encoding goes to memory first so the photo's file is only touched by a
/// single write once a complete JPEG exists.
fn save_altered(job: &SaveJob) -> Result<(), SaveError> {
    let mut image = loader::load_full(job.photo.path())?.into_rgb8();
    job.filter.apply_to_rgb(&mut image);

    let (width, height) = image.dimensions();
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(Cursor::new(&mut encoded), job.quality.value()).write_image(
        image.as_raw(),
        width,
        height,
        image::ExtendedColorType::Rgb8,
    )?;

    job.store.persist(&job.photo, &encoded)?;
    Ok(())
}
