//! Durable photo storage: unique capture paths and byte persistence.
//!
//! Photos live in a single pictures directory and are named
//! `photo_<YYYYMMDD_HHmmss>.jpg` after their capture wall-clock time, so a
//! directory listing reads chronologically. The store hands out paths
//! before any file exists ([`allocate`](ImageStore::allocate)) and writes
//! encoded bytes back over them ([`persist`](ImageStore::persist)); it
//! never decodes or inspects image content.

use chrono::Local;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reference to a photo's location on disk.
///
/// Handed out by [`ImageStore::allocate`] before the file exists (the
/// capture collaborator writes it), and cloned into the save worker. The
/// path never changes for the lifetime of the reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRef {
    path: PathBuf,
}

impl PhotoRef {
    /// Wrap a photo that is already on disk (import and re-adjust flows).
    pub fn existing(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The pictures directory and the naming scheme inside it.
#[derive(Debug, Clone)]
pub struct ImageStore {
    pictures_dir: PathBuf,
}

impl ImageStore {
    pub fn new(pictures_dir: impl Into<PathBuf>) -> Self {
        Self {
            pictures_dir: pictures_dir.into(),
        }
    }

    pub fn pictures_dir(&self) -> &Path {
        &self.pictures_dir
    }

    /// Reserve a unique, timestamp-named path for the next capture.
    ///
    /// Creates the pictures directory on first use. When a second capture
    /// lands in the same wall-clock second, the name gets a numeric suffix
    /// (`photo_20260825_143012_2.jpg`) instead of colliding. Uniqueness is
    /// judged against files present on disk, which holds for the intended
    /// allocate-then-write flow.
    pub fn allocate(&self) -> Result<PhotoRef, StoreError> {
        fs::create_dir_all(&self.pictures_dir)?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let base = format!("photo_{stamp}");
        let mut candidate = self.pictures_dir.join(format!("{base}.jpg"));
        let mut attempt = 1u32;
        while candidate.exists() {
            attempt += 1;
            candidate = self.pictures_dir.join(format!("{base}_{attempt}.jpg"));
        }

        debug!("allocated {}", candidate.display());
        Ok(PhotoRef { path: candidate })
    }

    /// Overwrite the photo's file with freshly encoded bytes.
    pub fn persist(&self, photo: &PhotoRef, bytes: &[u8]) -> Result<(), StoreError> {
        fs::write(photo.path(), bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn allocate_creates_the_pictures_dir() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path().join("nested").join("pictures"));

        let photo = store.allocate().unwrap();
        assert!(store.pictures_dir().is_dir());
        assert!(photo.path().starts_with(store.pictures_dir()));
    }

    #[test]
    fn allocate_follows_the_naming_convention() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path());

        let photo = store.allocate().unwrap();
        let name = photo.path().file_name().unwrap().to_str().unwrap();

        // photo_YYYYMMDD_HHmmss.jpg
        let stem = name
            .strip_prefix("photo_")
            .and_then(|s| s.strip_suffix(".jpg"))
            .unwrap();
        let (date, time) = stem.split_once('_').unwrap();
        assert_eq!(date.len(), 8);
        assert!(date.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(time.len(), 6);
        assert!(time.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn same_second_allocations_get_a_suffix() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path());

        let first = store.allocate().unwrap();
        fs::write(first.path(), b"jpeg bytes").unwrap();
        let second = store.allocate().unwrap();

        assert_ne!(first.path(), second.path());
        let name = second.path().file_name().unwrap().to_str().unwrap();
        // Either the clock ticked over or the collision suffix kicked in;
        // both produce a fresh name that still follows the convention.
        assert!(name.starts_with("photo_"));
        assert!(name.ends_with(".jpg"));
        assert!(!second.path().exists());
    }

    #[test]
    fn persist_overwrites_in_place() {
        let tmp = TempDir::new().unwrap();
        let store = ImageStore::new(tmp.path());

        let photo = store.allocate().unwrap();
        fs::write(photo.path(), b"original").unwrap();
        store.persist(&photo, b"altered").unwrap();

        assert_eq!(fs::read(photo.path()).unwrap(), b"altered");
    }

    #[test]
    fn existing_wraps_an_arbitrary_path() {
        let photo = PhotoRef::existing("/some/where/pic.jpg");
        assert_eq!(photo.path(), Path::new("/some/where/pic.jpg"));
    }
}
