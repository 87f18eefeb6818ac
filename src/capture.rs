//! Capture collaborators: where photo bytes actually come from.
//!
//! The [`CaptureBackend`] trait defines the single operation a collaborator
//! must support: write a photo to the destination path it is handed. The
//! rest of the codebase only ever learns success or failure; what "capture"
//! means — a camera command, a file import, a scripted mock in tests — is
//! entirely the backend's business.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture command exited with {0}")]
    CommandFailed(ExitStatus),
    #[error("capture command produced no file at {0}")]
    MissingOutput(PathBuf),
    #[error("no capture command configured")]
    NoCommand,
    #[error("capture source not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("capture declined by the collaborator")]
    Declined,
}

/// Trait for capture collaborators.
///
/// On `Ok(())` a decodable photo exists at `destination`; on `Err` nothing
/// is assumed about the destination and the caller keeps its prior state.
pub trait CaptureBackend: Sync {
    fn capture(&self, destination: &Path) -> Result<(), CaptureError>;
}

impl<T: CaptureBackend + ?Sized> CaptureBackend for Box<T> {
    fn capture(&self, destination: &Path) -> Result<(), CaptureError> {
        (**self).capture(destination)
    }
}

/// Shells out to a configured camera command.
///
/// The template is split on whitespace and every occurrence of `{path}` is
/// replaced with the destination, e.g.
///
/// ```toml
/// [capture]
/// command = "libcamera-still --nopreview -o {path}"
/// ```
///
/// Quoting inside the template is not interpreted; arguments with spaces
/// are not supported. The command must exit zero *and* leave a file at the
/// destination for the capture to count.
pub struct CommandCapture {
    template: String,
}

impl CommandCapture {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    fn build(&self, destination: &Path) -> Option<(String, Vec<String>)> {
        let mut parts = self
            .template
            .split_whitespace()
            .map(|part| part.replace("{path}", &destination.to_string_lossy()));
        let program = parts.next()?;
        Some((program, parts.collect()))
    }
}

impl CaptureBackend for CommandCapture {
    fn capture(&self, destination: &Path) -> Result<(), CaptureError> {
        let (program, args) = self.build(destination).ok_or(CaptureError::NoCommand)?;
        debug!("running capture command: {program} {}", args.join(" "));

        let status = Command::new(&program).args(&args).status()?;
        if !status.success() {
            return Err(CaptureError::CommandFailed(status));
        }
        if !destination.is_file() {
            return Err(CaptureError::MissingOutput(destination.to_path_buf()));
        }
        Ok(())
    }
}

/// Treats an existing image file as the capture — no hardware involved.
pub struct ImportCapture {
    source: PathBuf,
}

impl ImportCapture {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl CaptureBackend for ImportCapture {
    fn capture(&self, destination: &Path) -> Result<(), CaptureError> {
        if !self.source.is_file() {
            return Err(CaptureError::SourceNotFound(self.source.clone()));
        }
        debug!("importing {} as the capture", self.source.display());
        fs::copy(&self.source, destination)?;
        Ok(())
    }
}
