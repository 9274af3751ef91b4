//! Per-session temporary report location.
//!
//! The directory name embeds the creation timestamp and the file name the
//! process id. `tempfile` adds a random suffix, so two sessions started in
//! the same millisecond still get distinct paths. The directory is removed
//! when the [`ScopedArtifact`] is dropped unless it was allocated with `keep`.

use crate::utils::config::TEMP_DIR_PREFIX;
use crate::utils::error::SessionError;
use chrono::Utc;
use log::debug;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(Debug)]
pub struct ScopedArtifact {
    dir: TempDir,
    path: PathBuf,
}

impl ScopedArtifact {
    /// Create a fresh directory under `root` and pick the report path in it
    pub fn allocate(root: &Path, keep: bool) -> Result<Self, SessionError> {
        let prefix = format!("{}{}_", TEMP_DIR_PREFIX, Utc::now().timestamp_millis());
        let dir = tempfile::Builder::new()
            .prefix(&prefix)
            .disable_cleanup(keep)
            .tempdir_in(root)
            .map_err(SessionError::TempDir)?;

        let path = dir
            .path()
            .join(format!("profile-{}.html", std::process::id()));
        debug!("Allocated report path: {}", path.display());

        Ok(Self { dir, path })
    }

    /// Where the profiler writes its report
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn directory(&self) -> &Path {
        self.dir.path()
    }

    /// Read the whole report as text.
    ///
    /// Only valid once the profiler has exited.
    pub fn read_report(&self) -> Result<String, SessionError> {
        std::fs::read_to_string(&self.path).map_err(|source| SessionError::ArtifactRead {
            path: self.path.clone(),
            source,
        })
    }
}
