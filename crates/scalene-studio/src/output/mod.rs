//! Output writers for profile reports.

pub mod html;

pub use html::write_html;

use crate::utils::error::HostError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), HostError> {
    if path.as_os_str().is_empty() {
        return Err(HostError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(HostError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
