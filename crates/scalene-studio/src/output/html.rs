//! HTML report writer.
//!
//! Writes the profiler's report unchanged to its display location.

use crate::utils::error::HostError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write HTML content to a file
///
/// **Public** - used by the file-backed display panel
///
/// # Arguments
/// * `html` - Report content, passed through as-is
/// * `output_path` - Path to output HTML file
///
/// # Errors
/// * `HostError::WriteFailed` - I/O error during write
/// * `HostError::InvalidPath` - Path is invalid
pub fn write_html(html: &str, output_path: impl AsRef<Path>) -> Result<(), HostError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    super::validate_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                HostError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(html.as_bytes())?;
    writer.flush()?;

    let file_size = html.len();
    info!(
        "Report written successfully ({} bytes, {:.2} KB)",
        file_size,
        file_size as f64 / 1024.0
    );

    Ok(())
}
