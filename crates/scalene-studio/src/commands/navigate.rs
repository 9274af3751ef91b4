//! Navigate command: act on a single panel message from the command line.

use super::models::NavigateArgs;
use super::profile::load_settings;
use crate::host::terminal::FileNavigator;
use crate::navigation::handle_message;
use anyhow::{Context, Result};
use log::warn;

/// Execute the navigate command
///
/// # Returns
/// The revealed 0-based line, or `None` if the message was not a navigation request
pub fn execute_navigate(args: NavigateArgs) -> Result<Option<usize>> {
    let settings = load_settings(args.config.as_deref(), None)?;
    let message: serde_json::Value =
        serde_json::from_str(&args.message).context("Panel message is not valid JSON")?;

    let navigator = FileNavigator::new(settings.editor);
    let line = handle_message(&navigator, &message).context("Failed to navigate")?;

    if line.is_none() {
        warn!("Ignored message: {}", args.message);
    }
    Ok(line)
}
