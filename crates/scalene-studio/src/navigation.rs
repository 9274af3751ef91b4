//! Panel-to-host navigation back-channel.
//!
//! The report panel posts `{"command": "jumpToLine", "filePath": …, "lineNumber": …}`
//! when a line is clicked. Line numbers arrive 1-based and are clamped to the
//! document, so an out-of-range request lands on the last line.

use crate::host::DocumentNavigator;
use crate::utils::error::HostError;
use log::debug;
use serde::Deserialize;
use std::path::PathBuf;

/// Messages a report panel may send. Anything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command")]
enum PanelMessage {
    #[serde(rename = "jumpToLine", rename_all = "camelCase")]
    JumpToLine { file_path: PathBuf, line_number: i64 },
}

/// Request to show a source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub file_path: PathBuf,
    /// 1-based, as sent by the panel
    pub line_number: i64,
}

/// Extract a navigation request, or `None` for unrecognized message shapes
pub fn parse_message(message: &serde_json::Value) -> Option<NavigationRequest> {
    match PanelMessage::deserialize(message) {
        Ok(PanelMessage::JumpToLine {
            file_path,
            line_number,
        }) => Some(NavigationRequest {
            file_path,
            line_number,
        }),
        Err(e) => {
            debug!("Ignoring panel message {}: {}", message, e);
            None
        }
    }
}

/// Convert a 1-based line number to a 0-based index inside `line_count` lines
pub fn target_line(line_number: i64, line_count: usize) -> usize {
    let last = line_count.saturating_sub(1);
    let index = usize::try_from(line_number.saturating_sub(1)).unwrap_or(0);
    index.min(last)
}

/// Open the requested document and reveal the clamped line
pub fn navigate(
    navigator: &dyn DocumentNavigator,
    request: &NavigationRequest,
) -> Result<usize, HostError> {
    let line_count = navigator.open_document(&request.file_path)?;
    let line = target_line(request.line_number, line_count);
    navigator.reveal_line(&request.file_path, line)?;

    debug!(
        "Revealed {}:{} (requested {})",
        request.file_path.display(),
        line,
        request.line_number
    );
    Ok(line)
}

/// Handle one panel message.
///
/// Returns the revealed 0-based line, or `None` when the message was ignored.
pub fn handle_message(
    navigator: &dyn DocumentNavigator,
    message: &serde_json::Value,
) -> Result<Option<usize>, HostError> {
    match parse_message(message) {
        Some(request) => navigate(navigator, &request).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_jump_to_line() {
        let request = parse_message(&json!({
            "command": "jumpToLine",
            "filePath": "/a.py",
            "lineNumber": 12
        }))
        .unwrap();

        assert_eq!(request.file_path, PathBuf::from("/a.py"));
        assert_eq!(request.line_number, 12);
    }

    #[test]
    fn test_other_shapes_are_ignored() {
        assert!(parse_message(&json!({"command": "openFile", "filePath": "/a.py"})).is_none());
        assert!(parse_message(&json!({"command": "jumpToLine", "filePath": "/a.py"})).is_none());
        assert!(parse_message(&json!("jumpToLine")).is_none());
        assert!(parse_message(&json!({
            "command": "jumpToLine",
            "filePath": "/a.py",
            "lineNumber": "3"
        }))
        .is_none());
    }

    #[test]
    fn test_target_line_clamps() {
        assert_eq!(target_line(1, 5), 0);
        assert_eq!(target_line(5, 5), 4);
        assert_eq!(target_line(100, 5), 4);
        assert_eq!(target_line(0, 5), 0);
        assert_eq!(target_line(-7, 5), 0);
        assert_eq!(target_line(3, 0), 0);
    }
}
