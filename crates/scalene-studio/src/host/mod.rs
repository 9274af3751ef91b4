//! Narrow capability traits for everything the host environment provides.
//!
//! The resolver, runner and command handler only see these traits, so a real
//! editor, the terminal host in [`terminal`] or a test fake can be plugged in.

pub mod terminal;

use crate::utils::error::HostError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Gives access to the document the user is looking at
pub trait ActiveDocumentProvider {
    /// Filesystem path of the active document, if any
    fn active_document(&self) -> Option<PathBuf>;
}

/// Read-only view of the host's settings store
pub trait SettingsReader {
    /// Look up a dotted key such as `python.pythonPath`
    fn get_string(&self, key: &str) -> Option<String>;
}

/// Companion Python language-support integration
pub trait LanguageSupport {
    /// Whether the integration is installed and currently active
    fn is_active(&self) -> bool;

    /// Command the integration would use to execute `document`.
    ///
    /// `None` when the integration has no execution-details capability.
    fn execution_command(&self, document: Option<&Path>) -> Option<Vec<String>>;
}

/// Append-only log surface for profiler output
pub trait OutputLog: Send + Sync {
    fn append_line(&self, line: &str);
}

/// User-visible notifications
pub trait MessagePresenter: Send + Sync {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Callback receiving messages posted by a display panel
pub type MessageHandler = Box<dyn Fn(&serde_json::Value) + Send + Sync>;

/// A panel rendering raw HTML and posting messages back to the host
pub trait DisplayPanel: Send {
    fn set_html(&mut self, html: &str) -> Result<(), HostError>;

    /// Install the receiver for messages coming from the panel
    fn on_message(&mut self, handler: MessageHandler);
}

/// Creates display panels
pub trait PanelFactory: Send + Sync {
    fn create_panel(&self, title: &str) -> Result<Box<dyn DisplayPanel>, HostError>;
}

/// Document-open and editor-reveal primitives
pub trait DocumentNavigator: Send + Sync {
    /// Open `path` and return its line count
    fn open_document(&self, path: &Path) -> Result<usize, HostError>;

    /// Put the cursor at the start of `line_index` (0-based) and scroll to it
    fn reveal_line(&self, path: &Path, line_index: usize) -> Result<(), HostError>;
}

/// Host collaborators shared with session worker threads
#[derive(Clone)]
pub struct HostServices {
    pub log: Arc<dyn OutputLog>,
    pub messages: Arc<dyn MessagePresenter>,
    pub panels: Arc<dyn PanelFactory>,
    pub navigator: Arc<dyn DocumentNavigator>,
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices").finish_non_exhaustive()
    }
}
