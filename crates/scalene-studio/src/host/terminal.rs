//! Terminal host used by the `scalene-run` CLI.
//!
//! Profiler output goes to stdout, notifications are coloured lines, the
//! display panel is an HTML file on disk and navigation prints `file:line`
//! (optionally launching a configured editor).

use super::{
    ActiveDocumentProvider, DisplayPanel, DocumentNavigator, HostServices, LanguageSupport,
    MessageHandler, MessagePresenter, OutputLog, PanelFactory,
};
use crate::output::write_html;
use crate::utils::error::HostError;
use crate::utils::settings::{EditorSettings, PythonSettings};
use colored::*;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex, PoisonError};

/// The file named on the command line is the active document
#[derive(Debug, Clone, Default)]
pub struct FixedDocument(pub Option<PathBuf>);

impl ActiveDocumentProvider for FixedDocument {
    fn active_document(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// Companion integration described by the `[python]` settings table.
///
/// It counts as active whenever that table configures something.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLanguageSupport {
    active: bool,
    exec_command: Option<Vec<String>>,
}

impl ConfiguredLanguageSupport {
    pub fn from_settings(python: &PythonSettings) -> Self {
        Self {
            active: python.is_configured(),
            exec_command: python.exec_command.clone(),
        }
    }
}

impl LanguageSupport for ConfiguredLanguageSupport {
    fn is_active(&self) -> bool {
        self.active
    }

    fn execution_command(&self, _document: Option<&Path>) -> Option<Vec<String>> {
        self.exec_command.clone()
    }
}

/// Streams profiler output to stdout
#[derive(Debug, Default)]
pub struct TerminalLog;

impl OutputLog for TerminalLog {
    fn append_line(&self, line: &str) {
        println!("{} {}", "│".dimmed(), line);
    }
}

#[derive(Debug, Default)]
pub struct TerminalMessages;

impl MessagePresenter for TerminalMessages {
    fn info(&self, message: &str) {
        println!("{} {}", "ℹ".cyan(), message);
    }

    fn warning(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message.yellow());
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message.red());
    }
}

type Inbox = Arc<Mutex<Option<MessageHandler>>>;

/// Panels rendered as HTML files at a fixed location.
///
/// The most recent panel's message handler is kept so that messages read
/// from outside (e.g. stdin) can be delivered with [`HtmlFilePanelFactory::deliver`].
#[derive(Clone, Default)]
pub struct HtmlFilePanelFactory {
    output: PathBuf,
    open_in_browser: bool,
    inbox: Inbox,
}

impl std::fmt::Debug for HtmlFilePanelFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlFilePanelFactory")
            .field("output", &self.output)
            .field("open_in_browser", &self.open_in_browser)
            .finish_non_exhaustive()
    }
}

impl HtmlFilePanelFactory {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            ..Self::default()
        }
    }

    /// Open each report in the system browser once written
    pub fn with_browser(mut self, open_in_browser: bool) -> Self {
        self.open_in_browser = open_in_browser;
        self
    }

    pub fn report_path(&self) -> &Path {
        &self.output
    }

    /// Hand `message` to the current panel's handler.
    ///
    /// Returns `false` when no panel has registered a handler yet.
    pub fn deliver(&self, message: &serde_json::Value) -> bool {
        let inbox = self.inbox.lock().unwrap_or_else(PoisonError::into_inner);
        match inbox.as_ref() {
            Some(handler) => {
                handler(message);
                true
            }
            None => false,
        }
    }
}

impl PanelFactory for HtmlFilePanelFactory {
    fn create_panel(&self, title: &str) -> Result<Box<dyn DisplayPanel>, HostError> {
        debug!("Creating panel '{}' at {}", title, self.output.display());
        Ok(Box::new(HtmlFilePanel {
            path: self.output.clone(),
            open_in_browser: self.open_in_browser,
            inbox: Arc::clone(&self.inbox),
        }))
    }
}

struct HtmlFilePanel {
    path: PathBuf,
    open_in_browser: bool,
    inbox: Inbox,
}

impl DisplayPanel for HtmlFilePanel {
    fn set_html(&mut self, html: &str) -> Result<(), HostError> {
        write_html(html, &self.path)?;
        println!(
            "📊 Report written to {}",
            self.path.display().to_string().cyan()
        );

        if self.open_in_browser {
            if let Err(e) = open::that(&self.path) {
                warn!("Failed to open {} in a browser: {}", self.path.display(), e);
            }
        }
        Ok(())
    }

    fn on_message(&mut self, handler: MessageHandler) {
        *self.inbox.lock().unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }
}

/// Navigates by reading files from disk and printing or opening locations
#[derive(Debug, Clone, Default)]
pub struct FileNavigator {
    editor: EditorSettings,
}

impl FileNavigator {
    pub fn new(editor: EditorSettings) -> Self {
        Self { editor }
    }

    fn launch_editor(&self, command: &str, path: &Path, line: usize) -> Result<(), HostError> {
        let file = path.display().to_string();
        let line = line.to_string();
        let args: Vec<String> = if self.editor.args.is_empty() {
            vec![file]
        } else {
            self.editor
                .args
                .iter()
                .map(|arg| arg.replace("{file}", &file).replace("{line}", &line))
                .collect()
        };

        debug!("Launching editor: {} {}", command, args.join(" "));
        Command::new(command)
            .args(&args)
            .spawn()
            .map(|_| ())
            .map_err(|e| HostError::EditorLaunch(format!("{}: {}", command, e)))
    }
}

impl DocumentNavigator for FileNavigator {
    fn open_document(&self, path: &Path) -> Result<usize, HostError> {
        let contents = std::fs::read_to_string(path).map_err(|source| HostError::DocumentOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(contents.lines().count().max(1))
    }

    fn reveal_line(&self, path: &Path, line_index: usize) -> Result<(), HostError> {
        let line = line_index + 1;
        println!("{}:{}", path.display(), line);

        match &self.editor.command {
            Some(command) => self.launch_editor(command, path, line),
            None => Ok(()),
        }
    }
}

/// Assemble the full terminal host
pub fn terminal_services(
    panels: Arc<HtmlFilePanelFactory>,
    editor: EditorSettings,
) -> HostServices {
    HostServices {
        log: Arc::new(TerminalLog),
        messages: Arc::new(TerminalMessages),
        panels,
        navigator: Arc::new(FileNavigator::new(editor)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_panel_writes_report_and_keeps_handler() {
        let dir = tempfile::tempdir().unwrap();
        let factory = HtmlFilePanelFactory::new(dir.path().join("out/report.html"));
        assert!(!factory.deliver(&json!({})));

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        {
            let mut panel = factory.create_panel("Scalene: t.py").unwrap();
            panel.on_message(Box::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }));
            panel.set_html("<html>OK</html>").unwrap();
        }

        assert_eq!(
            std::fs::read_to_string(factory.report_path()).unwrap(),
            "<html>OK</html>"
        );
        assert!(factory.deliver(&json!({"command": "jumpToLine"})));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_file_navigator_counts_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.py");
        std::fs::write(&path, "a = 1\nb = 2\nc = 3\n").unwrap();

        let navigator = FileNavigator::default();
        assert_eq!(navigator.open_document(&path).unwrap(), 3);
        assert!(navigator.open_document(&dir.path().join("missing.py")).is_err());
    }

    #[test]
    fn test_language_support_follows_python_table() {
        let inactive = ConfiguredLanguageSupport::from_settings(&PythonSettings::default());
        assert!(!inactive.is_active());

        let active = ConfiguredLanguageSupport::from_settings(&PythonSettings {
            python_path: None,
            exec_command: Some(vec!["/venv/bin/python".to_string()]),
        });
        assert!(active.is_active());
        assert_eq!(
            active.execution_command(None),
            Some(vec!["/venv/bin/python".to_string()])
        );
    }
}
