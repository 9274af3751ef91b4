//! In-memory host fakes shared by the integration tests.
#![allow(dead_code)]

use scalene_studio::host::{
    ActiveDocumentProvider, DisplayPanel, DocumentNavigator, HostServices, LanguageSupport,
    MessageHandler, MessagePresenter, OutputLog, PanelFactory, SettingsReader,
};
use scalene_studio::resolver::CommandRunner;
use scalene_studio::utils::error::{DiscoveryError, HostError};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub struct FakeDocument(pub Option<PathBuf>);

impl FakeDocument {
    pub fn open(path: &str) -> Self {
        Self(Some(PathBuf::from(path)))
    }
}

impl ActiveDocumentProvider for FakeDocument {
    fn active_document(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

#[derive(Default)]
pub struct FakeSettings(pub HashMap<String, String>);

impl FakeSettings {
    pub fn with(key: &str, value: &str) -> Self {
        Self(HashMap::from([(key.to_string(), value.to_string())]))
    }
}

impl SettingsReader for FakeSettings {
    fn get_string(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

pub struct FakeCompanion {
    pub active: bool,
    pub exec_command: Option<Vec<String>>,
}

impl LanguageSupport for FakeCompanion {
    fn is_active(&self) -> bool {
        self.active
    }

    fn execution_command(&self, _document: Option<&Path>) -> Option<Vec<String>> {
        self.exec_command.clone()
    }
}

/// Discovery command stub that counts how often it was asked
pub struct FakeDiscovery {
    response: fn() -> Result<String, DiscoveryError>,
    calls: Cell<usize>,
}

impl FakeDiscovery {
    pub fn returning(response: fn() -> Result<String, DiscoveryError>) -> Self {
        Self {
            response,
            calls: Cell::new(0),
        }
    }

    pub fn which_python3() -> Self {
        Self::returning(|| Ok("/usr/bin/python3\n".to_string()))
    }

    pub fn failing() -> Self {
        Self::returning(|| {
            Err(DiscoveryError::NonZeroExit {
                program: "which".to_string(),
                code: Some(1),
            })
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl CommandRunner for FakeDiscovery {
    fn run(&self, _program: &str, _args: &[&str]) -> Result<String, DiscoveryError> {
        self.calls.set(self.calls.get() + 1);
        (self.response)()
    }
}

#[derive(Default)]
pub struct FakeLog(pub Mutex<Vec<String>>);

impl FakeLog {
    pub fn lines(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl OutputLog for FakeLog {
    fn append_line(&self, line: &str) {
        self.0.lock().unwrap().push(line.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

#[derive(Default)]
pub struct FakeMessages(pub Mutex<Vec<(Level, String)>>);

impl FakeMessages {
    pub fn at(&self, level: Level) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.at(Level::Error)
    }
}

impl MessagePresenter for FakeMessages {
    fn info(&self, message: &str) {
        self.0.lock().unwrap().push((Level::Info, message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.0.lock().unwrap().push((Level::Warning, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.0.lock().unwrap().push((Level::Error, message.to_string()));
    }
}

#[derive(Default)]
pub struct PanelState {
    pub title: String,
    pub html: Option<String>,
    pub handler: Option<MessageHandler>,
}

struct FakePanel(Arc<Mutex<PanelState>>);

impl DisplayPanel for FakePanel {
    fn set_html(&mut self, html: &str) -> Result<(), HostError> {
        self.0.lock().unwrap().html = Some(html.to_string());
        Ok(())
    }

    fn on_message(&mut self, handler: MessageHandler) {
        self.0.lock().unwrap().handler = Some(handler);
    }
}

#[derive(Default)]
pub struct FakePanels(pub Mutex<Vec<Arc<Mutex<PanelState>>>>);

impl FakePanels {
    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn html(&self, index: usize) -> Option<String> {
        self.0.lock().unwrap()[index].lock().unwrap().html.clone()
    }

    pub fn title(&self, index: usize) -> String {
        self.0.lock().unwrap()[index].lock().unwrap().title.clone()
    }

    /// Post a message from panel `index` to its registered handler
    pub fn post(&self, index: usize, message: &serde_json::Value) {
        let panel = Arc::clone(&self.0.lock().unwrap()[index]);
        let state = panel.lock().unwrap();
        let handler = state.handler.as_ref().expect("panel has no handler");
        handler(message);
    }
}

impl PanelFactory for FakePanels {
    fn create_panel(&self, title: &str) -> Result<Box<dyn DisplayPanel>, HostError> {
        let state = Arc::new(Mutex::new(PanelState {
            title: title.to_string(),
            ..PanelState::default()
        }));
        self.0.lock().unwrap().push(Arc::clone(&state));
        Ok(Box::new(FakePanel(state)))
    }
}

/// Every document has `line_count` lines
pub struct FakeNavigator {
    pub line_count: usize,
    pub revealed: Mutex<Vec<(PathBuf, usize)>>,
}

impl FakeNavigator {
    pub fn revealed(&self) -> Vec<(PathBuf, usize)> {
        self.revealed.lock().unwrap().clone()
    }
}

impl DocumentNavigator for FakeNavigator {
    fn open_document(&self, _path: &Path) -> Result<usize, HostError> {
        Ok(self.line_count)
    }

    fn reveal_line(&self, path: &Path, line_index: usize) -> Result<(), HostError> {
        self.revealed
            .lock()
            .unwrap()
            .push((path.to_path_buf(), line_index));
        Ok(())
    }
}

pub struct FakeHost {
    pub log: Arc<FakeLog>,
    pub messages: Arc<FakeMessages>,
    pub panels: Arc<FakePanels>,
    pub navigator: Arc<FakeNavigator>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::with_line_count(5)
    }

    pub fn with_line_count(line_count: usize) -> Self {
        Self {
            log: Arc::new(FakeLog::default()),
            messages: Arc::new(FakeMessages::default()),
            panels: Arc::new(FakePanels::default()),
            navigator: Arc::new(FakeNavigator {
                line_count,
                revealed: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn services(&self) -> HostServices {
        HostServices {
            log: self.log.clone(),
            messages: self.messages.clone(),
            panels: self.panels.clone(),
            navigator: self.navigator.clone(),
        }
    }
}

/// Write a shell script used as the profiler "module" with `sh -m <script>`.
///
/// The script sees the profiler arguments as `$1..$5`:
/// `--no-browser --outfile <artifact> --- <target>`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}
