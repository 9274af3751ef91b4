//! Interpreter resolution.
//!
//! Decides which Python executable runs the profiler. Strategies are tried
//! in order and the first success wins:
//! 1. Interpreter configured for the active companion integration
//! 2. The integration's execution command for the active document
//! 3. OS discovery (`which` / `where`)
//! 4. The `python3` fallback
//!
//! Resolution never fails; strategy errors are only logged.

pub mod discovery;

pub use discovery::{discover_interpreter, CommandRunner, Platform, SystemCommandRunner};

use crate::host::{ActiveDocumentProvider, LanguageSupport, SettingsReader};
use crate::utils::config::{FALLBACK_INTERPRETER, PYTHON_PATH_KEY};
use log::{debug, info, warn};
use std::fmt;

/// Which strategy produced an interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpreterSource {
    CompanionSetting,
    CompanionExecutionDetails,
    Discovery,
    Fallback,
}

impl fmt::Display for InterpreterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterpreterSource::CompanionSetting => "configured interpreter",
            InterpreterSource::CompanionExecutionDetails => "execution details",
            InterpreterSource::Discovery => "OS discovery",
            InterpreterSource::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// Python executable chosen for one profiling request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterDescriptor {
    pub executable_path: String,
    pub source: InterpreterSource,
}

impl InterpreterDescriptor {
    pub fn new(executable_path: impl Into<String>, source: InterpreterSource) -> Self {
        Self {
            executable_path: executable_path.into(),
            source,
        }
    }
}

/// Resolves the interpreter from host context, re-run for every request
pub struct InterpreterResolver<'a> {
    settings: &'a dyn SettingsReader,
    documents: &'a dyn ActiveDocumentProvider,
    language_support: Option<&'a dyn LanguageSupport>,
    discovery: &'a dyn CommandRunner,
    platform: Platform,
}

impl<'a> InterpreterResolver<'a> {
    pub fn new(
        settings: &'a dyn SettingsReader,
        documents: &'a dyn ActiveDocumentProvider,
        discovery: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            settings,
            documents,
            language_support: None,
            discovery,
            platform: Platform::current(),
        }
    }

    /// Consult a companion language-support integration first
    pub fn with_language_support(mut self, language_support: &'a dyn LanguageSupport) -> Self {
        self.language_support = Some(language_support);
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Resolve the interpreter. Always returns a non-empty path.
    pub fn resolve(&self) -> InterpreterDescriptor {
        let descriptor = self
            .from_companion()
            .or_else(|| self.from_discovery())
            .unwrap_or_else(|| {
                InterpreterDescriptor::new(FALLBACK_INTERPRETER, InterpreterSource::Fallback)
            });

        info!(
            "Using interpreter {} ({})",
            descriptor.executable_path, descriptor.source
        );
        descriptor
    }

    fn from_companion(&self) -> Option<InterpreterDescriptor> {
        let companion = self.language_support?;
        if !companion.is_active() {
            debug!("Python integration present but inactive");
            return None;
        }

        if let Some(path) = non_empty(self.settings.get_string(PYTHON_PATH_KEY)) {
            return Some(InterpreterDescriptor::new(
                path,
                InterpreterSource::CompanionSetting,
            ));
        }

        let document = self.documents.active_document();
        let command = companion.execution_command(document.as_deref())?;
        let first = non_empty(command.into_iter().next())?;
        Some(InterpreterDescriptor::new(
            first,
            InterpreterSource::CompanionExecutionDetails,
        ))
    }

    fn from_discovery(&self) -> Option<InterpreterDescriptor> {
        match discover_interpreter(self.discovery, self.platform) {
            Ok(path) => Some(InterpreterDescriptor::new(path, InterpreterSource::Discovery)),
            Err(e) => {
                warn!("Error finding Python path: {}", e);
                None
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
