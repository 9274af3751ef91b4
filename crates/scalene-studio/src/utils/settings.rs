//! Read-only settings store backed by a TOML file.

use crate::host::SettingsReader;
use crate::utils::config::PYTHON_PATH_KEY;
use crate::utils::error::ConfigError;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Complete settings file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Keep the profiler's temporary directory instead of deleting it
    #[serde(default)]
    pub keep_artifacts: bool,

    /// Companion Python integration settings
    #[serde(default)]
    pub python: PythonSettings,

    /// Profiler invocation settings
    #[serde(default)]
    pub scalene: ScaleneSettings,

    /// Editor used by the terminal host for navigation
    #[serde(default)]
    pub editor: EditorSettings,
}

/// `[python]` table, shaped like the Python language integration's settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PythonSettings {
    /// Explicitly configured interpreter
    pub python_path: Option<String>,

    /// Command the integration would use to run the active document
    pub exec_command: Option<Vec<String>>,
}

impl PythonSettings {
    /// Whether the section configures anything at all
    pub fn is_configured(&self) -> bool {
        self.python_path.is_some() || self.exec_command.is_some()
    }
}

/// `[scalene]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScaleneSettings {
    /// Pass `--cpu` (CPU-only profiling)
    #[serde(default)]
    pub cpu_only: bool,

    /// Extra profiler flags, inserted before `--no-browser`
    #[serde(default)]
    pub flags: Vec<String>,

    /// Kill the profiler after this many seconds
    pub timeout_secs: Option<u64>,
}

impl ScaleneSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// `[editor]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditorSettings {
    /// Editor executable, e.g. `code`
    pub command: Option<String>,

    /// Arguments with `{file}` and `{line}` placeholders (line is 1-based)
    #[serde(default)]
    pub args: Vec<String>,
}

impl Settings {
    /// Load settings from a TOML file
    ///
    /// # Errors
    /// * `ConfigError::Read` - If the file cannot be read
    /// * `ConfigError::Parse` - If the TOML is invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading settings from: {}", path.display());

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&contents)
    }

    /// Parse settings from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

impl SettingsReader for Settings {
    fn get_string(&self, key: &str) -> Option<String> {
        match key {
            PYTHON_PATH_KEY => self.python.python_path.clone(),
            _ => None,
        }
    }
}
