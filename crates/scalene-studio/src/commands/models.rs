use crate::utils::config::DEFAULT_REPORT_PATH;
use std::path::PathBuf;

/// Arguments for the profile command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ProfileArgs {
    /// Python file to profile
    pub file: PathBuf,

    /// Interpreter to use, as if configured in the Python integration
    pub python: Option<String>,

    /// Force CPU-only profiling
    pub cpu_only: bool,

    /// Kill the profiler after this many seconds
    pub timeout_secs: Option<u64>,

    /// Settings file (TOML)
    pub config: Option<PathBuf>,

    /// Where the report panel writes its HTML
    pub output: PathBuf,

    /// Open the report in the system browser
    pub open: bool,

    /// Read panel messages from stdin after the report is shown
    pub listen: bool,
}

impl Default for ProfileArgs {
    fn default() -> Self {
        Self {
            file: PathBuf::new(),
            python: None,
            cpu_only: false,
            timeout_secs: None,
            config: None,
            output: PathBuf::from(DEFAULT_REPORT_PATH),
            open: false,
            listen: false,
        }
    }
}

/// Arguments for the resolve command
#[derive(Debug, Clone, Default)]
pub struct ResolveArgs {
    /// Interpreter to use, as if configured in the Python integration
    pub python: Option<String>,

    /// Document used for execution-details lookups
    pub file: Option<PathBuf>,

    /// Settings file (TOML)
    pub config: Option<PathBuf>,
}

/// Arguments for the navigate command
#[derive(Debug, Clone, Default)]
pub struct NavigateArgs {
    /// Panel message as JSON
    pub message: String,

    /// Settings file (TOML), for the `[editor]` table
    pub config: Option<PathBuf>,
}
