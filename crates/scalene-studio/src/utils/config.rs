//! Configuration and constants for the profiler integration.

use std::time::Duration;

/// Python module launched with `-m`
pub const PROFILER_MODULE: &str = "scalene";

/// Only files with this suffix are profiled
pub const SOURCE_SUFFIX: &str = ".py";

/// Interpreter used when every resolution strategy fails.
///
/// This may name an interpreter without Scalene installed; failure messages
/// always name the interpreter so that case is recognizable.
pub const FALLBACK_INTERPRETER: &str = "python3";

/// Everything after this argument is the profiling target, not a profiler flag
pub const TARGET_SEPARATOR: &str = "---";

/// Stable identifier of the profile command
pub const PROFILE_COMMAND_ID: &str = "scalene.profile";

/// Settings key holding the companion integration's interpreter path
pub const PYTHON_PATH_KEY: &str = "python.pythonPath";

/// Prefix of the per-session temporary directory
pub const TEMP_DIR_PREFIX: &str = "scalene_";

/// How often the supervisor checks for exit, cancellation and deadline
pub const SUPERVISOR_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long output pumps may keep draining once the profiler has ended
pub const OUTPUT_DRAIN_GRACE: Duration = Duration::from_secs(1);

/// How often a finished session checks whether its pumps are done
pub const PUMP_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Number of trailing stderr lines kept for failure diagnostics
pub const STDERR_TAIL_LINES: usize = 20;

/// Default location for the rendered report in the terminal host
pub const DEFAULT_REPORT_PATH: &str = "artifacts/profile.html";

// Discovery commands per platform family
pub const WINDOWS_LOCATOR: &str = "where";
pub const WINDOWS_PYTHON_NAME: &str = "python";
pub const POSIX_LOCATOR: &str = "which";
pub const POSIX_PYTHON_NAME: &str = "python3";

/// Substrings marking a Windows `where python` hit as a Python 3 install
pub const PYTHON3_MARKERS: &[&str] = &["Python3", "python3"];
