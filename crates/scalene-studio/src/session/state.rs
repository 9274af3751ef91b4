//! Profiling request and session lifecycle.
//!
//! A session starts `Running` and moves to exactly one terminal state when
//! the supervisor reports how the subprocess ended.

use crate::resolver::InterpreterDescriptor;
use crate::utils::config::SOURCE_SUFFIX;
use crate::utils::error::SessionError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Whether `path` has the Python source suffix
pub fn is_python_file(path: &Path) -> bool {
    path.to_string_lossy().ends_with(SOURCE_SUFFIX)
}

/// A file the user asked to profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilingRequest {
    pub target_file: PathBuf,
}

impl ProfilingRequest {
    /// `None` unless `path` is a Python source file
    pub fn for_file(path: impl Into<PathBuf>) -> Option<Self> {
        let target_file = path.into();
        is_python_file(&target_file).then_some(Self { target_file })
    }
}

/// How the supervisor saw the subprocess end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Process exited on its own; `None` when killed by a signal
    Exited(Option<i32>),
    Cancelled,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Succeeded { artifact: PathBuf },
    Failed { exit_code: Option<i32> },
    Cancelled,
    TimedOut,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Running)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SessionState::Succeeded { .. })
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Running => f.write_str("running"),
            SessionState::Succeeded { artifact } => {
                write!(f, "succeeded ({})", artifact.display())
            }
            SessionState::Failed {
                exit_code: Some(code),
            } => write!(f, "failed with exit code {}", code),
            SessionState::Failed { exit_code: None } => {
                f.write_str("failed (terminated by signal)")
            }
            SessionState::Cancelled => f.write_str("cancelled"),
            SessionState::TimedOut => f.write_str("timed out"),
        }
    }
}

/// One profiler run
#[derive(Debug)]
pub struct ProfilingSession {
    id: u64,
    request: ProfilingRequest,
    interpreter: InterpreterDescriptor,
    artifact_path: PathBuf,
    state: SessionState,
}

impl ProfilingSession {
    /// Track a freshly spawned profiler
    pub fn start(
        request: ProfilingRequest,
        interpreter: InterpreterDescriptor,
        artifact_path: PathBuf,
    ) -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            request,
            interpreter,
            artifact_path,
            state: SessionState::Running,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn request(&self) -> &ProfilingRequest {
        &self.request
    }

    pub fn interpreter(&self) -> &InterpreterDescriptor {
        &self.interpreter
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Move to the terminal state for `outcome`.
    ///
    /// # Errors
    /// * `SessionError::AlreadyFinished` - If the session already left `Running`
    pub fn finish(&mut self, outcome: ExitOutcome) -> Result<&SessionState, SessionError> {
        if self.state.is_terminal() {
            return Err(SessionError::AlreadyFinished(self.state.to_string()));
        }

        self.state = match outcome {
            ExitOutcome::Exited(Some(0)) => SessionState::Succeeded {
                artifact: self.artifact_path.clone(),
            },
            ExitOutcome::Exited(exit_code) => SessionState::Failed { exit_code },
            ExitOutcome::Cancelled => SessionState::Cancelled,
            ExitOutcome::TimedOut => SessionState::TimedOut,
        };
        Ok(&self.state)
    }
}
