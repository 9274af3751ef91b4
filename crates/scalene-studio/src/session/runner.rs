//! Profiling session runner.
//!
//! `run` spawns the profiler and returns at once. A supervisor thread
//! waits for the exit, then either shows the report on a new panel or tells
//! the user why it could not.

use super::artifact::ScopedArtifact;
use super::invocation::{build_args, ProfilerOptions};
use super::process::{
    collect_stderr_tail, join_within, pump_stdout, supervise, CancellationToken,
};
use super::state::{ExitOutcome, ProfilingRequest, ProfilingSession, SessionState};
use crate::host::HostServices;
use crate::navigation;
use crate::resolver::InterpreterDescriptor;
use crate::utils::config::OUTPUT_DRAIN_GRACE;
use crate::utils::error::SessionError;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Launches profiling sessions against a host
#[derive(Debug, Clone)]
pub struct SessionRunner {
    host: HostServices,
    options: ProfilerOptions,
}

/// Cancel access to a session that outlives its [`SessionHandle`]
#[derive(Debug, Clone)]
pub struct SessionWatch {
    cancel: CancellationToken,
    finished: Arc<AtomicBool>,
}

impl SessionWatch {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Whether the session has reached its terminal state
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

/// A session in flight
#[derive(Debug)]
pub struct SessionHandle {
    id: u64,
    artifact_path: PathBuf,
    watch: SessionWatch,
    worker: JoinHandle<Result<SessionState, SessionError>>,
}

impl SessionHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Kill the profiler if it is still running
    pub fn cancel(&self) {
        self.watch.cancel();
    }

    pub fn watch(&self) -> SessionWatch {
        self.watch.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Block until the session reaches its terminal state
    pub fn wait(self) -> Result<SessionState, SessionError> {
        self.worker
            .join()
            .map_err(|_| SessionError::SupervisorLost)?
    }
}

impl SessionRunner {
    pub fn new(host: HostServices, options: ProfilerOptions) -> Self {
        Self { host, options }
    }

    pub fn options(&self) -> &ProfilerOptions {
        &self.options
    }

    /// Start profiling `request` with `interpreter`.
    ///
    /// Setup failures (temp directory, spawn) are shown to the user and
    /// returned; everything after the spawn is reported through the handle.
    pub fn run(
        &self,
        request: ProfilingRequest,
        interpreter: InterpreterDescriptor,
        cancel: CancellationToken,
    ) -> Result<SessionHandle, SessionError> {
        self.start(request, interpreter, cancel).map_err(|e| {
            self.host.messages.error(&format!("Scalene: {}", e));
            e
        })
    }

    fn start(
        &self,
        request: ProfilingRequest,
        interpreter: InterpreterDescriptor,
        cancel: CancellationToken,
    ) -> Result<SessionHandle, SessionError> {
        let artifact =
            ScopedArtifact::allocate(&self.options.temp_root, self.options.keep_artifacts)?;
        let args = build_args(&self.options, artifact.path(), &request.target_file);
        debug!("Invoking {} {:?}", interpreter.executable_path, args);

        let mut child = Command::new(&interpreter.executable_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SessionError::Spawn {
                interpreter: interpreter.executable_path.clone(),
                source,
            })?;

        let session = ProfilingSession::start(request, interpreter, artifact.path().to_path_buf());
        let id = session.id();
        let artifact_path = session.artifact_path().to_path_buf();
        info!(
            "Session {} started profiler (pid {}) for {}",
            id,
            child.id(),
            session.request().target_file.display()
        );

        let stdout = child
            .stdout
            .take()
            .map(|out| pump_stdout(out, Arc::clone(&self.host.log)));
        let stderr = child.stderr.take().map(collect_stderr_tail);
        let deadline = self.options.timeout.map(|t| Instant::now() + t);

        let host = self.host.clone();
        let token = cancel.clone();
        let finished = Arc::new(AtomicBool::new(false));
        let done = Arc::clone(&finished);
        let worker = thread::spawn(move || {
            let started = Instant::now();
            let outcome = supervise(&mut child, &token, deadline);
            debug!(
                "Session {} ended as {:?} after {:.2}s",
                id,
                outcome,
                started.elapsed().as_secs_f64()
            );

            // Forward what is left of the output before announcing the
            // result, without waiting on pipes held by surviving descendants
            if let Some(pump) = stdout {
                join_within(pump, OUTPUT_DRAIN_GRACE);
            }
            let stderr_tail = stderr
                .and_then(|t| join_within(t, OUTPUT_DRAIN_GRACE))
                .unwrap_or_default();

            let result = finish_session(&host, session, artifact, outcome, &stderr_tail);
            done.store(true, Ordering::SeqCst);
            result
        });

        Ok(SessionHandle {
            id,
            artifact_path,
            watch: SessionWatch { cancel, finished },
            worker,
        })
    }
}

/// Record the exit outcome and publish the result to the host.
///
/// The artifact directory is released when this returns, whatever the outcome.
///
/// # Errors
/// * `SessionError::AlreadyFinished` - If the session was already finished
/// * `SessionError::ArtifactRead` - If the report is missing or not text
/// * `SessionError::Panel` - If the panel cannot be created or filled
pub fn finish_session(
    host: &HostServices,
    mut session: ProfilingSession,
    artifact: ScopedArtifact,
    outcome: ExitOutcome,
    stderr_tail: &[String],
) -> Result<SessionState, SessionError> {
    let state = session.finish(outcome)?.clone();
    let target = session.request().target_file.display().to_string();
    let interpreter = session.interpreter().executable_path.clone();

    match &state {
        SessionState::Succeeded { .. } => {
            if let Err(e) = publish_report(host, &session, &artifact) {
                host.messages.error(&format!("Scalene: {}", e));
                return Err(e);
            }
        }
        SessionState::Failed { exit_code } => {
            for line in stderr_tail {
                warn!("scalene stderr: {}", line);
            }
            let code = exit_code.map_or_else(
                || "none (terminated by signal)".to_string(),
                |c| c.to_string(),
            );
            host.messages.error(&format!(
                "Scalene: process exited with code: {} (interpreter: {})",
                code, interpreter
            ));
        }
        SessionState::Cancelled => {
            host.messages
                .warning(&format!("Scalene: profiling of {} was cancelled", target));
        }
        SessionState::TimedOut => {
            host.messages.error(&format!(
                "Scalene: profiling of {} timed out (interpreter: {})",
                target, interpreter
            ));
        }
        SessionState::Running => {}
    }

    info!("Session {} {}", session.id(), state);
    Ok(state)
}

fn publish_report(
    host: &HostServices,
    session: &ProfilingSession,
    artifact: &ScopedArtifact,
) -> Result<(), SessionError> {
    let html = artifact.read_report()?;
    debug!("Read report ({} bytes)", html.len());

    let title = format!("Scalene: {}", session.request().target_file.display());
    let mut panel = host.panels.create_panel(&title)?;

    let navigator = Arc::clone(&host.navigator);
    let messages = Arc::clone(&host.messages);
    panel.on_message(Box::new(move |message| {
        match navigation::handle_message(navigator.as_ref(), message) {
            Ok(Some(line)) => debug!("Jumped to line index {}", line),
            Ok(None) => {}
            Err(e) => messages.error(&format!("Scalene: {}", e)),
        }
    }));

    panel.set_html(&html)?;
    Ok(())
}
