//! Extension lifecycle and the `scalene.profile` command.
//!
//! `activate` registers the command, `invoke` runs it against the host's
//! active document, and `deactivate` kills any profiler still running.

use crate::host::{ActiveDocumentProvider, HostServices, LanguageSupport, SettingsReader};
use crate::resolver::{CommandRunner, InterpreterResolver, Platform};
use crate::session::{
    CancellationToken, ProfilerOptions, ProfilingRequest, SessionHandle, SessionRunner,
    SessionWatch,
};
use crate::utils::config::PROFILE_COMMAND_ID;
use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// Commands contributed by the extension
pub const COMMANDS: &[&str] = &[PROFILE_COMMAND_ID];

/// Read-only host context consulted on each invocation
pub struct HostContext<'a> {
    pub documents: &'a dyn ActiveDocumentProvider,
    pub settings: &'a dyn SettingsReader,
    pub language_support: Option<&'a dyn LanguageSupport>,
    pub discovery: &'a dyn CommandRunner,
}

/// What a profile command invocation did
#[derive(Debug)]
pub enum ProfileOutcome {
    /// No document is open; nothing to do
    NoActiveDocument,
    /// The active document is not Python source
    NotPythonFile(PathBuf),
    /// A profiler is running
    Started(SessionHandle),
}

#[derive(Debug)]
pub struct ScaleneExtension {
    host: HostServices,
    runner: SessionRunner,
    platform: Platform,
    active: bool,
    sessions: Mutex<Vec<SessionWatch>>,
}

impl ScaleneExtension {
    pub fn new(host: HostServices, options: ProfilerOptions) -> Self {
        Self {
            runner: SessionRunner::new(host.clone(), options),
            host,
            platform: Platform::current(),
            active: false,
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Use another platform family for interpreter discovery
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Register the extension's commands and return their identifiers
    pub fn activate(&mut self) -> &'static [&'static str] {
        self.active = true;
        info!("Activated, registered commands: {}", COMMANDS.join(", "));
        COMMANDS
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run a registered command by identifier
    pub fn invoke(&self, command_id: &str, context: &HostContext<'_>) -> Result<ProfileOutcome> {
        if !self.active {
            bail!("Extension is not active");
        }

        match command_id {
            PROFILE_COMMAND_ID => self.profile_active_document(context),
            other => bail!("Unknown command: {}", other),
        }
    }

    /// Profile the active document if it is a Python file
    pub fn profile_active_document(&self, context: &HostContext<'_>) -> Result<ProfileOutcome> {
        let Some(path) = context.documents.active_document() else {
            debug!("No active document, nothing to profile");
            return Ok(ProfileOutcome::NoActiveDocument);
        };

        let Some(request) = ProfilingRequest::for_file(&path) else {
            self.host
                .messages
                .info(&format!("Scalene: {} is not a Python file.", path.display()));
            return Ok(ProfileOutcome::NotPythonFile(path));
        };

        self.host
            .messages
            .info(&format!("Scalene: now profiling {}", path.display()));

        let mut resolver =
            InterpreterResolver::new(context.settings, context.documents, context.discovery)
                .with_platform(self.platform);
        if let Some(language_support) = context.language_support {
            resolver = resolver.with_language_support(language_support);
        }
        let interpreter = resolver.resolve();

        let handle = self
            .runner
            .run(request, interpreter, CancellationToken::new())
            .with_context(|| format!("Failed to start profiling {}", path.display()))?;

        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|watch| !watch.is_finished());
        sessions.push(handle.watch());
        Ok(ProfileOutcome::Started(handle))
    }

    /// Number of sessions started here that have not finished yet
    pub fn running_sessions(&self) -> usize {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|watch| !watch.is_finished());
        sessions.len()
    }

    /// Cancel every session still running.
    ///
    /// Returns how many sessions were asked to stop.
    pub fn deactivate(&mut self) -> usize {
        self.active = false;
        let running: Vec<SessionWatch> = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .filter(|watch| !watch.is_finished())
            .collect();

        for watch in &running {
            watch.cancel();
        }
        if !running.is_empty() {
            warn!("Deactivated with {} session(s) cancelled", running.len());
        }
        running.len()
    }
}
