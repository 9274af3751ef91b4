//! Profile command implementation.
//!
//! The profile command:
//! 1. Loads settings and applies CLI overrides
//! 2. Builds the terminal host and activates the extension
//! 3. Invokes `scalene.profile` on the given file
//! 4. Waits for the session and optionally serves panel messages from stdin

use super::models::ProfileArgs;
use crate::extension::{HostContext, ProfileOutcome, ScaleneExtension};
use crate::host::terminal::{
    terminal_services, ConfiguredLanguageSupport, FixedDocument, HtmlFilePanelFactory,
};
use crate::resolver::SystemCommandRunner;
use crate::session::{ProfilerOptions, SessionState};
use crate::utils::config::PROFILE_COMMAND_ID;
use crate::utils::settings::Settings;
use anyhow::{bail, Context, Result};
use log::{info, warn};
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Execute the profile command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The terminal state of the profiling session
///
/// # Errors
/// * Settings file read/parse failures
/// * Non-Python target
/// * Interpreter spawn failure
/// * Report read or write failure
pub fn execute_profile(args: ProfileArgs) -> Result<SessionState> {
    let start_time = Instant::now();

    let settings = load_settings(args.config.as_deref(), args.python.as_deref())?;
    let mut options = ProfilerOptions::from(&settings);
    options.cpu_only |= args.cpu_only;
    if let Some(secs) = args.timeout_secs {
        options.timeout = Some(Duration::from_secs(secs));
    }

    let panels = Arc::new(HtmlFilePanelFactory::new(&args.output).with_browser(args.open));
    let host = terminal_services(Arc::clone(&panels), settings.editor.clone());
    let mut extension = ScaleneExtension::new(host, options);
    extension.activate();

    let documents = FixedDocument(Some(args.file.clone()));
    let language_support = ConfiguredLanguageSupport::from_settings(&settings.python);
    let context = HostContext {
        documents: &documents,
        settings: &settings,
        language_support: Some(&language_support),
        discovery: &SystemCommandRunner,
    };

    let handle = match extension.invoke(PROFILE_COMMAND_ID, &context)? {
        ProfileOutcome::Started(handle) => handle,
        ProfileOutcome::NotPythonFile(path) => {
            bail!("{} is not a Python file", path.display())
        }
        ProfileOutcome::NoActiveDocument => bail!("No file to profile"),
    };

    let state = handle.wait().context("Profiling session failed")?;
    extension.deactivate();

    if state.is_success() && args.listen {
        listen_for_messages(&panels)?;
    }

    info!(
        "Profile completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(state)
}

/// Load settings, letting `--python` stand in for the integration's interpreter
///
/// **Public** - shared by all commands
pub fn load_settings(config: Option<&Path>, python: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load_or_default(config).context("Failed to load settings")?;
    if let Some(python) = python {
        settings.python.python_path = Some(python.to_string());
    }
    Ok(settings)
}

/// Deliver JSON panel messages read from stdin, one per line.
///
/// **Private** - internal helper for execute_profile
fn listen_for_messages(panels: &HtmlFilePanelFactory) -> Result<()> {
    info!("Listening for panel messages on stdin (one JSON object per line)");

    for line in std::io::stdin().lock().lines() {
        let line = line.context("Failed to read panel message")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<serde_json::Value>(line) {
            Ok(message) => {
                if !panels.deliver(&message) {
                    warn!("No panel is listening for messages");
                }
            }
            Err(e) => warn!("Ignoring malformed panel message: {}", e),
        }
    }

    Ok(())
}
