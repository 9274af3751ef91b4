//! Error types for the entire library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while asking the OS where a Python interpreter lives.
///
/// These never reach the user: the resolver logs them and moves on to the
/// next strategy.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with status {code:?}")]
    NonZeroExit { program: String, code: Option<i32> },

    #[error("No acceptable interpreter in discovery output: {0:?}")]
    NoMatch(String),
}

/// Errors that can occur while setting up or finishing a profiling session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to create temporary directory: {0}")]
    TempDir(#[source] std::io::Error),

    #[error("Failed to start interpreter `{interpreter}`: {source}")]
    Spawn {
        interpreter: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read profile report {}: {source}", .path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to display profile report: {0}")]
    Panel(#[from] HostError),

    #[error("Session already finished as {0}")]
    AlreadyFinished(String),

    #[error("Session supervisor terminated unexpectedly")]
    SupervisorLost,
}

/// Errors reported by host collaborators (documents, panels, editors)
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Cannot open document {}: {source}", .path.display())]
    DocumentOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write report: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Editor launch failed: {0}")]
    EditorLaunch(String),
}

/// Errors that can occur while loading the settings file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read settings file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
}
