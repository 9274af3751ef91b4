//! OS-level interpreter discovery (`which python3` / `where python`).

use crate::utils::config::{
    POSIX_LOCATOR, POSIX_PYTHON_NAME, PYTHON3_MARKERS, WINDOWS_LOCATOR, WINDOWS_PYTHON_NAME,
};
use crate::utils::error::DiscoveryError;
use log::debug;
use std::process::{Command, Stdio};

/// Platform family, decides which locator command is used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Posix,
}

impl Platform {
    /// Platform family of the running process
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }
}

/// Runs a short-lived command and returns its stdout
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, DiscoveryError>;
}

/// [`CommandRunner`] backed by `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, DiscoveryError> {
        debug!("Running discovery command: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|source| DiscoveryError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(DiscoveryError::NonZeroExit {
                program: program.to_string(),
                code: output.status.code(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Ask the OS for a Python 3 interpreter
///
/// On Windows the first `where python` hit is accepted only when it looks like
/// a Python 3 install. On POSIX the trimmed `which python3` result is accepted
/// as long as it is non-empty.
pub fn discover_interpreter(
    runner: &dyn CommandRunner,
    platform: Platform,
) -> Result<String, DiscoveryError> {
    match platform {
        Platform::Windows => {
            let output = runner.run(WINDOWS_LOCATOR, &[WINDOWS_PYTHON_NAME])?;
            let first = output.lines().next().unwrap_or_default().trim();

            if PYTHON3_MARKERS.iter().any(|marker| first.contains(marker)) {
                Ok(first.to_string())
            } else {
                Err(DiscoveryError::NoMatch(first.to_string()))
            }
        }
        Platform::Posix => {
            let output = runner.run(POSIX_LOCATOR, &[POSIX_PYTHON_NAME])?;
            let path = output.trim();

            if path.is_empty() {
                Err(DiscoveryError::NoMatch(output))
            } else {
                Ok(path.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    impl CommandRunner for Canned {
        fn run(&self, _program: &str, _args: &[&str]) -> Result<String, DiscoveryError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_windows_takes_first_python3_line() {
        let runner = Canned("C:\\Python311\\python3.exe\r\nC:\\Windows\\python.exe\r\n");
        assert_eq!(
            discover_interpreter(&runner, Platform::Windows).unwrap(),
            "C:\\Python311\\python3.exe"
        );
    }

    #[test]
    fn test_windows_rejects_non_python3_hit() {
        let runner = Canned("C:\\Python27\\python.exe\r\n");
        assert!(matches!(
            discover_interpreter(&runner, Platform::Windows),
            Err(DiscoveryError::NoMatch(_))
        ));
    }

    #[test]
    fn test_posix_blank_output_is_no_match() {
        let runner = Canned("  \n");
        assert!(discover_interpreter(&runner, Platform::Posix).is_err());
    }
}
