//! Profiler command line.

use crate::utils::config::{PROFILER_MODULE, TARGET_SEPARATOR};
use crate::utils::settings::Settings;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Knobs for how sessions are launched
#[derive(Debug, Clone)]
pub struct ProfilerOptions {
    /// Module passed to `-m`
    pub module: String,

    /// Add `--cpu`
    pub cpu_only: bool,

    /// Extra profiler flags, placed before `--no-browser`
    pub extra_flags: Vec<String>,

    /// Kill the profiler after this long
    pub timeout: Option<Duration>,

    /// Leave the temporary report directory behind
    pub keep_artifacts: bool,

    /// Parent of per-session temporary directories
    pub temp_root: PathBuf,
}

impl Default for ProfilerOptions {
    fn default() -> Self {
        Self {
            module: PROFILER_MODULE.to_string(),
            cpu_only: false,
            extra_flags: Vec::new(),
            timeout: None,
            keep_artifacts: false,
            temp_root: std::env::temp_dir(),
        }
    }
}

impl From<&Settings> for ProfilerOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            cpu_only: settings.scalene.cpu_only,
            extra_flags: settings.scalene.flags.clone(),
            timeout: settings.scalene.timeout(),
            keep_artifacts: settings.keep_artifacts,
            ..Self::default()
        }
    }
}

/// Build the interpreter arguments:
/// `-m <module> [--cpu] [flags…] --no-browser --outfile <artifact> --- <target>`
pub fn build_args(options: &ProfilerOptions, artifact: &Path, target: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-m".into(), options.module.as_str().into()];

    if options.cpu_only {
        args.push("--cpu".into());
    }
    args.extend(options.extra_flags.iter().map(OsString::from));

    args.push("--no-browser".into());
    args.push("--outfile".into());
    args.push(artifact.into());
    args.push(TARGET_SEPARATOR.into());
    args.push(target.into());
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_default_invocation_order() {
        let args = build_args(
            &ProfilerOptions::default(),
            Path::new("/tmp/scalene_1/profile-7.html"),
            Path::new("/work/app.py"),
        );

        assert_eq!(
            strings(args),
            vec![
                "-m",
                "scalene",
                "--no-browser",
                "--outfile",
                "/tmp/scalene_1/profile-7.html",
                "---",
                "/work/app.py",
            ]
        );
    }

    #[test]
    fn test_optional_flags_precede_no_browser() {
        let options = ProfilerOptions {
            cpu_only: true,
            extra_flags: vec!["--reduced-profile".to_string()],
            ..ProfilerOptions::default()
        };
        let args = strings(build_args(&options, Path::new("out.html"), Path::new("t.py")));

        assert_eq!(&args[2..5], ["--cpu", "--reduced-profile", "--no-browser"]);
        assert_eq!(args.last().map(String::as_str), Some("t.py"));
    }
}
