//! Scalene Studio CLI
//!
//! Runs the Scalene Python profiler against a file, writes its HTML report
//! and resolves report navigation requests back to source lines.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use scalene_studio::commands::{
    display_version, execute_navigate, execute_profile, execute_resolve, NavigateArgs,
    ProfileArgs, ResolveArgs,
};
use scalene_studio::utils::config::DEFAULT_REPORT_PATH;

/// Scalene Studio - run Scalene and view its report
#[derive(Parser, Debug)]
#[command(name = "scalene-run")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Settings file (TOML)
    #[arg(short, long, global = true, env = "SCALENE_RUN_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Profile a Python file
    Profile {
        /// Python file to profile
        file: PathBuf,

        /// Interpreter to use instead of resolving one
        #[arg(long)]
        python: Option<String>,

        /// CPU-only profiling
        #[arg(long)]
        cpu: bool,

        /// Kill the profiler after this many seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Output path for the HTML report
        #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
        output: PathBuf,

        /// Open the report in the system browser
        #[arg(long)]
        open: bool,

        /// Read jumpToLine messages from stdin after the report is written
        #[arg(long)]
        listen: bool,
    },

    /// Show the interpreter a profile run would use
    Resolve {
        /// Interpreter to use instead of resolving one
        #[arg(long)]
        python: Option<String>,

        /// Document used for execution-details lookups
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Handle a report panel message.
    ///
    /// e.g. '{"command":"jumpToLine","filePath":"a.py","lineNumber":3}'
    Navigate {
        /// Panel message as JSON
        message: String,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Profile {
            file,
            python,
            cpu,
            timeout,
            output,
            open,
            listen,
        } => {
            let args = ProfileArgs {
                file,
                python,
                cpu_only: cpu,
                timeout_secs: timeout,
                config: cli.config,
                output,
                open,
                listen,
            };

            let state = execute_profile(args)?;
            if !state.is_success() {
                bail!("Profiling {}", state);
            }
        }

        Commands::Resolve { python, file } => {
            execute_resolve(ResolveArgs {
                python,
                file,
                config: cli.config,
            })?;
        }

        Commands::Navigate { message } => {
            execute_navigate(NavigateArgs {
                message,
                config: cli.config,
            })?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
