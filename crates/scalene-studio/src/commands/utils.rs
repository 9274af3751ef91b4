use crate::utils::config::{PROFILER_MODULE, PROFILE_COMMAND_ID};

/// Display version information
pub fn display_version() {
    println!("Scalene Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Profiler module: {}", PROFILER_MODULE);
    println!("Command: {}", PROFILE_COMMAND_ID);
    println!();
    println!("Runs the Scalene Python profiler and surfaces its HTML report.");
}
