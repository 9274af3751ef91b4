//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands wire the terminal host to the library components.

pub mod models;
pub mod navigate;
pub mod profile;
pub mod resolve;
pub mod utils;

// Re-export main command functions
pub use models::{NavigateArgs, ProfileArgs, ResolveArgs};
pub use navigate::execute_navigate;
pub use profile::{execute_profile, load_settings};
pub use resolve::execute_resolve;
pub use utils::display_version;
