//! Scalene Studio library
//!
//! Resolves a Python interpreter, runs the Scalene profiler against a source
//! file as a supervised subprocess and hands the HTML report to a display
//! panel that can ask the host to jump to a source line.
//!
//! The host environment (editor, terminal, tests) is reached only through the
//! traits in [`host`].

pub mod commands;
pub mod extension;
pub mod host;
pub mod navigation;
pub mod output;
pub mod resolver;
pub mod session;
pub mod utils;
