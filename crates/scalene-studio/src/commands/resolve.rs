//! Resolve command: show which interpreter a profile run would use.

use super::models::ResolveArgs;
use super::profile::load_settings;
use crate::host::terminal::{ConfiguredLanguageSupport, FixedDocument};
use crate::resolver::{InterpreterDescriptor, InterpreterResolver, SystemCommandRunner};
use anyhow::Result;
use colored::*;

/// Execute the resolve command
pub fn execute_resolve(args: ResolveArgs) -> Result<InterpreterDescriptor> {
    let settings = load_settings(args.config.as_deref(), args.python.as_deref())?;
    let documents = FixedDocument(args.file);
    let language_support = ConfiguredLanguageSupport::from_settings(&settings.python);

    let interpreter = InterpreterResolver::new(&settings, &documents, &SystemCommandRunner)
        .with_language_support(&language_support)
        .resolve();

    println!(
        "{} ({})",
        interpreter.executable_path.green(),
        interpreter.source.to_string().dimmed()
    );
    Ok(interpreter)
}
