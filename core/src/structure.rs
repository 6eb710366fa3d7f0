//! Structural checks for command specifications.
//!
//! Catches malformed trees (empty names, duplicate arguments, duplicate
//! sub-commands) before the default/choice walk runs, so a spec file that
//! cannot describe a real command surface is rejected up front.
//!
//! # Examples
//!
//! ```
//! use default_audit_core::*;
//!
//! let spec = CommandSpec::new("main").with_argument(ArgumentSpec::new("mode"));
//! assert!(check_structure(&spec).is_empty());
//!
//! let bad = CommandSpec::new("main")
//!     .with_argument(ArgumentSpec::new("mode"))
//!     .with_argument(ArgumentSpec::new("mode"));
//! assert_eq!(
//!     check_structure(&bad),
//!     vec![SpecError::DuplicateArgument("main".into(), "mode".into())]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ArgumentSpec, CommandSpec};

/// Structural problems in a command specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty (under '{0}')")]
    EmptyCommandName(String),
    /// Argument name is empty or whitespace-only.
    #[error("argument name cannot be empty in '{0}'")]
    EmptyArgumentName(String),
    /// Two arguments in the same command share a name.
    #[error("duplicate argument in '{0}': {1}")]
    DuplicateArgument(String, String),
    /// Two sub-commands of the same command share a name.
    #[error("duplicate subcommand in '{0}': {1}")]
    DuplicateSubcommand(String, String),
}

/// Checks a command tree for structural errors.
///
/// Stops at the first problem found; the returned vector holds at most one
/// error.
pub fn check_structure(spec: &CommandSpec) -> Vec<SpecError> {
    let mut errors = Vec::new();

    let name = spec.name.trim();
    if name.is_empty() {
        errors.push(SpecError::EmptyCommandName("<root>".to_string()));
        return errors;
    }

    errors.extend(check_command(spec, name));
    errors
}

fn check_command(spec: &CommandSpec, path: &str) -> Vec<SpecError> {
    let mut errors = Vec::new();

    errors.extend(check_arguments(&spec.arguments, path));
    if !errors.is_empty() {
        return errors;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for sub in &spec.subcommands {
        let name = sub.name.trim();
        if name.is_empty() {
            errors.push(SpecError::EmptyCommandName(path.to_string()));
            return errors;
        }

        if !seen.insert(name) {
            errors.push(SpecError::DuplicateSubcommand(
                path.to_string(),
                name.to_string(),
            ));
            return errors;
        }

        errors.extend(check_command(sub, &format!("{path}.{name}")));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn check_arguments(arguments: &[ArgumentSpec], path: &str) -> Vec<SpecError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for arg in arguments {
        let name = arg.name.trim();
        if name.is_empty() {
            errors.push(SpecError::EmptyArgumentName(path.to_string()));
            return errors;
        }

        if !seen.insert(name) {
            errors.push(SpecError::DuplicateArgument(
                path.to_string(),
                name.to_string(),
            ));
            return errors;
        }
    }

    errors
}
