//! Default/choice validation over a command tree.
//!
//! The validator walks a [`CommandSpec`] depth-first. At each level it checks
//! every argument that declares both a non-empty default and a non-empty
//! choice set: each default value must be one of the choices. Sub-commands
//! are visited only after the arguments of their parent pass, and their
//! paths are built as `"{parent}.{child}"`.
//!
//! # Examples
//!
//! ```
//! use default_audit_core::*;
//!
//! let spec = CommandSpec::new("main")
//!     .with_argument(ArgumentSpec::new("mode").with_default("cpu").with_choices(["cpu", "gpu"]));
//! assert!(validate(&spec, "main"));
//!
//! let bad = CommandSpec::new("main").with_argument(
//!     ArgumentSpec::new("providers")
//!         .with_default(["cpu", "tpu"].as_slice())
//!         .with_choices(["cpu", "gpu"]),
//! );
//! let report = Validator::default().validate(&bad, "main");
//! assert!(!report.passed());
//! assert_eq!(report.violations[0].invalid, vec![Scalar::from("tpu")]);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::types::join_scalars;
use crate::{CommandSpec, DefaultValue, Scalar};

/// How the walk reacts to a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Stop at the first violation; later siblings and sub-commands are not
    /// checked.
    #[default]
    FailFast,
    /// Check every argument of every command and report all violations.
    CollectAll,
}

impl ValidationMode {
    /// Returns the kebab-case name used in settings files.
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationMode::FailFast => "fail-fast",
            ValidationMode::CollectAll => "collect-all",
        }
    }
}

/// A default value outside its argument's choices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Dotted command path (e.g. `"main.train"`)
    pub path: String,
    /// Argument name
    pub argument: String,
    /// The declared default
    pub default: DefaultValue,
    /// Default values that are not in `choices`
    pub invalid: Vec<Scalar>,
    /// The allowed values
    pub choices: Vec<Scalar>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.default.is_list() {
            write!(
                f,
                "{}: argument '{}' has invalid defaults [{}] (default {}, choices [{}])",
                self.path,
                self.argument,
                join_scalars(&self.invalid),
                self.default,
                join_scalars(&self.choices)
            )
        } else {
            write!(
                f,
                "{}: argument '{}' default {} not in choices [{}]",
                self.path,
                self.argument,
                self.default,
                join_scalars(&self.choices)
            )
        }
    }
}

/// Result of checking a single constrained argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgumentCheck {
    /// Argument name
    pub argument: String,
    /// The declared default
    pub default: DefaultValue,
    /// The allowed values
    pub choices: Vec<Scalar>,
    /// Default values not found in `choices` (empty when the check passed)
    pub invalid: Vec<Scalar>,
}

impl ArgumentCheck {
    /// Whether every default value was found in the choices.
    pub fn passed(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// One command visited during the walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandVisit {
    /// Dotted command path
    pub path: String,
    /// Nesting depth (root is 0)
    pub depth: usize,
    /// Argument checks performed at this level, in declaration order
    pub checks: Vec<ArgumentCheck>,
    /// Whether this command and every visited descendant passed
    pub passed: bool,
}

/// Everything the validator observed during one walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Mode the walk ran in
    pub mode: ValidationMode,
    /// Commands in visit order (pre-order)
    pub commands: Vec<CommandVisit>,
    /// Violations in discovery order
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    fn new(mode: ValidationMode) -> Self {
        Self {
            mode,
            commands: Vec::new(),
            violations: Vec::new(),
        }
    }

    /// Whether no violation was found.
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Total number of argument checks performed.
    pub fn checked_arguments(&self) -> usize {
        self.commands.iter().map(|c| c.checks.len()).sum()
    }

    /// Finds the visit record for a command path.
    pub fn visit(&self, path: &str) -> Option<&CommandVisit> {
        self.commands.iter().find(|c| c.path == path)
    }
}

/// Walks a command tree and checks defaults against choices.
///
/// The validator holds no state between runs; the same tree always yields
/// the same report.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    mode: ValidationMode,
}

impl Validator {
    /// Creates a validator running in `mode`.
    pub fn new(mode: ValidationMode) -> Self {
        Self { mode }
    }

    /// Returns the configured mode.
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    /// Validates `spec`, using `path` as the name of its root.
    pub fn validate(&self, spec: &CommandSpec, path: &str) -> ValidationReport {
        let mut report = ValidationReport::new(self.mode);
        let passed = self.walk(spec, path, 0, &mut report);
        info!(
            root = path,
            passed,
            commands = report.commands.len(),
            violations = report.violations.len(),
            "validation finished"
        );
        report
    }

    fn walk(
        &self,
        spec: &CommandSpec,
        path: &str,
        depth: usize,
        report: &mut ValidationReport,
    ) -> bool {
        debug!(path, arguments = spec.arguments.len(), "validating command");

        let index = report.commands.len();
        report.commands.push(CommandVisit {
            path: path.to_string(),
            depth,
            checks: Vec::new(),
            passed: true,
        });

        let fail_fast = self.mode == ValidationMode::FailFast;
        let mut passed = true;

        for arg in &spec.arguments {
            let (Some(default), Some(choices)) = (arg.effective_default(), arg.effective_choices())
            else {
                continue;
            };

            let invalid: Vec<Scalar> = default
                .values()
                .iter()
                .filter(|value| !value.is_in(choices))
                .cloned()
                .collect();

            let check = ArgumentCheck {
                argument: arg.name.clone(),
                default: default.clone(),
                choices: choices.to_vec(),
                invalid,
            };

            if check.passed() {
                debug!(path, argument = %arg.name, "default valid");
                report.commands[index].checks.push(check);
                continue;
            }

            warn!(
                path,
                argument = %arg.name,
                invalid = %join_scalars(&check.invalid),
                "default outside choices"
            );
            report.violations.push(Violation {
                path: path.to_string(),
                argument: check.argument.clone(),
                default: check.default.clone(),
                invalid: check.invalid.clone(),
                choices: check.choices.clone(),
            });
            report.commands[index].checks.push(check);
            passed = false;

            if fail_fast {
                break;
            }
        }

        if !passed && fail_fast {
            report.commands[index].passed = false;
            return false;
        }

        for sub in &spec.subcommands {
            let sub_path = format!("{path}.{}", sub.name);
            if !self.walk(sub, &sub_path, depth + 1, report) {
                passed = false;
                if fail_fast {
                    break;
                }
            }
        }

        report.commands[index].passed = passed;
        passed
    }
}

/// Validates `spec` in fail-fast mode and returns whether it passed.
///
/// # Examples
///
/// ```
/// use default_audit_core::{validate, CommandSpec};
///
/// assert!(validate(&CommandSpec::new("main"), "main"));
/// ```
pub fn validate(spec: &CommandSpec, path: &str) -> bool {
    Validator::default().validate(spec, path).passed()
}
