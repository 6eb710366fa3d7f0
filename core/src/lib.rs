//! Command specification model and default/choice validation.
//!
//! This crate models a command-line surface as a tree and audits it:
//!
//! - [`CommandSpec`] — a named command with arguments and nested
//!   sub-commands.
//! - [`ArgumentSpec`] — one declared parameter with an optional
//!   [`DefaultValue`] and an optional choice set of [`Scalar`]s.
//! - [`Validator`] — walks the tree and reports every default that falls
//!   outside its argument's choices, as a [`ValidationReport`].
//!
//! Structural checks ([`check_structure`]) reject malformed trees, and
//! [`load_spec`] reads a tree from a JSON or YAML file. With the `clap`
//! feature, [`CommandSpec::from_clap`] builds a tree from a
//! `clap::Command`.
//!
//! # Example
//!
//! ```
//! use default_audit_core::*;
//!
//! let spec = CommandSpec::new("main")
//!     .with_argument(ArgumentSpec::new("mode").with_default("cpu").with_choices(["cpu", "gpu"]))
//!     .with_subcommand(
//!         CommandSpec::new("train").with_argument(
//!             ArgumentSpec::new("resolution")
//!                 .with_default("4k")
//!                 .with_choices(["1080p", "720p"]),
//!         ),
//!     );
//!
//! let report = Validator::new(ValidationMode::FailFast).validate(&spec, "main");
//! assert!(!report.passed());
//! assert_eq!(report.violations[0].path, "main.train");
//! ```

#[cfg(feature = "clap")]
mod clap_adapter;
mod error;
mod load;
mod structure;
mod types;
mod validate;

pub use error::{LoadError, Result};
pub use load::{SpecFormat, load_spec, parse_spec};
pub use structure::{SpecError, check_structure};
pub use types::*;
pub use validate::{
    ArgumentCheck, CommandVisit, ValidationMode, ValidationReport, Validator, Violation, validate,
};
