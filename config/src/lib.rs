//! Configuration inspection and settings for default audits.
//!
//! - [`read_config`] / [`IniDocument`] parse INI-style configuration files.
//! - [`inspect_config`] checks that a file is readable and parseable and
//!   lists its populated values.
//! - [`overlay_defaults`] applies configuration values to a
//!   [`CommandSpec`](default_audit_core::CommandSpec) so invalid values in
//!   the file are caught by the validator.
//! - [`AuditSettings`] holds the settings of one run.

mod error;
mod ini;
mod inspect;
mod overlay;
mod settings;

pub use error::{ConfigError, Result};
pub use ini::{DEFAULT_SECTION, IniDocument, IniSection, read_config};
pub use inspect::{ConfigInspection, inspect_config};
pub use overlay::{AppliedOverride, Overlay, overlay_defaults};
pub use settings::{AuditSettings, DEFAULT_CONFIG_PATH};
