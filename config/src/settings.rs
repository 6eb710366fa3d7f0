//! Settings for an audit run.
//!
//! An [`AuditSettings`] value is built once (from defaults, an optional YAML
//! file, then command-line overrides) and passed explicitly to whatever
//! needs it.
//!
//! # Example YAML
//!
//! ```yaml
//! config_path: facefusion.ini
//! root_name: main
//! mode: collect-all
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use default_audit_core::{CommandSpec, ValidationMode};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration file read when none is given.
pub const DEFAULT_CONFIG_PATH: &str = "facefusion.ini";

/// Settings controlling an audit run.
///
/// # Examples
///
/// ```
/// use default_audit_config::AuditSettings;
/// use default_audit_core::{CommandSpec, ValidationMode};
///
/// let settings = AuditSettings::default();
/// assert_eq!(settings.root_name, None);
/// assert_eq!(settings.mode, ValidationMode::FailFast);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSettings {
    /// Configuration file to inspect.
    pub config_path: PathBuf,
    /// Name used for the root command in paths; the spec's own name when unset.
    pub root_name: Option<String>,
    /// Validation mode.
    pub mode: ValidationMode,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            root_name: None,
            mode: ValidationMode::default(),
        }
    }
}

impl AuditSettings {
    /// Loads settings from a YAML file; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::ConfigError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::ConfigError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let settings = serde_yaml::from_reader(reader)?;
        Ok(settings)
    }

    /// Path name for the root of `spec`.
    pub fn root_name_for<'a>(&'a self, spec: &'a CommandSpec) -> &'a str {
        self.root_name.as_deref().unwrap_or(&spec.name)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_partial_settings_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mode: collect-all").unwrap();

        let settings = AuditSettings::load(file.path()).unwrap();
        assert_eq!(settings.mode, ValidationMode::CollectAll);
        assert_eq!(settings.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(settings.root_name, None);
    }

    #[test]
    fn test_root_name_falls_back_to_spec_name() {
        let spec = CommandSpec::new("facefusion");
        let mut settings = AuditSettings::default();
        assert_eq!(settings.root_name_for(&spec), "facefusion");

        settings.root_name = Some("main".to_string());
        assert_eq!(settings.root_name_for(&spec), "main");
    }

    #[test]
    fn test_load_rejects_unknown_mode() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mode: sometimes").unwrap();

        assert!(AuditSettings::load(file.path()).is_err());
    }
}
