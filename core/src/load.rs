//! Loading command specifications from JSON or YAML files.
//!
//! ```no_run
//! use default_audit_core::load_spec;
//!
//! let spec = load_spec("program.json").unwrap();
//! println!("{} commands", spec.count_commands());
//! ```

use std::path::Path;

use tracing::debug;

use crate::CommandSpec;
use crate::error::{LoadError, Result};
use crate::structure::check_structure;

/// Serialization format of a spec file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// Picks the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnsupportedFormat`] for anything other than
    /// `.json`, `.yaml` or `.yml`.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(SpecFormat::Json),
            Some("yaml") | Some("yml") => Ok(SpecFormat::Yaml),
            _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parses a spec from text and runs the structural checks.
///
/// # Examples
///
/// ```
/// use default_audit_core::{parse_spec, SpecFormat};
///
/// let spec = parse_spec(r#"{"name": "main", "arguments": []}"#, SpecFormat::Json).unwrap();
/// assert_eq!(spec.name, "main");
/// ```
pub fn parse_spec(raw: &str, format: SpecFormat) -> Result<CommandSpec> {
    let spec: CommandSpec = match format {
        SpecFormat::Json => serde_json::from_str(raw)?,
        SpecFormat::Yaml => serde_yaml::from_str(raw)?,
    };

    if let Some(err) = check_structure(&spec).into_iter().next() {
        return Err(err.into());
    }

    Ok(spec)
}

/// Loads a spec file, choosing the format from its extension.
///
/// # Errors
///
/// Returns [`LoadError::IoError`] if the file cannot be read, a parse error
/// if the contents are malformed, or [`LoadError::InvalidSpec`] if the tree
/// fails the structural checks.
pub fn load_spec(path: impl AsRef<Path>) -> Result<CommandSpec> {
    let path = path.as_ref();
    let format = SpecFormat::from_path(path)?;
    let raw = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), ?format, bytes = raw.len(), "loading spec");
    parse_spec(&raw, format)
}
