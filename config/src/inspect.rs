//! Readability and content inspection of a configuration file.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::ini::IniDocument;

/// What was learned about a configuration file.
#[derive(Debug, Clone)]
pub struct ConfigInspection {
    /// Path that was read
    pub path: PathBuf,
    /// Length of the raw file in characters
    pub chars: usize,
    /// Parsed contents
    pub document: IniDocument,
}

impl ConfigInspection {
    /// Returns each section with only its non-empty values, in file order.
    ///
    /// Sections whose values are all empty are still listed, with no
    /// options.
    pub fn populated_sections(&self) -> Vec<(&str, Vec<(&str, &str)>)> {
        self.document
            .sections()
            .iter()
            .map(|section| {
                let options = section
                    .options
                    .iter()
                    .filter(|(_, value)| !value.trim().is_empty())
                    .map(|(key, value)| (key.as_str(), value.as_str()))
                    .collect();
                (section.name.as_str(), options)
            })
            .collect()
    }
}

/// Reads a configuration file, reports its size, and parses it.
///
/// # Errors
///
/// Returns [`ConfigError::IoError`](crate::ConfigError::IoError) when the
/// file is unreadable and [`ConfigError::Parse`](crate::ConfigError::Parse)
/// when it is malformed.
pub fn inspect_config(path: impl AsRef<Path>) -> Result<ConfigInspection> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    let chars = raw.chars().count();
    let document = IniDocument::parse(&raw)?;

    info!(
        path = %path.display(),
        chars,
        sections = document.sections().len(),
        "configuration inspected"
    );

    Ok(ConfigInspection {
        path: path.to_path_buf(),
        chars,
        document,
    })
}
