//! INI-style configuration reader.
//!
//! Parses the subset of INI syntax used by application configuration files:
//!
//! ```ini
//! ; comment
//! [execution]
//! execution_providers = cuda
//! execution_thread_count: 4
//! face_selector_order =
//!     left-right
//! ```
//!
//! Section headers are `[name]`; options use `=` or `:` as the delimiter and
//! keys are lowercased. A line indented deeper than its option continues
//! that option's value, keeping any blank lines in between. Values
//! under `[DEFAULT]` are kept apart and act as fallbacks for every section.
//! Options outside a section, duplicate sections, and duplicate options in
//! one section are errors.

use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, Result};

/// Name of the fallback section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// One `[section]` and its options in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniSection {
    /// Section name as written in the header
    pub name: String,
    /// Option/value pairs in file order
    pub options: Vec<(String, String)>,
}

impl IniSection {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            options: Vec::new(),
        }
    }

    /// Looks up an option defined directly in this section.
    pub fn get(&self, option: &str) -> Option<&str> {
        let option = option.to_lowercase();
        self.options
            .iter()
            .find(|(key, _)| *key == option)
            .map(|(_, value)| value.as_str())
    }
}

/// A parsed configuration file.
///
/// # Examples
///
/// ```
/// use default_audit_config::IniDocument;
///
/// let doc = IniDocument::parse("[execution]\nexecution_providers = cpu\n").unwrap();
/// assert_eq!(doc.section_names(), vec!["execution"]);
/// assert_eq!(doc.get("execution", "execution_providers"), Some("cpu"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    defaults: IniSection,
    sections: Vec<IniSection>,
}

impl IniDocument {
    /// Parses INI text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] with the offending line number.
    pub fn parse(text: &str) -> Result<Self> {
        let mut doc = IniDocument {
            defaults: IniSection::new(DEFAULT_SECTION),
            sections: Vec::new(),
        };
        // Index into `sections`; `None` means `[DEFAULT]`.
        let mut current: Option<Option<usize>> = None;
        // Option still accepting continuation lines, with its own indent.
        let mut open: Option<(usize, usize)> = None;
        let mut pending_blanks = 0;

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim_end_matches('\r');
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if open.is_some() {
                    pending_blanks += 1;
                }
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indent = line.len() - line.trim_start().len();
            if let (Some(section), Some((option, option_indent))) = (current, open) {
                if indent > option_indent {
                    let value = &mut doc.section_mut(section).options[option].1;
                    // Blank lines only survive inside a value.
                    for _ in 0..=pending_blanks {
                        value.push('\n');
                    }
                    value.push_str(trimmed);
                    pending_blanks = 0;
                    continue;
                }
            }
            open = None;
            pending_blanks = 0;

            if let Some(rest) = trimmed.strip_prefix('[') {
                // Anything after the closing bracket is ignored.
                let Some(end) = rest.rfind(']') else {
                    return Err(ConfigError::parse(line_no, "unterminated section header"));
                };
                let name = rest[..end].trim();
                if name.is_empty() {
                    return Err(ConfigError::parse(line_no, "empty section name"));
                }
                if name == DEFAULT_SECTION {
                    current = Some(None);
                } else if doc.section(name).is_some() {
                    return Err(ConfigError::parse(
                        line_no,
                        format!("duplicate section '{name}'"),
                    ));
                } else {
                    doc.sections.push(IniSection::new(name));
                    current = Some(Some(doc.sections.len() - 1));
                }
                continue;
            }

            let Some(section) = current else {
                return Err(ConfigError::parse(
                    line_no,
                    "option found before any section header",
                ));
            };

            let Some(split) = trimmed.find(['=', ':']) else {
                return Err(ConfigError::parse(
                    line_no,
                    format!("expected 'key = value', found '{trimmed}'"),
                ));
            };
            let key = trimmed[..split].trim().to_lowercase();
            let value = trimmed[split + 1..].trim().to_string();
            if key.is_empty() {
                return Err(ConfigError::parse(line_no, "empty option name"));
            }

            let target = doc.section_mut(section);
            if target.options.iter().any(|(existing, _)| *existing == key) {
                return Err(ConfigError::parse(
                    line_no,
                    format!("duplicate option '{key}' in section '{}'", target.name),
                ));
            }
            target.options.push((key, value));
            open = Some((target.options.len() - 1, indent));
        }

        debug!(sections = doc.sections.len(), "parsed configuration");
        Ok(doc)
    }

    fn section_mut(&mut self, index: Option<usize>) -> &mut IniSection {
        match index {
            Some(i) => &mut self.sections[i],
            None => &mut self.defaults,
        }
    }

    /// Sections in file order, excluding `[DEFAULT]`.
    pub fn sections(&self) -> &[IniSection] {
        &self.sections
    }

    /// Section names in file order, excluding `[DEFAULT]`.
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Finds a section by name.
    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Options declared under `[DEFAULT]`.
    pub fn defaults(&self) -> &IniSection {
        &self.defaults
    }

    /// Looks up an option, falling back to `[DEFAULT]`.
    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        self.section(section)?
            .get(option)
            .or_else(|| self.defaults.get(option))
    }
}

/// Reads and parses a configuration file.
///
/// # Errors
///
/// Returns [`ConfigError::IoError`] if the file cannot be read, or
/// [`ConfigError::Parse`] if it is malformed.
pub fn read_config(path: impl AsRef<Path>) -> Result<IniDocument> {
    let text = std::fs::read_to_string(path)?;
    IniDocument::parse(&text)
}
