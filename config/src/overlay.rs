//! Applying configuration values as argument defaults.
//!
//! Applications commonly read their defaults from the configuration file, so
//! an invalid value there surfaces as an invalid default. Overlaying the file
//! onto a spec before validation lets the validator catch it.

use std::collections::HashMap;

use default_audit_core::{CommandSpec, DefaultValue, Scalar};
use tracing::debug;

use crate::ini::IniDocument;

/// A configuration value that replaced an argument's default.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedOverride {
    /// Dotted command path
    pub path: String,
    /// Argument name
    pub argument: String,
    /// New default built from the configuration value
    pub value: DefaultValue,
}

/// Result of [`overlay_defaults`].
#[derive(Debug, Clone)]
pub struct Overlay {
    /// Copy of the input spec with configuration values applied
    pub spec: CommandSpec,
    /// Every replaced default, in walk order
    pub applied: Vec<AppliedOverride>,
}

/// Returns a copy of `spec` whose arguments take their defaults from
/// matching, non-empty configuration options.
///
/// Options match arguments by name regardless of section; when several
/// sections define the same option, the last one wins. List arguments split
/// the value on whitespace. Each token is matched against the argument's
/// choices by display text, so `"0.5"` matches a float choice of `0.5`;
/// tokens that match no choice are kept as text and fail validation.
///
/// # Examples
///
/// ```
/// use default_audit_config::{IniDocument, overlay_defaults};
/// use default_audit_core::{validate, ArgumentSpec, CommandSpec};
///
/// let spec = CommandSpec::new("main").with_argument(
///     ArgumentSpec::new("execution_providers")
///         .with_default(["cpu"].as_slice())
///         .with_choices(["cpu", "cuda"]),
/// );
/// let doc = IniDocument::parse("[execution]\nexecution_providers = cuda tensorrt\n").unwrap();
///
/// let overlay = overlay_defaults(&spec, &doc, "main");
/// assert_eq!(overlay.applied.len(), 1);
/// assert!(!validate(&overlay.spec, "main"));
/// ```
pub fn overlay_defaults(spec: &CommandSpec, doc: &IniDocument, root: &str) -> Overlay {
    let mut values: HashMap<&str, &str> = HashMap::new();
    for (key, value) in &doc.defaults().options {
        values.insert(key.as_str(), value.as_str());
    }
    for section in doc.sections() {
        for (key, value) in &section.options {
            values.insert(key.as_str(), value.as_str());
        }
    }
    values.retain(|_, value| !value.trim().is_empty());

    let mut overlay = Overlay {
        spec: spec.clone(),
        applied: Vec::new(),
    };
    apply(&mut overlay.spec, &values, root, &mut overlay.applied);
    overlay
}

fn apply(
    spec: &mut CommandSpec,
    values: &HashMap<&str, &str>,
    path: &str,
    applied: &mut Vec<AppliedOverride>,
) {
    for arg in &mut spec.arguments {
        let Some(raw) = values.get(arg.name.to_lowercase().as_str()) else {
            continue;
        };

        let choices = arg.choices.as_deref().unwrap_or(&[]);
        let value = if arg.default.as_ref().is_some_and(DefaultValue::is_list) {
            DefaultValue::List(
                raw.split_whitespace()
                    .map(|token| to_scalar(token, choices))
                    .collect(),
            )
        } else {
            DefaultValue::Scalar(to_scalar(raw.trim(), choices))
        };

        debug!(path, argument = %arg.name, value = %value, "default taken from configuration");
        applied.push(AppliedOverride {
            path: path.to_string(),
            argument: arg.name.clone(),
            value: value.clone(),
        });
        arg.default = Some(value);
    }

    for sub in &mut spec.subcommands {
        let sub_path = format!("{path}.{}", sub.name);
        apply(sub, values, &sub_path, applied);
    }
}

fn to_scalar(token: &str, choices: &[Scalar]) -> Scalar {
    if let Some(choice) = choices.iter().find(|c| c.to_string() == token) {
        return choice.clone();
    }
    if let Ok(int) = token.parse::<i64>() {
        return Scalar::Int(int);
    }
    if let Ok(float) = token.parse::<f64>() {
        return Scalar::Float(float);
    }
    Scalar::from(token)
}
