//! Command specification types.
//!
//! This module defines the statically-typed model of a command surface that
//! the validator walks: a tree of [`CommandSpec`] nodes, each holding
//! [`ArgumentSpec`] declarations and nested sub-commands. The types
//! serialize with [`serde`] so a tree can be written to JSON or YAML by the
//! application that owns it and audited later.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single default or choice value.
///
/// Deserialized untagged, so `true`, `4`, `0.5` and `"cpu"` in a spec file
/// map to the matching variant.
///
/// # Examples
///
/// ```
/// use default_audit_core::Scalar;
///
/// let value: Scalar = serde_json::from_str("\"cpu\"").unwrap();
/// assert_eq!(value, Scalar::from("cpu"));
/// assert_eq!(value.to_string(), "cpu");
///
/// // Integers and floats compare numerically.
/// assert!(Scalar::Int(1).matches(&Scalar::Float(1.0)));
/// assert!(Scalar::Bool(true).matches(&Scalar::Int(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl Scalar {
    /// Returns `true` for values that count as "unset": `false`, `0`, `0.0`
    /// and the empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Scalar::Bool(b) => !b,
            Scalar::Int(i) => *i == 0,
            Scalar::Float(f) => *f == 0.0,
            Scalar::Text(s) => s.is_empty(),
        }
    }

    /// Compares two scalars as numbers when both are numeric.
    ///
    /// Booleans count as `0` and `1`, so `true` matches a choice of `1`.
    pub fn matches(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Int(a), Scalar::Float(b)) | (Scalar::Float(b), Scalar::Int(a)) => {
                (*a as f64) == *b
            }
            (Scalar::Bool(a), Scalar::Int(b)) | (Scalar::Int(b), Scalar::Bool(a)) => {
                i64::from(*a) == *b
            }
            (Scalar::Bool(a), Scalar::Float(b)) | (Scalar::Float(b), Scalar::Bool(a)) => {
                f64::from(u8::from(*a)) == *b
            }
            _ => self == other,
        }
    }

    /// Returns `true` if this value matches any element of `choices`.
    pub fn is_in(&self, choices: &[Scalar]) -> bool {
        choices.iter().any(|choice| self.matches(choice))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

/// Default value declared for an argument.
///
/// Either a single scalar or an ordered list of scalars (for arguments that
/// accept several values).
///
/// # Examples
///
/// ```
/// use default_audit_core::{DefaultValue, Scalar};
///
/// let single = DefaultValue::from("cpu");
/// assert_eq!(single.values(), &[Scalar::from("cpu")]);
///
/// let list = DefaultValue::list(["cpu", "tpu"]);
/// assert_eq!(list.values().len(), 2);
/// assert_eq!(list.to_string(), "[cpu, tpu]");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// A single value.
    Scalar(Scalar),
    /// An ordered sequence of values.
    List(Vec<Scalar>),
}

impl DefaultValue {
    /// Builds a list default from anything convertible to [`Scalar`].
    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Scalar>,
    {
        DefaultValue::List(values.into_iter().map(Into::into).collect())
    }

    /// Returns the default as a slice; a scalar is a one-element slice.
    pub fn values(&self) -> &[Scalar] {
        match self {
            DefaultValue::Scalar(value) => std::slice::from_ref(value),
            DefaultValue::List(values) => values,
        }
    }

    /// Returns `true` for an empty list or an empty scalar.
    pub fn is_empty(&self) -> bool {
        match self {
            DefaultValue::Scalar(value) => value.is_empty(),
            DefaultValue::List(values) => values.is_empty(),
        }
    }

    /// Returns `true` if this default is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, DefaultValue::List(_))
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Scalar(value) => write!(f, "{value}"),
            DefaultValue::List(values) => write!(f, "[{}]", join_scalars(values)),
        }
    }
}

impl From<Scalar> for DefaultValue {
    fn from(value: Scalar) -> Self {
        DefaultValue::Scalar(value)
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::Scalar(value.into())
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        DefaultValue::Scalar(value.into())
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        DefaultValue::Scalar(value.into())
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        DefaultValue::Scalar(value.into())
    }
}

impl From<Vec<Scalar>> for DefaultValue {
    fn from(values: Vec<Scalar>) -> Self {
        DefaultValue::List(values)
    }
}

impl From<&[&str]> for DefaultValue {
    fn from(values: &[&str]) -> Self {
        DefaultValue::list(values.iter().copied())
    }
}

/// Joins scalars with `", "` for diagnostics.
pub fn join_scalars(values: &[Scalar]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// One declared parameter of a command.
///
/// # Examples
///
/// ```
/// use default_audit_core::ArgumentSpec;
///
/// let arg = ArgumentSpec::new("execution_providers")
///     .with_default(["cpu"].as_slice())
///     .with_choices(["cpu", "cuda", "tensorrt"]);
/// assert!(arg.is_constrained());
///
/// let free = ArgumentSpec::new("output_path").with_default("out.mp4");
/// assert!(!free.is_constrained());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Destination name of the argument (e.g. "execution_providers")
    pub name: String,
    /// Value assumed when the argument is not supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
    /// Allowed values; `None` means unconstrained
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Scalar>>,
    /// Help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl ArgumentSpec {
    /// Creates an argument with no default and no choices.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            default: None,
            choices: None,
            help: None,
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: impl Into<DefaultValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the allowed choices.
    pub fn with_choices<I, T>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Scalar>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Adds help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Returns the default if it is set and not empty.
    pub fn effective_default(&self) -> Option<&DefaultValue> {
        self.default.as_ref().filter(|d| !d.is_empty())
    }

    /// Returns the choices if they are set and not empty.
    pub fn effective_choices(&self) -> Option<&[Scalar]> {
        self.choices.as_deref().filter(|c| !c.is_empty())
    }

    /// Whether both a non-empty default and non-empty choices are declared,
    /// i.e. whether the validator checks this argument at all.
    pub fn is_constrained(&self) -> bool {
        self.effective_default().is_some() && self.effective_choices().is_some()
    }
}

/// A named node in the command tree.
///
/// # Examples
///
/// ```
/// use default_audit_core::{ArgumentSpec, CommandSpec};
///
/// let spec = CommandSpec::new("main")
///     .with_argument(ArgumentSpec::new("mode").with_default("cpu").with_choices(["cpu", "gpu"]))
///     .with_subcommand(CommandSpec::new("train"));
///
/// assert_eq!(spec.subcommand_names(), vec!["train"]);
/// assert!(spec.find_argument("mode").is_some());
/// assert_eq!(spec.count_commands(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Name of the command
    pub name: String,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared arguments, in declaration order
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
    /// Nested sub-commands, in declaration order
    #[serde(default)]
    pub subcommands: Vec<CommandSpec>,
}

impl CommandSpec {
    /// Creates an empty command.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds an argument.
    pub fn with_argument(mut self, arg: ArgumentSpec) -> Self {
        self.arguments.push(arg);
        self
    }

    /// Adds a nested sub-command.
    pub fn with_subcommand(mut self, sub: CommandSpec) -> Self {
        self.subcommands.push(sub);
        self
    }

    /// Finds an argument at this level by name.
    pub fn find_argument(&self, name: &str) -> Option<&ArgumentSpec> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Finds a direct sub-command by name.
    pub fn find_subcommand(&self, name: &str) -> Option<&CommandSpec> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    /// Gets all direct sub-command names.
    pub fn subcommand_names(&self) -> Vec<&str> {
        self.subcommands.iter().map(|s| s.name.as_str()).collect()
    }

    /// Counts this command and all nested sub-commands.
    pub fn count_commands(&self) -> usize {
        1 + self
            .subcommands
            .iter()
            .map(CommandSpec::count_commands)
            .sum::<usize>()
    }

    /// Counts arguments across the whole tree.
    pub fn count_arguments(&self) -> usize {
        self.arguments.len()
            + self
                .subcommands
                .iter()
                .map(CommandSpec::count_arguments)
                .sum::<usize>()
    }
}
