//! Building a [`CommandSpec`] from a [`clap::Command`].
//!
//! Reads declared defaults and possible values straight from clap's public
//! introspection API. Call [`clap::Command::build`] first when the command
//! relies on clap filling in implicit defaults (e.g. for `SetTrue` flags);
//! arguments that take no value are skipped either way.

use clap::{ArgAction, Command};

use crate::{ArgumentSpec, CommandSpec, DefaultValue, Scalar};

impl CommandSpec {
    /// Converts a clap command tree into a spec.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::{Arg, Command};
    /// use default_audit_core::{validate, CommandSpec};
    ///
    /// let cmd = Command::new("main").arg(
    ///     Arg::new("mode")
    ///         .long("mode")
    ///         .default_value("cpu")
    ///         .value_parser(["cpu", "gpu"]),
    /// );
    ///
    /// let spec = CommandSpec::from_clap(&cmd);
    /// assert!(spec.find_argument("mode").unwrap().is_constrained());
    /// assert!(validate(&spec, "main"));
    /// ```
    pub fn from_clap(cmd: &Command) -> Self {
        let arguments = cmd
            .get_arguments()
            .filter(|arg| arg.get_action().takes_values())
            .map(|arg| {
                let defaults: Vec<Scalar> = arg
                    .get_default_values()
                    .iter()
                    .map(|v| Scalar::Text(v.to_string_lossy().into_owned()))
                    .collect();

                let multiple = defaults.len() > 1
                    || matches!(arg.get_action(), ArgAction::Append)
                    || arg.get_num_args().is_some_and(|r| r.max_values() > 1);

                let default = match defaults.len() {
                    0 => None,
                    1 if !multiple => defaults.into_iter().next().map(DefaultValue::Scalar),
                    _ => Some(DefaultValue::List(defaults)),
                };

                let choices: Vec<Scalar> = arg
                    .get_possible_values()
                    .iter()
                    .map(|pv| Scalar::from(pv.get_name()))
                    .collect();

                ArgumentSpec {
                    name: arg.get_id().as_str().to_string(),
                    default,
                    choices: (!choices.is_empty()).then_some(choices),
                    help: arg.get_help().map(ToString::to_string),
                }
            })
            .collect();

        CommandSpec {
            name: cmd.get_name().to_string(),
            description: cmd.get_about().map(ToString::to_string),
            arguments,
            subcommands: cmd.get_subcommands().map(CommandSpec::from_clap).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{Arg, ArgAction, Command};

    use super::*;
    use crate::{ValidationMode, Validator};

    fn program() -> Command {
        Command::new("main")
            .about("Demo program")
            .arg(
                Arg::new("execution_providers")
                    .long("execution-providers")
                    .num_args(1..)
                    .default_values(["cpu"])
                    .value_parser(["cpu", "cuda"]),
            )
            .arg(Arg::new("verbose").long("verbose").action(ArgAction::SetTrue))
            .subcommand(
                Command::new("train").arg(
                    Arg::new("resolution")
                        .long("resolution")
                        .default_value("4k")
                        .value_parser(["1080p", "720p"]),
                ),
            )
    }

    #[test]
    fn test_from_clap_reads_defaults_and_choices() {
        let spec = CommandSpec::from_clap(&program());
        assert_eq!(spec.name, "main");
        assert_eq!(spec.description.as_deref(), Some("Demo program"));

        let providers = spec.find_argument("execution_providers").unwrap();
        assert_eq!(providers.default, Some(DefaultValue::list(["cpu"])));
        assert_eq!(
            providers.choices,
            Some(vec![Scalar::from("cpu"), Scalar::from("cuda")])
        );
        assert!(spec.find_argument("verbose").is_none());
    }

    #[test]
    fn test_from_clap_walks_subcommands() {
        let spec = CommandSpec::from_clap(&program());
        assert_eq!(spec.subcommand_names(), vec!["train"]);

        let report = Validator::new(ValidationMode::CollectAll).validate(&spec, "main");
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].path, "main.train");
        assert_eq!(report.violations[0].argument, "resolution");
    }

    #[test]
    fn test_from_clap_argument_without_value_parser_is_unconstrained() {
        let cmd = Command::new("main").arg(Arg::new("output").long("output").default_value("out.mp4"));
        let spec = CommandSpec::from_clap(&cmd);
        let output = spec.find_argument("output").unwrap();
        assert_eq!(output.default, Some(DefaultValue::from("out.mp4")));
        assert!(output.choices.is_none());
    }
}
