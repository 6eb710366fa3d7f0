mod render;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};
use default_audit_config::{AuditSettings, ConfigError, inspect_config, overlay_defaults};
use default_audit_core::{CommandSpec, ValidationMode, Validator, load_spec};
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit status when every check passed.
const EXIT_OK: i32 = 0;
/// Exit status when a check ran and found problems.
const EXIT_FAILED: i32 = 1;
/// Exit status when the run could not be carried out.
const EXIT_ERROR: i32 = 2;

/// CLI-specific validation mode enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliMode {
    FailFast,
    CollectAll,
}

impl From<CliMode> for ValidationMode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::FailFast => Self::FailFast,
            CliMode::CollectAll => Self::CollectAll,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "default-audit", version)]
#[command(about = "Check command defaults against their choices and inspect config files")]
struct Cli {
    /// Enable debug logging on stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate defaults against choices in a command spec file.
    Validate(ValidateArgs),
    /// Inspect a configuration file and list its populated values.
    Config(ConfigArgs),
    /// Inspect the configuration, then validate the command tree with config values applied.
    Doctor(DoctorArgs),
    /// Validate this tool's own command-line definition.
    SelfCheck(SelfCheckArgs),
}

#[derive(Debug, Args)]
struct SettingsArgs {
    /// YAML settings file.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Name of the root command in reported paths.
    #[arg(long)]
    root_name: Option<String>,
    /// Stop at the first violation or report all of them.
    #[arg(long, value_enum)]
    mode: Option<CliMode>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Command spec file (.json, .yaml or .yml).
    #[arg(long)]
    spec: PathBuf,
    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Debug, Args)]
struct ConfigArgs {
    /// Configuration file (defaults to the settings' config path).
    #[arg(long)]
    path: Option<PathBuf>,
    /// YAML settings file.
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct DoctorArgs {
    /// Command spec file (.json, .yaml or .yml).
    #[arg(long)]
    spec: PathBuf,
    /// Configuration file (defaults to the settings' config path).
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Debug, Args)]
struct SelfCheckArgs {
    /// Stop at the first violation or report all of them.
    #[arg(long, value_enum, default_value = "collect-all")]
    mode: CliMode,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Config(args) => run_config(args),
        Command::Doctor(args) => run_doctor(args),
        Command::SelfCheck(args) => run_self_check(args),
    };

    match result {
        Ok(true) => std::process::exit(EXIT_OK),
        Ok(false) => std::process::exit(EXIT_FAILED),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(EXIT_ERROR);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "error" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Builds the settings for one run: defaults, then the YAML file, then flags.
fn resolve_settings(args: &SettingsArgs) -> Result<AuditSettings, String> {
    let mut settings = load_settings(args.settings.as_deref())?;
    if let Some(root_name) = &args.root_name {
        settings.root_name = Some(root_name.clone());
    }
    if let Some(mode) = args.mode {
        settings.mode = mode.into();
    }
    tracing::debug!(?settings, "resolved settings");
    Ok(settings)
}

fn load_settings(path: Option<&Path>) -> Result<AuditSettings, String> {
    match path {
        Some(path) => AuditSettings::load(path)
            .map_err(|err| format!("Failed to load settings '{}': {err}", path.display())),
        None => Ok(AuditSettings::default()),
    }
}

fn load_command_spec(path: &Path) -> Result<CommandSpec, String> {
    load_spec(path).map_err(|err| format!("Failed to load spec '{}': {err}", path.display()))
}

fn write_failed(err: io::Error) -> String {
    format!("Failed to write output: {err}")
}

fn run_validate(args: ValidateArgs) -> Result<bool, String> {
    let settings = resolve_settings(&args.settings)?;
    let spec = load_command_spec(&args.spec)?;

    let root_name = settings.root_name_for(&spec);
    let report = Validator::new(settings.mode).validate(&spec, root_name);

    let mut out = io::stdout().lock();
    render::render_validation(&mut out, &report).map_err(write_failed)?;
    Ok(report.passed())
}

fn run_config(args: ConfigArgs) -> Result<bool, String> {
    let settings = load_settings(args.settings.as_deref())?;
    let path = args.path.unwrap_or(settings.config_path);

    let mut out = io::stdout().lock();
    writeln!(out, "Config path: {}", path.display()).map_err(write_failed)?;

    let inspection = inspect_config(&path).map_err(|err| describe_config_error(&path, &err))?;
    render::render_config(&mut out, &inspection).map_err(write_failed)?;
    Ok(true)
}

fn describe_config_error(path: &Path, err: &ConfigError) -> String {
    match err {
        ConfigError::IoError(_) => format!("Config file error '{}': {err}", path.display()),
        _ => format!("Config parsing error '{}': {err}", path.display()),
    }
}

fn run_doctor(args: DoctorArgs) -> Result<bool, String> {
    let settings = resolve_settings(&args.settings)?;
    let config_path = args.config.unwrap_or_else(|| settings.config_path.clone());
    let spec = load_command_spec(&args.spec)?;

    let mut out = io::stdout().lock();
    let cwd = std::env::current_dir()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    writeln!(out, "default-audit {PACKAGE_VERSION}").map_err(write_failed)?;
    writeln!(out, "Working directory: {cwd}").map_err(write_failed)?;
    writeln!(out, "{}", render::RULE).map_err(write_failed)?;
    writeln!(out).map_err(write_failed)?;

    writeln!(out, "=== Checking configuration file ===").map_err(write_failed)?;
    writeln!(out, "Config path: {}", config_path.display()).map_err(write_failed)?;
    let inspection = match inspect_config(&config_path) {
        Ok(inspection) => {
            render::render_config(&mut out, &inspection).map_err(write_failed)?;
            Some(inspection)
        }
        Err(err) => {
            writeln!(out, "{}", describe_config_error(&config_path, &err))
                .map_err(write_failed)?;
            None
        }
    };
    writeln!(out).map_err(write_failed)?;

    let root_name = settings.root_name_for(&spec).to_string();
    let spec = match &inspection {
        Some(inspection) => {
            let overlay = overlay_defaults(&spec, &inspection.document, &root_name);
            render::render_overrides(&mut out, &overlay.applied).map_err(write_failed)?;
            writeln!(out).map_err(write_failed)?;
            overlay.spec
        }
        None => spec,
    };

    let report = Validator::new(settings.mode).validate(&spec, &root_name);
    render::render_validation(&mut out, &report).map_err(write_failed)?;
    writeln!(out).map_err(write_failed)?;

    let config_ok = inspection.is_some();
    render::render_summary(
        &mut out,
        &config_path.display().to_string(),
        config_ok,
        report.passed(),
    )
    .map_err(write_failed)?;

    Ok(config_ok && report.passed())
}

fn run_self_check(args: SelfCheckArgs) -> Result<bool, String> {
    let mut cmd = Cli::command();
    cmd.build();
    let spec = CommandSpec::from_clap(&cmd);

    let report = Validator::new(args.mode.into()).validate(&spec, cmd.get_name());

    let mut out = io::stdout().lock();
    render::render_validation(&mut out, &report).map_err(write_failed)?;
    Ok(report.passed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_own_defaults_are_within_choices() {
        let mut cmd = Cli::command();
        cmd.build();
        let spec = CommandSpec::from_clap(&cmd);

        let report = Validator::new(ValidationMode::CollectAll).validate(&spec, "default-audit");
        assert!(report.passed(), "{:?}", report.violations);
        assert!(report.visit("default-audit.self-check").is_some());
        assert!(report.checked_arguments() >= 1);
    }

    #[test]
    fn test_resolve_settings_prefers_flags() {
        let args = SettingsArgs {
            settings: None,
            root_name: Some("app".to_string()),
            mode: Some(CliMode::CollectAll),
        };
        let settings = resolve_settings(&args).unwrap();
        assert_eq!(settings.root_name.as_deref(), Some("app"));
        assert_eq!(settings.mode, ValidationMode::CollectAll);
    }
}
