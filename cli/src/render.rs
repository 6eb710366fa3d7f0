//! Human-readable rendering of audit results.

use std::io::{self, Write};

use default_audit_config::{AppliedOverride, ConfigInspection};
use default_audit_core::{ValidationReport, join_scalars};

pub const RULE: &str = "==================================================";

/// Writes per-command, per-argument diagnostics followed by the result.
pub fn render_validation(out: &mut impl Write, report: &ValidationReport) -> io::Result<()> {
    for visit in &report.commands {
        writeln!(out, "=== Validating {} ===", visit.path)?;

        for check in &visit.checks {
            writeln!(out, "  Argument: {}", check.argument)?;
            writeln!(out, "    Default: {}", check.default)?;
            writeln!(out, "    Choices: [{}]", join_scalars(&check.choices))?;
            if check.passed() {
                writeln!(out, "    [ok] default valid")?;
            } else if check.default.is_list() {
                writeln!(
                    out,
                    "    [FAIL] invalid defaults: [{}]",
                    join_scalars(&check.invalid)
                )?;
            } else {
                writeln!(out, "    [FAIL] invalid default: {} not in choices", check.default)?;
            }
        }

        if visit.passed {
            writeln!(out, "{}: passed", visit.path)?;
        } else {
            writeln!(out, "{}: FAILED", visit.path)?;
        }
        writeln!(out)?;
    }

    if report.passed() {
        writeln!(
            out,
            "Result: passed ({} command(s), {} argument(s) checked)",
            report.commands.len(),
            report.checked_arguments()
        )
    } else {
        writeln!(
            out,
            "Result: FAILED ({} violation(s), mode {})",
            report.violations.len(),
            report.mode.as_str()
        )?;
        for violation in &report.violations {
            writeln!(out, "  {violation}")?;
        }
        Ok(())
    }
}

/// Writes the readability line and every section's non-empty values.
pub fn render_config(out: &mut impl Write, inspection: &ConfigInspection) -> io::Result<()> {
    writeln!(
        out,
        "Config file readable ({} chars)",
        inspection.chars
    )?;
    let sections = inspection.populated_sections();
    writeln!(out, "Parsed {} section(s)", sections.len())?;
    for (name, options) in sections {
        writeln!(out, "Section [{name}]:")?;
        for (key, value) in options {
            // Continuation lines are shown indented under their key.
            writeln!(out, "  {key} = {}", value.replace('\n', "\n    "))?;
        }
    }
    Ok(())
}

/// Lists configuration values that replaced declared defaults.
pub fn render_overrides(out: &mut impl Write, applied: &[AppliedOverride]) -> io::Result<()> {
    writeln!(out, "Applied {} configuration value(s)", applied.len())?;
    for item in applied {
        writeln!(out, "  {} {} = {}", item.path, item.argument, item.value)?;
    }
    Ok(())
}

/// Writes the doctor summary and, on validation failure, remediation hints.
pub fn render_summary(
    out: &mut impl Write,
    config_path: &str,
    config_ok: bool,
    validation_ok: bool,
) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "SUMMARY:")?;
    writeln!(out, "Config file: {}", status(config_ok))?;
    writeln!(out, "Validation: {}", status(validation_ok))?;

    if !validation_ok {
        writeln!(out)?;
        writeln!(out, "Potential fixes:")?;
        writeln!(
            out,
            "1. Check {config_path} for values outside the allowed choices"
        )?;
        writeln!(
            out,
            "2. Move {config_path} aside (e.g. to {config_path}.backup) and rerun"
        )?;
        writeln!(
            out,
            "3. For list options, every item must be one of the allowed choices"
        )?;
        writeln!(
            out,
            "4. Make sure paths in {config_path} exist on this machine"
        )?;
    }
    Ok(())
}

fn status(ok: bool) -> &'static str {
    if ok { "OK" } else { "FAILED" }
}

#[cfg(test)]
mod tests {
    use default_audit_core::{ArgumentSpec, CommandSpec, Validator};

    use super::*;

    fn render(report: &ValidationReport) -> String {
        let mut buf = Vec::new();
        render_validation(&mut buf, report).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_render_validation_names_invalid_list_items() {
        let spec = CommandSpec::new("main").with_argument(
            ArgumentSpec::new("providers")
                .with_default(["cpu", "tpu"].as_slice())
                .with_choices(["cpu", "gpu"]),
        );
        let text = render(&Validator::default().validate(&spec, "main"));

        assert!(text.contains("=== Validating main ==="));
        assert!(text.contains("    Default: [cpu, tpu]"));
        assert!(text.contains("    [FAIL] invalid defaults: [tpu]"));
        assert!(text.contains("main: FAILED"));
        assert!(text.contains("Result: FAILED (1 violation(s), mode fail-fast)"));
    }

    #[test]
    fn test_render_validation_passing_tree() {
        let spec = CommandSpec::new("main")
            .with_argument(
                ArgumentSpec::new("mode")
                    .with_default("cpu")
                    .with_choices(["cpu", "gpu"]),
            )
            .with_subcommand(CommandSpec::new("run"));
        let text = render(&Validator::default().validate(&spec, "main"));

        assert!(text.contains("    [ok] default valid"));
        assert!(text.contains("main.run: passed"));
        assert!(text.ends_with("Result: passed (2 command(s), 1 argument(s) checked)\n"));
    }

    #[test]
    fn test_render_summary_adds_hints_only_on_failure() {
        let mut ok = Vec::new();
        render_summary(&mut ok, "facefusion.ini", true, true).unwrap();
        let ok = String::from_utf8(ok).unwrap();
        assert!(ok.contains("Validation: OK"));
        assert!(!ok.contains("Potential fixes"));

        let mut failed = Vec::new();
        render_summary(&mut failed, "facefusion.ini", false, false).unwrap();
        let failed = String::from_utf8(failed).unwrap();
        assert!(failed.contains("Config file: FAILED"));
        assert!(failed.contains("facefusion.ini.backup"));
    }
}
