use anyhow::{bail, Result};
use netcfg_gen::findings::{count_severity, Finding, Severity};
use netcfg_gen::lint::lint_config;
use netcfg_gen::registry::validate_config;
use netcfg_gen::report::{render_findings, render_risk};
use netcfg_gen::risk::evaluate_risk;

use crate::cli::{CheckArgs, LintArgs, OutputFormat, RiskArgs};
use crate::read_config;

pub fn run_validate(args: CheckArgs) -> Result<()> {
    let config = read_config(&args.file)?;
    let findings = validate_config(&config);
    print_findings(&findings, args.format)?;
    gate("validate", &findings, args.strict)
}

pub fn run_lint(args: LintArgs) -> Result<()> {
    let config = read_config(&args.file)?;
    let findings = lint_config(&config, args.vendor.into());
    print_findings(&findings, args.format)?;
    gate("lint", &findings, args.strict)
}

pub fn run_risk(args: RiskArgs) -> Result<()> {
    let config = read_config(&args.file)?;
    let environment = args.environment.map_or_else(|| config.environment(), Into::into);
    let assessment = evaluate_risk(&config, environment);
    match args.format {
        OutputFormat::Text => println!("{}", render_risk(&assessment)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&assessment)?),
    }
    Ok(())
}

fn print_findings(findings: &[Finding], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", render_findings(findings)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(findings)?),
    }
    Ok(())
}

fn gate(command: &str, findings: &[Finding], strict: bool) -> Result<()> {
    let errors = count_severity(findings, Severity::Error);
    if errors > 0 {
        bail!("{command} failed: {errors} errors");
    }
    let warnings = count_severity(findings, Severity::Warn);
    if strict && warnings > 0 {
        bail!("{command} failed in strict mode: {warnings} warnings");
    }
    Ok(())
}
