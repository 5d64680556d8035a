//! Fixed-order composition of the config modules.
//!
//! Rendering walks [`ModuleKind::ALL`], so output order never depends on the
//! config. Validation runs every module, then every cross-module check.
//! Findings and risk items are concatenated as-is, without deduplication.

use tracing::debug;

use crate::cross_checks::CROSS_CHECKS;
use crate::findings::{RiskItem, ValidationFinding};
use crate::modules::ModuleKind;
use crate::render::RenderResult;
use crate::schema::{CanonicalConfig, Environment, Vendor};

/// Render every module for `vendor` and flatten the result.
pub fn render_modules(config: &CanonicalConfig, vendor: Vendor) -> RenderResult {
    let result = RenderResult::from_modules(
        ModuleKind::ALL
            .iter()
            .map(|kind| kind.module().render(config, vendor)),
    );
    debug!(
        vendor = %vendor,
        sections = result.sections.len(),
        commands = result.commands.len(),
        "rendered config"
    );
    result
}

/// Per-module findings followed by cross-module findings.
pub fn validate_modules(config: &CanonicalConfig) -> Vec<ValidationFinding> {
    let mut findings: Vec<ValidationFinding> = ModuleKind::ALL
        .iter()
        .flat_map(|kind| kind.module().validate(config))
        .collect();
    for check in CROSS_CHECKS {
        let found = (check.run)(config);
        if !found.is_empty() {
            debug!(check = check.name, count = found.len(), "cross-module findings");
        }
        findings.extend(found);
    }
    debug!(count = findings.len(), "validated config");
    findings
}

/// Risk items from every module.
pub fn risk_modules(config: &CanonicalConfig, environment: Environment) -> Vec<RiskItem> {
    ModuleKind::ALL
        .iter()
        .flat_map(|kind| kind.module().risk(config, environment))
        .collect()
}

/// Render a config. Entry point for callers outside the module system.
pub fn render_config(config: &CanonicalConfig, vendor: Vendor) -> RenderResult {
    render_modules(config, vendor)
}

/// Validate a config. Entry point for callers outside the module system.
pub fn validate_config(config: &CanonicalConfig) -> Vec<ValidationFinding> {
    validate_modules(config)
}
