//! Finding and risk types shared by validation, lint and risk scoring.
//!
//! None of these are errors: a config with error-severity findings still
//! renders, and callers decide what to do with the report.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation or lint observation tied to a field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub severity: Severity,
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Field-precise finding produced by a config module or a cross-module check.
pub type ValidationFinding = Finding;

/// Coarse, vendor-dispatched finding produced by the lint rules.
pub type LintFinding = Finding;

impl Finding {
    pub fn new(
        severity: Severity,
        id: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn error(id: impl Into<String>, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, id, field, message)
    }

    pub fn warn(id: impl Into<String>, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warn, id, field, message)
    }

    pub fn info(id: impl Into<String>, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, id, field, message)
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Count findings of a given severity.
pub fn count_severity(findings: &[Finding], severity: Severity) -> usize {
    findings.iter().filter(|f| f.severity == severity).count()
}

/// Ordered risk level. `LOW < MEDIUM < HIGH`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn weight(self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labelled operational or security concern.
///
/// `label_key`/`detail_key` are translation keys resolved by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskItem {
    pub id: String,
    pub level: RiskLevel,
    pub label_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_key: Option<String>,
}

impl RiskItem {
    /// Build an item whose label and detail keys derive from `key`.
    pub fn new(id: impl Into<String>, level: RiskLevel, key: &str) -> Self {
        Self {
            id: id.into(),
            level,
            label_key: format!("netops.generator.risk.{key}"),
            detail_key: Some(format!("netops.generator.risk.{key}Detail")),
        }
    }
}
