use colored::Colorize;
use cmd_diff_core::{format_line, format_summary, DiffLine};

use crate::findings::{count_severity, Finding, RiskLevel, Severity};
use crate::pipeline::{PushResult, PushStatus};
use crate::profile::ProfileSource;
use crate::render::RenderResult;
use crate::risk::RiskAssessment;
use crate::schema::SectionHint;

/// Render validation or lint findings, one per line, followed by counts.
pub fn render_findings(findings: &[Finding]) -> String {
    let mut out = Vec::new();
    if findings.is_empty() {
        out.push("No findings.".green().to_string());
    }
    for finding in findings {
        let tag = match finding.severity {
            Severity::Error => "ERROR".red().bold(),
            Severity::Warn => "WARN".yellow().bold(),
            Severity::Info => "INFO".cyan(),
        };
        out.push(format!("{tag} {} [{}] {}", finding.id, finding.field, finding.message));
        if let Some(suggestion) = &finding.suggestion {
            out.push(format!("  hint: {suggestion}"));
        }
    }
    out.push(render_finding_counts(findings));
    out.join("\n")
}

pub fn render_finding_counts(findings: &[Finding]) -> String {
    format!(
        "errors={} warnings={} info={}",
        count_severity(findings, Severity::Error),
        count_severity(findings, Severity::Warn),
        count_severity(findings, Severity::Info)
    )
    .cyan()
    .to_string()
}

/// Render the overall risk level and the items behind it.
pub fn render_risk(assessment: &RiskAssessment) -> String {
    let mut out = vec![format!("risk={}", paint_level(assessment.level))];
    for item in &assessment.items {
        out.push(format!("- {} {} ({})", paint_level(item.level), item.id, item.label_key));
    }
    out.join("\n")
}

fn paint_level(level: RiskLevel) -> String {
    match level {
        RiskLevel::High => level.as_str().red().bold().to_string(),
        RiskLevel::Medium => level.as_str().yellow().to_string(),
        RiskLevel::Low => level.as_str().green().to_string(),
    }
}

/// Render changed diff lines for terminal output.
pub fn render_diff(lines: &[DiffLine]) -> String {
    let changed: Vec<String> = lines
        .iter()
        .filter(|line| !line.is_same())
        .map(|line| {
            let text = format_line(line);
            match line {
                DiffLine::Add { .. } => text.green().to_string(),
                DiffLine::Remove { .. } => text.red().to_string(),
                DiffLine::Change { .. } => text.yellow().to_string(),
                DiffLine::Same { .. } => text,
            }
        })
        .collect();
    if changed.is_empty() {
        return "No changes.".to_string();
    }
    changed.join("\n")
}

pub fn render_diff_summary(lines: &[DiffLine]) -> String {
    format_summary(lines).cyan().to_string()
}

/// Render commands grouped by section, then verify and rollback blocks.
pub fn render_commands(result: &RenderResult) -> String {
    let mut out = Vec::new();
    for section in &result.sections {
        out.push(format!("# {}", section.name).bold().to_string());
        out.extend(section.commands.iter().cloned());
    }
    append_block(&mut out, "verify", &result.verify_commands);
    append_block(&mut out, "rollback", &result.rollback_commands);
    out.join("\n")
}

fn append_block(out: &mut Vec<String>, title: &str, commands: &[String]) {
    if commands.is_empty() {
        return;
    }
    out.push(String::new());
    out.push(format!("# {title}").dimmed().to_string());
    out.extend(commands.iter().cloned());
}

pub fn render_push(result: &PushResult) -> String {
    let status = match result.status {
        PushStatus::Ok => "ok".green().bold(),
        PushStatus::Partial => "partial".yellow().bold(),
        PushStatus::Error => "error".red().bold(),
    };
    let mut out = vec![format!("push status={status}")];
    out.extend(result.details.iter().map(|detail| format!("- {detail}")));
    out.join("\n")
}

pub fn render_profile_list(profiles: &[(String, ProfileSource)]) -> String {
    if profiles.is_empty() {
        return "- none".to_string();
    }
    profiles
        .iter()
        .map(|(name, source)| format!("- {name} source={source}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the config section table grouped as an editor would show it.
pub fn render_section_hints(hints: &[SectionHint]) -> String {
    let mut out = Vec::new();
    let mut group = "";
    for hint in hints {
        if hint.group != group {
            group = hint.group;
            out.push(group.bold().to_string());
        }
        out.push(format!("- {} ({}): {}", hint.key, hint.label, hint.hint));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use cmd_diff_core::diff_commands_detailed;

    use super::{render_commands, render_diff, render_findings, render_push, render_risk};
    use crate::findings::{Finding, RiskItem, RiskLevel};
    use crate::pipeline::{PushResult, PushStatus};
    use crate::render::{RenderResult, RenderSection};
    use crate::risk::RiskAssessment;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn findings_list_ids_and_counts() {
        plain();
        let findings = vec![
            Finding::error("hostname.required", "hostname", "Hostname is required.").with_suggestion("Set one."),
            Finding::warn("vlans.unused.10", "interfaces", "VLAN 10 is not used."),
        ];
        let text = render_findings(&findings);
        assert!(text.contains("ERROR hostname.required [hostname] Hostname is required."));
        assert!(text.contains("  hint: Set one."));
        assert!(text.contains("WARN vlans.unused.10"));
        assert!(text.ends_with("errors=1 warnings=1 info=0"));

        assert!(render_findings(&[]).starts_with("No findings."));
    }

    #[test]
    fn risk_shows_level_first() {
        plain();
        let assessment = RiskAssessment {
            level: RiskLevel::High,
            items: vec![RiskItem::new("ssh.password", RiskLevel::High, "sshPassword")],
        };
        let text = render_risk(&assessment);
        assert_eq!(
            text,
            "risk=HIGH\n- HIGH ssh.password (netops.generator.risk.sshPassword)"
        );
    }

    #[test]
    fn diff_hides_unchanged_lines() {
        plain();
        let lines = diff_commands_detailed(&["a", "b", "c"], &["a", "x", "c", "d"]);
        assert_eq!(render_diff(&lines), "~ b → x\n+ d");
        assert_eq!(render_diff(&diff_commands_detailed(&["a"], &["a"])), "No changes.");
    }

    #[test]
    fn commands_grouped_by_section() {
        plain();
        let result = RenderResult {
            commands: vec!["hostname r1".into()],
            sections: vec![RenderSection::new("base", vec!["hostname r1".into()])],
            verify_commands: vec!["show run".into()],
            rollback_commands: Vec::new(),
        };
        assert_eq!(render_commands(&result), "# base\nhostname r1\n\n# verify\nshow run");
    }

    #[test]
    fn push_lists_details() {
        plain();
        let result = PushResult {
            status: PushStatus::Partial,
            details: vec!["3 commands prepared".into()],
        };
        assert_eq!(render_push(&result), "push status=partial\n- 3 commands prepared");
    }
}
