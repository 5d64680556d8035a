use crate::diff::engine::diff_commands_detailed;
use crate::diff::result::DiffLine;

const NO_CHANGES: &str = "No changes.";

/// Diff two command lists and render only the changed lines.
///
/// Returns `"No changes."` when the lists are identical.
pub fn diff_commands<S: AsRef<str>>(previous: &[S], next: &[S]) -> String {
    format_text(&diff_commands_detailed(previous, next))
}

/// Format diff lines as a unified-style text block, skipping unchanged lines.
pub fn format_text(lines: &[DiffLine]) -> String {
    let changed: Vec<String> = lines
        .iter()
        .filter(|line| !line.is_same())
        .map(format_line)
        .collect();
    if changed.is_empty() {
        return NO_CHANGES.to_string();
    }
    changed.join("\n")
}

/// Format a single diff line with its marker prefix.
pub fn format_line(line: &DiffLine) -> String {
    match line {
        DiffLine::Add { text } => format!("+ {text}"),
        DiffLine::Remove { text } => format!("- {text}"),
        DiffLine::Change { text, .. } => format!("~ {text}"),
        DiffLine::Same { text } => format!("  {text}"),
    }
}

/// Format a simple summary of diff counts.
pub fn format_summary(lines: &[DiffLine]) -> String {
    let mut added = 0;
    let mut removed = 0;
    let mut changed = 0;
    let mut same = 0;

    for line in lines {
        match line {
            DiffLine::Add { .. } => added += 1,
            DiffLine::Remove { .. } => removed += 1,
            DiffLine::Change { .. } => changed += 1,
            DiffLine::Same { .. } => same += 1,
        }
    }

    format!("added={added} removed={removed} changed={changed} same={same}")
}
