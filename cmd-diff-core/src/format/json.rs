use crate::diff::result::DiffLine;

/// Format diff lines as pretty-printed JSON.
pub fn format_json(lines: &[DiffLine]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(lines)
}
