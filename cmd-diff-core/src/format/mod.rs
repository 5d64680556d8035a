//! Diff output formatters.

pub mod json;
pub mod text;

pub use json::format_json;
pub use text::{diff_commands, format_line, format_summary, format_text};
