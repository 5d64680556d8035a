//! Line-level diffing of ordered device command lists.
//!
//! Every command line is an atomic token: two lines either match exactly or
//! they do not. The engine computes a longest-common-subsequence edit script
//! and then folds an adjacent remove/add pair into a single `change` line.

pub mod diff;
pub mod format;

pub use diff::{diff_commands_detailed, diff_with_options, DiffLine, DiffOptions};
pub use format::{diff_commands, format_json, format_line, format_summary, format_text};
