//! Core command list diffing.

pub mod engine;
pub mod result;

pub use engine::{diff_commands_detailed, diff_with_options, DiffOptions};
pub use result::DiffLine;
