use serde::{Deserialize, Serialize};

/// A single classified line in a command diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiffLine {
    /// Line only present in the new command list.
    Add { text: String },
    /// Line only present in the previous command list.
    Remove { text: String },
    /// A removed line immediately followed by an added line.
    Change {
        text: String,
        previous: String,
        next: String,
    },
    /// Line present in both lists at aligned positions.
    Same { text: String },
}

impl DiffLine {
    /// Display text of the line. For changes this is `previous → next`.
    pub fn text(&self) -> &str {
        match self {
            DiffLine::Add { text }
            | DiffLine::Remove { text }
            | DiffLine::Change { text, .. }
            | DiffLine::Same { text } => text,
        }
    }

    pub fn is_same(&self) -> bool {
        matches!(self, DiffLine::Same { .. })
    }

    pub(crate) fn change(previous: String, next: String) -> Self {
        DiffLine::Change {
            text: format!("{previous} → {next}"),
            previous,
            next,
        }
    }
}
