//! Rendered command output.

use serde::{Deserialize, Serialize};

/// A named block of vendor CLI commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSection {
    pub name: String,
    pub commands: Vec<String>,
}

impl RenderSection {
    pub fn new(name: impl Into<String>, commands: Vec<String>) -> Self {
        Self {
            name: name.into(),
            commands,
        }
    }
}

/// Output of a single module's render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRender {
    pub sections: Vec<RenderSection>,
    pub verify_commands: Vec<String>,
    pub rollback_commands: Vec<String>,
}

impl ModuleRender {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty() && self.verify_commands.is_empty() && self.rollback_commands.is_empty()
    }

    /// Append a section unless it has no commands.
    pub fn push_section(&mut self, name: &str, commands: Vec<String>) {
        if !commands.is_empty() {
            self.sections.push(RenderSection::new(name, commands));
        }
    }

    /// Append a section together with its rollback and verify commands.
    /// Nothing is added when `commands` is empty.
    pub fn push_block(&mut self, name: &str, commands: Vec<String>, rollback: Vec<String>, verify: &[&str]) {
        if commands.is_empty() {
            return;
        }
        self.sections.push(RenderSection::new(name, commands));
        self.rollback_commands.extend(rollback);
        self.verify_commands.extend(verify.iter().map(|v| v.to_string()));
    }
}

/// Complete render of a config for one vendor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResult {
    /// All section commands flattened in section order.
    pub commands: Vec<String>,
    pub sections: Vec<RenderSection>,
    pub verify_commands: Vec<String>,
    pub rollback_commands: Vec<String>,
}

impl RenderResult {
    /// Concatenate module outputs in the given order.
    pub fn from_modules(outputs: impl IntoIterator<Item = ModuleRender>) -> Self {
        let mut result = RenderResult::default();
        for output in outputs {
            result
                .sections
                .extend(output.sections.into_iter().filter(|s| !s.commands.is_empty()));
            result.verify_commands.extend(output.verify_commands);
            result.rollback_commands.extend(output.rollback_commands);
        }
        result.commands = result
            .sections
            .iter()
            .flat_map(|s| s.commands.iter().cloned())
            .collect();
        result
    }

    pub fn section(&self, name: &str) -> Option<&RenderSection> {
        self.sections.iter().find(|s| s.name == name)
    }
}
