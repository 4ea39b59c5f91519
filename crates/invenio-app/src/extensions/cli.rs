//! Registry of command groups contributed by extensions.

use std::collections::BTreeMap;

use tracing::warn;

use crate::application::{Application, Extension};
use crate::error::AppResult;

/// A named group of subcommands contributed by an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandGroup {
    /// Group name as typed on the command line.
    pub name: String,
    /// One-line description.
    pub about: String,
    /// Subcommand names.
    pub commands: Vec<String>,
}

impl CommandGroup {
    /// Create a group.
    #[must_use]
    pub fn new(name: impl Into<String>, about: impl Into<String>, commands: &[&str]) -> Self {
        Self {
            name: name.into(),
            about: about.into(),
            commands: commands.iter().map(ToString::to_string).collect(),
        }
    }

    /// Whether the group offers `command`.
    #[must_use]
    pub fn has_command(&self, command: &str) -> bool {
        self.commands.iter().any(|name| name == command)
    }
}

/// Command groups registered on the application, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    groups: BTreeMap<String, CommandGroup>,
}

impl CommandRegistry {
    /// Register `group`. A group with the same name is replaced.
    pub fn add_group(&mut self, group: CommandGroup) {
        if let Some(previous) = self.groups.insert(group.name.clone(), group) {
            warn!(group = %previous.name, "command group replaced");
        }
    }

    /// Group called `name`.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&CommandGroup> {
        self.groups.get(name)
    }

    /// Registered groups in name order.
    pub fn groups(&self) -> impl Iterator<Item = &CommandGroup> {
        self.groups.values()
    }
}

/// Installs the command registry other extensions add their groups to.
#[derive(Debug, Default)]
pub struct CliExtension;

impl Extension for CliExtension {
    fn name(&self) -> &'static str {
        "cli"
    }

    fn init_app(&mut self, app: &mut Application) -> AppResult<()> {
        if app.state::<CommandRegistry>().is_none() {
            app.insert_state(CommandRegistry::default());
        }
        Ok(())
    }
}
