//! Schema command implementation.
//!
//! The `serenade schema` command prints the JSON Schema of the site config,
//! for editors that validate JSON against a schema.

use std::fs;

use crate::cli::args::SchemaArgs;
use crate::config::json_schema;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The schema command implementation.
pub struct SchemaCommand {
    args: SchemaArgs,
}

impl SchemaCommand {
    /// Create a new schema command.
    pub fn new(args: SchemaArgs) -> Self {
        Self { args }
    }

    fn render(&self) -> Result<String> {
        serde_json::to_string_pretty(&json_schema())
            .map_err(|e| crate::error::SerenadeError::Other(e.into()))
    }
}

impl Command for SchemaCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let schema = self.render()?;
        match &self.args.output {
            Some(path) => {
                fs::write(path, format!("{}\n", schema))?;
                ui.success(&format!("Wrote schema to {}", path.display()));
            }
            None => println!("{}", schema),
        }
        Ok(CommandResult::success())
    }
}
