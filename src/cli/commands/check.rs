//! Check command implementation.
//!
//! The `serenade check` command loads the site config and reports every
//! validation finding.

use crate::cli::args::CheckArgs;
use crate::config::{read_config, validate_config, ConfigSource, Severity, ValidationError};
use crate::error::{Result, SerenadeError};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    source: ConfigSource,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(source: &ConfigSource, args: CheckArgs) -> Self {
        Self {
            source: source.clone(),
            args,
        }
    }

    fn format_finding(finding: &ValidationError) -> String {
        match &finding.step {
            Some(step) => format!("[{}] {} (step '{}')", finding.rule, finding.message, step),
            None => format!("[{}] {}", finding.rule, finding.message),
        }
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let location = self.source.describe();

        let config = match read_config(&self.source) {
            Ok(c) => c,
            Err(SerenadeError::ConfigNotFound { path }) => {
                ui.error(&format!(
                    "No configuration found at {}. Run 'serenade init' first.",
                    path.display()
                ));
                return Ok(CommandResult::failure(2));
            }
            Err(e @ SerenadeError::ConfigParseError { .. })
            | Err(e @ SerenadeError::ConfigFetchFailed { .. }) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        ui.show_header(&format!("Checking {}", location));

        let findings = validate_config(&config);
        let errors = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count();
        let warnings = findings.len() - errors;

        for finding in &findings {
            match finding.severity {
                Severity::Error => ui.error(&Self::format_finding(finding)),
                Severity::Warning => ui.warning(&Self::format_finding(finding)),
            }
        }

        if errors == 0 && warnings == 0 {
            ui.success(&format!(
                "Configuration is valid ({} wizard steps)",
                config.wizard.steps.len()
            ));
            return Ok(CommandResult::success());
        }

        ui.message(&format!("{} error(s), {} warning(s)", errors, warnings));

        if errors > 0 || (self.args.strict && warnings > 0) {
            Ok(CommandResult::failure(1))
        } else {
            ui.success("Configuration is usable");
            Ok(CommandResult::success())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = r#"{
        "personal": {
            "toName": "Sam",
            "introLines": ["Hi"],
            "noSequence": [{ "phrase": "No?" }, { "reset": true }]
        },
        "choices": {
            "food": ["Pizza"],
            "flowers": ["Roses"],
            "sweets": ["Chocolate"]
        }
    }"#;

    fn check(content: &str, strict: bool) -> (CommandResult, MockUI) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("site.config.json");
        fs::write(&path, content).unwrap();

        let cmd = CheckCommand::new(&ConfigSource::File(path), CheckArgs { strict });
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();
        (result, ui)
    }

    #[test]
    fn valid_config_passes() {
        let (result, ui) = check(VALID, false);
        assert!(result.success);
        assert!(ui.has_success("Configuration is valid (4 wizard steps)"));
    }

    #[test]
    fn warnings_pass_unless_strict() {
        let content = r#"{ "personal": { "toName": "Sam" } }"#;

        let (relaxed, ui) = check(content, false);
        assert!(relaxed.success);
        assert!(ui.has_warning("[no-intro-lines]"));
        assert!(ui.has_warning("(step 'food')"));

        let (strict, _) = check(content, true);
        assert_eq!(strict.exit_code, 1);
    }

    #[test]
    fn errors_fail() {
        let content = r#"{ "wizard": { "steps": [] } }"#;
        let (result, ui) = check(content, false);
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("[empty-wizard]"));
    }

    #[test]
    fn parse_error_fails() {
        let (result, ui) = check("{ not json", false);
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("Failed to parse config"));
    }

    #[test]
    fn missing_config_exits_2() {
        let temp = TempDir::new().unwrap();
        let cmd = CheckCommand::new(
            &ConfigSource::File(temp.path().join("nope.json")),
            CheckArgs::default(),
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 2);
        assert!(ui.has_error("serenade init"));
    }
}
