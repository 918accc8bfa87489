//! Init command implementation.
//!
//! The `serenade init` command writes a starter site config from the
//! embedded template, asking for names and the submission target.

use std::fs;
use std::path::PathBuf;

use include_dir::{include_dir, Dir};

use crate::cli::args::InitArgs;
use crate::config::{parse_config, ConfigSource, SiteConfig};
use crate::error::{Result, SerenadeError};
use crate::ui::{Prompt, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Embedded config templates.
static TEMPLATES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

const STARTER_TEMPLATE: &str = "site.config.json";

/// Default variable holding the submission token.
const DEFAULT_TOKEN_ENV: &str = "SERENADE_GITHUB_TOKEN";

/// Load the embedded starter configuration.
pub fn starter_config() -> Result<SiteConfig> {
    let file = TEMPLATES_DIR.get_file(STARTER_TEMPLATE).ok_or_else(|| {
        SerenadeError::ConfigNotFound {
            path: PathBuf::from("templates").join(STARTER_TEMPLATE),
        }
    })?;

    let content = file
        .contents_utf8()
        .ok_or_else(|| SerenadeError::ConfigParseError {
            path: PathBuf::from("templates").join(STARTER_TEMPLATE),
            message: "Invalid UTF-8".to_string(),
        })?;

    parse_config(content, STARTER_TEMPLATE)
}

/// The init command implementation.
pub struct InitCommand {
    source: ConfigSource,
    args: InitArgs,
}

impl InitCommand {
    /// Create a new init command.
    pub fn new(source: &ConfigSource, args: InitArgs) -> Self {
        Self {
            source: source.clone(),
            args,
        }
    }

    /// Where the config will be written.
    fn target(&self) -> Option<PathBuf> {
        if let Some(output) = &self.args.output {
            return Some(output.clone());
        }
        match &self.source {
            ConfigSource::File(path) => Some(path.clone()),
            ConfigSource::Url(_) => None,
        }
    }

    /// Fill the starter config from prompt answers.
    fn customize(&self, config: &mut SiteConfig, ui: &mut dyn UserInterface) -> Result<()> {
        let personal = &mut config.personal;
        let to_name = ui
            .prompt(&Prompt::input(
                "to_name",
                "Who is this for?",
                personal.to_name.as_deref(),
            ))?
            .as_string();
        let from_name = ui
            .prompt(&Prompt::input(
                "from_name",
                "Who is asking?",
                personal.from_name.as_deref(),
            ))?
            .as_string();
        personal.to_name = non_empty(to_name);
        personal.from_name = non_empty(from_name);

        let audio = ui
            .prompt(&Prompt::confirm("audio", "Play music and sound cues?", false))?
            .as_bool()
            .unwrap_or(false);
        config.media.audio.enabled = audio;

        let submit = ui
            .prompt(&Prompt::confirm(
                "submit",
                "Post answers as a GitHub issue comment?",
                false,
            ))?
            .as_bool()
            .unwrap_or(false);
        config.github.enabled = submit;
        if !submit {
            return Ok(());
        }

        let github = &mut config.github;
        let owner = ui
            .prompt(&Prompt::input("owner", "Repository owner", github.owner.as_deref()))?
            .as_string();
        let repo = ui
            .prompt(&Prompt::input("repo", "Repository name", github.repo.as_deref()))?
            .as_string();
        let issue = ui
            .prompt(&Prompt::input(
                "issue_number",
                "Issue number",
                github.issue_number.map(|n| n.to_string()).as_deref(),
            ))?
            .as_string();
        let token_env = ui
            .prompt(&Prompt::input(
                "token_env",
                "Environment variable holding the token",
                Some(github.token_env.as_deref().unwrap_or(DEFAULT_TOKEN_ENV)),
            ))?
            .as_string();

        github.owner = non_empty(owner);
        github.repo = non_empty(repo);
        github.issue_number = match issue.trim().parse() {
            Ok(n) => Some(n),
            Err(_) => {
                ui.warning(&format!(
                    "'{}' is not an issue number; set github.issueNumber by hand",
                    issue.trim()
                ));
                None
            }
        };
        github.token_env = non_empty(token_env);
        Ok(())
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl Command for InitCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(target) = self.target() else {
            ui.error("Cannot write a config to a URL. Pass --output <path>.");
            return Ok(CommandResult::failure(2));
        };

        if target.exists() && !self.args.force {
            ui.warning(&format!(
                "{} already exists. Use --force to overwrite.",
                target.display()
            ));
            return Ok(CommandResult::failure(1));
        }

        ui.show_header("Serenade setup");

        let mut config = starter_config()?;
        if !self.args.minimal {
            self.customize(&mut config, ui)?;
        }

        let content = serde_json::to_string_pretty(&config)
            .map_err(|e| SerenadeError::Other(e.into()))?;

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, format!("{}\n", content))?;
        tracing::debug!("Wrote starter config to {}", target.display());

        ui.success(&format!("Created {}", target.display()));
        ui.show_hint("Edit the texts and images, then run 'serenade check'.");
        if config.github.enabled {
            if let Some(var) = &config.github.token_env {
                ui.show_hint(&format!("Export {} before 'serenade run'.", var));
            }
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config, validate};
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn command(path: PathBuf, args: InitArgs) -> InitCommand {
        InitCommand::new(&ConfigSource::File(path), args)
    }

    #[test]
    fn starter_template_is_valid() {
        let config = starter_config().unwrap();
        validate(&config).unwrap();
        assert!(!config.personal.intro_lines.is_empty());
        assert!(config.personal.no_sequence.iter().any(|s| s.reset));
    }

    #[test]
    fn minimal_writes_template_without_prompts() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config").join("site.config.json");
        let cmd = command(
            path.clone(),
            InitArgs {
                minimal: true,
                ..Default::default()
            },
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.prompts_shown().is_empty());
        let config = load_config(&ConfigSource::File(path)).unwrap();
        assert_eq!(config.personal.to_name.as_deref(), Some("You"));
    }

    #[test]
    fn prompts_fill_names_and_submission() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("site.config.json");
        let cmd = command(path.clone(), InitArgs::default());
        let mut ui = MockUI::new();
        ui.set_prompt_response("to_name", "Sam");
        ui.set_prompt_response("from_name", "Alex");
        ui.set_prompt_response("submit", "yes");
        ui.set_prompt_response("owner", "alex");
        ui.set_prompt_response("repo", "valentine");
        ui.set_prompt_response("issue_number", "42");

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        let config = load_config(&ConfigSource::File(path)).unwrap();
        assert_eq!(config.personal.to_name.as_deref(), Some("Sam"));
        assert_eq!(config.personal.from_name.as_deref(), Some("Alex"));
        assert!(!config.media.audio.enabled);
        assert!(config.github.enabled);
        assert_eq!(config.github.owner.as_deref(), Some("alex"));
        assert_eq!(config.github.issue_number, Some(42));
        assert_eq!(
            config.github.token_env.as_deref(),
            Some("SERENADE_GITHUB_TOKEN")
        );
        assert!(ui.hints().iter().any(|h| h.contains("SERENADE_GITHUB_TOKEN")));
    }

    #[test]
    fn bad_issue_number_is_left_unset() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("site.config.json");
        let cmd = command(path.clone(), InitArgs::default());
        let mut ui = MockUI::new();
        ui.set_prompt_response("submit", "y");
        ui.set_prompt_response("issue_number", "soon");

        cmd.execute(&mut ui).unwrap();

        assert!(ui.has_warning("'soon' is not an issue number"));
        let config = load_config(&ConfigSource::File(path)).unwrap();
        assert_eq!(config.github.issue_number, None);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("site.config.json");
        fs::write(&path, "{}").unwrap();
        let mut ui = MockUI::new();

        let result = command(path.clone(), InitArgs::default())
            .execute(&mut ui)
            .unwrap();
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_warning("--force"));

        let forced = command(
            path,
            InitArgs {
                force: true,
                minimal: true,
                ..Default::default()
            },
        )
        .execute(&mut ui)
        .unwrap();
        assert!(forced.success);
    }

    #[test]
    fn url_source_needs_output() {
        let cmd = InitCommand::new(
            &ConfigSource::Url("https://example.com/site.json".to_string()),
            InitArgs::default(),
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 2);
        assert!(ui.has_error("--output"));
    }
}
