//! Configuration schema definitions for Serenade.
//!
//! This module contains the struct definitions that map to the site
//! configuration document (`site.config.json`). Keys are camelCase so that
//! documents written for the browser version of the page load unchanged.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default text of the sentinel "let me type my own" option.
pub const DEFAULT_OTHER_OPTION: &str = "Something else (tell me)";

/// Root configuration structure for `site.config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// Names and display text
    pub personal: PersonalConfig,

    /// Images and audio
    pub media: MediaConfig,

    /// Option lists keyed by wizard step key
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub choices: HashMap<String, Vec<String>>,

    /// Remote submission target
    pub github: GithubConfig,

    /// Sequencer and countdown timing
    pub timing: TimingConfig,

    /// Preference wizard layout
    pub wizard: WizardConfig,
}

/// Names and display/template strings.
///
/// Template strings may contain `{toName}` and `{fromName}` placeholders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PersonalConfig {
    /// Window/page title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,

    /// Recipient name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_name: Option<String>,

    /// Requester name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,

    /// Welcome screen title template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welcome_title: Option<String>,

    /// Narrative lines revealed one at a time
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intro_lines: Vec<String>,

    /// Hint shown under the narrative while it is running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro_hint: Option<String>,

    /// Decision prompt heading template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_heading: Option<String>,

    /// Heading shown after accepting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_message_head: Option<String>,

    /// Follow-up message template shown after accepting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_message: Option<String>,

    /// Escalating decline steps
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub no_sequence: Vec<DeclineStep>,

    /// Final screen title template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_thanks_title: Option<String>,

    /// Final screen body template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_thanks_body: Option<String>,
}

/// One entry of the decline escalation sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DeclineStep {
    /// Replacement image for the prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gif: Option<String>,

    /// Replacement label for the decline control
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase: Option<String>,

    /// Reset both controls and switch the decline control to evasive mode
    #[serde(skip_serializing_if = "is_false")]
    pub reset: bool,
}

/// Images and audio cues.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct MediaConfig {
    /// Image on the welcome screen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meme_welcome_gif: Option<String>,

    /// Image on the decision prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meme_question_gif: Option<String>,

    /// Image shown after accepting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meme_yes_gif: Option<String>,

    /// Image shown once the decline control turns evasive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_no_gif: Option<String>,

    /// Background music and cue sounds
    pub audio: AudioConfig,
}

/// Audio cue configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct AudioConfig {
    /// Enable audio at all
    #[serde(skip_serializing_if = "is_false")]
    pub enabled: bool,

    /// Background music
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgm_url: Option<String>,

    /// Cue played on accept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_url: Option<String>,

    /// Cue played on the first decline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_url: Option<String>,
}

/// Remote submission target (a GitHub issue comment thread).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct GithubConfig {
    /// Submit responses at all
    #[serde(skip_serializing_if = "is_false")]
    pub enabled: bool,

    /// API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Repository owner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    /// Repository name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    /// Issue that collects responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_number: Option<u64>,

    /// Bearer token (literal)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable holding the bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    /// Page reference written into the record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base: default_api_base(),
            owner: None,
            repo: None,
            issue_number: None,
            token: None,
            token_env: None,
            page_url: None,
        }
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

/// Timer settings for the narrative sequencer and the review countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct TimingConfig {
    /// Interval between automatic narrative advances
    pub intro_step_ms: u64,

    /// Delay between the last line appearing and the continue affordance
    pub reveal_delay_ms: u64,

    /// Seconds on the review countdown
    pub countdown_secs: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            intro_step_ms: 4000,
            reveal_delay_ms: 400,
            countdown_secs: 5,
        }
    }
}

/// Preference wizard layout.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct WizardConfig {
    /// Ordered steps
    pub steps: Vec<StepConfig>,

    /// Sentinel option that requires free text
    pub other_option: String,

    /// Inline hint shown when a step fails validation
    pub invalid_hint: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            steps: vec![
                StepConfig::select("food", "Food first 🍽️", "Pick one and I’ll plan around it.")
                    .with_label("Food")
                    .with_other_label("What food should we do?"),
                StepConfig::select("flowers", "Flowers 🌷", "One bouquet coming right up.")
                    .with_label("Flowers")
                    .with_other_label("What flowers should I get?"),
                StepConfig::select("sweets", "Sweet tooth 🍫", "Pick your favorite.")
                    .with_label("Sweet")
                    .with_other_label("What should I get?"),
                StepConfig::date("date", "Pick a date 📅", "When are you free?").with_label("Date"),
            ],
            other_option: DEFAULT_OTHER_OPTION.to_string(),
            invalid_hint: "Pick one (and fill the box if needed) 😊".to_string(),
        }
    }
}

/// One wizard step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepConfig {
    /// Stable identifier; also the key into `choices`
    pub key: String,

    /// Step heading
    pub title: String,

    /// Step subtitle
    #[serde(default)]
    pub subtitle: String,

    /// Label used in the review summary and the submitted record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Label above the free-text box for the sentinel option
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_label: Option<String>,

    /// Input kind
    #[serde(default)]
    pub kind: StepKind,
}

impl StepConfig {
    /// Create a single-select step.
    pub fn select(key: &str, title: &str, subtitle: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            label: None,
            other_label: None,
            kind: StepKind::Select,
        }
    }

    /// Create a date step.
    pub fn date(key: &str, title: &str, subtitle: &str) -> Self {
        Self {
            kind: StepKind::Date,
            ..Self::select(key, title, subtitle)
        }
    }

    /// Set the summary label.
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Set the free-text label.
    pub fn with_other_label(mut self, label: &str) -> Self {
        self.other_label = Some(label.to_string());
        self
    }

    /// Label for summaries, falling back to the key.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }
}

/// How a wizard step collects its answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Pick one option from the configured list
    #[default]
    Select,
    /// Enter a calendar date
    Date,
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_browser_style_document() {
        let json = r#"{
            "personal": {
                "toName": "Sam",
                "fromName": "Alex",
                "introLines": ["Hi {toName}", "Ready?"],
                "noSequence": [
                    { "phrase": "No?", "gif": "a.gif" },
                    { "phrase": "Really?", "reset": true }
                ]
            },
            "choices": { "food": ["Pizza", "Something else (tell me)"] },
            "github": { "enabled": true, "owner": "alex", "repo": "inbox", "issueNumber": 3 }
        }"#;

        let config: SiteConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.personal.to_name.as_deref(), Some("Sam"));
        assert_eq!(config.personal.intro_lines.len(), 2);
        assert_eq!(config.personal.no_sequence[0].phrase.as_deref(), Some("No?"));
        assert!(config.personal.no_sequence[1].reset);
        assert_eq!(config.choices["food"].len(), 2);
        assert!(config.github.enabled);
        assert_eq!(config.github.issue_number, Some(3));
        assert_eq!(config.github.api_base, "https://api.github.com");
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config: SiteConfig = serde_json::from_str("{}").unwrap();

        assert_eq!(config.timing, TimingConfig::default());
        assert_eq!(config.wizard.steps.len(), 4);
        assert_eq!(config.wizard.other_option, DEFAULT_OTHER_OPTION);
        assert!(!config.github.enabled);
        assert!(!config.media.audio.enabled);
    }

    #[test]
    fn default_wizard_ends_with_date_step() {
        let wizard = WizardConfig::default();
        let keys: Vec<_> = wizard.steps.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["food", "flowers", "sweets", "date"]);
        assert_eq!(wizard.steps[3].kind, StepKind::Date);
        assert_eq!(wizard.steps[2].display_label(), "Sweet");
    }

    #[test]
    fn step_kind_parses_lowercase() {
        let step: StepConfig =
            serde_json::from_str(r#"{ "key": "when", "title": "When?", "kind": "date" }"#)
                .unwrap();
        assert_eq!(step.kind, StepKind::Date);
        assert_eq!(step.display_label(), "when");
    }

    #[test]
    fn timing_partial_override_keeps_other_defaults() {
        let timing: TimingConfig = serde_json::from_str(r#"{ "countdownSecs": 3 }"#).unwrap();
        assert_eq!(timing.countdown_secs, 3);
        assert_eq!(timing.intro_step_ms, 4000);
    }

    #[test]
    fn parses_yaml_document() {
        let yaml = r#"
personal:
  toName: Sam
  introLines:
    - Hello
timing:
  introStepMs: 1000
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.personal.intro_lines, vec!["Hello".to_string()]);
        assert_eq!(config.timing.intro_step_ms, 1000);
    }
}
