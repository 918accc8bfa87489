//! Configuration validation rules.
//!
//! Only structural problems that would break the engine are errors:
//! - The wizard must have at least one step
//! - Step keys must be unique and non-empty
//! - At most one step may be a date step
//! - Timer settings must be non-zero
//!
//! Missing content (no intro lines, no option list for a step, no decline
//! sequence) is reported as a warning; the engine copes with it at runtime.

use crate::config::schema::{SiteConfig, StepKind};
use crate::error::{Result, SerenadeError};
use std::collections::HashSet;

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration cannot be used.
    Error,
    /// The configuration works but probably not as intended.
    Warning,
}

/// Validation finding with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable message
    pub message: String,
    /// Wizard step key if the finding is step-specific
    pub step: Option<String>,
    /// Error or warning
    pub severity: Severity,
}

impl ValidationError {
    fn error(rule: &str, message: String, step: Option<&str>) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            step: step.map(str::to_string),
            severity: Severity::Error,
        }
    }

    fn warning(rule: &str, message: String, step: Option<&str>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(rule, message, step)
        }
    }
}

/// Check a configuration and return every finding.
///
/// Collects all findings rather than stopping at the first one.
pub fn validate_config(config: &SiteConfig) -> Vec<ValidationError> {
    let mut findings = Vec::new();

    findings.extend(validate_wizard(config));
    findings.extend(validate_timing(config));
    findings.extend(check_content(config));

    findings
}

fn validate_wizard(config: &SiteConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let steps = &config.wizard.steps;

    if steps.is_empty() {
        errors.push(ValidationError::error(
            "empty-wizard",
            "Wizard must have at least one step".to_string(),
            None,
        ));
        return errors;
    }

    let mut seen = HashSet::new();
    for step in steps {
        if step.key.trim().is_empty() {
            errors.push(ValidationError::error(
                "empty-step-key",
                format!("Wizard step '{}' has an empty key", step.title),
                None,
            ));
        } else if !seen.insert(step.key.as_str()) {
            errors.push(ValidationError::error(
                "duplicate-step-key",
                format!("Wizard step key '{}' is used more than once", step.key),
                Some(&step.key),
            ));
        }
    }

    let date_steps = steps.iter().filter(|s| s.kind == StepKind::Date).count();
    if date_steps > 1 {
        errors.push(ValidationError::error(
            "multiple-date-steps",
            format!("Wizard has {} date steps; at most one is allowed", date_steps),
            None,
        ));
    }

    if config.wizard.other_option.trim().is_empty() {
        errors.push(ValidationError::error(
            "empty-other-option",
            "Wizard 'otherOption' must not be empty".to_string(),
            None,
        ));
    }

    errors
}

fn validate_timing(config: &SiteConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let timing = &config.timing;

    if timing.intro_step_ms == 0 {
        errors.push(ValidationError::error(
            "zero-interval",
            "timing.introStepMs must be greater than zero".to_string(),
            None,
        ));
    }

    if timing.countdown_secs == 0 {
        errors.push(ValidationError::error(
            "zero-countdown",
            "timing.countdownSecs must be greater than zero".to_string(),
            None,
        ));
    }

    errors
}

fn check_content(config: &SiteConfig) -> Vec<ValidationError> {
    let mut warnings = Vec::new();

    if config.personal.intro_lines.is_empty() {
        warnings.push(ValidationError::warning(
            "no-intro-lines",
            "personal.introLines is empty; the intro will finish immediately".to_string(),
            None,
        ));
    }

    if !config.personal.no_sequence.iter().any(|s| s.reset) {
        warnings.push(ValidationError::warning(
            "no-reset-step",
            "personal.noSequence has no reset step; the decline button never turns evasive"
                .to_string(),
            None,
        ));
    }

    for step in &config.wizard.steps {
        if step.kind != StepKind::Select {
            continue;
        }
        let has_options = config
            .choices
            .get(&step.key)
            .is_some_and(|options| !options.is_empty());
        if !has_options {
            warnings.push(ValidationError::warning(
                "no-options",
                format!("choices.{} is missing or empty", step.key),
                Some(&step.key),
            ));
        }
    }

    if config.github.enabled {
        let github = &config.github;
        let complete = github.owner.is_some()
            && github.repo.is_some()
            && github.issue_number.is_some()
            && (github.token.is_some() || github.token_env.is_some());
        if !complete {
            warnings.push(ValidationError::warning(
                "incomplete-submission",
                "github is enabled but owner, repo, issueNumber, or token is missing".to_string(),
                None,
            ));
        }
    }

    warnings
}

/// Validate a configuration, returning an error describing every problem.
///
/// Warnings never fail validation.
pub fn validate(config: &SiteConfig) -> Result<()> {
    let errors: Vec<_> = validate_config(config)
        .into_iter()
        .filter(|f| f.severity == Severity::Error)
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(SerenadeError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
