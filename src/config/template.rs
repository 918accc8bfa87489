//! Placeholder substitution for display strings.
//!
//! Display text in the site configuration uses `{name}` placeholders.
//! Unknown placeholders are left verbatim so a typo in the configuration is
//! visible on screen instead of silently disappearing.
//!
//! # Example
//!
//! ```
//! use serenade::config::{render_template, TemplateVars};
//!
//! let vars = TemplateVars::new().with("toName", "Sam");
//! assert_eq!(render_template("Hi {toName} {oops}", &vars), "Hi Sam {oops}");
//! ```

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

use super::schema::SiteConfig;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"));

/// Values available to templates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateVars {
    values: HashMap<String, String>,
}

impl TemplateVars {
    /// Create an empty set of variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Variables derived from the site configuration (`toName`, `fromName`).
    ///
    /// Names missing from the configuration are not inserted, so their
    /// placeholders survive rendering.
    pub fn from_config(config: &SiteConfig) -> Self {
        let mut vars = Self::new();
        if let Some(name) = &config.personal.to_name {
            vars.insert("toName", name);
        }
        if let Some(name) = &config.personal.from_name {
            vars.insert("fromName", name);
        }
        vars
    }

    /// Add a value, builder style.
    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a value.
    pub fn insert(&mut self, name: &str, value: impl ToString) {
        self.values.insert(name.to_string(), value.to_string());
    }

    /// Look up a value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Replace every recognized `{name}` placeholder in `template`.
pub fn render_template(template: &str, vars: &TemplateVars) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Render an optional template, producing an empty string when absent.
pub fn render_optional(template: Option<&str>, vars: &TemplateVars) -> String {
    template
        .map(|t| render_template(t, vars))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_placeholders() {
        let vars = TemplateVars::new()
            .with("toName", "Sam")
            .with("fromName", "Alex");
        assert_eq!(
            render_template("{fromName} asks {toName}", &vars),
            "Alex asks Sam"
        );
    }

    #[test]
    fn leaves_unknown_placeholders_verbatim() {
        let vars = TemplateVars::new().with("toName", "Sam");
        assert_eq!(
            render_template("Dear {toName}, love {fromNmae}", &vars),
            "Dear Sam, love {fromNmae}"
        );
    }

    #[test]
    fn repeated_placeholders_all_replaced() {
        let vars = TemplateVars::new().with("n", 3);
        assert_eq!(render_template("{n}-{n}-{n}", &vars), "3-3-3");
    }

    #[test]
    fn ignores_non_word_braces() {
        let vars = TemplateVars::new().with("a", "x");
        assert_eq!(render_template("{ a } {a-b} {}", &vars), "{ a } {a-b} {}");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(
            render_template("no placeholders here", &TemplateVars::new()),
            "no placeholders here"
        );
    }

    #[test]
    fn from_config_skips_missing_names() {
        let mut config = SiteConfig::default();
        config.personal.to_name = Some("Sam".to_string());
        let vars = TemplateVars::from_config(&config);

        assert_eq!(vars.get("toName"), Some("Sam"));
        assert_eq!(vars.get("fromName"), None);
        assert_eq!(
            render_template("{toName} from {fromName}", &vars),
            "Sam from {fromName}"
        );
    }

    #[test]
    fn render_optional_absent_is_empty() {
        assert_eq!(render_optional(None, &TemplateVars::new()), "");
    }
}
