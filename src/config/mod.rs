//! Configuration loading, parsing, and validation for Serenade.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - Loading from files or URLs in [`loader`]
//! - Validation in [`validator`]
//! - Placeholder substitution in [`template`]
//!
//! # Example
//!
//! ```
//! use serenade::config::{load_config, ConfigSource};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("site.config.json");
//! fs::write(&path, r#"{ "personal": { "toName": "Sam" } }"#).unwrap();
//!
//! let config = load_config(&ConfigSource::File(path)).unwrap();
//! assert_eq!(config.personal.to_name.as_deref(), Some("Sam"));
//! ```

pub mod loader;
pub mod schema;
pub mod template;
pub mod validator;

// Schema re-exports
pub use schema::{
    AudioConfig, DeclineStep, GithubConfig, MediaConfig, PersonalConfig, SiteConfig, StepConfig,
    StepKind, TimingConfig, WizardConfig, DEFAULT_OTHER_OPTION,
};

// Loader re-exports
pub use loader::{
    load_config, parse_config, read_config, resolve_credentials, ConfigSource, DEFAULT_CONFIG_PATH,
};

// Template re-exports
pub use template::{render_optional, render_template, TemplateVars};

// Validator re-exports
pub use validator::{validate, validate_config, Severity, ValidationError};

/// Generate the JSON Schema for the site configuration document.
pub fn json_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(SiteConfig);
    serde_json::to_value(&schema).unwrap_or_default()
}
