//! Configuration discovery and loading.
//!
//! The site configuration is read exactly once at startup, either from a
//! local file or from an `http(s)` URL. JSON and YAML documents are both
//! accepted; the format is picked from the file extension.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::schema::SiteConfig;
use crate::config::validator::validate;
use crate::error::{Result, SerenadeError};

/// Default location of the site configuration, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/site.config.json";

/// Timeout for fetching a remote configuration document.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the configuration document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A local file.
    File(PathBuf),
    /// A remote document.
    Url(String),
}

impl ConfigSource {
    /// Interpret a CLI argument as a path or URL.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }

    /// Human-readable location for messages.
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }
}

impl Default for ConfigSource {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}

/// Document format, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn for_location(location: &str) -> Self {
        let lower = location.to_lowercase();
        let path_part = lower.split(['?', '#']).next().unwrap_or_default();
        if path_part.ends_with(".yml") || path_part.ends_with(".yaml") {
            Self::Yaml
        } else {
            Self::Json
        }
    }
}

/// Load, parse, and validate the site configuration.
///
/// # Errors
///
/// Returns `ConfigNotFound`, `ConfigFetchFailed`, `ConfigParseError`, or
/// `ConfigValidationError`. Any of these is the boot-time fault.
pub fn load_config(source: &ConfigSource) -> Result<SiteConfig> {
    let config = read_config(source)?;
    validate(&config)?;

    tracing::debug!(
        "Loaded configuration from {} ({} wizard steps)",
        source.describe(),
        config.wizard.steps.len()
    );

    Ok(config)
}

/// Load and parse the site configuration without validating it.
///
/// # Errors
///
/// Returns `ConfigNotFound`, `ConfigFetchFailed`, or `ConfigParseError`.
pub fn read_config(source: &ConfigSource) -> Result<SiteConfig> {
    let content = match source {
        ConfigSource::File(path) => read_file(path)?,
        ConfigSource::Url(url) => fetch_remote(url)?,
    };
    parse_config(&content, &source.describe())
}

/// Parse a configuration document without validating it.
///
/// # Errors
///
/// Returns `ConfigParseError` if the document is malformed.
pub fn parse_config(content: &str, location: &str) -> Result<SiteConfig> {
    let parsed = match Format::for_location(location) {
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        Format::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
    };

    parsed.map_err(|message| SerenadeError::ConfigParseError {
        path: PathBuf::from(location),
        message,
    })
}

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(SerenadeError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

fn fetch_remote(url: &str) -> Result<String> {
    let fetch_failed = |message: String| SerenadeError::ConfigFetchFailed {
        source_url: url.to_string(),
        message,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("serenade/", env!("CARGO_PKG_VERSION")))
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| fetch_failed(e.to_string()))?;

    let response = client
        .get(url)
        .header("Cache-Control", "no-store")
        .send()
        .map_err(|e| fetch_failed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_failed(format!("HTTP {}", status.as_u16())));
    }

    response.text().map_err(|e| fetch_failed(e.to_string()))
}

/// Fill `github.token` from `github.tokenEnv` when no literal token is set.
///
/// `lookup` is usually `|name| std::env::var(name).ok()`; it is injected so
/// the engine itself never reads the environment.
pub fn resolve_credentials<F>(config: &mut SiteConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let github = &mut config.github;
    let has_literal = github.token.as_deref().is_some_and(|t| !t.is_empty());
    if has_literal {
        return;
    }
    if let Some(var) = github.token_env.as_deref() {
        match lookup(var) {
            Some(token) if !token.is_empty() => github.token = Some(token),
            _ => tracing::debug!("Submission token variable {} is not set", var),
        }
    }
}
