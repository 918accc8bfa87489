//! The plain-text response record.
//!
//! Downstream readers parse this text, so the line order and labels are
//! fixed. Missing values render as an em dash placeholder.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::SiteConfig;
use crate::engine::InteractionState;

/// Placeholder for an absent value.
pub const UNANSWERED: &str = "—";

/// One wizard step's effective answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    /// Summary label for the step.
    pub label: String,
    /// Free text for the sentinel option, else the picked value.
    pub value: Option<String>,
}

impl Answer {
    pub fn display_value(&self) -> &str {
        self.value.as_deref().unwrap_or(UNANSWERED)
    }
}

/// Everything that goes into a submitted response.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    pub timestamp: DateTime<Utc>,
    pub to_name: Option<String>,
    pub from_name: Option<String>,
    pub decline_count: u32,
    /// The decline control went evasive at some point.
    pub evasive: bool,
    pub answers: Vec<Answer>,
    pub page: Option<String>,
    pub client: Option<String>,
}

impl SubmissionRecord {
    /// Assemble a record from the session.
    pub fn from_session(
        config: &SiteConfig,
        state: &InteractionState,
        answers: Vec<Answer>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            to_name: config.personal.to_name.clone(),
            from_name: config.personal.from_name.clone(),
            decline_count: state.decline_count,
            evasive: state.evasive_mode_active,
            answers,
            page: config.github.page_url.clone(),
            client: Some(client_identification()),
        }
    }

    /// Decline attempts, or `Max` once the control went evasive.
    pub fn attempts(&self) -> String {
        if self.evasive {
            "Max".to_string()
        } else {
            self.decline_count.to_string()
        }
    }

    /// Render the newline-joined record text.
    pub fn render(&self) -> String {
        let or_dash = |value: &Option<String>| value.clone().unwrap_or_else(|| UNANSWERED.to_string());

        let mut lines = vec![
            format!(
                "New Valentine response ({})",
                self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
            ),
            String::new(),
            format!("To: {}", or_dash(&self.to_name)),
            format!("From: {}", or_dash(&self.from_name)),
            String::new(),
            format!("No attempts: {}", self.attempts()),
            format!(
                "No evasive enabled: {}",
                if self.evasive { "Yes" } else { "No" }
            ),
            String::new(),
        ];

        lines.extend(
            self.answers
                .iter()
                .map(|a| format!("{}: {}", a.label, a.display_value())),
        );

        lines.push(String::new());
        lines.push(format!("Page: {}", or_dash(&self.page)));
        lines.push(format!("User-Agent: {}", or_dash(&self.client)));

        lines.join("\n")
    }
}

/// Identifies this client in records and request headers.
pub fn client_identification() -> String {
    format!(
        "serenade/{} ({} {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
