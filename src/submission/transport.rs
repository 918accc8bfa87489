//! Delivery of response records to a GitHub issue comment thread.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::json;

use crate::config::GithubConfig;
use crate::error::TransportError;

use super::record::client_identification;

/// Request timeout for a single delivery.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(20);

/// Sends a rendered record somewhere.
///
/// Implementations are called from a worker thread.
pub trait Transport: Send + Sync {
    fn deliver(&self, record: &str) -> Result<(), TransportError>;
}

/// Fully specified comment target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubTarget {
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub issue_number: u64,
    pub token: String,
}

impl GithubTarget {
    /// Build a target when owner, repo, issue, and token are all present.
    ///
    /// Ignores the enable flag; callers check that separately.
    pub fn from_config(config: &GithubConfig) -> Option<Self> {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Some(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            owner: present(&config.owner)?,
            repo: present(&config.repo)?,
            issue_number: config.issue_number?,
            token: present(&config.token)?,
        })
    }

    /// Comment endpoint for the issue. Owner and repo are percent-encoded
    /// as single path segments.
    pub fn comments_url(&self) -> Result<Url, TransportError> {
        let invalid = || TransportError::Request(format!("invalid API base '{}'", self.api_base));
        let issue = self.issue_number.to_string();
        let mut url = Url::parse(&self.api_base).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend([
                "repos",
                self.owner.as_str(),
                self.repo.as_str(),
                "issues",
                issue.as_str(),
                "comments",
            ]);
        Ok(url)
    }
}

/// Posts records as issue comments.
pub struct GithubTransport {
    client: Client,
    target: GithubTarget,
}

impl GithubTransport {
    pub fn new(target: GithubTarget) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(client_identification())
            .timeout(DELIVERY_TIMEOUT)
            .build()?;
        Ok(Self { client, target })
    }

    pub fn target(&self) -> &GithubTarget {
        &self.target
    }
}

impl Transport for GithubTransport {
    fn deliver(&self, record: &str) -> Result<(), TransportError> {
        let url = self.target.comments_url()?;
        tracing::debug!("Posting response to {}", url);

        let response = self
            .client
            .post(url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .bearer_auth(&self.target.token)
            .json(&json!({ "body": record }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TransportError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config(api_base: &str) -> GithubConfig {
        GithubConfig {
            enabled: true,
            api_base: api_base.to_string(),
            owner: Some("alex".to_string()),
            repo: Some("inbox".to_string()),
            issue_number: Some(7),
            token: Some("secret-token".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn target_requires_every_field() {
        assert!(GithubTarget::from_config(&config("https://api.github.com")).is_some());

        let mut missing_token = config("https://api.github.com");
        missing_token.token = Some("  ".to_string());
        assert!(GithubTarget::from_config(&missing_token).is_none());

        let mut missing_issue = config("https://api.github.com");
        missing_issue.issue_number = None;
        assert!(GithubTarget::from_config(&missing_issue).is_none());
    }

    #[test]
    fn comments_url_trims_trailing_slash() {
        let target = GithubTarget::from_config(&config("https://api.github.com/")).unwrap();
        assert_eq!(
            target.comments_url().unwrap().as_str(),
            "https://api.github.com/repos/alex/inbox/issues/7/comments"
        );
    }

    #[test]
    fn comments_url_encodes_owner_and_repo() {
        let mut config = config("https://ghe.example.com/api/v3");
        config.owner = Some("alex smith".to_string());
        config.repo = Some("in/box".to_string());
        let target = GithubTarget::from_config(&config).unwrap();

        assert_eq!(
            target.comments_url().unwrap().as_str(),
            "https://ghe.example.com/api/v3/repos/alex%20smith/in%2Fbox/issues/7/comments"
        );
    }

    #[test]
    fn unparseable_api_base_is_a_request_error() {
        let target = GithubTarget::from_config(&config("not a url")).unwrap();
        assert!(matches!(
            target.comments_url(),
            Err(TransportError::Request(_))
        ));
    }

    #[test]
    fn posts_record_as_comment_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/repos/alex/inbox/issues/7/comments")
                .header("authorization", "Bearer secret-token")
                .header("accept", "application/vnd.github+json")
                .header("x-github-api-version", "2022-11-28")
                .json_body(json!({ "body": "hello" }));
            then.status(201).json_body(json!({ "id": 1 }));
        });

        let target = GithubTarget::from_config(&config(&server.base_url())).unwrap();
        let transport = GithubTransport::new(target).unwrap();

        transport.deliver("hello").unwrap();
        mock.assert();
    }

    #[test]
    fn non_success_status_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(401).body("Bad credentials");
        });

        let target = GithubTarget::from_config(&config(&server.base_url())).unwrap();
        let transport = GithubTransport::new(target).unwrap();

        match transport.deliver("hello") {
            Err(TransportError::Http { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "Bad credentials");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn unreachable_endpoint_is_a_request_error() {
        let target = GithubTarget::from_config(&config("http://127.0.0.1:9")).unwrap();
        let transport = GithubTransport::new(target).unwrap();

        assert!(matches!(
            transport.deliver("hello"),
            Err(TransportError::Request(_))
        ));
    }
}
