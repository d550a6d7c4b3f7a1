use crate::auth::Credentials;
use crate::models::{FetchError, Provider, Unit, UsageSnapshot};
use crate::providers::{check_counts, ProviderFetcher, REQUEST_TIMEOUT, USER_AGENT};
use async_trait::async_trait;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://chatgpt.com/backend-api";
const USAGE_PATH: &str = "/wham/usage";

/// Response from /wham/usage. The primary window carries the used request
/// count and the plan limit for the current 5-hour session.
#[derive(Debug, Deserialize)]
struct UsageResponse {
    rate_limit: RateLimitDetails,
}

#[derive(Debug, Deserialize)]
struct RateLimitDetails {
    primary_window: WindowCounts,
}

#[derive(Debug, Deserialize)]
struct WindowCounts {
    used: f64,
    limit: f64,
}

pub struct CodexProvider {
    client: reqwest::Client,
    base_url: String,
}

impl CodexProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for CodexProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderFetcher for CodexProvider {
    fn provider(&self) -> Provider {
        Provider::Codex
    }

    async fn fetch(&self, credentials: &Credentials) -> Result<UsageSnapshot, FetchError> {
        let creds = credentials.codex().ok_or(FetchError::MissingCredential)?;

        let url = format!("{}{}", self.base_url, USAGE_PATH);
        tracing::debug!(%url, "fetching Codex usage");

        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .header("Authorization", format!("Bearer {}", creds.token))
            .header("chatgpt-account-id", creds.account_id)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let usage: UsageResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        let window = usage.rate_limit.primary_window;
        check_counts(window.used, window.limit)?;

        Ok(UsageSnapshot {
            provider: Provider::Codex,
            used: window.used,
            limit: window.limit,
            unit: Unit::Requests,
            period: "5h".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> Credentials {
        serde_json::from_value(json!({
            "openai": {"access": "sk-test", "accountId": "acct-1"}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn maps_counts_into_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wham/usage"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(header("chatgpt-account-id", "acct-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rate_limit": {"primary_window": {"used": 42, "limit": 100}}
            })))
            .mount(&server)
            .await;

        let provider = CodexProvider::with_base_url(server.uri());
        let snapshot = provider.fetch(&credentials()).await.unwrap();

        assert_eq!(snapshot.provider, Provider::Codex);
        assert_eq!(snapshot.used, 42.0);
        assert_eq!(snapshot.limit, 100.0);
        assert_eq!(snapshot.remaining(), 58.0);
        assert_eq!(snapshot.unit, Unit::Requests);
        assert_eq!(snapshot.period, "5h");
    }

    #[tokio::test]
    async fn missing_credential_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = CodexProvider::with_base_url(server.uri());
        let result = provider.fetch(&Credentials::default()).await;

        assert!(matches!(result, Err(FetchError::MissingCredential)));
        server.verify().await;
    }

    #[tokio::test]
    async fn server_error_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wham/usage"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let provider = CodexProvider::with_base_url(server.uri());
        let result = provider.fetch(&credentials()).await;

        match result {
            Err(FetchError::Api { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_fields_become_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wham/usage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rate_limit": {"primary_window": {"used_percent": 42}}
            })))
            .mount(&server)
            .await;

        let provider = CodexProvider::with_base_url(server.uri());
        let result = provider.fetch(&credentials()).await;

        assert!(matches!(result, Err(FetchError::Parse(_))));
    }

    #[tokio::test]
    async fn zero_limit_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wham/usage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "rate_limit": {"primary_window": {"used": 5, "limit": 0}}
            })))
            .mount(&server)
            .await;

        let provider = CodexProvider::with_base_url(server.uri());
        let result = provider.fetch(&credentials()).await;

        assert!(matches!(result, Err(FetchError::Parse(_))));
    }
}
