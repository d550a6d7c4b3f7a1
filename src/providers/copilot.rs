use crate::auth::Credentials;
use crate::models::{FetchError, Provider, Unit, UsageSnapshot};
use crate::providers::{check_counts, ProviderFetcher, REQUEST_TIMEOUT, USER_AGENT};
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.github.com";
const USAGE_PATH: &str = "/user/settings/billing/premium_request/usage";

/// Premium-request billing usage for one month. GitHub reports what was
/// consumed but not the plan's allotment, so the limit always comes from
/// configuration (see `config::COPILOT_PRO_MONTHLY_LIMIT`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BillingUsageResponse {
    #[serde(default)]
    usage_items: Vec<UsageItem>,
    gross_quantity: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageItem {
    product: String,
    gross_quantity: f64,
}

impl BillingUsageResponse {
    fn copilot_requests(&self) -> f64 {
        if self.usage_items.is_empty() {
            return self.gross_quantity.unwrap_or(0.0);
        }
        self.usage_items
            .iter()
            .filter(|item| item.product == "Copilot")
            .map(|item| item.gross_quantity)
            .sum()
    }
}

pub struct CopilotProvider {
    client: reqwest::Client,
    base_url: String,
    monthly_limit: f64,
}

impl CopilotProvider {
    pub fn new(monthly_limit: f64) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, monthly_limit)
    }

    pub fn with_base_url(base_url: impl Into<String>, monthly_limit: f64) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            monthly_limit,
        }
    }
}

#[async_trait]
impl ProviderFetcher for CopilotProvider {
    fn provider(&self) -> Provider {
        Provider::Copilot
    }

    async fn fetch(&self, credentials: &Credentials) -> Result<UsageSnapshot, FetchError> {
        let token = credentials
            .copilot_token()
            .ok_or(FetchError::MissingCredential)?;

        let today = Utc::now();
        let url = format!("{}{}", self.base_url, USAGE_PATH);
        tracing::debug!(%url, year = today.year(), month = today.month(), "fetching Copilot usage");

        let response = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .query(&[
                ("year", today.year().to_string()),
                ("month", today.month().to_string()),
            ])
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
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

        let usage: BillingUsageResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        let used = usage.copilot_requests();
        check_counts(used, self.monthly_limit)?;

        Ok(UsageSnapshot {
            provider: Provider::Copilot,
            used,
            limit: self.monthly_limit,
            unit: Unit::Requests,
            period: "monthly".to_string(),
        })
    }
}
