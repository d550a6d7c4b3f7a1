use thiserror::Error;

/// Supported providers, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Codex,
    Copilot,
}

impl Provider {
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Codex => "Codex",
            Provider::Copilot => "Copilot",
        }
    }

    /// Short label for the single-line status output.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Codex => "codex",
            Provider::Copilot => "copilot",
        }
    }
}

/// What the used/limit pair counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Requests,
    /// Reserved for providers that report only a percentage of quota
    /// consumed; neither current adapter emits it.
    #[allow(dead_code)]
    Percent,
}

impl Unit {
    pub fn suffix(&self) -> &'static str {
        match self {
            Unit::Requests => " requests",
            Unit::Percent => "%",
        }
    }
}

/// Normalized per-provider usage for the current period.
///
/// Invariants (enforced by the adapters): `used >= 0`, `limit > 0`.
/// `remaining` is not clamped; a negative value reflects real overage.
#[derive(Debug, Clone)]
pub struct UsageSnapshot {
    pub provider: Provider,
    pub used: f64,
    pub limit: f64,
    pub unit: Unit,
    /// Billing period this snapshot covers, e.g. "5h" or "monthly".
    pub period: String,
}

impl UsageSnapshot {
    pub fn remaining(&self) -> f64 {
        self.limit - self.used
    }

    pub fn used_percent(&self) -> f64 {
        (self.used / self.limit) * 100.0
    }
}

/// Per-provider fetch failure. Never fatal to the run; the report degrades
/// to an error line for that provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no credentials found; log in with opencode first")]
    MissingCredential,
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Parse(String),
}

impl FetchError {
    /// Short reason for report lines. Never includes response bodies or
    /// error chains.
    pub fn short_reason(&self) -> String {
        match self {
            FetchError::MissingCredential => "no credentials".to_string(),
            FetchError::Network(_) => "network error".to_string(),
            FetchError::Api { status, .. } => format!("HTTP {status}"),
            FetchError::Parse(_) => "bad response".to_string(),
        }
    }
}

/// Outcome of one adapter invocation.
#[derive(Debug)]
pub struct ProviderResult {
    pub provider: Provider,
    pub outcome: Result<UsageSnapshot, FetchError>,
}
