pub mod codex;
pub mod copilot;

use crate::auth::Credentials;
use crate::models::{FetchError, Provider, ProviderResult, UsageSnapshot};
use async_trait::async_trait;

/// Request timeout for every provider call.
pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

pub const USER_AGENT: &str = "limitline";

#[async_trait]
pub trait ProviderFetcher: Send + Sync {
    fn provider(&self) -> Provider;

    /// Issues at most one outbound request. Returns `MissingCredential`
    /// without touching the network when the token is absent.
    async fn fetch(&self, credentials: &Credentials) -> Result<UsageSnapshot, FetchError>;
}

/// Rejects payloads that would violate the snapshot invariants
/// (`used >= 0`, `limit > 0`).
pub(crate) fn check_counts(used: f64, limit: f64) -> Result<(), FetchError> {
    if used < 0.0 {
        return Err(FetchError::Parse(format!("negative used count {used}")));
    }
    if limit <= 0.0 {
        return Err(FetchError::Parse(format!("non-positive limit {limit}")));
    }
    Ok(())
}

/// Runs every adapter and collects one result per adapter, in adapter
/// order. A failing provider never stops the others.
pub async fn collect(
    adapters: &[Box<dyn ProviderFetcher>],
    credentials: &Credentials,
) -> Vec<ProviderResult> {
    let mut results = Vec::with_capacity(adapters.len());
    for adapter in adapters {
        let outcome = adapter.fetch(credentials).await;
        if let Err(err) = &outcome {
            tracing::debug!(provider = adapter.provider().label(), %err, "fetch failed");
        }
        results.push(ProviderResult {
            provider: adapter.provider(),
            outcome,
        });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Unit;

    struct StubFetcher {
        provider: Provider,
        fail: bool,
    }

    #[async_trait]
    impl ProviderFetcher for StubFetcher {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn fetch(&self, _credentials: &Credentials) -> Result<UsageSnapshot, FetchError> {
            if self.fail {
                return Err(FetchError::Network("connection refused".to_string()));
            }
            Ok(UsageSnapshot {
                provider: self.provider,
                used: 10.0,
                limit: 100.0,
                unit: Unit::Requests,
                period: "5h".to_string(),
            })
        }
    }

    fn stub(provider: Provider, fail: bool) -> Box<dyn ProviderFetcher> {
        Box::new(StubFetcher { provider, fail })
    }

    #[tokio::test]
    async fn preserves_adapter_order_across_failure_permutations() {
        for (codex_fails, copilot_fails) in
            [(false, false), (true, false), (false, true), (true, true)]
        {
            let adapters = vec![
                stub(Provider::Codex, codex_fails),
                stub(Provider::Copilot, copilot_fails),
            ];
            let results = collect(&adapters, &Credentials::default()).await;

            let order: Vec<Provider> = results.iter().map(|r| r.provider).collect();
            assert_eq!(order, vec![Provider::Codex, Provider::Copilot]);
            assert_eq!(results[0].outcome.is_err(), codex_fails);
            assert_eq!(results[1].outcome.is_err(), copilot_fails);
        }
    }
}
