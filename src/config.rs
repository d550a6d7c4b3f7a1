use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// GitHub Copilot's premium-request quota for the Pro plan. The billing API
/// reports usage but never the plan limit, so this is substituted into every
/// Copilot snapshot. Override it in config.toml or with
/// LIMITLINE_COPILOT_LIMIT when GitHub changes the allotment or you are on a
/// different plan.
pub const COPILOT_PRO_MONTHLY_LIMIT: f64 = 300.0;

const COPILOT_LIMIT_ENV: &str = "LIMITLINE_COPILOT_LIMIT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub copilot: CopilotConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopilotConfig {
    #[serde(default = "default_monthly_limit")]
    pub monthly_limit: f64,
}

fn default_monthly_limit() -> f64 {
    COPILOT_PRO_MONTHLY_LIMIT
}

impl Default for CopilotConfig {
    fn default() -> Self {
        Self {
            monthly_limit: default_monthly_limit(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            copilot: CopilotConfig::default(),
        }
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("limitline")
            .join("config.toml")
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };
        config.sanitize();
        config.apply_env(std::env::var(COPILOT_LIMIT_ENV).ok().as_deref());
        Ok(config)
    }

    /// A non-positive limit from the config file falls back to the default;
    /// the snapshot invariant requires `limit > 0`.
    fn sanitize(&mut self) {
        if self.copilot.monthly_limit <= 0.0 {
            self.copilot.monthly_limit = COPILOT_PRO_MONTHLY_LIMIT;
        }
    }

    /// Environment wins over the config file. Unparseable or non-positive
    /// values are ignored.
    fn apply_env(&mut self, copilot_limit: Option<&str>) {
        if let Some(limit) = copilot_limit
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| *v > 0.0)
        {
            self.copilot.monthly_limit = limit;
        }
    }
}
