use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// opencode auth file from ~/.local/share/opencode/auth.json.
///
/// A missing file or a missing entry only degrades the matching provider to
/// a missing-credential failure; a file that exists but is not valid JSON
/// aborts the whole run.
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    openai: Option<TokenEntry>,
    #[serde(rename = "github-copilot")]
    github_copilot: Option<TokenEntry>,
}

/// One provider entry. opencode has stored these both as bare token strings
/// and as objects keyed `access`/`accessToken`/`token`, so accept all of
/// them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TokenEntry {
    Detailed {
        #[serde(alias = "accessToken", alias = "token")]
        access: Option<String>,
        #[serde(rename = "accountId")]
        account_id: Option<String>,
    },
    Bare(String),
}

impl TokenEntry {
    fn token(&self) -> Option<&str> {
        match self {
            TokenEntry::Detailed { access, .. } => clean(access.as_deref()),
            TokenEntry::Bare(token) => clean(Some(token)),
        }
    }

    fn account_id(&self) -> Option<&str> {
        match self {
            TokenEntry::Detailed { account_id, .. } => clean(account_id.as_deref()),
            TokenEntry::Bare(_) => None,
        }
    }
}

/// Codex needs both the bearer token and the ChatGPT account id.
#[derive(Debug)]
pub struct CodexCredential<'a> {
    pub token: &'a str,
    pub account_id: &'a str,
}

impl Credentials {
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("opencode")
            .join("auth.json")
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Auth file at {} is not valid JSON", path.display()))
    }

    pub fn codex(&self) -> Option<CodexCredential<'_>> {
        let entry = self.openai.as_ref()?;
        Some(CodexCredential {
            token: entry.token()?,
            account_id: entry.account_id()?,
        })
    }

    pub fn copilot_token(&self) -> Option<&str> {
        self.github_copilot.as_ref()?.token()
    }
}

fn clean(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
