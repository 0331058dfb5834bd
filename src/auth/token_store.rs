use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Access token persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at_epoch: Option<i64>, // epoch seconds
}

impl StoredToken {
    pub fn is_expired(&self, now_epoch: i64) -> bool {
        self.expires_at_epoch.is_some_and(|exp| now_epoch >= exp)
    }
}

/// JSON token file. Tokens are only ever overwritten, never removed.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the token file if present.
    ///
    /// A file holding nothing but the raw access token (written by older
    /// versions) is read as a token without expiry.
    pub fn load(&self) -> Result<Option<StoredToken>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&self.path)
            .with_context(|| format!("reading token file {}", self.path.display()))?;
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<StoredToken>(trimmed) {
            Ok(tok) => Ok(Some(tok)),
            Err(_) if !trimmed.starts_with('{') => Ok(Some(StoredToken {
                access_token: trimmed.to_string(),
                refresh_token: None,
                expires_at_epoch: None,
            })),
            Err(e) => Err(e)
                .with_context(|| format!("parsing token file {}", self.path.display())),
        }
    }

    pub fn save(&self, token: &StoredToken) -> Result<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        let s = serde_json::to_string_pretty(token)?;
        fs::write(&self.path, s)
            .with_context(|| format!("writing token file {}", self.path.display()))?;
        Ok(())
    }
}
