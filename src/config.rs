use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/auth";
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";
pub const DEFAULT_USER_ID: &str = "me";
pub const DEFAULT_MAX_RESULTS: u32 = 5;

const CLIENT_ID_ENV: &str = "GOOGLE_CLIENT_ID";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub client_id: String,
    pub redirect_uri: Option<String>,
    pub listen_addr: Option<String>,
    pub scope: Option<String>,
    pub token_path: Option<String>,
    pub user_id: Option<String>,
    pub max_results: Option<u32>,
}

impl Config {
    pub fn redirect_uri(&self) -> &str {
        self.redirect_uri.as_deref().unwrap_or(DEFAULT_REDIRECT_URI)
    }

    pub fn scope(&self) -> &str {
        self.scope.as_deref().unwrap_or(DEFAULT_SCOPE)
    }

    pub fn user_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(DEFAULT_USER_ID)
    }

    pub fn max_results(&self) -> u32 {
        self.max_results.unwrap_or(DEFAULT_MAX_RESULTS)
    }

    /// Address the local server binds to. Defaults to the redirect URI's
    /// port on loopback so the OAuth callback lands on us.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        if let Some(addr) = &self.listen_addr {
            return addr
                .parse()
                .map_err(|e| anyhow!("Invalid listen_addr '{addr}': {e}"));
        }

        let redirect = self.redirect_uri();
        let url =
            Url::parse(redirect).map_err(|e| anyhow!("Invalid redirect_uri '{redirect}': {e}"))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| anyhow!("redirect_uri missing/unknown port: {redirect}"))?;
        Ok(SocketAddr::from(([127, 0, 0, 1], port)))
    }
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("rs_gmail_reader"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn default_token_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("token.json");
    Ok(p)
}

pub fn load_config() -> Result<Config> {
    let mut cfg = load_config_from(&config_path()?)?;
    if let Ok(id) = std::env::var(CLIENT_ID_ENV)
        && !id.trim().is_empty()
    {
        cfg.client_id = id;
    }
    Ok(cfg)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        // create a template config for users to edit
        let sample = Config {
            client_id: "YOUR_CLIENT_ID.apps.googleusercontent.com".to_string(),
            redirect_uri: Some(DEFAULT_REDIRECT_URI.to_string()),
            listen_addr: None,
            scope: Some(DEFAULT_SCOPE.to_string()),
            token_path: None,
            user_id: Some(DEFAULT_USER_ID.to_string()),
            max_results: Some(DEFAULT_MAX_RESULTS),
        };
        let tom = toml::to_string_pretty(&sample)?;
        fs::write(path, tom)?;
        return Err(anyhow::anyhow!(
            "Created template config at {}; edit it and run again",
            path.display()
        ));
    }
    let s = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&s)?;
    Ok(cfg)
}

pub fn resolve_token_path(cfg: &Config) -> Result<PathBuf> {
    if let Some(p) = &cfg.token_path {
        Ok(PathBuf::from(p))
    } else {
        default_token_path()
    }
}
