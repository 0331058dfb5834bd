use anyhow::{Result, anyhow};
use log::{info, warn};
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::reqwest::http_client;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, RefreshToken, Scope, TokenResponse, TokenUrl,
};
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

use crate::auth::client_secret;
use crate::auth::token_store::{StoredToken, TokenStore};
use crate::config::Config;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Assumed lifetime when the provider does not report one.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3500;

/// OAuth client registration.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scope: String,
}

impl AuthSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            client_id: cfg.client_id.clone(),
            client_secret: client_secret::resolve_client_secret(&cfg.client_id),
            redirect_uri: cfg.redirect_uri().to_string(),
            scope: cfg.scope().to_string(),
        }
    }
}

/// State of an authorization started by [`AuthContext::authorize_url`],
/// needed to finish the code exchange.
pub struct PendingAuthorization {
    csrf: CsrfToken,
    verifier: PkceCodeVerifier,
}

impl PendingAuthorization {
    pub fn state(&self) -> &str {
        self.csrf.secret()
    }
}

/// Authorization state handed to the mail fetcher.
///
/// Created from whatever token is on disk (possibly none). Only a
/// successful code exchange or refresh changes it, and every change is
/// written back to the store.
pub struct AuthContext {
    client: BasicClient,
    scope: String,
    store: TokenStore,
    token: Option<StoredToken>,
}

impl AuthContext {
    pub fn load(settings: &AuthSettings, store: TokenStore) -> Result<Self> {
        let client = BasicClient::new(
            ClientId::new(settings.client_id.clone()),
            settings.client_secret.clone().map(ClientSecret::new),
            AuthUrl::new(AUTH_URL.to_string())?,
            Some(TokenUrl::new(TOKEN_URL.to_string())?),
        )
        .set_redirect_uri(
            RedirectUrl::new(settings.redirect_uri.clone())
                .map_err(|e| anyhow!("Invalid redirect_uri '{}': {e}", settings.redirect_uri))?,
        );

        let token = store.load()?;
        if token.is_none() {
            info!("no stored token at {}", store.path().display());
        }

        Ok(Self {
            client,
            scope: settings.scope.clone(),
            store,
            token,
        })
    }

    pub fn token(&self) -> Option<&StoredToken> {
        self.token.as_ref()
    }

    /// True when there is no token we could use, even after a refresh.
    pub fn needs_authorization(&self, now_epoch: i64) -> bool {
        match &self.token {
            None => true,
            Some(tok) => tok.is_expired(now_epoch) && tok.refresh_token.is_none(),
        }
    }

    /// Consent page URL (Authorization Code + PKCE, offline access).
    pub fn authorize_url(&self) -> (Url, PendingAuthorization) {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (url, csrf) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new(self.scope.clone()))
            .add_extra_param("access_type", "offline")
            .set_pkce_challenge(pkce_challenge)
            .url();

        (
            url,
            PendingAuthorization {
                csrf,
                verifier: pkce_verifier,
            },
        )
    }

    /// Exchange an authorization code and persist the resulting token.
    pub fn exchange_code(&mut self, code: &str, pending: Option<PendingAuthorization>) -> Result<()> {
        let mut request = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()));
        if let Some(p) = pending {
            request = request.set_pkce_verifier(p.verifier);
        }

        let response = request
            .request(http_client)
            .map_err(|e| anyhow!("Token exchange failed: {e}"))?;

        let token = stored_from_response(&response, None, now_epoch()?);
        self.store.save(&token)?;
        self.token = Some(token);
        info!("authorization code exchanged; token saved");
        Ok(())
    }

    /// A bearer token for the mail API, refreshed first if it has expired.
    pub fn access_token(&mut self) -> Result<String> {
        let now = now_epoch()?;
        let tok = self
            .token
            .as_ref()
            .ok_or_else(|| anyhow!("not authorized: visit /auth first"))?;

        if !tok.is_expired(now) {
            return Ok(tok.access_token.clone());
        }

        let Some(rt) = tok.refresh_token.clone() else {
            return Err(anyhow!("not authorized: stored token expired"));
        };

        info!("stored token expired; refreshing");
        let response = self
            .client
            .exchange_refresh_token(&RefreshToken::new(rt.clone()))
            .request(http_client)
            .map_err(|e| anyhow!("Token refresh failed: {e}"))?;

        let refreshed = stored_from_response(&response, Some(rt), now);
        if let Err(e) = self.store.save(&refreshed) {
            warn!("couldn't save refreshed token: {e}");
        }
        let access = refreshed.access_token.clone();
        self.token = Some(refreshed);
        Ok(access)
    }
}

fn stored_from_response(
    response: &BasicTokenResponse,
    previous_refresh: Option<String>,
    now: i64,
) -> StoredToken {
    let expires_in = response
        .expires_in()
        .map(|d| d.as_secs() as i64)
        .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

    StoredToken {
        access_token: response.access_token().secret().to_string(),
        refresh_token: response
            .refresh_token()
            .map(|r| r.secret().to_string())
            .or(previous_refresh),
        expires_at_epoch: Some(now + expires_in),
    }
}

pub fn now_epoch() -> Result<i64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64)
}
