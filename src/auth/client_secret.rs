//! OAuth client secret kept in the OS keyring.
//!
//! The secret belongs to the client registration rather than to a mailbox,
//! so the keyring entry is keyed by client id.

use anyhow::{Result, anyhow};
use keyring::{Entry, Error as KeyringError};
use log::debug;

const SERVICE: &str = "rs_gmail_reader";
const CLIENT_SECRET_ENV: &str = "GOOGLE_CLIENT_SECRET";

fn entry(client_id: &str) -> Result<Entry> {
    Entry::new(SERVICE, client_id).map_err(|e| anyhow!("keyring entry for {client_id}: {e}"))
}

pub fn save_client_secret(client_id: &str, client_secret: &str) -> Result<()> {
    entry(client_id)?
        .set_password(client_secret)
        .map_err(|e| anyhow!(e.to_string()))
}

/// `None` when no secret was stored for this client.
pub fn load_client_secret(client_id: &str) -> Result<Option<String>> {
    match entry(client_id)?.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(KeyringError::NoEntry) => Ok(None),
        Err(e) => Err(anyhow!(e.to_string())),
    }
}

/// Keyring first, then `GOOGLE_CLIENT_SECRET`. A keyring that cannot be
/// reached is not fatal.
pub fn resolve_client_secret(client_id: &str) -> Option<String> {
    match load_client_secret(client_id) {
        Ok(Some(secret)) => return Some(secret),
        Ok(None) => {}
        Err(e) => debug!("keyring lookup failed: {e}"),
    }
    std::env::var(CLIENT_SECRET_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
}
