//! Shared setup for commands: credentials, client, and stores.

use anyhow::{Context, Result, anyhow};
use picto_client::{ClientConfig, IconClient};
use picto_core::Credential;
use picto_store::{LibraryStore, SettingsStore, keychain};
use tracing::debug;

use crate::Cli;
use crate::output::TextFormatter;

/// Where the API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// `--api-key` or `FREEPIK_API_KEY`.
    Argument,
    /// The system keychain.
    Keychain,
}

/// Resolves the API key: explicit argument first, then the keychain.
pub fn resolve_api_key(cli: &Cli) -> Result<(Credential, KeySource)> {
    if let Some(key) = &cli.api_key {
        return Ok((Credential::new(key.as_str()), KeySource::Argument));
    }
    keychain::get_api_key()
        .map(|key| (Credential::new(key), KeySource::Keychain))
        .ok_or_else(|| {
            anyhow!(
                "No API key configured. Pass --api-key, set FREEPIK_API_KEY, \
                 or run `picto config set-key <KEY>`"
            )
        })
}

/// Chooses the client configuration: `--base-url`, then the relay
/// preference, then the upstream API.
pub fn client_config(base_url: Option<&str>, relay_url: Option<&str>) -> Result<ClientConfig> {
    let config = match (base_url, relay_url) {
        (Some(base), _) => ClientConfig::direct()
            .with_base_url(base)
            .context("invalid --base-url")?,
        (None, Some(relay)) => {
            ClientConfig::via_relay(relay).context("invalid relay URL in preferences")?
        }
        (None, None) => ClientConfig::direct(),
    };
    Ok(config)
}

/// Builds the API client from flags and preferences.
pub async fn build_client(cli: &Cli, settings: &SettingsStore) -> Result<IconClient> {
    let (credential, source) = resolve_api_key(cli)?;
    debug!(key_source = ?source, "API key resolved");
    client_with_key(cli, settings, credential).await
}

/// Builds the API client for an explicit credential.
pub async fn client_with_key(
    cli: &Cli,
    settings: &SettingsStore,
    credential: Credential,
) -> Result<IconClient> {
    let relay_url = settings.relay_url().await;
    let config = client_config(cli.base_url.as_deref(), relay_url.as_deref())?;
    debug!(base_url = config.base_url(), "Client configured");

    Ok(IconClient::with_config(credential, config)?)
}

/// Loads preferences from the default location.
pub async fn settings() -> SettingsStore {
    SettingsStore::load_default().await
}

/// Opens the default library.
pub fn library() -> LibraryStore {
    LibraryStore::open_default()
}

/// Text formatter honoring `--no-color`.
pub fn text_formatter(cli: &Cli) -> TextFormatter {
    TextFormatter::new(!cli.no_color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_wins_over_relay() {
        let config = client_config(
            Some("http://localhost:9000/v1"),
            Some("https://relay.example.dev"),
        )
        .unwrap();
        assert_eq!(config.base_url(), "http://localhost:9000/v1");
    }

    #[test]
    fn test_relay_preference_used() {
        let config = client_config(None, Some("https://relay.example.dev")).unwrap();
        assert_eq!(config.base_url(), "https://relay.example.dev/v1");
    }

    #[test]
    fn test_direct_by_default() {
        let config = client_config(None, None).unwrap();
        assert_eq!(config.base_url(), picto_client::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(client_config(Some("nope"), None).is_err());
    }
}
