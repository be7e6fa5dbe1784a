//! Config command - manage preferences and the stored API key.

use std::io::BufRead;

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use picto_client::{ApiError, ClientConfig};
use picto_core::{AiStyle, Credential, DownloadFormat, PngSize, SearchQuery, SearchResult};
use picto_store::{
    LibraryStore, SettingsStore, default_config_dir, default_data_dir, default_settings_path,
    keychain,
};
use serde_json::json;
use tracing::info;

use super::print_json;
use crate::context::{client_with_key, resolve_api_key, settings, text_formatter};
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Store the API key in the system keychain.
    SetKey {
        /// API key. Read from stdin when omitted.
        key: Option<String>,
    },

    /// Remove the API key from the system keychain.
    ClearKey,

    /// Check an API key with a one-result search.
    TestKey {
        /// Key to check. Defaults to the configured key.
        key: Option<String>,
    },

    /// Set the default download format.
    SetFormat {
        /// svg, png, gif, mp4, aep, json, psd or eps.
        #[arg(value_name = "FORMAT")]
        download_format: DownloadFormat,
    },

    /// Set the default PNG size.
    SetSize {
        /// 512, 256, 128, 64, 32, 24 or 16.
        size: PngSize,
    },

    /// Set the default generation style.
    SetStyle {
        /// solid, outline, color, flat or sticker.
        style: AiStyle,
    },

    /// Route requests through a relay. Omit the URL to go direct.
    SetRelay {
        /// Relay base URL, e.g. http://127.0.0.1:8787.
        url: Option<String>,
    },

    /// Reset preferences to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::SetKey { key } => set_key(key.as_deref(), cli),
        ConfigAction::ClearKey => clear_key(cli),
        ConfigAction::TestKey { key } => test_key(key.as_deref(), cli).await,
        ConfigAction::SetFormat { download_format } => {
            let store = settings().await;
            store.set_default_format(*download_format).await;
            save(&store, cli, &format!("Default format set to: {download_format}")).await
        }
        ConfigAction::SetSize { size } => {
            let store = settings().await;
            store.set_default_png_size(*size).await;
            save(&store, cli, &format!("Default PNG size set to: {size}px")).await
        }
        ConfigAction::SetStyle { style } => {
            let store = settings().await;
            store.set_default_ai_style(*style).await;
            save(&store, cli, &format!("Default style set to: {style}")).await
        }
        ConfigAction::SetRelay { url } => set_relay(url.as_deref(), cli).await,
        ConfigAction::Reset => {
            let store = settings().await;
            store.reset().await;
            save(&store, cli, "Configuration reset to defaults").await
        }
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let store = settings().await;
    let preferences = store.get().await;
    let key_configured = cli.api_key.is_some() || keychain::has_api_key();

    match cli.format {
        OutputFormat::Text => {
            println!(
                "{}",
                text_formatter(cli).format_preferences(&preferences, key_configured)
            );
        }
        OutputFormat::Json => print_json(
            cli,
            &json!({ "preferences": preferences, "apiKeyConfigured": key_configured }),
        )?,
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let data_dir = default_data_dir();
    let settings_path = default_settings_path();
    let library = LibraryStore::new(&data_dir);

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:     {}", config_dir.display());
            println!("Data dir:       {}", data_dir.display());
            println!("Settings file:  {}", settings_path.display());
            println!("Favorites file: {}", library.favorites_path().display());
            println!("History file:   {}", library.history_path().display());
        }
        OutputFormat::Json => print_json(
            cli,
            &json!({
                "configDir": config_dir.display().to_string(),
                "dataDir": data_dir.display().to_string(),
                "settingsFile": settings_path.display().to_string(),
                "favoritesFile": library.favorites_path().display().to_string(),
                "historyFile": library.history_path().display().to_string(),
            }),
        )?,
    }

    Ok(())
}

fn set_key(key: Option<&str>, cli: &Cli) -> Result<()> {
    let key = match key {
        Some(key) => key.trim().to_string(),
        None => read_key_from_stdin()?,
    };
    if key.is_empty() {
        bail!("API key is empty");
    }

    keychain::store_api_key(&key).context("failed to store API key in keychain")?;
    info!("API key stored");
    if !cli.quiet {
        println!("API key stored in keychain");
    }
    Ok(())
}

fn read_key_from_stdin() -> Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read API key from stdin")?;
    Ok(line.trim().to_string())
}

fn clear_key(cli: &Cli) -> Result<()> {
    keychain::delete_api_key().context("failed to remove API key from keychain")?;
    info!("API key removed");
    if !cli.quiet {
        println!("API key removed from keychain");
    }
    Ok(())
}

/// Result of checking a key against the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyCheck {
    Valid,
    Rejected,
    QuotaExhausted,
    Failed,
}

impl KeyCheck {
    fn of(result: &Result<SearchResult, ApiError>) -> Self {
        match result {
            Ok(_) => Self::Valid,
            Err(ApiError::InvalidCredential) => Self::Rejected,
            Err(ApiError::RateLimited { .. }) => Self::QuotaExhausted,
            Err(_) => Self::Failed,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Rejected => "rejected",
            Self::QuotaExhausted => "quota_exhausted",
            Self::Failed => "failed",
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::Valid => "API key is valid",
            Self::Rejected => "API key was rejected",
            Self::QuotaExhausted => "API key is valid but the daily quota is used up",
            Self::Failed => "Could not check the API key",
        }
    }
}

async fn test_key(key: Option<&str>, cli: &Cli) -> Result<()> {
    let credential = match key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => Credential::new(key),
        None => resolve_api_key(cli)?.0,
    };

    let store = settings().await;
    let client = client_with_key(cli, &store, credential).await?;
    let result = client
        .search_icons(&SearchQuery::new("test").per_page(1))
        .await;
    let check = KeyCheck::of(&result);
    info!(result = check.as_str(), "API key checked");

    match cli.format {
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", check.message());
            }
        }
        OutputFormat::Json => print_json(
            cli,
            &json!({ "result": check.as_str(), "valid": check == KeyCheck::Valid }),
        )?,
    }

    result.map(|_| ()).map_err(Into::into)
}

async fn set_relay(url: Option<&str>, cli: &Cli) -> Result<()> {
    let url = url.map(str::trim).filter(|u| !u.is_empty());
    if let Some(url) = url {
        ClientConfig::via_relay(url).context("invalid relay URL")?;
    }

    let store = settings().await;
    store.set_relay_url(url.map(str::to_string)).await;
    let message = match url {
        Some(url) => format!("Relay set to: {url}"),
        None => "Relay cleared; requests go direct".to_string(),
    };
    save(&store, cli, &message).await
}

async fn save(store: &SettingsStore, cli: &Cli, message: &str) -> Result<()> {
    store.save().await.context("failed to save preferences")?;
    info!(path = %store.path().display(), "Preferences saved");
    if !cli.quiet {
        println!("{message}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_check_classification() {
        assert_eq!(KeyCheck::of(&Ok(SearchResult::default())), KeyCheck::Valid);
        assert_eq!(
            KeyCheck::of(&Err(ApiError::InvalidCredential)),
            KeyCheck::Rejected
        );
        assert_eq!(
            KeyCheck::of(&Err(ApiError::RateLimited {
                guidance: picto_client::DAILY_QUOTA_GUIDANCE.to_string(),
                retry_after: None,
            })),
            KeyCheck::QuotaExhausted
        );
        assert_eq!(KeyCheck::of(&Err(ApiError::NotFound)), KeyCheck::Failed);
    }

    #[test]
    fn test_key_check_labels_are_distinct() {
        let checks = [
            KeyCheck::Valid,
            KeyCheck::Rejected,
            KeyCheck::QuotaExhausted,
            KeyCheck::Failed,
        ];
        for (i, a) in checks.iter().enumerate() {
            for b in &checks[i + 1..] {
                assert_ne!(a.message(), b.message());
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }
}
