//! Favorites and history commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;
use tracing::info;

use super::print_json;
use crate::context::{build_client, library, settings, text_formatter};
use crate::{Cli, OutputFormat};

/// Arguments for the favorites command.
#[derive(Args)]
pub struct FavoritesArgs {
    #[command(subcommand)]
    pub action: FavoritesAction,
}

/// Favorites subcommands.
#[derive(Subcommand)]
pub enum FavoritesAction {
    /// List favorite icons in the order they were added.
    List,

    /// Add an icon to favorites.
    Add {
        /// Icon id.
        id: u64,
    },

    /// Remove an icon from favorites.
    Remove {
        /// Icon id.
        id: u64,
    },

    /// Remove all favorites.
    Clear,
}

/// Arguments for the history command.
#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub action: HistoryAction,
}

/// History subcommands.
#[derive(Subcommand)]
pub enum HistoryAction {
    /// List recently used icons.
    List {
        /// Show at most this many entries.
        #[arg(long, short = 'n')]
        limit: Option<usize>,
    },

    /// Forget all recently used icons.
    Clear,
}

/// Runs the favorites command.
pub async fn run_favorites(args: &FavoritesArgs, cli: &Cli) -> Result<()> {
    let store = library();

    match &args.action {
        FavoritesAction::List => {
            let favorites = store.favorites().await;
            match cli.format {
                OutputFormat::Text => {
                    println!("{}", text_formatter(cli).format_favorites(&favorites));
                }
                OutputFormat::Json => print_json(cli, &favorites)?,
            }
        }
        FavoritesAction::Add { id } => {
            let settings = settings().await;
            let client = build_client(cli, &settings).await?;
            let detail = client.get_icon_by_id(*id).await?;
            store.add_favorite(&detail.icon).await;
            info!(id, "Favorite added");
            report(cli, &format!("Added {} to favorites", detail.icon.name), *id)?;
        }
        FavoritesAction::Remove { id } => {
            store.remove_favorite(*id).await;
            report(cli, &format!("Removed {id} from favorites"), *id)?;
        }
        FavoritesAction::Clear => {
            store.clear_favorites().await;
            if !cli.quiet {
                println!("Favorites cleared");
            }
        }
    }

    Ok(())
}

/// Runs the history command.
pub async fn run_history(args: &HistoryArgs, cli: &Cli) -> Result<()> {
    let store = library();

    match &args.action {
        HistoryAction::List { limit } => {
            let mut history = store.history().await;
            if let Some(limit) = limit {
                history.truncate(*limit);
            }
            match cli.format {
                OutputFormat::Text => {
                    println!("{}", text_formatter(cli).format_history(&history));
                }
                OutputFormat::Json => print_json(cli, &history)?,
            }
        }
        HistoryAction::Clear => {
            store.clear_history().await;
            if !cli.quiet {
                println!("History cleared");
            }
        }
    }

    Ok(())
}

fn report(cli: &Cli, message: &str, id: u64) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{message}");
            }
        }
        OutputFormat::Json => print_json(cli, &json!({ "id": id, "message": message }))?,
    }
    Ok(())
}
