//! Download command - fetch a stock icon in a chosen format.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use picto_client::AssetFetcher;
use picto_core::{AssetLink, AssetSink, DownloadFormat, IconSummary, PngSize};
use picto_store::{FavoriteIcon, HistoryEntry, SettingsStore};
use serde_json::json;
use tracing::info;

use super::print_json;
use crate::context::{build_client, library, settings, text_formatter};
use crate::sink::{FileSink, output_path, sanitize_filename};
use crate::{Cli, OutputFormat};

/// Arguments for the download command.
#[derive(Args)]
pub struct DownloadArgs {
    /// Icon id.
    pub id: u64,

    /// File format (svg, png, gif, mp4, aep, json, psd, eps).
    /// Defaults to the saved preference.
    #[arg(long = "as", value_name = "FORMAT")]
    pub file_format: Option<DownloadFormat>,

    /// PNG size in pixels (512, 256, 128, 64, 32, 24, 16).
    #[arg(long, short)]
    pub size: Option<PngSize>,

    /// Output file or directory.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print the download link without fetching it.
    #[arg(long)]
    pub link_only: bool,

    /// Print the asset as a base64 data URL instead of saving it.
    #[arg(long, conflicts_with = "link_only")]
    pub data_url: bool,

    /// Do not record the icon in history. Skips the metadata lookup for
    /// icons not already in the library.
    #[arg(long)]
    pub no_history: bool,
}

/// Resolved format and size for one download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Selection {
    format: DownloadFormat,
    size: Option<PngSize>,
}

impl Selection {
    async fn resolve(args: &DownloadArgs, settings: &SettingsStore) -> Self {
        let format = match args.file_format {
            Some(format) => format,
            None => settings.default_format().await,
        };
        let size = if format.takes_size() {
            match args.size {
                Some(size) => Some(size),
                None => Some(settings.default_png_size().await),
            }
        } else {
            None
        };
        Self { format, size }
    }
}

/// Runs the download command.
pub async fn run(args: &DownloadArgs, cli: &Cli) -> Result<()> {
    let settings = settings().await;
    let client = build_client(cli, &settings).await?;
    let selection = Selection::resolve(args, &settings).await;

    let store = library();
    let known = known_icon(&store.history().await, &store.favorites().await, args.id);
    let icon = match known {
        Some(icon) => icon,
        None if args.no_history => placeholder_icon(args.id),
        None => client.get_icon_by_id(args.id).await?.icon,
    };

    let link = client
        .download_icon(args.id, selection.format, selection.size)
        .await?;
    info!(id = args.id, format = %selection.format, "Download link obtained");

    if args.link_only {
        print_link(&link, cli)?;
    } else if args.data_url {
        let asset = AssetFetcher::new()?.fetch(&link.url).await?;
        match cli.format {
            OutputFormat::Text => println!("{}", asset.to_data_url()),
            OutputFormat::Json => print_json(
                cli,
                &json!({
                    "id": args.id,
                    "contentType": asset.content_type,
                    "dataUrl": asset.to_data_url(),
                }),
            )?,
        }
    } else {
        save(&link, &icon, selection, args, cli).await?;
    }

    if !args.no_history {
        store.add_to_history(&icon).await;
    }
    Ok(())
}

/// Icon metadata already held locally, most recent first.
fn known_icon(
    history: &[HistoryEntry],
    favorites: &[FavoriteIcon],
    id: u64,
) -> Option<IconSummary> {
    history
        .iter()
        .map(|entry| &entry.icon)
        .chain(favorites.iter().map(|favorite| &favorite.icon))
        .find(|icon| icon.id == id)
        .cloned()
}

/// Bare summary used when no metadata is fetched.
fn placeholder_icon(id: u64) -> IconSummary {
    IconSummary {
        id,
        name: String::new(),
        slug: String::new(),
        thumbnails: Vec::new(),
        style: None,
        family: None,
        tags: Vec::new(),
    }
}

async fn save(
    link: &AssetLink,
    icon: &IconSummary,
    selection: Selection,
    args: &DownloadArgs,
    cli: &Cli,
) -> Result<()> {
    let filename = default_filename(link, icon, selection);
    let path = output_path(args.output.as_deref(), &filename);

    let sink = FileSink::new(AssetFetcher::new()?, path);
    sink.insert_asset(&link.url).await?;

    let display = sink.path().display().to_string();
    match cli.format {
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", text_formatter(cli).format_saved(&display));
            }
        }
        OutputFormat::Json => print_json(
            cli,
            &json!({ "id": icon.id, "url": link.url, "path": display }),
        )?,
    }
    Ok(())
}

fn print_link(link: &AssetLink, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => println!("{}", text_formatter(cli).format_link(link)),
        OutputFormat::Json => print_json(cli, link)?,
    }
    Ok(())
}

/// File name for a download: the upstream name when given, else
/// `<slug>[-<size>].<format>`.
fn default_filename(link: &AssetLink, icon: &IconSummary, selection: Selection) -> String {
    if let Some(name) = link.filename.as_deref().filter(|n| !n.trim().is_empty()) {
        return sanitize_filename(name);
    }
    let stem = if icon.slug.is_empty() {
        icon.id.to_string()
    } else {
        icon.slug.clone()
    };
    let name = match selection.size {
        Some(size) => format!("{stem}-{size}.{}", selection.format),
        None => format!("{stem}.{}", selection.format),
    };
    sanitize_filename(&name)
}
