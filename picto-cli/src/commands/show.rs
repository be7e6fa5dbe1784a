//! Show command - details for one icon.

use anyhow::Result;
use clap::Args;
use serde_json::json;

use super::print_json;
use crate::context::{build_client, library, settings, text_formatter};
use crate::{Cli, OutputFormat};

/// Arguments for the show command.
#[derive(Args)]
pub struct ShowArgs {
    /// Icon id.
    pub id: u64,
}

/// Runs the show command.
pub async fn run(args: &ShowArgs, cli: &Cli) -> Result<()> {
    let settings = settings().await;
    let client = build_client(cli, &settings).await?;

    let detail = client.get_icon_by_id(args.id).await?;
    let favorite = library().is_favorite(detail.icon.id).await;

    match cli.format {
        OutputFormat::Text => {
            println!("{}", text_formatter(cli).format_icon_detail(&detail, favorite));
        }
        OutputFormat::Json => {
            print_json(cli, &json!({ "icon": detail, "favorite": favorite }))?;
        }
    }

    Ok(())
}
