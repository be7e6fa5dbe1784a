//! Generate, status and render commands - AI icon generation.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use picto_client::{
    AssetFetcher, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL, IconClient, PollPolicy,
};
use picto_core::{
    AiFormat, AiStyle, AssetSink, GeneratedIcon, GenerationRequest, GenerationTask,
    PreviewRequest,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::print_json;
use crate::context::{build_client, settings, text_formatter};
use crate::sink::{FileSink, output_path, sanitize_filename};
use crate::{Cli, OutputFormat};

/// Arguments for the generate command.
#[derive(Args)]
pub struct GenerateArgs {
    /// What the icon should show.
    pub prompt: String,

    /// Style (solid, outline, color, flat, sticker).
    /// Defaults to the saved preference.
    #[arg(long)]
    pub style: Option<AiStyle>,

    /// Output format (png or svg).
    #[arg(long = "as", value_name = "FORMAT")]
    pub file_format: Option<AiFormat>,

    /// Diffusion steps.
    #[arg(long)]
    pub steps: Option<u32>,

    /// Guidance scale.
    #[arg(long)]
    pub guidance: Option<f64>,

    /// Request a cheaper preview instead of a full generation.
    #[arg(long, conflicts_with_all = ["steps", "guidance"])]
    pub preview: bool,

    /// Print the task and exit without waiting.
    #[arg(long)]
    pub no_wait: bool,

    /// Delay between status checks in milliseconds.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    pub interval_ms: u64,

    /// Status checks before giving up.
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Save the result to this file or directory.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    fn policy(&self) -> PollPolicy {
        PollPolicy::new(Duration::from_millis(self.interval_ms), self.max_attempts)
    }

    fn request(&self, default_style: AiStyle) -> GenerationRequest {
        let mut request =
            GenerationRequest::new(self.prompt.as_str()).style(self.style.unwrap_or(default_style));
        if let Some(format) = self.file_format {
            request = request.format(format);
        }
        if let Some(steps) = self.steps {
            request = request.num_inference_steps(steps);
        }
        if let Some(guidance) = self.guidance {
            request = request.guidance_scale(guidance);
        }
        request
    }
}

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Task id returned by `generate`.
    pub task_id: String,
}

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Task id of a completed generation.
    pub task_id: String,

    /// Output format (png or svg).
    #[arg(long = "as", value_name = "FORMAT", default_value = "png")]
    pub file_format: AiFormat,

    /// Save to this file or directory instead of printing the link.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

// ============================================================================
// generate
// ============================================================================

/// Runs the generate command.
pub async fn run(args: &GenerateArgs, cli: &Cli) -> Result<()> {
    let settings = settings().await;
    let client = build_client(cli, &settings).await?;
    let request = args.request(settings.default_ai_style().await);

    let task = if args.preview {
        client.generate_preview(&PreviewRequest::from(&request)).await?
    } else {
        client.generate_icon(&request).await?
    };

    if args.no_wait {
        return print_task(&task, cli);
    }

    if !cli.quiet && cli.format == OutputFormat::Text {
        eprintln!("Waiting for task {}...", task.task_id);
    }
    let icon = wait_for(&client, &task.task_id, &args.policy()).await?;
    info!(task_id = %icon.task_id, "Generation finished");

    match &args.output {
        Some(output) => {
            let extension = args.file_format.unwrap_or_default();
            let filename = format!("{}.{extension}", icon.task_id);
            let path = output_path(Some(output), &sanitize_filename(&filename));
            save(&icon.url, path, cli).await?;
        }
        None => match cli.format {
            OutputFormat::Text => println!("{}", text_formatter(cli).format_generated(&icon)),
            OutputFormat::Json => print_json(cli, &icon)?,
        },
    }

    Ok(())
}

/// Polls a task, cancelling on Ctrl-C.
async fn wait_for(
    client: &IconClient,
    task_id: &str,
    policy: &PollPolicy,
) -> Result<GeneratedIcon> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted, cancelling poll");
            on_interrupt.cancel();
        }
    });

    let result = client.poll_generation(task_id, policy, &cancel).await;
    interrupt.abort();
    Ok(result?)
}

// ============================================================================
// status
// ============================================================================

/// Runs the status command.
pub async fn run_status(args: &StatusArgs, cli: &Cli) -> Result<()> {
    let settings = settings().await;
    let client = build_client(cli, &settings).await?;

    let task = client.generation_status(&args.task_id).await?;
    print_task(&task, cli)
}

fn print_task(task: &GenerationTask, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => println!("{}", text_formatter(cli).format_task(task)),
        OutputFormat::Json => print_json(cli, task)?,
    }
    Ok(())
}

// ============================================================================
// render
// ============================================================================

/// Runs the render command.
pub async fn run_render(args: &RenderArgs, cli: &Cli) -> Result<()> {
    let settings = settings().await;
    let client = build_client(cli, &settings).await?;

    let link = client
        .download_generated_icon(&args.task_id, args.file_format)
        .await?;

    match &args.output {
        Some(output) => {
            let filename = format!("{}.{}", args.task_id, args.file_format);
            let path = output_path(Some(output), &sanitize_filename(&filename));
            save(&link.url, path, cli).await?;
        }
        None => match cli.format {
            OutputFormat::Text => println!("{}", text_formatter(cli).format_link(&link)),
            OutputFormat::Json => print_json(cli, &link)?,
        },
    }

    Ok(())
}

async fn save(url: &str, path: PathBuf, cli: &Cli) -> Result<()> {
    let sink = FileSink::new(AssetFetcher::new()?, path);
    sink.insert_asset(url).await?;

    let display = sink.path().display().to_string();
    match cli.format {
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", text_formatter(cli).format_saved(&display));
            }
        }
        OutputFormat::Json => print_json(cli, &json!({ "url": url, "path": display }))?,
    }
    Ok(())
}
