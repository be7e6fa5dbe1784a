// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Picto CLI - search, download and generate icons from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Search the catalogue
//! picto search camera
//!
//! # Download a PNG at 64px
//! picto download 12345 --as png --size 64
//!
//! # Generate an icon and wait for it
//! picto generate "sun icon" --style flat
//!
//! # JSON output
//! picto search camera --format json --pretty
//!
//! # Store the API key in the system keychain
//! picto config set-key fpk-xxxxx
//! ```

mod commands;
mod context;
mod output;
mod sink;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use picto_client::ApiError;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, download, generate, library, search, show};

// ============================================================================
// CLI Definition
// ============================================================================

/// Picto CLI - Freepik icon search, download and AI generation.
#[derive(Parser)]
#[command(name = "picto")]
#[command(about = "Freepik icon search, download and AI generation")]
#[command(long_about = r#"
Picto searches the Freepik icon catalogue, downloads icons in any
supported format, and generates new icons from a text prompt.

An API key is required. Pass --api-key, set FREEPIK_API_KEY, or store
one with `picto config set-key`.

Examples:
  picto search camera                 # Search the catalogue
  picto show 12345                    # Icon details
  picto download 12345 --size 64      # Download a PNG
  picto generate "sun icon"           # Generate and wait
  picto favorites list                # Saved icons
"#)]
#[command(version)]
#[command(author = "Picto Contributors")]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Freepik API key. Falls back to the system keychain.
    #[arg(long, env = "FREEPIK_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// API base URL. Overrides the relay preference.
    #[arg(long, env = "PICTO_BASE_URL", global = true)]
    pub base_url: Option<String>,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search the icon catalogue.
    #[command(visible_alias = "s")]
    Search(search::SearchArgs),

    /// Show details for one icon.
    Show(show::ShowArgs),

    /// Download a stock icon.
    #[command(visible_alias = "d")]
    Download(download::DownloadArgs),

    /// Generate an icon from a text prompt.
    #[command(visible_alias = "g")]
    Generate(generate::GenerateArgs),

    /// Check a generation task once.
    Status(generate::StatusArgs),

    /// Download a generated icon in a given format.
    Render(generate::RenderArgs),

    /// Manage favorite icons.
    Favorites(library::FavoritesArgs),

    /// Show or clear recently used icons.
    History(library::HistoryArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// The API key was rejected or is missing.
    InvalidCredential = 2,
    /// The daily quota is exhausted.
    RateLimited = 3,
    /// Generation did not finish in time.
    Timeout = 4,
    /// Interrupted by the user.
    Cancelled = 130,
}

impl ExitCode {
    fn for_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<ApiError>() {
            Some(ApiError::InvalidCredential) => Self::InvalidCredential,
            Some(ApiError::RateLimited { .. }) => Self::RateLimited,
            Some(ApiError::GenerationTimeout { .. }) => Self::Timeout,
            Some(ApiError::Cancelled) => Self::Cancelled,
            _ => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("picto=debug,info")
    } else {
        EnvFilter::new("picto=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Search(args) => search::run(args, &cli).await,
        Commands::Show(args) => show::run(args, &cli).await,
        Commands::Download(args) => download::run(args, &cli).await,
        Commands::Generate(args) => generate::run(args, &cli).await,
        Commands::Status(args) => generate::run_status(args, &cli).await,
        Commands::Render(args) => generate::run_render(args, &cli).await,
        Commands::Favorites(args) => library::run_favorites(args, &cli).await,
        Commands::History(args) => library::run_history(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_by_error_kind() {
        let code = |e: ApiError| ExitCode::for_error(&anyhow::Error::from(e)) as i32;

        assert_eq!(code(ApiError::InvalidCredential), 2);
        assert_eq!(
            code(ApiError::RateLimited {
                guidance: picto_client::DAILY_QUOTA_GUIDANCE.to_string(),
                retry_after: Some(60),
            }),
            3
        );
        assert_eq!(code(ApiError::GenerationTimeout { attempts: 30 }), 4);
        assert_eq!(code(ApiError::Cancelled), 130);
        assert_eq!(code(ApiError::NotFound), 1);
        assert_eq!(ExitCode::for_error(&anyhow::anyhow!("other")) as i32, 1);
    }

    #[test]
    fn test_test_key_parses() {
        let cli = Cli::try_parse_from(["picto", "config", "test-key", "fpk-123"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(config::ConfigArgs {
                action: config::ConfigAction::TestKey { key: Some(ref k) }
            }) if k == "fpk-123"
        ));
    }
}
