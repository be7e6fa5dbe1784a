//! CLI command implementations.

pub mod config;
pub mod download;
pub mod generate;
pub mod library;
pub mod search;
pub mod show;

use anyhow::Result;
use serde::Serialize;

use crate::Cli;
use crate::output::JsonFormatter;

/// Prints a value as JSON honoring `--pretty`.
pub(crate) fn print_json<T: Serialize>(cli: &Cli, data: &T) -> Result<()> {
    println!("{}", JsonFormatter::new(cli.pretty).format(data)?);
    Ok(())
}
