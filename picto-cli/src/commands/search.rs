//! Search command - query the icon catalogue.

use std::collections::HashSet;

use anyhow::{Result, bail};
use clap::Args;
use picto_core::{SearchQuery, SortOrder};
use tracing::info;

use crate::context::{build_client, library, settings, text_formatter};
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Search term.
    pub term: String,

    /// Page number, starting at 1.
    #[arg(long, short)]
    pub page: Option<u32>,

    /// Results per page (1-100).
    #[arg(long)]
    pub per_page: Option<u32>,

    /// Sort order: relevance or recent.
    #[arg(long)]
    pub order: Option<SortOrder>,

    /// Restrict to one icon family.
    #[arg(long)]
    pub family_id: Option<String>,

    /// Thumbnail size in pixels.
    #[arg(long)]
    pub thumbnail_size: Option<u32>,

    /// Exact slug match.
    #[arg(long)]
    pub slug: Option<String>,

    /// Extra filter, sent as filters[KEY]=VALUE. Repeatable.
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,
}

impl SearchArgs {
    /// Builds the query from the arguments.
    pub fn query(&self) -> SearchQuery {
        let mut query = SearchQuery::new(self.term.as_str());
        if let Some(page) = self.page {
            query = query.page(page);
        }
        if let Some(per_page) = self.per_page {
            query = query.per_page(per_page);
        }
        if let Some(order) = self.order {
            query = query.order(order);
        }
        if let Some(family_id) = &self.family_id {
            query = query.family_id(family_id.as_str());
        }
        if let Some(size) = self.thumbnail_size {
            query = query.thumbnail_size(size);
        }
        if let Some(slug) = &self.slug {
            query = query.slug(slug.as_str());
        }
        for (key, value) in &self.filters {
            query = query.filter(key.as_str(), value.as_str());
        }
        query
    }
}

fn parse_filter(raw: &str) -> Result<(String, String)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("expected KEY=VALUE, got '{raw}'");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("filter key is empty in '{raw}'");
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Runs the search command.
pub async fn run(args: &SearchArgs, cli: &Cli) -> Result<()> {
    let query = args.query();
    query.validate()?;

    let settings = settings().await;
    let client = build_client(cli, &settings).await?;

    info!(term = %query.term, page = ?query.page, "Searching icons");
    let result = client.search_icons(&query).await?;

    let favorites: HashSet<u64> = library()
        .favorites()
        .await
        .iter()
        .map(|f| f.icon.id)
        .collect();

    match cli.format {
        OutputFormat::Text => {
            println!("{}", text_formatter(cli).format_search(&result, &favorites));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_search(&query.term, &result, &favorites)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("color=gradient").unwrap(),
            ("color".to_string(), "gradient".to_string())
        );
        assert_eq!(
            parse_filter("shape = outline").unwrap(),
            ("shape".to_string(), "outline".to_string())
        );
        assert!(parse_filter("color").is_err());
        assert!(parse_filter("=x").is_err());
    }

    #[test]
    fn test_query_from_args() {
        let args = SearchArgs {
            term: "camera".to_string(),
            page: Some(2),
            per_page: None,
            order: Some(SortOrder::Recent),
            family_id: None,
            thumbnail_size: None,
            slug: None,
            filters: vec![("color".to_string(), "gradient".to_string())],
        };
        let pairs = args.query().query_pairs();
        assert!(pairs.contains(&("term".to_string(), "camera".to_string())));
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert!(pairs.contains(&("order".to_string(), "recent".to_string())));
        assert!(pairs.contains(&("filters[color]".to_string(), "gradient".to_string())));
    }
}
