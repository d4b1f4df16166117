use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use client_core::{CatalogClient, HttpCatalogApi};
use shared::domain::MovieId;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, prepare_api_base};

/// Search the movie catalog and inspect a title.
#[derive(Parser, Debug)]
struct Args {
    /// Catalog backend address; overrides cinescout.toml and the environment.
    #[arg(long)]
    api_base: Option<String>,
    /// Search text; defaults to the configured default query.
    #[arg(long)]
    query: Option<String>,
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
    /// Open the detail panel for this movie id after searching.
    #[arg(long)]
    detail: Option<i64>,
    /// Print the view state as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_base) = args.api_base {
        settings.api_base = api_base;
    }
    let api_base = prepare_api_base(&settings.api_base)?;
    let api = HttpCatalogApi::new(&api_base)?;
    info!(%api_base, "catalog client ready");

    let client = CatalogClient::new(Arc::new(api), settings.default_query.clone());
    if let Some(query) = args.query {
        client.set_query(query).await;
    }
    if client.submit(args.page).await.is_none() {
        warn!("query is blank; nothing was searched");
    }
    if let Some(id) = args.detail {
        client.open_detail(MovieId(id)).await;
    }

    let view = client.view().await;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render::render_view(&view, &settings.image_base));
    }

    Ok(())
}
