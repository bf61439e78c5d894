mod parser;
mod record;
mod wiki;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

const DEFAULT_TITLE: &str = "Wrocławskie krasnale";
const DEFAULT_OUTPUT: &str = "wroclawskie_krasnale.json";

#[derive(Parser)]
#[command(
    name = "krasnale_scraper",
    about = "Extract the Wrocław dwarf catalog from Wikipedia into JSON"
)]
struct Cli {
    /// Wikipedia page title (Polish wiki)
    #[arg(short, long, default_value = DEFAULT_TITLE)]
    title: String,
    /// Output JSON file path
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
    /// Classify rows by cell coloring and collapse thumbnail URLs
    #[arg(short, long)]
    status: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let client = wiki::WikiClient::new(wiki::DEFAULT_LANG)?;
    info!("Fetching page '{}'", cli.title);
    let html = client.fetch_page_html(&cli.title).await?;

    let opts = parser::Options {
        classify_status: cli.status,
        canonical_images: cli.status,
        base_origin: wiki::origin(wiki::DEFAULT_LANG),
    };
    let records = parser::extract_records(&html, &opts);
    info!("Extracted {} records", records.len());

    let json = serde_json::to_string_pretty(&records)?;
    fs::write(&cli.output, json)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    println!("Saved {} records to {}", records.len(), cli.output.display());
    Ok(())
}
