//! mrktr: marketplace price lookup
//!
//! This is the main entry point for the command-line tool.

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser};
use mrktr::{
    config::{self, DotEnv, Settings},
    metrics::Metrics,
    network::HttpClient,
    providers::ProviderLoader,
    query::QueryIndex,
    search::{PriceSearch, SearchGeneration},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const ENVIRONMENT_HELP: &str = "\
Environment variables:
  BRAVE_API_KEY          Brave Search API key
  TAVILY_API_KEY         Tavily API key
  FIRECRAWL_API_KEY      Firecrawl API key
  MRKTR_SETTINGS_PATH    Path to mrktr.yml
  MRKTR_TIMEOUT          Request timeout in seconds
  MRKTR_CATALOG_PATH     Path to a JSON product catalog
  RUST_LOG               Log filter (default: info)";

#[derive(Parser)]
#[command(name = "mrktr")]
#[command(about = "Marketplace price lookup")]
#[command(version)]
#[command(arg_required_else_help = true)]
#[command(after_help = ENVIRONMENT_HELP)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print product suggestions instead of searching
    #[arg(short, long)]
    suggest: bool,

    /// Product to look up, or a prefix with --suggest
    #[arg(value_name = "QUERY")]
    query: Vec<String>,
}

impl Cli {
    /// Query words joined with spaces; `None` when blank
    fn query_text(&self) -> Option<String> {
        let text = self.query.join(" ");
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Some(query) = cli.query_text() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // Load configuration
    let dotenv = DotEnv::load(".env")?;
    if !dotenv.ignored_keys().is_empty() {
        warn!("Ignored unknown .env keys: {}", dotenv.ignored_keys().join(", "));
    }
    let settings = config::load(cli.config.as_deref(), &dotenv)?;

    let index = load_index(&settings)?;
    info!("Loaded {} catalog products", index.len());

    if cli.suggest {
        for suggestion in index.suggest(&query) {
            println!("{}", suggestion);
        }
        return Ok(());
    }

    let expanded = index.expand(&query);
    if expanded != query.trim() {
        info!("Expanded '{}' to '{}'", query.trim(), expanded);
    }

    // Initialize HTTP client and providers
    let client = HttpClient::with_settings(&settings.search)?;
    let metrics = Arc::new(Metrics::new());
    let search = PriceSearch::new(ProviderLoader::load(&settings, &client))
        .with_metrics(Arc::clone(&metrics));

    let generation = Arc::new(SearchGeneration::new());
    let ticket = generation.begin();
    {
        let generation = Arc::clone(&generation);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, canceling search");
                generation.cancel();
            }
        });
    }

    let response = search
        .search_prices_context(&ticket.context, &expanded)
        .await;
    log_provider_stats(&metrics);

    let Some(response) = generation.accept(ticket.sequence, response) else {
        return Ok(());
    };

    if let Some(error) = response.error {
        bail!(error);
    }
    if !response.warning.is_empty() {
        warn!("{}", response.warning);
    }

    if response.results.is_empty() {
        println!("No listings found for '{}'", expanded);
        return Ok(());
    }

    for listing in &response.results {
        println!(
            "{:<8} ${:>10.2}  {:<4}  {:<6}  {}\n{:>8}  {}",
            listing.platform().as_str(),
            listing.price(),
            listing.condition().as_str(),
            listing.status().as_str(),
            listing.title(),
            "",
            listing.url()
        );
    }

    Ok(())
}

/// Build the query index from the configured catalog, or the embedded one
fn load_index(settings: &Settings) -> Result<QueryIndex> {
    match &settings.catalog.path {
        Some(path) => {
            info!("Loading catalog from: {}", path.display());
            QueryIndex::from_path(path)
        }
        None => Ok(QueryIndex::embedded()),
    }
}

fn log_provider_stats(metrics: &Metrics) {
    let mut stats: Vec<_> = metrics.get_provider_stats().into_iter().collect();
    stats.sort_by(|a, b| a.0.cmp(&b.0));

    for (provider, stats) in stats {
        debug!(
            "{}: {} calls, {} successes, {} empty, {} errors, avg {:?} ms, reliability {:.2}",
            provider,
            stats.calls,
            stats.successes,
            stats.empty_results,
            stats.errors,
            stats.avg_response_time,
            stats.reliability
        );
    }
}
