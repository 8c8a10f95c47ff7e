use clap::{Parser, Subcommand};

use playcrawl_scraper::{Crawler, CrawlerConfig};

#[derive(Debug, Parser)]
#[command(name = "playcrawl-cli")]
#[command(about = "Crawl Google Play app-details pages into JSON snapshots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl one or more packages and print one JSON snapshot per line.
    Crawl {
        /// Package identifiers, e.g. `com.example.app`.
        #[arg(required = true)]
        packages: Vec<String>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,

        /// Override the request timeout from the environment config.
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Crawl {
            packages,
            pretty,
            timeout_secs,
        } => crawl(packages, pretty, timeout_secs).await,
    }
}

async fn crawl(packages: Vec<String>, pretty: bool, timeout_secs: Option<u64>) -> anyhow::Result<()> {
    let app_config = playcrawl_core::load_app_config()?;
    let mut config = CrawlerConfig::from_app_config(&app_config);
    if let Some(timeout) = timeout_secs {
        config.request_timeout_secs = timeout;
    }
    let crawler = Crawler::new(config)?;

    for package in packages {
        let snapshot = crawler.crawl(&package).await;
        if snapshot.likely_blocked() {
            tracing::warn!(package, "snapshot looks blocked; treat the result as unusable");
        }
        let json = if pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        println!("{json}");
    }
    Ok(())
}
