use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use woordfees_scrape::config::ScrapeConfig;
use woordfees_scrape::scraping::{self, base::HttpSource};
use woordfees_scrape::output;

#[derive(Parser)]
#[command(name = "woordfees-scrape")]
#[command(about = "Woordfees festival programme and venue scraper")]
#[command(version)]
struct Cli {
    /// JSON config file; omitted fields fall back to defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Festival edition year used when normalizing detail-page dates
    #[arg(long)]
    year: Option<i32>,
    /// Directory the JSON/CSV outputs are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the full programme and the venue archive
    Run {
        /// Stop after this many event detail pages
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Scrape only the venue archive
    Venues,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ScrapeConfig::load(path)?,
        None => ScrapeConfig::default(),
    };
    if let Some(year) = cli.year {
        config.festival_year = year;
    }

    match cli.command {
        Commands::Run { limit } => {
            let scrape = scraping::run(&config, limit)?;
            output::write_outputs(&cli.out_dir, &scrape.events, &scrape.venues)?;
            info!(
                events = scrape.events.len(),
                venues = scrape.venues.len(),
                out_dir = %cli.out_dir.display(),
                "outputs written"
            );
        }
        Commands::Venues => {
            let source = HttpSource::new(&config);
            let venues = scraping::venues::scrape_venues(&source, &config)?;
            output::write_venues(&cli.out_dir, &venues)?;
            info!(venues = venues.len(), out_dir = %cli.out_dir.display(), "venue outputs written");
        }
    }

    Ok(())
}
