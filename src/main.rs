//! Tabelog-Harvest main entry point
//!
//! This is the command-line interface for the restaurant-listing harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tabelog_harvest::area::{AreaCatalog, AreaSelection};
use tabelog_harvest::config::{load_or_default, Config};
use tabelog_harvest::crawler::{start_crawl, CrawlParams, RunOutcome, TracingEvents};
use tracing_subscriber::EnvFilter;

/// Tabelog-Harvest: a polite restaurant-listing harvester
///
/// Walks the paginated search results for an area, visits every listed
/// restaurant, optionally keeps only those opened in a given year/month, and
/// writes the result to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "tabelog-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A polite restaurant-listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// TOML catalog of middle and small areas
    #[arg(long, value_name = "CATALOG")]
    catalog: Option<PathBuf>,

    /// Prefecture display name, e.g. 東京都 (omit for nationwide)
    #[arg(long)]
    prefecture: Option<String>,

    /// Middle area display name
    #[arg(long, requires = "prefecture")]
    middle: Option<String>,

    /// Small area display name
    #[arg(long, requires = "middle")]
    small: Option<String>,

    /// First listing page to crawl
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    start_page: u32,

    /// Use the large page cap instead of the default one
    #[arg(long)]
    uncapped: bool,

    /// Crawl the new-openings listing
    #[arg(long)]
    new_openings: bool,

    /// Keep only restaurants opened in this year
    #[arg(long)]
    year: Option<u32>,

    /// Narrow the year filter to this month
    #[arg(long, requires = "year", value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Directory to write the CSV file to (overrides the config)
    #[arg(long, value_name = "DIR")]
    save_path: Option<PathBuf>,

    /// Show the area choices for the current selection and exit
    #[arg(long)]
    list_areas: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from: {}", path.display());
    }

    let catalog = match &cli.catalog {
        Some(path) => AreaCatalog::load(path)
            .with_context(|| format!("Failed to load area catalog {}", path.display()))?,
        None => AreaCatalog::builtin(),
    };

    let area = AreaSelection::from_names(
        cli.prefecture.as_deref(),
        cli.middle.as_deref(),
        cli.small.as_deref(),
    )?;

    if cli.list_areas {
        handle_list_areas(&catalog, &area);
        return Ok(());
    }

    let params = CrawlParams {
        save_path: cli
            .save_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.output.save_path)),
        area,
        start_page: cli.start_page,
        page_cap_enabled: !cli.uncapped,
        new_openings_only: cli.new_openings,
        filter_year: cli.year,
        filter_month: cli.month,
    };

    handle_crawl(&config, &catalog, params).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tabelog_harvest=info,warn"),
            1 => EnvFilter::new("tabelog_harvest=debug,info"),
            2 => EnvFilter::new("tabelog_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --list-areas: prints the choices at each level of the cascade
fn handle_list_areas(catalog: &AreaCatalog, selection: &AreaSelection) {
    let options = catalog.available_options(selection);

    println!("Prefectures ({}):", options.prefectures.len());
    for name in &options.prefectures {
        println!("  - {}", name);
    }

    if !options.middle.is_empty() {
        println!("\nMiddle areas ({}):", options.middle.len());
        for name in &options.middle {
            println!("  - {}", name);
        }
    }

    if !options.small.is_empty() {
        println!("\nSmall areas ({}):", options.small.len());
        for name in &options.small {
            println!("  - {}", name);
        }
    }
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    catalog: &AreaCatalog,
    params: CrawlParams,
) -> anyhow::Result<()> {
    tracing::info!(
        "Area: {}, start page: {}, capped: {}, new openings: {}",
        params.area.name_parts().join(" / "),
        params.start_page,
        params.page_cap_enabled,
        params.new_openings_only
    );

    let handle = start_crawl(config, catalog, params, Arc::new(TracingEvents))?;

    // Ctrl-C requests a cooperative stop
    let cancel = handle.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current fetch");
            cancel.cancel();
        }
    });

    let report = handle.wait().await?;
    tracing::info!(
        "Crawl ended ({}): {} pages, {} records",
        report.phase,
        report.pages_scraped,
        report.records_collected
    );

    match report.outcome {
        RunOutcome::Saved(path) => {
            println!("✓ Saved to: {}", path.display());
            Ok(())
        }
        RunOutcome::NoData => {
            println!("No data collected");
            Ok(())
        }
        RunOutcome::Stopped => {
            println!("Crawl stopped, nothing saved");
            Ok(())
        }
        RunOutcome::SaveFailed(message) => {
            anyhow::bail!("Failed to save results: {}", message)
        }
    }
}
