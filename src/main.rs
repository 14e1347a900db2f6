//! panscrape is a CLI tool that crawls daily panchang pages from a
//! religious-calendar website and composes the results into festival
//! calendar JSON.
//!
//! The tool has three main commands:
//! 1. `crawl` - Fetches one page per calendar date and saves raw HTML to a local database
//! 2. `parse` - Re-extracts visible text from HTML in the database
//! 3. `compose` - Builds the aggregated festival/observance JSON from stored pages

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::LevelFilter;

use panscrape::{
    ParseTarget,
    aggregate::FetchPolicy,
    compose::compose,
    crawl::crawl_days,
    fetch::{PageClient, SiteConfig, TimeFormat},
    parse::parse_db_pages,
};

/// A CLI tool to crawl daily panchang pages into festival calendar JSON
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The command to execute (crawl, parse or compose)
    #[command(subcommand)]
    command: Command,

    #[arg(long, short, action = clap::ArgAction::Count, help = "Output v(v...)erbosity: error (0), warn (1), info (2), debug (3), trace (4)", global = true, default_value_t = 2)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Crawl one panchang page per calendar date and save raw HTML to a local database
    Crawl {
        /// First year of the inclusive range
        start_year: i32,
        /// Last year of the inclusive range
        end_year: i32,
        /// Path to database file to store pages data
        db: String,
        /// Delay between requests in milliseconds (rate limiting)
        #[arg(long, short, default_value_t = 1000)]
        delay: u64,
        /// Geoname identifier of the location (site default location when omitted)
        #[arg(long, short)]
        geoname_id: Option<String>,
        /// Clock format to request: "12hour", "24hour" or "24plushour"
        #[arg(long, default_value = "24hour")]
        time_format: TimeFormat,
        /// Fetch failure policy: "abort" (default) or "skip"
        #[arg(long, default_value = "abort")]
        on_error: FetchPolicy,
    },
    /// Re-extract visible text from HTML in the database
    Parse {
        /// Path to database file to read pages from
        db: String,
        /// Target to parse: "all" (default) or a specific ISO date
        #[arg(long, short = 't', default_value = "all")]
        target: ParseTarget,
    },
    /// Build the aggregated festival/observance JSON from stored pages
    Compose {
        /// Path to database file to read pages from
        db: String,
        /// Path to output file to compose results to
        output_file: String,
        /// Geoname identifier echoed into the source metadata
        #[arg(long, short)]
        geoname_id: Option<String>,
        /// Clock format echoed into the source metadata
        #[arg(long, default_value = "24hour")]
        time_format: TimeFormat,
        /// Policy for dates missing from the database: "abort" or "skip"
        #[arg(long, default_value = "abort")]
        on_error: FetchPolicy,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    match cli.command {
        Command::Crawl {
            start_year,
            end_year,
            db,
            delay,
            geoname_id,
            time_format,
            on_error,
        } => {
            handle_crawl_command(start_year, end_year, db, delay, geoname_id, time_format, on_error)
                .await
        }
        Command::Parse { db, target } => handle_parse_command(db, target).await,
        Command::Compose {
            db,
            output_file,
            geoname_id,
            time_format,
            on_error,
        } => {
            let config = SiteConfig::new(geoname_id, time_format)?;
            compose(&db, &output_file, &config, on_error).await
        }
    }
}

async fn handle_crawl_command(
    start_year: i32,
    end_year: i32,
    db: String,
    delay: u64,
    geoname_id: Option<String>,
    time_format: TimeFormat,
    on_error: FetchPolicy,
) -> Result<()> {
    if start_year > end_year {
        anyhow::bail!("Start year {start_year} is after end year {end_year}");
    }

    let start = NaiveDate::from_ymd_opt(start_year, 1, 1)
        .with_context(|| format!("Invalid start year: {start_year}"))?;
    let end = NaiveDate::from_ymd_opt(end_year, 12, 31)
        .with_context(|| format!("Invalid end year: {end_year}"))?;

    let client = PageClient::new(SiteConfig::new(geoname_id, time_format)?)?;
    crawl_days(&db, &client, start, end, delay, on_error).await
}

async fn handle_parse_command(db: String, target: ParseTarget) -> Result<()> {
    if let ParseTarget::Day { date } = &target {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("Invalid target date: {}", e))?;
    }
    parse_db_pages(&db, target).await
}
