//! The compose module builds the aggregated festival/observance JSON from
//! day pages stored in the database.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use std::fs::OpenOptions;

use crate::aggregate::{FetchPolicy, SourceInfo, SourceParams, crawl_range};
use crate::constants::SITE_NAME;
use crate::extract::Patterns;
use crate::fetch::SiteConfig;
use crate::record::iso_date;
use crate::storage::Storage;

/// Composes the output file by walking the stored date range, parsing one
/// day record per date, folding the records into the monthly indices and
/// writing the aggregate as pretty-printed JSON.
///
/// Pages parsed beforehand are read from their stored text; pages that
/// were only crawled fall back to their raw HTML.
///
/// # Arguments
///
/// * `db_path` - Path to the database containing crawled day pages
/// * `output_path` - Path to the output file where the JSON will be written
/// * `config` - Upstream request configuration echoed into the source metadata
/// * `policy` - Whether a date missing from the database aborts the walk
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if any operation fails
///
/// # Errors
///
/// Returns an error if:
/// * The database holds no crawled pages
/// * Database operations fail
/// * A date in the stored range is missing and `policy` is `FetchPolicy::Abort`
/// * File operations fail
pub async fn compose(
    db_path: &str,
    output_path: &str,
    config: &SiteConfig,
    policy: FetchPolicy,
) -> Result<()> {
    let storage = Storage::new(db_path)?;

    info!("Composing day records from database {db_path} to {output_path}...");

    let (first, last) = storage
        .date_bounds()?
        .context("No crawled pages in the database")?;
    let start = NaiveDate::parse_from_str(&first, "%Y-%m-%d")
        .context("Unable to parse earliest stored date")?;
    let end = NaiveDate::parse_from_str(&last, "%Y-%m-%d")
        .context("Unable to parse latest stored date")?;

    let patterns = Patterns::default();
    let storage_ref = &storage;
    let aggregate = crawl_range(start, end, policy, &patterns, |day| async move {
        let page = storage_ref
            .get_page(&iso_date(day))?
            .with_context(|| format!("No crawled page for {day}"))?;
        Ok(page.text.filter(|text| !text.is_empty()).unwrap_or(page.html))
    })
    .await?;

    let record_count = aggregate.daily.len();
    let result = aggregate.into_result(SourceInfo {
        site: SITE_NAME.to_string(),
        base_url: config.base_url.to_string(),
        params: SourceParams {
            geoname_id: config.geoname_id.clone(),
            time_format: config.time_format.as_str().to_string(),
        },
    });

    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(output_path)?;
    serde_json::to_writer_pretty(file, &result)?;

    info!("Composed {record_count} day records to {output_path}");
    Ok(())
}
