//! The crawl module fetches one panchang page per calendar date and
//! stores the raw markup in a local database.

use std::time::Duration;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use rate_guard::{RateLimit, StdTokenBucket, TokenBucketBuilder};

use crate::aggregate::FetchPolicy;
use crate::fetch::PageClient;
use crate::storage::{DayPage, Storage};

/// Crawls every calendar date from `start` to `end` inclusive, in
/// ascending order, and upserts each fetched page into the database.
///
/// A politeness delay of `delay_ms` milliseconds is enforced between
/// requests through a token bucket; `0` disables the delay. Dates are
/// keyed by ISO date, so re-running a crawl overwrites stored pages.
///
/// # Arguments
///
/// * `db_path` - Path to the database where pages will be stored
/// * `client` - The configured page client to fetch with
/// * `start` - First date of the inclusive range
/// * `end` - Last date of the inclusive range
/// * `delay_ms` - Delay between requests in milliseconds (rate limiting)
/// * `policy` - Whether a failed fetch aborts the crawl or is skipped
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if any operation fails
///
/// # Errors
///
/// Returns an error if:
/// * Database operations fail
/// * A fetch fails and `policy` is `FetchPolicy::Abort`
pub async fn crawl_days(
    db_path: &str,
    client: &PageClient,
    start: NaiveDate,
    end: NaiveDate,
    delay_ms: u64,
    policy: FetchPolicy,
) -> Result<()> {
    let storage = Storage::new(db_path)?;

    let rate_limiter: Option<StdTokenBucket> = (delay_ms > 0)
        .then(|| {
            TokenBucketBuilder::builder()
                .capacity(1_u64)
                .refill_amount(1_u64)
                .refill_every(Duration::from_millis(delay_ms))
                .with_time(rate_guard::StdTimeSource::new())
                .with_precision::<rate_guard::Nanos>()
                .build()
                .ok()
        })
        .flatten();

    info!("Starting crawl from {start} to {end}");

    let mut stored = 0_u32;
    let mut day = start;
    while day <= end {
        if let Some(limiter) = rate_limiter.as_ref() {
            loop {
                match limiter.try_acquire(1) {
                    Ok(()) => break,
                    Err(_) => {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                }
            }
        }

        match client.fetch_day(day).await {
            Ok(html) => {
                let page = DayPage {
                    date: day,
                    url: client.day_url(day),
                    fetched_at: Utc::now(),
                    html,
                    text: None,
                };
                storage.upsert_page(&page)?;
                stored += 1;
                info!("Fetched {day}");
            }
            Err(error) => match policy {
                FetchPolicy::Abort => {
                    return Err(error.context(format!("Fetch failed for {day}, aborting crawl")));
                }
                FetchPolicy::Skip => warn!("Skipping {day}: {error:#}"),
            },
        }

        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    info!("Stored {stored} day pages into {db_path}");
    Ok(())
}
