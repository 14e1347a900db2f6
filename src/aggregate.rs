//! The aggregate module walks an inclusive date range, obtains each day's
//! page text from a caller-supplied fetch capability, and folds the parsed
//! records into the monthly festival/observance indices and the daily map.

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use log::warn;
use serde::Serialize;

use crate::extract::{Patterns, is_observance};
use crate::record::{DayRecord, parse_day};

/// Year -> month name -> festival name -> first-seen date label.
pub type MonthlyIndex = BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>;

/// What to do when the fetch collaborator fails for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Propagate the error and abort the whole walk (reference behavior).
    #[default]
    Abort,
    /// Log the failed date and continue with the next one.
    Skip,
}

impl std::str::FromStr for FetchPolicy {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "abort" => Ok(FetchPolicy::Abort),
            "skip" => Ok(FetchPolicy::Skip),
            _ => Err(format!("Invalid fetch policy: {}", input)),
        }
    }
}

/// Accumulating state of one date-range walk.
///
/// Owned exclusively by the walk; each folded `DayRecord` is constructed
/// independently and never mutated afterwards.
#[derive(Debug, Default)]
pub struct Aggregate {
    /// Full daily map keyed by ISO date; re-folding a date overwrites it.
    pub daily: BTreeMap<String, DayRecord>,
    /// First-write-wins festival index.
    pub festivals_by_month: MonthlyIndex,
    /// Same shape, restricted to religious observances; strict subset of
    /// the festival index.
    pub observances_by_month: MonthlyIndex,
    years: BTreeSet<String>,
}

impl Aggregate {
    /// Folds one day's record into the running maps.
    ///
    /// The month entry is created even when the day harvested no
    /// festivals, so every crawled month appears in the indices. Within a
    /// month, the first date label stored for a festival name wins; later
    /// occurrences are ignored.
    pub fn fold_day(&mut self, day: NaiveDate, record: DayRecord) {
        let year = day.year().to_string();
        let month = day.format("%B").to_string();
        self.years.insert(year.clone());

        let festival_month = self
            .festivals_by_month
            .entry(year.clone())
            .or_default()
            .entry(month.clone())
            .or_default();
        for name in &record.festivals {
            festival_month
                .entry(name.clone())
                .or_insert_with(|| record.date_label.clone());
        }

        let observance_month = self
            .observances_by_month
            .entry(year)
            .or_default()
            .entry(month)
            .or_default();
        for name in record.festivals.iter().filter(|name| is_observance(name)) {
            observance_month
                .entry(name.clone())
                .or_insert_with(|| record.date_label.clone());
        }

        self.daily.insert(record.date.clone(), record);
    }

    /// Consumes the walk state and produces the serializable result,
    /// duplicating the three views under the combined envelope.
    pub fn into_result(self, source: SourceInfo) -> AggregateResult {
        AggregateResult {
            source,
            festivals_by_month: self.festivals_by_month.clone(),
            daily_panchang: self.daily.clone(),
            observances_by_month: self.observances_by_month.clone(),
            everything: Everything {
                years: self.years.into_iter().collect(),
                daily: self.daily,
                by_month_festivals: self.festivals_by_month,
                by_month_observances: self.observances_by_month,
            },
        }
    }
}

/// Walks every calendar date from `start` to `end` inclusive in ascending
/// order, obtains page text for each date from `fetch`, and folds the
/// parsed day records into one `Aggregate`.
///
/// The fetch capability is a plain async closure so the walk can run
/// against pre-fetched text with no network dependency.
///
/// # Errors
///
/// Returns an error when a fetch fails and `policy` is
/// `FetchPolicy::Abort`; with `FetchPolicy::Skip` failed dates are logged
/// and the walk continues.
pub async fn crawl_range<F, Fut>(
    start: NaiveDate,
    end: NaiveDate,
    policy: FetchPolicy,
    patterns: &Patterns,
    mut fetch: F,
) -> Result<Aggregate>
where
    F: FnMut(NaiveDate) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let mut aggregate = Aggregate::default();

    let mut day = start;
    while day <= end {
        match fetch(day).await {
            Ok(text) => aggregate.fold_day(day, parse_day(patterns, &text, day)),
            Err(error) => match policy {
                FetchPolicy::Abort => {
                    return Err(error.context(format!("Fetch failed for {day}, aborting walk")));
                }
                FetchPolicy::Skip => warn!("Skipping {day}: {error:#}"),
            },
        }

        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    Ok(aggregate)
}

/// Informational description of the upstream site and request parameters.
/// Not consulted by any aggregation logic.
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub site: String,
    pub base_url: String,
    pub params: SourceParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceParams {
    pub geoname_id: Option<String>,
    pub time_format: String,
}

/// Combined view bundling the three derived views with the years spanned.
#[derive(Debug, Serialize)]
pub struct Everything {
    pub years: Vec<String>,
    pub daily: BTreeMap<String, DayRecord>,
    pub by_month_festivals: MonthlyIndex,
    pub by_month_observances: MonthlyIndex,
}

/// Top-level output of a completed date-range walk.
#[derive(Debug, Serialize)]
pub struct AggregateResult {
    pub source: SourceInfo,
    pub festivals_by_month: MonthlyIndex,
    pub daily_panchang: BTreeMap<String, DayRecord>,
    pub observances_by_month: MonthlyIndex,
    pub everything: Everything,
}
