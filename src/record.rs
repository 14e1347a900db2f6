//! The record module defines the per-day structured record and the parser
//! that assembles one from a single page's raw markup.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::extract::{Patterns, harvest_festivals, pick_first};
use crate::text::visible_text;

/// Rise and set times extracted from one day's page. Every field is
/// optional; a missing token on the page degrades to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timings {
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub moonrise: Option<String>,
    pub moonset: Option<String>,
}

/// The four lunar-calendar elements extracted from one day's page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Panchang {
    pub tithi: Option<String>,
    pub nakshatra: Option<String>,
    pub yoga: Option<String>,
    pub karana: Option<String>,
}

/// One calendar date's structured record: identity, timings, panchang
/// elements and the harvested festival names. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRecord {
    pub date: String,
    pub date_label: String,
    pub weekday: String,
    pub timings: Timings,
    pub panchang: Panchang,
    pub festivals: BTreeSet<String>,
}

/// Formats a date as its ISO `YYYY-MM-DD` key.
pub fn iso_date(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Formats the human date label, e.g. "January 14, 2025, Tuesday".
pub fn date_label(day: NaiveDate) -> String {
    format!("{}, {}", day.format("%B %d, %Y"), day.format("%A"))
}

/// Parses one day page into a `DayRecord`.
///
/// Strips non-visible markup, normalizes the remaining text, then runs
/// the field extractor for all eight fields and the festival harvester.
/// Structurally infallible: missing fields become `None` and an empty
/// harvest becomes an empty set, so malformed markup never fails.
pub fn parse_day(patterns: &Patterns, html: &str, day: NaiveDate) -> DayRecord {
    let text = visible_text(html);

    DayRecord {
        date: iso_date(day),
        date_label: date_label(day),
        weekday: day.format("%A").to_string(),
        timings: Timings {
            sunrise: pick_first(&patterns.sunrise, &text),
            sunset: pick_first(&patterns.sunset, &text),
            moonrise: pick_first(&patterns.moonrise, &text),
            moonset: pick_first(&patterns.moonset, &text),
        },
        panchang: Panchang {
            tithi: pick_first(&patterns.tithi, &text),
            nakshatra: pick_first(&patterns.nakshatra, &text),
            yoga: pick_first(&patterns.yoga, &text),
            karana: pick_first(&patterns.karana, &text),
        },
        festivals: harvest_festivals(&text),
    }
}
