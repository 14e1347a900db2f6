//! The fetch module is the HTTP collaborator: one configured client
//! reused across every request, with the request parameters passed in at
//! construction time.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use url::Url;

use crate::constants::{BASE_URL, USER_AGENT};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Enum representing the clock format requested from the upstream site.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TimeFormat {
    /// 12-hour clock with AM/PM markers
    Hour12,
    /// 24-hour clock
    #[default]
    Hour24,
    /// 24-hour clock extending past midnight
    Hour24Plus,
}

impl TimeFormat {
    /// Returns the query-parameter value the site expects.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeFormat::Hour12 => "12hour",
            TimeFormat::Hour24 => "24hour",
            TimeFormat::Hour24Plus => "24plushour",
        }
    }
}

impl std::str::FromStr for TimeFormat {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "12hour" => Ok(TimeFormat::Hour12),
            "24hour" => Ok(TimeFormat::Hour24),
            "24plushour" => Ok(TimeFormat::Hour24Plus),
            _ => Err(format!("Invalid time format: {}", input)),
        }
    }
}

/// Upstream request configuration: base endpoint, optional location
/// identifier and clock-format preference.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub base_url: Url,
    pub geoname_id: Option<String>,
    pub time_format: TimeFormat,
}

impl SiteConfig {
    /// Creates the configuration against the stock base endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL constant fails to parse.
    pub fn new(geoname_id: Option<String>, time_format: TimeFormat) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(BASE_URL).context("Invalid base URL")?,
            geoname_id,
            time_format,
        })
    }

    /// Builds the page URL for one calendar date. The date travels as
    /// `DD/MM/YYYY` in the query string; geoname-id is omitted for the
    /// site's default location.
    pub fn day_url(&self, day: NaiveDate) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("date", &day.format("%d/%m/%Y").to_string());
            pairs.append_pair("time-format", self.time_format.as_str());
            if let Some(geoname_id) = &self.geoname_id {
                pairs.append_pair("geoname-id", geoname_id);
            }
        }
        url
    }
}

/// One configured HTTP client reused across many page requests.
pub struct PageClient {
    client: Client,
    config: SiteConfig,
}

impl PageClient {
    /// Builds the client with the crawler user agent and request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(config: SiteConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("Unable to build HTTP client")?;

        Ok(Self { client, config })
    }

    /// Returns the page URL this client would fetch for a date.
    pub fn day_url(&self, day: NaiveDate) -> Url {
        self.config.day_url(day)
    }

    /// Fetches the raw page markup for one calendar date.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the response carries a
    /// non-success status, or the body cannot be read.
    pub async fn fetch_day(&self, day: NaiveDate) -> Result<String> {
        let url = self.day_url(day);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Request failed for {url}"))?;
        let response = response
            .error_for_status()
            .with_context(|| format!("Upstream returned an error status for {url}"))?;

        response
            .text()
            .await
            .with_context(|| format!("Unable to read response body for {url}"))
    }
}
