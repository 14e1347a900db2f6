//! The storage module provides database operations for storing and retrieving
//! crawled day pages using SQLite.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::convert::TryFrom;
use std::sync::{Arc, Mutex};
use url::Url;

use crate::record::iso_date;

/// Storage provides database operations for storing and retrieving crawled day pages.
pub struct Storage {
    /// The underlying SQLite connection wrapped in Arc<Mutex<>> to make it thread-safe
    conn: Arc<Mutex<Connection>>,
}

impl Storage {
    /// Creates a new Storage instance with a database at the specified path.
    ///
    /// # Arguments
    ///
    /// * `database_path` - Path where the database file should be created or opened
    ///
    /// # Returns
    ///
    /// Returns a new Storage instance on success, or an error if database creation fails
    ///
    /// # Errors
    ///
    /// Returns an error if database creation fails
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)?;

        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Initializes the database schema with the day_pages table if it doesn't exist.
    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS day_pages (
                date TEXT PRIMARY KEY,
                url TEXT NOT NULL,
                fetched_at INTEGER NOT NULL,
                html TEXT NOT NULL,
                text TEXT NULL
            )",
            params![],
        )?;

        Ok(())
    }

    /// Returns all stored ISO dates in ascending order.
    ///
    /// # Returns
    ///
    /// Returns a vector of ISO date strings on success, or an error if database operation fails
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn list_dates(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        let mut stmt = conn.prepare("SELECT date FROM day_pages ORDER BY date ASC")?;
        let dates: Result<Vec<String>, rusqlite::Error> =
            stmt.query_map([], |row| row.get(0))?.collect();

        dates.map_err(|e| e.into())
    }

    /// Returns the earliest and latest stored ISO dates, or None when the
    /// database holds no pages.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn date_bounds(&self) -> Result<Option<(String, String)>> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        let mut stmt = conn.prepare("SELECT MIN(date), MAX(date) FROM day_pages")?;
        let bounds: (Option<String>, Option<String>) =
            stmt.query_row([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        match bounds {
            (Some(first), Some(last)) => Ok(Some((first, last))),
            _ => Ok(None),
        }
    }

    /// Gets all page data for a specific date from the database.
    ///
    /// # Arguments
    ///
    /// * `date` - The ISO date to look up in the database
    ///
    /// # Returns
    ///
    /// Returns a DayPage struct if found, None if not found, or an error if database operation fails
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn get_page(&self, date: &str) -> Result<Option<DayPage>> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        let mut stmt = conn
            .prepare("SELECT date, url, fetched_at, html, text FROM day_pages WHERE date = ?1")?;
        let page_row: Result<Option<PageRow>, rusqlite::Error> = stmt
            .query_row([date], |row| {
                Ok(PageRow {
                    date: row.get(0)?,
                    url: row.get(1)?,
                    fetched_at: row.get(2)?,
                    html: row.get(3)?,
                    text: row.get(4)?,
                })
            })
            .optional();

        let page_row: Option<PageRow> =
            page_row.map_err(|e| anyhow::anyhow!("Unable to fetch page row: {e}"))?;

        let page_row = match page_row {
            Some(page_row) => page_row,
            None => return Ok(None),
        };

        Ok(Some(page_row.try_into()?))
    }

    /// Adds or updates a day page in the database.
    ///
    /// # Arguments
    ///
    /// * `page` - The DayPage struct containing all the page data
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` on success, or an error if database operation fails
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn upsert_page(&self, page: &DayPage) -> Result<()> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        conn.execute(
            "INSERT OR REPLACE INTO day_pages (date, url, fetched_at, html, text) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                iso_date(page.date),
                page.url.as_str(),
                page.fetched_at.timestamp(),
                page.html,
                page.text.as_deref()
            ],
        )?;

        Ok(())
    }

    /// Updates the extracted text for a day page in the database.
    ///
    /// # Arguments
    ///
    /// * `date` - The ISO date of the page to update
    /// * `text` - The extracted visible text to store
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` on success, or an error if database operation fails
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned
    pub fn update_page_text(&self, date: &str, text: &str) -> Result<()> {
        let conn = self.conn.lock().expect("Storage mutex poisoned");
        conn.execute(
            "UPDATE day_pages SET text = ?1 WHERE date = ?2",
            params![text, date],
        )?;

        Ok(())
    }
}

/// Represents a day page row as stored in the database
#[derive(Debug)]
pub struct PageRow {
    pub date: String,
    pub url: String,
    pub fetched_at: i64,
    pub html: String,
    pub text: Option<String>,
}

/// Represents a crawled day page
#[derive(Debug)]
pub struct DayPage {
    pub date: NaiveDate,
    pub url: Url,
    pub fetched_at: DateTime<Utc>,
    pub html: String,
    pub text: Option<String>,
}

impl TryFrom<PageRow> for DayPage {
    type Error = anyhow::Error;

    fn try_from(page_row: PageRow) -> Result<Self> {
        Ok(DayPage {
            date: NaiveDate::parse_from_str(&page_row.date, "%Y-%m-%d")
                .context("Unable to parse stored date")?,
            url: Url::parse(&page_row.url)?,
            fetched_at: DateTime::from_timestamp_secs(page_row.fetched_at)
                .context("Unable to initialize fetched_at from database")?,
            html: page_row.html,
            text: page_row.text,
        })
    }
}
