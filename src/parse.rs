use crate::{ParseTarget, storage::Storage, text::visible_text};

use anyhow::Result;
use log::{error, info};

/// Extract visible text from HTML stored in the database and update the text field
///
/// # Arguments
///
/// * `db_path` - Path to the database file to read pages from
/// * `target` - The parse target (all pages or a specific ISO date)
///
/// # Errors
///
/// This function will return an error if:
/// - Database operations fail
pub async fn parse_db_pages(db_path: &str, target: ParseTarget) -> Result<()> {
    let storage = Storage::new(db_path)?;

    match target {
        ParseTarget::All => {
            let dates = storage.list_dates()?;
            for date in dates {
                info!("Parsing {date}");
                let page = match storage.get_page(&date)? {
                    Some(page) => page,
                    None => continue,
                };

                storage.update_page_text(&date, &visible_text(&page.html))?;
            }
        }
        ParseTarget::Day { date } => {
            let page = if let Some(page) = storage.get_page(&date)? {
                page
            } else {
                error!("Page not found: {date}");
                return Ok(());
            };

            storage.update_page_text(&date, &visible_text(&page.html))?;
        }
    }

    Ok(())
}
