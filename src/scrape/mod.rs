//! Fallback extraction of location data from encyclopedia pages.

mod fetcher;
mod infobox;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::Result;
use crate::types::Location;

pub use fetcher::{HttpPageFetcher, PageFetcher};
pub use infobox::{parse_coordinates, parse_elevation, scrape_location};

/// What to do when one infobox holds more than one row of the same kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateRowPolicy {
    /// Use the first row that parses.
    #[default]
    FirstMatch,
    /// Fail the scrape as ambiguous.
    Reject,
}

/// Fetches `url` and fills the fields of `known` that are still missing from
/// the page's infoboxes.
///
/// Fetch and scrape failures are returned to the caller untouched.
pub fn scrape_location_from_page(
    fetcher: &dyn PageFetcher,
    url: &str,
    known: &Location,
    policy: DuplicateRowPolicy,
) -> Result<Location> {
    info!("Scraping location from {}", url);
    let html = fetcher.fetch(url)?;
    scrape_location(&html, known, policy)
}
