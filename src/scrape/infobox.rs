use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::errors::{LoaderError, Result};
use crate::types::Location;

use super::DuplicateRowPolicy;

const COORDINATES_LABEL: &str = "Coordinates";
const ELEVATION_LABEL: &str = "Elevation";

fn selector(cell: &'static OnceLock<Selector>, css: &'static str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).expect("static selector is valid"))
}

fn table_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "table")
}

fn row_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "tr")
}

fn header_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "th")
}

fn link_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "a")
}

fn geo_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, ".geo")
}

fn data_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, ".infobox-data")
}

fn cell_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    selector(&SEL, "td")
}

/// Fills the fields of `known` that are still missing from the page's
/// infobox tables.
///
/// Each `table.infobox` is scanned in document order for a coordinates row
/// and an elevation row. Scanning stops as soon as all three fields are
/// known. Missing rows contribute nothing; only duplicated rows under
/// [`DuplicateRowPolicy::Reject`] produce an error.
pub fn scrape_location(
    html: &str,
    known: &Location,
    policy: DuplicateRowPolicy,
) -> Result<Location> {
    let document = Html::parse_document(html);
    let mut location = *known;

    let infoboxes = document
        .select(table_selector())
        .filter(|table| table.value().classes().any(|c| c == "infobox"));

    for infobox in infoboxes {
        if location.is_complete() {
            break;
        }
        if !location.has_coordinates() {
            if let Some(found) = coordinates_from_infobox(infobox, policy)? {
                location.merge_from(&found);
            }
        }
        if location.elevation.is_none() {
            if let Some(found) = elevation_from_infobox(infobox, policy)? {
                location.merge_from(&found);
            }
        }
    }

    Ok(location)
}

/// Parses a `"<lat>; <long>"` geo string.
pub fn parse_coordinates(text: &str) -> Option<Location> {
    let (lat_text, long_text) = text.trim().split_once("; ")?;
    let latitude = lat_text.trim().parse::<f64>().ok()?;
    let longitude = long_text.trim().parse::<f64>().ok()?;
    Some(Location {
        longitude: Some(longitude),
        latitude: Some(latitude),
        elevation: None,
    })
}

/// Extracts the first parenthesized meter figure, e.g. `"(1,234 m)"`.
pub fn parse_elevation(text: &str) -> Option<f64> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"\(([\d,]+)\+?\s+m\)").expect("elevation regex is valid")
    });

    let caps = re.captures(text)?;
    caps.get(1)?.as_str().replace(',', "").parse::<f64>().ok()
}

/// True for a `<tr>` whose header cell's first link reads exactly `label`.
fn is_labelled_row(row: &ElementRef<'_>, label: &str) -> bool {
    let Some(header) = row.select(header_selector()).next() else {
        return false;
    };
    let Some(link) = header.select(link_selector()).next() else {
        return false;
    };
    link.first_child()
        .and_then(|node| node.value().as_text().map(|text| &**text == label))
        .unwrap_or(false)
}

/// Rows of `infobox` labelled `label`, after applying the duplicate policy.
fn labelled_rows<'a>(
    infobox: ElementRef<'a>,
    label: &str,
    policy: DuplicateRowPolicy,
) -> Result<Vec<ElementRef<'a>>> {
    let rows: Vec<ElementRef<'a>> = infobox
        .select(row_selector())
        .filter(|row| is_labelled_row(row, label))
        .collect();

    if rows.len() > 1 {
        match policy {
            DuplicateRowPolicy::Reject => {
                return Err(LoaderError::Scrape {
                    message: format!(
                        "found {} {} rows in one infobox",
                        rows.len(),
                        label.to_lowercase()
                    ),
                });
            }
            DuplicateRowPolicy::FirstMatch => {
                debug!(rows = rows.len(), label, "duplicate infobox rows, using first valid");
            }
        }
    }
    Ok(rows)
}

fn coordinates_from_infobox(
    infobox: ElementRef<'_>,
    policy: DuplicateRowPolicy,
) -> Result<Option<Location>> {
    let found = labelled_rows(infobox, COORDINATES_LABEL, policy)?
        .into_iter()
        .find_map(|row| {
            let geo = row.select(geo_selector()).next()?;
            parse_coordinates(geo.text().next()?)
        });
    Ok(found)
}

fn elevation_from_infobox(
    infobox: ElementRef<'_>,
    policy: DuplicateRowPolicy,
) -> Result<Option<Location>> {
    let found = labelled_rows(infobox, ELEVATION_LABEL, policy)?
        .into_iter()
        .find_map(|row| {
            let cell = row
                .select(data_selector())
                .next()
                .or_else(|| row.select(cell_selector()).next())?;
            parse_elevation(&cell.text().collect::<String>())
        })
        .map(|elevation| Location {
            elevation: Some(elevation),
            ..Location::default()
        });
    Ok(found)
}
