use tracing::{debug, info, warn};

use crate::config::LoaderConfig;
use crate::enumerate::MountainPages;
use crate::errors::Result;
use crate::scrape::{scrape_location_from_page, PageFetcher};
use crate::sparql::{parse_subject_predicate_object, queries, TripleStore};
use crate::types::*;

pub const NAME: &str = "http://xmlns.com/foaf/0.1/name";
pub const WIKIPEDIA_LINK: &str = "http://xmlns.com/foaf/0.1/isPrimaryTopicOf";
pub const LONGITUDE: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#long";
pub const LATITUDE: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#lat";
/// Elevation predicates, highest priority first.
pub const ELEVATION: [&str; 2] = [
    "http://dbpedia.org/ontology/elevation",
    "http://dbpedia.org/ontology/elevationM",
];
pub const ABSTRACT: &str = "http://dbpedia.org/ontology/abstract";

/// Resolves knowledge-graph URIs into [`MountainRecord`]s.
///
/// Structured triples are authoritative. When they leave the location
/// incomplete, the Wikipedia article named by the triples is scraped to fill
/// the gaps, and whatever is still missing after that is zero-filled.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a dyn TripleStore,
    fetcher: &'a dyn PageFetcher,
    config: &'a LoaderConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(
        store: &'a dyn TripleStore,
        fetcher: &'a dyn PageFetcher,
        config: &'a LoaderConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            config,
        }
    }

    pub fn store(&self) -> &'a dyn TripleStore {
        self.store
    }

    pub fn config(&self) -> &'a LoaderConfig {
        self.config
    }

    /// Describes `uri` in the triple store and resolves it.
    pub fn get_mountain(&self, uri: &str) -> Result<MountainRecord> {
        let bindings = self.store.query(&queries::describe_query(&[uri]))?;
        let parsed = parse_subject_predicate_object(&bindings)?;
        let empty = PropertyMap::new();
        self.resolve(uri, parsed.get(uri).unwrap_or(&empty))
    }

    /// Lazily walks every instance of the configured class.
    ///
    /// `total_wanted` of `None` means no limit. With `resume_after`, pages
    /// before the one containing that URI are skipped and the first record
    /// yielded is the URI itself.
    pub fn enumerate(
        &self,
        total_wanted: Option<usize>,
        page_size: usize,
        resume_after: Option<String>,
    ) -> MountainPages<'a> {
        MountainPages::new(*self, total_wanted, page_size, resume_after)
    }

    /// Builds a record for `uri` from its predicates.
    ///
    /// Fails only when the fallback page cannot be fetched or scraped.
    pub fn resolve(&self, uri: &str, properties: &PropertyMap) -> Result<MountainRecord> {
        let name = resolve_name(uri, properties);
        let wikipedia_link = first_value(properties, WIKIPEDIA_LINK).map(str::to_string);

        let mut location = structured_location(properties);
        info!("Location from just DBpedia for {}: {:?}", uri, location);

        if !location.is_complete() {
            if let Some(link) = &wikipedia_link {
                location = scrape_location_from_page(
                    self.fetcher,
                    link,
                    &location,
                    self.config.duplicate_rows,
                )?;
            }
        }

        if !location.is_complete() {
            warn!("Couldn't find full location for {}: {:?}", uri, location);
            location.fill_missing_with_zero();
        }

        let abstract_text = first_value(properties, ABSTRACT).map(str::to_string);

        let mut raw_parsed = TripleMap::new();
        raw_parsed.insert(uri.to_string(), properties.clone());

        Ok(MountainRecord {
            uri: uri.to_string(),
            name,
            location,
            wikipedia_link,
            abstract_text,
            raw_parsed,
        })
    }
}

fn first_value<'p>(properties: &'p PropertyMap, predicate: &str) -> Option<&'p str> {
    properties
        .get(predicate)
        .and_then(|values| values.first())
        .map(String::as_str)
}

/// Final path segment of a URI with underscores turned into spaces.
pub fn slug_name(uri: &str) -> String {
    let trimmed = uri.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next().unwrap_or(trimmed);
    segment.replace('_', " ")
}

/// Name precedence: the name predicate (all values joined), then the
/// Wikipedia link slug, then the URI slug.
pub fn resolve_name(uri: &str, properties: &PropertyMap) -> String {
    if let Some(names) = properties.get(NAME).filter(|names| !names.is_empty()) {
        return names.join(", ");
    }
    if let Some(link) = first_value(properties, WIKIPEDIA_LINK) {
        return slug_name(link);
    }
    slug_name(uri)
}

fn numeric_value(properties: &PropertyMap, predicate: &str) -> Option<f64> {
    let raw = first_value(properties, predicate)?;
    match raw.trim().parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            debug!(predicate, value = raw, "ignoring non-numeric value");
            None
        }
    }
}

/// Location fields available directly from the triples.
pub fn structured_location(properties: &PropertyMap) -> Location {
    Location {
        longitude: numeric_value(properties, LONGITUDE),
        latitude: numeric_value(properties, LATITUDE),
        elevation: ELEVATION
            .iter()
            .find_map(|predicate| numeric_value(properties, predicate)),
    }
}
