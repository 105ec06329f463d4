#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use summit_loader::config::{LoaderConfig, RetryConfig};
use summit_loader::errors::{LoaderError, Result};
use summit_loader::scrape::PageFetcher;
use summit_loader::sparql::{Binding, BindingTerm, RawBindings, TripleStore};

pub const GEO_LONG: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#long";
pub const GEO_LAT: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#lat";
pub const ELEVATION: &str = "http://dbpedia.org/ontology/elevation";
pub const ELEVATION_M: &str = "http://dbpedia.org/ontology/elevationM";
pub const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";
pub const PRIMARY_TOPIC: &str = "http://xmlns.com/foaf/0.1/isPrimaryTopicOf";
pub const ABSTRACT: &str = "http://dbpedia.org/ontology/abstract";

/// In-memory triple store that answers the loader's query shapes and records
/// every query it receives.
#[derive(Default)]
pub struct MockTripleStore {
    /// Instances of the enumerated class, already in URI order.
    pub class_members: Vec<String>,
    /// `(subject, predicate, object)` facts served to DESCRIBE queries.
    pub triples: Vec<(String, String, String)>,
    /// URIs returned for name searches.
    pub search_results: Vec<String>,
    pub queries: RefCell<Vec<String>>,
}

impl MockTripleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members(mut self, members: &[&str]) -> Self {
        self.class_members = members.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_triple(mut self, s: &str, p: &str, o: &str) -> Self {
        self.triples
            .push((s.to_string(), p.to_string(), o.to_string()));
        self
    }

    pub fn with_search_results(mut self, uris: &[&str]) -> Self {
        self.search_results = uris.iter().map(|u| u.to_string()).collect();
        self
    }

    /// Every query received so far.
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }

    /// Only the DESCRIBE queries received so far.
    pub fn describe_queries(&self) -> Vec<String> {
        self.queries()
            .into_iter()
            .filter(|q| q.starts_with("DESCRIBE"))
            .collect()
    }

    /// Only the page queries received so far.
    pub fn page_queries(&self) -> Vec<String> {
        self.queries()
            .into_iter()
            .filter(|q| q.starts_with("SELECT ?mountain"))
            .collect()
    }
}

fn number_after(query: &str, keyword: &str) -> usize {
    let mut tokens = query.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == keyword {
            return tokens.next().and_then(|n| n.parse().ok()).unwrap_or(0);
        }
    }
    0
}

/// URIs written as `<...>` inside a query.
pub fn iris_in(query: &str) -> Vec<String> {
    let mut iris = Vec::new();
    let mut rest = query;
    while let Some(start) = rest.find('<') {
        let after = &rest[start + 1..];
        match after.find('>') {
            Some(end) => {
                iris.push(after[..end].to_string());
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    iris
}

pub fn uri_binding(var: &str, uri: &str) -> Binding {
    Binding::from([(var.to_string(), BindingTerm::uri(uri))])
}

pub fn spo_binding(s: &str, p: &str, o: &str) -> Binding {
    Binding::from([
        ("s".to_string(), BindingTerm::uri(s)),
        ("p".to_string(), BindingTerm::uri(p)),
        ("o".to_string(), BindingTerm::literal(o)),
    ])
}

impl TripleStore for MockTripleStore {
    fn query(&self, query: &str) -> Result<RawBindings> {
        self.queries.borrow_mut().push(query.to_string());

        if query.starts_with("SELECT ?mountain") {
            let limit = number_after(query, "LIMIT");
            let offset = number_after(query, "OFFSET");
            return Ok(self
                .class_members
                .iter()
                .skip(offset)
                .take(limit)
                .map(|uri| uri_binding("mountain", uri))
                .collect());
        }

        if query.starts_with("SELECT DISTINCT ?mountain") {
            return Ok(self
                .search_results
                .iter()
                .map(|uri| uri_binding("mountain", uri))
                .collect());
        }

        if query.starts_with("DESCRIBE") {
            let targets = iris_in(query);
            return Ok(self
                .triples
                .iter()
                .filter(|(s, _, _)| targets.contains(s))
                .map(|(s, p, o)| spo_binding(s, p, o))
                .collect());
        }

        if query.starts_with("SELECT ?p ?o") {
            let targets = iris_in(query);
            return Ok(self
                .triples
                .iter()
                .filter(|(s, _, _)| targets.contains(s))
                .map(|(_, p, o)| {
                    Binding::from([
                        ("p".to_string(), BindingTerm::uri(p)),
                        ("o".to_string(), BindingTerm::literal(o)),
                    ])
                })
                .collect());
        }

        Err(LoaderError::Transport {
            message: format!("unexpected query: {query}"),
            endpoint: "mock".to_string(),
        })
    }
}

/// Page fetcher backed by a URL → HTML map. Unknown URLs fail like an
/// unreachable page.
#[derive(Default)]
pub struct MockFetcher {
    pub pages: HashMap<String, String>,
    pub calls: RefCell<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl PageFetcher for MockFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        self.calls.borrow_mut().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| LoaderError::Fetch {
            message: "http status: 404".to_string(),
            url: url.to_string(),
        })
    }
}

/// Configuration that never sleeps between retries.
pub fn test_config() -> LoaderConfig {
    LoaderConfig {
        retry: RetryConfig {
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
        },
        ..LoaderConfig::default()
    }
}

/// A Wikipedia-style page with one infobox holding the given rows.
///
/// `coordinates` is the `.geo` text; `elevation` is the data cell text.
pub fn infobox_page(coordinates: Option<&str>, elevation: Option<&str>) -> String {
    let mut rows = String::new();
    if let Some(elevation) = elevation {
        rows.push_str(&elevation_row(elevation));
    }
    if let Some(coordinates) = coordinates {
        rows.push_str(&coordinates_row(coordinates));
    }
    page_with_tables(&[infobox_table(&rows)])
}

pub fn coordinates_row(geo: &str) -> String {
    format!(
        "<tr><th class=\"infobox-label\"><a href=\"/wiki/Geographic_coordinate_system\">Coordinates</a></th>\
         <td class=\"infobox-data\"><span class=\"geo-dec\">some text</span>\
         <span class=\"geo\">{geo}</span></td></tr>"
    )
}

pub fn elevation_row(text: &str) -> String {
    format!(
        "<tr><th class=\"infobox-label\"><a href=\"/wiki/Summit_(topography)\">Elevation</a></th>\
         <td class=\"infobox-data\">{text}</td></tr>"
    )
}

pub fn infobox_table(rows: &str) -> String {
    format!("<table class=\"infobox vcard\"><tbody>{rows}</tbody></table>")
}

pub fn page_with_tables(tables: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>Mountain</title></head><body>{}</body></html>",
        tables.concat()
    )
}
