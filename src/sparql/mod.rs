//! Triple-store access: the query client, result types, query builders, and
//! the binding parsers.

mod client;
mod parser;
pub mod queries;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::types::PredicateMap;

pub use client::SparqlClient;
pub use parser::{binding_value, parse_predicate_object, parse_subject_predicate_object};

/// Media type requested from the endpoint.
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// A single RDF term in a SPARQL JSON result binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingTerm {
    /// `uri`, `literal`, `typed-literal`, or `bnode`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Lexical value of the term.
    pub value: String,
    /// Language tag of a literal.
    #[serde(rename = "xml:lang", default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Datatype URI of a typed literal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

impl BindingTerm {
    /// Builds a URI term.
    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            kind: "uri".to_string(),
            value: value.into(),
            lang: None,
            datatype: None,
        }
    }

    /// Builds a plain literal term.
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            kind: "literal".to_string(),
            value: value.into(),
            lang: None,
            datatype: None,
        }
    }
}

/// One result row: query variable → bound term.
pub type Binding = HashMap<String, BindingTerm>;

/// The bindings array of a SELECT or DESCRIBE response, unmodified.
pub type RawBindings = Vec<Binding>;

/// Top-level shape of a SPARQL JSON results document.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResponse {
    #[serde(default)]
    pub head: SparqlHead,
    pub results: SparqlResults,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: RawBindings,
}

/// Anything that can answer a SPARQL query with a bindings array.
///
/// The production implementation is [`SparqlClient`]; tests substitute an
/// in-memory store.
pub trait TripleStore {
    /// Runs `query` and returns the raw bindings.
    fn query(&self, query: &str) -> Result<RawBindings>;
}

/// Fetches every `(predicate, object)` pair of `uri` in the flattened
/// single-subject form.
pub fn describe_properties(store: &dyn TripleStore, uri: &str) -> Result<PredicateMap> {
    let bindings = store.query(&queries::properties_query(uri))?;
    parse_predicate_object(&bindings)
}
