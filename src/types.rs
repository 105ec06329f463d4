use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Predicate URI → object values, in the order the triple store returned them.
///
/// The first value of each list is treated as the primary one.
pub type PropertyMap = HashMap<String, Vec<String>>;

/// Subject URI → its predicates and their values.
pub type TripleMap = HashMap<String, PropertyMap>;

/// Predicate URI → value(s) for a single, already-known subject.
pub type PredicateMap = HashMap<String, PredicateValue>;

/// Value shape in the flattened single-subject form.
///
/// A predicate seen once is `Single`; a predicate seen more than once is
/// `Many`, with values kept in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredicateValue {
    Single(String),
    Many(Vec<String>),
}

impl PredicateValue {
    /// Appends another value, promoting `Single` to `Many`.
    pub fn push(&mut self, value: String) {
        match self {
            PredicateValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = PredicateValue::Many(vec![first, value]);
            }
            PredicateValue::Many(values) => values.push(value),
        }
    }
}

/// Geographic position of a feature. Every field is optional until resolution
/// is complete.
///
/// Merging follows a first-writer-wins rule: a field that is already set is
/// never overwritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Longitude in decimal degrees.
    #[serde(rename = "long", default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Latitude in decimal degrees.
    #[serde(rename = "lat", default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Elevation in meters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl Location {
    /// True when longitude and latitude are both known.
    pub fn has_coordinates(&self) -> bool {
        self.longitude.is_some() && self.latitude.is_some()
    }

    /// True when all three fields are known.
    pub fn is_complete(&self) -> bool {
        self.has_coordinates() && self.elevation.is_some()
    }

    /// Copies fields from `source` that are unset on `self`.
    ///
    /// Returns `true` if any field was filled.
    pub fn merge_from(&mut self, source: &Location) -> bool {
        let mut did_something = false;
        if self.longitude.is_none() && source.longitude.is_some() {
            self.longitude = source.longitude;
            did_something = true;
        }
        if self.latitude.is_none() && source.latitude.is_some() {
            self.latitude = source.latitude;
            did_something = true;
        }
        if self.elevation.is_none() && source.elevation.is_some() {
            self.elevation = source.elevation;
            did_something = true;
        }
        did_something
    }

    /// Sets every missing field to `0.0`.
    pub fn fill_missing_with_zero(&mut self) {
        self.merge_from(&Location {
            longitude: Some(0.0),
            latitude: Some(0.0),
            elevation: Some(0.0),
        });
    }
}

/// A fully resolved mountain, ready to be handed to a sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountainRecord {
    /// Knowledge-graph URI identifying the mountain.
    pub uri: String,
    /// Display name.
    pub name: String,
    /// Position and elevation.
    pub location: Location,
    /// Link to the Wikipedia article, when DBpedia knows one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikipedia_link: Option<String>,
    /// Descriptive abstract text.
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    /// The triples the record was resolved from, keyed by subject.
    pub raw_parsed: TripleMap,
}
