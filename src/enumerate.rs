//! Resumable, paginated enumeration of a class of entities.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::resolution::Resolver;
use crate::sparql::{binding_value, parse_subject_predicate_object, queries};
use crate::types::{MountainRecord, PropertyMap, TripleMap};

/// Name of the variable bound by the page query.
const PAGE_VAR: &str = "mountain";

/// Iterator over resolved records, one per `next()`.
///
/// Pages are fetched only when the previous one has been drained, so a
/// consumer that stops early never triggers further queries. After an error
/// has been yielded the iterator is exhausted.
pub struct MountainPages<'a> {
    resolver: Resolver<'a>,
    page_size: usize,
    offset: usize,
    remaining: Option<usize>,
    resume_target: Option<String>,
    pending: VecDeque<String>,
    page_triples: TripleMap,
    finished: bool,
}

impl<'a> MountainPages<'a> {
    pub fn new(
        resolver: Resolver<'a>,
        total_wanted: Option<usize>,
        page_size: usize,
        resume_after: Option<String>,
    ) -> Self {
        Self {
            resolver,
            page_size: page_size.max(1),
            offset: 0,
            remaining: total_wanted,
            resume_target: resume_after,
            pending: VecDeque::new(),
            page_triples: TripleMap::new(),
            finished: false,
        }
    }

    /// Fetches pages until one survives resume truncation.
    ///
    /// Returns `false` once the store has no more instances.
    fn fetch_page(&mut self) -> Result<bool> {
        let class = &self.resolver.config().entity_class;
        loop {
            // Pages read while seeking the resume target are discarded, so
            // they are never shrunk to the remaining count.
            let limit = match self.remaining {
                Some(remaining) if self.resume_target.is_none() => self.page_size.min(remaining),
                _ => self.page_size,
            };
            let bindings = self
                .resolver
                .store()
                .query(&queries::page_query(class, limit, self.offset))?;

            if bindings.is_empty() {
                if let Some(target) = &self.resume_target {
                    warn!("Source exhausted before reaching resume target {}", target);
                }
                return Ok(false);
            }
            self.offset += bindings.len();

            let mut uris = bindings
                .iter()
                .map(|binding| binding_value(binding, PAGE_VAR).map(str::to_string))
                .collect::<Result<Vec<String>>>()?;

            if let Some(target) = &self.resume_target {
                match uris.iter().position(|uri| uri == target) {
                    Some(index) => {
                        let at = self.offset - uris.len() + index;
                        info!("Resuming at {} (offset {})", target, at);
                        uris.drain(..index);
                        self.resume_target = None;
                    }
                    None => {
                        debug!(
                            skipped = uris.len(),
                            offset = self.offset,
                            "resume target not in page"
                        );
                        continue;
                    }
                }
            }

            if let Some(remaining) = self.remaining {
                uris.truncate(remaining);
            }

            info!("Describing {} mountains (offset {})", uris.len(), self.offset);
            let triples = self
                .resolver
                .store()
                .query(&queries::describe_query(&uris))?;
            self.page_triples = parse_subject_predicate_object(&triples)?;
            self.pending = uris.into();
            return Ok(true);
        }
    }

    fn resolve_next(&mut self, uri: &str) -> Result<MountainRecord> {
        info!("Getting: {}", uri);
        let empty = PropertyMap::new();
        let properties = self.page_triples.get(uri).unwrap_or(&empty);
        self.resolver.resolve(uri, properties)
    }
}

impl Iterator for MountainPages<'_> {
    type Item = Result<MountainRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            if self.remaining == Some(0) {
                self.finished = true;
                return None;
            }

            if let Some(uri) = self.pending.pop_front() {
                let result = self.resolve_next(&uri);
                match &result {
                    Ok(_) => {
                        if let Some(remaining) = self.remaining.as_mut() {
                            *remaining -= 1;
                        }
                    }
                    Err(_) => self.finished = true,
                }
                return Some(result);
            }

            match self.fetch_page() {
                Ok(true) => continue,
                Ok(false) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
