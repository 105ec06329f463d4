use tracing::info;

use crate::errors::{LoaderError, Result};
use crate::sparql::{binding_value, queries, TripleStore};

/// Finds instances of `class` whose name contains `name`.
///
/// Returns the candidate URIs in URI order; an empty result is an error.
pub fn search_by_name(store: &dyn TripleStore, class: &str, name: &str) -> Result<Vec<String>> {
    let bindings = store.query(&queries::name_search_query(class, name))?;

    let mut uris = Vec::with_capacity(bindings.len());
    for binding in &bindings {
        let uri = binding_value(binding, "mountain")?;
        if !uris.iter().any(|seen: &String| seen == uri) {
            uris.push(uri.to_string());
        }
    }

    if uris.is_empty() {
        return Err(LoaderError::Search {
            message: "no matching mountains".to_string(),
            name: name.to_string(),
        });
    }

    info!("Found {} candidates for '{}'", uris.len(), name);
    Ok(uris)
}
