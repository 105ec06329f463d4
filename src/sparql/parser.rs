use crate::errors::{LoaderError, Result};
use crate::types::{PredicateMap, PredicateValue, TripleMap};

use super::Binding;

/// Returns the value bound to `var`, or a parse error naming the variable.
pub fn binding_value<'b>(binding: &'b Binding, var: &str) -> Result<&'b str> {
    binding
        .get(var)
        .map(|term| term.value.as_str())
        .ok_or_else(|| LoaderError::Parse {
            message: format!("binding has no value for ?{var}"),
        })
}

/// Turns `?s ?p ?o` bindings into a `{ subject: { predicate: [object] } }`
/// map.
///
/// Values keep their arrival order and repeated triples produce repeated
/// entries. A binding without all three variables is rejected.
pub fn parse_subject_predicate_object(bindings: &[Binding]) -> Result<TripleMap> {
    let mut parsed = TripleMap::new();
    for binding in bindings {
        let subject = binding_value(binding, "s")?;
        let predicate = binding_value(binding, "p")?;
        let object = binding_value(binding, "o")?;

        parsed
            .entry(subject.to_string())
            .or_default()
            .entry(predicate.to_string())
            .or_default()
            .push(object.to_string());
    }
    Ok(parsed)
}

/// Turns `?p ?o` bindings for one known subject into a flat map.
///
/// A predicate seen once maps to [`PredicateValue::Single`]; seen more than
/// once it maps to [`PredicateValue::Many`].
pub fn parse_predicate_object(bindings: &[Binding]) -> Result<PredicateMap> {
    let mut parsed = PredicateMap::new();
    for binding in bindings {
        let predicate = binding_value(binding, "p")?;
        let object = binding_value(binding, "o")?.to_string();

        match parsed.get_mut(predicate) {
            Some(existing) => existing.push(object),
            None => {
                parsed.insert(predicate.to_string(), PredicateValue::Single(object));
            }
        }
    }
    Ok(parsed)
}
