//! SPARQL query text builders.

/// Wraps a URI in angle brackets, percent-encoding characters that may not
/// appear inside an IRI reference.
pub fn iri(uri: &str) -> String {
    let mut out = String::with_capacity(uri.len() + 2);
    out.push('<');
    for c in uri.chars() {
        match c {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' | ' ' => {
                out.push_str(&format!("%{:02X}", c as u32));
            }
            _ => out.push(c),
        }
    }
    out.push('>');
    out
}

/// Escapes a string for use inside a double-quoted SPARQL literal.
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// One page of instances of `class`, ordered by URI so that consecutive
/// pages form a stable total order.
pub fn page_query(class: &str, limit: usize, offset: usize) -> String {
    format!(
        "SELECT ?mountain WHERE {{ ?mountain a {} }} ORDER BY ?mountain LIMIT {} OFFSET {}",
        iri(class),
        limit,
        offset
    )
}

/// Describes every URI in one query.
pub fn describe_query<S: AsRef<str>>(uris: &[S]) -> String {
    let targets: Vec<String> = uris.iter().map(|u| iri(u.as_ref())).collect();
    format!("DESCRIBE {}", targets.join(" "))
}

/// All `(predicate, object)` pairs of a single subject.
pub fn properties_query(uri: &str) -> String {
    format!("SELECT ?p ?o WHERE {{ {} ?p ?o }}", iri(uri))
}

/// Instances of `class` whose `dbp:name` contains `name`.
pub fn name_search_query(class: &str, name: &str) -> String {
    format!(
        "SELECT DISTINCT ?mountain WHERE {{ \
         ?mountain a {} . \
         ?mountain <http://dbpedia.org/property/name> ?name . \
         FILTER contains(str(?name), \"{}\") \
         }} ORDER BY ?mountain",
        iri(class),
        escape_literal(name)
    )
}
