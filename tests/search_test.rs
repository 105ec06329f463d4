mod common;

use common::*;
use summit_loader::config::DEFAULT_ENTITY_CLASS;
use summit_loader::errors::LoaderError;
use summit_loader::search::search_by_name;

#[test]
fn test_search_returns_candidates_in_order() {
    let store = MockTripleStore::new().with_search_results(&[
        "http://dbpedia.org/resource/Mount_Foo",
        "http://dbpedia.org/resource/Mount_Foo_(Alaska)",
        "http://dbpedia.org/resource/Mount_Foo",
    ]);

    let uris = search_by_name(&store, DEFAULT_ENTITY_CLASS, "Foo").unwrap();

    assert_eq!(
        uris,
        vec![
            "http://dbpedia.org/resource/Mount_Foo",
            "http://dbpedia.org/resource/Mount_Foo_(Alaska)",
        ]
    );
    let query = &store.queries()[0];
    assert!(query.contains("contains(str(?name), \"Foo\")"));
    assert!(query.contains("<http://dbpedia.org/ontology/Mountain>"));
}

#[test]
fn test_search_without_matches_is_an_error() {
    let store = MockTripleStore::new();
    let err = search_by_name(&store, DEFAULT_ENTITY_CLASS, "Nowhere").unwrap_err();
    assert!(matches!(err, LoaderError::Search { ref name, .. } if name == "Nowhere"));
}
