use summit_loader::config::*;
use summit_loader::errors::LoaderError;
use summit_loader::scrape::DuplicateRowPolicy;
use summit_loader::sink::SinkKind;
use tempfile::TempDir;

#[test]
fn test_default_config_targets_dbpedia_mountains() {
    let config = LoaderConfig::default();
    assert_eq!(config.sparql_endpoint, DEFAULT_SPARQL_ENDPOINT);
    assert_eq!(config.entity_class, DEFAULT_ENTITY_CLASS);
    assert_eq!(config.page_size, 100);
    assert_eq!(config.retry.max_attempts, 4);
    assert_eq!(config.sink.kind, SinkKind::Log);
    assert_eq!(config.duplicate_rows, DuplicateRowPolicy::FirstMatch);
    assert!(config.validate().is_ok());
}

#[test]
fn test_default_sqlite_path_is_under_data_dir() {
    let path = default_sqlite_path();
    assert!(path.ends_with("mountains.db"));
}

#[test]
fn test_load_without_path_returns_defaults() {
    let config = load_config(None).unwrap();
    assert_eq!(config, LoaderConfig::default());
}

#[test]
fn test_load_partial_file_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loader.json");
    std::fs::write(
        &path,
        r#"{
            "page_size": 25,
            "retry": { "max_attempts": 2 },
            "duplicate_rows": "reject",
            "sink": { "kind": "sqlite", "sqlite_path": "/tmp/m.db" }
        }"#,
    )
    .unwrap();

    let config = load_config(Some(&path)).unwrap();

    assert_eq!(config.page_size, 25);
    assert_eq!(config.retry.max_attempts, 2);
    assert_eq!(config.retry.base_delay_ms, 500);
    assert_eq!(config.duplicate_rows, DuplicateRowPolicy::Reject);
    assert_eq!(config.sink.kind, SinkKind::Sqlite);
    assert_eq!(config.sink.sqlite_path, std::path::PathBuf::from("/tmp/m.db"));
    assert_eq!(config.sparql_endpoint, DEFAULT_SPARQL_ENDPOINT);
}

#[test]
fn test_missing_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config(Some(&dir.path().join("absent.json"))).unwrap_err();
    assert!(matches!(err, LoaderError::Config { .. }));
}

#[test]
fn test_malformed_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loader.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = load_config(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("failed to parse config file"));
}

#[test]
fn test_zero_page_size_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loader.json");
    std::fs::write(&path, r#"{ "page_size": 0 }"#).unwrap();

    let err = load_config(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("page_size"));
}

#[test]
fn test_validation_rules() {
    let mut config = LoaderConfig::default();
    config.sparql_endpoint = "  ".to_string();
    assert!(config.validate().is_err());

    let mut config = LoaderConfig::default();
    config.retry.max_attempts = 0;
    assert!(config.validate().is_err());

    let mut config = LoaderConfig::default();
    config.sink.kind = SinkKind::Subprocess;
    config.sink.command.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_serde_roundtrip() {
    let config = LoaderConfig::default();
    let json = serde_json::to_string_pretty(&config).unwrap();
    let deserialized: LoaderConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, deserialized);
}
