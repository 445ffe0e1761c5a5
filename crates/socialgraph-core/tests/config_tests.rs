use std::io::Write;

use socialgraph_core::config::{
    ConfigError, DEFAULT_DATABASE, DEFAULT_EGO_MAX_NODES, DEFAULT_MAX_DEPTH, DEFAULT_STORE_PATH,
};
use socialgraph_core::Config;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.store.path, DEFAULT_STORE_PATH);
    assert_eq!(config.store.database, DEFAULT_DATABASE);
    assert_eq!(config.analysis.default_max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(config.analysis.default_ego_max_nodes, DEFAULT_EGO_MAX_NODES);
}

#[test]
fn test_config_to_toml() {
    let config = Config::default();
    let toml_str = toml::to_string_pretty(&config).unwrap();
    assert!(toml_str.contains("[store]"));
    assert!(toml_str.contains("[analysis]"));
    assert!(toml_str.contains("[logging]"));
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
[store]
path = "/tmp/graph.db"
in_memory = true

[analysis]
default_max_depth = 5
default_recommendation_limit = 20

[logging]
level = "debug"
json = true
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.store.path, "/tmp/graph.db");
    assert!(config.store.in_memory);
    assert_eq!(config.store.database, DEFAULT_DATABASE);
    assert_eq!(config.analysis.default_max_depth, 5);
    assert_eq!(config.analysis.default_recommendation_limit, 20);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
}

#[test]
fn test_from_file_rejects_out_of_range_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[analysis]\ndefault_max_depth = 9").unwrap();

    match Config::from_file(file.path()) {
        Err(ConfigError::Invalid(message)) => assert!(message.contains("default_max_depth")),
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_from_file_reports_parse_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[store\npath = ").unwrap();

    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Config::from_file(dir.path().join("absent.toml")),
        Err(ConfigError::ReadError(_))
    ));
}
