#![forbid(unsafe_code)]

//! Loading [`HistoryConfig`] from TOML and JSON files.
//!
//! Run:
//!   cargo test -p tempo-history --features history-config --test config_loading

use std::io::Write;

use tempo_core::CalendarEvent;
use tempo_history::{HistoryConfig, HistoryConfigError, HistoryManager};

#[test]
fn toml_file_overrides_stack_size() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_stack_size = 7").unwrap();

    let config = HistoryConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.max_stack_size, 7);
    assert!(config.validate().is_empty());

    let mgr: HistoryManager<CalendarEvent> = HistoryManager::new(config);
    assert_eq!(mgr.config().max_stack_size, 7);
}

#[test]
fn json_file_overrides_stack_size() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"max_stack_size": 120}}"#).unwrap();

    let config = HistoryConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.max_stack_size, 120);
}

#[test]
fn empty_json_object_keeps_defaults() {
    let config = HistoryConfig::from_json_str("{}").unwrap();
    assert_eq!(config, HistoryConfig::default());
}

#[test]
fn zero_loads_but_fails_validation() {
    let config = HistoryConfig::from_toml_str("max_stack_size = 0").unwrap();
    assert_eq!(config.validate().len(), 1);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = HistoryConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, HistoryConfigError::Io(_)));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn wrong_type_is_toml_error() {
    let err = HistoryConfig::from_toml_str("max_stack_size = \"many\"").unwrap_err();
    assert!(matches!(err, HistoryConfigError::Toml(_)));
    assert!(err.to_string().starts_with("history config TOML error"));
}
