//! Tests for the config loader module.

use std::fs;
use std::path::PathBuf;

use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use tempfile::TempDir;

use super::watcher::handle_fs_event;
use super::*;
use feedhook_core::Item;

const VALID_CONFIG_YAML: &str = r#"
apiVersion: v1
loglevel: info
rules:
  - ruleType: stringContains
    targetFields: [title]
    pattern: GoLang
http:
  rss_url: https://example.com/feed.xml
match_outputs:
  - stdout: {}
"#;

const CHAINED_CONFIG_YAML: &str = r#"
apiVersion: v1
loglevel: debug
rules:
  - ruleType: regex
    targetFields: [author]
    pattern: "(?i)Fancy"
    ref: fancy_author
  - ruleType: regex
    targetRef: fancy_author
    pattern: "^/u/FancyNewMe$"
http:
  rss_url: https://example.com/feed.xml
match_outputs:
  - stdout: {}
"#;

fn temp_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("rules.yaml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn modify_event(path: &std::path::Path) -> Event {
    Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content))).add_path(path.to_path_buf())
}

#[test]
fn open_loads_and_compiles() {
    let (_dir, path) = temp_config(VALID_CONFIG_YAML);
    let loader = ConfigLoader::open(&path).unwrap();

    let active = loader.snapshot();
    assert_eq!(active.rules.len(), 1);
    assert_eq!(active.config.log_filter(), "info");
    assert_eq!(active.raw, VALID_CONFIG_YAML);
    assert!(active.warnings.is_empty());
    assert_eq!(loader.path(), path.as_path());

    let item = Item {
        title: "Learning GoLang with fun".to_string(),
        ..Default::default()
    };
    assert!(active.rules.evaluate(&item).is_match());
}

#[test]
fn open_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = ConfigLoader::open(dir.path().join("absent.yaml")).err().unwrap();
    assert!(matches!(err, RuleError::Io(_)));
}

#[test]
fn invalid_yaml_produces_error_not_panic() {
    let (_dir, path) = temp_config("rules: [unclosed\n");
    let err = ConfigLoader::open(&path).err().unwrap();
    assert!(matches!(err, RuleError::Parse(_)));
}

#[test]
fn unknown_rule_type_rejected_at_load() {
    let yaml = VALID_CONFIG_YAML.replace("stringContains", "glob");
    let (_dir, path) = temp_config(&yaml);
    assert!(matches!(
        ConfigLoader::open(&path).err().unwrap(),
        RuleError::Parse(_)
    ));
}

#[test]
fn forward_target_ref_rejected_at_load() {
    let yaml = r#"
rules:
  - ruleType: regex
    targetRef: later
    pattern: x
  - ruleType: stringContains
    targetField: title
    pattern: y
    ref: later
http:
  rss_url: https://example.com/feed.xml
match_outputs:
  - stdout: {}
"#;
    let (_dir, path) = temp_config(yaml);
    let err = ConfigLoader::open(&path).err().unwrap();
    match err {
        RuleError::Validation(msg) => assert!(msg.contains("rules[0].targetRef"), "{msg}"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn bad_regex_rejected_at_load() {
    let yaml = VALID_CONFIG_YAML
        .replace("stringContains", "regex")
        .replace("GoLang", "\"(GoLang\"");
    let (_dir, path) = temp_config(&yaml);
    assert!(matches!(
        ConfigLoader::open(&path).err().unwrap(),
        RuleError::Validation(_)
    ));
}

#[test]
fn warnings_are_kept_on_snapshot() {
    let yaml = VALID_CONFIG_YAML.replace("pattern: GoLang", "pattern: GoLang\n    distanceThreshold: 2");
    let (_dir, path) = temp_config(&yaml);
    let loader = ConfigLoader::open(&path).unwrap();
    let active = loader.snapshot();
    assert_eq!(active.warnings.len(), 1);
    assert_eq!(active.warnings[0].path, "rules[0].distanceThreshold");
}

#[test]
fn reload_unchanged_file_is_a_no_op() {
    let (_dir, path) = temp_config(VALID_CONFIG_YAML);
    let loader = ConfigLoader::open(&path).unwrap();
    let rx = loader.subscribe();

    let before = loader.snapshot();
    assert!(!loader.reload().unwrap());
    assert!(std::sync::Arc::ptr_eq(&before, &loader.snapshot()));
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn reload_swaps_snapshot_and_notifies() {
    let (_dir, path) = temp_config(VALID_CONFIG_YAML);
    let loader = ConfigLoader::open(&path).unwrap();
    let mut rx = loader.subscribe();

    fs::write(&path, CHAINED_CONFIG_YAML).unwrap();
    assert!(loader.reload().unwrap());

    let active = loader.snapshot();
    assert_eq!(active.rules.len(), 2);
    assert_eq!(active.config.log_filter(), "debug");

    assert!(rx.has_changed().unwrap());
    let seen = rx.borrow_and_update().clone();
    assert_eq!(seen.rules.len(), 2);
}

#[test]
fn failed_reload_keeps_previous_snapshot() {
    let (_dir, path) = temp_config(VALID_CONFIG_YAML);
    let loader = ConfigLoader::open(&path).unwrap();
    let rx = loader.subscribe();

    fs::write(&path, "rules:\n  - ruleType: regex\n    targetRef: ghost\n    pattern: x\n").unwrap();
    assert!(loader.reload().is_err());

    let active = loader.snapshot();
    assert_eq!(active.raw, VALID_CONFIG_YAML);
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn shared_slot_sees_reloads() {
    let (_dir, path) = temp_config(VALID_CONFIG_YAML);
    let loader = ConfigLoader::open(&path).unwrap();
    let shared = loader.shared();

    fs::write(&path, CHAINED_CONFIG_YAML).unwrap();
    loader.reload().unwrap();

    let guard = shared.read().unwrap();
    assert_eq!(guard.rules.len(), 2);
}

#[test]
fn fs_event_for_config_file_triggers_reload() {
    let (_dir, path) = temp_config(VALID_CONFIG_YAML);
    let loader = ConfigLoader::open(&path).unwrap();
    let rx = loader.subscribe();

    fs::write(&path, CHAINED_CONFIG_YAML).unwrap();
    handle_fs_event(&modify_event(&path), &path, &loader.active, &loader.changes);

    assert_eq!(loader.snapshot().rules.len(), 2);
    assert!(rx.has_changed().unwrap());
}

#[test]
fn fs_event_for_other_file_is_ignored() {
    let (dir, path) = temp_config(VALID_CONFIG_YAML);
    let loader = ConfigLoader::open(&path).unwrap();

    fs::write(&path, CHAINED_CONFIG_YAML).unwrap();
    let other = dir.path().join("other.yaml");
    handle_fs_event(&modify_event(&other), &path, &loader.active, &loader.changes);

    assert_eq!(loader.snapshot().rules.len(), 1);
}

#[test]
fn fs_remove_event_keeps_snapshot() {
    let (_dir, path) = temp_config(VALID_CONFIG_YAML);
    let loader = ConfigLoader::open(&path).unwrap();

    fs::remove_file(&path).unwrap();
    let event = Event::new(EventKind::Remove(RemoveKind::File)).add_path(path.clone());
    handle_fs_event(&event, &path, &loader.active, &loader.changes);

    assert_eq!(loader.snapshot().raw, VALID_CONFIG_YAML);
}

#[test]
fn fs_create_with_invalid_contents_keeps_snapshot() {
    let (_dir, path) = temp_config(VALID_CONFIG_YAML);
    let loader = ConfigLoader::open(&path).unwrap();

    fs::write(&path, "rules: [unclosed\n").unwrap();
    let event = Event::new(EventKind::Create(CreateKind::File)).add_path(path.clone());
    handle_fs_event(&event, &path, &loader.active, &loader.changes);

    assert_eq!(loader.snapshot().raw, VALID_CONFIG_YAML);
}

#[test]
fn watch_installs_on_parent_directory() {
    let (_dir, path) = temp_config(VALID_CONFIG_YAML);
    let mut loader = ConfigLoader::open(&path).unwrap();
    loader.watch().unwrap();
    assert!(loader._watcher.is_some());
}
