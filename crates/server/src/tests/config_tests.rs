use super::{load_settings_from, normalize_database_url, prepare_database_url, Settings};

use std::collections::HashMap;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn defaults_point_at_local_service() {
    let settings = load_settings_from(None, env_of(&[]));
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.server_bind, "127.0.0.1:5000");
    assert_eq!(settings.allowed_origin, "http://127.0.0.1:5500");
}

#[test]
fn settings_file_overrides_defaults() {
    let raw = r#"
        bind_addr = "0.0.0.0:8080"
        database_url = "sqlite://./other.db"
    "#;
    let settings = load_settings_from(Some(raw), env_of(&[]));
    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert_eq!(settings.database_url, "sqlite://./other.db");
    assert_eq!(settings.allowed_origin, Settings::default().allowed_origin);
}

#[test]
fn app_prefixed_environment_wins_over_plain_and_file() {
    let raw = r#"bind_addr = "0.0.0.0:8080""#;
    let settings = load_settings_from(
        Some(raw),
        env_of(&[
            ("SERVER_BIND", "127.0.0.1:7000"),
            ("APP__BIND_ADDR", "127.0.0.1:7001"),
            ("ALLOWED_ORIGIN", "*"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:7001");
    assert_eq!(settings.allowed_origin, "*");
}

#[test]
fn malformed_file_falls_back_to_defaults() {
    let settings = load_settings_from(Some("bind_addr = ["), env_of(&[]));
    assert_eq!(settings, Settings::default());
}

#[test]
fn blank_environment_values_are_ignored() {
    let settings = load_settings_from(None, env_of(&[("DATABASE_URL", "  ")]));
    assert_eq!(settings.database_url, Settings::default().database_url);
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(normalize_database_url(""), Settings::default().database_url);
}

#[test]
fn creates_parent_dir_for_sqlite_url() {
    let temp = tempfile::tempdir().expect("tempdir");
    let db_path = temp.path().join("data").join("notes.db");

    let prepared = prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare");
    assert!(prepared.starts_with("sqlite://"));
    assert!(temp.path().join("data").exists());
}

#[tokio::test]
async fn prepared_database_url_creates_openable_sqlite_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let db_path = temp.path().join("nested").join("server.db");

    let prepared = prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare");
    let storage = storage::Storage::new(&prepared).await.expect("open sqlite");
    storage.pool().close().await;

    assert!(
        db_path.exists(),
        "database file should be created: {}",
        db_path.display()
    );
}
