use super::*;

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn lists_entities_in_insertion_order() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    for text in ["first", "second", "third"] {
        storage
            .insert_entity(EntityKind::Note, text)
            .await
            .expect("insert");
    }

    let notes = storage.list_entities(EntityKind::Note).await.expect("list");
    let texts: Vec<_> = notes.iter().map(|n| n.text.as_str()).collect();
    assert_eq!(texts, ["first", "second", "third"]);
}

#[tokio::test]
async fn collections_are_independent() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .insert_entity(EntityKind::Todo, "Buy milk")
        .await
        .expect("insert");

    assert!(storage
        .list_entities(EntityKind::Note)
        .await
        .expect("notes")
        .is_empty());
    assert_eq!(
        storage
            .list_entities(EntityKind::Todo)
            .await
            .expect("todos")
            .len(),
        1
    );
}

#[tokio::test]
async fn assigns_unique_identifiers() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let a = storage
        .insert_entity(EntityKind::Note, "same text")
        .await
        .expect("insert");
    let b = storage
        .insert_entity(EntityKind::Note, "same text")
        .await
        .expect("insert");
    assert_ne!(a.id, b.id);
    assert_eq!(a.id.as_str().len(), 32);
}

#[tokio::test]
async fn stores_empty_text_as_is() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let stored = storage
        .insert_entity(EntityKind::Todo, "")
        .await
        .expect("insert");
    let found = storage
        .find_entity(EntityKind::Todo, &stored.id)
        .await
        .expect("find")
        .expect("present");
    assert_eq!(found.text, "");
}

#[tokio::test]
async fn delete_reports_whether_a_row_was_removed() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let stored = storage
        .insert_entity(EntityKind::Note, "gone soon")
        .await
        .expect("insert");

    assert!(storage
        .delete_entity(EntityKind::Note, &stored.id)
        .await
        .expect("delete"));
    assert!(!storage
        .delete_entity(EntityKind::Note, &stored.id)
        .await
        .expect("second delete"));
    assert!(storage
        .find_entity(EntityKind::Note, &stored.id)
        .await
        .expect("find")
        .is_none());
}

#[tokio::test]
async fn delete_does_not_cross_collections() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let note = storage
        .insert_entity(EntityKind::Note, "note")
        .await
        .expect("insert");
    assert!(!storage
        .delete_entity(EntityKind::Todo, &note.id)
        .await
        .expect("delete"));
    assert_eq!(
        storage
            .list_entities(EntityKind::Note)
            .await
            .expect("list")
            .len(),
        1
    );
}

#[test]
fn sqlite_path_skips_memory_urls() {
    assert!(sqlite_path("sqlite::memory:").is_none());
    assert_eq!(
        sqlite_path("sqlite://./data/notes.db?mode=rwc"),
        Some(PathBuf::from("./data/notes.db"))
    );
}

#[tokio::test]
async fn memory_pool_pins_its_only_connection() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let options = storage.pool().options();
    assert_eq!(options.get_max_connections(), 1);
    assert_eq!(options.get_min_connections(), 1);
    assert_eq!(options.get_idle_timeout(), None);
    assert_eq!(options.get_max_lifetime(), None);

    storage
        .insert_entity(EntityKind::Note, "survives")
        .await
        .expect("insert");
    storage.health_check().await.expect("health check");
    assert_eq!(
        storage.list_entities(EntityKind::Note).await.expect("list").len(),
        1
    );
}

#[test]
fn file_pools_keep_default_recycling() {
    let options = pool_options("sqlite://./data/notes.db");
    assert_eq!(options.get_max_connections(), 5);
    assert!(options.get_idle_timeout().is_some());
    assert!(options.get_max_lifetime().is_some());
}

#[tokio::test]
async fn stamps_creation_time() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let before = chrono::Utc::now();
    let stored = storage
        .insert_entity(EntityKind::Todo, "timed")
        .await
        .expect("insert");
    assert!(stored.created_at >= before - chrono::Duration::seconds(1));
    assert!(stored.created_at <= chrono::Utc::now());
}
