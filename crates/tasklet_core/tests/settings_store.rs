use rusqlite::Connection;
use serde_json::json;
use tasklet_core::db::{open_db, open_db_in_memory};
use tasklet_core::{
    SettingsStore, SettingsStoreExt, SqliteSettingsStore, StoreError, TaskListController,
};

#[test]
fn write_then_read_roundtrips_json() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteSettingsStore::try_new(&conn, "tasklet").unwrap();

    let value = json!({"width": 320, "height": 480, "x": 100, "y": 100});
    store.write("windowBounds", &value).unwrap();

    assert_eq!(store.read("windowBounds").unwrap(), Some(value));
    assert_eq!(store.read("missing").unwrap(), None);
}

#[test]
fn write_replaces_previous_value() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteSettingsStore::try_new(&conn, "tasklet").unwrap();

    assert!(store.set("theme", "dark"));
    assert!(store.set("theme", "light"));

    assert_eq!(store.get("theme", String::from("dark")), "light");
    assert_eq!(store.keys().unwrap(), vec!["theme".to_string()]);
}

#[test]
fn namespaces_are_isolated() {
    let conn = open_db_in_memory().unwrap();
    let work = SqliteSettingsStore::try_new(&conn, "work").unwrap();
    let home = SqliteSettingsStore::try_new(&conn, " home ").unwrap();
    assert_eq!(home.namespace(), "home");

    work.set("alwaysOnTop", &false);

    assert!(!work.get("alwaysOnTop", true));
    assert!(home.get("alwaysOnTop", true));
    assert!(home.keys().unwrap().is_empty());
}

#[test]
fn remove_reports_whether_key_existed() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteSettingsStore::try_new(&conn, "tasklet").unwrap();
    store.set("theme", "dark");

    assert!(store.remove("theme").unwrap());
    assert!(!store.remove("theme").unwrap());
    assert_eq!(store.read("theme").unwrap(), None);
}

#[test]
fn try_new_rejects_blank_namespace_and_unmigrated_connection() {
    let conn = open_db_in_memory().unwrap();
    let err = SqliteSettingsStore::try_new(&conn, "   ").unwrap_err();
    assert!(matches!(err, StoreError::InvalidNamespace(_)));

    let raw = Connection::open_in_memory().unwrap();
    let err = SqliteSettingsStore::try_new(&raw, "tasklet").unwrap_err();
    assert!(matches!(err, StoreError::MissingSchema));
}

#[test]
fn corrupt_row_reads_as_error_and_typed_get_falls_back() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteSettingsStore::try_new(&conn, "tasklet").unwrap();
    conn.execute(
        "INSERT INTO settings (namespace, key, value) VALUES ('tasklet', 'theme', '{not json');",
        [],
    )
    .unwrap();

    let err = store.read("theme").unwrap_err();
    assert!(matches!(err, StoreError::InvalidData { ref key, .. } if key == "theme"));
    assert_eq!(store.get("theme", String::from("dark")), "dark");
}

#[test]
fn corrupt_task_snapshot_loads_as_empty_list() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO settings (namespace, key, value) VALUES ('tasklet', 'tasks', '[{]');",
        [],
    )
    .unwrap();
    let store = SqliteSettingsStore::try_new(&conn, "tasklet").unwrap();

    let mut controller = TaskListController::open(store);
    assert!(controller.is_empty());

    controller.add("recovered").unwrap();
    let reloaded = TaskListController::open(controller.into_store());
    assert_eq!(reloaded.tasks().len(), 1);
}

#[test]
fn tasks_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("tasklet.sqlite3");

    let expected = {
        let conn = open_db(&path).unwrap();
        let store = SqliteSettingsStore::try_new(&conn, "tasklet").unwrap();
        let mut controller = TaskListController::open(store);
        let a = controller.add("A").unwrap();
        controller.add("B").unwrap();
        controller.toggle(a.id).unwrap();
        assert!(controller.flush());
        controller.tasks().to_vec()
    };

    let conn = open_db(&path).unwrap();
    let store = SqliteSettingsStore::try_new(&conn, "tasklet").unwrap();
    let controller = TaskListController::open(store);
    assert_eq!(controller.tasks(), expected.as_slice());
}
