//! End-to-end tests for file-backed stores: save/load round trips, comment
//! and header preservation, defaults materialization, reload semantics, and
//! concurrent access through clones.

use std::sync::{Arc, Barrier};
use std::thread;

use confdoc::{ConfigStore, ConfigValue, DocumentOptions};
use tempfile::tempdir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_save_load_round_trip_with_comments_and_header() {
    init_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.yml");

    let store = ConfigStore::load(&path).unwrap();
    store
        .set_header(Some("Managed by the deploy pipeline.\nEdit with care.".to_string()))
        .unwrap();
    store.set("server.host", "0.0.0.0").unwrap();
    store.set("server.port", 25565).unwrap();
    store
        .set_comments("server.port", ["Port to bind. Must be free."])
        .unwrap();
    store.set("limits.ratio", 0.75).unwrap();
    store.set("motd", "welcome: all").unwrap();
    store.set("admins", vec!["alice", "bob"]).unwrap();
    store.save().unwrap();

    let reopened = ConfigStore::load(&path).unwrap();
    assert_eq!(
        reopened.header().unwrap().as_deref(),
        Some("Managed by the deploy pipeline.\nEdit with care.")
    );
    assert_eq!(reopened.get_string("server.host").unwrap(), "0.0.0.0");
    assert_eq!(reopened.get_int("server.port").unwrap(), 25565);
    assert_eq!(
        reopened.comments("server.port").unwrap(),
        vec!["Port to bind. Must be free."]
    );
    assert_eq!(reopened.get_double("limits.ratio").unwrap(), 0.75);
    assert_eq!(reopened.get_string("motd").unwrap(), "welcome: all");
    assert_eq!(
        reopened.get_string_list("admins").unwrap(),
        vec!["alice", "bob"]
    );
    assert_eq!(
        reopened.keys("", false).unwrap(),
        vec!["server", "limits", "motd", "admins"]
    );
}

#[test]
fn test_load_missing_file_then_first_save_creates_it() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fresh/config.yml");

    let store = ConfigStore::load(&path).unwrap();
    assert!(!path.exists());
    assert!(store.keys("", true).unwrap().is_empty());

    store.set("created", true).unwrap();
    store.save().unwrap();
    assert!(path.is_file());

    let reopened = ConfigStore::load(&path).unwrap();
    assert!(reopened.get_bool("created").unwrap());
}

#[test]
fn test_reload_discards_unsaved_and_picks_up_external_edits() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("live.yml");

    let store = ConfigStore::load(&path).unwrap();
    store.set("mode", "initial").unwrap();
    store.save().unwrap();

    // Another process rewrites the file.
    std::fs::write(&path, "mode: external\nadded: 9\n").unwrap();

    store.set("mode", "unsaved").unwrap();
    store.reload().unwrap();

    assert_eq!(store.get_string("mode").unwrap(), "external");
    assert_eq!(store.get_int("added").unwrap(), 9);
}

#[test]
fn test_reload_keeps_defaults_table() {
    let dir = tempdir().unwrap();
    let store = ConfigStore::load(dir.path().join("d.yml")).unwrap();
    store.set("present", 1).unwrap();
    store.save().unwrap();

    store.add_defaults([("fallback", 42)]).unwrap();
    store.reload().unwrap();
    assert_eq!(store.get_int("fallback").unwrap(), 42);
}

#[test]
fn test_copy_defaults_persist_on_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("defaults.yml");

    let mut options = DocumentOptions::default();
    options.copy_defaults = true;
    let store = ConfigStore::load_with_options(&path, options).unwrap();
    store.set("live", "kept").unwrap();
    store
        .add_defaults([
            ("live", ConfigValue::from("ignored")),
            ("seeded.depth", ConfigValue::from(3)),
        ])
        .unwrap();
    store.save().unwrap();

    // A plain reopen sees the materialized defaults but not the shadowed one.
    let reopened = ConfigStore::load(&path).unwrap();
    assert_eq!(reopened.get_string("live").unwrap(), "kept");
    assert_eq!(reopened.get_int("seeded.depth").unwrap(), 3);
}

#[test]
fn test_defaults_without_copy_are_lookup_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lazy.yml");

    let store = ConfigStore::load(&path).unwrap();
    store.add_defaults([("timeout", 30)]).unwrap();
    store.save().unwrap();

    assert_eq!(store.get_int("timeout").unwrap(), 30);
    // Never written to disk.
    let reopened = ConfigStore::load(&path).unwrap();
    assert_eq!(reopened.get_int("timeout").unwrap(), 0);
    assert!(!reopened.is_set("timeout"));
}

#[test]
fn test_comments_disabled_are_stripped_on_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bare.yml");
    std::fs::write(&path, "# kept upstream\nkey: 1\n").unwrap();

    let mut options = DocumentOptions::default();
    options.parse_comments = false;
    let store = ConfigStore::load_with_options(&path, options).unwrap();
    assert!(store.comments("key").unwrap().is_empty());
    store.save().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "key: 1\n");
}

#[test]
fn test_concurrent_writers_through_clones() {
    let dir = tempdir().unwrap();
    let store = ConfigStore::load(dir.path().join("conc.yml")).unwrap();

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|n| {
            let store = store.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.set(&format!("workers.w{}", n), n as i64).unwrap();
                store.save().unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Every write landed; the last save captured all of them.
    for n in 0..threads {
        assert_eq!(
            store.get_long(&format!("workers.w{}", n)).unwrap(),
            n as i64
        );
    }
    let reopened = ConfigStore::load(store.file_path()).unwrap();
    assert_eq!(reopened.keys("workers", false).unwrap().len(), threads);
}

#[test]
fn test_two_stores_on_one_file_see_saved_state_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("split.yml");

    let first = ConfigStore::load(&path).unwrap();
    first.set("owner", "first").unwrap();
    first.save().unwrap();

    // A separately loaded store has its own document; it does not track the
    // other store's unsaved mutations.
    let second = ConfigStore::load(&path).unwrap();
    first.set("owner", "changed").unwrap();
    assert_eq!(second.get_string("owner").unwrap(), "first");

    first.save().unwrap();
    second.reload().unwrap();
    assert_eq!(second.get_string("owner").unwrap(), "changed");
}

#[tokio::test]
async fn test_async_lifecycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("async.yml");

    let store = ConfigStore::load_async(&path).await.unwrap();
    store.set("stage", "written").unwrap();
    store.save_async().await.unwrap();

    std::fs::write(&path, "stage: external\n").unwrap();
    store.reload_async().await.unwrap();
    assert_eq!(store.get_string("stage").unwrap(), "external");

    let reopened = ConfigStore::load_async(&path).await.unwrap();
    assert_eq!(reopened.get_string("stage").unwrap(), "external");
}

#[test]
fn test_create_section_returns_scoped_handle() {
    let dir = tempdir().unwrap();
    let store = ConfigStore::load(dir.path().join("sections.yml")).unwrap();

    let db = store
        .create_section_with("database", [("host", "localhost"), ("user", "admin")])
        .unwrap();
    assert_eq!(db.current_path(), "database");
    db.set("pool.size", 16).unwrap();

    assert_eq!(store.get_string("database.host").unwrap(), "localhost");
    assert_eq!(store.get_int("database.pool.size").unwrap(), 16);

    let pool = db.create_section("pool").unwrap();
    assert_eq!(pool.current_path(), "database.pool");
    assert_eq!(pool.get_int("size").unwrap(), 16);
}

#[test]
fn test_rich_values_survive_persistence() {
    struct PointCodec;

    impl confdoc::ValueCodec for PointCodec {
        type Value = (i64, i64);

        fn encode(&self, value: &Self::Value) -> ConfigValue {
            ConfigValue::from(vec![value.0, value.1])
        }

        fn decode(&self, raw: &ConfigValue) -> Option<Self::Value> {
            match raw.as_list()? {
                [x, y] => Some((x.as_i64()?, y.as_i64()?)),
                _ => None,
            }
        }
    }

    let dir = tempdir().unwrap();
    let path = dir.path().join("rich.yml");

    let store = ConfigStore::load(&path).unwrap();
    store.set_rich(&PointCodec, "spawn.point", &(12, -7)).unwrap();
    store.save().unwrap();

    let reopened = ConfigStore::load(&path).unwrap();
    assert_eq!(
        reopened.get_rich(&PointCodec, "spawn.point").unwrap(),
        Some((12, -7))
    );
    assert_eq!(
        reopened
            .get_rich_or(&PointCodec, "spawn.missing", (0, 0))
            .unwrap(),
        (0, 0)
    );
}

#[test]
fn test_parse_error_reports_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.yml");
    std::fs::write(&path, "ok: 1\n\tbad: 2\n").unwrap();

    let err = ConfigStore::load(&path).unwrap_err();
    match err {
        confdoc::ConfigError::Parse { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error: {other:?}"),
    }
}
