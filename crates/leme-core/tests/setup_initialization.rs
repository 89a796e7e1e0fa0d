use std::fs;

use leme_core::setup::ensure_initialized_at;
use rusqlite::Connection;
use tempfile::tempdir;

fn object_exists(connection: &Connection, object_type: &str, object_name: &str) -> bool {
    connection
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2",
            [object_type, object_name],
            |_row| Ok(()),
        )
        .is_ok()
}

fn meta_value(connection: &Connection, key: &str) -> Option<String> {
    connection
        .query_row(
            "SELECT value FROM internal_meta WHERE key = ?1 LIMIT 1",
            [key],
            |row| row.get::<_, String>(0),
        )
        .ok()
}

fn user_version(connection: &Connection) -> Option<i64> {
    connection
        .query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))
        .ok()
}

#[test]
fn setup_creates_history_db_at_home_override() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("leme-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            assert!(setup_context.db_path.ends_with("history.db"));
            assert_eq!(setup_context.schema_version, "v1");
            assert!(home.join("history.db").exists());
        }
    }
}

#[test]
fn setup_is_idempotent() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("leme-home");

        let first = ensure_initialized_at(&home);
        let second = ensure_initialized_at(&home);
        assert!(first.is_ok());
        assert!(second.is_ok());

        if let (Ok(first_context), Ok(second_context)) = (first, second) {
            assert_eq!(first_context.db_path, second_context.db_path);
            let connection = Connection::open(&second_context.db_path);
            assert!(connection.is_ok());
            if let Ok(conn) = connection {
                assert_eq!(user_version(&conn), Some(1));
            }
        }
    }
}

#[test]
fn setup_repairs_missing_safe_index() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("leme-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            if let Ok(conn) = Connection::open(&setup_context.db_path) {
                assert!(
                    conn.execute_batch("DROP INDEX idx_evaluations_sector;")
                        .is_ok()
                );
            }

            assert!(ensure_initialized_at(&home).is_ok());

            let verify_connection = Connection::open(&setup_context.db_path);
            assert!(verify_connection.is_ok());
            if let Ok(conn) = verify_connection {
                assert!(object_exists(&conn, "index", "idx_evaluations_sector"));
            }
        }
    }
}

#[test]
fn setup_repairs_missing_meta_key() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("leme-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            if let Ok(conn) = Connection::open(&setup_context.db_path) {
                let deleted = conn.execute(
                    "DELETE FROM internal_meta WHERE key = ?1",
                    ["snapshot_contract_version"],
                );
                assert!(deleted.is_ok());
            }

            assert!(ensure_initialized_at(&home).is_ok());

            if let Ok(conn) = Connection::open(&setup_context.db_path) {
                assert_eq!(
                    meta_value(&conn, "snapshot_contract_version"),
                    Some("v1".to_string())
                );
            }
        }
    }
}

#[test]
fn setup_fails_when_meta_value_was_changed() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("leme-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            if let Ok(conn) = Connection::open(&setup_context.db_path) {
                let updated = conn.execute(
                    "UPDATE internal_meta SET value = 'v9' WHERE key = ?1",
                    ["schema_version"],
                );
                assert!(updated.is_ok());
            }

            let failed = ensure_initialized_at(&home);
            assert!(failed.is_err());
            if let Err(error) = failed {
                assert_eq!(error.code, "store_corrupt");
            }
        }
    }
}

#[test]
fn setup_fails_when_core_table_missing() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("leme-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            if let Ok(conn) = Connection::open(&setup_context.db_path) {
                assert!(conn.execute_batch("DROP TABLE evaluations;").is_ok());
            }

            let failed = ensure_initialized_at(&home);
            assert!(failed.is_err());
            if let Err(error) = failed {
                assert_eq!(error.code, "store_corrupt");
            }
        }
    }
}

#[test]
fn setup_maps_locked_database_to_store_locked() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("leme-home");

        let context = ensure_initialized_at(&home);
        assert!(context.is_ok());
        if let Ok(setup_context) = context {
            let connection = Connection::open(&setup_context.db_path);
            assert!(connection.is_ok());
            if let Ok(conn) = connection {
                assert!(conn.execute_batch("BEGIN EXCLUSIVE;").is_ok());

                let locked_error = ensure_initialized_at(&home);
                assert!(locked_error.is_err());
                if let Err(error) = locked_error {
                    assert_eq!(error.code, "store_locked");
                }

                assert!(conn.execute_batch("ROLLBACK;").is_ok());
            }
        }
    }
}

#[test]
fn setup_maps_garbage_file_to_store_corrupt() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(temp_dir) = temp {
        let home = temp_dir.path().join("leme-home");
        assert!(fs::create_dir_all(&home).is_ok());
        assert!(fs::write(home.join("history.db"), "not-a-sqlite-database").is_ok());

        let result = ensure_initialized_at(&home);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "store_corrupt");
        }
    }
}
