use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, info};

use crate::migrations::{
    EXPECTED_USER_VERSION, REQUIRED_INDEX_NAMES, REQUIRED_META_KEYS, run_pending,
    safe_repair_statement,
};
use crate::state::{
    ensure_home_directory, history_db_path, map_sqlite_error, open_connection, resolve_leme_home,
};
use crate::{CoreError, CoreResult};

/// Tables the store cannot work without, with the columns each must carry.
const CORE_TABLES: [(&str, &[&str]); 2] = [
    ("internal_meta", &["key", "value"]),
    (
        "evaluations",
        &[
            "evaluation_id",
            "created_at",
            "company_name",
            "sector",
            "reference_period",
            "health_score",
            "policy_version",
            "snapshot_json",
            "evaluation_json",
        ],
    ),
];

#[derive(Debug, Clone)]
pub struct SetupContext {
    pub db_path: String,
    pub schema_version: String,
}

/// Prepares the history store under `home`, creating, migrating and
/// repairing it as needed.
pub fn ensure_initialized_at(home: &Path) -> CoreResult<SetupContext> {
    ensure_initialized_with_home_override(Some(home))
}

pub(crate) fn ensure_initialized_with_home_override(
    home_override: Option<&Path>,
) -> CoreResult<SetupContext> {
    let leme_home = resolve_leme_home(home_override)?;
    ensure_home_directory(&leme_home)?;

    let db_path = history_db_path(&leme_home);
    let mut connection = open_connection(&db_path)?;
    run_pending(&mut connection).map_err(|error| migration_error(&db_path, &error))?;

    let probe = SchemaProbe {
        connection: &connection,
        db_path: &db_path,
    };
    probe.check_core_tables()?;
    probe.repair()?;
    probe.check_repaired()?;

    let schema_version = probe
        .meta_value("schema_version")?
        .unwrap_or_else(|| "v1".to_string());
    debug!(db_path = %db_path.display(), %schema_version, "history store ready");

    Ok(SetupContext {
        db_path: db_path.display().to_string(),
        schema_version,
    })
}

fn migration_error(db_path: &Path, error: &rusqlite_migration::Error) -> CoreError {
    if let rusqlite_migration::Error::RusqliteError { err, .. } = error {
        let mapped = map_sqlite_error(db_path, err);
        if matches!(
            mapped.code.as_str(),
            "store_locked" | "store_corrupt" | "store_init_permission_denied"
        ) {
            return mapped;
        }
    }
    CoreError::migration_failed(db_path, &error.to_string())
}

struct SchemaProbe<'a> {
    connection: &'a Connection,
    db_path: &'a Path,
}

impl SchemaProbe<'_> {
    fn check_core_tables(&self) -> CoreResult<()> {
        for (table, required) in CORE_TABLES {
            if !self.object_exists("table", table)? {
                return Err(CoreError::store_corrupt(self.db_path));
            }
            let present = self.columns_of(table)?;
            if required.iter().any(|column| !present.iter().any(|p| p == column)) {
                return Err(CoreError::store_corrupt(self.db_path));
            }
        }
        Ok(())
    }

    /// Restores missing meta keys and dropped indexes. A meta key holding a
    /// different value is left alone and fails [`Self::check_repaired`].
    fn repair(&self) -> CoreResult<()> {
        for (key, value) in REQUIRED_META_KEYS {
            self.connection
                .execute(
                    "INSERT OR IGNORE INTO internal_meta (key, value) VALUES (?1, ?2)",
                    params![key, value],
                )
                .map_err(|error| map_sqlite_error(self.db_path, &error))?;
        }

        for index in REQUIRED_INDEX_NAMES {
            if self.object_exists("index", index)? {
                continue;
            }
            let Some(sql) = safe_repair_statement(index) else {
                return Err(CoreError::store_init_failed(
                    self.db_path,
                    &format!("No repair statement is defined for index `{index}`."),
                ));
            };
            self.connection
                .execute_batch(&sql)
                .map_err(|error| map_sqlite_error(self.db_path, &error))?;
            info!(index, "recreated missing history index");
        }
        Ok(())
    }

    fn check_repaired(&self) -> CoreResult<()> {
        let user_version = self
            .connection
            .query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))
            .map_err(|error| map_sqlite_error(self.db_path, &error))?;
        if user_version != EXPECTED_USER_VERSION {
            return Err(CoreError::store_corrupt(self.db_path));
        }

        for (key, expected) in REQUIRED_META_KEYS {
            if self.meta_value(key)?.as_deref() != Some(expected) {
                return Err(CoreError::store_corrupt(self.db_path));
            }
        }

        for index in REQUIRED_INDEX_NAMES {
            if !self.object_exists("index", index)? {
                return Err(CoreError::store_corrupt(self.db_path));
            }
        }
        Ok(())
    }

    fn meta_value(&self, key: &str) -> CoreResult<Option<String>> {
        self.connection
            .query_row(
                "SELECT value FROM internal_meta WHERE key = ?1 LIMIT 1",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map_err(|error| map_sqlite_error(self.db_path, &error))
    }

    fn object_exists(&self, kind: &str, name: &str) -> CoreResult<bool> {
        let found = self
            .connection
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2 LIMIT 1",
                params![kind, name],
                |_row| Ok(()),
            )
            .optional()
            .map_err(|error| map_sqlite_error(self.db_path, &error))?;
        Ok(found.is_some())
    }

    fn columns_of(&self, table: &str) -> CoreResult<Vec<String>> {
        // PRAGMA arguments cannot be bound, so only allowlisted names reach the SQL.
        if !CORE_TABLES.iter().any(|(name, _)| *name == table) {
            return Err(CoreError::store_init_failed(
                self.db_path,
                "Refused to inspect a table outside the history schema.",
            ));
        }

        let mut statement = self
            .connection
            .prepare(&format!("PRAGMA table_info({table})"))
            .map_err(|error| map_sqlite_error(self.db_path, &error))?;
        let names = statement
            .query_map([], |row| row.get::<_, String>(1))
            .map_err(|error| map_sqlite_error(self.db_path, &error))?
            .collect::<Result<Vec<String>, _>>()
            .map_err(|error| map_sqlite_error(self.db_path, &error))?;
        Ok(names)
    }
}
