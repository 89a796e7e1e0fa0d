use rusqlite::Connection;
use rusqlite_migration::{M, Migrations};

const BOOTSTRAP_SQL: &str = include_str!("migrations/0001_bootstrap.sql");
const REPAIRABLE_MARKER: &str = "-- repairable:";

pub const REQUIRED_INDEX_NAMES: [&str; 2] = [
    "idx_evaluations_created_at_desc",
    "idx_evaluations_sector",
];

/// Meta rows written by the bootstrap migration, with the value each must hold.
pub const REQUIRED_META_KEYS: [(&str, &str); 2] = [
    ("schema_version", "v1"),
    ("snapshot_contract_version", "v1"),
];

/// `PRAGMA user_version` after every migration below has run.
pub const EXPECTED_USER_VERSION: i64 = 1;

pub fn run_pending(conn: &mut Connection) -> rusqlite_migration::Result<()> {
    Migrations::new(vec![M::up(BOOTSTRAP_SQL)]).to_latest(conn)
}

/// The bootstrap statement tagged `-- repairable: <name>`, up to its closing
/// semicolon. Only statements safe to replay on a live store carry the tag.
pub fn safe_repair_statement(name: &str) -> Option<String> {
    let mut lines = BOOTSTRAP_SQL.lines();
    lines.find(|line| {
        line.trim()
            .strip_prefix(REPAIRABLE_MARKER)
            .is_some_and(|tagged| tagged.trim() == name)
    })?;

    let mut statement = Vec::new();
    for line in lines {
        statement.push(line.trim_end());
        if line.trim_end().ends_with(';') {
            return Some(statement.join("\n"));
        }
    }
    None
}
