use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, Error as SqliteError, ffi::ErrorCode};

use crate::{CoreError, CoreResult};

pub const HOME_ENV_VAR: &str = "LEME_HOME";
const DEFAULT_HOME_DIR: &str = ".leme";
const HISTORY_DB_FILE: &str = "history.db";
const BUSY_TIMEOUT: Duration = Duration::from_millis(250);

/// Data directory, in order: explicit override, `LEME_HOME`, `~/.leme`.
/// Relative paths are resolved against the working directory.
pub fn resolve_leme_home(home_override: Option<&Path>) -> CoreResult<PathBuf> {
    let candidate = home_override
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(HOME_ENV_VAR).map(PathBuf::from))
        .or_else(|| home::home_dir().map(|home| home.join(DEFAULT_HOME_DIR)))
        .ok_or_else(|| {
            CoreError::store_init_failed(
                Path::new("."),
                "Could not resolve a home directory for the history store.",
            )
        })?;

    if candidate.is_absolute() {
        return Ok(candidate);
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&candidate))
        .map_err(|error| CoreError::store_init_failed(&candidate, &error.to_string()))
}

pub fn ensure_home_directory(path: &Path) -> CoreResult<()> {
    fs::create_dir_all(path).map_err(|error| map_io_error(path, &error))?;
    restrict_to_owner(path);
    Ok(())
}

pub fn history_db_path(home: &Path) -> PathBuf {
    home.join(HISTORY_DB_FILE)
}

pub fn open_connection(db_path: &Path) -> CoreResult<Connection> {
    Connection::open(db_path)
        .and_then(|connection| {
            connection.busy_timeout(BUSY_TIMEOUT)?;
            Ok(connection)
        })
        .map_err(|error| map_sqlite_error(db_path, &error))
}

fn map_io_error(path: &Path, error: &io::Error) -> CoreError {
    match error.kind() {
        io::ErrorKind::PermissionDenied => {
            CoreError::store_init_permission_denied(path, &error.to_string())
        }
        _ => CoreError::store_init_failed(path, &error.to_string()),
    }
}

/// Maps a SQLite failure onto the store error codes the CLI reports.
pub fn map_sqlite_error(path: &Path, error: &SqliteError) -> CoreError {
    match error.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => CoreError::store_locked(path),
        Some(ErrorCode::NotADatabase) => CoreError::store_corrupt(path),
        Some(ErrorCode::CannotOpen | ErrorCode::ReadOnly) => {
            CoreError::store_init_permission_denied(path, &error.to_string())
        }
        _ => CoreError::store_init_failed(path, &error.to_string()),
    }
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    // Best effort: a shared or read-only mount keeps its own mode.
    let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o700));
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) {}
