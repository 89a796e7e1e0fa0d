use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::CoreResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{HistoryListData, HistoryShowData};
use crate::setup::ensure_initialized_with_home_override;
use crate::state::open_connection;
use crate::store;

#[derive(Debug, Default)]
pub struct HistoryListOptions<'a> {
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct HistoryShowOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn list() -> CoreResult<SuccessEnvelope> {
    list_with_options(HistoryListOptions::default())
}

#[doc(hidden)]
pub fn list_with_options(options: HistoryListOptions<'_>) -> CoreResult<SuccessEnvelope> {
    let (connection, db_path) = open_history(options.home_override)?;
    let rows = store::list(&connection, &db_path)?;
    success("history list", HistoryListData { rows })
}

pub fn show(evaluation_id: &str) -> CoreResult<SuccessEnvelope> {
    show_with_options(evaluation_id, HistoryShowOptions::default())
}

#[doc(hidden)]
pub fn show_with_options(
    evaluation_id: &str,
    options: HistoryShowOptions<'_>,
) -> CoreResult<SuccessEnvelope> {
    let (connection, db_path) = open_history(options.home_override)?;
    let stored = store::load(&connection, &db_path, evaluation_id)?;
    success(
        "history show",
        HistoryShowData {
            evaluation_id: stored.evaluation_id,
            created_at: stored.created_at,
            snapshot: stored.snapshot,
            evaluation: stored.evaluation,
        },
    )
}

fn open_history(home_override: Option<&Path>) -> CoreResult<(Connection, PathBuf)> {
    let setup = ensure_initialized_with_home_override(home_override)?;
    let db_path = PathBuf::from(setup.db_path);
    let connection = open_connection(&db_path)?;
    Ok((connection, db_path))
}
