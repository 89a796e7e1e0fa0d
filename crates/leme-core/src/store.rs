use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use tracing::debug;
use ulid::Ulid;

use crate::contracts::types::HistoryListItem;
use crate::engine::Evaluation;
use crate::engine::snapshot::FinancialSnapshot;
use crate::state::map_sqlite_error;
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone)]
pub(crate) struct StoredEvaluation {
    pub(crate) evaluation_id: String,
    pub(crate) created_at: String,
    pub(crate) snapshot: FinancialSnapshot,
    pub(crate) evaluation: Evaluation,
}

pub(crate) fn save(
    connection: &mut Connection,
    db_path: &Path,
    snapshot: &FinancialSnapshot,
    evaluation: &Evaluation,
) -> CoreResult<HistoryListItem> {
    let evaluation_id = format!("eval_{}", Ulid::new());
    let created_at = now_timestamp();
    let snapshot_json = serde_json::to_string(snapshot)
        .map_err(|error| CoreError::internal_serialization(&error.to_string()))?;
    let evaluation_json = serde_json::to_string(evaluation)
        .map_err(|error| CoreError::internal_serialization(&error.to_string()))?;

    let item = HistoryListItem {
        evaluation_id,
        created_at,
        company_name: snapshot.company_name.clone(),
        sector: snapshot.sector.clone(),
        reference_period: snapshot.reference_period(),
        health_score: evaluation.indicators.health_score,
        policy_version: evaluation.policy_version.score.clone(),
    };

    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    transaction
        .execute(
            "INSERT INTO evaluations (
                evaluation_id,
                created_at,
                company_name,
                sector,
                reference_period,
                health_score,
                policy_version,
                snapshot_json,
                evaluation_json
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &item.evaluation_id,
                &item.created_at,
                &item.company_name,
                &item.sector,
                &item.reference_period,
                i64::from(item.health_score),
                &item.policy_version,
                &snapshot_json,
                &evaluation_json
            ],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    transaction
        .commit()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    debug!(evaluation_id = %item.evaluation_id, "saved evaluation");
    Ok(item)
}

/// Newest first. ULIDs break ties between evaluations saved in the same second.
pub(crate) fn list(connection: &Connection, db_path: &Path) -> CoreResult<Vec<HistoryListItem>> {
    let mut statement = connection
        .prepare(
            "SELECT
                evaluation_id,
                created_at,
                company_name,
                sector,
                reference_period,
                health_score,
                policy_version
             FROM evaluations
             ORDER BY created_at DESC, evaluation_id DESC",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let rows = statement
        .query_map([], |row| {
            let health_score = row.get::<_, i64>(5)?;
            Ok(HistoryListItem {
                evaluation_id: row.get(0)?,
                created_at: row.get(1)?,
                company_name: row.get(2)?,
                sector: row.get(3)?,
                reference_period: row.get(4)?,
                health_score: u8::try_from(health_score).unwrap_or(u8::MAX),
                policy_version: row.get(6)?,
            })
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row.map_err(|error| map_sqlite_error(db_path, &error))?);
    }
    Ok(items)
}

pub(crate) fn load(
    connection: &Connection,
    db_path: &Path,
    evaluation_id: &str,
) -> CoreResult<StoredEvaluation> {
    let row = connection
        .query_row(
            "SELECT created_at, snapshot_json, evaluation_json
             FROM evaluations
             WHERE evaluation_id = ?1
             LIMIT 1",
            [evaluation_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let Some((created_at, snapshot_json, evaluation_json)) = row else {
        return Err(CoreError::evaluation_not_found(evaluation_id));
    };

    let snapshot = serde_json::from_str::<FinancialSnapshot>(&snapshot_json)
        .map_err(|_| CoreError::store_corrupt(db_path))?;
    let evaluation = serde_json::from_str::<Evaluation>(&evaluation_json)
        .map_err(|_| CoreError::store_corrupt(db_path))?;

    Ok(StoredEvaluation {
        evaluation_id: evaluation_id.to_string(),
        created_at,
        snapshot,
        evaluation,
    })
}

/// UTC, second precision, RFC 3339 (`2026-03-31T14:05:09Z`).
pub(crate) fn now_timestamp() -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0);
    DateTime::<Utc>::from_timestamp(i64::try_from(seconds).unwrap_or(0), 0)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{list, load, now_timestamp, save};
    use crate::engine::evaluate;
    use crate::engine::snapshot::fixtures::snapshot;
    use crate::migrations::run_pending;

    fn memory_store() -> Option<Connection> {
        let mut connection = Connection::open_in_memory().ok()?;
        run_pending(&mut connection).ok()?;
        Some(connection)
    }

    #[test]
    fn timestamp_is_rfc3339_utc() {
        let value = now_timestamp();
        assert_eq!(value.len(), 20);
        assert!(value.ends_with('Z'));
        assert_eq!(&value[4..5], "-");
        assert_eq!(&value[10..11], "T");
    }

    #[test]
    fn saved_evaluation_round_trips_through_the_store() {
        let connection = memory_store();
        assert!(connection.is_some());
        let Some(mut connection) = connection else {
            return;
        };
        let db_path = std::path::Path::new(":memory:");
        let input = snapshot(100000.0, 70000.0, 40000.0, 20000.0);
        let evaluation = evaluate(&input);
        assert!(evaluation.is_ok());
        let Ok(evaluation) = evaluation else {
            return;
        };

        let saved = save(&mut connection, db_path, &input, &evaluation);
        assert!(saved.is_ok());
        let Ok(item) = saved else {
            return;
        };
        assert!(item.evaluation_id.starts_with("eval_"));
        assert_eq!(item.reference_period.as_deref(), Some("2026-03"));
        assert_eq!(item.policy_version, "score/v1");

        let loaded = load(&connection, db_path, &item.evaluation_id);
        assert!(loaded.is_ok());
        if let Ok(stored) = loaded {
            assert_eq!(stored.snapshot, input);
            assert_eq!(stored.evaluation.plan, evaluation.plan);
            assert_eq!(
                stored.evaluation.indicators.health_score,
                evaluation.indicators.health_score
            );
            assert_eq!(stored.created_at, item.created_at);
        }
    }

    #[test]
    fn list_is_newest_first() {
        let connection = memory_store();
        assert!(connection.is_some());
        let Some(mut connection) = connection else {
            return;
        };
        let db_path = std::path::Path::new(":memory:");
        let input = snapshot(50000.0, 20000.0, 10000.0, 30000.0);
        let Ok(evaluation) = evaluate(&input) else {
            return;
        };

        let mut saved_ids = Vec::new();
        for _ in 0..3 {
            if let Ok(item) = save(&mut connection, db_path, &input, &evaluation) {
                saved_ids.push(item.evaluation_id);
            }
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        assert_eq!(saved_ids.len(), 3);

        let listed = list(&connection, db_path);
        assert!(listed.is_ok());
        if let Ok(items) = listed {
            let ids = items
                .into_iter()
                .map(|item| item.evaluation_id)
                .collect::<Vec<_>>();
            saved_ids.reverse();
            assert_eq!(ids, saved_ids);
        }
    }

    #[test]
    fn unknown_id_is_not_found() {
        let connection = memory_store();
        assert!(connection.is_some());
        if let Some(connection) = connection {
            let result = load(&connection, std::path::Path::new(":memory:"), "eval_missing");
            assert!(result.is_err());
            if let Err(error) = result {
                assert_eq!(error.code, "evaluation_not_found");
            }
        }
    }
}
