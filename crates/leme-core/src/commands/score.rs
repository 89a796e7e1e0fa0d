use std::path::{Path, PathBuf};

use crate::commands::input::resolve_source;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ScoreData;
use crate::engine::indicators::IndicatorSet;
use crate::engine::score::explain;
use crate::setup::ensure_initialized_with_home_override;
use crate::state::open_connection;
use crate::store;
use crate::{CoreError, CoreResult};

#[derive(Debug, Default)]
pub struct ScoreOptions<'a> {
    pub path: Option<String>,
    pub evaluation_id: Option<String>,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(path: Option<String>, evaluation_id: Option<String>) -> CoreResult<SuccessEnvelope> {
    run_with_options(ScoreOptions {
        path,
        evaluation_id,
        home_override: None,
        stdin_override: None,
    })
}

/// Rescores either an indicator set read from a file/stdin or the
/// indicators stored with a saved evaluation.
#[doc(hidden)]
pub fn run_with_options(options: ScoreOptions<'_>) -> CoreResult<SuccessEnvelope> {
    if let Some(evaluation_id) = options.evaluation_id {
        if options.path.is_some() {
            return Err(CoreError::invalid_argument_for_command(
                "Pass either an indicators file or `--evaluation-id`, not both.",
                Some("score"),
            ));
        }
        let setup = ensure_initialized_with_home_override(options.home_override)?;
        let db_path = PathBuf::from(&setup.db_path);
        let connection = open_connection(&db_path)?;
        let stored = store::load(&connection, &db_path, &evaluation_id)?;
        let breakdown = explain(&stored.evaluation.indicators);
        return success(
            "score",
            ScoreData {
                source: format!("history:{evaluation_id}"),
                evaluation_id: Some(evaluation_id),
                score: breakdown.final_score,
                breakdown,
            },
        );
    }

    let source = resolve_source(options.path, options.stdin_override, "score")?;
    let indicators = serde_json::from_str::<IndicatorSet>(&source.content).map_err(|error| {
        CoreError::invalid_argument_with_recovery(
            &format!("Input is not a valid indicator set: {error}"),
            vec![
                "Pass the `indicators` object from a `leme evaluate --json` result.".to_string(),
                "Run `leme score --help` for usage.".to_string(),
            ],
        )
    })?;
    let breakdown = explain(&indicators);
    success(
        "score",
        ScoreData {
            source: source.label(),
            evaluation_id: None,
            score: breakdown.final_score,
            breakdown,
        },
    )
}
