use std::path::{Path, PathBuf};

use tracing::info;

use crate::CoreResult;
use crate::commands::input::resolve_source;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::EvaluateData;
use crate::engine::{self, snapshot::FinancialSnapshot};
use crate::setup::ensure_initialized_with_home_override;
use crate::state::open_connection;
use crate::store;

#[derive(Debug, Default)]
pub struct EvaluateOptions<'a> {
    pub path: Option<String>,
    pub save: bool,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

pub fn run(path: Option<String>, save: bool) -> CoreResult<SuccessEnvelope> {
    run_with_options(EvaluateOptions {
        path,
        save,
        home_override: None,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: EvaluateOptions<'_>) -> CoreResult<SuccessEnvelope> {
    let source = resolve_source(options.path, options.stdin_override, "evaluate")?;
    let snapshot = FinancialSnapshot::parse_json(&source.content)?;
    let evaluation = engine::evaluate(&snapshot)?;

    let mut data = EvaluateData {
        saved: false,
        evaluation_id: None,
        created_at: None,
        company_name: snapshot.company_name.clone(),
        reference_period: snapshot.reference_period(),
        source: source.label(),
        evaluation,
    };

    if options.save {
        let setup = ensure_initialized_with_home_override(options.home_override)?;
        let db_path = PathBuf::from(&setup.db_path);
        let mut connection = open_connection(&db_path)?;
        let item = store::save(&mut connection, &db_path, &snapshot, &data.evaluation)?;
        info!(evaluation_id = %item.evaluation_id, "evaluation saved to history");
        data.saved = true;
        data.evaluation_id = Some(item.evaluation_id);
        data.created_at = Some(item.created_at);
    }

    success("evaluate", data)
}
