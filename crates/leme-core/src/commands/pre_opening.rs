use chrono::NaiveDate;

use crate::CoreResult;
use crate::commands::input::resolve_source;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::PreOpeningData;
use crate::pre_opening::{PreOpeningInput, assess};

#[derive(Debug, Default)]
pub struct PreOpeningOptions {
    pub path: Option<String>,
    /// Date the months until opening are counted from.
    pub as_of: NaiveDate,
    pub stdin_override: Option<String>,
}

pub fn run(path: Option<String>, as_of: NaiveDate) -> CoreResult<SuccessEnvelope> {
    run_with_options(PreOpeningOptions {
        path,
        as_of,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: PreOpeningOptions) -> CoreResult<SuccessEnvelope> {
    let source = resolve_source(options.path, options.stdin_override, "pre-opening")?;
    let input = PreOpeningInput::parse_json(&source.content)?;
    let assessment = assess(&input, options.as_of)?;
    success(
        "pre-opening",
        PreOpeningData {
            as_of: options.as_of.format("%Y-%m-%d").to_string(),
            source: source.label(),
            assessment,
        },
    )
}
