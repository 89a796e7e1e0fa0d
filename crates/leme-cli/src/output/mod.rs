mod error_text;
mod evaluation_text;
mod format;
mod history_text;
mod json;
mod mode;
mod pre_opening_text;
mod sectors_text;

use std::io;

use leme_core::{CoreError, SuccessEnvelope};

use crate::stdout_io::write_stdout;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout(&body)
}

pub fn print_failure(error: &CoreError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout(&body)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "evaluate" => Ok(evaluation_text::render_evaluate(&success.data)),
        "score" => Ok(evaluation_text::render_score(&success.data)),
        "history list" => Ok(history_text::render_history_list(&success.data)),
        "history show" => Ok(history_text::render_history_show(&success.data)),
        "sectors" => Ok(sectors_text::render_sectors(&success.data)),
        "pre-opening" => Ok(pre_opening_text::render_pre_opening(&success.data)),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
