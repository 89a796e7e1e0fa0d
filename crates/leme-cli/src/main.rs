mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use leme_core::CoreError;
use stdout_io::write_stdout;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "LEME_LOG";

const ROOT_HELP: &str = "Leme - financial health for small businesses

Usage:
  leme <command>

Start here:
  leme sectors
  leme evaluate --help
  leme pre-opening --help
";

const TOP_LEVEL_HELP: &str = "Leme - financial health for small businesses

USAGE: leme <command>

Evaluate an operating business:
  1. leme sectors                                  List sector keys and benchmarks
  2. leme evaluate --help                          Read the snapshot fields
  3. leme evaluate <path>                          Score a monthly snapshot and build a plan
  4. leme evaluate --save <path>                   Same, and keep it in local history

Review saved evaluations:
  leme history list                                List saved evaluations, newest first
  leme history show <evaluation-id>                Show one saved evaluation
  leme score --evaluation-id <evaluation-id>       Explain how a saved score was reached
  leme score <path>                                Rescore an indicator set

Planning to open a business:
  leme pre-opening <path>                          Capital, revenue and alerts before opening

Every command accepts --json for machine-readable output.
Set LEME_HOME to move the history store (default: ~/.leme).
Set LEME_LOG (for example `LEME_LOG=debug`) to print logs on stderr.
";

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

/// Logs go to stderr so stdout stays parseable in `--json` mode.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }
    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let text = if is_top_level_help_request(&raw_args) {
                    TOP_LEVEL_HELP.to_string()
                } else {
                    err.to_string()
                };
                if write_stdout(&text).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }
            let command_hint = if matches!(
                err.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
            ) {
                command_path_from_args(&raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                CoreError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_command(&cli.command);

    match dispatch::dispatch(&cli) {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            tracing::debug!(code = %error.code, "command failed");
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Drops clap's trailing usage and "For more information" lines; the
/// recovery steps replace them.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// Subcommand path used in `--help` hints, e.g. `history show`.
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let non_flags = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect::<Vec<&str>>();

    let hint = match non_flags.as_slice() {
        ["history", "list", ..] => "history list",
        ["history", "show", ..] => "history show",
        ["history", ..] => "history",
        ["evaluate", ..] => "evaluate",
        ["score", ..] => "score",
        ["sectors", ..] => "sectors",
        ["pre-opening", ..] => "pre-opening",
        _ => return None,
    };
    Some(hint.to_string())
}

fn exit_code_for_error(error: &CoreError) -> ExitCode {
    if is_internal_error(error) {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn is_internal_error(error: &CoreError) -> bool {
    error.code.starts_with("internal_")
        || matches!(
            error.code.as_str(),
            "store_init_permission_denied"
                | "store_locked"
                | "store_corrupt"
                | "migration_failed"
                | "store_init_failed"
        )
}

#[cfg(test)]
mod tests {
    use leme_core::CoreError;

    use super::{command_path_from_args, is_internal_error, strip_clap_boilerplate};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn command_hint_follows_subcommand_path() {
        assert_eq!(
            command_path_from_args(&args(&["leme", "history", "show", "--json"])),
            Some("history show".to_string())
        );
        assert_eq!(
            command_path_from_args(&args(&["leme", "pre-opening", "--as-of", "x"])),
            Some("pre-opening".to_string())
        );
        assert_eq!(command_path_from_args(&args(&["leme", "--bogus"])), None);
    }

    #[test]
    fn clap_usage_tail_is_removed() {
        let message = "error: unexpected argument '--nope' found\n\nUsage: leme sectors [OPTIONS]";
        assert_eq!(
            strip_clap_boilerplate(message),
            "error: unexpected argument '--nope' found"
        );
    }

    #[test]
    fn store_failures_are_internal() {
        assert!(is_internal_error(&CoreError::new("store_locked", "x", Vec::new())));
        assert!(is_internal_error(&CoreError::internal_serialization("x")));
        assert!(!is_internal_error(&CoreError::evaluation_not_found("eval_1")));
    }
}
