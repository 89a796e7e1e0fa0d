use chrono::Local;
use leme_core::commands;
use leme_core::{CoreResult, SuccessEnvelope};
use tracing::debug;

use crate::cli::{Cli, Commands, HistoryCommand};

pub fn dispatch(cli: &Cli) -> CoreResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Evaluate { save, path, .. } => commands::evaluate::run(path.clone(), *save),
        Commands::Score {
            path,
            evaluation_id,
            ..
        } => commands::score::run(path.clone(), evaluation_id.clone()),
        Commands::History { command } => match command {
            HistoryCommand::List { .. } => commands::history::list(),
            HistoryCommand::Show { evaluation_id, .. } => commands::history::show(evaluation_id),
        },
        Commands::Sectors { .. } => commands::sectors::list(),
        Commands::PreOpening { path, as_of, .. } => {
            let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
            debug!(%as_of, "pre-opening reference date");
            commands::pre_opening::run(path.clone(), as_of)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cli::parse_from;

    use super::dispatch;

    #[test]
    fn sectors_dispatches_without_state() {
        let parsed = parse_from(["leme", "sectors"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            let response = dispatch(&cli);
            assert!(response.is_ok());
            if let Ok(success) = response {
                assert_eq!(success.command, "sectors");
            }
        }
    }
}
