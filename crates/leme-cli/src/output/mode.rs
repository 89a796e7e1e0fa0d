use crate::cli::{Commands, HistoryCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Evaluate { json, .. }
        | Commands::Score { json, .. }
        | Commands::Sectors { json }
        | Commands::PreOpening { json, .. }
        | Commands::History {
            command: HistoryCommand::List { json } | HistoryCommand::Show { json, .. },
        } => *json,
    };
    if json {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}
