use chrono::NaiveDate;
use clap::{Parser, Subcommand};

pub fn parse_iso_date(value: &str) -> Result<NaiveDate, String> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(index, byte)| index == 4 || index == 7 || byte.is_ascii_digit());
    if !shaped {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| "date must use valid calendar values".to_string())
}

/// Extended help shown after `leme evaluate --help`.
pub const EVALUATE_AFTER_HELP: &str = "\
How evaluation works:
  Leme reads one monthly snapshot as a JSON object and returns indicators,
  a 0-100 health score, detected problems, strengths, risks and a
  30/60/90-day action plan. Nothing is stored unless you pass --save.

  <path> is a local file path.
  To read stdin explicitly, use `-` as the path.
  Example: cat snapshot.json | leme evaluate -

Snapshot example:
  {
    \"company_name\": \"Padaria Central\",
    \"reference_month\": 3,
    \"reference_year\": 2026,
    \"sector\": \"food_service\",
    \"revenue_history\": [42000, 45000, 47000],
    \"revenue_current\": 48000,
    \"cost_of_sales\": 29000,
    \"fixed_expenses\": 14000,
    \"cash\": 18000,
    \"receivables\": 6000,
    \"payables\": 9000,
    \"has_inventory\": true,
    \"inventory\": 7000,
    \"has_debt\": true,
    \"total_debt\": 60000,
    \"employee_count\": 6
  }

Field rules:
  sector (required):
    A sector key. Run `leme sectors` for the list.
    Unknown keys are evaluated against default benchmarks, with a warning.

  revenue_history (required):
    Exactly three monthly amounts, oldest first.

  revenue_current, cost_of_sales, fixed_expenses, cash, receivables, payables (required):
    Finite amounts, zero or positive, up to 1 trillion.

  inventory / total_debt:
    Required when has_inventory / has_debt is true.

  employee_count (required):
    At least 1. Count the owner.

What to do next:
  1. Run `leme evaluate <path>` and review the result.
  2. Run `leme evaluate --save <path>` to keep it in history.
  3. Run `leme history list` to compare saved evaluations.
";

/// Extended help shown after `leme pre-opening --help`.
pub const PRE_OPENING_AFTER_HELP: &str = "\
Answers example:
  {
    \"business_type\": \"product\",
    \"has_inventory\": true,
    \"sector\": \"retail\",
    \"state\": \"MG\",
    \"city\": \"Belo Horizonte\",
    \"opening_month\": 11,
    \"opening_year\": 2026,
    \"available_capital\": 40000,
    \"expected_revenue\": 15000,
    \"owner_draw\": \"no\",
    \"has_employees\": true,
    \"employee_band\": \"1-2\",
    \"guaranteed_clients\": \"partially\"
  }

Allowed values:
  business_type       product, service
  owner_draw          yes, no, undecided
  employee_band       1-2, 3-5, 6-10, 10+ (required when has_employees is true)
  guaranteed_clients  yes, no, partially
  has_inventory       required when business_type is product

Months until opening are counted from --as-of (default: today).
";

#[derive(Debug, Parser)]
#[command(
    name = "leme",
    version,
    about = "financial health engine for small businesses",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Evaluate a monthly financial snapshot
    #[command(after_long_help = EVALUATE_AFTER_HELP)]
    Evaluate {
        /// Save the evaluation to local history
        #[arg(long)]
        save: bool,
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
        /// Snapshot JSON file, or `-` for stdin
        path: Option<String>,
    },
    /// Recompute a health score with its breakdown
    Score {
        /// Indicator set JSON file, or `-` for stdin
        path: Option<String>,
        /// Rescore a saved evaluation instead of a file
        #[arg(long)]
        evaluation_id: Option<String>,
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Browse saved evaluations
    #[command(arg_required_else_help = true)]
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// List sector benchmarks
    Sectors {
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Assess a business that has not opened yet
    #[command(after_long_help = PRE_OPENING_AFTER_HELP)]
    PreOpening {
        /// Answers JSON file, or `-` for stdin
        path: Option<String>,
        /// Reference date (YYYY-MM-DD); defaults to today
        #[arg(long, value_parser = parse_iso_date)]
        as_of: Option<NaiveDate>,
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum HistoryCommand {
    /// List saved evaluations, newest first
    List {
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one saved evaluation
    Show {
        /// Evaluation id from `leme history list`
        evaluation_id: String,
        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use clap::error::ErrorKind;

    use super::{Commands, HistoryCommand, parse_from, parse_iso_date};

    #[test]
    fn parse_command_paths() {
        let cases: [Vec<&str>; 12] = [
            vec!["leme", "evaluate", "snapshot.json"],
            vec!["leme", "evaluate", "--save", "snapshot.json"],
            vec!["leme", "evaluate", "-", "--json"],
            vec!["leme", "evaluate"],
            vec!["leme", "score", "indicators.json"],
            vec!["leme", "score", "--evaluation-id", "eval_1", "--json"],
            vec!["leme", "history", "list"],
            vec!["leme", "history", "list", "--json"],
            vec!["leme", "history", "show", "eval_1"],
            vec!["leme", "sectors", "--json"],
            vec!["leme", "pre-opening", "answers.json"],
            vec!["leme", "pre-opening", "-", "--as-of", "2026-01-15", "--json"],
        ];

        for case in cases {
            let parsed = parse_from(case.clone());
            assert!(parsed.is_ok(), "failed to parse: {case:?}");
        }
    }

    #[test]
    fn parse_history_show() {
        let parsed = parse_from(["leme", "history", "show", "eval_1", "--json"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert!(matches!(
                cli.command,
                Commands::History {
                    command: HistoryCommand::Show { json: true, .. }
                }
            ));
        }
    }

    #[test]
    fn parse_pre_opening_as_of_date() {
        let parsed = parse_from(["leme", "pre-opening", "a.json", "--as-of", "2026-02-28"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            let expected = NaiveDate::from_ymd_opt(2026, 2, 28);
            assert!(matches!(
                cli.command,
                Commands::PreOpening { as_of, .. } if as_of == expected
            ));
        }
    }

    #[test]
    fn date_parser_rejects_bad_shapes_and_calendar_values() {
        assert!(parse_iso_date("2026-1-5").is_err());
        assert!(parse_iso_date("2026/01/05").is_err());
        assert_eq!(
            parse_iso_date("2026-02-30"),
            Err("date must use valid calendar values".to_string())
        );
        assert!(parse_iso_date("2028-02-29").is_ok());
    }

    #[test]
    fn history_without_subcommand_shows_help() {
        let parsed = parse_from(["leme", "history"]);
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(
                error.kind(),
                ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            );
        }
    }

    #[test]
    fn unknown_command_is_rejected() {
        let parsed = parse_from(["leme", "import", "create"]);
        assert!(parsed.is_err());
    }
}
