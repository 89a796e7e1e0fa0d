use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use serde_json::{Value, json};
use tempfile::tempdir;

struct CliRun {
    code: Option<i32>,
    stdout: String,
}

fn run_cli(home: &Path, args: &[&str], input: Option<&str>) -> CliRun {
    let mut command = Command::new(env!("CARGO_BIN_EXE_leme"));
    command.args(args);
    command.env("LEME_HOME", home);
    command.env_remove("LEME_LOG");
    command.env("COLUMNS", "120");
    command.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let child_spawn = command.spawn();
    assert!(child_spawn.is_ok());
    if let Ok(mut child) = child_spawn {
        if let (Some(body), Some(mut pipe)) = (input, child.stdin.take()) {
            assert!(pipe.write_all(body.as_bytes()).is_ok());
        }

        let output = child.wait_with_output();
        assert!(output.is_ok());
        if let Ok(result) = output {
            return CliRun {
                code: result.status.code(),
                stdout: String::from_utf8_lossy(&result.stdout).to_string(),
            };
        }
    }

    CliRun {
        code: None,
        stdout: String::new(),
    }
}

fn parse_json(text: &str) -> Value {
    let parsed = serde_json::from_str::<Value>(text);
    assert!(parsed.is_ok(), "stdout is not JSON: {text}");
    parsed.unwrap_or(Value::Null)
}

fn loss_snapshot() -> String {
    json!({
        "company_name": "Padaria Central",
        "reference_month": 3,
        "reference_year": 2026,
        "sector": "retail",
        "revenue_history": [100000, 100000, 100000],
        "revenue_current": 100000,
        "cost_of_sales": 70000,
        "fixed_expenses": 40000,
        "cash": 20000,
        "receivables": 0,
        "payables": 0,
        "employee_count": 3
    })
    .to_string()
}

#[test]
fn no_arguments_prints_root_help() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        let run = run_cli(dir.path(), &[], None);
        assert_eq!(run.code, Some(0));
        assert!(run.stdout.starts_with("Leme - financial health for small businesses"));
        assert!(run.stdout.contains("leme evaluate --help"));
    }
}

#[test]
fn top_level_help_lists_every_command() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        let run = run_cli(dir.path(), &["--help"], None);
        assert_eq!(run.code, Some(0));
        for command in [
            "leme evaluate",
            "leme score",
            "leme history list",
            "leme history show",
            "leme sectors",
            "leme pre-opening",
        ] {
            assert!(run.stdout.contains(command), "missing {command}");
        }
    }
}

#[test]
fn evaluate_json_from_stdin_returns_envelope() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        let snapshot = loss_snapshot();
        let run = run_cli(dir.path(), &["evaluate", "-", "--json"], Some(&snapshot));
        assert_eq!(run.code, Some(0));

        let value = parse_json(&run.stdout);
        assert_eq!(value["ok"], true);
        assert_eq!(value["command"], "evaluate");
        assert_eq!(value["data"]["saved"], false);
        assert_eq!(value["data"]["evaluation"]["indicators"]["monthly_result"], -10000.0);
        assert!(
            value["data"]["evaluation"]["indicators"]["health_score"]
                .as_u64()
                .is_some_and(|score| score <= 40)
        );
        for horizon in ["horizon_30", "horizon_60", "horizon_90"] {
            assert_eq!(
                value["data"]["evaluation"]["plan"][horizon]
                    .as_array()
                    .map(Vec::len),
                Some(4)
            );
        }
    }
}

#[test]
fn evaluate_json_is_byte_identical_across_runs() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        let path = dir.path().join("snapshot.json");
        assert!(fs::write(&path, loss_snapshot()).is_ok());
        let path_text = path.display().to_string();

        let first = run_cli(dir.path(), &["evaluate", &path_text, "--json"], None);
        let second = run_cli(dir.path(), &["evaluate", &path_text, "--json"], None);
        assert_eq!(first.code, Some(0));
        assert_eq!(first.stdout, second.stdout);
    }
}

#[test]
fn saved_evaluation_round_trips_through_history() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        let home = dir.path().join("leme-home");
        let snapshot = loss_snapshot();
        let saved = run_cli(&home, &["evaluate", "--save", "--json", "-"], Some(&snapshot));
        assert_eq!(saved.code, Some(0));
        let saved_value = parse_json(&saved.stdout);
        let evaluation_id = saved_value["data"]["evaluation_id"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        assert!(evaluation_id.starts_with("eval_"));
        assert!(home.join("history.db").exists());

        let listed = run_cli(&home, &["history", "list", "--json"], None);
        assert_eq!(listed.code, Some(0));
        let listed_value = parse_json(&listed.stdout);
        assert_eq!(listed_value["data"]["rows"][0]["evaluation_id"], evaluation_id.as_str());

        let shown = run_cli(&home, &["history", "show", &evaluation_id], None);
        assert_eq!(shown.code, Some(0));
        assert!(shown.stdout.starts_with("Financial health: Padaria Central (2026-03)"));

        let scored = run_cli(&home, &["score", "--evaluation-id", &evaluation_id, "--json"], None);
        assert_eq!(scored.code, Some(0));
        let scored_value = parse_json(&scored.stdout);
        assert_eq!(
            scored_value["data"]["score"],
            saved_value["data"]["evaluation"]["indicators"]["health_score"]
        );
    }
}

#[test]
fn invalid_snapshot_exits_with_user_error() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        let run = run_cli(
            dir.path(),
            &["evaluate", "-", "--json"],
            Some(r#"{"sector": "retail", "revenue_history": [], "revenue_current": -1,
                   "cost_of_sales": 0, "fixed_expenses": 0, "cash": 0,
                   "receivables": 0, "payables": 0, "employee_count": 1}"#),
        );
        assert_eq!(run.code, Some(1));
        let value = parse_json(&run.stdout);
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"]["code"], "invalid_snapshot");
        assert!(value["data"]["issues"].as_array().is_some_and(|issues| issues.len() == 2));
    }
}

#[test]
fn unknown_history_id_exits_with_user_error() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        let run = run_cli(dir.path(), &["history", "show", "eval_missing"], None);
        assert_eq!(run.code, Some(1));
        assert!(run.stdout.contains("evaluation_not_found"));
        assert!(run.stdout.contains("What to do next:"));
    }
}

#[test]
fn corrupt_store_exits_with_internal_error() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        assert!(fs::write(dir.path().join("history.db"), "not-a-sqlite-database").is_ok());
        let run = run_cli(dir.path(), &["history", "list", "--json"], None);
        assert_eq!(run.code, Some(2));
        let value = parse_json(&run.stdout);
        assert_eq!(value["error"]["code"], "store_corrupt");
    }
}

#[test]
fn parse_errors_use_the_error_contract() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        let run = run_cli(
            dir.path(),
            &["pre-opening", "-", "--as-of", "2026-02-30", "--json"],
            None,
        );
        assert_eq!(run.code, Some(1));
        let value = parse_json(&run.stdout);
        assert_eq!(value["error"]["code"], "invalid_argument");
        assert_eq!(value["data"]["command_hint"], "pre-opening");
    }
}

#[test]
fn sectors_text_lists_benchmarks() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        let run = run_cli(dir.path(), &["sectors"], None);
        assert_eq!(run.code, Some(0));
        assert!(run.stdout.contains("food_service"));
        assert!(run.stdout.contains("default"));
    }
}

#[test]
fn pre_opening_text_with_fixed_date() {
    let temp = tempdir();
    assert!(temp.is_ok());
    if let Ok(dir) = temp {
        let answers = json!({
            "business_type": "service",
            "sector": "services",
            "opening_month": 7,
            "opening_year": 2026,
            "available_capital": 20000,
            "expected_revenue": 10000,
            "owner_draw": "no",
            "has_employees": false,
            "guaranteed_clients": "yes"
        })
        .to_string();
        let run = run_cli(
            dir.path(),
            &["pre-opening", "-", "--as-of", "2026-01-15"],
            Some(&answers),
        );
        assert_eq!(run.code, Some(0));
        assert!(run.stdout.starts_with("Pre-opening assessment: service business, Services"));
        assert!(run.stdout.contains("July/2026 (6 month(s) from 2026-01-15)"));
        assert!(run.stdout.contains("Good sign: demand already validated"));
        assert!(run.stdout.contains("First 30 days:"));
    }
}
