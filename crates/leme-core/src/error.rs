use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use crate::contracts::types::SnapshotIssue;

pub(crate) const EVALUATE_HELP_COMMAND: &str = "leme evaluate --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct CoreError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl CoreError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `leme {cmd} --help` for usage."),
            None => "Run `leme --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_snapshot(issues: Vec<SnapshotIssue>) -> Self {
        let issue_count = issues.len();
        Self::new(
            "invalid_snapshot",
            &format!(
                "Financial snapshot failed validation: {issue_count} field(s) need fixes. Nothing was evaluated."
            ),
            vec![
                "Fix the listed fields in your snapshot file.".to_string(),
                format!("Run `{EVALUATE_HELP_COMMAND}` to review the snapshot fields."),
            ],
        )
        .with_data(json!({
            "issues": issues,
            "help_command": EVALUATE_HELP_COMMAND,
        }))
    }

    pub fn invalid_pre_opening_input(issues: Vec<SnapshotIssue>) -> Self {
        let issue_count = issues.len();
        Self::new(
            "invalid_pre_opening_input",
            &format!(
                "Pre-opening answers failed validation: {issue_count} field(s) need fixes."
            ),
            vec![
                "Fix the listed fields in your answers file.".to_string(),
                "Run `leme pre-opening --help` to review the expected fields.".to_string(),
            ],
        )
        .with_data(json!({
            "issues": issues,
        }))
    }

    pub fn evaluation_not_found(evaluation_id: &str) -> Self {
        Self::new(
            "evaluation_not_found",
            &format!("Evaluation id `{evaluation_id}` was not found."),
            vec![
                "Run `leme history list` to find a valid evaluation id.".to_string(),
                "Save new evaluations with `leme evaluate --save <path>`.".to_string(),
            ],
        )
        .with_data(json!({
            "evaluation_id": evaluation_id,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn store_init_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_permission_denied",
            &format!("Cannot initialize history store at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `LEME_HOME` to a writable directory."
            )],
        )
    }

    pub fn store_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_locked",
            &format!("History database is locked at `{location}`."),
            vec![format!(
                "Close other processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn store_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_corrupt",
            &format!("History database appears corrupt at `{location}`."),
            vec![format!(
                "Move `{location}` aside so a fresh history store can be created."
            )],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "migration_failed",
            &format!("History store migration failed at `{location}`: {detail}"),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn store_init_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_failed",
            &format!("History store initialization failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
