use leme_core::CoreError;
use serde_json::Value;

pub fn render_error(error: &CoreError) -> String {
    let mut lines = vec![
        "Something went wrong, but it's easy to fix.".to_string(),
        String::new(),
        format!("  Error:    {}", error.code),
        format!("  Details:  {}", error.message),
    ];

    let issues = error
        .data
        .as_ref()
        .and_then(|data| data.get("issues"))
        .and_then(Value::as_array);
    if let Some(issues) = issues {
        lines.push(String::new());
        lines.push("Fields to fix:".to_string());
        for issue in issues {
            let field = issue.get("field").and_then(Value::as_str).unwrap_or("?");
            let description = issue
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("");
            lines.push(format!("  - {field}: {description}"));
        }
    }

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if error.recovery_steps.is_empty() {
        lines.push("  1. Retry the command.".to_string());
    } else {
        for (index, step) in error.recovery_steps.iter().enumerate() {
            lines.push(format!("  {}. {step}", index + 1));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use leme_core::CoreError;
    use leme_core::contracts::types::SnapshotIssue;

    use super::render_error;

    #[test]
    fn renders_standard_error_layout() {
        let error = CoreError::invalid_argument_with_recovery(
            "bad input",
            vec!["run leme --help".to_string()],
        );

        let rendered = render_error(&error);
        assert!(rendered.starts_with("Something went wrong, but it's easy to fix."));
        assert!(rendered.contains("  Error:    invalid_argument"));
        assert!(rendered.contains("  Details:  bad input"));
        assert!(rendered.contains("  1. run leme --help"));
        assert!(!rendered.contains("Fields to fix:"));
    }

    #[test]
    fn lists_snapshot_issues() {
        let error = CoreError::invalid_snapshot(vec![SnapshotIssue::new(
            "employee_count",
            "below_minimum",
            "Employee count must be at least 1 (count the owner).",
        )]);

        let rendered = render_error(&error);
        assert!(rendered.contains("Fields to fix:"));
        assert!(rendered.contains("  - employee_count: Employee count must be at least 1"));
    }
}
