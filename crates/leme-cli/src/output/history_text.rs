use serde_json::Value;

use super::evaluation_text::{evaluation_lines, header_lines};
use super::format::{Align, Column, render_table, rows_of, terminal_width, text_field};

pub fn render_history_list(data: &Value) -> String {
    let rows = rows_of(data, "rows");
    if rows.is_empty() {
        return [
            "No saved evaluations yet.",
            "",
            "Run `leme evaluate --save <path>` to save one.",
        ]
        .join("\n");
    }

    let columns = [
        Column {
            name: "Evaluation",
            align: Align::Left,
        },
        Column {
            name: "Saved at",
            align: Align::Left,
        },
        Column {
            name: "Company",
            align: Align::Left,
        },
        Column {
            name: "Period",
            align: Align::Left,
        },
        Column {
            name: "Sector",
            align: Align::Left,
        },
        Column {
            name: "Score",
            align: Align::Right,
        },
    ];
    let cells = rows
        .iter()
        .map(|row| {
            vec![
                text_field(row, "evaluation_id"),
                text_field(row, "created_at"),
                optional_text(row, "company_name"),
                optional_text(row, "reference_period"),
                text_field(row, "sector"),
                row["health_score"].to_string(),
            ]
        })
        .collect::<Vec<_>>();

    let mut lines = vec![format!("Saved evaluations ({}), newest first:", rows.len())];
    lines.push(String::new());
    lines.extend(render_table(&columns, &cells, terminal_width(), "Evaluation"));
    lines.push(String::new());
    lines.push("Run `leme history show <evaluation-id>` for details.".to_string());
    lines.join("\n")
}

pub fn render_history_show(data: &Value) -> String {
    let snapshot = &data["snapshot"];
    let mut lines = header_lines(&serde_json::json!({
        "company_name": snapshot.get("company_name"),
        "reference_period": reference_period(snapshot),
    }));
    lines.push(format!(
        "Evaluation {} saved at {}",
        text_field(data, "evaluation_id"),
        text_field(data, "created_at")
    ));
    lines.push(String::new());
    lines.extend(evaluation_lines(&data["evaluation"]));
    lines.join("\n")
}

fn optional_text(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or("-")
        .to_string()
}

fn reference_period(snapshot: &Value) -> Option<String> {
    let month = snapshot.get("reference_month").and_then(Value::as_u64)?;
    let year = snapshot.get("reference_year").and_then(Value::as_i64)?;
    Some(format!("{year:04}-{month:02}"))
}
