use leme_core::engine::money::{format_currency, format_percent};
use serde_json::Value;

use super::format::{Align, Column, render_table, rows_of, terminal_width, text_field};

const COLUMNS: [Column<'static>; 7] = [
    Column {
        name: "Key",
        align: Align::Left,
    },
    Column {
        name: "Sector",
        align: Align::Left,
    },
    Column {
        name: "Margin",
        align: Align::Right,
    },
    Column {
        name: "Runway",
        align: Align::Right,
    },
    Column {
        name: "Cycle",
        align: Align::Right,
    },
    Column {
        name: "Multiple",
        align: Align::Left,
    },
    Column {
        name: "Revenue/person",
        align: Align::Right,
    },
];

pub fn render_sectors(data: &Value) -> String {
    let mut cells = rows_of(data, "rows").iter().map(row_cells).collect::<Vec<_>>();
    if let Some(default) = data.get("default") {
        cells.push(row_cells(default));
    }

    let mut lines = vec![
        "Sector benchmarks (targets a healthy business reaches):".to_string(),
        String::new(),
    ];
    lines.extend(render_table(&COLUMNS, &cells, terminal_width(), "Sector"));
    lines.push(String::new());
    lines.push(
        "Use the key as `sector` in your snapshot. Unknown keys use the `default` row.".to_string(),
    );
    lines.join("\n")
}

fn row_cells(row: &Value) -> Vec<String> {
    vec![
        text_field(row, "key"),
        text_field(row, "label"),
        row["margin_target_pct"]
            .as_f64()
            .map(|value| format_percent(value, 0))
            .unwrap_or_default(),
        format!("{}d", row["cash_runway_target_days"]),
        format!("{}d", row["cycle_target_days"]),
        text_field(row, "valuation_multiple"),
        row["revenue_per_employee_target"]
            .as_f64()
            .map(format_currency)
            .unwrap_or_default(),
    ]
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::render_sectors;

    #[test]
    fn renders_each_sector_and_the_default() {
        let row = |key: &str, label: &str| {
            json!({
                "key": key,
                "label": label,
                "margin_target_pct": 30.0,
                "cash_runway_target_days": 45,
                "cycle_target_days": 15,
                "valuation_multiple": "1.5x - 2.5x",
                "revenue_per_employee_target": 8000.0
            })
        };
        let rendered = render_sectors(&json!({
            "rows": [row("retail", "Retail")],
            "default": row("default", "Other"),
        }));
        assert!(rendered.contains("retail"));
        assert!(rendered.contains("default"));
        assert!(rendered.contains("R$ 8.000,00"));
        assert!(rendered.contains("45d"));
    }
}
