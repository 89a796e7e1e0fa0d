use serde_json::Value;

use super::format::{currency_field, key_value_rows, paragraph, percent_field, rows_of, text_field};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn render_pre_opening(data: &Value) -> String {
    let assessment = &data["assessment"];
    let capital = &assessment["capital"];
    let revenue = &assessment["revenue"];

    let mut lines = vec![
        format!(
            "Pre-opening assessment: {} business, {}",
            text_field(assessment, "business_type"),
            text_field(assessment, "sector_label")
        ),
        String::new(),
    ];
    lines.extend(key_value_rows(
        &[
            ("Location", location(assessment)),
            (
                "Opening",
                format!(
                    "{} ({} month(s) from {})",
                    opening_label(&text_field(assessment, "opening")),
                    assessment["months_until_opening"],
                    text_field(data, "as_of")
                ),
            ),
            ("Recommended capital", currency_field(capital, "recommended")),
            (
                "Available capital",
                format!(
                    "{} ({}, {})",
                    currency_field(capital, "available"),
                    signed_percent(capital),
                    text_field(capital, "status").replace('_', " ")
                ),
            ),
            (
                "Expected revenue",
                format!(
                    "{} vs sector reference {} ({}, {})",
                    currency_field(revenue, "expected"),
                    currency_field(revenue, "reference"),
                    signed_percent(revenue),
                    text_field(revenue, "status").replace('_', " ")
                ),
            ),
        ],
        2,
    ));

    if let Some(message) = assessment.get("context_message").and_then(Value::as_str) {
        lines.push(String::new());
        lines.extend(paragraph(message, 2));
    }

    lines.push(String::new());
    lines.push("Alerts:".to_string());
    for alert in rows_of(assessment, "alerts") {
        lines.push(format!(
            "  [{}] {}",
            text_field(alert, "severity"),
            text_field(alert, "title")
        ));
        lines.extend(paragraph(&text_field(alert, "text"), 4));
    }

    lines.push(String::new());
    lines.push("First 30 days:".to_string());
    for item in rows_of(assessment, "checklist_30_days") {
        lines.push(format!("  [ ] {}", text_field(item, "text")));
    }

    lines.join("\n")
}

/// `2026-03` as `March/2026`; anything unexpected is shown as is.
fn opening_label(opening: &str) -> String {
    let Some((year, month)) = opening.split_once('-') else {
        return opening.to_string();
    };
    match month
        .parse::<usize>()
        .ok()
        .and_then(|number| MONTH_NAMES.get(number.wrapping_sub(1)))
    {
        Some(name) => format!("{name}/{year}"),
        None => opening.to_string(),
    }
}

fn location(assessment: &Value) -> String {
    let parts = ["city", "state"]
        .iter()
        .filter_map(|key| assessment.get(*key).and_then(Value::as_str))
        .collect::<Vec<_>>();
    if parts.is_empty() {
        "not informed".to_string()
    } else {
        parts.join(" - ")
    }
}

fn signed_percent(comparison: &Value) -> String {
    let rendered = percent_field(comparison, "difference_pct", 1);
    match comparison["difference_pct"].as_f64() {
        Some(value) if value > 0.0 => format!("+{rendered}"),
        _ => rendered,
    }
}
