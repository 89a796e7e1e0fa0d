use serde_json::Value;

use super::format::{
    currency_field, key_value_rows, paragraph, percent_field, rows_of, text_field,
};

const HORIZONS: [(&str, &str); 3] = [
    ("horizon_30", "Next 30 days"),
    ("horizon_60", "Next 60 days"),
    ("horizon_90", "Next 90 days"),
];

pub fn render_evaluate(data: &Value) -> String {
    let mut lines = header_lines(data);
    lines.push(format!("Source: {}", text_field(data, "source")));
    lines.push(String::new());
    lines.extend(evaluation_lines(&data["evaluation"]));

    lines.push(String::new());
    if data["saved"].as_bool().unwrap_or(false) {
        let evaluation_id = text_field(data, "evaluation_id");
        lines.push(format!("Saved as {evaluation_id}."));
        lines.push(format!(
            "Run `leme history show {evaluation_id}` to open it again."
        ));
    } else {
        lines.push("Not saved. Rerun with --save to keep this evaluation in history.".to_string());
    }
    lines.join("\n")
}

pub fn render_score(data: &Value) -> String {
    let breakdown = &data["breakdown"];
    let mut lines = vec![
        format!("Health score: {}/100", data["score"]),
        format!("Source: {}", text_field(data, "source")),
        format!("Policy: {}", text_field(breakdown, "policy_version")),
        String::new(),
    ];
    lines.extend(breakdown_lines(breakdown));
    lines.join("\n")
}

pub(super) fn header_lines(data: &Value) -> Vec<String> {
    let company = data
        .get("company_name")
        .and_then(Value::as_str)
        .unwrap_or("Your business");
    let title = match data.get("reference_period").and_then(Value::as_str) {
        Some(period) => format!("Financial health: {company} ({period})"),
        None => format!("Financial health: {company}"),
    };
    vec![title]
}

pub(super) fn evaluation_lines(evaluation: &Value) -> Vec<String> {
    let indicators = &evaluation["indicators"];
    let sector = &evaluation["sector"];

    let mut lines = key_value_rows(
        &[
            ("Health score", format!("{}/100", indicators["health_score"])),
            ("Sector", sector_text(sector)),
        ],
        2,
    );

    lines.push(String::new());
    lines.push("Indicators:".to_string());
    lines.extend(indicator_lines(indicators));

    let strengths = rows_of(&evaluation["diagnostics"], "strengths");
    if !strengths.is_empty() {
        lines.push(String::new());
        lines.push("Strengths:".to_string());
        for strength in strengths {
            lines.push(format!("  + {}", text_field(strength, "title")));
            lines.extend(paragraph(&text_field(strength, "description"), 4));
        }
    }

    let risks = rows_of(&evaluation["diagnostics"], "risks");
    if !risks.is_empty() {
        lines.push(String::new());
        lines.push("Risks:".to_string());
        for (index, risk) in risks.iter().enumerate() {
            lines.push(format!(
                "  {}. [{}] {}",
                index + 1,
                text_field(risk, "severity"),
                text_field(risk, "title")
            ));
            lines.extend(paragraph(&text_field(risk, "description"), 5));
            lines.extend(paragraph(&text_field(risk, "gap"), 5));
        }
    }

    lines.push(String::new());
    lines.push("Action plan:".to_string());
    for (key, label) in HORIZONS {
        lines.push(format!("  {label}:"));
        for (index, action) in rows_of(&evaluation["plan"], key).iter().enumerate() {
            lines.push(format!(
                "    {}. {} (priority {}, {}, {})",
                index + 1,
                text_field(action, "title"),
                action["priority_score"],
                text_field(action, "estimated_effort"),
                text_field(action, "difficulty")
            ));
            lines.extend(paragraph(&text_field(action, "description"), 7));
        }
    }

    let warnings = rows_of(evaluation, "warnings");
    if !warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings:".to_string());
        for warning in warnings {
            lines.extend(paragraph(
                &format!("! {}", text_field(warning, "message")),
                2,
            ));
        }
    }

    lines
}

fn sector_text(sector: &Value) -> String {
    let label = text_field(sector, "label");
    if sector["known"].as_bool().unwrap_or(true) {
        label
    } else {
        format!("{label} (unknown sector, default benchmarks)")
    }
}

fn indicator_lines(indicators: &Value) -> Vec<String> {
    let runway = format!("{} days", indicators["cash_runway_days"]);
    let cycle = indicators["financial_cycle_days"]
        .as_i64()
        .map(|days| format!("{days} days"))
        .unwrap_or_else(|| "n/a".to_string());
    let trend = format!(
        "{} per month ({})",
        percent_field(indicators, "revenue_trend_pct", 1),
        text_field(indicators, "trend_status")
    );
    let valuation = match indicators.get("valuation") {
        Some(range) if range.is_object() => format!(
            "{} to {}",
            currency_field(range, "min"),
            currency_field(range, "max")
        ),
        _ => "n/a".to_string(),
    };
    let payback = match indicators.get("payback") {
        Some(payback) if payback.is_object() => text_field(payback, "sentence"),
        _ => "n/a".to_string(),
    };

    key_value_rows(
        &[
            ("Revenue", currency_field(indicators, "revenue")),
            ("Gross margin", percent_field(indicators, "gross_margin_pct", 1)),
            ("Monthly result", currency_field(indicators, "monthly_result")),
            ("Cash runway", runway),
            ("Break-even revenue", currency_field(indicators, "break_even_revenue")),
            ("Financial cycle", cycle),
            ("Minimum capital", currency_field(indicators, "min_capital_required")),
            ("Revenue per person", currency_field(indicators, "revenue_per_employee")),
            ("Debt weight", percent_field(indicators, "debt_weight_pct", 1)),
            ("Revenue trend", trend),
            ("Valuation", valuation),
            ("Payback", payback),
        ],
        2,
    )
}

fn breakdown_lines(breakdown: &Value) -> Vec<String> {
    let mut lines = vec!["Points by dimension:".to_string()];
    let entries = rows_of(breakdown, "sub_scores")
        .iter()
        .map(|sub_score| {
            (
                sub_score
                    .get("dimension")
                    .and_then(Value::as_str)
                    .unwrap_or(""),
                format!("{}/{}", sub_score["points"], sub_score["max_points"]),
            )
        })
        .collect::<Vec<_>>();
    lines.extend(key_value_rows(&entries, 2));
    lines.push(format!("  Total before caps: {}", breakdown["raw_total"]));

    let caps = rows_of(breakdown, "caps_applied");
    if caps.is_empty() {
        lines.push("  No caps applied.".to_string());
    } else {
        lines.push("Caps applied:".to_string());
        for cap in caps {
            lines.push(format!(
                "  - {} (max {})",
                text_field(cap, "rule"),
                cap["limit"]
            ));
        }
    }
    lines
}
