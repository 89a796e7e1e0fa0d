use serde::{Deserialize, Serialize};

use crate::engine::indicators::{IndicatorSet, TrendStatus};
use crate::engine::money::{format_currency, format_percent};
use crate::engine::policy::{MAX_RISKS, MAX_STRENGTHS};
use crate::engine::problems::{ProblemKind, ProblemSet, Severity, describe_gap};
use crate::engine::sector::SectorBenchmark;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strength {
    pub key: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPoint {
    pub kind: ProblemKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub gap: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub strengths: Vec<Strength>,
    pub risks: Vec<RiskPoint>,
}

pub fn generate(
    indicators: &IndicatorSet,
    problems: &ProblemSet,
    benchmark: &SectorBenchmark,
) -> Diagnostics {
    Diagnostics {
        strengths: strengths(indicators, benchmark),
        risks: risks(problems),
    }
}

type StrengthCheck = fn(&IndicatorSet, &SectorBenchmark) -> Option<Strength>;

/// Checked in order; the first [`MAX_STRENGTHS`] hits are kept.
const STRENGTH_CHECKS: [StrengthCheck; 7] = [
    profitable_month,
    healthy_margin,
    cash_cushion,
    low_debt,
    growing_revenue,
    short_cycle,
    productive_team,
];

pub fn strengths(indicators: &IndicatorSet, benchmark: &SectorBenchmark) -> Vec<Strength> {
    STRENGTH_CHECKS
        .iter()
        .filter_map(|check| check(indicators, benchmark))
        .take(MAX_STRENGTHS)
        .collect()
}

pub fn risks(problems: &ProblemSet) -> Vec<RiskPoint> {
    problems
        .by_severity()
        .into_iter()
        .take(MAX_RISKS)
        .map(|problem| RiskPoint {
            kind: problem.kind,
            severity: problem.severity,
            title: problem.title.clone(),
            description: problem.description.clone(),
            gap: describe_gap(problem),
        })
        .collect()
}

fn strength(key: &str, title: &str, description: String) -> Option<Strength> {
    Some(Strength {
        key: key.to_string(),
        title: title.to_string(),
        description,
    })
}

fn profitable_month(indicators: &IndicatorSet, _benchmark: &SectorBenchmark) -> Option<Strength> {
    let share = indicators.result_margin_pct()?;
    if indicators.monthly_result <= 0.0 {
        return None;
    }
    let description = format!(
        "The month closed with {} of profit, {} of revenue.",
        format_currency(indicators.monthly_result),
        format_percent(share, 1)
    );
    if share >= 15.0 {
        strength("strong_profitability", "Very good profitability", description)
    } else if share >= 5.0 {
        strength("positive_result", "Positive result", description)
    } else {
        None
    }
}

fn healthy_margin(indicators: &IndicatorSet, benchmark: &SectorBenchmark) -> Option<Strength> {
    let margin = indicators.gross_margin_pct;
    if margin >= 40.0 {
        strength(
            "excellent_margin",
            "Excellent gross margin",
            format!(
                "Gross margin of {} leaves room to absorb cost increases.",
                format_percent(margin, 1)
            ),
        )
    } else if margin >= benchmark.margin_target_pct {
        strength(
            "margin_above_sector",
            "Gross margin at sector level",
            format!(
                "Gross margin of {} meets the {} reference of {}.",
                format_percent(margin, 1),
                benchmark.label(),
                format_percent(benchmark.margin_target_pct, 0)
            ),
        )
    } else {
        None
    }
}

fn cash_cushion(indicators: &IndicatorSet, _benchmark: &SectorBenchmark) -> Option<Strength> {
    let days = indicators.cash_runway_days;
    if days >= 120 {
        strength(
            "comfortable_cash",
            "Comfortable cash reserve",
            format!("Cash covers {days} days of fixed expenses."),
        )
    } else if days >= 60 {
        strength(
            "adequate_cash",
            "Adequate cash reserve",
            format!("Cash covers {days} days of fixed expenses, above two months."),
        )
    } else {
        None
    }
}

fn low_debt(indicators: &IndicatorSet, _benchmark: &SectorBenchmark) -> Option<Strength> {
    match indicators.debt_weight_pct {
        None => strength(
            "no_debt",
            "No debt",
            "The business carries no debt, so all profit stays available.".to_string(),
        ),
        Some(weight) if weight < 15.0 => strength(
            "controlled_debt",
            "Controlled debt",
            format!(
                "Debt equals {} of annual revenue.",
                format_percent(weight, 1)
            ),
        ),
        Some(_) => None,
    }
}

fn growing_revenue(indicators: &IndicatorSet, _benchmark: &SectorBenchmark) -> Option<Strength> {
    if indicators.trend_status != TrendStatus::Growing {
        return None;
    }
    strength(
        "growing_revenue",
        "Revenue growing",
        format!(
            "Revenue grew {} per month on average over the last four months.",
            format_percent(indicators.revenue_trend_pct, 1)
        ),
    )
}

fn short_cycle(indicators: &IndicatorSet, benchmark: &SectorBenchmark) -> Option<Strength> {
    let cycle = indicators.financial_cycle_days?;
    if cycle <= 0 {
        strength(
            "self_funded_cycle",
            "Customers fund operations",
            format!(
                "Sales are collected {} day(s) before suppliers are paid.",
                cycle.unsigned_abs()
            ),
        )
    } else if cycle <= benchmark.cycle_target_days {
        strength(
            "efficient_cycle",
            "Efficient financial cycle",
            format!(
                "Money is tied up for {cycle} days, within the {}-day reference.",
                benchmark.cycle_target_days
            ),
        )
    } else {
        None
    }
}

fn productive_team(indicators: &IndicatorSet, benchmark: &SectorBenchmark) -> Option<Strength> {
    if indicators.revenue_per_employee < benchmark.revenue_per_employee_target {
        return None;
    }
    strength(
        "productive_team",
        "Productive team",
        format!(
            "Revenue per person of {} meets the {} reference of {}.",
            format_currency(indicators.revenue_per_employee),
            benchmark.label(),
            format_currency(benchmark.revenue_per_employee_target)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::{generate, strengths};
    use crate::engine::indicators::compute;
    use crate::engine::problems::{ProblemKind, Severity, detect};
    use crate::engine::sector::resolve;
    use crate::engine::snapshot::fixtures::snapshot;

    #[test]
    fn strengths_are_capped_and_ordered() {
        let mut input = snapshot(100000.0, 40000.0, 20000.0, 200000.0);
        input.revenue_history = vec![70000.0, 80000.0, 90000.0];
        let benchmark = resolve(&input.sector);
        let indicators = compute(&input, benchmark);

        let keys = strengths(&indicators, benchmark)
            .into_iter()
            .map(|entry| entry.key)
            .collect::<Vec<_>>();
        assert_eq!(
            keys,
            vec![
                "strong_profitability",
                "excellent_margin",
                "comfortable_cash",
                "no_debt"
            ]
        );
    }

    #[test]
    fn struggling_business_has_few_strengths() {
        let mut input = snapshot(100000.0, 65000.0, 40000.0, 20000.0);
        input.has_debt = true;
        input.total_debt = Some(900000.0);
        let benchmark = resolve(&input.sector);
        let indicators = compute(&input, benchmark);
        let found = strengths(&indicators, benchmark);
        assert_eq!(
            found.into_iter().map(|entry| entry.key).collect::<Vec<_>>(),
            vec!["margin_above_sector", "productive_team"]
        );
    }

    #[test]
    fn risks_are_sorted_by_severity_and_capped_at_five() {
        let mut input = snapshot(100000.0, 95000.0, 40000.0, 1000.0);
        input.revenue_history = vec![200000.0, 150000.0, 120000.0];
        input.has_debt = true;
        input.total_debt = Some(700000.0);
        input.has_inventory = true;
        input.inventory = Some(200000.0);
        input.employee_count = 30;
        let benchmark = resolve(&input.sector);
        let indicators = compute(&input, benchmark);
        let problems = detect(&input, &indicators, benchmark);
        assert!(problems.len() > 5);

        let diagnostics = generate(&indicators, &problems, benchmark);
        assert_eq!(diagnostics.risks.len(), 5);
        assert_eq!(diagnostics.risks[0].kind, ProblemKind::NegativeResult);
        for pair in diagnostics.risks.windows(2) {
            assert!(pair[0].severity.rank() <= pair[1].severity.rank());
        }
        assert!(diagnostics.risks.iter().all(|risk| risk.severity == Severity::Critical));
        assert!(diagnostics.risks[0].gap.starts_with("Gap: "));
    }
}
