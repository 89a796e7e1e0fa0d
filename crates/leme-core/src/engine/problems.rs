use serde::{Deserialize, Serialize};

use crate::engine::indicators::{IndicatorSet, per_person_subject};
use crate::engine::money::{format_currency, format_number, format_percent};
use crate::engine::policy::{DETECTION_POLICY_V1, DetectionPolicy};
use crate::engine::sector::SectorBenchmark;
use crate::engine::snapshot::FinancialSnapshot;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    NegativeResult,
    CashRunway,
    GrossMargin,
    BreakEven,
    DebtWeight,
    FinancialCycle,
    Productivity,
    RevenueDecline,
    RevenueShock,
}

impl ProblemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NegativeResult => "negative_result",
            Self::CashRunway => "cash_runway",
            Self::GrossMargin => "gross_margin",
            Self::BreakEven => "break_even",
            Self::DebtWeight => "debt_weight",
            Self::FinancialCycle => "financial_cycle",
            Self::Productivity => "productivity",
            Self::RevenueDecline => "revenue_decline",
            Self::RevenueShock => "revenue_shock",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub kind: ProblemKind,
    pub severity: Severity,
    pub title: String,
    pub current_value: f64,
    pub target_value: f64,
    pub gap: f64,
    pub description: String,
}

/// Problems found in one evaluation, at most one per kind, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemSet {
    problems: Vec<Problem>,
}

impl ProblemSet {
    pub fn get(&self, kind: ProblemKind) -> Option<&Problem> {
        self.problems.iter().find(|problem| problem.kind == kind)
    }

    pub fn contains(&self, kind: ProblemKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn has_severity(&self, severity: Severity) -> bool {
        self.problems
            .iter()
            .any(|problem| problem.severity == severity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Stable ordering: critical, then high, then medium; rule order within a band.
    pub fn by_severity(&self) -> Vec<&Problem> {
        let mut ordered = self.problems.iter().collect::<Vec<_>>();
        ordered.sort_by_key(|problem| problem.severity.rank());
        ordered
    }

    fn insert(&mut self, problem: Problem) {
        if !self.contains(problem.kind) {
            self.problems.push(problem);
        }
    }
}

/// Inputs shared by every detection rule.
pub struct DetectionContext<'a> {
    pub snapshot: &'a FinancialSnapshot,
    pub indicators: &'a IndicatorSet,
    pub benchmark: &'a SectorBenchmark,
    pub policy: DetectionPolicy,
}

/// A rule's verdict before it is turned into a [`Problem`].
struct Finding {
    severity: Severity,
    title: &'static str,
    current_value: f64,
    target_value: f64,
    description: String,
}

struct DetectionRule {
    kind: ProblemKind,
    evaluate: fn(&DetectionContext<'_>) -> Option<Finding>,
}

const DETECTION_RULES: [DetectionRule; 9] = [
    DetectionRule {
        kind: ProblemKind::NegativeResult,
        evaluate: negative_result,
    },
    DetectionRule {
        kind: ProblemKind::CashRunway,
        evaluate: cash_runway,
    },
    DetectionRule {
        kind: ProblemKind::GrossMargin,
        evaluate: gross_margin,
    },
    DetectionRule {
        kind: ProblemKind::BreakEven,
        evaluate: break_even,
    },
    DetectionRule {
        kind: ProblemKind::DebtWeight,
        evaluate: debt_weight,
    },
    DetectionRule {
        kind: ProblemKind::FinancialCycle,
        evaluate: financial_cycle,
    },
    DetectionRule {
        kind: ProblemKind::Productivity,
        evaluate: productivity,
    },
    DetectionRule {
        kind: ProblemKind::RevenueDecline,
        evaluate: revenue_decline,
    },
    DetectionRule {
        kind: ProblemKind::RevenueShock,
        evaluate: revenue_shock,
    },
];

pub fn detect(
    snapshot: &FinancialSnapshot,
    indicators: &IndicatorSet,
    benchmark: &SectorBenchmark,
) -> ProblemSet {
    let context = DetectionContext {
        snapshot,
        indicators,
        benchmark,
        policy: DETECTION_POLICY_V1,
    };

    let mut problems = ProblemSet::default();
    for rule in &DETECTION_RULES {
        if let Some(finding) = (rule.evaluate)(&context) {
            problems.insert(Problem {
                kind: rule.kind,
                severity: finding.severity,
                title: finding.title.to_string(),
                current_value: finding.current_value,
                target_value: finding.target_value,
                gap: (finding.target_value - finding.current_value).abs(),
                description: finding.description,
            });
        }
    }
    problems
}

fn negative_result(context: &DetectionContext<'_>) -> Option<Finding> {
    let result = context.indicators.monthly_result;
    if result >= 0.0 {
        return None;
    }
    let target = context.snapshot.fixed_expenses * context.policy.loss_target_share_of_fixed;
    Some(Finding {
        severity: Severity::Critical,
        title: "Monthly loss",
        current_value: result,
        target_value: target,
        description: format!(
            "The business lost {} this month: revenue of {} does not cover cost of sales ({}) plus fixed expenses ({}).",
            format_currency(result.abs()),
            format_currency(context.snapshot.revenue_current),
            format_currency(context.snapshot.cost_of_sales),
            format_currency(context.snapshot.fixed_expenses)
        ),
    })
}

fn cash_runway(context: &DetectionContext<'_>) -> Option<Finding> {
    let days = context.indicators.cash_runway_days;
    let target = context.benchmark.cash_runway_target_days;
    let (severity, title) = if days < context.policy.runway_critical_days {
        (Severity::Critical, "Cash runs out within two weeks")
    } else if days < context.policy.runway_high_days {
        (Severity::High, "Cash covers less than a month")
    } else if days < target {
        (Severity::Medium, "Cash reserve below sector target")
    } else {
        return None;
    };

    Some(Finding {
        severity,
        title,
        current_value: days as f64,
        target_value: target as f64,
        description: format!(
            "Cash on hand ({}) covers {days} day(s) of fixed expenses; the {} target is {target} days.",
            format_currency(context.snapshot.cash),
            context.benchmark.label()
        ),
    })
}

fn gross_margin(context: &DetectionContext<'_>) -> Option<Finding> {
    let margin = context.indicators.gross_margin_pct;
    let target = context.benchmark.margin_target_pct;
    let (severity, title) = if margin <= 0.0 {
        (Severity::Critical, "Negative gross margin")
    } else if margin < target * context.policy.margin_critical_ratio {
        (Severity::Critical, "Gross margin far below sector")
    } else if margin < target * context.policy.margin_high_ratio {
        (Severity::High, "Gross margin below sector")
    } else if margin < target {
        (Severity::Medium, "Gross margin slightly below sector")
    } else {
        return None;
    };

    let lost_per_month = context.snapshot.revenue_current * (target - margin) / 100.0;
    Some(Finding {
        severity,
        title,
        current_value: margin,
        target_value: target,
        description: format!(
            "Gross margin is {} against a {} reference of {}; closing the gap is worth about {} per month.",
            format_percent(margin, 1),
            context.benchmark.label(),
            format_percent(target, 0),
            format_currency(lost_per_month.max(0.0))
        ),
    })
}

fn break_even(context: &DetectionContext<'_>) -> Option<Finding> {
    let ratio = context.indicators.break_even_ratio_pct()?;
    let break_even = context.indicators.break_even_revenue?;
    let (severity, title) = if ratio >= context.policy.break_even_critical_pct {
        (Severity::Critical, "Break-even above current revenue")
    } else if ratio > context.policy.break_even_high_pct {
        (Severity::High, "Break-even close to current revenue")
    } else {
        return None;
    };

    Some(Finding {
        severity,
        title,
        current_value: ratio,
        target_value: context.policy.break_even_high_pct,
        description: format!(
            "The business needs {} in monthly revenue to break even, {} of current revenue ({}).",
            format_currency(break_even),
            format_percent(ratio, 0),
            format_currency(context.snapshot.revenue_current)
        ),
    })
}

fn debt_weight(context: &DetectionContext<'_>) -> Option<Finding> {
    let weight = context.indicators.debt_weight_pct?;
    let (severity, title) = if weight > context.policy.debt_critical_pct {
        (Severity::Critical, "Debt exceeds a year of revenue")
    } else if weight > context.policy.debt_high_pct {
        (Severity::High, "Heavy debt load")
    } else if weight > context.policy.debt_medium_pct {
        (Severity::Medium, "Debt load needs attention")
    } else {
        return None;
    };

    Some(Finding {
        severity,
        title,
        current_value: weight,
        target_value: context.policy.debt_medium_pct,
        description: format!(
            "Total debt of {} equals {} of annual revenue.",
            format_currency(context.snapshot.tracked_debt().unwrap_or(0.0)),
            format_percent(weight, 0)
        ),
    })
}

fn financial_cycle(context: &DetectionContext<'_>) -> Option<Finding> {
    let cycle = context.indicators.financial_cycle_days?;
    let target = context.benchmark.cycle_target_days;
    let (severity, title) = if cycle > target + context.policy.cycle_high_slack_days {
        (Severity::High, "Long financial cycle")
    } else if cycle > target {
        (Severity::Medium, "Financial cycle above sector")
    } else {
        return None;
    };

    Some(Finding {
        severity,
        title,
        current_value: cycle as f64,
        target_value: target as f64,
        description: format!(
            "Money stays tied up for {cycle} days between paying suppliers and collecting from customers; the reference is {target} days."
        ),
    })
}

fn productivity(context: &DetectionContext<'_>) -> Option<Finding> {
    let per_employee = context.indicators.revenue_per_employee;
    let target = context.benchmark.revenue_per_employee_target;
    let (severity, title) = if per_employee < target * context.policy.productivity_high_ratio {
        (Severity::High, "Low revenue per employee")
    } else if per_employee < target {
        (Severity::Medium, "Revenue per employee below sector")
    } else {
        return None;
    };

    Some(Finding {
        severity,
        title,
        current_value: per_employee,
        target_value: target,
        description: format!(
            "{} {} per month; the {} reference is {}.",
            per_person_subject(context.snapshot.employee_count),
            format_currency(per_employee),
            context.benchmark.label(),
            format_currency(target)
        ),
    })
}

fn revenue_decline(context: &DetectionContext<'_>) -> Option<Finding> {
    let trend = context.indicators.revenue_trend_pct;
    let (severity, title) = if trend < context.policy.decline_critical_pct {
        (Severity::Critical, "Sharp revenue decline")
    } else if trend < context.policy.decline_high_pct {
        (Severity::High, "Revenue declining")
    } else {
        return None;
    };

    Some(Finding {
        severity,
        title,
        current_value: trend,
        target_value: 0.0,
        description: format!(
            "Revenue changed {} per month on average over the last four months.",
            format_percent(trend, 1)
        ),
    })
}

fn revenue_shock(context: &DetectionContext<'_>) -> Option<Finding> {
    let result = context.indicators.monthly_result;
    if result <= 0.0 {
        return None;
    }
    let drop = context.policy.shock_revenue_drop;
    let revenue_after = context.snapshot.revenue_current * (1.0 - drop);
    let result_after = revenue_after * context.indicators.gross_margin_pct / 100.0
        - context.snapshot.fixed_expenses;
    if result_after >= 0.0 {
        return None;
    }

    Some(Finding {
        severity: Severity::Medium,
        title: "Exposed to a revenue drop",
        current_value: result_after,
        target_value: 0.0,
        description: format!(
            "A {} drop in revenue would turn this month's profit of {} into a loss of {}.",
            format_percent(drop * 100.0, 0),
            format_currency(result),
            format_currency(result_after.abs())
        ),
    })
}

pub(crate) fn describe_gap(problem: &Problem) -> String {
    match problem.kind {
        ProblemKind::NegativeResult => format!(
            "Gap: {} to reach a profit of {}.",
            format_currency(problem.target_value - problem.current_value),
            format_currency(problem.target_value)
        ),
        ProblemKind::CashRunway | ProblemKind::FinancialCycle => format!(
            "Gap: {} day(s) to the reference of {}.",
            format_number(problem.gap, 0),
            format_number(problem.target_value, 0)
        ),
        ProblemKind::GrossMargin
        | ProblemKind::BreakEven
        | ProblemKind::DebtWeight
        | ProblemKind::RevenueDecline => format!(
            "Gap: {} percentage point(s) to the reference of {}.",
            format_number(problem.gap, 1),
            format_percent(problem.target_value, 0)
        ),
        ProblemKind::Productivity => format!(
            "Gap: {} per person per month.",
            format_currency(problem.gap)
        ),
        ProblemKind::RevenueShock => format!(
            "Gap: {} of monthly margin needed to absorb the drop.",
            format_currency(problem.gap)
        ),
    }
}
