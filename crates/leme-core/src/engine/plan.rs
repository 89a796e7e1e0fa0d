use serde::{Deserialize, Serialize};

use crate::engine::indicators::{IndicatorSet, daily_expense, per_person_subject};
use crate::engine::money::{format_currency, format_number, format_percent};
use crate::engine::policy::PLAN_ITEMS_PER_HORIZON;
use crate::engine::problems::{ProblemKind, ProblemSet, Severity};
use crate::engine::sector::SectorBenchmark;
use crate::engine::snapshot::FinancialSnapshot;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "30_days")]
    Days30,
    #[serde(rename = "60_days")]
    Days60,
    #[serde(rename = "90_days")]
    Days90,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::Days30, Horizon::Days60, Horizon::Days90];

    pub fn days(self) -> u32 {
        match self {
            Self::Days30 => 30,
            Self::Days60 => 60,
            Self::Days90 => 90,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: String,
    pub title: String,
    pub priority_score: u8,
    pub description: String,
    pub expected_outcome: String,
    pub estimated_effort: String,
    pub difficulty: Difficulty,
    pub self_serviceable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub horizon_30: Vec<ActionItem>,
    pub horizon_60: Vec<ActionItem>,
    pub horizon_90: Vec<ActionItem>,
}

impl Plan {
    pub fn horizon(&self, horizon: Horizon) -> &[ActionItem] {
        match horizon {
            Horizon::Days30 => &self.horizon_30,
            Horizon::Days60 => &self.horizon_60,
            Horizon::Days90 => &self.horizon_90,
        }
    }
}

/// Everything a template may read while deciding and rendering.
pub struct PlanContext<'a> {
    pub snapshot: &'a FinancialSnapshot,
    pub indicators: &'a IndicatorSet,
    pub problems: &'a ProblemSet,
    pub benchmark: &'a SectorBenchmark,
}

impl PlanContext<'_> {
    fn margin(&self) -> f64 {
        self.indicators.gross_margin_pct
    }

    fn margin_target(&self) -> f64 {
        self.benchmark.margin_target_pct
    }

    fn result(&self) -> f64 {
        self.indicators.monthly_result
    }

    fn runway(&self) -> i64 {
        self.indicators.cash_runway_days
    }

    fn daily_expense(&self) -> f64 {
        daily_expense(self.snapshot.fixed_expenses)
    }

    fn debt_weight(&self) -> Option<f64> {
        self.indicators.debt_weight_pct
    }

    fn score(&self) -> u8 {
        self.indicators.health_score
    }

    /// Extra monthly gross profit from lifting margin to `target_pct`.
    fn margin_gain_to(&self, target_pct: f64) -> f64 {
        (self.snapshot.revenue_current * (target_pct - self.margin()) / 100.0).max(0.0)
    }
}

struct ActionText {
    title: String,
    description: String,
    expected_outcome: String,
}

struct ActionTemplate {
    id: &'static str,
    horizon: Horizon,
    priority: u8,
    effort: &'static str,
    difficulty: Difficulty,
    self_serviceable: bool,
    /// `None` marks a fallback that always applies.
    applies: Option<fn(&PlanContext<'_>) -> bool>,
    render: fn(&PlanContext<'_>) -> ActionText,
}

impl ActionTemplate {
    fn instantiate(&self, context: &PlanContext<'_>) -> ActionItem {
        let text = (self.render)(context);
        ActionItem {
            id: self.id.to_string(),
            title: text.title,
            priority_score: self.priority,
            description: text.description,
            expected_outcome: text.expected_outcome,
            estimated_effort: self.effort.to_string(),
            difficulty: self.difficulty,
            self_serviceable: self.self_serviceable,
        }
    }
}

/// Recommendation catalog. Declaration order breaks priority ties; every
/// horizon keeps at least four templates that always apply.
static CATALOG: [ActionTemplate; 37] = [
    // 30 days
    ActionTemplate {
        id: "eliminate_monthly_loss",
        horizon: Horizon::Days30,
        priority: 100,
        effort: "1-2h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: Some(|context| context.result() < 0.0),
        render: eliminate_monthly_loss,
    },
    ActionTemplate {
        id: "raise_cash_runway",
        horizon: Horizon::Days30,
        priority: 95,
        effort: "2-3h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: Some(|context| context.runway() < 30),
        render: raise_cash_runway,
    },
    ActionTemplate {
        id: "settle_working_capital_deficit",
        horizon: Horizon::Days30,
        priority: 90,
        effort: "2-4h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: Some(|context| context.indicators.min_capital_required < 0.0),
        render: settle_working_capital_deficit,
    },
    ActionTemplate {
        id: "urgent_pricing_review",
        horizon: Horizon::Days30,
        priority: 88,
        effort: "3-5h",
        difficulty: Difficulty::Advanced,
        self_serviceable: false,
        applies: Some(|context| context.margin() < context.margin_target() * 0.5),
        render: urgent_pricing_review,
    },
    ActionTemplate {
        id: "renegotiate_debts",
        horizon: Horizon::Days30,
        priority: 85,
        effort: "2-4h",
        difficulty: Difficulty::Medium,
        self_serviceable: false,
        applies: Some(|context| context.debt_weight().is_some_and(|weight| weight > 50.0)),
        render: renegotiate_debts,
    },
    ActionTemplate {
        id: "improve_gross_margin",
        horizon: Horizon::Days30,
        priority: 70,
        effort: "2-3h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: Some(|context| {
            context.margin() >= context.margin_target() * 0.5
                && context.margin() < context.margin_target()
        }),
        render: improve_gross_margin,
    },
    ActionTemplate {
        id: "fund_working_capital",
        horizon: Horizon::Days30,
        priority: 65,
        effort: "1-2h",
        difficulty: Difficulty::Easy,
        self_serviceable: true,
        applies: Some(|context| {
            context.indicators.min_capital_required > 0.0
                && context.snapshot.cash < context.indicators.min_capital_required
        }),
        render: fund_working_capital,
    },
    ActionTemplate {
        id: "investigate_revenue_drop",
        horizon: Horizon::Days30,
        priority: 60,
        effort: "2-3h",
        difficulty: Difficulty::Easy,
        self_serviceable: true,
        applies: Some(|context| context.indicators.revenue_trend_pct < -5.0),
        render: investigate_revenue_drop,
    },
    ActionTemplate {
        id: "cut_fixed_expenses",
        horizon: Horizon::Days30,
        priority: 20,
        effort: "1-2h",
        difficulty: Difficulty::Easy,
        self_serviceable: true,
        applies: Some(|context| {
            context.snapshot.fixed_expenses > 0.0 && context.snapshot.revenue_current > 0.0
        }),
        render: cut_fixed_expenses,
    },
    ActionTemplate {
        id: "accelerate_collections",
        horizon: Horizon::Days30,
        priority: 15,
        effort: "1h",
        difficulty: Difficulty::Easy,
        self_serviceable: true,
        applies: Some(|context| context.snapshot.receivables > 0.0),
        render: accelerate_collections,
    },
    ActionTemplate {
        id: "weekly_cash_review",
        horizon: Horizon::Days30,
        priority: 10,
        effort: "30min/week",
        difficulty: Difficulty::Easy,
        self_serviceable: true,
        applies: None,
        render: weekly_cash_review,
    },
    ActionTemplate {
        id: "map_unit_costs",
        horizon: Horizon::Days30,
        priority: 8,
        effort: "2-3h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: None,
        render: map_unit_costs,
    },
    ActionTemplate {
        id: "renegotiate_suppliers",
        horizon: Horizon::Days30,
        priority: 6,
        effort: "1-2h",
        difficulty: Difficulty::Easy,
        self_serviceable: true,
        applies: None,
        render: renegotiate_suppliers,
    },
    ActionTemplate {
        id: "expense_approval_rule",
        horizon: Horizon::Days30,
        priority: 5,
        effort: "30min",
        difficulty: Difficulty::Easy,
        self_serviceable: true,
        applies: None,
        render: expense_approval_rule,
    },
    // 60 days
    ActionTemplate {
        id: "test_price_increase",
        horizon: Horizon::Days60,
        priority: 70,
        effort: "2-3h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: Some(|context| context.margin() < context.margin_target()),
        render: test_price_increase,
    },
    ActionTemplate {
        id: "extend_runway_to_90_days",
        horizon: Horizon::Days60,
        priority: 65,
        effort: "1-2h",
        difficulty: Difficulty::Easy,
        self_serviceable: true,
        applies: Some(|context| (30..60).contains(&context.runway())),
        render: extend_runway_to_90_days,
    },
    ActionTemplate {
        id: "sales_recovery_plan",
        horizon: Horizon::Days60,
        priority: 62,
        effort: "3-4h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: Some(|context| context.indicators.revenue_trend_pct < -5.0),
        render: sales_recovery_plan,
    },
    ActionTemplate {
        id: "shorten_financial_cycle",
        horizon: Horizon::Days60,
        priority: 60,
        effort: "2-3h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: Some(|context| context.problems.contains(ProblemKind::FinancialCycle)),
        render: shorten_financial_cycle,
    },
    ActionTemplate {
        id: "reduce_debt_load",
        horizon: Horizon::Days60,
        priority: 55,
        effort: "1-2h",
        difficulty: Difficulty::Medium,
        self_serviceable: false,
        applies: Some(|context| {
            context
                .debt_weight()
                .is_some_and(|weight| (30.0..=50.0).contains(&weight))
        }),
        render: reduce_debt_load,
    },
    ActionTemplate {
        id: "lift_net_margin",
        horizon: Horizon::Days60,
        priority: 50,
        effort: "2-3h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: Some(|context| {
            context.result() > 0.0
                && context
                    .indicators
                    .result_margin_pct()
                    .is_some_and(|share| share < 10.0)
        }),
        render: lift_net_margin,
    },
    ActionTemplate {
        id: "raise_team_productivity",
        horizon: Horizon::Days60,
        priority: 55,
        effort: "2-4h",
        difficulty: Difficulty::Advanced,
        self_serviceable: false,
        applies: Some(|context| {
            context.indicators.revenue_per_employee
                < context.benchmark.revenue_per_employee_target
        }),
        render: raise_team_productivity,
    },
    ActionTemplate {
        id: "build_emergency_reserve",
        horizon: Horizon::Days60,
        priority: 15,
        effort: "1h",
        difficulty: Difficulty::Easy,
        self_serviceable: true,
        applies: None,
        render: build_emergency_reserve,
    },
    ActionTemplate {
        id: "automate_collections",
        horizon: Horizon::Days60,
        priority: 10,
        effort: "2-3h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: Some(|context| context.snapshot.receivables > 0.0),
        render: automate_collections,
    },
    ActionTemplate {
        id: "profitability_by_channel",
        horizon: Horizon::Days60,
        priority: 8,
        effort: "3-4h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: None,
        render: profitability_by_channel,
    },
    ActionTemplate {
        id: "indicator_routine",
        horizon: Horizon::Days60,
        priority: 6,
        effort: "1h/month",
        difficulty: Difficulty::Easy,
        self_serviceable: true,
        applies: None,
        render: indicator_routine,
    },
    ActionTemplate {
        id: "document_key_processes",
        horizon: Horizon::Days60,
        priority: 5,
        effort: "3-5h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: None,
        render: document_key_processes,
    },
    // 90 days
    ActionTemplate {
        id: "leave_critical_zone",
        horizon: Horizon::Days90,
        priority: 80,
        effort: "ongoing",
        difficulty: Difficulty::Advanced,
        self_serviceable: false,
        applies: Some(|context| context.score() < 50),
        render: leave_critical_zone,
    },
    ActionTemplate {
        id: "raise_score_above_70",
        horizon: Horizon::Days90,
        priority: 70,
        effort: "ongoing",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: Some(|context| (50..70).contains(&context.score())),
        render: raise_score_above_70,
    },
    ActionTemplate {
        id: "invest_in_growth",
        horizon: Horizon::Days90,
        priority: 70,
        effort: "4-6h",
        difficulty: Difficulty::Advanced,
        self_serviceable: false,
        applies: Some(|context| context.score() >= 70),
        render: invest_in_growth,
    },
    ActionTemplate {
        id: "diversify_revenue",
        horizon: Horizon::Days90,
        priority: 65,
        effort: "4-6h",
        difficulty: Difficulty::Advanced,
        self_serviceable: false,
        applies: Some(|context| context.indicators.revenue_trend_pct < -5.0),
        render: diversify_revenue,
    },
    ActionTemplate {
        id: "reinvest_profit",
        horizon: Horizon::Days90,
        priority: 50,
        effort: "2-3h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: Some(|context| context.margin() >= context.margin_target() && context.result() > 0.0),
        render: reinvest_profit,
    },
    ActionTemplate {
        id: "three_month_reserve",
        horizon: Horizon::Days90,
        priority: 45,
        effort: "1h",
        difficulty: Difficulty::Easy,
        self_serviceable: true,
        applies: Some(|context| context.result() > 0.0 && context.runway() < 90),
        render: three_month_reserve,
    },
    ActionTemplate {
        id: "contingency_plan",
        horizon: Horizon::Days90,
        priority: 85,
        effort: "2-3h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: Some(|context| context.problems.has_severity(Severity::Critical)),
        render: contingency_plan,
    },
    ActionTemplate {
        id: "monthly_indicator_review",
        horizon: Horizon::Days90,
        priority: 15,
        effort: "1h/month",
        difficulty: Difficulty::Easy,
        self_serviceable: true,
        applies: None,
        render: monthly_indicator_review,
    },
    ActionTemplate {
        id: "quarterly_pricing_review",
        horizon: Horizon::Days90,
        priority: 10,
        effort: "2-3h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: None,
        render: quarterly_pricing_review,
    },
    ActionTemplate {
        id: "team_financial_training",
        horizon: Horizon::Days90,
        priority: 7,
        effort: "2-4h",
        difficulty: Difficulty::Medium,
        self_serviceable: true,
        applies: None,
        render: team_financial_training,
    },
    ActionTemplate {
        id: "quarterly_targets",
        horizon: Horizon::Days90,
        priority: 5,
        effort: "1-2h",
        difficulty: Difficulty::Easy,
        self_serviceable: true,
        applies: None,
        render: quarterly_targets,
    },
];

pub fn build(context: &PlanContext<'_>) -> Plan {
    Plan {
        horizon_30: select(Horizon::Days30, context),
        horizon_60: select(Horizon::Days60, context),
        horizon_90: select(Horizon::Days90, context),
    }
}

fn select(horizon: Horizon, context: &PlanContext<'_>) -> Vec<ActionItem> {
    let mut candidates = CATALOG
        .iter()
        .filter(|template| {
            template.horizon == horizon && template.applies.is_none_or(|applies| applies(context))
        })
        .collect::<Vec<_>>();
    // sort_by is stable, so catalog order breaks ties
    candidates.sort_by(|left, right| right.priority.cmp(&left.priority));
    candidates
        .into_iter()
        .take(PLAN_ITEMS_PER_HORIZON)
        .map(|template| template.instantiate(context))
        .collect()
}

fn text(title: String, description: String, expected_outcome: String) -> ActionText {
    ActionText {
        title,
        description,
        expected_outcome,
    }
}

fn eliminate_monthly_loss(context: &PlanContext<'_>) -> ActionText {
    let loss = context.result().abs();
    let description = if context.margin() > 0.0 {
        let fixed_cut = loss * 0.6;
        let revenue_needed = loss * 0.4 / (context.margin() / 100.0);
        format!(
            "The business is losing {} per month. Cut {} from fixed expenses and add {} of monthly revenue at the current {} gross margin to close the gap.",
            format_currency(loss),
            format_currency(fixed_cut),
            format_currency(revenue_needed),
            format_percent(context.margin(), 1)
        )
    } else {
        format!(
            "The business is losing {} per month and every sale costs more than it brings in: cost of sales ({}) is not below revenue ({}). Reprice before selling more.",
            format_currency(loss),
            format_currency(context.snapshot.cost_of_sales),
            format_currency(context.snapshot.revenue_current)
        )
    };
    text(
        "Eliminate the monthly loss".to_string(),
        description,
        "Monthly result at zero or better within 30 days.".to_string(),
    )
}

fn raise_cash_runway(context: &PlanContext<'_>) -> ActionText {
    let daily = context.daily_expense();
    let missing = (60 - context.runway()).max(0) as f64 * daily;
    text(
        format!("Raise cash runway from {} to 60 days", context.runway()),
        format!(
            "Cash covers only {} day(s) of fixed expenses. Build {} of extra cash: ask suppliers for 15 more days (frees about {}), collect overdue receivables and freeze non-essential spending.",
            context.runway(),
            format_currency(missing),
            format_currency(daily * 15.0)
        ),
        format!("{} in cash, enough for 60 days.", format_currency(daily * 60.0)),
    )
}

fn settle_working_capital_deficit(context: &PlanContext<'_>) -> ActionText {
    let deficit = context.indicators.min_capital_required.abs();
    text(
        "Settle the working capital deficit".to_string(),
        format!(
            "Supplier bills ({}) exceed receivables plus inventory by {}. Schedule payments by due date and match purchase terms to customer terms.",
            format_currency(context.snapshot.payables),
            format_currency(deficit)
        ),
        "Payables covered by receivables and inventory.".to_string(),
    )
}

fn urgent_pricing_review(context: &PlanContext<'_>) -> ActionText {
    let goal = context.margin_target() * 0.6;
    text(
        "Review prices urgently".to_string(),
        format!(
            "Gross margin is {}, less than half of the {} reference of {}. Recalculate unit costs, raise prices on best sellers and renegotiate the largest supplier contracts.",
            format_percent(context.margin(), 1),
            context.benchmark.label(),
            format_percent(context.margin_target(), 0)
        ),
        format!(
            "Gross margin of at least {}, worth {} more per month.",
            format_percent(goal, 0),
            format_currency(context.margin_gain_to(goal))
        ),
    )
}

fn renegotiate_debts(context: &PlanContext<'_>) -> ActionText {
    text(
        "Renegotiate debts".to_string(),
        format!(
            "Debt of {} equals {} of annual revenue. Consolidate the most expensive contracts, extend terms and swap high-interest lines for cheaper credit.",
            format_currency(context.snapshot.tracked_debt().unwrap_or(0.0)),
            format_percent(context.debt_weight().unwrap_or(0.0), 0)
        ),
        "Lower monthly installments and a plan to bring debt under 50% of annual revenue."
            .to_string(),
    )
}

fn improve_gross_margin(context: &PlanContext<'_>) -> ActionText {
    let target = context.margin_target();
    text(
        format!("Bring gross margin to {}", format_percent(target, 0)),
        format!(
            "Gross margin is {} against a {} reference of {}. Drop or reprice low-margin items and negotiate volume discounts.",
            format_percent(context.margin(), 1),
            context.benchmark.label(),
            format_percent(target, 0)
        ),
        format!(
            "{} more gross profit per month at sector margin.",
            format_currency(context.margin_gain_to(target))
        ),
    )
}

fn fund_working_capital(context: &PlanContext<'_>) -> ActionText {
    let need = context.indicators.min_capital_required;
    text(
        "Reinforce cash for working capital".to_string(),
        format!(
            "Receivables and inventory tie up {}, while cash is {}. Shorten customer payment terms and buy closer to actual sales.",
            format_currency(need),
            format_currency(context.snapshot.cash)
        ),
        format!(
            "Cash covering the {} working capital need.",
            format_currency(need)
        ),
    )
}

fn investigate_revenue_drop(context: &PlanContext<'_>) -> ActionText {
    text(
        "Find out why revenue is falling".to_string(),
        format!(
            "Revenue changed {} per month on average. List the customers and products that sold less, and call the five largest customers of the last quarter.",
            format_percent(context.indicators.revenue_trend_pct, 1)
        ),
        "Causes of the decline identified with a recovery target.".to_string(),
    )
}

fn cut_fixed_expenses(context: &PlanContext<'_>) -> ActionText {
    let saving = context.snapshot.fixed_expenses * 0.1;
    text(
        "Cut 10% of fixed expenses".to_string(),
        format!(
            "Review each fixed expense ({} per month) and cancel or renegotiate the ones that do not bring revenue.",
            format_currency(context.snapshot.fixed_expenses)
        ),
        format!("{} saved every month.", format_currency(saving)),
    )
}

fn accelerate_collections(context: &PlanContext<'_>) -> ActionText {
    let target = context.snapshot.receivables * 0.8;
    text(
        "Collect outstanding receivables".to_string(),
        format!(
            "Customers owe {}. Contact overdue accounts this week and offer a small discount for early payment.",
            format_currency(context.snapshot.receivables)
        ),
        format!("{} back in cash within 30 days.", format_currency(target)),
    )
}

fn weekly_cash_review(context: &PlanContext<'_>) -> ActionText {
    text(
        "Set up a weekly cash review".to_string(),
        format!(
            "Every week, record cash in, cash out and the balance (today {}). Compare with the week before.",
            format_currency(context.snapshot.cash)
        ),
        "Cash surprises spotted at least a week ahead.".to_string(),
    )
}

fn map_unit_costs(context: &PlanContext<'_>) -> ActionText {
    text(
        "Map the cost of each product or service".to_string(),
        format!(
            "Break down the {} of cost of sales by product or service to find which ones actually make money.",
            format_currency(context.snapshot.cost_of_sales)
        ),
        "A list of items ranked by contribution margin.".to_string(),
    )
}

fn renegotiate_suppliers(context: &PlanContext<'_>) -> ActionText {
    let saving = context.snapshot.cost_of_sales * 0.05;
    text(
        "Renegotiate with main suppliers".to_string(),
        "Ask the three largest suppliers for better prices or longer payment terms, backed by quotes from competitors."
            .to_string(),
        format!(
            "A 5% discount on purchases saves {} per month.",
            format_currency(saving)
        ),
    )
}

fn expense_approval_rule(context: &PlanContext<'_>) -> ActionText {
    let threshold = (context.snapshot.fixed_expenses * 0.05).max(500.0);
    text(
        "Require approval for larger expenses".to_string(),
        format!(
            "Any purchase above {} needs the owner's approval and a written reason.",
            format_currency(threshold)
        ),
        "No unplanned expense above the limit.".to_string(),
    )
}

fn test_price_increase(context: &PlanContext<'_>) -> ActionText {
    let gain = context.snapshot.revenue_current * 0.05;
    text(
        "Test a 5% price increase".to_string(),
        format!(
            "Raise prices 5% on a group of products for 30 days and watch volume. Gross margin is {}, below the {} reference.",
            format_percent(context.margin(), 1),
            format_percent(context.margin_target(), 0)
        ),
        format!(
            "Up to {} more per month if volume holds.",
            format_currency(gain)
        ),
    )
}

fn extend_runway_to_90_days(context: &PlanContext<'_>) -> ActionText {
    let daily = context.daily_expense();
    let missing = (90 - context.runway()).max(0) as f64 * daily;
    text(
        "Extend cash runway to 90 days".to_string(),
        format!(
            "Cash covers {} days. Set aside part of each month's revenue until {} more is saved.",
            context.runway(),
            format_currency(missing)
        ),
        format!("{} in cash, enough for 90 days.", format_currency(daily * 90.0)),
    )
}

fn sales_recovery_plan(context: &PlanContext<'_>) -> ActionText {
    let lost = context
        .snapshot
        .revenue_history
        .first()
        .map(|first| (first - context.snapshot.revenue_current).max(0.0))
        .unwrap_or(0.0);
    text(
        "Run a sales recovery plan".to_string(),
        format!(
            "Monthly revenue is {} below three months ago. Reactivate lapsed customers, run a focused promotion and review sales channels.",
            format_currency(lost)
        ),
        "Revenue back to the level of three months ago.".to_string(),
    )
}

fn shorten_financial_cycle(context: &PlanContext<'_>) -> ActionText {
    let cycle = context.indicators.financial_cycle_days.unwrap_or(0);
    text(
        "Shorten the financial cycle".to_string(),
        format!(
            "Money is tied up for {cycle} days against a reference of {}. Reduce slow-moving inventory, shorten customer terms and extend supplier terms.",
            context.benchmark.cycle_target_days
        ),
        format!(
            "Financial cycle at or below {} days.",
            context.benchmark.cycle_target_days
        ),
    )
}

fn reduce_debt_load(context: &PlanContext<'_>) -> ActionText {
    let debt = context.snapshot.tracked_debt().unwrap_or(0.0);
    let description = if context.result() > 0.0 {
        format!(
            "Direct 30% of monthly profit ({}) to paying down the most expensive debt first.",
            format_currency(context.result() * 0.3)
        )
    } else {
        "Renegotiate rates on the most expensive debt before taking any new credit.".to_string()
    };
    text(
        "Reduce the debt load".to_string(),
        description,
        format!(
            "Debt down to {} over the next months.",
            format_currency(debt * 0.7)
        ),
    )
}

fn lift_net_margin(context: &PlanContext<'_>) -> ActionText {
    let target = context.snapshot.revenue_current * 0.1;
    text(
        "Raise the monthly result to 10% of revenue".to_string(),
        format!(
            "The month closed with {} of profit. Combine small price adjustments and expense cuts to add {}.",
            format_currency(context.result()),
            format_currency((target - context.result()).max(0.0))
        ),
        format!("Monthly profit of {}.", format_currency(target)),
    )
}

fn raise_team_productivity(context: &PlanContext<'_>) -> ActionText {
    text(
        "Raise revenue per employee".to_string(),
        format!(
            "{} {} per month against a {} reference of {}. Review roles, automate repetitive work and set sales targets per person.",
            per_person_subject(context.snapshot.employee_count),
            format_currency(context.indicators.revenue_per_employee),
            context.benchmark.label(),
            format_currency(context.benchmark.revenue_per_employee_target)
        ),
        format!(
            "Revenue per employee of {}.",
            format_currency(context.benchmark.revenue_per_employee_target)
        ),
    )
}

fn build_emergency_reserve(context: &PlanContext<'_>) -> ActionText {
    let reserve = context.daily_expense() * 90.0;
    text(
        "Build an emergency reserve".to_string(),
        "Open a separate account and move a fixed share of revenue into it every week.".to_string(),
        format!(
            "A reserve of {}, three months of fixed expenses.",
            format_currency(reserve)
        ),
    )
}

fn automate_collections(context: &PlanContext<'_>) -> ActionText {
    text(
        "Automate collections".to_string(),
        format!(
            "Set up automatic payment reminders and bank slips so the {} owed by customers arrives on time.",
            format_currency(context.snapshot.receivables)
        ),
        "Overdue receivables cut in half.".to_string(),
    )
}

fn profitability_by_channel(_context: &PlanContext<'_>) -> ActionText {
    text(
        "Measure profitability by channel".to_string(),
        "Split revenue and direct costs by sales channel or customer group and rank them by margin."
            .to_string(),
        "Effort moved toward the most profitable channels.".to_string(),
    )
}

fn indicator_routine(context: &PlanContext<'_>) -> ActionText {
    text(
        "Create a routine for tracking indicators".to_string(),
        format!(
            "Once a month, update margin, result, cash runway and the health score (today {}).",
            context.score()
        ),
        "Monthly indicators compared month over month.".to_string(),
    )
}

fn document_key_processes(_context: &PlanContext<'_>) -> ActionText {
    text(
        "Document key processes".to_string(),
        "Write down how purchasing, pricing and collections are done so they do not depend on one person."
            .to_string(),
        "Critical routines documented and shared with the team.".to_string(),
    )
}

fn leave_critical_zone(context: &PlanContext<'_>) -> ActionText {
    let issues = context
        .problems
        .by_severity()
        .into_iter()
        .take(3)
        .map(|problem| problem.title.to_lowercase())
        .collect::<Vec<_>>();
    let focus = if issues.is_empty() {
        "the weakest indicators".to_string()
    } else {
        issues.join(", ")
    };
    text(
        format!("Lift the health score from {} to above 50", context.score()),
        format!("Concentrate the next 90 days on {focus}."),
        "Health score above 50 at the next evaluation.".to_string(),
    )
}

fn raise_score_above_70(context: &PlanContext<'_>) -> ActionText {
    text(
        format!("Lift the health score from {} to above 70", context.score()),
        "Keep the 30 and 60 day actions running and re-evaluate the business monthly.".to_string(),
        "Health score above 70 at the next quarterly evaluation.".to_string(),
    )
}

fn invest_in_growth(context: &PlanContext<'_>) -> ActionText {
    text(
        "Plan an investment in growth".to_string(),
        format!(
            "With a health score of {}, the business can fund growth: evaluate a new product line, channel or location using part of the profit.",
            context.score()
        ),
        "A growth project with budget and payback estimate.".to_string(),
    )
}

fn diversify_revenue(_context: &PlanContext<'_>) -> ActionText {
    text(
        "Diversify revenue sources".to_string(),
        "Reduce dependence on the products and customers behind the decline by testing a new offer or customer segment."
            .to_string(),
        "No single customer or product above a third of revenue.".to_string(),
    )
}

fn reinvest_profit(context: &PlanContext<'_>) -> ActionText {
    let amount = context.result() * 0.25;
    text(
        "Reinvest part of the profit".to_string(),
        format!(
            "Margin is at sector level. Reinvest 25% of monthly profit ({}) in marketing, equipment or training.",
            format_currency(amount)
        ),
        format!(
            "{} reinvested over the quarter.",
            format_currency(amount * 3.0)
        ),
    )
}

fn three_month_reserve(context: &PlanContext<'_>) -> ActionText {
    let reserve = context.daily_expense() * 90.0;
    let months = if context.result() > 0.0 {
        ((reserve - context.snapshot.cash).max(0.0) / context.result()).ceil()
    } else {
        0.0
    };
    text(
        "Reach three months of cash".to_string(),
        format!(
            "Saving the monthly profit, the {} reserve takes about {} month(s).",
            format_currency(reserve),
            format_number(months, 0)
        ),
        format!("{} in cash.", format_currency(reserve)),
    )
}

fn contingency_plan(_context: &PlanContext<'_>) -> ActionText {
    text(
        "Prepare a contingency plan".to_string(),
        "List the expenses to cut first, the assets that could be sold and the credit lines available if cash runs short."
            .to_string(),
        "A written plan B reviewed with the partners.".to_string(),
    )
}

fn monthly_indicator_review(_context: &PlanContext<'_>) -> ActionText {
    text(
        "Review indicators every month".to_string(),
        "Re-run this evaluation at the end of each month and compare the results.".to_string(),
        "Three monthly evaluations to compare.".to_string(),
    )
}

fn quarterly_pricing_review(context: &PlanContext<'_>) -> ActionText {
    let floor = context.margin().max(context.margin_target());
    text(
        "Review prices every quarter".to_string(),
        "Update prices against current supplier costs and competitor prices each quarter.".to_string(),
        format!(
            "Gross margin kept at or above {}.",
            format_percent(floor, 0)
        ),
    )
}

fn team_financial_training(_context: &PlanContext<'_>) -> ActionText {
    text(
        "Train the team on costs".to_string(),
        "Show the team how discounts, waste and rework affect the monthly result.".to_string(),
        "Fewer unplanned discounts and less waste.".to_string(),
    )
}

fn quarterly_targets(_context: &PlanContext<'_>) -> ActionText {
    text(
        "Set quarterly targets".to_string(),
        "Define revenue, margin and cash targets for the next quarter and share them with the team."
            .to_string(),
        "Targets written down and reviewed at the end of the quarter.".to_string(),
    )
}
