//! Assessment for someone who has not opened the business yet: recommended
//! starting capital, revenue expectation against the sector, up to three
//! alerts and a 30-day checklist.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::contracts::types::SnapshotIssue;
use crate::engine::money::{format_currency, format_percent};
use crate::engine::sector::{Sector, SectorBenchmark, benchmark_for};
use crate::engine::snapshot::MAX_AMOUNT;
use crate::{CoreError, CoreResult};

const INVENTORY_SURCHARGE: f64 = 0.20;
const SHORT_NOTICE_SURCHARGE: f64 = 0.15;
const SHORT_NOTICE_MONTHS: i64 = 3;
const TECHNOLOGY_PRODUCT_SHARE_OF_BASE: f64 = 0.75;
const TIGHT_MARGIN_PCT: f64 = 35.0;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    Product,
    Service,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerDraw {
    Yes,
    No,
    Undecided,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum EmployeeBand {
    #[serde(rename = "1-2")]
    OneToTwo,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "6-10")]
    SixToTen,
    #[serde(rename = "10+")]
    MoreThanTen,
}

impl EmployeeBand {
    /// Headcount used for the capital estimate.
    pub fn headcount(self) -> f64 {
        match self {
            Self::OneToTwo => 1.5,
            Self::ThreeToFive => 4.0,
            Self::SixToTen => 8.0,
            Self::MoreThanTen => 12.0,
        }
    }

    fn is_large(self) -> bool {
        matches!(self, Self::SixToTen | Self::MoreThanTen)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuaranteedClients {
    Yes,
    No,
    Partially,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreOpeningInput {
    pub business_type: BusinessType,
    /// Required for product businesses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_inventory: Option<bool>,
    pub sector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub opening_month: u32,
    pub opening_year: i32,
    pub available_capital: f64,
    pub expected_revenue: f64,
    pub owner_draw: OwnerDraw,
    pub has_employees: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_band: Option<EmployeeBand>,
    pub guaranteed_clients: GuaranteedClients,
}

impl PreOpeningInput {
    pub fn parse_json(content: &str) -> CoreResult<Self> {
        serde_json::from_str::<Self>(content).map_err(|error| {
            CoreError::invalid_argument_with_recovery(
                &format!("Input is not valid JSON for a pre-opening assessment: {error}"),
                vec![
                    "Provide one JSON object with the pre-opening fields.".to_string(),
                    "Run `leme pre-opening --help` to review the expected fields.".to_string(),
                ],
            )
        })
    }

    pub fn validate(&self) -> CoreResult<()> {
        let mut issues = Vec::new();

        if Sector::from_key(&self.sector).is_none() {
            issues.push(SnapshotIssue::new(
                "sector",
                "unknown_sector",
                "Sector must be one of the keys listed by `leme sectors`.",
            ));
        }
        if self.business_type == BusinessType::Product && self.has_inventory.is_none() {
            issues.push(SnapshotIssue::new(
                "has_inventory",
                "missing_value",
                "`has_inventory` is required when `business_type` is `product`.",
            ));
        }
        if !(1..=12).contains(&self.opening_month) {
            issues.push(SnapshotIssue::new(
                "opening_month",
                "out_of_range",
                "Opening month must be between 1 and 12.",
            ));
        }
        if !(2000..=2100).contains(&self.opening_year) {
            issues.push(SnapshotIssue::new(
                "opening_year",
                "out_of_range",
                "Opening year must be between 2000 and 2100.",
            ));
        }
        for (field, value) in [
            ("available_capital", self.available_capital),
            ("expected_revenue", self.expected_revenue),
        ] {
            if !value.is_finite() || !(0.0..=MAX_AMOUNT).contains(&value) {
                issues.push(SnapshotIssue::new(
                    field,
                    "invalid_amount",
                    "Amount must be a finite number between zero and R$ 1 trillion.",
                ));
            }
        }
        if self.has_employees && self.employee_band.is_none() {
            issues.push(SnapshotIssue::new(
                "employee_band",
                "missing_value",
                "`employee_band` is required when `has_employees` is true.",
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(CoreError::invalid_pre_opening_input(issues))
        }
    }

    fn holds_inventory(&self) -> bool {
        self.business_type == BusinessType::Product && self.has_inventory == Some(true)
    }

    fn headcount(&self) -> f64 {
        if !self.has_employees {
            return 0.0;
        }
        self.employee_band.map(EmployeeBand::headcount).unwrap_or(0.0)
    }

    fn is_technology_product(&self) -> bool {
        self.business_type == BusinessType::Product
            && Sector::from_key(&self.sector) == Some(Sector::Technology)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapitalBreakdown {
    pub sector_base: f64,
    pub cost_per_employee: f64,
    pub headcount: f64,
    pub employees_addition: f64,
    pub inventory_addition: f64,
    pub short_notice_addition: f64,
    pub technology_product_addition: f64,
}

impl CapitalBreakdown {
    pub fn recommended(&self) -> f64 {
        self.sector_base
            + self.employees_addition
            + self.inventory_addition
            + self.short_notice_addition
            + self.technology_product_addition
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CapitalStatus {
    Above,
    Adequate,
    Below,
    FarBelow,
}

impl CapitalStatus {
    fn for_difference(difference_pct: f64) -> Self {
        if difference_pct >= 0.0 {
            Self::Above
        } else if difference_pct >= -20.0 {
            Self::Adequate
        } else if difference_pct >= -50.0 {
            Self::Below
        } else {
            Self::FarBelow
        }
    }

    fn is_short(self) -> bool {
        matches!(self, Self::Below | Self::FarBelow)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevenueStatus {
    FarAbove,
    Above,
    Below,
    FarBelow,
}

impl RevenueStatus {
    fn for_difference(difference_pct: f64) -> Self {
        if difference_pct > 50.0 {
            Self::FarAbove
        } else if difference_pct >= 0.0 {
            Self::Above
        } else if difference_pct >= -50.0 {
            Self::Below
        } else {
            Self::FarBelow
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapitalComparison {
    pub available: f64,
    pub recommended: f64,
    pub difference_pct: f64,
    pub status: CapitalStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueComparison {
    pub expected: f64,
    pub reference: f64,
    pub difference_pct: f64,
    pub status: RevenueStatus,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    Financial,
    Operational,
    Structural,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Positive,
    Caution,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub id: String,
    pub category: AlertCategory,
    pub severity: AlertSeverity,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub text: String,
    pub conditional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreOpeningAssessment {
    pub business_type: BusinessType,
    pub sector: String,
    pub sector_label: String,
    pub state: Option<String>,
    pub city: Option<String>,
    /// `YYYY-MM`.
    pub opening: String,
    pub months_until_opening: i64,
    pub capital_breakdown: CapitalBreakdown,
    pub capital: CapitalComparison,
    pub revenue: RevenueComparison,
    pub alerts: Vec<Alert>,
    pub checklist_30_days: Vec<ChecklistItem>,
    pub context_message: Option<String>,
}

/// Validates the answers and builds the assessment as of `as_of`.
pub fn assess(input: &PreOpeningInput, as_of: NaiveDate) -> CoreResult<PreOpeningAssessment> {
    input.validate()?;

    let benchmark = match Sector::from_key(&input.sector) {
        Some(sector) => benchmark_for(sector),
        None => return Err(CoreError::invalid_argument("Unknown sector.")),
    };
    let months_until_opening = months_until(input.opening_year, input.opening_month, as_of);
    let capital_breakdown = capital_breakdown(input, benchmark, months_until_opening);
    let capital = compare_capital(input.available_capital, &capital_breakdown);
    let revenue = compare_revenue(input.expected_revenue, benchmark);

    let context = AlertContext {
        input,
        benchmark,
        capital: &capital,
        revenue: &revenue,
        months_until_opening,
    };
    let alerts = select_alerts(&context);

    Ok(PreOpeningAssessment {
        business_type: input.business_type,
        sector: input.sector.clone(),
        sector_label: benchmark.label().to_string(),
        state: input.state.clone(),
        city: input.city.clone(),
        opening: format!("{:04}-{:02}", input.opening_year, input.opening_month),
        months_until_opening,
        capital_breakdown,
        capital,
        revenue,
        alerts,
        checklist_30_days: checklist(input),
        context_message: input.is_technology_product().then(|| {
            "Technology products usually take longer to generate revenue, so the recommended reserve is higher."
                .to_string()
        }),
    })
}

/// Whole months from `as_of` to the first day of the opening month, never negative.
fn months_until(opening_year: i32, opening_month: u32, as_of: NaiveDate) -> i64 {
    let months = i64::from(opening_year - as_of.year()) * 12
        + i64::from(opening_month) - i64::from(as_of.month());
    months.max(0)
}

fn capital_breakdown(
    input: &PreOpeningInput,
    benchmark: &SectorBenchmark,
    months_until_opening: i64,
) -> CapitalBreakdown {
    let sector_base = benchmark.capital_base;
    let headcount = input.headcount();
    let employees_addition = headcount * benchmark.employee_cost;

    let mut subtotal = sector_base + employees_addition;
    let inventory_addition = if input.holds_inventory() {
        subtotal * INVENTORY_SURCHARGE
    } else {
        0.0
    };
    subtotal += inventory_addition;

    let short_notice_addition = if months_until_opening < SHORT_NOTICE_MONTHS {
        subtotal * SHORT_NOTICE_SURCHARGE
    } else {
        0.0
    };

    let technology_product_addition = if input.is_technology_product() {
        sector_base * TECHNOLOGY_PRODUCT_SHARE_OF_BASE
    } else {
        0.0
    };

    CapitalBreakdown {
        sector_base,
        cost_per_employee: benchmark.employee_cost,
        headcount,
        employees_addition,
        inventory_addition,
        short_notice_addition,
        technology_product_addition,
    }
}

fn compare_capital(available: f64, breakdown: &CapitalBreakdown) -> CapitalComparison {
    let recommended = breakdown.recommended();
    let difference_pct = percent_difference(available, recommended);
    CapitalComparison {
        available,
        recommended: round_to(recommended, 2),
        difference_pct: round_to(difference_pct, 1),
        status: CapitalStatus::for_difference(difference_pct),
    }
}

fn compare_revenue(expected: f64, benchmark: &SectorBenchmark) -> RevenueComparison {
    let reference = benchmark.revenue_reference;
    let difference_pct = percent_difference(expected, reference);
    RevenueComparison {
        expected,
        reference,
        difference_pct: round_to(difference_pct, 1),
        status: RevenueStatus::for_difference(difference_pct),
    }
}

fn percent_difference(value: f64, reference: f64) -> f64 {
    if reference > 0.0 {
        (value - reference) / reference * 100.0
    } else {
        0.0
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

struct AlertContext<'a> {
    input: &'a PreOpeningInput,
    benchmark: &'a SectorBenchmark,
    capital: &'a CapitalComparison,
    revenue: &'a RevenueComparison,
    months_until_opening: i64,
}

impl AlertContext<'_> {
    fn capital_is_short(&self) -> bool {
        self.capital.status.is_short()
    }

    fn sector(&self) -> Option<Sector> {
        Sector::from_key(&self.input.sector)
    }

    fn tight_margin(&self) -> bool {
        self.benchmark.margin_target_pct <= TIGHT_MARGIN_PCT
    }
}

struct AlertRule {
    id: &'static str,
    severity: AlertSeverity,
    title: &'static str,
    applies: fn(&AlertContext<'_>) -> bool,
    text: fn(&AlertContext<'_>) -> String,
}

/// Financial rules, most severe first.
static FINANCIAL_ALERTS: [AlertRule; 7] = [
    AlertRule {
        id: "capital_far_below_reference",
        severity: AlertSeverity::Warning,
        title: "Capital well below the sector reference",
        applies: |context| context.capital.status == CapitalStatus::FarBelow,
        text: |context| {
            format!(
                "The starting capital reference for this sector is {}. With {} available, the risk of trouble in the first months is high. Look for additional funding or start smaller.",
                format_currency(context.capital.recommended),
                format_currency(context.capital.available)
            )
        },
    },
    AlertRule {
        id: "capital_below_reference",
        severity: AlertSeverity::Caution,
        title: "Capital below the sector reference",
        applies: |context| context.capital.status == CapitalStatus::Below,
        text: |_| {
            "Your capital is close to, but still below, the reference for this sector. Keep spending tight and start with a lean structure."
                .to_string()
        },
    },
    AlertRule {
        id: "owner_draw_pressures_cash",
        severity: AlertSeverity::Caution,
        title: "Owner's draw may squeeze cash",
        applies: |context| {
            context.input.owner_draw == OwnerDraw::Yes && context.capital_is_short()
        },
        text: |_| {
            "Taking a monthly draw from day one with limited capital shrinks your safety margin. See whether you can postpone it for the first months."
                .to_string()
        },
    },
    AlertRule {
        id: "owner_draw_undecided",
        severity: AlertSeverity::Caution,
        title: "Decide on your owner's draw",
        applies: |context| context.input.owner_draw == OwnerDraw::Undecided,
        text: |_| {
            "Whether you take a monthly draw changes the whole financial plan. Settle it before opening."
                .to_string()
        },
    },
    AlertRule {
        id: "revenue_expectation_conservative",
        severity: AlertSeverity::Caution,
        title: "Conservative revenue expectation",
        applies: |context| context.revenue.status == RevenueStatus::FarBelow,
        text: |context| {
            format!(
                "Your estimate is well below the sector reference of {} per month. That can be realistic at the start, but plan how to grow.",
                format_currency(context.revenue.reference)
            )
        },
    },
    AlertRule {
        id: "revenue_expectation_optimistic",
        severity: AlertSeverity::Caution,
        title: "Optimistic revenue expectation",
        applies: |context| context.revenue.status == RevenueStatus::FarAbove,
        text: |context| {
            format!(
                "Your estimate is {} above the sector reference. It is possible, but do not size fixed costs on this projection.",
                format_percent(context.revenue.difference_pct, 0)
            )
        },
    },
    AlertRule {
        id: "no_clients_and_short_capital",
        severity: AlertSeverity::Caution,
        title: "No confirmed clients and limited capital",
        applies: |context| {
            context.input.guaranteed_clients == GuaranteedClients::No && context.capital_is_short()
        },
        text: |_| {
            "Starting without confirmed clients calls for a larger reserve. Validate demand before investing or reduce the initial structure."
                .to_string()
        },
    },
];

/// Operational rules, most severe first.
static OPERATIONAL_ALERTS: [AlertRule; 8] = [
    AlertRule {
        id: "employees_raise_initial_risk",
        severity: AlertSeverity::Caution,
        title: "Employees raise the initial risk",
        applies: |context| context.input.has_employees,
        text: |_| {
            "Each employee is a fixed monthly cost (salary plus charges). Consider starting alone or with partners until the model is proven."
                .to_string()
        },
    },
    AlertRule {
        id: "large_starting_team",
        severity: AlertSeverity::Warning,
        title: "Large team for a new operation",
        applies: |context| context.input.employee_band.is_some_and(EmployeeBand::is_large),
        text: |_| {
            "Starting with more than five employees is unusual and risky. Most businesses grow the team with demand."
                .to_string()
        },
    },
    AlertRule {
        id: "inventory_with_short_capital",
        severity: AlertSeverity::Warning,
        title: "Inventory with limited cash is a high risk",
        applies: |context| {
            context.input.holds_inventory() && context.tight_margin() && context.capital_is_short()
        },
        text: |_| {
            "You plan to hold inventory in a tight-margin sector with capital below the reference. Start with minimum stock and turn it quickly."
                .to_string()
        },
    },
    AlertRule {
        id: "inventory_in_tight_margin_sector",
        severity: AlertSeverity::Caution,
        title: "Inventory in a tight-margin sector",
        applies: |context| {
            context.input.holds_inventory()
                && context.benchmark.margin_target_pct < TIGHT_MARGIN_PCT
                && !context.capital_is_short()
        },
        text: |context| {
            format!(
                "Sectors like {} tend to run on lower gross margins. Idle stock is idle money. Negotiate payment terms with suppliers.",
                context.benchmark.label()
            )
        },
    },
    AlertRule {
        id: "inventory_pressures_cash",
        severity: AlertSeverity::Caution,
        title: "Inventory may squeeze cash",
        applies: |context| {
            context.input.holds_inventory()
                && context.benchmark.margin_target_pct == TIGHT_MARGIN_PCT
                && !context.capital_is_short()
        },
        text: |_| {
            "Inventory can squeeze cash in this sector. Favour fast turnover and longer supplier terms."
                .to_string()
        },
    },
    AlertRule {
        id: "inventory_needs_working_capital",
        severity: AlertSeverity::Caution,
        title: "Inventory needs working capital",
        applies: |context| {
            context.input.holds_inventory() && !context.tight_margin() && context.capital_is_short()
        },
        text: |_| {
            "Holding inventory ties up part of your capital. With limited funds, start with minimum stock and restock as you sell."
                .to_string()
        },
    },
    AlertRule {
        id: "product_without_inventory",
        severity: AlertSeverity::Caution,
        title: "Product without own inventory",
        applies: |context| {
            context.input.business_type == BusinessType::Product
                && context.input.has_inventory == Some(false)
        },
        text: |_| {
            "You plan to sell a product without stock. That works for drop shipping or made-to-order. Confirm that is your model."
                .to_string()
        },
    },
    AlertRule {
        id: "labour_intensive_sector_solo",
        severity: AlertSeverity::Caution,
        title: "Labour-intensive sector",
        applies: |context| {
            matches!(
                context.sector(),
                Some(Sector::FoodService | Sector::Hospitality)
            ) && !context.input.has_employees
        },
        text: |context| {
            format!(
                "{} usually needs a team from the start. Check whether you can run it alone or will need to hire soon.",
                context.benchmark.label()
            )
        },
    },
];

static SHORT_NOTICE_ALERT: AlertRule = AlertRule {
    id: "short_notice_with_short_capital",
    severity: AlertSeverity::Caution,
    title: "Short notice with limited capital",
    applies: |context| {
        context.months_until_opening < SHORT_NOTICE_MONTHS && context.capital_is_short()
    },
    text: |_| {
        "Opening in less than three months with capital below the reference raises the risk. Consider postponing to build up cash."
            .to_string()
    },
};

static STRUCTURAL_ALERTS: [AlertRule; 5] = [
    AlertRule {
        id: "demand_validated",
        severity: AlertSeverity::Positive,
        title: "Good sign: demand already validated",
        applies: |context| {
            matches!(
                context.input.guaranteed_clients,
                GuaranteedClients::Yes | GuaranteedClients::Partially
            )
        },
        text: |_| {
            "Having clients or contracts before opening lowers the risk considerably. Put those commitments in writing if you can."
                .to_string()
        },
    },
    AlertRule {
        id: "lean_structure_with_reserve",
        severity: AlertSeverity::Positive,
        title: "Lean structure with a good reserve",
        applies: |context| {
            context.input.business_type == BusinessType::Service
                && !context.input.has_employees
                && !context.capital_is_short()
        },
        text: |_| {
            "A service business without employees and with capital at the reference is a low-risk combination. A good starting point."
                .to_string()
        },
    },
    AlertRule {
        id: "high_closure_sector",
        severity: AlertSeverity::Caution,
        title: "Sector with a high business closure rate",
        applies: |context| context.sector() == Some(Sector::FoodService),
        text: |_| {
            "Food service has one of the highest closure rates. Stand out, control costs and keep a reserve for surprises."
                .to_string()
        },
    },
    AlertRule {
        id: "technology_product_investment",
        severity: AlertSeverity::Caution,
        title: "Technology products need investment",
        applies: |context| context.input.is_technology_product(),
        text: |_| {
            "Technology products usually take longer to generate revenue, which is why the recommended reserve is higher. Validate the idea before investing heavily."
                .to_string()
        },
    },
    AlertRule {
        id: "capital_intensive_sector",
        severity: AlertSeverity::Caution,
        title: "Capital-intensive sector",
        applies: |context| {
            matches!(
                context.sector(),
                Some(Sector::Construction | Sector::Manufacturing)
            ) && context.capital_is_short()
        },
        text: |context| {
            format!(
                "{} tends to need more initial investment than other sectors. Your capital may not be enough for this operation.",
                context.benchmark.label()
            )
        },
    },
];

static VIABLE_PLAN_ALERT: AlertRule = AlertRule {
    id: "viable_plan",
    severity: AlertSeverity::Positive,
    title: "Your plan shows initial viability",
    applies: |_| true,
    text: |_| {
        "The numbers point to a balanced starting structure. Keep strict financial control in the first months."
            .to_string()
    },
};

fn select_alerts(context: &AlertContext<'_>) -> Vec<Alert> {
    let operational = OPERATIONAL_ALERTS
        .iter()
        .chain(std::iter::once(&SHORT_NOTICE_ALERT));

    let mut structural = STRUCTURAL_ALERTS
        .iter()
        .filter(|rule| (rule.applies)(context))
        .collect::<Vec<_>>();
    if structural.is_empty() {
        structural.push(&VIABLE_PLAN_ALERT);
    }
    structural.sort_by_key(|rule| rule.severity != AlertSeverity::Positive);

    [
        first_hit(FINANCIAL_ALERTS.iter(), context, AlertCategory::Financial),
        first_hit(operational, context, AlertCategory::Operational),
        first_hit(structural.into_iter(), context, AlertCategory::Structural),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn first_hit<'r>(
    mut rules: impl Iterator<Item = &'r AlertRule>,
    context: &AlertContext<'_>,
    category: AlertCategory,
) -> Option<Alert> {
    rules
        .find(|rule| (rule.applies)(context))
        .map(|rule| Alert {
            id: rule.id.to_string(),
            category,
            severity: rule.severity,
            title: rule.title.to_string(),
            text: (rule.text)(context),
        })
}

fn checklist(input: &PreOpeningInput) -> Vec<ChecklistItem> {
    let mut items = [
        "Choose the legal structure for the business",
        "Check the local licensing requirements",
        "Open a business bank account",
        "Hire an accountant or accounting firm",
    ]
    .into_iter()
    .map(|text| ChecklistItem {
        text: text.to_string(),
        conditional: false,
        condition: None,
    })
    .collect::<Vec<_>>();

    let conditional = [
        (
            input.holds_inventory(),
            "Research suppliers and negotiate payment terms",
            "has_inventory",
        ),
        (
            input.guaranteed_clients == GuaranteedClients::No,
            "Validate the first clients before investing heavily",
            "no_guaranteed_clients",
        ),
        (
            input.has_employees,
            "Plan hiring and employment paperwork",
            "has_employees",
        ),
    ];
    for (applies, text, condition) in conditional {
        if applies {
            items.push(ChecklistItem {
                text: text.to_string(),
                conditional: true,
                condition: Some(condition.to_string()),
            });
        }
    }

    items
}
