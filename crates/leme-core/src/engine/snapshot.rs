use serde::{Deserialize, Serialize};

use crate::contracts::types::{EvaluationWarning, SnapshotIssue};
use crate::engine::money::format_currency;
use crate::engine::sector::{Sector, is_well_formed_key};
use crate::{CoreError, CoreResult};

pub const REVENUE_HISTORY_MONTHS: usize = 3;
/// Largest accepted amount. Annualised figures must stay finite.
pub const MAX_AMOUNT: f64 = 1.0e12;

/// One month of a company's finances, as entered by the owner.
///
/// Identity fields are carried through to the history store but never read
/// by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_year: Option<i32>,
    pub sector: String,
    /// Oldest first: three, two and one month(s) ago.
    pub revenue_history: Vec<f64>,
    pub revenue_current: f64,
    pub cost_of_sales: f64,
    pub fixed_expenses: f64,
    pub cash: f64,
    pub receivables: f64,
    pub payables: f64,
    #[serde(default)]
    pub has_inventory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<f64>,
    #[serde(default)]
    pub has_debt: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_debt: Option<f64>,
    #[serde(default)]
    pub has_assets: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_value: Option<f64>,
    pub employee_count: i64,
}

impl FinancialSnapshot {
    pub fn parse_json(content: &str) -> CoreResult<Self> {
        serde_json::from_str::<Self>(content).map_err(|error| {
            CoreError::invalid_argument_with_recovery(
                &format!("Snapshot is not valid JSON for a financial snapshot: {error}"),
                vec![
                    "Provide one JSON object with the snapshot fields.".to_string(),
                    "Run `leme evaluate --help` to review the snapshot fields.".to_string(),
                ],
            )
        })
    }

    /// Inventory value counted by the formulas: zero unless tracked.
    pub fn tracked_inventory(&self) -> f64 {
        if self.has_inventory {
            self.inventory.unwrap_or(0.0)
        } else {
            0.0
        }
    }

    pub fn tracked_debt(&self) -> Option<f64> {
        if self.has_debt { self.total_debt } else { None }
    }

    /// Revenue series used for the trend: history followed by the current month.
    pub fn revenue_series(&self) -> Vec<f64> {
        let mut series = self.revenue_history.clone();
        series.push(self.revenue_current);
        series
    }

    pub fn reference_period(&self) -> Option<String> {
        match (self.reference_year, self.reference_month) {
            (Some(year), Some(month)) => Some(format!("{year:04}-{month:02}")),
            (Some(year), None) => Some(format!("{year:04}")),
            _ => None,
        }
    }

    /// Rejects structurally invalid snapshots, reporting every offending field.
    pub fn validate(&self) -> CoreResult<()> {
        let issues = self.collect_issues();
        if issues.is_empty() {
            return Ok(());
        }
        Err(CoreError::invalid_snapshot(issues))
    }

    fn collect_issues(&self) -> Vec<SnapshotIssue> {
        let mut issues = Vec::new();

        if !is_well_formed_key(&self.sector) {
            issues.push(SnapshotIssue::new(
                "sector",
                "malformed_sector",
                "Sector must be a lowercase key such as `retail` or `food_service`.",
            ));
        }

        if self.revenue_history.len() != REVENUE_HISTORY_MONTHS {
            issues.push(SnapshotIssue::new(
                "revenue_history",
                "wrong_length",
                &format!(
                    "Revenue history must list exactly {REVENUE_HISTORY_MONTHS} months, oldest first (got {}).",
                    self.revenue_history.len()
                ),
            ));
        }
        for (index, value) in self.revenue_history.iter().enumerate() {
            check_amount(&mut issues, &format!("revenue_history[{index}]"), *value);
        }

        for (field, value) in [
            ("revenue_current", self.revenue_current),
            ("cost_of_sales", self.cost_of_sales),
            ("fixed_expenses", self.fixed_expenses),
            ("cash", self.cash),
            ("receivables", self.receivables),
            ("payables", self.payables),
        ] {
            check_amount(&mut issues, field, value);
        }

        check_flagged_amount(
            &mut issues,
            ("has_inventory", self.has_inventory),
            ("inventory", self.inventory),
        );
        check_flagged_amount(
            &mut issues,
            ("has_debt", self.has_debt),
            ("total_debt", self.total_debt),
        );
        if self.has_assets
            && let Some(value) = self.assets_value
        {
            check_amount(&mut issues, "assets_value", value);
        }

        if self.employee_count < 1 {
            issues.push(SnapshotIssue::new(
                "employee_count",
                "below_minimum",
                "Employee count must be at least 1 (count the owner).",
            ));
        }

        issues
    }

    /// Non-blocking coherence checks surfaced next to the evaluation.
    pub fn coherence_warnings(&self) -> Vec<EvaluationWarning> {
        let mut warnings = Vec::new();

        if Sector::from_key(&self.sector).is_none() {
            warnings.push(EvaluationWarning::new(
                "unknown_sector",
                &format!(
                    "Sector `{}` is not in the benchmark table; default benchmarks were used.",
                    self.sector
                ),
            ));
        }
        if self.revenue_current == 0.0 {
            warnings.push(EvaluationWarning::new(
                "zero_revenue",
                "Current revenue is zero; margin-based indicators are reported as zero or not applicable.",
            ));
        }
        if self.cost_of_sales > self.revenue_current {
            warnings.push(EvaluationWarning::new(
                "cost_above_revenue",
                &format!(
                    "Cost of sales ({}) is higher than revenue ({}). Check that both refer to the same month.",
                    format_currency(self.cost_of_sales),
                    format_currency(self.revenue_current)
                ),
            ));
        }
        if self.fixed_expenses > self.revenue_current {
            warnings.push(EvaluationWarning::new(
                "fixed_expenses_above_revenue",
                &format!(
                    "Fixed expenses ({}) are higher than revenue ({}).",
                    format_currency(self.fixed_expenses),
                    format_currency(self.revenue_current)
                ),
            ));
        }

        warnings
    }
}

fn check_amount(issues: &mut Vec<SnapshotIssue>, field: &str, value: f64) {
    if !value.is_finite() {
        issues.push(SnapshotIssue::new(
            field,
            "not_finite",
            "Amount must be a finite number.",
        ));
    } else if value < 0.0 {
        issues.push(SnapshotIssue::new(
            field,
            "negative_amount",
            "Amount must be zero or positive.",
        ));
    } else if value > MAX_AMOUNT {
        issues.push(SnapshotIssue::new(
            field,
            "amount_too_large",
            "Amount must not exceed R$ 1 trillion.",
        ));
    }
}

fn check_flagged_amount(
    issues: &mut Vec<SnapshotIssue>,
    (flag_name, flag): (&str, bool),
    (field, value): (&str, Option<f64>),
) {
    if !flag {
        return;
    }
    match value {
        Some(amount) => check_amount(issues, field, amount),
        None => issues.push(SnapshotIssue::new(
            field,
            "missing_value",
            &format!("`{field}` is required when `{flag_name}` is true."),
        )),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{FinancialSnapshot, MAX_AMOUNT};

    pub(crate) fn snapshot(
        revenue: f64,
        cost_of_sales: f64,
        fixed_expenses: f64,
        cash: f64,
    ) -> FinancialSnapshot {
        FinancialSnapshot {
            company_name: Some("Padaria Central".to_string()),
            reference_month: Some(3),
            reference_year: Some(2026),
            sector: "retail".to_string(),
            revenue_history: vec![revenue, revenue, revenue],
            revenue_current: revenue,
            cost_of_sales,
            fixed_expenses,
            cash,
            receivables: 0.0,
            payables: 0.0,
            has_inventory: false,
            inventory: None,
            has_debt: false,
            total_debt: None,
            has_assets: false,
            assets_value: None,
            employee_count: 1,
        }
    }
}
