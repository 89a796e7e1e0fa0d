use serde::{Deserialize, Serialize};

use crate::engine::policy::TREND_POLICY_V1;
use crate::engine::score;
use crate::engine::sector::SectorBenchmark;
use crate::engine::snapshot::FinancialSnapshot;

const DAYS_PER_MONTH: f64 = 30.0;
const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStatus {
    Growing,
    Stable,
    Declining,
}

impl TrendStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Growing => "growing",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaybackBand {
    Excellent,
    Good,
    Average,
    LongTerm,
}

impl PaybackBand {
    fn for_years(years: f64) -> Self {
        if years <= 2.0 {
            Self::Excellent
        } else if years <= 3.5 {
            Self::Good
        } else if years <= 5.0 {
            Self::Average
        } else {
            Self::LongTerm
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent!",
            Self::Good => "Good return!",
            Self::Average => "Within average",
            Self::LongTerm => "Long-term",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRange {
    pub min: f64,
    pub max: f64,
    pub multiple_min: f64,
    pub multiple_max: f64,
}

impl ValuationRange {
    pub fn average(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payback {
    pub years_decimal: f64,
    pub years: u32,
    pub months: u32,
    pub band: PaybackBand,
    pub sentence: String,
    /// Share of a five-year recovery goal already met, capped at 100.
    pub goal_percent: f64,
}

/// Every indicator derived from one snapshot. `None` marks an indicator that
/// does not apply to the business (no inventory, no debt, no profit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub revenue: f64,
    pub gross_margin_pct: f64,
    pub monthly_result: f64,
    pub cash_runway_days: i64,
    pub break_even_revenue: Option<f64>,
    pub financial_cycle_days: Option<i64>,
    pub min_capital_required: f64,
    pub revenue_per_employee: f64,
    pub debt_weight_pct: Option<f64>,
    pub valuation: Option<ValuationRange>,
    pub payback: Option<Payback>,
    pub revenue_trend_pct: f64,
    pub trend_status: TrendStatus,
    pub health_score: u8,
}

impl IndicatorSet {
    /// Monthly result as a share of revenue; `None` without revenue.
    pub fn result_margin_pct(&self) -> Option<f64> {
        if self.revenue > 0.0 {
            Some(self.monthly_result / self.revenue * 100.0)
        } else {
            None
        }
    }

    /// Break-even revenue as a share of current revenue.
    pub fn break_even_ratio_pct(&self) -> Option<f64> {
        match self.break_even_revenue {
            Some(break_even) if self.revenue > 0.0 => Some(break_even / self.revenue * 100.0),
            _ => None,
        }
    }
}

pub fn compute(snapshot: &FinancialSnapshot, benchmark: &SectorBenchmark) -> IndicatorSet {
    let revenue = snapshot.revenue_current;
    let cost = snapshot.cost_of_sales;
    let fixed = snapshot.fixed_expenses;

    let gross_margin_pct = if revenue > 0.0 {
        (revenue - cost) / revenue * 100.0
    } else {
        0.0
    };
    let monthly_result = revenue - cost - fixed;
    let break_even_revenue = if gross_margin_pct > 0.0 {
        Some(fixed / (gross_margin_pct / 100.0))
    } else {
        None
    };

    let revenue_trend_pct = revenue_trend(&snapshot.revenue_series());
    let valuation = valuation_range(monthly_result, benchmark);
    let payback = valuation
        .as_ref()
        .and_then(|range| payback(range.average(), monthly_result * MONTHS_PER_YEAR));

    let mut indicators = IndicatorSet {
        revenue,
        gross_margin_pct,
        monthly_result,
        cash_runway_days: cash_runway_days(snapshot.cash, fixed),
        break_even_revenue,
        financial_cycle_days: financial_cycle_days(snapshot),
        min_capital_required: snapshot.receivables + snapshot.tracked_inventory()
            - snapshot.payables,
        revenue_per_employee: revenue_per_employee(revenue, snapshot.employee_count),
        debt_weight_pct: debt_weight_pct(snapshot.tracked_debt(), revenue),
        valuation,
        payback,
        revenue_trend_pct,
        trend_status: TREND_POLICY_V1.status_for(revenue_trend_pct),
        health_score: 0,
    };
    indicators.health_score = score::score(&indicators);
    indicators
}

fn cash_runway_days(cash: f64, fixed_expenses: f64) -> i64 {
    // cash / (fixed / 30), kept as one division so whole-day results stay exact
    let days = if fixed_expenses > 0.0 {
        cash * DAYS_PER_MONTH / fixed_expenses
    } else {
        cash / daily_expense(fixed_expenses)
    };
    (days.floor() as i64).max(0)
}

/// Average fixed expense per day; one real per day when there are none, so
/// runway stays finite.
pub(crate) fn daily_expense(fixed_expenses: f64) -> f64 {
    if fixed_expenses > 0.0 {
        fixed_expenses / DAYS_PER_MONTH
    } else {
        1.0
    }
}

fn per_day_or_one(monthly: f64) -> f64 {
    if monthly > 0.0 {
        monthly / DAYS_PER_MONTH
    } else {
        1.0
    }
}

fn financial_cycle_days(snapshot: &FinancialSnapshot) -> Option<i64> {
    let inventory = snapshot.tracked_inventory();
    if !snapshot.has_inventory || inventory <= 0.0 {
        return None;
    }

    let receivable_days = snapshot.receivables / per_day_or_one(snapshot.revenue_current);
    let inventory_days = inventory / per_day_or_one(snapshot.cost_of_sales);
    let payable_days = snapshot.payables / per_day_or_one(snapshot.cost_of_sales);

    Some((receivable_days + inventory_days - payable_days).floor() as i64)
}

fn revenue_per_employee(revenue: f64, employee_count: i64) -> f64 {
    if employee_count > 0 {
        revenue / employee_count as f64
    } else {
        revenue
    }
}

/// Sentence opening for revenue per person, worded for an owner working alone.
pub(crate) fn per_person_subject(employee_count: i64) -> String {
    if employee_count <= 1 {
        "Working alone, the owner brings in".to_string()
    } else {
        format!("Each of the {employee_count} people on the team brings in")
    }
}

fn debt_weight_pct(total_debt: Option<f64>, revenue: f64) -> Option<f64> {
    let debt = total_debt.filter(|value| *value > 0.0)?;
    let annual_revenue = revenue * MONTHS_PER_YEAR;
    if annual_revenue > 0.0 {
        Some(debt / annual_revenue * 100.0)
    } else {
        Some(100.0)
    }
}

fn valuation_range(monthly_result: f64, benchmark: &SectorBenchmark) -> Option<ValuationRange> {
    let annual_profit = monthly_result * MONTHS_PER_YEAR;
    if annual_profit <= 0.0 {
        return None;
    }
    let multiple = benchmark.valuation_multiple;
    Some(ValuationRange {
        min: annual_profit * multiple.min,
        max: annual_profit * multiple.max,
        multiple_min: multiple.min,
        multiple_max: multiple.max,
    })
}

fn payback(average_valuation: f64, annual_profit: f64) -> Option<Payback> {
    if annual_profit <= 0.0 {
        return None;
    }

    let years_decimal = average_valuation / annual_profit;
    let years = years_decimal.trunc();
    let months = ((years_decimal - years) * MONTHS_PER_YEAR).trunc();
    let band = PaybackBand::for_years(years_decimal);
    let sentence = format!(
        "{} If the business keeps its current profit, the investment is recovered in {} year(s) and {} month(s).",
        band.headline(),
        years as u32,
        months as u32
    );

    Some(Payback {
        years_decimal,
        years: years as u32,
        months: months as u32,
        band,
        sentence,
        goal_percent: (5.0 / years_decimal * 100.0).min(100.0),
    })
}

/// Mean month-over-month change across the series, skipping transitions that
/// start from a zero month.
pub(crate) fn revenue_trend(series: &[f64]) -> f64 {
    let changes = series
        .windows(2)
        .filter(|pair| pair[0] > 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0] * 100.0)
        .collect::<Vec<f64>>();

    if changes.is_empty() {
        return 0.0;
    }
    changes.iter().sum::<f64>() / changes.len() as f64
}

#[cfg(test)]
mod tests {
    use super::{PaybackBand, TrendStatus, compute, revenue_trend};
    use crate::engine::sector::{DEFAULT_BENCHMARK, resolve};
    use crate::engine::snapshot::fixtures::snapshot;

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-6
    }

    #[test]
    fn loss_making_retailer() {
        let indicators = compute(&snapshot(100000.0, 70000.0, 40000.0, 20000.0), resolve("retail"));
        assert!(close(indicators.gross_margin_pct, 30.0));
        assert!(close(indicators.monthly_result, -10000.0));
        assert_eq!(indicators.cash_runway_days, 15);
        assert!(indicators.valuation.is_none());
        assert!(indicators.payback.is_none());
    }

    #[test]
    fn profitable_business_break_even_and_valuation() {
        let indicators = compute(&snapshot(50000.0, 20000.0, 10000.0, 30000.0), resolve("services"));
        assert!(close(indicators.gross_margin_pct, 60.0));
        assert!(close(indicators.monthly_result, 20000.0));
        assert!(indicators.break_even_revenue.is_some());
        if let Some(break_even) = indicators.break_even_revenue {
            assert!((break_even - 16666.67).abs() < 0.01);
        }

        assert!(indicators.valuation.is_some());
        if let Some(valuation) = &indicators.valuation {
            assert!(close(valuation.min, 480000.0));
            assert!(close(valuation.max, 960000.0));
        }
        assert!(indicators.payback.is_some());
        if let Some(payback) = &indicators.payback {
            assert_eq!(payback.years, 3);
            assert_eq!(payback.months, 0);
            assert_eq!(payback.band, PaybackBand::Good);
            assert!(close(payback.goal_percent, 100.0));
            assert!(payback.sentence.contains("3 year(s) and 0 month(s)"));
        }
    }

    #[test]
    fn gross_margin_matches_cost_share_identity() {
        for (revenue, cost) in [(100000.0, 70000.0), (3.0, 1.0), (12345.67, 9876.54)] {
            let indicators = compute(&snapshot(revenue, cost, 0.0, 0.0), &DEFAULT_BENCHMARK);
            assert!(close(indicators.gross_margin_pct, 100.0 - cost / revenue * 100.0));
        }
    }

    #[test]
    fn break_even_is_absent_when_margin_is_not_positive() {
        let no_margin = compute(&snapshot(10000.0, 10000.0, 2000.0, 0.0), &DEFAULT_BENCHMARK);
        assert!(no_margin.break_even_revenue.is_none());

        let negative = compute(&snapshot(10000.0, 12000.0, 2000.0, 0.0), &DEFAULT_BENCHMARK);
        assert!(negative.break_even_revenue.is_none());

        let positive = compute(&snapshot(10000.0, 4000.0, 2000.0, 0.0), &DEFAULT_BENCHMARK);
        assert!(positive.break_even_revenue.is_some());
        if let Some(break_even) = positive.break_even_revenue {
            assert!(close(break_even * positive.gross_margin_pct / 100.0, 2000.0));
        }
    }

    #[test]
    fn zero_revenue_yields_zero_margin_and_no_break_even() {
        let indicators = compute(&snapshot(0.0, 0.0, 5000.0, 1000.0), &DEFAULT_BENCHMARK);
        assert!(close(indicators.gross_margin_pct, 0.0));
        assert!(indicators.break_even_revenue.is_none());
        assert_eq!(indicators.revenue_per_employee, 0.0);
    }

    #[test]
    fn runway_uses_one_real_per_day_without_fixed_expenses() {
        let indicators = compute(&snapshot(1000.0, 100.0, 0.0, 250.0), &DEFAULT_BENCHMARK);
        assert_eq!(indicators.cash_runway_days, 250);
    }

    #[test]
    fn cycle_requires_tracked_inventory() {
        let mut input = snapshot(30000.0, 15000.0, 5000.0, 10000.0);
        assert!(compute(&input, &DEFAULT_BENCHMARK).financial_cycle_days.is_none());

        input.has_inventory = true;
        input.inventory = Some(0.0);
        assert!(compute(&input, &DEFAULT_BENCHMARK).financial_cycle_days.is_none());

        input.inventory = Some(10000.0);
        input.receivables = 10000.0;
        input.payables = 2500.0;
        // 10 receivable days + 20 inventory days - 5 payable days
        assert_eq!(compute(&input, &DEFAULT_BENCHMARK).financial_cycle_days, Some(25));
    }

    #[test]
    fn cycle_can_be_negative_and_floors() {
        let mut input = snapshot(30000.0, 15000.0, 5000.0, 10000.0);
        input.has_inventory = true;
        input.inventory = Some(500.0);
        input.payables = 10000.0;
        // 0 + 1 - 20 = -19
        assert_eq!(compute(&input, &DEFAULT_BENCHMARK).financial_cycle_days, Some(-19));
    }

    #[test]
    fn min_capital_and_debt_weight() {
        let mut input = snapshot(10000.0, 4000.0, 2000.0, 0.0);
        input.receivables = 3000.0;
        input.payables = 5000.0;
        input.has_inventory = true;
        input.inventory = Some(1000.0);
        input.has_debt = true;
        input.total_debt = Some(60000.0);

        let indicators = compute(&input, &DEFAULT_BENCHMARK);
        assert!(close(indicators.min_capital_required, -1000.0));
        assert_eq!(indicators.debt_weight_pct, Some(50.0));
    }

    #[test]
    fn debt_weight_is_absent_without_debt_and_full_without_revenue() {
        let mut input = snapshot(0.0, 0.0, 1000.0, 0.0);
        assert!(compute(&input, &DEFAULT_BENCHMARK).debt_weight_pct.is_none());

        input.has_debt = true;
        input.total_debt = Some(0.0);
        assert!(compute(&input, &DEFAULT_BENCHMARK).debt_weight_pct.is_none());

        input.total_debt = Some(5000.0);
        assert_eq!(compute(&input, &DEFAULT_BENCHMARK).debt_weight_pct, Some(100.0));
    }

    #[test]
    fn trend_skips_transitions_from_zero_months() {
        assert_eq!(revenue_trend(&[0.0, 0.0, 0.0, 5000.0]), 0.0);
        assert!(close(revenue_trend(&[0.0, 100.0, 110.0, 121.0]), 10.0));
        assert!(close(revenue_trend(&[100.0, 90.0, 81.0, 72.9]), -10.0));
    }

    #[test]
    fn trend_status_thresholds() {
        let mut growing = snapshot(12000.0, 4000.0, 2000.0, 0.0);
        growing.revenue_history = vec![9000.0, 10000.0, 11000.0];
        assert_eq!(compute(&growing, &DEFAULT_BENCHMARK).trend_status, TrendStatus::Growing);

        let flat = snapshot(12000.0, 4000.0, 2000.0, 0.0);
        assert_eq!(compute(&flat, &DEFAULT_BENCHMARK).trend_status, TrendStatus::Stable);

        let mut falling = snapshot(8000.0, 4000.0, 2000.0, 0.0);
        falling.revenue_history = vec![11000.0, 10000.0, 9000.0];
        assert_eq!(compute(&falling, &DEFAULT_BENCHMARK).trend_status, TrendStatus::Declining);
    }

    #[test]
    fn payback_bands_cover_every_multiple() {
        for (sector, band) in [
            ("retail", PaybackBand::Excellent),
            ("services", PaybackBand::Good),
            ("technology", PaybackBand::Average),
        ] {
            let indicators = compute(&snapshot(50000.0, 20000.0, 10000.0, 0.0), resolve(sector));
            assert!(indicators.payback.is_some());
            if let Some(payback) = indicators.payback {
                assert_eq!(payback.band, band, "sector {sector}");
            }
        }
    }

    #[test]
    fn health_score_is_filled_in() {
        let indicators = compute(&snapshot(100000.0, 70000.0, 40000.0, 20000.0), resolve("retail"));
        assert!(indicators.health_score <= 40);
    }
}
