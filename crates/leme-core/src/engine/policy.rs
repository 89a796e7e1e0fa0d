use std::ops::RangeInclusive;

use crate::engine::indicators::{IndicatorSet, TrendStatus};

/// Deterministic scoring policy identifier.
///
/// Emitted with every evaluation and stored alongside it, so a score can be
/// traced back to the thresholds that produced it after they change.
pub const SCORE_POLICY_VERSION: &str = "score/v1";
pub const DETECTION_POLICY_VERSION: &str = "detection/v1";
pub const PLAN_POLICY_VERSION: &str = "plan/v1";

/// Plan priority bands for `plan/v1`. Templates answering a critical problem
/// sit in the first band, high or medium problems in the second, profit and
/// reserve opportunities in the third, always-eligible routines in the last.
pub const CRITICAL_PRIORITY: RangeInclusive<u8> = 85..=100;
pub const HIGH_PRIORITY: RangeInclusive<u8> = 55..=85;
pub const OPPORTUNITY_PRIORITY: RangeInclusive<u8> = 21..=54;
pub const ROUTINE_PRIORITY: RangeInclusive<u8> = 5..=20;

/// `(threshold, points)`: the first tier whose threshold the value reaches wins.
pub type Tier = (f64, u8);

#[derive(Debug, Clone, Copy)]
pub struct ScorePolicy {
    pub margin_max: u8,
    pub margin_tiers: [Tier; 4],
    pub result_max: u8,
    /// Tiers on monthly result as a share of revenue, for profitable months.
    pub result_tiers: [Tier; 3],
    pub result_positive_points: u8,
    pub result_break_even_points: u8,
    pub runway_max: u8,
    pub runway_tiers: [Tier; 4],
    pub runway_floor_points: u8,
    pub break_even_max: u8,
    /// Upper bounds (exclusive) on break-even as a share of revenue.
    pub break_even_tiers: [Tier; 4],
    pub debt_max: u8,
    /// Upper bounds (exclusive) on debt weight.
    pub debt_tiers: [Tier; 4],
    pub trend_max: u8,
    pub trend_tiers: [Tier; 4],
}

impl ScorePolicy {
    pub fn max_total(self) -> u32 {
        u32::from(self.margin_max)
            + u32::from(self.result_max)
            + u32::from(self.runway_max)
            + u32::from(self.break_even_max)
            + u32::from(self.debt_max)
            + u32::from(self.trend_max)
    }

    pub fn margin_points(self, gross_margin_pct: f64) -> u8 {
        points_at_least(gross_margin_pct, &self.margin_tiers, 0)
    }

    pub fn result_points(self, monthly_result: f64, result_margin_pct: Option<f64>) -> u8 {
        if monthly_result > 0.0 {
            match result_margin_pct {
                Some(share) => points_at_least(share, &self.result_tiers, self.result_positive_points),
                None => self.result_positive_points,
            }
        } else if monthly_result == 0.0 {
            self.result_break_even_points
        } else {
            0
        }
    }

    pub fn runway_points(self, cash_runway_days: i64) -> u8 {
        points_at_least(cash_runway_days as f64, &self.runway_tiers, self.runway_floor_points)
    }

    pub fn break_even_points(self, break_even_ratio_pct: Option<f64>) -> u8 {
        match break_even_ratio_pct {
            Some(ratio) => points_below(ratio, &self.break_even_tiers, 0),
            None => 0,
        }
    }

    pub fn debt_points(self, debt_weight_pct: Option<f64>) -> u8 {
        match debt_weight_pct {
            Some(weight) => points_below(weight, &self.debt_tiers, 0),
            None => self.debt_max,
        }
    }

    pub fn trend_points(self, revenue_trend_pct: f64) -> u8 {
        points_at_least(revenue_trend_pct, &self.trend_tiers, 0)
    }
}

fn points_at_least(value: f64, tiers: &[Tier], otherwise: u8) -> u8 {
    tiers
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, points)| *points)
        .unwrap_or(otherwise)
}

fn points_below(value: f64, tiers: &[Tier], otherwise: u8) -> u8 {
    tiers
        .iter()
        .find(|(bound, _)| value < *bound)
        .map(|(_, points)| *points)
        .unwrap_or(otherwise)
}

pub const SCORE_POLICY_V1: ScorePolicy = ScorePolicy {
    margin_max: 20,
    margin_tiers: [(40.0, 20), (25.0, 14), (15.0, 8), (0.0, 3)],
    result_max: 25,
    result_tiers: [(15.0, 25), (10.0, 20), (5.0, 14)],
    result_positive_points: 8,
    result_break_even_points: 3,
    runway_max: 20,
    runway_tiers: [(120.0, 20), (90.0, 16), (60.0, 11), (30.0, 6)],
    runway_floor_points: 2,
    break_even_max: 15,
    break_even_tiers: [(50.0, 15), (70.0, 11), (85.0, 7), (100.0, 3)],
    debt_max: 10,
    debt_tiers: [(20.0, 10), (30.0, 7), (50.0, 4), (100.0, 1)],
    trend_max: 10,
    trend_tiers: [(10.0, 10), (5.0, 8), (-5.0, 6), (-10.0, 3)],
};

/// A ceiling on the final score that fires when its predicate holds.
///
/// Caps only ever lower the score; a predicate over a `None` indicator must
/// return false.
#[derive(Clone, Copy)]
pub struct ScoreCap {
    pub id: &'static str,
    pub limit: u8,
    pub applies: fn(&IndicatorSet) -> bool,
}

impl std::fmt::Debug for ScoreCap {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ScoreCap")
            .field("id", &self.id)
            .field("limit", &self.limit)
            .finish()
    }
}

/// Safety caps in application order; the last three are the cross penalties.
pub const SCORE_CAPS_V1: [ScoreCap; 12] = [
    ScoreCap {
        id: "negative_result",
        limit: 40,
        applies: |indicators| indicators.monthly_result < 0.0,
    },
    ScoreCap {
        id: "thin_profit",
        limit: 65,
        applies: |indicators| {
            indicators.monthly_result > 0.0
                && indicators
                    .result_margin_pct()
                    .is_some_and(|share| share < 5.0)
        },
    },
    ScoreCap {
        id: "runway_under_30_days",
        limit: 50,
        applies: |indicators| indicators.cash_runway_days < 30,
    },
    ScoreCap {
        id: "runway_under_60_days",
        limit: 65,
        applies: |indicators| indicators.cash_runway_days < 60,
    },
    ScoreCap {
        id: "runway_under_90_days",
        limit: 72,
        applies: |indicators| indicators.cash_runway_days < 90,
    },
    ScoreCap {
        id: "margin_under_10",
        limit: 60,
        applies: |indicators| indicators.gross_margin_pct < 10.0,
    },
    ScoreCap {
        id: "break_even_above_revenue",
        limit: 45,
        applies: |indicators| {
            indicators
                .break_even_ratio_pct()
                .is_some_and(|ratio| ratio >= 100.0)
        },
    },
    ScoreCap {
        id: "debt_above_50",
        limit: 55,
        applies: |indicators| indicators.debt_weight_pct.is_some_and(|weight| weight > 50.0),
    },
    ScoreCap {
        id: "sharp_revenue_decline",
        limit: 68,
        applies: |indicators| indicators.revenue_trend_pct < -10.0,
    },
    ScoreCap {
        id: "thin_margin_and_short_runway",
        limit: 42,
        applies: |indicators| {
            indicators.gross_margin_pct < 15.0 && indicators.cash_runway_days < 60
        },
    },
    ScoreCap {
        id: "loss_and_short_runway",
        limit: 30,
        applies: |indicators| indicators.monthly_result < 0.0 && indicators.cash_runway_days < 60,
    },
    ScoreCap {
        id: "loss_and_heavy_debt",
        limit: 25,
        applies: |indicators| {
            indicators.monthly_result < 0.0
                && indicators.debt_weight_pct.is_some_and(|weight| weight > 30.0)
        },
    },
];

#[derive(Debug, Clone, Copy)]
pub struct TrendPolicy {
    pub growing_above_pct: f64,
    pub declining_below_pct: f64,
}

impl TrendPolicy {
    pub fn status_for(self, revenue_trend_pct: f64) -> TrendStatus {
        if revenue_trend_pct > self.growing_above_pct {
            TrendStatus::Growing
        } else if revenue_trend_pct < self.declining_below_pct {
            TrendStatus::Declining
        } else {
            TrendStatus::Stable
        }
    }
}

pub const TREND_POLICY_V1: TrendPolicy = TrendPolicy {
    growing_above_pct: 5.0,
    declining_below_pct: -5.0,
};

/// Thresholds for the problem detector. Ratios are relative to the sector
/// benchmark; percentages and days are absolute.
#[derive(Debug, Clone, Copy)]
pub struct DetectionPolicy {
    pub loss_target_share_of_fixed: f64,
    pub runway_critical_days: i64,
    pub runway_high_days: i64,
    pub margin_critical_ratio: f64,
    pub margin_high_ratio: f64,
    pub break_even_critical_pct: f64,
    pub break_even_high_pct: f64,
    pub debt_critical_pct: f64,
    pub debt_high_pct: f64,
    pub debt_medium_pct: f64,
    pub cycle_high_slack_days: i64,
    pub productivity_high_ratio: f64,
    pub decline_critical_pct: f64,
    pub decline_high_pct: f64,
    pub shock_revenue_drop: f64,
}

pub const DETECTION_POLICY_V1: DetectionPolicy = DetectionPolicy {
    loss_target_share_of_fixed: 0.10,
    runway_critical_days: 15,
    runway_high_days: 30,
    margin_critical_ratio: 0.50,
    margin_high_ratio: 0.75,
    break_even_critical_pct: 100.0,
    break_even_high_pct: 85.0,
    debt_critical_pct: 100.0,
    debt_high_pct: 50.0,
    debt_medium_pct: 30.0,
    cycle_high_slack_days: 30,
    productivity_high_ratio: 0.50,
    decline_critical_pct: -10.0,
    decline_high_pct: -5.0,
    shock_revenue_drop: 0.30,
};

pub const MAX_STRENGTHS: usize = 4;
pub const MAX_RISKS: usize = 5;
pub const PLAN_ITEMS_PER_HORIZON: usize = 4;
