use serde::{Deserialize, Serialize};

use crate::engine::indicators::IndicatorSet;
use crate::engine::policy::{SCORE_CAPS_V1, SCORE_POLICY_V1, SCORE_POLICY_VERSION};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubScore {
    pub dimension: String,
    pub points: u8,
    pub max_points: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCap {
    pub rule: String,
    pub limit: u8,
}

/// How a health score was reached: points per dimension, then every cap
/// that fired, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub policy_version: String,
    pub sub_scores: Vec<SubScore>,
    pub raw_total: u32,
    pub caps_applied: Vec<AppliedCap>,
    pub final_score: u8,
}

/// Health score in `0..=100`. Ignores `indicators.health_score`.
pub fn score(indicators: &IndicatorSet) -> u8 {
    explain(indicators).final_score
}

pub fn explain(indicators: &IndicatorSet) -> ScoreBreakdown {
    let policy = SCORE_POLICY_V1;
    let sub_scores = vec![
        sub_score(
            "gross_margin",
            policy.margin_points(indicators.gross_margin_pct),
            policy.margin_max,
        ),
        sub_score(
            "monthly_result",
            policy.result_points(indicators.monthly_result, indicators.result_margin_pct()),
            policy.result_max,
        ),
        sub_score(
            "cash_runway",
            policy.runway_points(indicators.cash_runway_days),
            policy.runway_max,
        ),
        sub_score(
            "break_even",
            policy.break_even_points(indicators.break_even_ratio_pct()),
            policy.break_even_max,
        ),
        sub_score(
            "debt_weight",
            policy.debt_points(indicators.debt_weight_pct),
            policy.debt_max,
        ),
        sub_score(
            "revenue_trend",
            policy.trend_points(indicators.revenue_trend_pct),
            policy.trend_max,
        ),
    ];

    let raw_total = sub_scores
        .iter()
        .map(|entry| u32::from(entry.points))
        .sum::<u32>();

    let mut total = raw_total;
    let mut caps_applied = Vec::new();
    for cap in SCORE_CAPS_V1 {
        if (cap.applies)(indicators) {
            total = total.min(u32::from(cap.limit));
            caps_applied.push(AppliedCap {
                rule: cap.id.to_string(),
                limit: cap.limit,
            });
        }
    }

    ScoreBreakdown {
        policy_version: SCORE_POLICY_VERSION.to_string(),
        sub_scores,
        raw_total,
        caps_applied,
        final_score: total.min(100) as u8,
    }
}

fn sub_score(dimension: &str, points: u8, max_points: u8) -> SubScore {
    SubScore {
        dimension: dimension.to_string(),
        points,
        max_points,
    }
}
