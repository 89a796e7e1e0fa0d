use serde::{Deserialize, Serialize};

use crate::engine::Evaluation;
use crate::engine::score::ScoreBreakdown;
use crate::engine::snapshot::FinancialSnapshot;
use crate::pre_opening::PreOpeningAssessment;

/// One offending input field, reported with every other issue in the same
/// payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotIssue {
    pub field: String,
    pub code: String,
    pub description: String,
}

impl SnapshotIssue {
    pub fn new(field: &str, code: &str, description: &str) -> Self {
        Self {
            field: field.to_string(),
            code: code.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationWarning {
    pub code: String,
    pub message: String,
}

impl EvaluationWarning {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluateData {
    pub saved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub company_name: Option<String>,
    pub reference_period: Option<String>,
    pub source: String,
    pub evaluation: Evaluation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreData {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_id: Option<String>,
    pub score: u8,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryListItem {
    pub evaluation_id: String,
    pub created_at: String,
    pub company_name: Option<String>,
    pub sector: String,
    pub reference_period: Option<String>,
    pub health_score: u8,
    pub policy_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryListData {
    pub rows: Vec<HistoryListItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryShowData {
    pub evaluation_id: String,
    pub created_at: String,
    pub snapshot: FinancialSnapshot,
    pub evaluation: Evaluation,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectorRow {
    pub key: String,
    pub label: String,
    pub margin_target_pct: f64,
    pub cash_runway_target_days: i64,
    pub cycle_target_days: i64,
    pub valuation_multiple: String,
    pub revenue_per_employee_target: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectorsData {
    pub rows: Vec<SectorRow>,
    pub default: SectorRow,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreOpeningData {
    pub as_of: String,
    pub source: String,
    pub assessment: PreOpeningAssessment,
}
