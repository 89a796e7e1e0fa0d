//! Financial health engine: indicators, score, problems, diagnostics and the
//! 30/60/90-day plan for one monthly snapshot.
//!
//! Every step is a pure function of its inputs. Benchmarks come from a static
//! table, so evaluations can run on any number of threads at once.

pub mod diagnostics;
pub mod indicators;
pub mod money;
pub mod plan;
pub mod policy;
pub mod problems;
pub mod score;
pub mod sector;
pub mod snapshot;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::CoreResult;
use crate::contracts::types::EvaluationWarning;
use diagnostics::Diagnostics;
use indicators::IndicatorSet;
use plan::{Plan, PlanContext};
use policy::{DETECTION_POLICY_VERSION, PLAN_POLICY_VERSION, SCORE_POLICY_VERSION};
use problems::ProblemSet;
use score::ScoreBreakdown;
use sector::Sector;
use snapshot::FinancialSnapshot;

pub use score::score;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyVersions {
    pub score: String,
    pub detection: String,
    pub plan: String,
}

impl PolicyVersions {
    pub fn current() -> Self {
        Self {
            score: SCORE_POLICY_VERSION.to_string(),
            detection: DETECTION_POLICY_VERSION.to_string(),
            plan: PLAN_POLICY_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorInfo {
    pub key: String,
    pub label: String,
    /// False when the key is not in the benchmark table and defaults were used.
    pub known: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub policy_version: PolicyVersions,
    pub sector: SectorInfo,
    pub indicators: IndicatorSet,
    pub score_breakdown: ScoreBreakdown,
    pub problems: ProblemSet,
    pub diagnostics: Diagnostics,
    pub plan: Plan,
    pub warnings: Vec<EvaluationWarning>,
}

/// Validates the snapshot and runs every engine step against its sector's
/// benchmarks.
pub fn evaluate(snapshot: &FinancialSnapshot) -> CoreResult<Evaluation> {
    snapshot.validate()?;

    let known = Sector::from_key(&snapshot.sector).is_some();
    if !known {
        warn!(sector = %snapshot.sector, "unknown sector, using default benchmarks");
    }
    let benchmark = sector::resolve(&snapshot.sector);

    let indicators = indicators::compute(snapshot, benchmark);
    let score_breakdown = score::explain(&indicators);
    debug!(
        score = score_breakdown.final_score,
        caps = score_breakdown.caps_applied.len(),
        "scored snapshot"
    );

    let problems = problems::detect(snapshot, &indicators, benchmark);
    debug!(problems = problems.len(), "detected problems");

    let diagnostics = diagnostics::generate(&indicators, &problems, benchmark);
    let plan = plan::build(&PlanContext {
        snapshot,
        indicators: &indicators,
        problems: &problems,
        benchmark,
    });

    Ok(Evaluation {
        policy_version: PolicyVersions::current(),
        sector: SectorInfo {
            key: snapshot.sector.clone(),
            label: sector::label_for(&snapshot.sector),
            known,
        },
        indicators,
        score_breakdown,
        problems,
        diagnostics,
        plan,
        warnings: snapshot.coherence_warnings(),
    })
}

#[cfg(test)]
mod tests {
    use super::plan::Horizon;
    use super::{Evaluation, evaluate};
    use super::problems::{ProblemKind, Severity};
    use super::snapshot::MAX_AMOUNT;
    use super::snapshot::fixtures::snapshot;

    #[test]
    fn loss_making_retailer_end_to_end() {
        let result = evaluate(&snapshot(100000.0, 70000.0, 40000.0, 20000.0));
        assert!(result.is_ok());
        if let Ok(evaluation) = result {
            assert!((evaluation.indicators.gross_margin_pct - 30.0).abs() < 1e-9);
            assert_eq!(evaluation.indicators.monthly_result, -10000.0);
            assert!(evaluation.indicators.health_score <= 40);
            assert_eq!(
                evaluation.indicators.health_score,
                evaluation.score_breakdown.final_score
            );
            assert_eq!(
                evaluation
                    .problems
                    .get(ProblemKind::NegativeResult)
                    .map(|problem| problem.severity),
                Some(Severity::Critical)
            );
            assert_eq!(evaluation.sector.label, "Retail");
            assert!(evaluation.sector.known);
            for horizon in Horizon::ALL {
                assert_eq!(evaluation.plan.horizon(horizon).len(), 4);
            }
        }
    }

    #[test]
    fn invalid_snapshot_is_rejected_before_computing() {
        let mut input = snapshot(100000.0, 70000.0, 40000.0, 20000.0);
        input.revenue_history = vec![1.0];
        input.employee_count = 0;
        let result = evaluate(&input);
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "invalid_snapshot");
        }
    }

    #[test]
    fn unknown_sector_uses_defaults_and_warns() {
        let mut input = snapshot(50000.0, 20000.0, 10000.0, 30000.0);
        input.sector = "space_mining".to_string();
        let result = evaluate(&input);
        assert!(result.is_ok());
        if let Ok(evaluation) = result {
            assert!(!evaluation.sector.known);
            assert_eq!(evaluation.sector.label, "space_mining");
            assert!(
                evaluation
                    .warnings
                    .iter()
                    .any(|warning| warning.code == "unknown_sector")
            );
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let mut input = snapshot(80000.0, 50000.0, 20000.0, 15000.0);
        input.revenue_history = vec![60000.0, 70000.0, 75000.0];
        input.receivables = 12000.0;
        input.payables = 9000.0;
        input.has_inventory = true;
        input.inventory = Some(20000.0);

        let first = evaluate(&input).map(|evaluation| serde_json::to_string(&evaluation).ok());
        let second = evaluate(&input).map(|evaluation| serde_json::to_string(&evaluation).ok());
        assert!(first.is_ok());
        assert_eq!(first.ok().flatten(), second.ok().flatten());
    }

    #[test]
    fn largest_accepted_amounts_reload_from_json() {
        let result = evaluate(&snapshot(MAX_AMOUNT, 0.0, 0.0, MAX_AMOUNT));
        assert!(result.is_ok());
        if let Ok(evaluation) = result {
            assert!(evaluation.indicators.valuation.is_some());
            let encoded = serde_json::to_string(&evaluation);
            assert!(encoded.is_ok());
            if let Ok(text) = encoded {
                let reloaded = serde_json::from_str::<Evaluation>(&text);
                assert!(reloaded.is_ok());
                assert_eq!(
                    reloaded.ok().map(|copy| copy.indicators.health_score),
                    Some(evaluation.indicators.health_score)
                );
            }
        }
    }

    #[test]
    fn evaluations_run_in_parallel() {
        let inputs = (1..=8)
            .map(|step| snapshot(10000.0 * f64::from(step), 6000.0, 3000.0, 5000.0))
            .collect::<Vec<_>>();
        let sequential = inputs
            .iter()
            .map(|input| evaluate(input).map(|evaluation| evaluation.indicators.health_score).ok())
            .collect::<Vec<_>>();

        let parallel = std::thread::scope(|scope| {
            let handles = inputs
                .iter()
                .map(|input| {
                    scope.spawn(move || {
                        evaluate(input)
                            .map(|evaluation| evaluation.indicators.health_score)
                            .ok()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join().ok().flatten())
                .collect::<Vec<_>>()
        });

        assert_eq!(sequential, parallel);
    }
}
