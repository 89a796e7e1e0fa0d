use crate::CoreResult;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{SectorRow, SectorsData};
use crate::engine::sector::{DEFAULT_BENCHMARK, SectorBenchmark, all_benchmarks};

pub fn list() -> CoreResult<SuccessEnvelope> {
    let data = SectorsData {
        rows: all_benchmarks().iter().map(sector_row).collect(),
        default: sector_row(&DEFAULT_BENCHMARK),
    };
    success("sectors", data)
}

fn sector_row(benchmark: &SectorBenchmark) -> SectorRow {
    SectorRow {
        key: benchmark.key().to_string(),
        label: benchmark.label().to_string(),
        margin_target_pct: benchmark.margin_target_pct,
        cash_runway_target_days: benchmark.cash_runway_target_days,
        cycle_target_days: benchmark.cycle_target_days,
        valuation_multiple: benchmark.multiple_label(),
        revenue_per_employee_target: benchmark.revenue_per_employee_target,
    }
}

#[cfg(test)]
mod tests {
    use super::list;

    #[test]
    fn lists_every_sector_plus_the_default() {
        let result = list();
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            assert_eq!(envelope.command, "sectors");
            let rows = envelope.data["rows"].as_array().map(Vec::len);
            assert_eq!(rows, Some(21));
            assert_eq!(envelope.data["default"]["key"], "default");
            assert_eq!(envelope.data["rows"][0]["key"], "retail");
            assert_eq!(envelope.data["rows"][0]["valuation_multiple"], "1.5x - 2.5x");
        }
    }
}
