use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Retail,
    Wholesale,
    Services,
    Manufacturing,
    Technology,
    FoodService,
    Healthcare,
    Education,
    Construction,
    Agribusiness,
    Transport,
    Hospitality,
    RealEstate,
    FinancialServices,
    Communications,
    Energy,
    Textiles,
    Metalworking,
    Furniture,
    Printing,
    Recycling,
}

impl Sector {
    pub const ALL: [Sector; 21] = [
        Sector::Retail,
        Sector::Wholesale,
        Sector::Services,
        Sector::Manufacturing,
        Sector::Technology,
        Sector::FoodService,
        Sector::Healthcare,
        Sector::Education,
        Sector::Construction,
        Sector::Agribusiness,
        Sector::Transport,
        Sector::Hospitality,
        Sector::RealEstate,
        Sector::FinancialServices,
        Sector::Communications,
        Sector::Energy,
        Sector::Textiles,
        Sector::Metalworking,
        Sector::Furniture,
        Sector::Printing,
        Sector::Recycling,
    ];

    pub fn as_key(self) -> &'static str {
        match self {
            Self::Retail => "retail",
            Self::Wholesale => "wholesale",
            Self::Services => "services",
            Self::Manufacturing => "manufacturing",
            Self::Technology => "technology",
            Self::FoodService => "food_service",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Construction => "construction",
            Self::Agribusiness => "agribusiness",
            Self::Transport => "transport",
            Self::Hospitality => "hospitality",
            Self::RealEstate => "real_estate",
            Self::FinancialServices => "financial_services",
            Self::Communications => "communications",
            Self::Energy => "energy",
            Self::Textiles => "textiles",
            Self::Metalworking => "metalworking",
            Self::Furniture => "furniture",
            Self::Printing => "printing",
            Self::Recycling => "recycling",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sector| sector.as_key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Retail => "Retail",
            Self::Wholesale => "Wholesale",
            Self::Services => "Services",
            Self::Manufacturing => "Manufacturing",
            Self::Technology => "Technology",
            Self::FoodService => "Food & Beverage",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Construction => "Construction",
            Self::Agribusiness => "Agribusiness",
            Self::Transport => "Transport & Logistics",
            Self::Hospitality => "Hospitality & Tourism",
            Self::RealEstate => "Real Estate",
            Self::FinancialServices => "Financial Services",
            Self::Communications => "Communications & Marketing",
            Self::Energy => "Energy",
            Self::Textiles => "Textiles & Apparel",
            Self::Metalworking => "Metalworking",
            Self::Furniture => "Furniture",
            Self::Printing => "Printing & Graphics",
            Self::Recycling => "Recycling",
        }
    }
}

/// Valuation multiple applied to annual profit, as `min..=max` times.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MultipleRange {
    pub min: f64,
    pub max: f64,
}

/// Fixed reference values for one sector.
///
/// The engine never mutates these; every evaluation receives the record
/// resolved for its sector key (or [`DEFAULT_BENCHMARK`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectorBenchmark {
    pub sector: Option<Sector>,
    pub margin_target_pct: f64,
    pub cash_runway_target_days: i64,
    pub cycle_target_days: i64,
    pub valuation_multiple: MultipleRange,
    pub revenue_per_employee_target: f64,
    pub capital_base: f64,
    pub employee_cost: f64,
    pub revenue_reference: f64,
}

impl SectorBenchmark {
    pub fn key(&self) -> &'static str {
        self.sector.map(Sector::as_key).unwrap_or("default")
    }

    pub fn label(&self) -> &'static str {
        self.sector.map(Sector::label).unwrap_or("Other")
    }

    pub fn multiple_label(&self) -> String {
        format!(
            "{:.1}x - {:.1}x",
            self.valuation_multiple.min, self.valuation_multiple.max
        )
    }
}

const LEAN_TEAM_COST: f64 = 6000.0;
const STANDARD_TEAM_COST: f64 = 8000.0;
const STAFF_HEAVY_TEAM_COST: f64 = 10000.0;

pub const DEFAULT_BENCHMARK: SectorBenchmark = SectorBenchmark {
    sector: None,
    margin_target_pct: 35.0,
    cash_runway_target_days: 45,
    cycle_target_days: 25,
    valuation_multiple: MultipleRange { min: 2.0, max: 5.0 },
    revenue_per_employee_target: 8000.0,
    capital_base: 25000.0,
    employee_cost: STANDARD_TEAM_COST,
    revenue_reference: 15000.0,
};

#[allow(clippy::too_many_arguments)]
const fn benchmark(
    sector: Sector,
    margin_target_pct: f64,
    cash_runway_target_days: i64,
    cycle_target_days: i64,
    multiple: (f64, f64),
    revenue_per_employee_target: f64,
    capital_base: f64,
    employee_cost: f64,
    revenue_reference: f64,
) -> SectorBenchmark {
    SectorBenchmark {
        sector: Some(sector),
        margin_target_pct,
        cash_runway_target_days,
        cycle_target_days,
        valuation_multiple: MultipleRange {
            min: multiple.0,
            max: multiple.1,
        },
        revenue_per_employee_target,
        capital_base,
        employee_cost,
        revenue_reference,
    }
}

static BENCHMARKS: [SectorBenchmark; 21] = [
    benchmark(Sector::Retail, 30.0, 45, 15, (1.5, 2.5), 8000.0, 25000.0, STANDARD_TEAM_COST, 15000.0),
    benchmark(Sector::Wholesale, 20.0, 45, 20, (1.5, 2.5), 15000.0, 40000.0, STANDARD_TEAM_COST, 30000.0),
    benchmark(Sector::Services, 50.0, 45, 10, (2.0, 4.0), 6000.0, 15000.0, LEAN_TEAM_COST, 10000.0),
    benchmark(Sector::Manufacturing, 35.0, 60, 30, (2.5, 4.5), 10000.0, 50000.0, STANDARD_TEAM_COST, 25000.0),
    benchmark(Sector::Technology, 60.0, 60, 15, (3.0, 6.0), 12000.0, 20000.0, LEAN_TEAM_COST, 12000.0),
    benchmark(Sector::FoodService, 35.0, 30, 10, (1.5, 3.0), 5000.0, 30000.0, STAFF_HEAVY_TEAM_COST, 18000.0),
    benchmark(Sector::Healthcare, 50.0, 45, 20, (2.5, 5.0), 8000.0, 25000.0, STAFF_HEAVY_TEAM_COST, 15000.0),
    benchmark(Sector::Education, 50.0, 45, 25, (2.0, 4.0), 5000.0, 18000.0, LEAN_TEAM_COST, 10000.0),
    benchmark(Sector::Construction, 30.0, 45, 25, (1.5, 3.0), 10000.0, 45000.0, STANDARD_TEAM_COST, 25000.0),
    benchmark(Sector::Agribusiness, 30.0, 45, 25, (2.0, 4.0), 12000.0, 35000.0, STANDARD_TEAM_COST, 20000.0),
    benchmark(Sector::Transport, 25.0, 45, 25, (1.5, 3.0), 10000.0, 30000.0, STANDARD_TEAM_COST, 18000.0),
    benchmark(Sector::Hospitality, 40.0, 45, 25, (2.0, 4.0), 6000.0, 35000.0, STAFF_HEAVY_TEAM_COST, 20000.0),
    benchmark(Sector::RealEstate, 35.0, 45, 25, (2.0, 4.0), 10000.0, 20000.0, STANDARD_TEAM_COST, 12000.0),
    benchmark(Sector::FinancialServices, 50.0, 45, 25, (3.0, 5.0), 15000.0, 25000.0, STANDARD_TEAM_COST, 15000.0),
    benchmark(Sector::Communications, 45.0, 45, 25, (2.5, 4.5), 8000.0, 15000.0, LEAN_TEAM_COST, 10000.0),
    benchmark(Sector::Energy, 40.0, 45, 25, (3.0, 5.0), 15000.0, 40000.0, STANDARD_TEAM_COST, 22000.0),
    benchmark(Sector::Textiles, 35.0, 45, 25, (1.5, 3.0), 7000.0, 30000.0, STANDARD_TEAM_COST, 18000.0),
    benchmark(Sector::Metalworking, 30.0, 45, 25, (2.0, 3.5), 10000.0, 45000.0, STANDARD_TEAM_COST, 25000.0),
    benchmark(Sector::Furniture, 35.0, 45, 25, (1.5, 3.0), 7000.0, 35000.0, STANDARD_TEAM_COST, 20000.0),
    benchmark(Sector::Printing, 35.0, 45, 25, (1.5, 3.0), 7000.0, 25000.0, STANDARD_TEAM_COST, 12000.0),
    benchmark(Sector::Recycling, 35.0, 45, 25, (2.0, 4.0), 8000.0, 30000.0, STANDARD_TEAM_COST, 15000.0),
];

pub fn all_benchmarks() -> &'static [SectorBenchmark] {
    &BENCHMARKS
}

pub fn benchmark_for(sector: Sector) -> &'static SectorBenchmark {
    BENCHMARKS
        .iter()
        .find(|entry| entry.sector == Some(sector))
        .unwrap_or(&DEFAULT_BENCHMARK)
}

/// Resolves a sector key to its benchmark. Unknown keys get [`DEFAULT_BENCHMARK`].
pub fn resolve(key: &str) -> &'static SectorBenchmark {
    match Sector::from_key(key) {
        Some(sector) => benchmark_for(sector),
        None => &DEFAULT_BENCHMARK,
    }
}

/// Display label for a sector key; unknown keys are echoed back unchanged.
pub fn label_for(key: &str) -> String {
    match Sector::from_key(key) {
        Some(sector) => sector.label().to_string(),
        None => key.to_string(),
    }
}

pub(crate) fn is_well_formed_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|value| value.is_ascii_lowercase() || value == '_')
}
