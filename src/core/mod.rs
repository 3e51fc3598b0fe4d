mod accumulation;
mod analysis;
mod error;
mod export;
mod retirement;
mod scenarios;
pub mod templates;
mod types;
mod validate;

pub use accumulation::{MILESTONE_YEARS, final_value, milestones, project, summarize};
pub use analysis::{
    AnalysisReport, AnalysisRequest, CurrencyLabel, parse_currency, portfolios_for,
    retirement_assets_for, run_analysis,
};
pub use error::AnalysisError;
pub use export::{ConfigSnapshot, export_config};
pub use retirement::{allocation_summary, blended_rate, drawdown, rate_label, simulate_withdrawal};
pub use scenarios::{ScenarioTable, run_scenarios};
pub use types::{
    AccumulationSummary, AllocationSummary, ComponentValue, Currency, MilestoneSummary,
    PortfolioComponent, ProjectionPoint, RetirementAsset, WithdrawalScenario,
};
pub use validate::{ALLOCATION_TOLERANCE, validate_accumulation, validate_retirement};
