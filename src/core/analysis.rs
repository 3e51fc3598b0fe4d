use std::collections::BTreeMap;

use serde::Serialize;

use super::accumulation::{final_value, milestones, project, summarize};
use super::error::AnalysisError;
use super::retirement::allocation_summary;
use super::scenarios::{ScenarioTable, run_scenarios};
use super::templates::{
    accumulation_template, default_portfolios, default_retirement_assets, retirement_template,
};
use super::types::{
    AccumulationSummary, AllocationSummary, Currency, MilestoneSummary, PortfolioComponent,
    ProjectionPoint, RetirementAsset,
};
use super::validate::{validate_accumulation, validate_retirement};

const CUSTOM_TEMPLATE: &str = "custom";

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub years_to_retirement: u32,
    pub retirement_years: u32,
    pub currency: Currency,
    /// Fractions, e.g. `0.04` for a 4% withdrawal rate.
    pub withdrawal_rates: Vec<f64>,
    pub portfolios: Vec<PortfolioComponent>,
    pub retirement_assets: Vec<RetirementAsset>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyLabel {
    pub code: &'static str,
    pub symbol: &'static str,
}

impl From<Currency> for CurrencyLabel {
    fn from(value: Currency) -> Self {
        Self {
            code: value.code(),
            symbol: value.symbol(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub currency: CurrencyLabel,
    pub years_to_retirement: u32,
    pub retirement_years: u32,
    pub final_value: f64,
    pub accumulation: AccumulationSummary,
    pub allocation: AllocationSummary,
    pub projection: Vec<ProjectionPoint>,
    pub milestones: BTreeMap<u32, MilestoneSummary>,
    pub scenarios: ScenarioTable,
}

/// Validates both phases, then projects accumulation and runs every withdrawal scenario.
pub fn run_analysis(request: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
    if !validate_accumulation(&request.portfolios) {
        return Err(AnalysisError::InvalidAccumulation);
    }
    if !validate_retirement(&request.retirement_assets) {
        return Err(AnalysisError::InvalidRetirement);
    }

    let accumulation = summarize(&request.portfolios);
    let projection = project(&request.portfolios, request.years_to_retirement);
    let retirement_start = final_value(&projection);
    tracing::debug!(
        years = request.years_to_retirement,
        components = request.portfolios.len(),
        final_value = retirement_start,
        "accumulation projected"
    );

    let scenarios = run_scenarios(
        retirement_start,
        &request.withdrawal_rates,
        request.retirement_years,
        &request.retirement_assets,
    );
    tracing::debug!(
        scenarios = scenarios.len(),
        retirement_years = request.retirement_years,
        "withdrawal scenarios computed"
    );

    Ok(AnalysisReport {
        currency: request.currency.into(),
        years_to_retirement: request.years_to_retirement,
        retirement_years: request.retirement_years,
        final_value: retirement_start,
        accumulation,
        allocation: allocation_summary(&request.retirement_assets),
        milestones: milestones(
            &projection,
            request.years_to_retirement,
            accumulation.total_initial,
        ),
        projection,
        scenarios,
    })
}

/// Components for an optional template name; no name or `Custom` gives the defaults.
pub fn portfolios_for(template: Option<&str>) -> Result<Vec<PortfolioComponent>, AnalysisError> {
    match template {
        None => Ok(default_portfolios()),
        Some(name) if name.trim().eq_ignore_ascii_case(CUSTOM_TEMPLATE) => Ok(default_portfolios()),
        Some(name) => {
            accumulation_template(name).ok_or_else(|| AnalysisError::UnknownTemplate(name.to_string()))
        }
    }
}

pub fn retirement_assets_for(
    template: Option<&str>,
) -> Result<Vec<RetirementAsset>, AnalysisError> {
    match template {
        None => Ok(default_retirement_assets()),
        Some(name) if name.trim().eq_ignore_ascii_case(CUSTOM_TEMPLATE) => {
            Ok(default_retirement_assets())
        }
        Some(name) => retirement_template(name)
            .ok_or_else(|| AnalysisError::UnknownRetirementTemplate(name.to_string())),
    }
}

pub fn parse_currency(code: &str) -> Result<Currency, AnalysisError> {
    Currency::from_code(code).ok_or_else(|| AnalysisError::UnknownCurrency(code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_request() -> AnalysisRequest {
        AnalysisRequest {
            years_to_retirement: 15,
            retirement_years: 30,
            currency: Currency::Gbp,
            withdrawal_rates: vec![0.03, 0.04, 0.05],
            portfolios: default_portfolios(),
            retirement_assets: default_retirement_assets(),
        }
    }

    #[test]
    fn report_links_projection_to_scenarios() {
        let report = run_analysis(&sample_request()).expect("valid request");

        assert_eq!(report.projection.len(), 16);
        assert_approx(report.final_value, report.projection[15].total);
        assert_eq!(report.scenarios.len(), 3);
        for scenario in report.scenarios.iter() {
            assert_approx(scenario.trajectory[0], report.final_value);
            assert_eq!(scenario.trajectory.len(), 31);
        }
        assert_eq!(report.milestones.keys().copied().collect::<Vec<_>>(), vec![5, 10, 15]);
        assert_approx(report.accumulation.weighted_rate, 0.07);
        assert_approx(report.allocation.blended_rate, 0.048);
    }

    #[test]
    fn one_year_example_flows_through() {
        let mut request = sample_request();
        request.years_to_retirement = 1;
        request.retirement_years = 1;
        request.withdrawal_rates = vec![0.04];

        let report = run_analysis(&request).expect("valid request");
        assert_approx(report.final_value, 64_200.0);
        let scenario = report.scenarios.get("4.0%").expect("4% scenario");
        assert_approx(scenario.annual_withdrawal, 2_568.0);
        assert_approx(scenario.final_value, 64_613.376);
        assert_eq!(report.milestones.keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn invalid_accumulation_is_reported_first() {
        let mut request = sample_request();
        request.portfolios[0].name = " ".to_string();
        request.retirement_assets.clear();

        let err = run_analysis(&request).expect_err("must reject");
        assert!(matches!(err, AnalysisError::InvalidAccumulation));
    }

    #[test]
    fn invalid_retirement_allocation_is_rejected() {
        let mut request = sample_request();
        request.retirement_assets[0].allocation = 0.50;

        let err = run_analysis(&request).expect_err("must reject");
        assert!(matches!(err, AnalysisError::InvalidRetirement));
        assert!(err.to_string().contains("100%"));
    }

    #[test]
    fn empty_rate_set_is_not_an_error() {
        let mut request = sample_request();
        request.withdrawal_rates.clear();

        let report = run_analysis(&request).expect("valid request");
        assert!(report.scenarios.is_empty());
    }

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let report = run_analysis(&sample_request()).expect("valid request");
        let json = serde_json::to_value(&report).expect("serialize");

        assert_eq!(json["currency"]["symbol"], "£");
        assert!(json["finalValue"].is_number());
        assert!(json["accumulation"]["weightedRate"].is_number());
        assert!(json["allocation"]["totalAllocation"].is_number());
        assert!(json["milestones"]["10"]["growth"].is_number());
        assert!(json["scenarios"]["4.0%"]["monthlyWithdrawal"].is_number());
        assert_eq!(json["projection"][0]["components"][0]["name"], "Primary Portfolio");
    }

    #[test]
    fn template_resolution() {
        assert_eq!(portfolios_for(None).expect("defaults"), default_portfolios());
        assert_eq!(portfolios_for(Some("Custom")).expect("custom"), default_portfolios());
        assert_eq!(portfolios_for(Some("Balanced")).expect("balanced").len(), 3);
        assert!(matches!(
            portfolios_for(Some("Yolo")),
            Err(AnalysisError::UnknownTemplate(name)) if name == "Yolo"
        ));
        assert!(matches!(
            retirement_assets_for(Some("Aggressive")),
            Err(AnalysisError::UnknownRetirementTemplate(_))
        ));
        assert_eq!(
            retirement_assets_for(Some("moderate")).expect("moderate")[0].name,
            "Government Bonds"
        );
    }

    #[test]
    fn currency_parsing() {
        assert_eq!(parse_currency("usd").expect("usd"), Currency::Usd);
        assert_eq!(parse_currency(" EUR ").expect("eur").symbol(), "€");
        assert!(matches!(parse_currency("JPY"), Err(AnalysisError::UnknownCurrency(_))));
    }
}
