use serde::Serialize;

use super::types::{PortfolioComponent, RetirementAsset};

pub const ACCUMULATION_TEMPLATES: [&str; 3] = ["Conservative", "Balanced", "Aggressive"];
pub const RETIREMENT_TEMPLATES: [&str; 3] = ["Conservative", "Moderate", "Balanced"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCatalog {
    pub accumulation: Vec<NamedTemplate<PortfolioComponent>>,
    pub retirement: Vec<NamedTemplate<RetirementAsset>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedTemplate<T> {
    pub name: &'static str,
    pub items: Vec<T>,
}

/// Starting accumulation configuration when nothing else is supplied.
pub fn default_portfolios() -> Vec<PortfolioComponent> {
    vec![PortfolioComponent::new(
        "Primary Portfolio",
        50_000.0,
        10_000.0,
        0.07,
    )]
}

/// Starting retirement allocation when nothing else is supplied.
pub fn default_retirement_assets() -> Vec<RetirementAsset> {
    vec![
        RetirementAsset::new("Conservative Bonds", 0.60, 0.03),
        RetirementAsset::new("Dividend Stocks", 0.40, 0.06),
    ]
}

/// Preset accumulation components by name (case-insensitive). `Custom` has no preset.
pub fn accumulation_template(name: &str) -> Option<Vec<PortfolioComponent>> {
    let components = match name.trim().to_ascii_lowercase().as_str() {
        "conservative" => vec![
            PortfolioComponent::new("Government Bonds", 30_000.0, 5_000.0, 0.03),
            PortfolioComponent::new("Corporate Bonds", 20_000.0, 3_000.0, 0.04),
            PortfolioComponent::new("Dividend Stocks", 15_000.0, 2_000.0, 0.06),
        ],
        "balanced" => vec![
            PortfolioComponent::new("Index Funds", 40_000.0, 8_000.0, 0.07),
            PortfolioComponent::new("Bonds", 25_000.0, 4_000.0, 0.04),
            PortfolioComponent::new("International Stocks", 15_000.0, 3_000.0, 0.08),
        ],
        "aggressive" => vec![
            PortfolioComponent::new("Growth Stocks", 35_000.0, 7_000.0, 0.10),
            PortfolioComponent::new("Tech Stocks", 25_000.0, 5_000.0, 0.12),
            PortfolioComponent::new("Emerging Markets", 15_000.0, 3_000.0, 0.09),
        ],
        _ => return None,
    };
    Some(components)
}

/// Preset retirement allocations by name (case-insensitive). `Custom` has no preset.
pub fn retirement_template(name: &str) -> Option<Vec<RetirementAsset>> {
    let assets = match name.trim().to_ascii_lowercase().as_str() {
        "conservative" => vec![
            RetirementAsset::new("Treasury Bonds", 0.70, 0.03),
            RetirementAsset::new("High-Yield Savings", 0.20, 0.02),
            RetirementAsset::new("Dividend Stocks", 0.10, 0.05),
        ],
        "moderate" => vec![
            RetirementAsset::new("Government Bonds", 0.50, 0.03),
            RetirementAsset::new("Corporate Bonds", 0.30, 0.04),
            RetirementAsset::new("Dividend Stocks", 0.20, 0.06),
        ],
        "balanced" => vec![
            RetirementAsset::new("Bonds", 0.40, 0.035),
            RetirementAsset::new("Dividend Stocks", 0.40, 0.06),
            RetirementAsset::new("Growth Stocks", 0.20, 0.08),
        ],
        _ => return None,
    };
    Some(assets)
}

pub fn catalog() -> TemplateCatalog {
    TemplateCatalog {
        accumulation: ACCUMULATION_TEMPLATES
            .iter()
            .filter_map(|&name| {
                accumulation_template(name).map(|items| NamedTemplate { name, items })
            })
            .collect(),
        retirement: RETIREMENT_TEMPLATES
            .iter()
            .filter_map(|&name| retirement_template(name).map(|items| NamedTemplate { name, items }))
            .collect(),
    }
}
