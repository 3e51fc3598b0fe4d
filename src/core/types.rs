use serde::{Deserialize, Serialize};

/// One account or holding that receives contributions before retirement.
///
/// Field names on the wire match the exported configuration document
/// (`name`, `initial`, `annual`, `rate`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioComponent {
    pub name: String,
    pub initial: f64,
    #[serde(rename = "annual")]
    pub annual_contribution: f64,
    #[serde(rename = "rate")]
    pub growth_rate: f64,
}

impl PortfolioComponent {
    pub fn new(name: &str, initial: f64, annual_contribution: f64, growth_rate: f64) -> Self {
        Self {
            name: name.to_string(),
            initial,
            annual_contribution,
            growth_rate,
        }
    }
}

/// One slice of the retirement allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementAsset {
    pub name: String,
    pub allocation: f64,
    #[serde(rename = "rate")]
    pub growth_rate: f64,
}

impl RetirementAsset {
    pub fn new(name: &str, allocation: f64, growth_rate: f64) -> Self {
        Self {
            name: name.to_string(),
            allocation,
            growth_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentValue {
    pub name: String,
    pub value: f64,
}

/// Values of every component at the end of `year`. Year 0 is the starting state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub year: u32,
    pub components: Vec<ComponentValue>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalScenario {
    pub label: String,
    pub rate: f64,
    pub annual_withdrawal: f64,
    pub monthly_withdrawal: f64,
    pub trajectory: Vec<f64>,
    pub final_value: f64,
    pub blended_rate: f64,
    pub sustainable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccumulationSummary {
    pub total_initial: f64,
    pub total_annual: f64,
    pub weighted_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationSummary {
    pub total_allocation: f64,
    pub blended_rate: f64,
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneSummary {
    pub year: u32,
    pub label: String,
    pub total: f64,
    pub growth: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[serde(alias = "gbp")]
    Gbp,
    #[serde(alias = "usd")]
    Usd,
    #[serde(alias = "eur")]
    Eur,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Gbp => "GBP",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Gbp => "£",
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "GBP" => Some(Currency::Gbp),
            "USD" => Some(Currency::Usd),
            "EUR" => Some(Currency::Eur),
            _ => None,
        }
    }
}
