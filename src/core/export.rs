use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::error::AnalysisError;
use super::types::PortfolioComponent;

/// Saved accumulation configuration: `{ "portfolios": [...], "timestamp": "..." }`.
///
/// Only written by the engine. `portfolios` uses the same field names as
/// [`PortfolioComponent`], so a caller can load the array back as components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub portfolios: Vec<PortfolioComponent>,
    pub timestamp: String,
}

impl ConfigSnapshot {
    pub fn capture(components: &[PortfolioComponent]) -> Self {
        Self::captured_at(components, Utc::now())
    }

    pub fn captured_at(components: &[PortfolioComponent], at: DateTime<Utc>) -> Self {
        Self {
            portfolios: components.to_vec(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }

    pub fn to_json(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn export_config(components: &[PortfolioComponent]) -> Result<String, AnalysisError> {
    ConfigSnapshot::capture(components).to_json()
}
