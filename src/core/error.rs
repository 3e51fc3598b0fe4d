use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("accumulation portfolios incomplete or invalid")]
    InvalidAccumulation,

    #[error("retirement allocation incomplete or doesn't total 100%")]
    InvalidRetirement,

    #[error("unknown portfolio template: {0}")]
    UnknownTemplate(String),

    #[error("unknown retirement template: {0}")]
    UnknownRetirementTemplate(String),

    #[error("unknown currency: {0} (expected GBP, USD or EUR)")]
    UnknownCurrency(String),

    #[error("failed to serialize configuration: {0}")]
    Serialization(#[from] serde_json::Error),
}
