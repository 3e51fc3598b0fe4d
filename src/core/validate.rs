use super::types::{PortfolioComponent, RetirementAsset};

/// Allowed distance of the summed retirement allocation from 100%.
pub const ALLOCATION_TOLERANCE: f64 = 0.01;

pub fn validate_accumulation(components: &[PortfolioComponent]) -> bool {
    if components.is_empty() {
        return false;
    }

    components.iter().all(|component| {
        !component.name.trim().is_empty()
            && is_non_negative(component.initial)
            && is_non_negative(component.annual_contribution)
            && is_non_negative(component.growth_rate)
            && !(component.initial == 0.0 && component.annual_contribution == 0.0)
    })
}

pub fn validate_retirement(assets: &[RetirementAsset]) -> bool {
    if assets.is_empty() {
        return false;
    }

    let total_allocation: f64 = assets.iter().map(|asset| asset.allocation).sum();
    if !allocation_total_ok(total_allocation) {
        return false;
    }

    // Zero-allocation rows are a configuration error, not an excluded asset.
    assets.iter().all(|asset| {
        !asset.name.trim().is_empty()
            && is_non_negative(asset.allocation)
            && is_non_negative(asset.growth_rate)
            && asset.allocation > 0.0
    })
}

fn allocation_total_ok(total_allocation: f64) -> bool {
    (total_allocation - 1.0).abs() <= ALLOCATION_TOLERANCE
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
