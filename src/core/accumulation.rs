use std::collections::BTreeMap;

use super::types::{
    AccumulationSummary, ComponentValue, MilestoneSummary, PortfolioComponent, ProjectionPoint,
};

/// Years surfaced in the accumulation summary besides the retirement year itself.
pub const MILESTONE_YEARS: [u32; 2] = [5, 10];

/// Projects every component from year 0 through `years` inclusive.
///
/// Each year the contribution lands first and the whole balance then grows:
/// `value = (value + annual_contribution) * (1 + growth_rate)`.
pub fn project(components: &[PortfolioComponent], years: u32) -> Vec<ProjectionPoint> {
    let mut values: Vec<f64> = components.iter().map(|c| c.initial).collect();
    let mut points = Vec::with_capacity(years as usize + 1);
    points.push(projection_point(0, components, &values));

    for year in 1..=years {
        for (value, component) in values.iter_mut().zip(components) {
            *value = (*value + component.annual_contribution) * (1.0 + component.growth_rate);
        }
        points.push(projection_point(year, components, &values));
    }

    points
}

fn projection_point(year: u32, components: &[PortfolioComponent], values: &[f64]) -> ProjectionPoint {
    let total: f64 = values.iter().sum();
    ProjectionPoint {
        year,
        components: components
            .iter()
            .zip(values)
            .map(|(component, value)| ComponentValue {
                name: component.name.clone(),
                value: *value,
            })
            .collect(),
        total,
    }
}

pub fn final_value(projection: &[ProjectionPoint]) -> f64 {
    projection.last().map(|point| point.total).unwrap_or(0.0)
}

pub fn summarize(components: &[PortfolioComponent]) -> AccumulationSummary {
    let total_initial: f64 = components.iter().map(|c| c.initial).sum();
    let total_annual: f64 = components.iter().map(|c| c.annual_contribution).sum();
    // Contribution-only portfolios have no starting balance to weight by.
    let weighted_rate = if total_initial > 0.0 {
        components
            .iter()
            .map(|c| c.initial * c.growth_rate)
            .sum::<f64>()
            / total_initial
    } else {
        0.0
    };

    AccumulationSummary {
        total_initial,
        total_annual,
        weighted_rate,
    }
}

/// Milestone rows for years 5, 10 and `years`, skipping any past the horizon.
pub fn milestones(
    projection: &[ProjectionPoint],
    years: u32,
    total_initial: f64,
) -> BTreeMap<u32, MilestoneSummary> {
    let mut rows = BTreeMap::new();
    for year in MILESTONE_YEARS.into_iter().chain([years]) {
        if year > years {
            continue;
        }
        let Some(point) = projection.iter().find(|p| p.year == year) else {
            continue;
        };
        rows.insert(
            year,
            MilestoneSummary {
                year,
                label: format!("Year {year}"),
                total: point.total,
                growth: point.total - total_initial,
            },
        );
    }
    rows
}
