use super::types::{AllocationSummary, RetirementAsset, WithdrawalScenario};
use super::validate::validate_retirement;

const MONTHS_PER_YEAR: f64 = 12.0;

/// Allocation-weighted expected return of the retirement assets.
///
/// Allocations are used as given; a set that does not sum to one still yields a number.
pub fn blended_rate(assets: &[RetirementAsset]) -> f64 {
    assets
        .iter()
        .map(|asset| asset.allocation * asset.growth_rate)
        .sum()
}

pub fn allocation_summary(assets: &[RetirementAsset]) -> AllocationSummary {
    let total_allocation: f64 = assets.iter().map(|asset| asset.allocation).sum();
    AllocationSummary {
        total_allocation,
        blended_rate: blended_rate(assets),
        valid: validate_retirement(assets),
    }
}

/// Balance at the start of retirement and after each of `years` withdrawal years.
///
/// The withdrawal is fixed at `starting_value * withdrawal_rate` for the whole horizon and
/// taken before the year's growth. Balances are floored at zero, so an exhausted portfolio
/// stays exhausted.
pub fn drawdown(starting_value: f64, blended_rate: f64, withdrawal_rate: f64, years: u32) -> Vec<f64> {
    let annual_withdrawal = starting_value * withdrawal_rate;
    let mut values = Vec::with_capacity(years as usize + 1);
    let mut current = starting_value;
    values.push(current);

    for _ in 0..years {
        current = ((current - annual_withdrawal) * (1.0 + blended_rate)).max(0.0);
        values.push(current);
    }

    values
}

pub fn simulate_withdrawal(
    starting_value: f64,
    blended_rate: f64,
    withdrawal_rate: f64,
    years: u32,
) -> WithdrawalScenario {
    let annual_withdrawal = starting_value * withdrawal_rate;
    let trajectory = drawdown(starting_value, blended_rate, withdrawal_rate, years);
    let final_value = trajectory.last().copied().unwrap_or(starting_value);

    WithdrawalScenario {
        label: rate_label(withdrawal_rate),
        rate: withdrawal_rate,
        annual_withdrawal,
        monthly_withdrawal: annual_withdrawal / MONTHS_PER_YEAR,
        trajectory,
        final_value,
        blended_rate,
        sustainable: final_value > 0.0,
    }
}

/// Display key for a withdrawal rate, e.g. `0.04` -> `"4.0%"`.
pub fn rate_label(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn default_assets() -> Vec<RetirementAsset> {
        vec![
            RetirementAsset::new("Conservative Bonds", 0.60, 0.03),
            RetirementAsset::new("Dividend Stocks", 0.40, 0.06),
        ]
    }

    #[test]
    fn blended_rate_weights_by_allocation() {
        assert_approx(blended_rate(&default_assets()), 0.048);
    }

    #[test]
    fn blended_rate_of_unnormalized_allocation_is_still_finite() {
        let assets = [
            RetirementAsset::new("Bonds", 0.9, 0.03),
            RetirementAsset::new("Stocks", 0.9, 0.06),
        ];
        assert_approx(blended_rate(&assets), 0.081);
        assert!(!allocation_summary(&assets).valid);
    }

    #[test]
    fn one_year_drawdown_matches_hand_calculation() {
        let values = drawdown(64_200.0, 0.048, 0.04, 1);
        assert_eq!(values.len(), 2);
        assert_approx(values[0], 64_200.0);
        // (64200 - 2568) * 1.048
        assert_approx(values[1], 64_613.376);
    }

    #[test]
    fn withdrawal_stays_fixed_in_currency_terms() {
        // 1000 - 100 = 900, 900 - 100 = 800: recalculating against the balance would give 810.
        let values = drawdown(1_000.0, 0.0, 0.10, 2);
        assert_approx(values[1], 900.0);
        assert_approx(values[2], 800.0);
    }

    #[test]
    fn exhausted_portfolio_is_clamped_and_never_recovers() {
        // 100 -> (100-60)*1.5 = 60 -> (60-60)*1.5 = 0 -> (0-60)*1.5 < 0 -> 0
        let values = drawdown(100.0, 0.5, 0.6, 5);
        assert_approx(values[1], 60.0);
        assert_approx(values[2], 0.0);
        for value in &values[3..] {
            assert_eq!(*value, 0.0);
        }
    }

    #[test]
    fn overdrawn_first_year_clamps_immediately() {
        let values = drawdown(100.0, 0.05, 1.5, 3);
        assert_approx(values[0], 100.0);
        assert_eq!(&values[1..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn zero_years_returns_starting_value_only() {
        let scenario = simulate_withdrawal(250_000.0, 0.048, 0.04, 0);
        assert_eq!(scenario.trajectory, vec![250_000.0]);
        assert_approx(scenario.final_value, 250_000.0);
        assert!(scenario.sustainable);
    }

    #[test]
    fn scenario_reports_withdrawals_and_rate() {
        let scenario = simulate_withdrawal(64_200.0, 0.048, 0.04, 1);
        assert_eq!(scenario.label, "4.0%");
        assert_approx(scenario.annual_withdrawal, 2_568.0);
        assert_approx(scenario.monthly_withdrawal, 214.0);
        assert_approx(scenario.final_value, 64_613.376);
        assert_approx(scenario.blended_rate, 0.048);
        assert!(scenario.sustainable);
    }

    #[test]
    fn exhausted_scenario_is_not_sustainable() {
        let scenario = simulate_withdrawal(100_000.0, 0.0, 0.07, 30);
        assert_eq!(scenario.final_value, 0.0);
        assert!(!scenario.sustainable);
    }

    #[test]
    fn rate_labels_use_one_decimal_percent() {
        assert_eq!(rate_label(0.03), "3.0%");
        assert_eq!(rate_label(0.045), "4.5%");
        assert_eq!(rate_label(0.0), "0.0%");
    }

    #[test]
    fn allocation_summary_reports_totals() {
        let summary = allocation_summary(&default_assets());
        assert_approx(summary.total_allocation, 1.0);
        assert_approx(summary.blended_rate, 0.048);
        assert!(summary.valid);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(40))]

        #[test]
        fn prop_drawdown_is_non_negative_and_sized(
            start in 0u32..3_000_000,
            blended_bp in 0u32..1200,
            withdrawal_bp in 0u32..2000,
            years in 0u32..60
        ) {
            let values = drawdown(
                start as f64,
                blended_bp as f64 / 10_000.0,
                withdrawal_bp as f64 / 10_000.0,
                years,
            );
            prop_assert_eq!(values.len(), years as usize + 1);
            prop_assert_eq!(values[0], start as f64);
            for value in &values {
                prop_assert!(*value >= 0.0);
            }
            if let Some(first_zero) = values.iter().skip(1).position(|v| *v == 0.0) {
                for value in &values[first_zero + 1..] {
                    prop_assert_eq!(*value, 0.0);
                }
            }
        }
    }
}
