use serde::ser::{Serialize, SerializeMap, Serializer};

use super::retirement::{blended_rate, simulate_withdrawal};
use super::types::{RetirementAsset, WithdrawalScenario};

/// Withdrawal scenarios keyed by rate label, in first-requested order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioTable {
    entries: Vec<WithdrawalScenario>,
}

impl ScenarioTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a scenario; an existing entry with the same label is replaced in place.
    pub fn insert(&mut self, scenario: WithdrawalScenario) {
        match self.entries.iter_mut().find(|s| s.label == scenario.label) {
            Some(existing) => *existing = scenario,
            None => self.entries.push(scenario),
        }
    }

    pub fn get(&self, label: &str) -> Option<&WithdrawalScenario> {
        self.entries.iter().find(|s| s.label == label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &WithdrawalScenario> {
        self.entries.iter()
    }
}

impl Serialize for ScenarioTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for scenario in &self.entries {
            map.serialize_entry(&scenario.label, scenario)?;
        }
        map.end()
    }
}

/// Runs one drawdown per withdrawal rate from the same starting balance.
///
/// The blended rate depends only on the assets, so it is computed once for all rates.
pub fn run_scenarios(
    final_accumulated_value: f64,
    withdrawal_rates: &[f64],
    retirement_years: u32,
    retirement_assets: &[RetirementAsset],
) -> ScenarioTable {
    let blended = blended_rate(retirement_assets);
    let mut table = ScenarioTable::new();
    for &rate in withdrawal_rates {
        table.insert(simulate_withdrawal(
            final_accumulated_value,
            blended,
            rate,
            retirement_years,
        ));
    }
    table
}
