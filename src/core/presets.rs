use serde::{Deserialize, Serialize};

use super::types::AssetClass;

pub const EQUITY_RETURN_PCT: f64 = 12.0;
pub const DEBT_RETURN_PCT: f64 = 7.0;
pub const GOLD_RETURN_PCT: f64 = 6.0;
pub const CASH_RETURN_PCT: f64 = 4.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllocationPreset {
    Conservative,
    Balanced,
    Aggressive,
}

impl AllocationPreset {
    pub const ALL: [AllocationPreset; 3] = [
        AllocationPreset::Conservative,
        AllocationPreset::Balanced,
        AllocationPreset::Aggressive,
    ];

    /// Equity/debt/gold/cash weights.
    fn weights(self) -> [f64; 4] {
        match self {
            AllocationPreset::Conservative => [30.0, 55.0, 10.0, 5.0],
            AllocationPreset::Balanced => [60.0, 30.0, 5.0, 5.0],
            AllocationPreset::Aggressive => [80.0, 15.0, 5.0, 0.0],
        }
    }

    pub fn allocations(self) -> Vec<AssetClass> {
        let [equity, debt, gold, cash] = self.weights();
        vec![
            AssetClass::new("equity", equity, EQUITY_RETURN_PCT),
            AssetClass::new("debt", debt, DEBT_RETURN_PCT),
            AssetClass::new("gold", gold, GOLD_RETURN_PCT),
            AssetClass::new("cash", cash, CASH_RETURN_PCT),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_sums_to_one_hundred() {
        for preset in AllocationPreset::ALL {
            let total: f64 = preset.allocations().iter().map(|a| a.weight).sum();
            assert_eq!(total, 100.0, "{preset:?}");
        }
    }

    #[test]
    fn balanced_preset_is_sixty_thirty_five_five() {
        let weights: Vec<f64> = AllocationPreset::Balanced
            .allocations()
            .iter()
            .map(|a| a.weight)
            .collect();
        assert_eq!(weights, vec![60.0, 30.0, 5.0, 5.0]);
    }

    #[test]
    fn presets_deserialize_from_kebab_case() {
        let preset: AllocationPreset = serde_json::from_str("\"aggressive\"").expect("parse");
        assert_eq!(preset, AllocationPreset::Aggressive);
    }
}
