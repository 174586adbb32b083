use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetClass {
    pub label: String,
    /// Raw allocation weight. Normalized against the sum of all weights, so
    /// the set need not add up to 100.
    #[serde(rename = "weightPct")]
    pub weight: f64,
    pub annual_return_pct: f64,
}

impl AssetClass {
    pub fn new(label: impl Into<String>, weight: f64, annual_return_pct: f64) -> Self {
        Self {
            label: label.into(),
            weight,
            annual_return_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioInput {
    pub monthly_contribution: f64,
    pub lump_sum: f64,
    pub horizon_years: f64,
    pub allocations: Vec<AssetClass>,
    pub inflation_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetClassResult {
    pub label: String,
    pub normalized_share: f64,
    pub future_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub label: String,
    pub final_value_share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResult {
    pub total_future_value: f64,
    pub total_invested: f64,
    pub total_gain: f64,
    pub blended_annual_return_pct: f64,
    pub inflation_adjusted_value: f64,
    pub breakdown: Vec<BreakdownEntry>,
    #[serde(skip)]
    pub classes: Vec<AssetClassResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyProjection {
    pub year: u64,
    pub months: u64,
    pub invested: f64,
    pub value: f64,
    pub gain: f64,
    pub inflation_adjusted_value: f64,
}
