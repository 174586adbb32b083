use super::types::{
    AssetClassResult, BreakdownEntry, PortfolioInput, PortfolioResult, YearlyProjection,
};

const MONTHS_PER_YEAR: u64 = 12;

pub fn project(input: &PortfolioInput) -> PortfolioResult {
    if input.horizon_years < 0.0 {
        // Nothing is invested over a negative horizon.
        let idle = PortfolioInput {
            monthly_contribution: 0.0,
            lump_sum: 0.0,
            ..input.clone()
        };
        return project_months(&idle, 0.0);
    }
    project_months(input, horizon_months(input.horizon_years))
}

/// Year-by-year view of the same projection. Each row is the projection cut
/// at that month count; the final row may cover a partial year. Rows are
/// computed lazily, so very long horizons can be sampled with `take`.
pub fn project_yearly(input: &PortfolioInput) -> impl Iterator<Item = YearlyProjection> + '_ {
    let months = total_months(input.horizon_years);
    (1..=months.div_ceil(MONTHS_PER_YEAR)).map(move |year| {
        let cut = year.saturating_mul(MONTHS_PER_YEAR).min(months);
        let result = project_months(input, cut as f64);
        YearlyProjection {
            year,
            months: cut,
            invested: result.total_invested,
            value: result.total_future_value,
            gain: result.total_gain,
            inflation_adjusted_value: result.inflation_adjusted_value,
        }
    })
}

/// Whole months covered by a horizon. Non-positive and non-finite horizons
/// collapse to zero months.
pub fn total_months(horizon_years: f64) -> u64 {
    horizon_months(horizon_years) as u64
}

/// `round(horizon_years * 12)` kept in floating point, so arbitrarily long
/// horizons are not clamped to an integer width.
pub(crate) fn horizon_months(horizon_years: f64) -> f64 {
    if !horizon_years.is_finite() || horizon_years <= 0.0 {
        return 0.0;
    }
    (horizon_years * MONTHS_PER_YEAR as f64).round()
}

pub(crate) fn monthly_rate(annual_pct: f64) -> f64 {
    annual_pct / MONTHS_PER_YEAR as f64 / 100.0
}

/// Future value of `payment` deposited at the start of each month.
pub(crate) fn annuity_due_future_value(payment: f64, rate: f64, months: f64) -> f64 {
    if rate == 0.0 {
        return payment * months;
    }
    let growth = growth_factor(rate, months);
    payment * (growth - 1.0) / rate * (1.0 + rate)
}

pub(crate) fn growth_factor(rate: f64, months: f64) -> f64 {
    (1.0 + rate).powf(months)
}

pub(crate) fn project_months(input: &PortfolioInput, months: f64) -> PortfolioResult {
    let mut total_weight: f64 = input.allocations.iter().map(|a| a.weight).sum();
    if total_weight == 0.0 {
        total_weight = 1.0;
    }

    let mut classes = Vec::with_capacity(input.allocations.len());
    let mut blended_annual_return_pct = 0.0;
    for asset in &input.allocations {
        let normalized_share = asset.weight / total_weight;
        let rate = monthly_rate(asset.annual_return_pct);
        let class_monthly = input.monthly_contribution * normalized_share;
        let class_lump = input.lump_sum * normalized_share;

        let fv_recurring = annuity_due_future_value(class_monthly, rate, months);
        let fv_lump = class_lump * growth_factor(rate, months);

        blended_annual_return_pct += asset.annual_return_pct * normalized_share;
        classes.push(AssetClassResult {
            label: asset.label.clone(),
            normalized_share,
            future_value: fv_recurring + fv_lump,
        });
    }

    let total_future_value: f64 = classes.iter().map(|c| c.future_value).sum();
    let total_invested = input.monthly_contribution * months + input.lump_sum;
    let inflation_adjusted_value =
        total_future_value / growth_factor(monthly_rate(input.inflation_pct), months);

    let breakdown = classes
        .iter()
        .map(|class| BreakdownEntry {
            label: class.label.clone(),
            final_value_share_pct: if total_future_value == 0.0 {
                0.0
            } else {
                (class.future_value / total_future_value * 100.0).round()
            },
        })
        .collect();

    PortfolioResult {
        total_future_value,
        total_invested,
        total_gain: total_future_value - total_invested,
        blended_annual_return_pct,
        inflation_adjusted_value,
        breakdown,
        classes,
    }
}
