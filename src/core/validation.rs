use super::engine::project;
use super::types::{PortfolioInput, PortfolioResult};
use crate::error::InputError;

pub const DEFAULT_MAX_HORIZON_YEARS: f64 = 100.0;

/// Checks that an input describes a financially meaningful plan. The engine
/// accepts anything; callers facing untrusted input run this first.
pub fn validate(input: &PortfolioInput, max_horizon_years: f64) -> Result<(), InputError> {
    non_negative("monthlyContribution", input.monthly_contribution)?;
    non_negative("lumpSum", input.lump_sum)?;

    finite("horizonYears", input.horizon_years)?;
    if input.horizon_years <= 0.0 {
        return Err(InputError::not_positive("horizonYears"));
    }
    if input.horizon_years > max_horizon_years {
        return Err(InputError::HorizonTooLong {
            max: max_horizon_years,
        });
    }

    above_total_loss("inflationPct", input.inflation_pct)?;

    if input.allocations.is_empty() {
        return Err(InputError::NoAllocations);
    }
    for asset in &input.allocations {
        non_negative(&format!("allocation '{}' weightPct", asset.label), asset.weight)?;
        above_total_loss(
            &format!("allocation '{}' annualReturnPct", asset.label),
            asset.annual_return_pct,
        )?;
    }
    if input.allocations.iter().all(|a| a.weight == 0.0) {
        return Err(InputError::ZeroTotalWeight);
    }

    Ok(())
}

pub fn project_validated(
    input: &PortfolioInput,
    max_horizon_years: f64,
) -> Result<PortfolioResult, InputError> {
    validate(input, max_horizon_years)?;
    Ok(project(input))
}

fn finite(field: &str, value: f64) -> Result<(), InputError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InputError::not_finite(field))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), InputError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(InputError::negative(field));
    }
    Ok(())
}

fn above_total_loss(field: &str, pct: f64) -> Result<(), InputError> {
    finite(field, pct)?;
    if pct <= -100.0 {
        return Err(InputError::rate_too_low(field));
    }
    Ok(())
}
