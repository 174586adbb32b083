use serde::{Deserialize, Serialize};

use super::calculators::sip_future_value;
use super::engine::{project, project_months, total_months};
use super::types::PortfolioInput;
use super::validation::validate;
use crate::error::SolveError;

const RATE_SEARCH_MIN_PCT: f64 = -99.0;
const RATE_SEARCH_MAX_PCT: f64 = 1_000.0;
const RATE_TOLERANCE_PCT: f64 = 1e-10;
const RATE_MAX_ITERATIONS: u32 = 200;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalType {
    #[serde(alias = "monthlyContribution", alias = "monthly_contribution")]
    MonthlyContribution,
    Horizon,
}

#[derive(Debug, Clone, Copy)]
pub struct GoalSolveConfig {
    pub goal_type: GoalType,
    pub target_corpus: f64,
    pub max_horizon_years: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSolveIteration {
    pub iteration: u32,
    pub lower_months: u64,
    pub upper_months: u64,
    pub candidate_months: u64,
    pub future_value: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSolveResult {
    pub goal_type: GoalType,
    pub target_corpus: f64,
    /// Monthly contribution, or horizon in years, depending on `goal_type`.
    pub solved_value: Option<f64>,
    pub solved_months: Option<u64>,
    pub achieved_future_value: Option<f64>,
    pub iterations: Vec<GoalSolveIteration>,
    pub feasible: bool,
    pub message: String,
}

/// Single annual rate that, applied to the whole contribution stream, lands on
/// the same final value as the multi-class projection. Unlike the blended
/// return this accounts for compounding differences between classes.
pub fn effective_annual_return_pct(input: &PortfolioInput) -> Option<f64> {
    let months = total_months(input.horizon_years);
    let target = project(input).total_future_value;
    if months == 0
        || !target.is_finite()
        || input.monthly_contribution < 0.0
        || input.lump_sum < 0.0
        || input.monthly_contribution + input.lump_sum <= 0.0
    {
        return None;
    }

    let value_at = |pct: f64| sip_future_value(input.monthly_contribution, input.lump_sum, pct, months);
    let mut lo = RATE_SEARCH_MIN_PCT;
    let mut hi = RATE_SEARCH_MAX_PCT;
    if value_at(lo) > target || value_at(hi) < target {
        return None;
    }

    for _ in 0..RATE_MAX_ITERATIONS {
        let mid = (lo + hi) * 0.5;
        if value_at(mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= RATE_TOLERANCE_PCT {
            break;
        }
    }
    Some((lo + hi) * 0.5)
}

pub fn solve_goal(
    input: &PortfolioInput,
    config: GoalSolveConfig,
) -> Result<GoalSolveResult, SolveError> {
    validate_config(input, config)?;
    Ok(match config.goal_type {
        GoalType::MonthlyContribution => solve_monthly_contribution(input, config),
        GoalType::Horizon => solve_horizon(input, config),
    })
}

fn solve_monthly_contribution(input: &PortfolioInput, config: GoalSolveConfig) -> GoalSolveResult {
    let months = total_months(input.horizon_years);
    let with_monthly = |monthly: f64| {
        let candidate = PortfolioInput {
            monthly_contribution: monthly,
            ..input.clone()
        };
        project_months(&candidate, months as f64).total_future_value
    };

    // Future value is affine in the monthly contribution.
    let base = with_monthly(0.0);
    let per_unit = with_monthly(1.0) - base;

    let mut result = GoalSolveResult {
        goal_type: config.goal_type,
        target_corpus: config.target_corpus,
        solved_value: None,
        solved_months: Some(months),
        achieved_future_value: None,
        iterations: Vec::new(),
        feasible: false,
        message: String::new(),
    };

    if base >= config.target_corpus {
        result.solved_value = Some(0.0);
        result.achieved_future_value = Some(base);
        result.feasible = true;
        result.message = "Lump sum alone reaches the target.".to_string();
    } else if per_unit <= 0.0 || !per_unit.is_finite() {
        result.message = "Monthly contributions cannot grow the portfolio to the target.".to_string();
    } else {
        let monthly = (config.target_corpus - base) / per_unit;
        result.solved_value = Some(monthly);
        result.achieved_future_value = Some(with_monthly(monthly));
        result.feasible = true;
        result.message = "Solved required monthly contribution.".to_string();
    }
    result
}

/// Smallest whole month count whose projected value reaches the target.
/// Assumes value grows with time, which holds for non-negative returns.
fn solve_horizon(input: &PortfolioInput, config: GoalSolveConfig) -> GoalSolveResult {
    let value_at = |months: u64| project_months(input, months as f64).total_future_value;
    let max_months = total_months(config.max_horizon_years);

    let mut result = GoalSolveResult {
        goal_type: config.goal_type,
        target_corpus: config.target_corpus,
        solved_value: None,
        solved_months: None,
        achieved_future_value: None,
        iterations: Vec::new(),
        feasible: false,
        message: String::new(),
    };

    let start = value_at(0);
    if start >= config.target_corpus {
        result.solved_value = Some(0.0);
        result.solved_months = Some(0);
        result.achieved_future_value = Some(start);
        result.feasible = true;
        result.message = "Target is already met today.".to_string();
        return result;
    }
    if value_at(max_months) < config.target_corpus {
        result.message = "No horizon within the search limit reaches the target.".to_string();
        return result;
    }

    let mut lo = 0;
    let mut hi = max_months;
    let mut it = 0;
    while hi - lo > 1 {
        it += 1;
        let mid = lo + (hi - lo) / 2;
        let value = value_at(mid);
        result.iterations.push(GoalSolveIteration {
            iteration: it,
            lower_months: lo,
            upper_months: hi,
            candidate_months: mid,
            future_value: value,
        });
        if value >= config.target_corpus {
            hi = mid;
        } else {
            lo = mid;
        }
    }

    result.solved_value = Some(hi as f64 / 12.0);
    result.solved_months = Some(hi);
    result.achieved_future_value = Some(value_at(hi));
    result.feasible = true;
    result.message = "Solved required horizon.".to_string();
    result
}

fn validate_config(input: &PortfolioInput, config: GoalSolveConfig) -> Result<(), SolveError> {
    if !config.target_corpus.is_finite() || config.target_corpus <= 0.0 {
        return Err(SolveError::InvalidTarget);
    }
    if !config.max_horizon_years.is_finite() || config.max_horizon_years <= 0.0 {
        return Err(SolveError::InvalidMaxHorizon);
    }
    validate(input, config.max_horizon_years)?;
    Ok(())
}
