mod calculators;
mod engine;
mod presets;
mod solver;
mod types;
mod validation;

pub use calculators::{EmiSummary, cagr_pct, emi, sip_future_value};
pub use engine::{project, project_yearly, total_months};
pub use presets::AllocationPreset;
pub use solver::{
    GoalSolveConfig, GoalSolveIteration, GoalSolveResult, GoalType, effective_annual_return_pct,
    solve_goal,
};
pub use types::{
    AssetClass, AssetClassResult, BreakdownEntry, PortfolioInput, PortfolioResult,
    YearlyProjection,
};
pub use validation::{DEFAULT_MAX_HORIZON_YEARS, project_validated, validate};
