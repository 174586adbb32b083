use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;

use crate::core::{
    AllocationPreset, AssetClass, GoalSolveConfig, GoalType, PortfolioInput, validate,
};
use crate::error::InputError;

#[derive(Parser, Debug)]
#[command(
    name = "fincalc",
    about = "Multi-asset SIP and lump-sum portfolio projection calculator"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the JSON HTTP API.
    Serve {
        #[arg(long, help = "Port to listen on; overrides the config file")]
        port: Option<u16>,
        #[arg(long, help = "Path to a TOML server config")]
        config: Option<PathBuf>,
    },
    /// Print a single projection as JSON.
    Project {
        #[command(flatten)]
        plan: ProjectArgs,
        #[arg(long, help = "Include a year-by-year growth table")]
        yearly: bool,
    },
    /// Solve for the monthly contribution or horizon that reaches a target corpus.
    Goal {
        #[command(flatten)]
        plan: ProjectArgs,
        #[command(flatten)]
        goal: GoalArgs,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliPreset {
    Conservative,
    Balanced,
    Aggressive,
}

impl From<CliPreset> for AllocationPreset {
    fn from(value: CliPreset) -> Self {
        match value {
            CliPreset::Conservative => AllocationPreset::Conservative,
            CliPreset::Balanced => AllocationPreset::Balanced,
            CliPreset::Aggressive => AllocationPreset::Aggressive,
        }
    }
}

impl From<AllocationPreset> for CliPreset {
    fn from(value: AllocationPreset) -> Self {
        match value {
            AllocationPreset::Conservative => CliPreset::Conservative,
            AllocationPreset::Balanced => CliPreset::Balanced,
            AllocationPreset::Aggressive => CliPreset::Aggressive,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliGoalType {
    MonthlyContribution,
    Horizon,
}

impl From<CliGoalType> for GoalType {
    fn from(value: CliGoalType) -> Self {
        match value {
            CliGoalType::MonthlyContribution => GoalType::MonthlyContribution,
            CliGoalType::Horizon => GoalType::Horizon,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ProjectArgs {
    #[arg(long, default_value_t = 10_000.0, help = "Monthly SIP contribution")]
    pub monthly_contribution: f64,
    #[arg(long, default_value_t = 100_000.0, help = "One-time investment at the start")]
    pub lump_sum: f64,
    #[arg(long, default_value_t = 10.0, help = "Investment horizon in years")]
    pub horizon_years: f64,
    #[arg(
        long = "inflation",
        default_value_t = 6.0,
        allow_negative_numbers = true,
        help = "Expected annual inflation in percent"
    )]
    pub inflation_pct: f64,
    #[arg(
        long,
        value_enum,
        default_value_t = CliPreset::Balanced,
        help = "Allocation preset, used when no --allocation is given"
    )]
    pub preset: CliPreset,
    #[arg(
        long = "allocation",
        value_parser = parse_allocation,
        allow_negative_numbers = true,
        help = "Asset class as label:weight:annual-return-percent, e.g. equity:60:12"
    )]
    pub allocations: Vec<AssetClass>,
}

impl Default for ProjectArgs {
    fn default() -> Self {
        Self {
            monthly_contribution: 10_000.0,
            lump_sum: 100_000.0,
            horizon_years: 10.0,
            inflation_pct: 6.0,
            preset: CliPreset::Balanced,
            allocations: Vec::new(),
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct GoalArgs {
    #[arg(long, help = "Corpus to reach")]
    pub target_corpus: f64,
    #[arg(long, value_enum, default_value_t = CliGoalType::MonthlyContribution)]
    pub solve_for: CliGoalType,
    #[arg(long, default_value_t = 50.0, help = "Longest horizon to search, in years")]
    pub max_horizon_years: f64,
}

pub fn parse_allocation(spec: &str) -> Result<AssetClass, InputError> {
    let invalid = || InputError::AllocationSpec(spec.to_string());
    let mut parts = spec.split(':');
    let (Some(label), Some(weight), Some(rate), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    let label = label.trim();
    if label.is_empty() {
        return Err(invalid());
    }
    let weight = weight.trim().parse::<f64>().map_err(|_| invalid())?;
    let rate = rate.trim().parse::<f64>().map_err(|_| invalid())?;
    Ok(AssetClass::new(label, weight, rate))
}

pub fn build_input(args: ProjectArgs, max_horizon_years: f64) -> Result<PortfolioInput, InputError> {
    let allocations = if args.allocations.is_empty() {
        AllocationPreset::from(args.preset).allocations()
    } else {
        args.allocations
    };
    let input = PortfolioInput {
        monthly_contribution: args.monthly_contribution,
        lump_sum: args.lump_sum,
        horizon_years: args.horizon_years,
        allocations,
        inflation_pct: args.inflation_pct,
    };
    validate(&input, max_horizon_years)?;
    Ok(input)
}

pub fn goal_config(args: &GoalArgs) -> GoalSolveConfig {
    GoalSolveConfig {
        goal_type: args.solve_for.into(),
        target_corpus: args.target_corpus,
        max_horizon_years: args.max_horizon_years,
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectPayload {
    pub monthly_contribution: Option<f64>,
    pub lump_sum: Option<f64>,
    pub horizon_years: Option<f64>,
    pub inflation_pct: Option<f64>,
    pub preset: Option<AllocationPreset>,
    pub allocations: Option<Vec<AssetClass>>,
    pub include_yearly: Option<bool>,
}

impl ProjectPayload {
    pub fn into_args(self) -> ProjectArgs {
        let mut args = ProjectArgs::default();
        if let Some(v) = self.monthly_contribution {
            args.monthly_contribution = v;
        }
        if let Some(v) = self.lump_sum {
            args.lump_sum = v;
        }
        if let Some(v) = self.horizon_years {
            args.horizon_years = v;
        }
        if let Some(v) = self.inflation_pct {
            args.inflation_pct = v;
        }
        if let Some(v) = self.preset {
            args.preset = v.into();
        }
        if let Some(v) = self.allocations {
            args.allocations = v;
        }
        args
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPayload {
    #[serde(flatten)]
    pub plan: ProjectPayload,
    pub target_corpus: f64,
    #[serde(default = "default_goal_type")]
    pub goal_type: GoalType,
    pub max_horizon_years: Option<f64>,
}

fn default_goal_type() -> GoalType {
    GoalType::MonthlyContribution
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SipQuery {
    pub monthly: f64,
    pub lump_sum: f64,
    pub annual_return_pct: f64,
    pub years: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CagrQuery {
    pub initial: f64,
    #[serde(rename = "final")]
    pub final_value: f64,
    pub years: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiQuery {
    pub principal: f64,
    pub annual_rate_pct: f64,
    pub months: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEFAULT_MAX_HORIZON_YEARS;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn clap_defaults_match_api_defaults() {
        let cli = Cli::try_parse_from(["fincalc", "project"]).expect("parse");
        let Command::Project { plan, yearly } = cli.command else {
            panic!("expected project command");
        };
        assert_eq!(plan, ProjectArgs::default());
        assert!(!yearly);
    }

    #[test]
    fn cli_parses_repeated_allocations() {
        let cli = Cli::try_parse_from([
            "fincalc",
            "project",
            "--monthly-contribution",
            "2500",
            "--allocation",
            "equity:70:12.5",
            "--allocation",
            "debt:30:7",
            "--inflation",
            "-1",
        ])
        .expect("parse");
        let Command::Project { plan, .. } = cli.command else {
            panic!("expected project command");
        };
        assert_approx(plan.monthly_contribution, 2_500.0);
        assert_approx(plan.inflation_pct, -1.0);
        assert_eq!(
            plan.allocations,
            vec![
                AssetClass::new("equity", 70.0, 12.5),
                AssetClass::new("debt", 30.0, 7.0)
            ]
        );
    }

    #[test]
    fn cli_parses_goal_command() {
        let cli = Cli::try_parse_from([
            "fincalc",
            "goal",
            "--target-corpus",
            "5000000",
            "--solve-for",
            "horizon",
            "--preset",
            "aggressive",
        ])
        .expect("parse");
        let Command::Goal { plan, goal } = cli.command else {
            panic!("expected goal command");
        };
        assert_eq!(plan.preset, CliPreset::Aggressive);
        let config = goal_config(&goal);
        assert_eq!(config.goal_type, GoalType::Horizon);
        assert_approx(config.target_corpus, 5_000_000.0);
        assert_approx(config.max_horizon_years, 50.0);
    }

    #[test]
    fn parse_allocation_rejects_malformed_specs() {
        for spec in ["equity", "equity:60", ":60:12", "equity:x:12", "equity:60:12:1"] {
            let err = parse_allocation(spec).expect_err(spec);
            assert_eq!(err, InputError::AllocationSpec(spec.to_string()));
        }
        assert_eq!(
            parse_allocation(" gold : 5 : 6 ").expect("valid"),
            AssetClass::new("gold", 5.0, 6.0)
        );
    }

    #[test]
    fn build_input_uses_preset_when_no_allocations_given() {
        let args = ProjectArgs {
            preset: CliPreset::Conservative,
            ..ProjectArgs::default()
        };
        let input = build_input(args, DEFAULT_MAX_HORIZON_YEARS).expect("valid");
        assert_eq!(input.allocations, AllocationPreset::Conservative.allocations());
    }

    #[test]
    fn build_input_rejects_invalid_values() {
        let args = ProjectArgs {
            horizon_years: -1.0,
            ..ProjectArgs::default()
        };
        let err = build_input(args, DEFAULT_MAX_HORIZON_YEARS).expect_err("negative horizon");
        assert!(err.to_string().contains("horizonYears"));
    }

    #[test]
    fn payload_overrides_only_given_fields() {
        let json = r#"{
          "monthlyContribution": 25000,
          "horizonYears": 15,
          "allocations": [
            { "label": "equity", "weightPct": 80, "annualReturnPct": 12 },
            { "label": "debt", "weightPct": 20, "annualReturnPct": 7 }
          ]
        }"#;
        let payload: ProjectPayload = serde_json::from_str(json).expect("parse");
        let args = payload.into_args();
        assert_approx(args.monthly_contribution, 25_000.0);
        assert_approx(args.horizon_years, 15.0);
        assert_approx(args.lump_sum, 100_000.0);
        assert_approx(args.inflation_pct, 6.0);
        assert_eq!(args.allocations.len(), 2);
        assert_approx(args.allocations[0].weight, 80.0);
    }

    #[test]
    fn payload_accepts_preset_name() {
        let payload: ProjectPayload =
            serde_json::from_str(r#"{ "preset": "conservative", "includeYearly": true }"#)
                .expect("parse");
        assert_eq!(payload.include_yearly, Some(true));
        assert_eq!(payload.into_args().preset, CliPreset::Conservative);
    }

    #[test]
    fn goal_payload_flattens_plan_fields() {
        let payload: GoalPayload = serde_json::from_str(
            r#"{ "targetCorpus": 1000000, "goalType": "horizon", "lumpSum": 0 }"#,
        )
        .expect("parse");
        assert_eq!(payload.goal_type, GoalType::Horizon);
        assert_approx(payload.target_corpus, 1_000_000.0);
        assert_eq!(payload.plan.lump_sum, Some(0.0));
        assert_eq!(payload.max_horizon_years, None);
    }
}
