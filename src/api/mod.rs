mod request;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Json, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::core::{
    AllocationPreset, AssetClass, EmiSummary, GoalSolveConfig, GoalSolveResult, PortfolioInput,
    PortfolioResult, YearlyProjection, cagr_pct, effective_annual_return_pct, emi, project,
    project_yearly, sip_future_value, solve_goal, total_months,
};

pub use request::{
    CagrQuery, Cli, CliGoalType, CliPreset, Command, EmiQuery, GoalArgs, GoalPayload,
    ProjectArgs, ProjectPayload, SipQuery, build_input, goal_config, parse_allocation,
};

#[derive(Debug)]
struct AppState {
    config: ServerConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[serde(flatten)]
    pub result: PortfolioResult,
    pub effective_annual_return_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly: Option<Vec<YearlyProjection>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresetResponse {
    preset: AllocationPreset,
    allocations: Vec<AssetClass>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SipResponse {
    months: u64,
    invested: f64,
    future_value: f64,
    gain: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CagrResponse {
    cagr_pct: f64,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn build_project_response(input: &PortfolioInput, include_yearly: bool) -> ProjectResponse {
    ProjectResponse {
        result: project(input),
        effective_annual_return_pct: effective_annual_return_pct(input),
        yearly: include_yearly.then(|| project_yearly(input).collect()),
    }
}

pub fn build_router(config: ServerConfig) -> Router {
    let state = Arc::new(AppState { config });
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route("/api/presets", get(presets_handler))
        .route("/api/goal", post(goal_handler))
        .route("/api/calculators/sip", get(sip_handler))
        .route("/api/calculators/cagr", get(cagr_handler))
        .route("/api/calculators/emi", get(emi_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_http_server(config: ServerConfig) -> std::io::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let app = build_router(config);

    let listener = TcpListener::bind(addr).await?;
    info!("fincalc HTTP API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Query<ProjectPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => project_handler_impl(&state, payload),
        Err(rejection) => query_rejection_response(rejection),
    }
}

async fn project_post_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProjectPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => project_handler_impl(&state, payload),
        Err(rejection) => rejection_response(rejection),
    }
}

fn project_handler_impl(state: &AppState, payload: ProjectPayload) -> Response {
    let include_yearly = payload.include_yearly.unwrap_or(false);
    let input = match build_input(payload.into_args(), state.config.max_horizon_years) {
        Ok(input) => input,
        Err(e) => {
            warn!(error = %e, "rejected projection request");
            return error_response(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };

    let response = build_project_response(&input, include_yearly);
    debug!(
        classes = input.allocations.len(),
        total_future_value = response.result.total_future_value,
        "projection computed"
    );
    json_response(StatusCode::OK, response)
}

async fn presets_handler() -> Response {
    let presets: Vec<PresetResponse> = AllocationPreset::ALL
        .into_iter()
        .map(|preset| PresetResponse {
            preset,
            allocations: preset.allocations(),
        })
        .collect();
    json_response(StatusCode::OK, presets)
}

async fn goal_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GoalPayload>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => return rejection_response(rejection),
    };

    let max_horizon_years = payload
        .max_horizon_years
        .unwrap_or(state.config.max_horizon_years)
        .min(state.config.max_horizon_years);
    let config = GoalSolveConfig {
        goal_type: payload.goal_type,
        target_corpus: payload.target_corpus,
        max_horizon_years,
    };
    let input = match build_input(payload.plan.into_args(), state.config.max_horizon_years) {
        Ok(input) => input,
        Err(e) => {
            warn!(error = %e, "rejected goal request");
            return error_response(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };

    match solve_goal(&input, config) {
        Ok(result) => {
            debug!(feasible = result.feasible, "goal solved");
            json_response::<GoalSolveResult>(StatusCode::OK, result)
        }
        Err(e) => {
            warn!(error = %e, "rejected goal request");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

async fn sip_handler(query: Result<Query<SipQuery>, QueryRejection>) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection_response(rejection),
    };
    let months = total_months(query.years);
    let invested = query.monthly * months as f64 + query.lump_sum;
    let future_value = sip_future_value(query.monthly, query.lump_sum, query.annual_return_pct, months);
    json_response(
        StatusCode::OK,
        SipResponse {
            months,
            invested,
            future_value,
            gain: future_value - invested,
        },
    )
}

async fn cagr_handler(query: Result<Query<CagrQuery>, QueryRejection>) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection_response(rejection),
    };
    match cagr_pct(query.initial, query.final_value, query.years) {
        Some(cagr_pct) => json_response(StatusCode::OK, CagrResponse { cagr_pct }),
        None => error_response(
            StatusCode::BAD_REQUEST,
            "initial and years must be > 0 and final must be >= 0",
        ),
    }
}

async fn emi_handler(query: Result<Query<EmiQuery>, QueryRejection>) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return query_rejection_response(rejection),
    };
    match emi(query.principal, query.annual_rate_pct, query.months) {
        Some(summary) => json_response::<EmiSummary>(StatusCode::OK, summary),
        None => error_response(StatusCode::BAD_REQUEST, "months must be > 0"),
    }
}

fn rejection_response(rejection: JsonRejection) -> Response {
    let msg = format!("Invalid API JSON payload: {}", rejection.body_text());
    warn!("{msg}");
    error_response(rejection.status(), &msg)
}

fn query_rejection_response(rejection: QueryRejection) -> Response {
    let msg = format!("Invalid API query string: {}", rejection.body_text());
    warn!("{msg}");
    error_response(rejection.status(), &msg)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DEFAULT_MAX_HORIZON_YEARS;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    fn reference_input() -> PortfolioInput {
        build_input(ProjectArgs::default(), DEFAULT_MAX_HORIZON_YEARS).expect("valid inputs")
    }

    #[test]
    fn default_arguments_reproduce_reference_scenario() {
        let response = build_project_response(&reference_input(), false);
        assert_approx(response.result.total_future_value, 2_347_401.757_074_076_7);
        assert_approx(response.result.total_invested, 1_300_000.0);
        assert!(response.yearly.is_none());
    }

    #[test]
    fn project_response_serialization_matches_output_schema() {
        let response = build_project_response(&reference_input(), true);
        let json = serde_json::to_value(&response).expect("response should serialize");

        for key in [
            "totalFutureValue",
            "totalInvested",
            "totalGain",
            "blendedAnnualReturnPct",
            "inflationAdjustedValue",
            "breakdown",
            "effectiveAnnualReturnPct",
            "yearly",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json.get("classes").is_none());
        assert_eq!(json["breakdown"][0]["label"], "equity");
        assert_eq!(json["breakdown"][0]["finalValueSharePct"], 68.0);
        assert_eq!(json["yearly"].as_array().map(Vec::len), Some(10));
    }

    #[test]
    fn yearly_is_omitted_unless_requested() {
        let response = build_project_response(&reference_input(), false);
        let json = serde_json::to_value(&response).expect("response should serialize");
        assert!(json.get("yearly").is_none());
    }

    #[test]
    fn error_response_sets_no_store() {
        let response = error_response(StatusCode::BAD_REQUEST, "nope");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(&b"no-store"[..])
        );
    }
}
