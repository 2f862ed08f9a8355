use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use tuition_scenarios::error::AppError;
use tuition_scenarios::workflows::intake::{ColumnMapping, ProgramTable};
use tuition_scenarios::workflows::scenario::export::{self, EXPORT_FILE_NAME};
use tuition_scenarios::workflows::scenario::report::views::ScenarioSummary;
use tuition_scenarios::workflows::scenario::{
    AuditRow, ScenarioConfig, ScenarioOutcome, ScenarioResult, TuitionScenarioEngine,
    DEFAULT_AUDIT_ROWS, DEFAULT_TOP_N,
};

#[derive(Debug, Deserialize)]
pub(crate) struct ColumnsRequest {
    pub(crate) csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ColumnsResponse {
    pub(crate) headers: Vec<String>,
    pub(crate) delimiter: String,
    pub(crate) rows: usize,
    pub(crate) suggested_mapping: ColumnMapping,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScenarioRequest {
    pub(crate) csv: String,
    /// Applied over the suggested mapping; fields left out keep the suggestion.
    #[serde(default)]
    pub(crate) mapping: Option<ColumnMapping>,
    #[serde(default)]
    pub(crate) config: Option<ScenarioConfig>,
    #[serde(default)]
    pub(crate) top_n: Option<usize>,
    #[serde(default)]
    pub(crate) audit_rows: Option<usize>,
    #[serde(default)]
    pub(crate) include_rows: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScenarioResponse {
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) mapping: ColumnMapping,
    #[serde(flatten)]
    pub(crate) summary: ScenarioSummary,
    pub(crate) audit: Vec<AuditRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) rows: Option<Vec<ScenarioResult>>,
}

struct PreparedRun {
    table: ProgramTable,
    mapping: ColumnMapping,
    engine: TuitionScenarioEngine,
    outcome: ScenarioOutcome,
}

pub(crate) fn scenario_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/scenarios/columns", post(columns_endpoint))
        .route("/api/v1/scenarios/run", post(run_endpoint))
        .route("/api/v1/scenarios/export", post(export_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn columns_endpoint(
    Json(payload): Json<ColumnsRequest>,
) -> Result<Json<ColumnsResponse>, AppError> {
    let table = ProgramTable::from_bytes(payload.csv.as_bytes())?;

    Ok(Json(ColumnsResponse {
        delimiter: char::from(table.delimiter()).to_string(),
        rows: table.len(),
        suggested_mapping: table.suggest_mapping(),
        headers: table.headers().to_vec(),
    }))
}

pub(crate) async fn run_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ScenarioRequest>,
) -> Result<Json<ScenarioResponse>, AppError> {
    let top_n = payload.top_n.unwrap_or(DEFAULT_TOP_N);
    let audit_rows = payload.audit_rows.unwrap_or(DEFAULT_AUDIT_ROWS);
    let include_rows = payload.include_rows;

    let run = prepare_run(&state, payload)?;
    let audit = run
        .engine
        .audit(&run.table, &run.mapping, &run.outcome, audit_rows)?;
    let rows = include_rows.then(|| run.outcome.results().to_vec());

    Ok(Json(ScenarioResponse {
        generated_at: Utc::now(),
        summary: run.outcome.summary(top_n),
        mapping: run.mapping,
        audit,
        rows,
    }))
}

pub(crate) async fn export_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ScenarioRequest>,
) -> Result<impl IntoResponse, AppError> {
    let run = prepare_run(&state, payload)?;
    let body = export::to_bytes(&run.table, &run.outcome)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}

fn prepare_run(state: &AppState, payload: ScenarioRequest) -> Result<PreparedRun, AppError> {
    let ScenarioRequest {
        csv,
        mapping,
        config,
        ..
    } = payload;

    let table = ProgramTable::from_bytes(csv.as_bytes())?;
    let suggested = table.suggest_mapping();
    let mapping = match mapping {
        Some(overrides) => suggested.merge(overrides),
        None => suggested,
    };
    let config = config.unwrap_or_else(|| state.scenario.as_ref().clone());

    let engine = TuitionScenarioEngine::new(config)?;
    let outcome = engine.run(&table, &mapping)?;
    info!(
        programs = table.len(),
        mode = outcome.mode().label(),
        "scenario request served"
    );

    Ok(PreparedRun {
        table,
        mapping,
        engine,
        outcome,
    })
}
