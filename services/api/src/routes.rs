use crate::infra::AppState;
use admission_odds::error::AppError;
use admission_odds::workflows::admission::{
    invalid_payload, prediction_router, AdmissionPredictionService, ApplicantProfile,
    PredictionView, ProgramId, ProgramSummary, RateFallback,
};
use admission_odds::workflows::parcoursup::{program_id, DatasetImporter};
use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

/// What-if request evaluated against cohorts supplied inline instead of the loaded dataset.
#[derive(Debug, Deserialize)]
pub(crate) struct ScenarioRequest {
    pub(crate) cohorts_csv: String,
    pub(crate) profile: ApplicantProfile,
    #[serde(default)]
    pub(crate) program: Option<ProgramId>,
    #[serde(default)]
    pub(crate) fallback: RateFallback,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScenarioResponse {
    pub(crate) profile: ApplicantProfile,
    pub(crate) programs: Vec<ProgramSummary>,
    pub(crate) results: Vec<PredictionView>,
}

pub(crate) fn with_prediction_routes(service: Arc<AdmissionPredictionService>) -> axum::Router {
    prediction_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/admission/scenario",
            axum::routing::post(scenario_endpoint),
        )
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

pub(crate) async fn scenario_endpoint(
    payload: Result<Json<ScenarioRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_payload(rejection),
    };

    match evaluate_scenario(request) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) fn evaluate_scenario(request: ScenarioRequest) -> Result<ScenarioResponse, AppError> {
    let ScenarioRequest {
        cohorts_csv,
        profile,
        program,
        fallback,
    } = request;

    let dataset = DatasetImporter::from_reader(Cursor::new(cohorts_csv.into_bytes()))?;
    let service = AdmissionPredictionService::new(Arc::new(dataset), fallback);

    let results = match program {
        Some(program) => vec![service.predict(&program_id(program.as_str()), &profile)?],
        None => service.compare(&profile)?,
    };
    let programs = service.summary()?;

    Ok(ScenarioResponse {
        profile,
        programs,
        results: results.into_iter().map(PredictionView::from).collect(),
    })
}
