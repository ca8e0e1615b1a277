use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ApplicantProfile, PredictionError, ProgramId, ValidationError};
use super::engine::PredictionResult;
use super::service::AdmissionPredictionService;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub program: ProgramId,
    pub profile: ApplicantProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub profile: ApplicantProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    #[serde(flatten)]
    pub result: PredictionResult,
    pub band_label: Option<&'static str>,
    pub message: Option<&'static str>,
}

impl From<PredictionResult> for PredictionView {
    fn from(result: PredictionResult) -> Self {
        let band_label = result.band.map(|band| band.label());
        let message = result.band.map(|band| band.message());
        Self {
            result,
            band_label,
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonView {
    pub profile: ApplicantProfile,
    pub evaluated_programs: usize,
    pub results: Vec<PredictionView>,
}

/// Router builder exposing prediction, comparison and dataset summary endpoints.
pub fn prediction_router(service: Arc<AdmissionPredictionService>) -> Router {
    Router::new()
        .route("/api/v1/admission/predict", post(predict_handler))
        .route("/api/v1/admission/compare", post(compare_handler))
        .route("/api/v1/admission/programs", get(programs_handler))
        .with_state(service)
}

pub(crate) async fn predict_handler(
    State(service): State<Arc<AdmissionPredictionService>>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_payload(rejection),
    };

    match service.predict(&request.program, &request.profile) {
        Ok(result) => (StatusCode::OK, Json(PredictionView::from(result))).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn compare_handler(
    State(service): State<Arc<AdmissionPredictionService>>,
    payload: Result<Json<ComparisonRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return invalid_payload(rejection),
    };

    match service.compare(&request.profile) {
        Ok(results) => {
            let view = ComparisonView {
                profile: request.profile,
                evaluated_programs: service.dataset().program_count(),
                results: results.into_iter().map(PredictionView::from).collect(),
            };
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn programs_handler(
    State(service): State<Arc<AdmissionPredictionService>>,
) -> Response {
    match service.summary() {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// 400 `invalid_profile` response for a request body that failed to deserialize.
pub fn invalid_payload(rejection: JsonRejection) -> Response {
    let payload = json!({
        "error": rejection.body_text(),
        "kind": "invalid_profile",
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

impl IntoResponse for PredictionError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            PredictionError::Validation(ValidationError::UnknownProgram(_)) => {
                (StatusCode::NOT_FOUND, "unknown_program")
            }
            PredictionError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid_profile"),
            PredictionError::InsufficientData { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "insufficient_data")
            }
            PredictionError::CountOverflow { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "count_overflow")
            }
        };

        let payload = json!({
            "error": self.to_string(),
            "kind": kind,
        });
        (status, Json(payload)).into_response()
    }
}
