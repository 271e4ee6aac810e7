use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use super::domain::{ApplicationRecord, PredictedStatus, RecordId};
use super::service::{LoanPredictionService, PredictionRequest, PredictionServiceError};
use super::store::ApplicationStore;

/// Router builder exposing the prediction and history endpoints.
pub fn loan_router<S>(service: Arc<LoanPredictionService<S>>) -> Router
where
    S: ApplicationStore + 'static,
{
    Router::new()
        .route("/api/v1/loans/predict", post(predict_handler::<S>))
        .route("/functions/v1/predict-loan", post(predict_handler::<S>))
        .route("/api/v1/loans/applications", get(history_handler::<S>))
        .with_state(service)
        .layer(cors_layer())
}

/// Open cross-origin policy; preflight requests are answered without a body.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub success: bool,
    pub prediction: PredictedStatus,
    pub confidence: f64,
    pub application_id: RecordId,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub applications: Vec<ApplicationRecord>,
}

pub(crate) async fn predict_handler<S>(
    State(service): State<Arc<LoanPredictionService<S>>>,
    body: Bytes,
) -> Response
where
    S: ApplicationStore + 'static,
{
    // Decoded regardless of Content-Type; browser and function clients do not always set it.
    let request = match serde_json::from_slice::<PredictionRequest>(&body) {
        Ok(request) => request,
        Err(err) => {
            let payload = json!({ "error": format!("Invalid request body: {err}") });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match service.submit(request) {
        Ok(receipt) => {
            let prediction = receipt.prediction();
            let body = PredictionResponse {
                success: true,
                prediction: prediction.predicted_status,
                confidence: prediction.prediction_confidence,
                application_id: receipt.record.id,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(err @ PredictionServiceError::MissingApplication) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(err @ PredictionServiceError::Storage(_)) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn history_handler<S>(
    State(service): State<Arc<LoanPredictionService<S>>>,
    Query(query): Query<HistoryQuery>,
) -> Response
where
    S: ApplicationStore + 'static,
{
    match service.history(query.limit) {
        Ok(applications) => {
            (StatusCode::OK, axum::Json(HistoryResponse { applications })).into_response()
        }
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
