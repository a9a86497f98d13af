use crate::app::docs;
use crate::app::error::{ApiError, ApiJson};
use crate::app::server::AppState;
use crate::domain::model::{HealthStatus, LegoInput, PredictionResponse, RootMessage};
use axum::extract::State;
use axum::response::Html;
use axum::Json;

pub const ROOT_MESSAGE: &str = "Go to /docs to work with the API";

pub async fn root() -> Json<RootMessage> {
    Json(RootMessage {
        message: ROOT_MESSAGE.to_string(),
    })
}

pub async fn predict(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LegoInput>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let response = state.predictor.predict(input)?;
    Ok(Json(response))
}

/// 只回報程序存活與模型狀態，不影響 /predict/ 的行為
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        model_loaded: state.predictor.model_loaded(),
    })
}

pub async fn openapi(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(docs::openapi_document(&state.info))
}

pub async fn docs_page(State(state): State<AppState>) -> Html<String> {
    Html(docs::docs_page(&state.info))
}
