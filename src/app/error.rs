use crate::domain::model::ErrorResponse;
use crate::utils::error::PredictorError;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

/// HTTP 層的錯誤包裝，輸出 `{"detail": "..."}`
#[derive(Debug)]
pub struct ApiError(pub PredictorError);

impl From<PredictorError> for ApiError {
    fn from(err: PredictorError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PredictorError::ValidationError {
            status: rejection.status().as_u16(),
            message: rejection.body_text(),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_client_error() {
            tracing::warn!("Request rejected ({}): {}", status, self.0);
        } else {
            tracing::error!("Request failed ({}): {}", status, self.0);
        }

        (
            status,
            Json(ErrorResponse {
                detail: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// `Json` 的替代品，驗證失敗時走 `ApiError` 的回應格式。
/// 沒有 Content-Type 時直接把 body 當 JSON 解析；有但不是 JSON 才拒絕
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.headers().contains_key(header::CONTENT_TYPE) {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            return Ok(Self(value));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            ApiError(PredictorError::ValidationError {
                status: rejection.status().as_u16(),
                message: rejection.body_text(),
            })
        })?;

        let value = serde_json::from_slice(&bytes).map_err(|e| {
            ApiError(PredictorError::ValidationError {
                status: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                message: format!("Failed to parse the request body as JSON: {}", e),
            })
        })?;
        Ok(Self(value))
    }
}
