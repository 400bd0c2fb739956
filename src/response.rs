use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::analysis::AnalysisError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub is_operational: bool,
}

impl AppError {
    fn operational(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            code: code.to_string(),
            message: message.to_string(),
            is_operational: true,
        }
    }

    pub fn bad_request(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn unprocessable(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::UNPROCESSABLE_ENTITY, code, message)
    }

    pub fn payload_too_large(message: &str) -> Self {
        Self::operational(StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", message)
    }

    pub fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR".to_string(),
            message: message.to_string(),
            is_operational: false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let exposed_message = if self.is_operational {
            self.message.clone()
        } else {
            "Internal server error".to_string()
        };

        if self.is_operational {
            tracing::warn!(status = %self.status, code = %self.code, error = %self.message, "API error");
        } else {
            tracing::error!(status = %self.status, code = %self.code, error = %self.message, "Internal API error");
        }

        (
            self.status,
            Json(ErrorBody {
                success: false,
                code: self.code,
                message: exposed_message,
                trace_id: None,
            }),
        )
            .into_response()
    }
}

// Input and config problems are echoed. Worker failures are internal and get
// redacted in IntoResponse.
impl From<AnalysisError> for AppError {
    fn from(value: AnalysisError) -> Self {
        match &value {
            AnalysisError::SourceUnavailable(msg) => {
                AppError::unprocessable("SOURCE_UNAVAILABLE", msg)
            }
            AnalysisError::InvalidInput(msg) => AppError::bad_request("VALIDATION_ERROR", msg),
            AnalysisError::InvalidConfig(msg) => AppError::bad_request("INVALID_CONFIG", msg),
            AnalysisError::WorkerFailed(_) => AppError::internal(&value.to_string()),
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data,
        }),
    )
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::response::IntoResponse;

    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn internal_error_is_redacted() {
        let resp = AppError::internal("worker exploded").into_response();
        let json = body_json(resp).await;
        assert_eq!(json["message"], "Internal server error");
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn source_unavailable_maps_to_422() {
        let err: AppError = AnalysisError::SourceUnavailable("cannot open clip".into()).into();
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert_eq!(json["code"], "SOURCE_UNAVAILABLE");
        assert!(json["message"].as_str().unwrap().contains("cannot open clip"));
    }

    #[tokio::test]
    async fn invalid_input_keeps_message() {
        let err: AppError = AnalysisError::InvalidInput("fps must be finite".into()).into();
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "fps must be finite");
    }

    #[tokio::test]
    async fn worker_failure_is_internal() {
        let err: AppError = AnalysisError::WorkerFailed("join error".into()).into();
        assert!(!err.is_operational);
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
