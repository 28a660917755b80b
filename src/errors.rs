use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::grouping::GroupingError;

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Upstream provider unreachable (connect, DNS, body read).
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered with a non-2xx status.
    #[error("Upstream returned HTTP {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    /// Upstream data did not have the expected shape.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// HTTP status this error is surfaced with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Network(_) | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Relay the provider's status; anything axum can't represent becomes 500.
            AppError::UpstreamStatus { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::MalformedInput(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message placed in the `{ "message": ... }` response body.
    pub fn message(&self) -> String {
        match self {
            AppError::BadRequest(msg)
            | AppError::Network(msg)
            | AppError::MalformedInput(msg)
            | AppError::InternalError(msg) => msg.clone(),
            AppError::UpstreamStatus { message, .. } => message.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, self);
        } else {
            tracing::warn!("Request failed with {}: {}", status, self);
        }

        (
            status,
            axum::Json(ErrorResponse {
                message: self.message(),
            }),
        )
            .into_response()
    }
}

impl From<GroupingError> for AppError {
    fn from(err: GroupingError) -> Self {
        AppError::MalformedInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_is_relayed() {
        let err = AppError::UpstreamStatus {
            status: 404,
            message: "city not found".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "city not found");
    }

    #[test]
    fn test_invalid_upstream_status_defaults_to_500() {
        let err = AppError::UpstreamStatus {
            status: 1000,
            message: "weird".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_network_error_is_500() {
        let err = AppError::Network("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "connection refused");
    }

    #[test]
    fn test_grouping_error_maps_to_bad_gateway() {
        let err: AppError = GroupingError::MalformedTimestamp {
            index: 3,
            dt_txt: "2024-01-01T09:00:00".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.message().contains("2024-01-01T09:00:00"));
    }

    #[tokio::test]
    async fn test_into_response_body_shape() {
        let response = AppError::BadRequest("city is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "message": "city is required" }));
    }
}
