//! Request-boundary error mapping
//!
//! Every failure is caught here and converted to the flat `{"error": "..."}`
//! JSON body; nothing propagates far enough to crash the serving process.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use shardchat_common::ShardChatError;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// HTTP-facing error
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ShardChatError> for ApiError {
    fn from(err: ShardChatError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            axum::Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_too_large_maps_to_400() {
        let err = ApiError::from(ShardChatError::PromptTooLarge {
            len: 600_001,
            max: 600_000,
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_generation_failure_maps_to_500() {
        let err = ApiError::from(ShardChatError::generation("boom"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn test_flat_error_body() {
        let body = serde_json::to_value(ErrorResponse {
            error: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"error": "boom"}));
    }
}
