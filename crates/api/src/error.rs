use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{FieldViolation, InventoryError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    /// Validation failure without field details.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl From<FieldViolation> for ValidationDetail {
    fn from(v: FieldViolation) -> Self {
        Self {
            field: v.field,
            message: v.message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                (!details.is_empty()).then_some(details),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::warn!("Transient failure: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    "The resource is busy. Please try again.".into(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Validation { .. } | InventoryError::ImmutableAssetSet { .. } => {
                ApiError::Validation {
                    details: err.violations().into_iter().map(Into::into).collect(),
                    message: err.to_string(),
                }
            }
            InventoryError::NotFound(_) => ApiError::NotFound(err.to_string()),
            InventoryError::Conflict(msg) => ApiError::Conflict(msg),
            InventoryError::Transient(msg) => ApiError::ServiceUnavailable(msg),
            InventoryError::Database(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        InventoryError::from(err).into()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        InventoryError::from(errors).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::validation("x").into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::ServiceUnavailable("x".into())
                .into_response()
                .status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(ApiError::NotFound("test".into()).to_string(), "Not found: test");
        assert_eq!(
            ApiError::validation("bad").to_string(),
            "Validation error: bad"
        );
    }

    #[tokio::test]
    async fn test_validation_body_carries_details() {
        let err: ApiError = InventoryError::ImmutableAssetSet {
            reception_id: 5,
            added: vec![],
            removed: vec![2],
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0]["field"], "assets");
        assert!(body["details"][0]["message"]
            .as_str()
            .unwrap()
            .contains('2'));
    }

    #[tokio::test]
    async fn test_validation_without_details_omits_field() {
        let body = body_json(ApiError::validation("bad").into_response()).await;
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_internal_error_hides_message() {
        let body = body_json(ApiError::Internal("secret".into()).into_response()).await;
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[test]
    fn test_not_found_keeps_subject() {
        let err: ApiError = InventoryError::NotFound("Reception 9".into()).into();
        assert_eq!(err.to_string(), "Not found: Reception 9 not found");
    }

    #[test]
    fn test_transient_maps_to_service_unavailable() {
        let err: ApiError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, ApiError::NotFound(_)));
    }
}
