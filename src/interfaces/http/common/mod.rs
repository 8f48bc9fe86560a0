//! Common API types

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope.
///
/// Every REST endpoint wraps its payload in this shape.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload; `null` on failure
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// HTTP status for each domain error kind.
pub fn error_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::SpaceOccupied(_)
        | DomainError::AlreadyClosed(_)
        | DomainError::DuplicateKey(_)
        | DomainError::ReferencedByOpenSession { .. } => StatusCode::CONFLICT,
        DomainError::InvalidTimeRange(_) | DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Uniform failure tuple for handlers.
pub fn error_response(err: DomainError) -> (StatusCode, Json<ApiResponse<()>>) {
    (error_status(&err), Json(ApiResponse::error(err.to_string())))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_per_error_kind() {
        assert_eq!(
            error_status(&DomainError::NotFound {
                entity: "Space",
                field: "id",
                value: "1".into(),
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&DomainError::SpaceOccupied(1)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&DomainError::AlreadyClosed(1)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&DomainError::InvalidTimeRange("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&DomainError::StorageUnavailable("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn envelope_success_and_error_shapes() {
        let ok = ApiResponse::success(42);
        assert!(ok.success);
        assert_eq!(ok.data, Some(42));
        assert!(ok.error.is_none());

        let err = ApiResponse::<()>::error("boom");
        assert!(!err.success);
        assert!(err.data.is_none());
        assert_eq!(err.error.as_deref(), Some("boom"));
    }
}
