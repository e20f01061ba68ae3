use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::portfolio::EditError;
use crate::sections::validation::ValidationResult;
use crate::sections::UnknownSection;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Submitted fields failed section validation; carries the full result.
    #[error("{} field(s) failed validation", .0.error_count())]
    ValidationFailed(ValidationResult),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<UnknownSection> for AppError {
    fn from(err: UnknownSection) -> Self {
        AppError::NotFound(err.to_string())
    }
}

impl From<EditError> for AppError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::UnknownEntry { .. } => AppError::NotFound(err.to_string()),
            EditError::NotAList(_) | EditError::LastEntry(_) | EditError::UnknownField { .. } => {
                AppError::Validation(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut fields = None;
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::ValidationFailed(result) => {
                fields = Some(result.clone());
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Please fix the highlighted fields before generating content.".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "Failed to generate AI content. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(fields) = fields {
            error["fields"] = json!(fields);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;
    use crate::sections::models::FieldValues;
    use crate::sections::validation::validate;
    use crate::sections::SectionKind;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unknown_section_maps_to_404() {
        let err: AppError = "theme".parse::<SectionKind>().unwrap_err().into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Unknown section 'theme'");
    }

    #[tokio::test]
    async fn test_validation_failed_carries_fields() {
        let result = validate(SectionKind::Contact, &FieldValues::new());
        let response = AppError::ValidationFailed(result).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["fields"]["email"], "Email is required.");
        assert!(body["error"]["fields"]["phone"].is_null());
    }

    #[tokio::test]
    async fn test_llm_error_hides_provider_detail() {
        let response = AppError::Llm("401 bad token hf_secret".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert!(!body.to_string().contains("hf_secret"));
    }

    #[test]
    fn test_validation_failed_display_counts_errors() {
        let result = validate(SectionKind::About, &FieldValues::new());
        assert_eq!(
            AppError::ValidationFailed(result).to_string(),
            "3 field(s) failed validation"
        );
    }
}
