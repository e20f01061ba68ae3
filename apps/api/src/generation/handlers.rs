//! Axum route handlers for the Generation API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::generator::{build_input, draft, Draft};
use crate::generation::mock::{mock_response, MockResponse};
use crate::generation::normalizer::{normalize, NormalizedContent};
use crate::generation::suggest::{suggest, SuggestTarget, Suggestion};
use crate::sections::models::FieldValues;
use crate::sections::validation::validate;
use crate::sections::SectionKind;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Either free text, or the section's current fields (validated first and
/// rendered as `Label: value` lines).
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub input: Option<String>,
    pub fields: Option<FieldValues>,
}

/// The entry's current values; the suggestion prompt reads school, degree and field.
#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub fields: FieldValues,
}

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub raw: String,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub content: NormalizedContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/generate/:section
///
/// One model call, then normalization. Refuses to call the model while the
/// supplied fields have validation errors.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<Draft>, AppError> {
    let section: SectionKind = section.parse()?;

    let input = match (request.input, request.fields) {
        (Some(input), _) => input,
        (None, Some(fields)) => {
            let result = validate(section, &fields);
            if result.has_errors() {
                return Err(AppError::ValidationFailed(result));
            }
            build_input(section, &fields)
        }
        (None, None) => {
            return Err(AppError::Validation(
                "Provide either `input` or `fields`".to_string(),
            ))
        }
    };

    info!(
        "Generating {section} content via {} backend",
        state.generator.backend()
    );
    let draft = draft(state.generator.as_ref(), section, &input).await?;
    if draft.content.is_empty() {
        warn!("{section} draft was empty after normalization");
    }
    Ok(Json(draft))
}

/// POST /api/v1/sections/:section/suggest/:field
pub async fn handle_suggest(
    State(state): State<AppState>,
    Path((section, field)): Path<(String, String)>,
    Json(request): Json<SuggestRequest>,
) -> Result<Json<Suggestion>, AppError> {
    let section: SectionKind = section.parse()?;
    let target = SuggestTarget::parse(section, &field).ok_or_else(|| {
        AppError::NotFound(format!("No suggestion available for {section} field '{field}'"))
    })?;

    info!(
        "Suggesting {section} {field} via {} backend",
        state.generator.backend()
    );
    let suggestion = suggest(state.generator.as_ref(), target, &request.fields).await?;
    Ok(Json(suggestion))
}

/// POST /api/v1/normalize/:section
pub async fn handle_normalize(
    Path(section): Path<String>,
    Json(request): Json<NormalizeRequest>,
) -> Result<Json<NormalizeResponse>, AppError> {
    let section: SectionKind = section.parse()?;
    Ok(Json(NormalizeResponse {
        content: normalize(&request.raw, section.normalize_mode()),
    }))
}

/// GET /api/v1/generate/:section/mock
///
/// The offline table entry for a section, with its suggestions.
pub async fn handle_mock(Path(section): Path<String>) -> Result<Json<MockResponse>, AppError> {
    let section: SectionKind = section.parse()?;
    Ok(Json(mock_response(section)))
}
