//! Axum route handlers for the Sections API.

use std::collections::{BTreeMap, HashSet};

use axum::{extract::Path, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::generation::normalizer::NormalizeMode;
use crate::models::portfolio::{Portfolio, PortfolioEdit};
use crate::sections::models::{EntryId, FieldValues, SectionEntry};
use crate::sections::validation::{
    validate, validate_entries, validate_portfolio, visible_errors, ValidationResult,
};
use crate::sections::SectionKind;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SectionSummary {
    pub id: SectionKind,
    pub step: Option<usize>,
    pub previous: Option<SectionKind>,
    pub next: Option<SectionKind>,
    pub title: &'static str,
    pub description: &'static str,
    pub is_list: bool,
    pub normalize_mode: NormalizeMode,
}

#[derive(Debug, Deserialize)]
pub struct ValidateFieldsRequest {
    #[serde(default)]
    pub fields: FieldValues,
    /// Fields the user has interacted with. When present, `visible` is returned.
    pub touched: Option<HashSet<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateEntriesRequest {
    #[serde(default)]
    pub entries: Vec<SectionEntry>,
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub errors: ValidationResult,
    pub has_errors: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<BTreeMap<String, String>>,
}

impl From<ValidationResult> for ValidationResponse {
    fn from(errors: ValidationResult) -> Self {
        Self {
            has_errors: errors.has_errors(),
            errors,
            visible: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EditPortfolioRequest {
    #[serde(default = "Portfolio::new")]
    pub portfolio: Portfolio,
    pub edit: PortfolioEdit,
}

#[derive(Debug, Serialize)]
pub struct EditPortfolioResponse {
    pub portfolio: Portfolio,
    /// Id of the entry created by an `add_entry` edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added: Option<EntryId>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sections
///
/// All sections in wizard order, preview last.
pub async fn handle_list_sections() -> Json<Vec<SectionSummary>> {
    Json(
        SectionKind::ALL
            .into_iter()
            .map(|kind| SectionSummary {
                id: kind,
                step: kind.step_number(),
                previous: kind.previous(),
                next: kind.next(),
                title: kind.title(),
                description: kind.description(),
                is_list: kind.is_list(),
                normalize_mode: kind.normalize_mode(),
            })
            .collect(),
    )
}

/// POST /api/v1/sections/:section/validate
pub async fn handle_validate_fields(
    Path(section): Path<String>,
    Json(request): Json<ValidateFieldsRequest>,
) -> Result<Json<ValidationResponse>, AppError> {
    let section: SectionKind = section.parse()?;
    let errors = validate(section, &request.fields);
    debug!("{section}: {} field error(s)", errors.error_count());

    let visible = request
        .touched
        .as_ref()
        .map(|touched| visible_errors(&errors, touched));
    let mut response = ValidationResponse::from(errors);
    response.visible = visible;
    Ok(Json(response))
}

/// POST /api/v1/sections/:section/entries/validate
pub async fn handle_validate_entries(
    Path(section): Path<String>,
    Json(request): Json<ValidateEntriesRequest>,
) -> Result<Json<ValidationResponse>, AppError> {
    let section = list_section(&section)?;
    Ok(Json(validate_entries(section, &request.entries).into()))
}

/// POST /api/v1/sections/:section/entries/new
///
/// A blank entry with a fresh id and every schema field present.
pub async fn handle_new_entry(Path(section): Path<String>) -> Result<Json<SectionEntry>, AppError> {
    let section = list_section(&section)?;
    Ok(Json(SectionEntry::blank(section)))
}

/// POST /api/v1/portfolio/validate
pub async fn handle_validate_portfolio(
    Json(portfolio): Json<Portfolio>,
) -> Json<ValidationResponse> {
    Json(validate_portfolio(&portfolio).into())
}

/// POST /api/v1/portfolio/edit
///
/// Applies one wizard edit to the posted document and returns the result.
pub async fn handle_edit_portfolio(
    Json(request): Json<EditPortfolioRequest>,
) -> Result<Json<EditPortfolioResponse>, AppError> {
    let mut portfolio = request.portfolio;
    let added = portfolio.apply(request.edit)?;
    if let Some(id) = added {
        debug!("Added entry {id}");
    }
    Ok(Json(EditPortfolioResponse { portfolio, added }))
}

fn list_section(tag: &str) -> Result<SectionKind, AppError> {
    let section: SectionKind = tag.parse()?;
    if !section.is_list() {
        return Err(AppError::Validation(format!(
            "Section '{section}' does not hold a list of entries"
        )));
    }
    Ok(section)
}
