pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::sections::handlers as sections;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sections API: schemas, wizard steps, validation
        .route("/api/v1/sections", get(sections::handle_list_sections))
        .route(
            "/api/v1/sections/:section/validate",
            post(sections::handle_validate_fields),
        )
        .route(
            "/api/v1/sections/:section/entries/validate",
            post(sections::handle_validate_entries),
        )
        .route(
            "/api/v1/sections/:section/entries/new",
            post(sections::handle_new_entry),
        )
        .route(
            "/api/v1/portfolio/validate",
            post(sections::handle_validate_portfolio),
        )
        .route("/api/v1/portfolio/edit", post(sections::handle_edit_portfolio))
        .route(
            "/api/v1/sections/:section/suggest/:field",
            post(generation::handle_suggest),
        )
        // Generation API: drafting and normalization
        .route("/api/v1/generate/:section", post(generation::handle_generate))
        .route(
            "/api/v1/generate/:section/mock",
            get(generation::handle_mock),
        )
        .route(
            "/api/v1/normalize/:section",
            post(generation::handle_normalize),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, LlmBackend};
    use crate::errors::AppError;
    use crate::generation::generator::{ContentGenerator, MockGenerator};
    use crate::sections::validation::{DATE_ORDER_MESSAGE, EMAIL_MESSAGE, PHONE_MESSAGE};
    use crate::sections::SectionKind;

    /// Replies like a reasoning model: a think block, then the answer.
    struct ReasoningGenerator;

    #[async_trait]
    impl ContentGenerator for ReasoningGenerator {
        async fn generate(&self, section: SectionKind, input: &str) -> Result<String, AppError> {
            Ok(match section {
                SectionKind::Skills => "<think>secret plan</think>\nTechnical Skills:\n- Rust, Go\n- Rust".into(),
                _ => format!("<think>secret plan</think>\n  Drafted from [{input}]  "),
            })
        }

        fn backend(&self) -> &'static str {
            "reasoning"
        }
    }

    fn test_config(backend: LlmBackend) -> Config {
        Config {
            huggingface_token: None,
            llm_base_url: "http://127.0.0.1:1/v1".to_string(),
            llm_backend: backend,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn app(generator: Arc<dyn ContentGenerator>) -> Router {
        build_router(AppState {
            config: test_config(LlmBackend::Mock),
            generator,
        })
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(body) => Body::from(body.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let (status, body) = send(app(Arc::new(MockGenerator)), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["llm_backend"], "mock");
        assert_eq!(body["llm_credential"], false);
    }

    #[tokio::test]
    async fn test_lists_sections_in_wizard_order() {
        let (status, body) = send(app(Arc::new(MockGenerator)), "GET", "/api/v1/sections", None).await;
        assert_eq!(status, StatusCode::OK);
        let sections = body.as_array().unwrap();
        assert_eq!(sections.len(), 8);
        assert_eq!(sections[0]["id"], "about");
        assert_eq!(sections[0]["step"], 1);
        assert!(sections[0]["previous"].is_null());
        assert_eq!(sections[0]["next"], "experience");
        assert_eq!(sections[3]["normalize_mode"], "skill_list");
        assert_eq!(sections[7]["id"], "preview");
        assert!(sections[7]["step"].is_null());
    }

    #[tokio::test]
    async fn test_validate_fields_reports_every_field() {
        let (status, body) = send(
            app(Arc::new(MockGenerator)),
            "POST",
            "/api/v1/sections/contact/validate",
            Some(json!({ "fields": { "email": "a@b.co", "phone": "12" } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["has_errors"], true);
        assert!(body["errors"]["email"].is_null());
        assert_eq!(body["errors"]["phone"], PHONE_MESSAGE);
        assert!(body["errors"].as_object().unwrap().contains_key("website"));
        assert!(body.get("visible").is_none());
    }

    #[tokio::test]
    async fn test_validate_fields_filters_visible_by_touched() {
        let (_, body) = send(
            app(Arc::new(MockGenerator)),
            "POST",
            "/api/v1/sections/about/validate",
            Some(json!({ "fields": {}, "touched": ["name"] })),
        )
        .await;
        let visible = body["visible"].as_object().unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible["name"], "Name is required.");
    }

    #[tokio::test]
    async fn test_unknown_section_is_404() {
        let (status, body) = send(
            app(Arc::new(MockGenerator)),
            "POST",
            "/api/v1/sections/theme/validate",
            Some(json!({ "fields": {} })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_entries_endpoints_reject_single_form_sections() {
        let (status, _) = send(
            app(Arc::new(MockGenerator)),
            "POST",
            "/api/v1/sections/about/entries/new",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_new_entry_has_id_and_all_fields() {
        let (status, body) = send(
            app(Arc::new(MockGenerator)),
            "POST",
            "/api/v1/sections/awards/entries/new",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["id"].as_str().unwrap().parse::<u64>().is_ok());
        for field in ["title", "issuer", "year", "description"] {
            assert_eq!(body[field], "", "{field}");
        }
    }

    #[tokio::test]
    async fn test_validate_entries_uses_indexed_keys() {
        let (_, body) = send(
            app(Arc::new(MockGenerator)),
            "POST",
            "/api/v1/sections/experience/entries/validate",
            Some(json!({ "entries": [
                { "id": "1", "company": "Acme", "title": "Dev", "startDate": "2023-05",
                  "endDate": "2022-01", "description": "x".repeat(50) }
            ] })),
        )
        .await;
        assert_eq!(body["errors"]["experience-0-endDate"], DATE_ORDER_MESSAGE);
    }

    #[tokio::test]
    async fn test_edit_adds_skills_without_duplicates() {
        let (status, body) = send(
            app(Arc::new(MockGenerator)),
            "POST",
            "/api/v1/portfolio/edit",
            Some(json!({
                "portfolio": { "skills": ["Rust"] },
                "edit": { "op": "add_skills", "skills": ["Go", " Rust ", ""] }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["portfolio"]["skills"], json!(["Rust", "Go"]));
        assert!(body.get("added").is_none());
    }

    #[tokio::test]
    async fn test_edit_add_entry_returns_new_id() {
        let (status, body) = send(
            app(Arc::new(MockGenerator)),
            "POST",
            "/api/v1/portfolio/edit",
            Some(json!({ "edit": { "op": "add_entry", "section": "awards" } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let awards = body["portfolio"]["awards"].as_array().unwrap();
        assert_eq!(awards.len(), 2);
        assert_eq!(awards[1]["id"], body["added"]);
    }

    #[tokio::test]
    async fn test_edit_refuses_removing_last_entry() {
        let (status, body) = send(
            app(Arc::new(MockGenerator)),
            "POST",
            "/api/v1/portfolio/edit",
            Some(json!({
                "portfolio": { "education": [{ "id": "5", "school": "MIT" }] },
                "edit": { "op": "remove_entry", "section": "education", "id": "5" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "The last education entry cannot be removed");
    }

    #[tokio::test]
    async fn test_edit_rejects_overwriting_entry_id() {
        let (status, body) = send(
            app(Arc::new(MockGenerator)),
            "POST",
            "/api/v1/portfolio/edit",
            Some(json!({
                "portfolio": { "awards": [{ "id": "9", "title": "Best Paper" }] },
                "edit": { "op": "update_entry", "section": "awards", "id": "9",
                          "field": "id", "value": "hijack" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Section 'awards' has no field 'id'");
    }

    #[tokio::test]
    async fn test_edit_unknown_entry_is_404() {
        let (status, _) = send(
            app(Arc::new(MockGenerator)),
            "POST",
            "/api/v1/portfolio/edit",
            Some(json!({
                "edit": { "op": "update_entry", "section": "experience", "id": "1",
                          "field": "company", "value": "Acme" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generate_never_leaks_reasoning() {
        let (status, body) = send(
            app(Arc::new(ReasoningGenerator)),
            "POST",
            "/api/v1/generate/about",
            Some(json!({ "input": "Name: Ada" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["section"], "about");
        assert_eq!(body["backend"], "reasoning");
        assert_eq!(body["content"], "Drafted from [Name: Ada]");
        assert!(!body.to_string().contains("secret plan"));
    }

    #[tokio::test]
    async fn test_generate_skills_returns_list() {
        let (_, body) = send(
            app(Arc::new(ReasoningGenerator)),
            "POST",
            "/api/v1/generate/skills",
            Some(json!({ "input": "backend developer" })),
        )
        .await;
        assert_eq!(body["content"], json!(["Rust", "Go"]));
    }

    #[tokio::test]
    async fn test_generate_from_fields_builds_labelled_input() {
        let (status, body) = send(
            app(Arc::new(ReasoningGenerator)),
            "POST",
            "/api/v1/generate/testimonials",
            Some(json!({ "fields": {
                "name": "Jordan", "role": "CTO", "company": "Acme",
                "feedback": "Great engineer, shipped on time."
            } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let content = body["content"].as_str().unwrap();
        assert!(content.contains("Name: Jordan\nRole: CTO\nCompany: Acme"), "{content}");
    }

    #[tokio::test]
    async fn test_generate_rejects_invalid_fields() {
        let (status, body) = send(
            app(Arc::new(ReasoningGenerator)),
            "POST",
            "/api/v1/generate/contact",
            Some(json!({ "fields": { "email": "not-an-email" } })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["fields"]["email"], EMAIL_MESSAGE);
    }

    #[tokio::test]
    async fn test_generate_requires_input_or_fields() {
        let (status, _) = send(
            app(Arc::new(MockGenerator)),
            "POST",
            "/api/v1/generate/about",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_suggest_degree_returns_first_line() {
        let (status, body) = send(
            app(Arc::new(ReasoningGenerator)),
            "POST",
            "/api/v1/sections/education/suggest/degree",
            Some(json!({ "fields": { "school": "MIT" } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["section"], "education");
        assert_eq!(body["field"], "degree");
        let degree = body["values"]["degree"].as_str().unwrap();
        assert!(
            degree.starts_with("Drafted from [Suggest the most likely degree for a student at MIT."),
            "{degree}"
        );
        assert!(!body.to_string().contains("secret plan"));
    }

    #[tokio::test]
    async fn test_suggest_period_without_years_is_empty() {
        let (status, body) = send(
            app(Arc::new(ReasoningGenerator)),
            "POST",
            "/api/v1/sections/education/suggest/period",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["values"], json!({}));
    }

    #[tokio::test]
    async fn test_suggest_unknown_field_is_404() {
        let (status, body) = send(
            app(Arc::new(MockGenerator)),
            "POST",
            "/api/v1/sections/experience/suggest/degree",
            Some(json!({ "fields": {} })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"]["message"],
            "No suggestion available for experience field 'degree'"
        );
    }

    #[tokio::test]
    async fn test_normalize_endpoint() {
        let (status, body) = send(
            app(Arc::new(MockGenerator)),
            "POST",
            "/api/v1/normalize/skills",
            Some(json!({ "raw": "<think>x</think>Frontend: React, Vue\nDevOps:" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], json!(["React", "Vue", "DevOps"]));
    }

    #[tokio::test]
    async fn test_mock_endpoint_has_suggestions() {
        let (status, body) = send(
            app(Arc::new(MockGenerator)),
            "GET",
            "/api/v1/generate/experience/mock",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"][0]["company"], "Northwind Labs");
        assert_eq!(body["suggestions"].as_array().unwrap().len(), 3);
    }
}
