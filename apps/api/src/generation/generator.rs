//! Content generation behind a pluggable drafting trait.
//!
//! Default: `RemoteGenerator` (one chat-completion call per request, no retry).
//! Offline: `MockGenerator` (static section-keyed replies).
//!
//! `AppState` holds an `Arc<dyn ContentGenerator>`, chosen at startup via config.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::generation::mock::mock_response;
use crate::generation::normalizer::{normalize, NormalizedContent};
use crate::generation::prompts::render_prompt;
use crate::llm_client::LlmClient;
use crate::sections::models::FieldValues;
use crate::sections::schema::fields_for;
use crate::sections::SectionKind;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Produces a raw model reply for a section. Implement this to swap backends
/// without touching handlers.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, section: SectionKind, input: &str) -> Result<String, AppError>;

    /// "remote" | "mock", reported back to callers.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// RemoteGenerator: hosted model via llm_client
// ────────────────────────────────────────────────────────────────────────────

pub struct RemoteGenerator {
    llm: LlmClient,
}

impl RemoteGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ContentGenerator for RemoteGenerator {
    async fn generate(&self, section: SectionKind, input: &str) -> Result<String, AppError> {
        let prompt = render_prompt(section, input);
        info!("Requesting {section} draft ({} prompt chars)", prompt.len());

        let reply = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|e| AppError::Llm(format!("{section} generation failed: {e}")))?;

        debug!("Received {section} draft ({} chars)", reply.len());
        Ok(reply)
    }

    fn backend(&self) -> &'static str {
        "remote"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// MockGenerator: offline table
// ────────────────────────────────────────────────────────────────────────────

pub struct MockGenerator;

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate(&self, section: SectionKind, _input: &str) -> Result<String, AppError> {
        Ok(mock_response(section).to_text(section))
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Normalized draft ready for display. The raw reply is never exposed.
#[derive(Debug, Clone, Serialize)]
pub struct Draft {
    pub section: SectionKind,
    pub backend: &'static str,
    pub content: NormalizedContent,
}

/// Generates a reply for `section` and normalizes it in the section's mode.
pub async fn draft(
    generator: &dyn ContentGenerator,
    section: SectionKind,
    input: &str,
) -> Result<Draft, AppError> {
    let raw = generator.generate(section, input).await?;
    Ok(Draft {
        section,
        backend: generator.backend(),
        content: normalize(&raw, section.normalize_mode()),
    })
}

/// Renders a section's fields as `Label: value` lines, in schema order.
pub fn build_input(section: SectionKind, fields: &FieldValues) -> String {
    fields_for(section)
        .iter()
        .map(|rule| format!("{}: {}", rule.label, fields.value(rule.name)))
        .collect::<Vec<_>>()
        .join("\n")
}
