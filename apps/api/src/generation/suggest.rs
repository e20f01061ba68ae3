//! Single-field suggestions for an education entry: degree, field of study,
//! or the study period. Each is one model call through the education prompt,
//! reduced to the value the form needs.

use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::generation::generator::ContentGenerator;
use crate::generation::normalizer::{first_line, year_range};
use crate::generation::prompts::suggestion_prompt;
use crate::sections::models::FieldValues;
use crate::sections::SectionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestTarget {
    Degree,
    FieldOfStudy,
    Period,
}

impl SuggestTarget {
    /// The target named by `field` in `section`, if one is offered there.
    pub fn parse(section: SectionKind, field: &str) -> Option<Self> {
        match (section, field) {
            (SectionKind::Education, "degree") => Some(Self::Degree),
            (SectionKind::Education, "field") => Some(Self::FieldOfStudy),
            (SectionKind::Education, "period") => Some(Self::Period),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::FieldOfStudy => "field",
            Self::Period => "period",
        }
    }
}

/// Field values to merge into the entry. Empty when the reply held nothing usable.
#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub section: SectionKind,
    pub field: &'static str,
    pub backend: &'static str,
    pub values: FieldValues,
}

pub async fn suggest(
    generator: &dyn ContentGenerator,
    target: SuggestTarget,
    fields: &FieldValues,
) -> Result<Suggestion, AppError> {
    let prompt = suggestion_prompt(target, fields);
    let raw = generator.generate(SectionKind::Education, &prompt).await?;

    let mut values = FieldValues::new();
    match target {
        SuggestTarget::Degree => {
            if let Some(degree) = first_line(&raw) {
                values.set("degree", degree);
            }
        }
        SuggestTarget::FieldOfStudy => {
            if let Some(field) = first_line(&raw) {
                values.set("field", field);
            }
        }
        SuggestTarget::Period => {
            if let Some((start, end)) = year_range(&raw) {
                values.set("startDate", start);
                values.set("endDate", end);
            }
        }
    }
    if values.is_empty() {
        debug!("No usable {} suggestion in reply", target.as_str());
    }

    Ok(Suggestion {
        section: SectionKind::Education,
        field: target.as_str(),
        backend: generator.backend(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Returns a fixed reply and remembers the last call.
    struct CannedGenerator {
        reply: &'static str,
        seen: Mutex<Option<(SectionKind, String)>>,
    }

    impl CannedGenerator {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ContentGenerator for CannedGenerator {
        async fn generate(&self, section: SectionKind, input: &str) -> Result<String, AppError> {
            *self.seen.lock().unwrap() = Some((section, input.to_string()));
            Ok(self.reply.to_string())
        }

        fn backend(&self) -> &'static str {
            "canned"
        }
    }

    #[test]
    fn test_targets_only_exist_for_education() {
        assert_eq!(
            SuggestTarget::parse(SectionKind::Education, "field"),
            Some(SuggestTarget::FieldOfStudy)
        );
        assert_eq!(SuggestTarget::parse(SectionKind::Education, "school"), None);
        assert_eq!(SuggestTarget::parse(SectionKind::Experience, "degree"), None);
    }

    #[tokio::test]
    async fn test_degree_keeps_first_line_only() {
        let generator = CannedGenerator::new("<think>MIT is technical</think>\nB.Sc. Computer Science\nIt is common.");
        let fields = FieldValues::new().with("school", "MIT");
        let suggestion = suggest(&generator, SuggestTarget::Degree, &fields).await.unwrap();

        assert_eq!(suggestion.field, "degree");
        assert_eq!(suggestion.backend, "canned");
        assert_eq!(suggestion.values.value("degree"), "B.Sc. Computer Science");
        assert!(suggestion.values.get("field").is_none());

        let (section, prompt) = generator.seen.lock().unwrap().clone().unwrap();
        assert_eq!(section, SectionKind::Education);
        assert!(prompt.contains("for a student at MIT."), "{prompt}");
    }

    #[tokio::test]
    async fn test_field_of_study_fills_field() {
        let generator = CannedGenerator::new("  Physics  ");
        let fields = FieldValues::new().with("degree", "B.Sc.");
        let suggestion = suggest(&generator, SuggestTarget::FieldOfStudy, &fields).await.unwrap();
        assert_eq!(suggestion.values.value("field"), "Physics");
    }

    #[tokio::test]
    async fn test_period_sets_both_dates() {
        let generator = CannedGenerator::new("Typically 2015 - 2019.");
        let suggestion = suggest(&generator, SuggestTarget::Period, &FieldValues::new()).await.unwrap();
        assert_eq!(suggestion.values.value("startDate"), "2015");
        assert_eq!(suggestion.values.value("endDate"), "2019");
    }

    #[tokio::test]
    async fn test_unusable_reply_gives_no_values() {
        let generator = CannedGenerator::new("It depends on the program.");
        let suggestion = suggest(&generator, SuggestTarget::Period, &FieldValues::new()).await.unwrap();
        assert!(suggestion.values.is_empty());

        let generator = CannedGenerator::new("<think>unsure</think>");
        let suggestion = suggest(&generator, SuggestTarget::Degree, &FieldValues::new()).await.unwrap();
        assert!(suggestion.values.is_empty());
    }
}
