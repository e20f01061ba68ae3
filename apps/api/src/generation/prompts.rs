// Drafting prompts, one fixed instruction per section.
// The caller's input is always appended verbatim as the tail of the prompt.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::generation::suggest::SuggestTarget;
use crate::llm_client::prompts::PLAIN_TEXT_ONLY;
use crate::sections::models::FieldValues;
use crate::sections::SectionKind;

pub const ABOUT_INSTRUCTION: &str =
    "Write a professional bio for a personal portfolio from the details below.";

pub const EXPERIENCE_INSTRUCTION: &str =
    "Write a concise portfolio entry describing this role and its achievements from the details below.";

pub const EDUCATION_INSTRUCTION: &str =
    "Write a short education entry for a personal portfolio from the details below.";

pub const SKILLS_INSTRUCTION: &str =
    "List only the skills relevant to a personal portfolio based on the input below, \
    as a single comma-separated list of skill names.";

pub const AWARDS_INSTRUCTION: &str =
    "Write an awards and recognition entry for a personal portfolio from the details below.";

pub const TESTIMONIALS_INSTRUCTION: &str =
    "Write a testimonial suitable for a personal portfolio. Output only the testimonial itself.";

pub const CONTACT_INSTRUCTION: &str =
    "Write a simple contact section for a personal portfolio containing only the contact details below.";

pub const PREVIEW_INSTRUCTION: &str =
    "Write a short summary that previews the personal portfolio described below.";

pub fn instruction(section: SectionKind) -> &'static str {
    match section {
        SectionKind::About => ABOUT_INSTRUCTION,
        SectionKind::Experience => EXPERIENCE_INSTRUCTION,
        SectionKind::Education => EDUCATION_INSTRUCTION,
        SectionKind::Skills => SKILLS_INSTRUCTION,
        SectionKind::Awards => AWARDS_INSTRUCTION,
        SectionKind::Testimonials => TESTIMONIALS_INSTRUCTION,
        SectionKind::Contact => CONTACT_INSTRUCTION,
        SectionKind::Preview => PREVIEW_INSTRUCTION,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field suggestions (education entries)
// ────────────────────────────────────────────────────────────────────────────

/// Replace `{school}` before sending.
pub const DEGREE_SUGGESTION_TEMPLATE: &str =
    "Suggest the most likely degree for a student at {school}. Only return the degree name.";

/// Replace `{degree}` and `{school}` before sending.
pub const FIELD_SUGGESTION_TEMPLATE: &str =
    "Suggest the most likely field of study for a student with degree {degree} at {school}. \
    Only return the field name.";

/// Replace `{degree}`, `{field}` and `{school}` before sending.
pub const PERIOD_SUGGESTION_TEMPLATE: &str =
    "Suggest the most likely start and end years for a {degree} in {field} at {school}. \
    Format: YYYY-YYYY.";

/// Stands in for a school the user has not entered yet.
const UNNAMED_SCHOOL: &str = "this school";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(school|degree|field)\}").expect("placeholder pattern"));

/// Fills a suggestion template from the entry's current values in one pass,
/// so entered text is never itself treated as a placeholder.
pub fn suggestion_prompt(target: SuggestTarget, fields: &FieldValues) -> String {
    let template = match target {
        SuggestTarget::Degree => DEGREE_SUGGESTION_TEMPLATE,
        SuggestTarget::FieldOfStudy => FIELD_SUGGESTION_TEMPLATE,
        SuggestTarget::Period => PERIOD_SUGGESTION_TEMPLATE,
    };
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let value = fields.value(&caps[1]).trim();
            if value.is_empty() && &caps[1] == "school" {
                UNNAMED_SCHOOL.to_string()
            } else {
                value.to_string()
            }
        })
        .into_owned()
}

/// Full prompt for `section`: instruction, plain-text rule, blank line, input.
pub fn render_prompt(section: SectionKind, input: &str) -> String {
    format!("{} {PLAIN_TEXT_ONLY}\n\n{input}", instruction(section))
}
