//! Offline drafting table: canned, section-keyed replies used when the service
//! runs with `LLM_BACKEND=mock`. Never used as a fallback for a failed call.

use serde::Serialize;
use serde_json::{json, Value};

use crate::sections::SectionKind;

#[derive(Debug, Clone, Serialize)]
pub struct MockResponse {
    pub content: Value,
    pub suggestions: Vec<&'static str>,
}

impl MockResponse {
    /// The reply as the model would have written it for `section`.
    pub fn to_text(&self, section: SectionKind) -> String {
        match section {
            SectionKind::About => field(&self.content, "bio"),
            SectionKind::Experience | SectionKind::Education | SectionKind::Awards => {
                field(&self.content[0], "description")
            }
            SectionKind::Testimonials => field(&self.content[0], "feedback"),
            SectionKind::Skills => self
                .content
                .as_array()
                .map(|skills| {
                    skills
                        .iter()
                        .filter_map(|s| s["name"].as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default(),
            SectionKind::Contact => self
                .content
                .as_object()
                .map(|contact| {
                    contact
                        .iter()
                        .filter_map(|(k, v)| v.as_str().map(|v| format!("{k}: {v}")))
                        .collect::<Vec<_>>()
                        .join("\n")
                })
                .unwrap_or_default(),
            SectionKind::Preview => String::new(),
        }
    }
}

fn field(value: &Value, key: &str) -> String {
    value[key].as_str().unwrap_or_default().to_string()
}

pub fn mock_response(section: SectionKind) -> MockResponse {
    match section {
        SectionKind::About => MockResponse {
            content: json!({
                "name": "Alex Rivera",
                "role": "Senior Full Stack Developer",
                "bio": "Full stack developer with a decade of experience shipping web platforms end to end. \
                        Comfortable across React, Node.js and Rust services, with a focus on fast, \
                        accessible interfaces backed by reliable APIs."
            }),
            suggestions: vec![
                "Add a concrete achievement",
                "Mention what you are looking for next",
                "Describe how you like to work",
            ],
        },
        SectionKind::Experience => MockResponse {
            content: json!([{
                "company": "Northwind Labs",
                "title": "Senior Full Stack Developer",
                "startDate": "2020-01",
                "endDate": "Present",
                "description": "Led a team of five rebuilding the customer dashboard in React and Node.js, \
                                cutting page load time by half. Introduced CI/CD pipelines that took \
                                deployments from weekly to daily."
            }]),
            suggestions: vec![
                "Quantify your achievements",
                "Name the technologies you used",
                "Include team size",
            ],
        },
        SectionKind::Education => MockResponse {
            content: json!([{
                "school": "State University",
                "degree": "B.Sc.",
                "field": "Computer Science",
                "startDate": "2010-09",
                "endDate": "2014-06",
                "description": "Focused on distributed systems and human-computer interaction; \
                                capstone project on offline-first web applications."
            }]),
            suggestions: vec![
                "Add relevant coursework",
                "Include honours if notable",
                "Mention student projects",
            ],
        },
        SectionKind::Skills => MockResponse {
            content: json!([
                {"name": "React", "level": "expert", "category": "Frontend"},
                {"name": "Node.js", "level": "expert", "category": "Backend"},
                {"name": "TypeScript", "level": "advanced", "category": "Frontend"},
                {"name": "AWS", "level": "advanced", "category": "DevOps"}
            ]),
            suggestions: vec![
                "Group skills by category",
                "Add proficiency levels",
                "Include collaboration skills",
            ],
        },
        SectionKind::Awards => MockResponse {
            content: json!([{
                "title": "Open Source Contributor of the Year",
                "issuer": "Regional Developer Conference",
                "year": "2023",
                "description": "Recognised for maintaining a widely used accessibility testing library."
            }]),
            suggestions: vec![
                "Explain why you received it",
                "Include impact metrics",
                "Mention how competitive it was",
            ],
        },
        SectionKind::Testimonials => MockResponse {
            content: json!([{
                "name": "Jordan Lee",
                "role": "CTO",
                "company": "Northwind Labs",
                "feedback": "Alex consistently turns vague requirements into solid, well-tested features \
                             and makes everyone around them a better engineer."
            }]),
            suggestions: vec![
                "Reference a specific project",
                "Describe the working relationship",
                "Keep it under three sentences",
            ],
        },
        SectionKind::Contact => MockResponse {
            content: json!({
                "email": "alex.rivera@example.com",
                "phone": "+15551234567",
                "linkedin": "https://linkedin.com/in/alexrivera",
                "github": "https://github.com/alexrivera",
                "website": "https://alexrivera.dev"
            }),
            suggestions: vec![
                "Add a preferred contact method",
                "Link your most active profile",
                "State your availability",
            ],
        },
        SectionKind::Preview => MockResponse {
            content: json!({}),
            suggestions: vec![
                "Review every section",
                "Check for consistency",
                "Test all links",
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::models::{FieldValues, SectionEntry};
    use crate::sections::validation::validate;

    #[test]
    fn test_every_section_has_suggestions() {
        for section in SectionKind::ALL {
            assert_eq!(mock_response(section).suggestions.len(), 3, "{section}");
        }
    }

    #[test]
    fn test_text_is_non_empty_except_preview() {
        for section in SectionKind::ALL {
            let text = mock_response(section).to_text(section);
            assert_eq!(text.is_empty(), section == SectionKind::Preview, "{section}");
        }
    }

    #[test]
    fn test_skills_text_is_comma_separated() {
        let text = mock_response(SectionKind::Skills).to_text(SectionKind::Skills);
        assert_eq!(text, "React, Node.js, TypeScript, AWS");
    }

    #[test]
    fn test_mock_contact_passes_validation() {
        let content = mock_response(SectionKind::Contact).content;
        let fields: FieldValues = content
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string()))
            .collect();
        assert!(!validate(SectionKind::Contact, &fields).has_errors());
    }

    #[test]
    fn test_mock_entries_pass_validation() {
        for section in [
            SectionKind::Experience,
            SectionKind::Education,
            SectionKind::Awards,
            SectionKind::Testimonials,
        ] {
            let content = mock_response(section).content;
            let entry: SectionEntry = serde_json::from_value(content[0].clone()).unwrap();
            let result = validate(section, &entry.fields);
            assert!(!result.has_errors(), "{section}: {result:?}");
        }
    }
}
