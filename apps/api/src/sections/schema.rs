//! Canonical field schema per section.
//!
//! Each section has exactly one field contract. The validator, the blank-entry
//! builder and the prompt input builder all read from these tables.

use crate::sections::SectionKind;

/// How a non-empty field value is checked after the required/length rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// YYYY or YYYY-MM.
    StartDate,
    /// YYYY, YYYY-MM or "Present".
    EndDate,
    /// YYYY only.
    Year,
    Email,
    Phone,
    Profile(ProfileSite),
    Website,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSite {
    LinkedIn,
    GitHub,
    Twitter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub label: &'static str,
    /// Subject of the length messages; usually the label.
    pub length_label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
}

impl FieldRule {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            length_label: label,
            kind,
            required: false,
            min_len: None,
            max_len: None,
        }
    }

    const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    const fn between(self, min: usize, max: usize) -> Self {
        Self {
            min_len: Some(min),
            max_len: Some(max),
            ..self
        }
    }

    const fn length_label(self, length_label: &'static str) -> Self {
        Self {
            length_label,
            ..self
        }
    }

    const fn at_most(self, max: usize) -> Self {
        Self {
            max_len: Some(max),
            ..self
        }
    }
}

pub const DESCRIPTION_MIN_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

const ABOUT: &[FieldRule] = &[
    FieldRule::text("name", "Name").required(),
    FieldRule::text("role", "Role").required(),
    FieldRule::text("bio", "Bio").required(),
];

const EXPERIENCE: &[FieldRule] = &[
    FieldRule::text("title", "Job Title").required().between(3, 100),
    FieldRule::text("company", "Company")
        .required()
        .between(2, 100)
        .length_label("Company name"),
    FieldRule::new("startDate", "Start Date", FieldKind::StartDate).required(),
    FieldRule::new("endDate", "End Date", FieldKind::EndDate).required(),
    FieldRule::text("description", "Description")
        .required()
        .between(DESCRIPTION_MIN_CHARS, DESCRIPTION_MAX_CHARS),
];

const EDUCATION: &[FieldRule] = &[
    FieldRule::text("school", "School").required(),
    FieldRule::text("degree", "Degree"),
    FieldRule::text("field", "Field of Study"),
    FieldRule::new("startDate", "Start Date", FieldKind::StartDate),
    FieldRule::new("endDate", "End Date", FieldKind::EndDate),
    FieldRule::text("description", "Description")
        .required()
        .between(DESCRIPTION_MIN_CHARS, DESCRIPTION_MAX_CHARS),
];

const AWARDS: &[FieldRule] = &[
    FieldRule::text("title", "Title").required().at_most(100),
    FieldRule::text("issuer", "Issuer"),
    FieldRule::new("year", "Year", FieldKind::Year),
    FieldRule::text("description", "Description")
        .required()
        .between(DESCRIPTION_MIN_CHARS, DESCRIPTION_MAX_CHARS),
];

const TESTIMONIALS: &[FieldRule] = &[
    FieldRule::text("name", "Name").required(),
    FieldRule::text("role", "Role"),
    FieldRule::text("company", "Company"),
    FieldRule::text("feedback", "Feedback").required(),
];

const CONTACT: &[FieldRule] = &[
    FieldRule::new("email", "Email", FieldKind::Email).required(),
    FieldRule::new("phone", "Phone", FieldKind::Phone),
    FieldRule::new("linkedin", "LinkedIn", FieldKind::Profile(ProfileSite::LinkedIn)),
    FieldRule::new("website", "Website", FieldKind::Website),
    FieldRule::new("github", "GitHub", FieldKind::Profile(ProfileSite::GitHub)),
    FieldRule::new("twitter", "Twitter", FieldKind::Profile(ProfileSite::Twitter)),
    FieldRule::text("address", "Address"),
];

/// Field rules for a section, in form order. Skills and preview have none.
pub fn fields_for(section: SectionKind) -> &'static [FieldRule] {
    match section {
        SectionKind::About => ABOUT,
        SectionKind::Experience => EXPERIENCE,
        SectionKind::Education => EDUCATION,
        SectionKind::Awards => AWARDS,
        SectionKind::Testimonials => TESTIMONIALS,
        SectionKind::Contact => CONTACT,
        SectionKind::Skills | SectionKind::Preview => &[],
    }
}

pub fn rule(section: SectionKind, field: &str) -> Option<&'static FieldRule> {
    fields_for(section).iter().find(|r| r.name == field)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_field_names_unique_per_section() {
        for section in SectionKind::ALL {
            let names: HashSet<_> = fields_for(section).iter().map(|r| r.name).collect();
            assert_eq!(names.len(), fields_for(section).len(), "{section}");
        }
    }

    #[test]
    fn test_experience_bounds() {
        let title = rule(SectionKind::Experience, "title").unwrap();
        assert!(title.required);
        assert_eq!((title.min_len, title.max_len), (Some(3), Some(100)));

        let description = rule(SectionKind::Experience, "description").unwrap();
        assert_eq!(description.min_len, Some(50));
        assert_eq!(description.max_len, Some(1000));
    }

    #[test]
    fn test_description_has_the_same_rule_everywhere() {
        for section in SectionKind::ALL {
            if let Some(description) = rule(section, "description") {
                assert!(description.required, "{section}");
                assert_eq!(
                    (description.min_len, description.max_len),
                    (Some(DESCRIPTION_MIN_CHARS), Some(DESCRIPTION_MAX_CHARS)),
                    "{section}"
                );
            }
        }
    }

    #[test]
    fn test_contact_only_requires_email() {
        let required: Vec<_> = fields_for(SectionKind::Contact)
            .iter()
            .filter(|r| r.required)
            .map(|r| r.name)
            .collect();
        assert_eq!(required, vec!["email"]);
    }

    #[test]
    fn test_skills_and_preview_have_no_rules() {
        assert!(fields_for(SectionKind::Skills).is_empty());
        assert!(fields_for(SectionKind::Preview).is_empty());
    }
}
