// Portfolio sections: identifiers, wizard steps, field schemas and validation.
// Everything here is pure: no LLM calls and no I/O.

pub mod handlers;
pub mod models;
pub mod schema;
pub mod validation;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generation::normalizer::NormalizeMode;

/// One discrete category of portfolio content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    About,
    Experience,
    Education,
    Skills,
    Awards,
    Testimonials,
    Contact,
    Preview,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown section '{0}'")]
pub struct UnknownSection(pub String);

impl SectionKind {
    pub const ALL: [SectionKind; 8] = [
        SectionKind::About,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Awards,
        SectionKind::Testimonials,
        SectionKind::Contact,
        SectionKind::Preview,
    ];

    /// The editable wizard steps, in order. Preview is reached after the last step.
    pub const STEPS: [SectionKind; 7] = [
        SectionKind::About,
        SectionKind::Experience,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Awards,
        SectionKind::Testimonials,
        SectionKind::Contact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::About => "about",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Awards => "awards",
            SectionKind::Testimonials => "testimonials",
            SectionKind::Contact => "contact",
            SectionKind::Preview => "preview",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::About => "About",
            SectionKind::Experience => "Experience",
            SectionKind::Education => "Education",
            SectionKind::Skills => "Skills",
            SectionKind::Awards => "Awards",
            SectionKind::Testimonials => "Testimonials",
            SectionKind::Contact => "Contact",
            SectionKind::Preview => "Preview",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SectionKind::About => "Basic information",
            SectionKind::Experience => "Work history",
            SectionKind::Education => "Academic background",
            SectionKind::Skills => "Technical abilities",
            SectionKind::Awards => "Achievements",
            SectionKind::Testimonials => "Client feedback",
            SectionKind::Contact => "Contact information",
            SectionKind::Preview => "Review the assembled portfolio",
        }
    }

    /// List-type sections hold a sequence of entries, each with its own id.
    pub fn is_list(&self) -> bool {
        matches!(
            self,
            SectionKind::Experience
                | SectionKind::Education
                | SectionKind::Awards
                | SectionKind::Testimonials
        )
    }

    pub fn normalize_mode(&self) -> NormalizeMode {
        match self {
            SectionKind::Skills => NormalizeMode::SkillList,
            _ => NormalizeMode::FreeText,
        }
    }

    /// 1-based wizard step number; `None` for preview.
    pub fn step_number(&self) -> Option<usize> {
        Self::STEPS.iter().position(|s| s == self).map(|i| i + 1)
    }

    pub fn next(&self) -> Option<SectionKind> {
        let idx = Self::STEPS.iter().position(|s| s == self)?;
        Self::STEPS.get(idx + 1).copied()
    }

    pub fn previous(&self) -> Option<SectionKind> {
        let idx = Self::STEPS.iter().position(|s| s == self)?;
        idx.checked_sub(1).map(|i| Self::STEPS[i])
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}
