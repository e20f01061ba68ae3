use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sections::models::{EntryId, EntryList, FieldValues};
use crate::sections::schema::rule;
use crate::sections::SectionKind;

/// One wizard edit applied to a saved document.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PortfolioEdit {
    AddEntry {
        section: SectionKind,
    },
    UpdateEntry {
        section: SectionKind,
        id: EntryId,
        field: String,
        value: String,
    },
    RemoveEntry {
        section: SectionKind,
        id: EntryId,
    },
    AddSkills {
        skills: Vec<String>,
    },
    RemoveSkill {
        skill: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Section '{0}' does not hold a list of entries")]
    NotAList(SectionKind),

    #[error("No {section} entry with id {id}")]
    UnknownEntry { section: SectionKind, id: EntryId },

    #[error("The last {0} entry cannot be removed")]
    LastEntry(SectionKind),

    #[error("Section '{section}' has no field '{field}'")]
    UnknownField { section: SectionKind, field: String },
}

/// The whole document the wizard assembles and exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Portfolio {
    pub about: FieldValues,
    pub experience: EntryList,
    pub education: EntryList,
    pub skills: Vec<String>,
    pub awards: EntryList,
    pub testimonials: EntryList,
    pub contact: FieldValues,
}

impl Portfolio {
    /// A fresh document with one blank entry in every list section.
    pub fn new() -> Self {
        Self {
            experience: EntryList::with_blank(SectionKind::Experience),
            education: EntryList::with_blank(SectionKind::Education),
            awards: EntryList::with_blank(SectionKind::Awards),
            testimonials: EntryList::with_blank(SectionKind::Testimonials),
            ..Self::default()
        }
    }

    /// Adds a skill unless it is blank or already present. Returns whether it was added.
    pub fn add_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.skills.iter().any(|s| s == skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    pub fn remove_skill(&mut self, skill: &str) -> bool {
        let before = self.skills.len();
        self.skills.retain(|s| s != skill);
        self.skills.len() != before
    }

    /// Applies `edit`, first seeding any empty list section with a blank entry.
    /// Returns the id of a newly added entry.
    pub fn apply(&mut self, edit: PortfolioEdit) -> Result<Option<EntryId>, EditError> {
        for section in SectionKind::STEPS.into_iter().filter(|s| s.is_list()) {
            if let Some(list) = self.entries_mut(section) {
                list.ensure_one(section);
            }
        }

        match edit {
            PortfolioEdit::AddEntry { section } => {
                let list = self.list_mut(section)?;
                Ok(Some(list.push_blank(section)))
            }
            PortfolioEdit::UpdateEntry {
                section,
                id,
                field,
                value,
            } => {
                if rule(section, &field).is_none() {
                    return Err(EditError::UnknownField { section, field });
                }
                if !self.list_mut(section)?.update(id, &field, value) {
                    return Err(EditError::UnknownEntry { section, id });
                }
                Ok(None)
            }
            PortfolioEdit::RemoveEntry { section, id } => {
                let list = self.list_mut(section)?;
                if list.get(id).is_none() {
                    return Err(EditError::UnknownEntry { section, id });
                }
                if !list.remove(id) {
                    return Err(EditError::LastEntry(section));
                }
                Ok(None)
            }
            PortfolioEdit::AddSkills { skills } => {
                for skill in &skills {
                    self.add_skill(skill);
                }
                Ok(None)
            }
            PortfolioEdit::RemoveSkill { skill } => {
                self.remove_skill(&skill);
                Ok(None)
            }
        }
    }

    fn list_mut(&mut self, section: SectionKind) -> Result<&mut EntryList, EditError> {
        self.entries_mut(section).ok_or(EditError::NotAList(section))
    }

    pub fn entries(&self, section: SectionKind) -> Option<&EntryList> {
        match section {
            SectionKind::Experience => Some(&self.experience),
            SectionKind::Education => Some(&self.education),
            SectionKind::Awards => Some(&self.awards),
            SectionKind::Testimonials => Some(&self.testimonials),
            _ => None,
        }
    }

    fn entries_mut(&mut self, section: SectionKind) -> Option<&mut EntryList> {
        match section {
            SectionKind::Experience => Some(&mut self.experience),
            SectionKind::Education => Some(&mut self.education),
            SectionKind::Awards => Some(&mut self.awards),
            SectionKind::Testimonials => Some(&mut self.testimonials),
            _ => None,
        }
    }
}
