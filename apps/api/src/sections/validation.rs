//! Field validation: pure, deterministic checks over a section's current values.
//!
//! `validate` is recomputed wholesale on every change. It never fails: every
//! schema field gets a key, `None` meaning valid.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::portfolio::Portfolio;
use crate::sections::models::{FieldValues, SectionEntry};
use crate::sections::schema::{fields_for, FieldKind, FieldRule, ProfileSite};
use crate::sections::SectionKind;

pub const DATE_FORMAT_MESSAGE: &str = "Date must be in YYYY or YYYY-MM format.";
pub const END_DATE_FORMAT_MESSAGE: &str =
    "Date must be in YYYY or YYYY-MM format, or 'Present'.";
pub const DATE_ORDER_MESSAGE: &str = "End Date cannot be before Start Date.";
pub const YEAR_FORMAT_MESSAGE: &str = "Year must be in YYYY format.";
pub const EMAIL_MESSAGE: &str = "Invalid email format.";
pub const PHONE_MESSAGE: &str = "Invalid phone number format (e.g., +12345678900).";
pub const WEBSITE_MESSAGE: &str = "Invalid website URL.";

/// Literal accepted (case-insensitively) as an open-ended end date.
const PRESENT: &str = "present";

static MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{4})(?:-([0-9]{2}))?$").expect("month pattern"));
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("year pattern"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+@([A-Za-z0-9_-]+\.)+[A-Za-z0-9_-]{2,4}$").expect("email pattern")
});
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{10,15}$").expect("phone pattern"));
static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(www\.)?linkedin\.com/in/[A-Za-z0-9_-]+/?$").expect("linkedin pattern")
});
static GITHUB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(www\.)?github\.com/[A-Za-z0-9_-]+/?$").expect("github pattern")
});
static TWITTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(www\.)?twitter\.com/[A-Za-z0-9_]+/?$").expect("twitter pattern")
});
static WEBSITE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("website pattern"));

/// Field name → error message (`None` when the field is valid).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationResult(BTreeMap<String, Option<String>>);

impl ValidationResult {
    pub fn error(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|e| e.as_deref())
    }

    pub fn has_errors(&self) -> bool {
        self.0.values().any(Option::is_some)
    }

    pub fn error_count(&self) -> usize {
        self.0.values().filter(|e| e.is_some()).count()
    }

    /// Only the failing fields.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(field, err)| err.as_deref().map(|e| (field.as_str(), e)))
    }

    fn set(&mut self, field: impl Into<String>, error: Option<String>) {
        self.0.insert(field.into(), error);
    }

    /// Folds `other` in, prefixing each of its keys with `"{prefix}-"`.
    fn absorb(&mut self, prefix: &str, other: ValidationResult) {
        for (field, err) in other.0 {
            self.0.insert(format!("{prefix}-{field}"), err);
        }
    }
}

/// Validates one section instance against its schema.
pub fn validate(section: SectionKind, fields: &FieldValues) -> ValidationResult {
    let rules = fields_for(section);
    let mut result = ValidationResult::default();

    for rule in rules {
        result.set(rule.name, check_field(rule, fields.value(rule.name)));
    }

    check_date_order(rules, fields, &mut result);
    result
}

/// Validates every entry of a list section. Keys are `"{section}-{index}-{field}"`.
pub fn validate_entries(section: SectionKind, entries: &[SectionEntry]) -> ValidationResult {
    let mut result = ValidationResult::default();
    for (index, entry) in entries.iter().enumerate() {
        result.absorb(
            &format!("{section}-{index}"),
            validate(section, &entry.fields),
        );
    }
    result
}

/// Validates a whole portfolio document into one combined result.
///
/// Single sections are keyed `"{section}-{field}"`, list sections
/// `"{section}-{index}-{field}"`.
pub fn validate_portfolio(portfolio: &Portfolio) -> ValidationResult {
    let mut result = ValidationResult::default();

    result.absorb(
        SectionKind::About.as_str(),
        validate(SectionKind::About, &portfolio.about),
    );
    for section in SectionKind::STEPS {
        if let Some(entries) = portfolio.entries(section) {
            for (key, err) in validate_entries(section, entries.as_slice()).0 {
                result.set(key, err);
            }
        }
    }
    result.absorb(
        SectionKind::Contact.as_str(),
        validate(SectionKind::Contact, &portfolio.contact),
    );

    result
}

/// Errors the caller should display: failing fields it has marked as touched.
pub fn visible_errors(result: &ValidationResult, touched: &HashSet<String>) -> BTreeMap<String, String> {
    result
        .errors()
        .filter(|(field, _)| touched.contains(*field))
        .map(|(field, err)| (field.to_string(), err.to_string()))
        .collect()
}

fn check_field(rule: &FieldRule, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return rule
            .required
            .then(|| format!("{} is required.", rule.label));
    }

    let len = value.chars().count();
    if let Some(min) = rule.min_len.filter(|&min| len < min) {
        return Some(format!(
            "{} must be at least {min} characters long.",
            rule.length_label
        ));
    }
    if let Some(max) = rule.max_len.filter(|&max| len > max) {
        return Some(format!("{} must not exceed {max} characters.", rule.length_label));
    }

    let valid = match rule.kind {
        FieldKind::Text => true,
        FieldKind::StartDate => parse_month(value).is_some(),
        FieldKind::EndDate => is_present(value) || parse_month(value).is_some(),
        FieldKind::Year => YEAR_RE.is_match(value),
        FieldKind::Email => EMAIL_RE.is_match(value),
        FieldKind::Phone => PHONE_RE.is_match(value),
        FieldKind::Profile(site) => profile_pattern(site).is_match(value),
        FieldKind::Website => WEBSITE_RE.is_match(value),
    };

    (!valid).then(|| failure_message(rule).to_string())
}

fn failure_message(rule: &FieldRule) -> &'static str {
    match rule.kind {
        FieldKind::Text => "",
        FieldKind::StartDate => DATE_FORMAT_MESSAGE,
        FieldKind::EndDate => END_DATE_FORMAT_MESSAGE,
        FieldKind::Year => YEAR_FORMAT_MESSAGE,
        FieldKind::Email => EMAIL_MESSAGE,
        FieldKind::Phone => PHONE_MESSAGE,
        FieldKind::Profile(ProfileSite::LinkedIn) => "Invalid LinkedIn profile URL.",
        FieldKind::Profile(ProfileSite::GitHub) => "Invalid GitHub profile URL.",
        FieldKind::Profile(ProfileSite::Twitter) => "Invalid Twitter profile URL.",
        FieldKind::Website => WEBSITE_MESSAGE,
    }
}

fn profile_pattern(site: ProfileSite) -> &'static Regex {
    match site {
        ProfileSite::LinkedIn => &LINKEDIN_RE,
        ProfileSite::GitHub => &GITHUB_RE,
        ProfileSite::Twitter => &TWITTER_RE,
    }
}

/// Flags the end date when both dates are calendar months and start is later.
fn check_date_order(rules: &[FieldRule], fields: &FieldValues, result: &mut ValidationResult) {
    let start_rule = rules.iter().find(|r| r.kind == FieldKind::StartDate);
    let end_rule = rules.iter().find(|r| r.kind == FieldKind::EndDate);
    let (Some(start_rule), Some(end_rule)) = (start_rule, end_rule) else {
        return;
    };

    let start = parse_month(fields.value(start_rule.name));
    let end = parse_month(fields.value(end_rule.name));
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            result.set(end_rule.name, Some(DATE_ORDER_MESSAGE.to_string()));
        }
    }
}

/// Parses `YYYY` or `YYYY-MM` to the first day of that month.
/// A bare year is January; a month outside 01–12 does not parse.
fn parse_month(value: &str) -> Option<NaiveDate> {
    let caps = MONTH_RE.captures(value)?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn is_present(value: &str) -> bool {
    value.eq_ignore_ascii_case(PRESENT)
}
