//! Normalizer: turns a raw model reply into presentable section content.
//!
//! Every mode first drops `<think>…</think>` reasoning spans. Free-text mode
//! then trims; skill-list mode splits the remainder into distinct skill tokens.
//! Total over all inputs and idempotent: normalizing rendered output again
//! yields the same content.

use std::borrow::Cow;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const REASONING_OPEN: &str = "<think>";

static REASONING_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("reasoning span pattern"));

/// A line ending in a colon with no comma, e.g. `Frontend:`, `- Cloud/DevOps:`
/// or `Frameworks & Libraries:`.
static LABEL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^,]*:\s*$").expect("label line pattern"));

/// A category prefix in front of a value, e.g. `Languages: Rust`.
static LABEL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z ]*:\s*").expect("label prefix pattern"));

/// Two four-digit years separated by anything but digits, e.g. `2014-2018`.
static YEAR_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{4})[^0-9]+([0-9]{4})").expect("year pair pattern"));

/// Tokens that name the list itself rather than a skill (compared lowercase).
const PLACEHOLDER_TOKENS: &[&str] = &[
    "skills",
    "skill",
    "technical skills",
    "soft skills",
    "key skills",
    "core skills",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMode {
    FreeText,
    SkillList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedContent {
    Text(String),
    Skills(Vec<String>),
}

impl NormalizedContent {
    /// Plain-text form. Skills are joined with `", "`, which normalizes back to
    /// the same list.
    pub fn render(&self) -> String {
        match self {
            NormalizedContent::Text(text) => text.clone(),
            NormalizedContent::Skills(skills) => skills.join(", "),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            NormalizedContent::Text(text) => text.is_empty(),
            NormalizedContent::Skills(skills) => skills.is_empty(),
        }
    }
}

pub fn normalize(raw: &str, mode: NormalizeMode) -> NormalizedContent {
    match mode {
        NormalizeMode::FreeText => NormalizedContent::Text(extract_text(raw)),
        NormalizeMode::SkillList => NormalizedContent::Skills(extract_skills(raw)),
    }
}

/// Removes reasoning spans, repeating until none remain. An opening marker
/// with no closing marker drops everything from the marker on.
pub fn strip_reasoning(raw: &str) -> String {
    let mut text = raw.to_string();
    loop {
        match REASONING_SPAN.replace_all(&text, "") {
            Cow::Borrowed(_) => break,
            Cow::Owned(stripped) => text = stripped,
        }
    }
    if let Some(idx) = text.find(REASONING_OPEN) {
        text.truncate(idx);
    }
    text
}

pub fn extract_text(raw: &str) -> String {
    strip_reasoning(raw).trim().to_string()
}

/// First line of the cleaned reply, or `None` when nothing is left.
pub fn first_line(raw: &str) -> Option<String> {
    extract_text(raw)
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}

/// First `YYYY … YYYY` pair in the cleaned reply, as (start, end).
pub fn year_range(raw: &str) -> Option<(String, String)> {
    let text = strip_reasoning(raw);
    let caps = YEAR_PAIR.captures(&text)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

pub fn extract_skills(raw: &str) -> Vec<String> {
    let text = strip_reasoning(raw);
    let lines: Vec<&str> = text.lines().filter(|line| !is_heading(line)).collect();
    let last_content = lines.iter().rposition(|line| !line.trim().is_empty());

    let mut seen = HashSet::new();
    let mut skills = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        // A label line introducing further lines is a group heading; a trailing
        // one introduces nothing and is read as an item.
        let introduces_more = matches!(last_content, Some(last) if last > idx);
        if introduces_more && LABEL_LINE.is_match(line) {
            continue;
        }

        for token in line.split(',') {
            let token = clean_token(token);
            if token.is_empty() || token.starts_with('#') || is_placeholder(&token) {
                continue;
            }
            if seen.insert(token.clone()) {
                skills.push(token);
            }
        }
    }

    skills
}

fn is_heading(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn is_placeholder(token: &str) -> bool {
    let lower = token.to_lowercase();
    PLACEHOLDER_TOKENS.contains(&lower.as_str())
}

/// Strips bullet markers, trailing colons and category prefixes until stable.
fn clean_token(token: &str) -> String {
    let mut current = token.to_string();
    loop {
        let trimmed = current
            .trim_start_matches(|c: char| matches!(c, '-' | '*' | '•' | '–') || c.is_whitespace())
            .trim_end_matches(|c: char| c == ':' || c.is_whitespace());
        let next = LABEL_PREFIX.replace(trimmed, "").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}
