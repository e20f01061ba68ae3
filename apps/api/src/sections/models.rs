use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::sections::schema::fields_for;
use crate::sections::SectionKind;

/// Current values of one section instance, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<String, String>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Value of `field`, or `""` when it was never set.
    pub fn value(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

static LAST_ISSUED: AtomicU64 = AtomicU64::new(0);

/// Identifier of a list-section entry, derived from its creation time in epoch
/// milliseconds. Ids are strictly increasing within the process, so two entries
/// created in the same millisecond still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct EntryId(u64);

impl EntryId {
    pub fn generate() -> Self {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let mut last = LAST_ISSUED.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match LAST_ISSUED.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return EntryId(next),
                Err(actual) => last = actual,
            }
        }
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for EntryId {
    type Error = std::num::ParseIntError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.trim().parse().map(EntryId)
    }
}

/// One entry of a list-type section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEntry {
    #[serde(default = "EntryId::generate")]
    pub id: EntryId,
    #[serde(flatten)]
    pub fields: FieldValues,
}

impl SectionEntry {
    pub fn new(fields: FieldValues) -> Self {
        Self {
            id: EntryId::generate(),
            fields,
        }
    }

    /// A fresh entry with every schema field present and empty.
    pub fn blank(section: SectionKind) -> Self {
        Self::new(fields_for(section).iter().map(|r| (r.name, "")).collect())
    }
}

/// The entries of one list-type section.
///
/// The editing UI always shows at least one entry, so `remove` refuses to drop
/// the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryList(Vec<SectionEntry>);

impl EntryList {
    pub fn with_blank(section: SectionKind) -> Self {
        Self(vec![SectionEntry::blank(section)])
    }

    pub fn push_blank(&mut self, section: SectionKind) -> EntryId {
        let entry = SectionEntry::blank(section);
        let id = entry.id;
        self.0.push(entry);
        id
    }

    /// Seeds a blank entry when the list is empty.
    pub fn ensure_one(&mut self, section: SectionKind) {
        if self.is_empty() {
            self.push_blank(section);
        }
    }

    /// Sets one field of the entry with `id`. Returns false when no such entry exists.
    pub fn update(&mut self, id: EntryId, field: &str, value: impl Into<String>) -> bool {
        match self.0.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.fields.set(field, value);
                true
            }
            None => false,
        }
    }

    /// Removes the entry with `id` unless it is the only one left.
    pub fn remove(&mut self, id: EntryId) -> bool {
        if self.len() <= 1 {
            return false;
        }
        let before = self.len();
        self.0.retain(|e| e.id != id);
        self.len() != before
    }

    pub fn get(&self, id: EntryId) -> Option<&SectionEntry> {
        self.0.iter().find(|e| e.id == id)
    }

    pub fn as_slice(&self) -> &[SectionEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_entry_ids_are_unique_and_increasing() {
        let ids: Vec<_> = (0..500).map(|_| EntryId::generate()).collect();
        let unique: HashSet<_> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_entry_id_is_epoch_millis() {
        let before = Utc::now().timestamp_millis() as u64;
        let id = EntryId::generate();
        assert!(id.0 >= before);
    }

    #[test]
    fn test_entry_id_serializes_as_string() {
        let id = EntryId(1_700_000_000_000);
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""1700000000000""#);
        let back: EntryId = serde_json::from_str(r#""1700000000000""#).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_section_entry_flattens_fields() {
        let json = r#"{"id":"42","title":"Engineer","company":"Acme"}"#;
        let entry: SectionEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, EntryId(42));
        assert_eq!(entry.fields.get("title"), Some("Engineer"));
        assert_eq!(entry.fields.get("id"), None);
    }

    #[test]
    fn test_section_entry_without_id_gets_one() {
        let entry: SectionEntry = serde_json::from_str(r#"{"title":"Engineer"}"#).unwrap();
        assert!(entry.id.0 > 0);
    }

    #[test]
    fn test_blank_entry_has_every_schema_field() {
        let entry = SectionEntry::blank(SectionKind::Experience);
        for field in ["title", "company", "startDate", "endDate", "description"] {
            assert_eq!(entry.fields.get(field), Some(""), "{field}");
        }
    }

    #[test]
    fn test_remove_refuses_last_entry() {
        let mut list = EntryList::with_blank(SectionKind::Awards);
        let only = list.as_slice()[0].id;
        assert!(!list.remove(only));
        assert_eq!(list.len(), 1);

        let second = list.push_blank(SectionKind::Awards);
        assert!(list.remove(only));
        assert_eq!(list.len(), 1);
        assert_eq!(list.as_slice()[0].id, second);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut list = EntryList::with_blank(SectionKind::Education);
        list.push_blank(SectionKind::Education);
        assert!(!list.remove(EntryId(1)));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_update_sets_field_on_matching_entry() {
        let mut list = EntryList::with_blank(SectionKind::Testimonials);
        let id = list.as_slice()[0].id;
        assert!(list.update(id, "name", "Ada"));
        assert_eq!(list.get(id).unwrap().fields.get("name"), Some("Ada"));
        assert!(!list.update(EntryId(7), "name", "Bob"));
    }

    #[test]
    fn test_ensure_one_seeds_empty_list() {
        let mut list = EntryList::default();
        list.ensure_one(SectionKind::Experience);
        assert_eq!(list.len(), 1);
        list.ensure_one(SectionKind::Experience);
        assert_eq!(list.len(), 1);
    }
}
