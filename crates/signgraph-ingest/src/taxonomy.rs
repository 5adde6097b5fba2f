//! Category and grammar terms.
//!
//! Terms are matched by `(vocabulary, name)` only. A term first created under
//! one language is reused when the same name turns up in a file imported
//! under another, instead of growing a per-language duplicate.

use serde::{Deserialize, Serialize};
use signgraph_store::{fields, EntityKind, EntityStore, FieldValue, StoreError};

use crate::upsert::{self, Resolved};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vocabulary {
    LexicalCategory,
    Person,
    Gender,
    Number,
    VerbalForm,
    Aspect,
    Mood,
    Voice,
    Case,
}

impl Vocabulary {
    pub fn machine_name(self) -> &'static str {
        match self {
            Vocabulary::LexicalCategory => "lexical_category",
            Vocabulary::Person => "person",
            Vocabulary::Gender => "gender",
            Vocabulary::Number => "number",
            Vocabulary::VerbalForm => "verbal_form",
            Vocabulary::Aspect => "aspect",
            Vocabulary::Mood => "mood",
            Vocabulary::Voice => "voice",
            Vocabulary::Case => "case",
        }
    }
}

/// Find or create the term `name` in `vocabulary`.
///
/// Returns `None` for a blank name. `language` is stored on newly created
/// terms and never used for matching.
pub fn resolve_term(
    store: &dyn EntityStore,
    vocabulary: Vocabulary,
    name: &str,
    language: &str,
) -> Result<Option<Resolved>, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(None);
    }

    let key = fields([
        ("vocabulary", FieldValue::text(vocabulary.machine_name())),
        ("name", FieldValue::text(name)),
    ]);
    let extra = fields([("language", FieldValue::text(language))]);
    upsert::resolve(store, EntityKind::TaxonomyTerm, key, extra).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use signgraph_store::InMemoryStore;

    #[test]
    fn blank_name_resolves_to_nothing() {
        let store = InMemoryStore::new();
        let term = resolve_term(&store, Vocabulary::Gender, "   ", "egy").unwrap();
        assert!(term.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn same_name_under_another_language_is_reused() {
        let store = InMemoryStore::new();
        let first = resolve_term(&store, Vocabulary::LexicalCategory, "noun", "egy")
            .unwrap()
            .unwrap();
        let second = resolve_term(&store, Vocabulary::LexicalCategory, " noun ", "cop")
            .unwrap()
            .unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.id(), second.id());
        assert_eq!(second.record.text("language"), Some("egy"));
    }

    #[test]
    fn vocabularies_are_separate() {
        let store = InMemoryStore::new();
        let number = resolve_term(&store, Vocabulary::Number, "singular", "egy")
            .unwrap()
            .unwrap();
        let person = resolve_term(&store, Vocabulary::Person, "singular", "egy")
            .unwrap()
            .unwrap();
        assert_ne!(number.id(), person.id());
    }
}
