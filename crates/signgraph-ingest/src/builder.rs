//! Row → entity graph.
//!
//! Each row is resolved bottom-up through a fixed sequence of [`Step`]s.
//! Later steps read what earlier ones resolved; a step whose predecessor is
//! missing fails the row. Nothing is undone when a row fails halfway, but
//! every entity is appended to the creation log the moment it is created,
//! so a job rollback still finds it.

use sha2::{Digest, Sha256};
use signgraph_store::{
    fields, CreatedEntity, EntityId, EntityKind, EntityStore, FieldValue, Fields, Query, Record,
    Source, SourceRepository,
};

use crate::error::RowError;
use crate::row::{ImportRow, ValidRow};
use crate::taxonomy::{resolve_term, Vocabulary};
use crate::upsert::{resolve, Resolved};

/// Resolution steps, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    LexicalCategory,
    Word,
    Source,
    AnnotationPage,
    Label,
    Sign,
    SignInterpretation,
    GrammarTerms,
    WordUnit,
    WordMap,
}

impl Step {
    pub const ORDER: [Step; 10] = [
        Step::LexicalCategory,
        Step::Word,
        Step::Source,
        Step::AnnotationPage,
        Step::Label,
        Step::Sign,
        Step::SignInterpretation,
        Step::GrammarTerms,
        Step::WordUnit,
        Step::WordMap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::LexicalCategory => "lexical_category",
            Step::Word => "word",
            Step::Source => "source",
            Step::AnnotationPage => "annotation_page",
            Step::Label => "label",
            Step::Sign => "sign",
            Step::SignInterpretation => "sign_interpretation",
            Step::GrammarTerms => "grammar_terms",
            Step::WordUnit => "word_unit",
            Step::WordMap => "word_map",
        }
    }
}

/// Result of a successfully imported row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub word_unit: EntityId,
    pub word_map: EntityId,
    /// Non-fatal problems, e.g. a label missing from its page.
    pub warnings: Vec<String>,
}

/// Line number encoded in a label name: its leading run of digits.
///
/// `"12-3"` and `"12a"` are on line 12; `"r4"` carries no line number.
pub fn line_number_of(label_name: &str) -> Option<i64> {
    let digits: String = label_name
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Everything resolved so far for one row.
struct Resolution<'r> {
    row: &'r ImportRow,
    valid: ValidRow<'r>,
    sign_sequence: u32,
    created: &'r mut Vec<CreatedEntity>,
    warnings: Vec<String>,

    lexical_category: Option<EntityId>,
    word: Option<Record>,
    word_meaning: Option<EntityId>,
    source: Option<Source>,
    page: Option<EntityId>,
    label: Option<EntityId>,
    sign_function: Option<EntityId>,
    interpretation: Option<EntityId>,
    grammar: Vec<(Vocabulary, EntityId)>,
    word_unit: Option<EntityId>,
    word_map: Option<EntityId>,
}

impl Resolution<'_> {
    /// Log newly created records and hand back the record either way.
    fn track(&mut self, resolved: Resolved) -> Record {
        if resolved.created {
            tracing::debug!(
                line = self.row.line,
                kind = %resolved.record.kind,
                id = resolved.record.id,
                "created entity"
            );
            self.created.push(CreatedEntity {
                kind: resolved.record.kind,
                id: resolved.record.id,
            });
        }
        resolved.record
    }
}

fn need<T>(value: Option<T>, step: Step, requires: &'static str) -> Result<T, RowError> {
    value.ok_or(RowError::MissingPredecessor {
        step: step.name(),
        requires,
    })
}

fn text_or_empty(value: Option<&String>) -> FieldValue {
    FieldValue::text(value.map_or("", String::as_str))
}

fn text_or_null(value: Option<&String>) -> FieldValue {
    value.map_or(FieldValue::Null, |v| FieldValue::text(v.as_str()))
}

/// Resolves one row at a time against a store, for a single job language.
pub struct GraphBuilder<'a> {
    store: &'a dyn EntityStore,
    sources: &'a dyn SourceRepository,
    language: &'a str,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(
        store: &'a dyn EntityStore,
        sources: &'a dyn SourceRepository,
        language: &'a str,
    ) -> Self {
        Self {
            store,
            sources,
            language,
        }
    }

    /// Resolve or create the full entity graph for `row`.
    ///
    /// Newly created entities are appended to `created` as they are made,
    /// including those made before a later step fails.
    pub fn build(
        &self,
        row: &ImportRow,
        sign_sequence: u32,
        created: &mut Vec<CreatedEntity>,
    ) -> Result<RowOutcome, RowError> {
        let valid = row.validate()?;
        let mut res = Resolution {
            row,
            valid,
            sign_sequence,
            created,
            warnings: Vec::new(),
            lexical_category: None,
            word: None,
            word_meaning: None,
            source: None,
            page: None,
            label: None,
            sign_function: None,
            interpretation: None,
            grammar: Vec::new(),
            word_unit: None,
            word_map: None,
        };

        for step in Step::ORDER {
            self.run(step, &mut res)?;
        }

        Ok(RowOutcome {
            word_unit: need(res.word_unit, Step::WordMap, "word_unit")?,
            word_map: need(res.word_map, Step::WordMap, "word_map")?,
            warnings: res.warnings,
        })
    }

    fn run(&self, step: Step, res: &mut Resolution<'_>) -> Result<(), RowError> {
        match step {
            Step::LexicalCategory => self.resolve_lexical_category(res),
            Step::Word => self.resolve_word(res),
            Step::Source => self.resolve_source(res),
            Step::AnnotationPage => self.resolve_page(res),
            Step::Label => self.lookup_label(res),
            Step::Sign => self.resolve_sign(res),
            Step::SignInterpretation => self.resolve_interpretation(res),
            Step::GrammarTerms => self.resolve_grammar(res),
            Step::WordUnit => self.resolve_word_unit(res),
            Step::WordMap => self.resolve_word_map(res),
        }
    }

    fn resolve_lexical_category(&self, res: &mut Resolution<'_>) -> Result<(), RowError> {
        let Some(name) = res.row.lexical_category_name.as_deref() else {
            return Ok(());
        };
        let term = resolve_term(self.store, Vocabulary::LexicalCategory, name, self.language)?
            .ok_or_else(|| RowError::TermUnresolved {
                vocabulary: Vocabulary::LexicalCategory.machine_name().to_string(),
                name: name.to_string(),
            })?;
        res.lexical_category = Some(res.track(term).id);
        Ok(())
    }

    fn resolve_word(&self, res: &mut Resolution<'_>) -> Result<(), RowError> {
        let word = resolve(
            self.store,
            EntityKind::Word,
            fields([
                ("basic_form", FieldValue::text(res.valid.basic_form)),
                ("lexical_category", FieldValue::opt_ref(res.lexical_category)),
                ("language", FieldValue::text(self.language)),
            ]),
            Fields::new(),
        )?;
        let word = res.track(word);

        // Meanings live in their word's language.
        let language = word.text("language").unwrap_or(self.language).to_string();
        let meaning = resolve(
            self.store,
            EntityKind::WordMeaning,
            fields([
                ("word", FieldValue::Ref(word.id)),
                ("meaning_identifier", text_or_empty(res.row.meaning_id.as_ref())),
                ("language", FieldValue::text(language)),
            ]),
            fields([("explanation", text_or_null(res.row.explanation.as_ref()))]),
        )?;
        res.word_meaning = Some(res.track(meaning).id);
        res.word = Some(word);
        Ok(())
    }

    fn resolve_source(&self, res: &mut Resolution<'_>) -> Result<(), RowError> {
        let source = self
            .sources
            .find_by_identifier(res.valid.source)?
            .ok_or_else(|| RowError::SourceNotFound(res.valid.source.to_string()))?;
        res.source = Some(source);
        Ok(())
    }

    fn resolve_page(&self, res: &mut Resolution<'_>) -> Result<(), RowError> {
        let source_id = need(res.source.as_ref(), Step::AnnotationPage, "source")?.id;
        let page = resolve(
            self.store,
            EntityKind::AnnotationPage,
            fields([
                ("source", FieldValue::Ref(source_id)),
                ("page_number", FieldValue::Int(res.valid.page)),
            ]),
            Fields::new(),
        )?;
        res.page = Some(res.track(page).id);
        Ok(())
    }

    fn lookup_label(&self, res: &mut Resolution<'_>) -> Result<(), RowError> {
        let Some(label_name) = res.row.label_name.as_deref() else {
            return Ok(());
        };
        let page = need(res.page, Step::Label, "annotation_page")?;
        let query = Query::new(EntityKind::Label)
            .eq("annotation_page", FieldValue::Ref(page))
            .eq("label_name", label_name);

        match self.store.find_one(&query)? {
            Some(label) => res.label = Some(label.id),
            None => {
                tracing::warn!(
                    line = res.row.line,
                    label = label_name,
                    page = res.valid.page,
                    source = res.valid.source,
                    "label not found, importing without a region link"
                );
                res.warnings.push(format!(
                    "label `{label_name}` not found on page {} of `{}`; imported without a region link",
                    res.valid.page, res.valid.source
                ));
            }
        }
        Ok(())
    }

    fn resolve_sign(&self, res: &mut Resolution<'_>) -> Result<(), RowError> {
        let sign = resolve(
            self.store,
            EntityKind::Sign,
            fields([
                ("sign_code", FieldValue::text(res.valid.sign)),
                ("language", FieldValue::text(self.language)),
            ]),
            Fields::new(),
        )?;
        let sign = res.track(sign);

        // A function takes its language from its sign, whatever the row says.
        let sign_language = sign.text("language").unwrap_or(self.language).to_string();
        let function = resolve(
            self.store,
            EntityKind::SignFunction,
            fields([
                ("sign", FieldValue::Ref(sign.id)),
                ("function_name", text_or_empty(res.row.function.as_ref())),
            ]),
            fields([("language", FieldValue::text(sign_language.as_str()))]),
        )?;
        let mut function = res.track(function);

        if function.text("language") != Some(sign_language.as_str()) {
            tracing::debug!(id = function.id, language = %sign_language, "correcting sign function language");
            function.set("language", FieldValue::text(sign_language));
            self.store.update(&function)?;
        }

        res.sign_function = Some(function.id);
        Ok(())
    }

    fn resolve_interpretation(&self, res: &mut Resolution<'_>) -> Result<(), RowError> {
        let page = need(res.page, Step::SignInterpretation, "annotation_page")?;
        let sign_function = need(res.sign_function, Step::SignInterpretation, "sign_function")?;
        let line_number = res.row.label_name.as_deref().and_then(line_number_of);
        let phone = res.row.phone.as_deref().unwrap_or("");

        let code = interpretation_code(page, res.label, sign_function, line_number, phone);
        let interpretation = resolve(
            self.store,
            EntityKind::SignInterpretation,
            fields([
                ("annotation_page", FieldValue::Ref(page)),
                ("label", FieldValue::opt_ref(res.label)),
                ("sign_function", FieldValue::Ref(sign_function)),
                ("line_number", FieldValue::opt_int(line_number)),
                ("phone", FieldValue::text(phone)),
            ]),
            fields([
                ("code", FieldValue::text(code)),
                ("note", text_or_null(res.row.note.as_ref())),
            ]),
        )?;
        res.interpretation = Some(res.track(interpretation).id);
        Ok(())
    }

    fn resolve_grammar(&self, res: &mut Resolution<'_>) -> Result<(), RowError> {
        let row = res.row;
        for (vocabulary, name) in row.grammar.entries() {
            let Some(name) = name else { continue };
            if let Some(term) = resolve_term(self.store, vocabulary, name, self.language)? {
                let id = res.track(term).id;
                res.grammar.push((vocabulary, id));
            }
        }
        Ok(())
    }

    fn resolve_word_unit(&self, res: &mut Resolution<'_>) -> Result<(), RowError> {
        let source_id = need(res.source.as_ref(), Step::WordUnit, "source")?.id;
        let page = need(res.page, Step::WordUnit, "annotation_page")?;
        let meaning = need(res.word_meaning, Step::WordUnit, "word_meaning")?;
        let identifier = format!("{source_id}_{}", res.valid.word_unit_id);

        let mut extra = fields([
            ("source", FieldValue::Ref(source_id)),
            ("word_unit_id", FieldValue::text(res.valid.word_unit_id)),
            ("word_sequence", FieldValue::opt_int(res.valid.word_sequence)),
            ("word_meaning", FieldValue::Ref(meaning)),
            ("realized_form", text_or_null(res.row.realized_form.as_ref())),
            ("language", FieldValue::text(self.language)),
            ("page_refs", FieldValue::RefSet([page].into_iter().collect())),
        ]);
        for (vocabulary, term) in &res.grammar {
            extra.insert(
                vocabulary.machine_name().to_string(),
                FieldValue::Ref(*term),
            );
        }

        let unit = resolve(
            self.store,
            EntityKind::WordUnit,
            fields([("original_word_unit_identifier", FieldValue::text(identifier))]),
            extra,
        )?;
        let unit = res.track(unit);

        let on_page = unit.ref_set("page_refs").is_some_and(|pages| pages.contains(&page));
        if !on_page && self.store.add_ref(EntityKind::WordUnit, unit.id, "page_refs", page)? {
            tracing::debug!(id = unit.id, page, "adding page to word unit");
        }

        res.word_unit = Some(unit.id);
        Ok(())
    }

    fn resolve_word_map(&self, res: &mut Resolution<'_>) -> Result<(), RowError> {
        let interpretation = need(res.interpretation, Step::WordMap, "sign_interpretation")?;
        let word_unit = need(res.word_unit, Step::WordMap, "word_unit")?;
        let map = resolve(
            self.store,
            EntityKind::WordMap,
            fields([
                ("sign_interpretation", FieldValue::Ref(interpretation)),
                ("word_unit", FieldValue::Ref(word_unit)),
            ]),
            fields([("sign_sequence", FieldValue::Int(i64::from(res.sign_sequence)))]),
        )?;
        res.word_map = Some(res.track(map).id);
        Ok(())
    }
}

/// Content hash identifying a sign interpretation.
fn interpretation_code(
    page: EntityId,
    label: Option<EntityId>,
    sign_function: EntityId,
    line_number: Option<i64>,
    phone: &str,
) -> String {
    let label = label.map_or_else(|| "-".to_string(), |id| id.to_string());
    let line = line_number.map_or_else(|| "-".to_string(), |n| n.to_string());
    let digest = Sha256::digest(format!("{page}|{label}|{sign_function}|{line}|{phone}"));
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use signgraph_store::{InMemoryStore, StoreSources};

    fn setup() -> InMemoryStore {
        let store = InMemoryStore::new();
        StoreSources::new(&store).provision("src1", None).unwrap();
        store
    }

    fn row(word_unit: &str, sign: &str) -> ImportRow {
        ImportRow {
            line: 2,
            source: Some("src1".into()),
            page: Some("3".into()),
            sign: Some(sign.into()),
            basic_form: Some("nfr".into()),
            word_unit_id: Some(word_unit.into()),
            ..ImportRow::default()
        }
    }

    fn load(store: &InMemoryStore, kind: EntityKind, id: EntityId) -> Record {
        store.load(kind, id).unwrap().unwrap()
    }

    #[test]
    fn line_numbers_come_from_leading_digits() {
        assert_eq!(line_number_of("12-3"), Some(12));
        assert_eq!(line_number_of(" 7a"), Some(7));
        assert_eq!(line_number_of("r4"), None);
        assert_eq!(line_number_of(""), None);
    }

    #[test]
    fn missing_required_field_touches_nothing() {
        let store = setup();
        let sources = StoreSources::new(&store);
        let builder = GraphBuilder::new(&store, &sources, "egy");
        let mut created = Vec::new();

        let mut bad = row("7", "A1");
        bad.basic_form = None;
        let err = builder.build(&bad, 1, &mut created).unwrap_err();

        assert!(matches!(err, RowError::MissingField("basic_form")));
        assert!(created.is_empty());
        assert_eq!(store.len(), 1, "only the provisioned source");
    }

    #[test]
    fn unknown_source_fails_after_dictionary_entries() {
        let store = setup();
        let sources = StoreSources::new(&store);
        let builder = GraphBuilder::new(&store, &sources, "egy");
        let mut created = Vec::new();

        let mut orphan = row("7", "A1");
        orphan.source = Some("nowhere".into());
        let err = builder.build(&orphan, 1, &mut created).unwrap_err();

        assert!(matches!(err, RowError::SourceNotFound(ref s) if s == "nowhere"));
        let kinds: Vec<EntityKind> = created.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![EntityKind::Word, EntityKind::WordMeaning]);
    }

    #[test]
    fn missing_label_is_a_warning() {
        let store = setup();
        let sources = StoreSources::new(&store);
        let builder = GraphBuilder::new(&store, &sources, "egy");
        let mut created = Vec::new();

        let mut labelled = row("7", "A1");
        labelled.label_name = Some("4-1".into());
        let outcome = builder.build(&labelled, 1, &mut created).unwrap();
        assert_eq!(outcome.warnings.len(), 1);

        let interpretation = created
            .iter()
            .find(|c| c.kind == EntityKind::SignInterpretation)
            .unwrap();
        let record = load(&store, EntityKind::SignInterpretation, interpretation.id);
        assert!(record.get("label").is_null());
        assert_eq!(record.int("line_number"), Some(4));
        assert_eq!(record.text("code").map(str::len), Some(64));
    }

    #[test]
    fn existing_label_is_linked() {
        let store = setup();
        let sources = StoreSources::new(&store);
        let builder = GraphBuilder::new(&store, &sources, "egy");
        let mut created = Vec::new();

        // First row creates the page; then the label is provisioned on it.
        builder.build(&row("6", "A1"), 1, &mut created).unwrap();
        let page = created
            .iter()
            .find(|c| c.kind == EntityKind::AnnotationPage)
            .unwrap()
            .id;
        let label = store
            .create(
                EntityKind::Label,
                fields([
                    ("annotation_page", FieldValue::Ref(page)),
                    ("label_name", FieldValue::text("2-5")),
                ]),
            )
            .unwrap();

        let mut labelled = row("7", "A1");
        labelled.label_name = Some("2-5".into());
        let mut created = Vec::new();
        let outcome = builder.build(&labelled, 1, &mut created).unwrap();
        assert!(outcome.warnings.is_empty());

        let interpretation = created
            .iter()
            .find(|c| c.kind == EntityKind::SignInterpretation)
            .unwrap();
        let record = load(&store, EntityKind::SignInterpretation, interpretation.id);
        assert_eq!(record.entity_ref("label"), Some(label.id));
        assert_eq!(record.int("line_number"), Some(2));
    }

    #[test]
    fn blank_function_and_meaning_normalize_to_empty() {
        let store = setup();
        let sources = StoreSources::new(&store);
        let builder = GraphBuilder::new(&store, &sources, "egy");
        let mut created = Vec::new();
        builder.build(&row("7", "A1"), 1, &mut created).unwrap();

        let function = created
            .iter()
            .find(|c| c.kind == EntityKind::SignFunction)
            .unwrap();
        let record = load(&store, EntityKind::SignFunction, function.id);
        assert_eq!(record.text("function_name"), Some(""));
        assert_eq!(record.text("language"), Some("egy"));

        let meaning = created
            .iter()
            .find(|c| c.kind == EntityKind::WordMeaning)
            .unwrap();
        let record = load(&store, EntityKind::WordMeaning, meaning.id);
        assert_eq!(record.text("meaning_identifier"), Some(""));
    }

    #[test]
    fn sign_function_language_is_corrected_from_its_sign() {
        let store = setup();
        let sign = store
            .create(
                EntityKind::Sign,
                fields([
                    ("sign_code", FieldValue::text("A1")),
                    ("language", FieldValue::text("egy")),
                ]),
            )
            .unwrap();
        let stale = store
            .create(
                EntityKind::SignFunction,
                fields([
                    ("sign", FieldValue::Ref(sign.id)),
                    ("function_name", FieldValue::text("")),
                    ("language", FieldValue::text("und")),
                ]),
            )
            .unwrap();

        let sources = StoreSources::new(&store);
        let builder = GraphBuilder::new(&store, &sources, "egy");
        let mut created = Vec::new();
        builder.build(&row("7", "A1"), 1, &mut created).unwrap();

        assert!(!created.iter().any(|c| c.kind == EntityKind::SignFunction));
        let record = load(&store, EntityKind::SignFunction, stale.id);
        assert_eq!(record.text("language"), Some("egy"));
    }

    #[test]
    fn grammar_terms_attach_to_new_word_units() {
        let store = setup();
        let sources = StoreSources::new(&store);
        let builder = GraphBuilder::new(&store, &sources, "egy");
        let mut created = Vec::new();

        let mut analysed = row("7", "A1");
        analysed.grammar.gender = Some("masculine".into());
        analysed.grammar.number = Some("plural".into());
        analysed.word_sequence = Some("4".into());
        let outcome = builder.build(&analysed, 3, &mut created).unwrap();

        let unit = load(&store, EntityKind::WordUnit, outcome.word_unit);
        assert_eq!(unit.int("word_sequence"), Some(4));
        assert!(unit.entity_ref("gender").is_some());
        assert!(unit.entity_ref("number").is_some());
        assert!(unit.get("person").is_null());

        let map = load(&store, EntityKind::WordMap, outcome.word_map);
        assert_eq!(map.int("sign_sequence"), Some(3));
        assert_eq!(
            created
                .iter()
                .filter(|c| c.kind == EntityKind::TaxonomyTerm)
                .count(),
            2
        );
    }

    #[test]
    fn word_unit_accumulates_pages() {
        let store = setup();
        let sources = StoreSources::new(&store);
        let builder = GraphBuilder::new(&store, &sources, "egy");
        let mut created = Vec::new();

        let first = builder.build(&row("7", "A1"), 1, &mut created).unwrap();
        let mut next_page = row("7", "A2");
        next_page.page = Some("4".into());
        let second = builder.build(&next_page, 2, &mut created).unwrap();

        assert_eq!(first.word_unit, second.word_unit);
        let unit = load(&store, EntityKind::WordUnit, first.word_unit);
        assert_eq!(unit.ref_set("page_refs").map(|s| s.len()), Some(2));
        assert_eq!(
            created
                .iter()
                .filter(|c| c.kind == EntityKind::WordUnit)
                .count(),
            1
        );
    }

    /// Holds `add_ref` callers at a barrier, so every caller has already read
    /// the word unit before any page lands.
    struct GatedStore {
        inner: InMemoryStore,
        gate: std::sync::Barrier,
    }

    impl EntityStore for GatedStore {
        fn find(&self, query: &Query) -> signgraph_store::Result<Vec<Record>> {
            self.inner.find(query)
        }

        fn load(&self, kind: EntityKind, id: EntityId) -> signgraph_store::Result<Option<Record>> {
            self.inner.load(kind, id)
        }

        fn create(&self, kind: EntityKind, fields: Fields) -> signgraph_store::Result<Record> {
            self.inner.create(kind, fields)
        }

        fn update(&self, record: &Record) -> signgraph_store::Result<()> {
            self.inner.update(record)
        }

        fn add_ref(
            &self,
            kind: EntityKind,
            id: EntityId,
            field: &str,
            target: EntityId,
        ) -> signgraph_store::Result<bool> {
            self.gate.wait();
            self.inner.add_ref(kind, id, field, target)
        }

        fn delete(&self, kind: EntityKind, id: EntityId) -> signgraph_store::Result<()> {
            self.inner.delete(kind, id)
        }
    }

    #[test]
    fn concurrent_jobs_keep_every_page() {
        let store = GatedStore {
            inner: setup(),
            gate: std::sync::Barrier::new(2),
        };
        let first = GraphBuilder::new(&store.inner, &StoreSources::new(&store.inner), "egy")
            .build(&row("7", "A1"), 1, &mut Vec::new())
            .unwrap();

        std::thread::scope(|scope| {
            for page in ["4", "5"] {
                let store = &store;
                scope.spawn(move || {
                    let sources = StoreSources::new(&store.inner);
                    let builder = GraphBuilder::new(store, &sources, "egy");
                    let mut next = row("7", "A2");
                    next.page = Some(page.into());
                    builder.build(&next, 2, &mut Vec::new()).unwrap();
                });
            }
        });

        let unit = load(&store.inner, EntityKind::WordUnit, first.word_unit);
        assert_eq!(unit.ref_set("page_refs").map(|s| s.len()), Some(3));
    }
}
