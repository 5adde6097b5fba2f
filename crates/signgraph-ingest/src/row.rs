//! Typed rows and the header that maps columns onto them.
//!
//! Blank cells are `None`: the table format has no way to distinguish an empty
//! string from a missing value, and neither does the importer.

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result, RowError};
use crate::taxonomy::Vocabulary;

/// Columns the importer understands. Any other header cell is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Source,
    Page,
    LabelName,
    Sign,
    Function,
    Phone,
    Note,
    WordUnitId,
    BasicForm,
    RealizedForm,
    LexicalCategoryName,
    MeaningId,
    Explanation,
    Person,
    Gender,
    Number,
    VerbalForm,
    Aspect,
    Mood,
    Voice,
    Case,
    WordSequence,
}

impl Column {
    pub const REQUIRED: [Column; 5] = [
        Column::Source,
        Column::Page,
        Column::Sign,
        Column::BasicForm,
        Column::WordUnitId,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Source => "source",
            Column::Page => "page",
            Column::LabelName => "label_name",
            Column::Sign => "sign",
            Column::Function => "function",
            Column::Phone => "phone",
            Column::Note => "note",
            Column::WordUnitId => "word_unit_id",
            Column::BasicForm => "basic_form",
            Column::RealizedForm => "realized_form",
            Column::LexicalCategoryName => "lexical_category_name",
            Column::MeaningId => "meaning_id",
            Column::Explanation => "explanation",
            Column::Person => "person",
            Column::Gender => "gender",
            Column::Number => "number",
            Column::VerbalForm => "verbal_form",
            Column::Aspect => "aspect",
            Column::Mood => "mood",
            Column::Voice => "voice",
            Column::Case => "case",
            Column::WordSequence => "word_sequence",
        }
    }

    /// Column for a normalized header name, aliases included.
    pub fn from_header(name: &str) -> Option<Self> {
        let column = match name {
            "source" => Column::Source,
            "page" | "page_number" => Column::Page,
            "label_name" | "label" => Column::LabelName,
            "sign" | "sign_code" => Column::Sign,
            "function" | "function_name" => Column::Function,
            "phone" => Column::Phone,
            "note" => Column::Note,
            "word_unit_id" | "word_unit" => Column::WordUnitId,
            "basic_form" => Column::BasicForm,
            "realized_form" => Column::RealizedForm,
            "lexical_category_name" | "lexical_category" => Column::LexicalCategoryName,
            "meaning_id" => Column::MeaningId,
            "explanation" => Column::Explanation,
            "person" => Column::Person,
            "gender" => Column::Gender,
            "number" => Column::Number,
            "verbal_form" => Column::VerbalForm,
            "aspect" => Column::Aspect,
            "mood" => Column::Mood,
            "voice" => Column::Voice,
            "case" => Column::Case,
            "word_sequence" => Column::WordSequence,
            _ => return None,
        };
        Some(column)
    }
}

/// Trim, drop a byte-order mark, lower-case, and map spaces/hyphens to `_`.
pub fn normalize_header_name(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

// ============================================================================
// Header
// ============================================================================

/// Parsed header line, cached in the job state for the whole job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Normalized column names, in file order.
    pub columns: Vec<String>,
    pub delimiter: u8,
}

impl Header {
    /// Parse the first line of a source file.
    ///
    /// The delimiter is a tab if the line contains one, otherwise a comma.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.strip_prefix('\u{feff}').unwrap_or(line);
        let line = line.trim_end_matches(|c| c == '\r' || c == '\n');
        if line.trim().is_empty() {
            return Err(IngestError::EmptySource);
        }

        let delimiter = if line.contains('\t') { b'\t' } else { b',' };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .from_reader(line.as_bytes());
        let mut record = csv::StringRecord::new();
        if !reader.read_record(&mut record)? {
            return Err(IngestError::EmptySource);
        }

        Ok(Self {
            columns: record.iter().map(normalize_header_name).collect(),
            delimiter,
        })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Index of the first header cell mapping to `column`.
    pub fn position(&self, column: Column) -> Option<usize> {
        self.columns
            .iter()
            .position(|name| Column::from_header(name) == Some(column))
    }

    /// Required columns absent from the header.
    pub fn missing_required(&self) -> Vec<String> {
        Column::REQUIRED
            .into_iter()
            .filter(|c| self.position(*c).is_none())
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Map a data row onto an [`ImportRow`].
    ///
    /// A row with a different number of cells than the header is rejected
    /// outright; guessing which cell went missing would misfile data.
    pub fn row(&self, line: u64, values: &[String]) -> Result<ImportRow, RowError> {
        if values.len() != self.len() {
            return Err(RowError::ColumnCount {
                expected: self.len(),
                found: values.len(),
            });
        }

        let cell = |column: Column| -> Option<String> {
            self.position(column)
                .and_then(|idx| values.get(idx))
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Ok(ImportRow {
            line,
            source: cell(Column::Source),
            page: cell(Column::Page),
            label_name: cell(Column::LabelName),
            sign: cell(Column::Sign),
            function: cell(Column::Function),
            phone: cell(Column::Phone),
            note: cell(Column::Note),
            word_unit_id: cell(Column::WordUnitId),
            basic_form: cell(Column::BasicForm),
            realized_form: cell(Column::RealizedForm),
            lexical_category_name: cell(Column::LexicalCategoryName),
            meaning_id: cell(Column::MeaningId),
            explanation: cell(Column::Explanation),
            grammar: GrammarCategories {
                person: cell(Column::Person),
                gender: cell(Column::Gender),
                number: cell(Column::Number),
                verbal_form: cell(Column::VerbalForm),
                aspect: cell(Column::Aspect),
                mood: cell(Column::Mood),
                voice: cell(Column::Voice),
                case: cell(Column::Case),
            },
            word_sequence: cell(Column::WordSequence),
        })
    }
}

// ============================================================================
// Rows
// ============================================================================

/// Optional morphological analysis of the word unit a row belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrammarCategories {
    pub person: Option<String>,
    pub gender: Option<String>,
    pub number: Option<String>,
    pub verbal_form: Option<String>,
    pub aspect: Option<String>,
    pub mood: Option<String>,
    pub voice: Option<String>,
    pub case: Option<String>,
}

impl GrammarCategories {
    /// Each grammar vocabulary paired with the row's value for it.
    pub fn entries(&self) -> [(Vocabulary, Option<&str>); 8] {
        [
            (Vocabulary::Person, self.person.as_deref()),
            (Vocabulary::Gender, self.gender.as_deref()),
            (Vocabulary::Number, self.number.as_deref()),
            (Vocabulary::VerbalForm, self.verbal_form.as_deref()),
            (Vocabulary::Aspect, self.aspect.as_deref()),
            (Vocabulary::Mood, self.mood.as_deref()),
            (Vocabulary::Voice, self.voice.as_deref()),
            (Vocabulary::Case, self.case.as_deref()),
        ]
    }
}

/// One sign occurrence, as read from the source table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based line number in the source file.
    pub line: u64,
    pub source: Option<String>,
    pub page: Option<String>,
    pub label_name: Option<String>,
    pub sign: Option<String>,
    pub function: Option<String>,
    pub phone: Option<String>,
    pub note: Option<String>,
    pub word_unit_id: Option<String>,
    pub basic_form: Option<String>,
    pub realized_form: Option<String>,
    pub lexical_category_name: Option<String>,
    pub meaning_id: Option<String>,
    pub explanation: Option<String>,
    pub grammar: GrammarCategories,
    pub word_sequence: Option<String>,
}

/// The required part of a row, checked and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidRow<'a> {
    pub source: &'a str,
    pub page: i64,
    pub sign: &'a str,
    pub basic_form: &'a str,
    pub word_unit_id: &'a str,
    pub word_sequence: Option<i64>,
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, RowError> {
    value.as_deref().ok_or(RowError::MissingField(field))
}

fn parse_int(value: &str, field: &'static str) -> Result<i64, RowError> {
    value.parse().map_err(|_| RowError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

impl ImportRow {
    pub fn validate(&self) -> Result<ValidRow<'_>, RowError> {
        let source = required(&self.source, "source")?;
        let page = parse_int(required(&self.page, "page")?, "page")?;
        let sign = required(&self.sign, "sign")?;
        let basic_form = required(&self.basic_form, "basic_form")?;
        let word_unit_id = required(&self.word_unit_id, "word_unit_id")?;
        let word_sequence = self
            .word_sequence
            .as_deref()
            .map(|v| parse_int(v, "word_sequence"))
            .transpose()?;

        Ok(ValidRow {
            source,
            page,
            sign,
            basic_form,
            word_unit_id,
            word_sequence,
        })
    }
}
