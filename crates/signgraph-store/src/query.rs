//! Query builder: equality / IN conditions, one sort key, and a row range.

use serde::{Deserialize, Serialize};

use crate::{EntityKind, FieldValue, Record};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    /// `field == value`. An absent field equals `Null`.
    Eq { field: String, value: FieldValue },
    /// `field` is one of `values`.
    In {
        field: String,
        values: Vec<FieldValue>,
    },
}

impl Condition {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Condition::Eq { field, value } => record.get(field) == value,
            Condition::In { field, values } => values.contains(record.get(field)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub kind: EntityKind,
    pub conditions: Vec<Condition>,
    pub sort: Option<(String, SortOrder)>,
    /// `(start, length)` applied after filtering and sorting.
    pub range: Option<(usize, usize)>,
}

impl Query {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            conditions: Vec::new(),
            sort: None,
            range: None,
        }
    }

    pub fn eq(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.conditions.push(Condition::Eq {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn is_in(mut self, field: &str, values: Vec<FieldValue>) -> Self {
        self.conditions.push(Condition::In {
            field: field.to_string(),
            values,
        });
        self
    }

    pub fn sort(mut self, field: &str, order: SortOrder) -> Self {
        self.sort = Some((field.to_string(), order));
        self
    }

    pub fn range(mut self, start: usize, length: usize) -> Self {
        self.range = Some((start, length));
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.kind == self.kind && self.conditions.iter().all(|c| c.matches(record))
    }

    /// Value of an `Eq` condition on `field`, if the query has one.
    pub fn eq_value(&self, field: &str) -> Option<&FieldValue> {
        self.conditions.iter().find_map(|c| match c {
            Condition::Eq { field: f, value } if f == field => Some(value),
            _ => None,
        })
    }

    /// Filter, sort and slice `records` according to this query.
    ///
    /// Records are expected in id order; ties on the sort key keep that order.
    pub fn apply<I>(&self, records: I) -> Vec<Record>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut out: Vec<Record> = records.into_iter().filter(|r| self.matches(r)).collect();

        if let Some((field, order)) = &self.sort {
            out.sort_by(|a, b| {
                let ord = a.get(field).cmp(b.get(field));
                match order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }

        match self.range {
            Some((start, length)) => out.into_iter().skip(start).take(length).collect(),
            None => out,
        }
    }
}
