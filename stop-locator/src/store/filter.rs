//! Query predicates evaluated by a document store.
//!
//! Comparisons follow document-store typing rules: strings compare
//! byte-wise, numbers compare numerically, and values of different types
//! never match each other. In particular `"53.35" <= "53.357800"` is a
//! string comparison, so callers must format bounds the way fields are stored.

use std::cmp::Ordering;

use serde_json::{Map, Value, json};

use super::Document;

/// Comparison operator for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    fn operator(self) -> &'static str {
        match self {
            CompareOp::Lt => "$lt",
            CompareOp::Lte => "$lte",
            CompareOp::Gt => "$gt",
            CompareOp::Gte => "$gte",
        }
    }

    fn accepts(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Lte => ord != Ordering::Greater,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Gte => ord != Ordering::Less,
        }
    }
}

/// A boolean predicate over documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document.
    All,
    /// Matches when every inner filter matches.
    And(Vec<Filter>),
    /// Compares one field against a constant.
    Compare {
        field: String,
        op: CompareOp,
        value: Value,
    },
}

impl Filter {
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Filter::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluate the filter against a document.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::And(filters) => filters.iter().all(|f| f.matches(doc)),
            Filter::Compare { field, op, value } => doc
                .get(field)
                .and_then(|actual| compare_values(actual, value))
                .is_some_and(|ord| op.accepts(ord)),
        }
    }

    /// Render in the JSON query syntax used by document stores, e.g.
    /// `{"$and": [{"stop_lat": {"$lte": "53.357800"}}]}`.
    pub fn to_json(&self) -> Value {
        match self {
            Filter::All => Value::Object(Map::new()),
            Filter::And(filters) => {
                json!({ "$and": filters.iter().map(Filter::to_json).collect::<Vec<_>>() })
            }
            Filter::Compare { field, op, value } => {
                let mut condition = Map::new();
                condition.insert(op.operator().to_string(), value.clone());
                let mut outer = Map::new();
                outer.insert(field.clone(), Value::Object(condition));
                Value::Object(outer)
            }
        }
    }
}

/// Order two values of the same type. Values of different types are unordered.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
