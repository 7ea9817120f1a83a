use serde::Serialize;
use serde_json::{Map, Value};

use telcogen_core::EntityKind;

use crate::errors::GenerationError;

/// Reserved identifier field of every document.
pub const DOCUMENT_ID_FIELD: &str = "_id";

/// A JSON object with fields in lexical order.
pub type Document = Map<String, Value>;

/// Named, ordered group of documents.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub name: String,
    pub documents: Vec<Document>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
        }
    }
}

/// How a collection's `_id` is derived from the canonical row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum IdStrategy {
    /// `_id` mirrors the single-column primary key.
    PrimaryKey { field: &'static str },
    /// `_id` mirrors a natural text code.
    NaturalCode { field: &'static str },
    /// `_id` comes from the run's synthetic counter.
    Synthetic,
}

impl IdStrategy {
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::TicketStatusCode => IdStrategy::NaturalCode { field: "code" },
            EntityKind::Rate | EntityKind::SubscriberFeature => IdStrategy::Synthetic,
            _ => IdStrategy::PrimaryKey {
                field: kind.primary_key().first().copied().unwrap_or("id"),
            },
        }
    }
}

/// Shared counter for synthetic document ids.
///
/// Owned by one run and passed explicitly, so two projections in the same
/// process never share numbering.
#[derive(Debug)]
pub struct SyntheticIdCounter {
    next: i64,
}

impl SyntheticIdCounter {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> i64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for SyntheticIdCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a row to a JSON object.
pub fn to_document<T: Serialize>(row: &T) -> Result<Document, GenerationError> {
    match serde_json::to_value(row)? {
        Value::Object(map) => Ok(map),
        other => Err(GenerationError::Projection(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Resolve the `_id` value of `document` for `strategy`.
pub fn document_id(
    strategy: IdStrategy,
    document: &Document,
    counter: &mut SyntheticIdCounter,
) -> Result<Value, GenerationError> {
    match strategy {
        IdStrategy::PrimaryKey { field } | IdStrategy::NaturalCode { field } => document
            .get(field)
            .filter(|value| !value.is_null())
            .cloned()
            .ok_or_else(|| GenerationError::Projection(format!("document has no '{field}' field"))),
        IdStrategy::Synthetic => Ok(Value::from(counter.next_id())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strategies_follow_key_shape() {
        assert_eq!(
            IdStrategy::for_kind(EntityKind::Subscriber),
            IdStrategy::PrimaryKey {
                field: "subscriber_id"
            }
        );
        assert_eq!(
            IdStrategy::for_kind(EntityKind::TicketStatusCode),
            IdStrategy::NaturalCode { field: "code" }
        );
        assert_eq!(IdStrategy::for_kind(EntityKind::Rate), IdStrategy::Synthetic);
    }

    #[test]
    fn synthetic_ids_are_sequential_per_counter() {
        let mut first = SyntheticIdCounter::new();
        let mut second = SyntheticIdCounter::new();
        let document = Document::new();
        assert_eq!(
            document_id(IdStrategy::Synthetic, &document, &mut first).unwrap(),
            json!(1)
        );
        assert_eq!(
            document_id(IdStrategy::Synthetic, &document, &mut first).unwrap(),
            json!(2)
        );
        assert_eq!(
            document_id(IdStrategy::Synthetic, &document, &mut second).unwrap(),
            json!(1)
        );
    }

    #[test]
    fn missing_key_field_is_a_projection_error() {
        let mut counter = SyntheticIdCounter::new();
        let document = to_document(&json!({ "name": "x" })).unwrap();
        assert!(document_id(
            IdStrategy::PrimaryKey { field: "region_id" },
            &document,
            &mut counter
        )
        .is_err());
    }
}
