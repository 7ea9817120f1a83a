use telcogen_core::{CanonicalDataset, Entity, EntityKind, EntityVisitor};

use crate::errors::GenerationError;
use crate::shapes::document::{
    Collection, DOCUMENT_ID_FIELD, IdStrategy, SyntheticIdCounter, document_id, to_document,
};

/// One collection per entity, fields mirroring the canonical rows plus `_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedProjection {
    pub collections: Vec<Collection>,
}

impl NormalizedProjection {
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections
            .iter()
            .find(|collection| collection.name == name)
    }
}

struct NormalizedBuilder<'a> {
    counter: &'a mut SyntheticIdCounter,
    collections: Vec<Collection>,
}

impl EntityVisitor for NormalizedBuilder<'_> {
    type Error = GenerationError;

    fn visit<E: Entity>(&mut self, rows: &[E]) -> Result<(), Self::Error> {
        let strategy = IdStrategy::for_kind(E::KIND);
        let mut collection = Collection::new(E::KIND.name());
        collection.documents.reserve(rows.len());

        for row in rows {
            let mut document = to_document(row)?;
            if document.contains_key(DOCUMENT_ID_FIELD) {
                return Err(GenerationError::Projection(format!(
                    "{} rows already carry a '{DOCUMENT_ID_FIELD}' field",
                    E::KIND
                )));
            }
            let id = document_id(strategy, &document, self.counter)?;
            document.insert(DOCUMENT_ID_FIELD.to_string(), id);
            collection.documents.push(document);
        }

        self.collections.push(collection);
        Ok(())
    }
}

/// Project every entity into a document collection.
///
/// Synthetic ids are drawn from `counter` in collection order, then row order.
pub fn project_normalized(
    dataset: &CanonicalDataset,
    counter: &mut SyntheticIdCounter,
) -> Result<NormalizedProjection, GenerationError> {
    let mut builder = NormalizedBuilder {
        counter,
        collections: Vec::with_capacity(EntityKind::ALL.len()),
    };
    dataset.visit(&mut builder)?;
    Ok(NormalizedProjection {
        collections: builder.collections,
    })
}
