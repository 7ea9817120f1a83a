use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde_json::Value;

use telcogen_core::EntityKind;

use crate::errors::GenerationError;
use crate::shapes::document::{Collection, Document};
use crate::shapes::normalized::NormalizedProjection;

/// A child collection folded into its parent's documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Embedding {
    pub child: EntityKind,
    pub parent: EntityKind,
    /// Field of the parent document that receives the child data.
    pub field: &'static str,
    /// Column linking child to parent.
    pub join: &'static str,
    /// Child fields kept in the embedded form.
    pub fields: &'static [&'static str],
    /// Children form an array ordered by primary key instead of a single object.
    pub many: bool,
}

pub const EMBEDDINGS: &[Embedding] = &[
    Embedding {
        child: EntityKind::SubscriberProfile,
        parent: EntityKind::Subscriber,
        field: "profile",
        join: "subscriber_id",
        fields: &[
            "first_name",
            "last_name",
            "email",
            "date_of_birth",
            "preferred_language",
            "marketing_opt_in",
            "address",
        ],
        many: false,
    },
    Embedding {
        child: EntityKind::OrderItem,
        parent: EntityKind::Order,
        field: "items",
        join: "order_id",
        fields: &["order_item_id", "sku", "quantity", "unit_price_cents"],
        many: true,
    },
];

/// Subscriber field holding the sorted, distinct codes of enabled features.
pub const FEATURE_CODES_FIELD: &str = "feature_codes";

/// Read-optimized document collections.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedProjection {
    pub collections: Vec<Collection>,
}

impl OptimizedProjection {
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections
            .iter()
            .find(|collection| collection.name == name)
    }
}

/// Fold embedded children into their parents and drop the child collections.
///
/// When `embed_feature_codes` is set, every subscriber also gets the codes of
/// its enabled features.
pub fn project_optimized(
    normalized: &NormalizedProjection,
    embed_feature_codes: bool,
) -> Result<OptimizedProjection, GenerationError> {
    let mut folded: BTreeMap<&'static str, (Embedding, HashMap<i64, Vec<Document>>)> =
        BTreeMap::new();
    for embedding in EMBEDDINGS {
        let children = collection(normalized, embedding.child)?;
        let groups = group_children(children, embedding)?;
        folded.insert(embedding.parent.name(), (*embedding, groups));
    }

    let feature_codes = if embed_feature_codes {
        Some(feature_codes_by_subscriber(normalized)?)
    } else {
        None
    };

    let omitted: BTreeSet<&str> = EMBEDDINGS
        .iter()
        .map(|embedding| embedding.child.name())
        .collect();

    let mut collections = Vec::with_capacity(normalized.collections.len());
    for source in &normalized.collections {
        if omitted.contains(source.name.as_str()) {
            continue;
        }
        let mut target = source.clone();

        if let Some((embedding, groups)) = folded.get(source.name.as_str()) {
            let key = embedding.parent.primary_key().first().copied().unwrap_or("id");
            for document in &mut target.documents {
                let parent_id = integer_field(document, key)?;
                let children = groups.get(&parent_id).cloned().unwrap_or_default();
                let value = if embedding.many {
                    Value::Array(children.into_iter().map(Value::Object).collect())
                } else {
                    let child = children.into_iter().next().ok_or_else(|| {
                        GenerationError::Projection(format!(
                            "{} {parent_id} has no {}",
                            embedding.parent, embedding.child
                        ))
                    })?;
                    Value::Object(child)
                };
                document.insert(embedding.field.to_string(), value);
            }
        }

        if source.name == EntityKind::Subscriber.name() {
            if let Some(codes) = &feature_codes {
                for document in &mut target.documents {
                    let subscriber_id = integer_field(document, "subscriber_id")?;
                    let value: Vec<Value> = codes
                        .get(&subscriber_id)
                        .map(|set| set.iter().cloned().map(Value::String).collect())
                        .unwrap_or_default();
                    document.insert(FEATURE_CODES_FIELD.to_string(), Value::Array(value));
                }
            }
        }

        collections.push(target);
    }

    Ok(OptimizedProjection { collections })
}

fn collection(
    projection: &NormalizedProjection,
    kind: EntityKind,
) -> Result<&Collection, GenerationError> {
    projection
        .collection(kind.name())
        .ok_or_else(|| GenerationError::Projection(format!("missing collection {kind}")))
}

fn integer_field(document: &Document, field: &str) -> Result<i64, GenerationError> {
    document
        .get(field)
        .and_then(Value::as_i64)
        .ok_or_else(|| GenerationError::Projection(format!("document has no integer '{field}'")))
}

/// Children keyed by parent id, in source (primary key) order.
fn group_children(
    children: &Collection,
    embedding: &Embedding,
) -> Result<HashMap<i64, Vec<Document>>, GenerationError> {
    let mut groups: HashMap<i64, Vec<Document>> = HashMap::new();
    for document in &children.documents {
        let parent_id = integer_field(document, embedding.join)?;
        let mut embedded = Document::new();
        for field in embedding.fields {
            let value = document.get(*field).cloned().ok_or_else(|| {
                GenerationError::Projection(format!("{} has no '{field}'", embedding.child))
            })?;
            embedded.insert((*field).to_string(), value);
        }
        groups.entry(parent_id).or_default().push(embedded);
    }
    Ok(groups)
}

fn feature_codes_by_subscriber(
    normalized: &NormalizedProjection,
) -> Result<HashMap<i64, BTreeSet<String>>, GenerationError> {
    let mut codes_by_feature = HashMap::new();
    for document in &collection(normalized, EntityKind::Feature)?.documents {
        let code = document
            .get("code")
            .and_then(Value::as_str)
            .ok_or_else(|| GenerationError::Projection("feature has no code".to_string()))?;
        codes_by_feature.insert(integer_field(document, "feature_id")?, code.to_string());
    }

    let mut codes: HashMap<i64, BTreeSet<String>> = HashMap::new();
    for document in &collection(normalized, EntityKind::SubscriberFeature)?.documents {
        let feature_id = integer_field(document, "feature_id")?;
        let code = codes_by_feature.get(&feature_id).ok_or_else(|| {
            GenerationError::Projection(format!("unknown feature {feature_id}"))
        })?;
        codes
            .entry(integer_field(document, "subscriber_id")?)
            .or_default()
            .insert(code.clone());
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::generate_canonical;
    use crate::shapes::document::SyntheticIdCounter;
    use crate::shapes::normalized::project_normalized;
    use telcogen_core::{Preset, SizeClass};

    fn projections(embed: bool) -> (NormalizedProjection, OptimizedProjection) {
        let dataset = generate_canonical(42, &Preset::for_size(SizeClass::Small)).unwrap();
        let normalized = project_normalized(&dataset, &mut SyntheticIdCounter::new()).unwrap();
        let optimized = project_optimized(&normalized, embed).unwrap();
        (normalized, optimized)
    }

    #[test]
    fn folded_collections_are_omitted() {
        let (normalized, optimized) = projections(true);
        assert_eq!(optimized.collections.len(), normalized.collections.len() - 2);
        assert!(optimized.collection("subscriber_profiles").is_none());
        assert!(optimized.collection("order_items").is_none());
    }

    #[test]
    fn profile_drops_the_join_column() {
        let (_, optimized) = projections(false);
        for document in &optimized.collection("subscribers").unwrap().documents {
            let profile = document["profile"].as_object().unwrap();
            assert!(!profile.contains_key("subscriber_id"));
            assert!(!profile.contains_key("_id"));
            assert!(!document.contains_key(FEATURE_CODES_FIELD));
        }
    }

    #[test]
    fn items_are_ordered_and_complete() {
        let (normalized, optimized) = projections(true);
        let embedded: usize = optimized
            .collection("orders")
            .unwrap()
            .documents
            .iter()
            .map(|order| {
                let items = order["items"].as_array().unwrap();
                let ids: Vec<i64> = items
                    .iter()
                    .map(|item| item["order_item_id"].as_i64().unwrap())
                    .collect();
                assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
                items.len()
            })
            .sum();
        assert_eq!(
            embedded,
            normalized.collection("order_items").unwrap().documents.len()
        );
    }
}
