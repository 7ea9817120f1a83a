use serde_json::Value;

use telcogen_core::{
    CanonicalDataset, Entity, EntityKind, EntityVisitor, LoadOrderReport, build_load_order_report,
};

use crate::errors::GenerationError;
use crate::shapes::document::to_document;

/// One relational table. `None` cells are SQL nulls.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub kind: EntityKind,
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

/// Tables in entity order plus the dependency-safe load order.
#[derive(Debug, Clone)]
pub struct RelationalProjection {
    pub tables: Vec<Table>,
    pub load_order: Vec<EntityKind>,
}

impl RelationalProjection {
    pub fn table(&self, kind: EntityKind) -> Option<&Table> {
        self.tables.iter().find(|table| table.kind == kind)
    }
}

/// Columns that carry structured values serialized as compact JSON text.
pub const STRUCTURED_COLUMNS: &[(EntityKind, &str)] = &[
    (EntityKind::SubscriberProfile, "address"),
    (EntityKind::SubscriberFeatureState, "history"),
    (EntityKind::DeviceEvent, "payload"),
];

struct TableBuilder {
    tables: Vec<Table>,
}

impl EntityVisitor for TableBuilder {
    type Error = GenerationError;

    fn visit<E: Entity>(&mut self, rows: &[E]) -> Result<(), Self::Error> {
        let mut table = Table {
            kind: E::KIND,
            columns: E::COLUMNS,
            rows: Vec::with_capacity(rows.len()),
        };

        for (index, row) in rows.iter().enumerate() {
            let mut document = to_document(row)?;
            let mut cells = Vec::with_capacity(E::COLUMNS.len());
            for column in E::COLUMNS {
                let value = document.remove(*column).ok_or_else(|| {
                    GenerationError::Projection(format!(
                        "{}[{index}] has no '{column}' column",
                        E::KIND
                    ))
                })?;
                cells.push(cell(value)?);
            }
            if let Some(extra) = document.keys().next() {
                return Err(GenerationError::Projection(format!(
                    "{}[{index}] has undeclared field '{extra}'",
                    E::KIND
                )));
            }
            table.rows.push(cells);
        }

        self.tables.push(table);
        Ok(())
    }
}

/// Flatten every entity into a table with its declared column order.
pub fn project_relational(
    dataset: &CanonicalDataset,
) -> Result<RelationalProjection, GenerationError> {
    let mut builder = TableBuilder {
        tables: Vec::with_capacity(EntityKind::ALL.len()),
    };
    dataset.visit(&mut builder)?;

    Ok(RelationalProjection {
        tables: builder.tables,
        load_order: load_order()?,
    })
}

/// Parents before children, derived from the declared foreign keys.
pub fn load_order() -> Result<Vec<EntityKind>, GenerationError> {
    let LoadOrderReport {
        load_order, cycle, ..
    } = build_load_order_report();
    load_order.ok_or_else(|| {
        let names: Vec<&str> = cycle
            .unwrap_or_default()
            .into_iter()
            .map(EntityKind::name)
            .collect();
        GenerationError::Projection(format!("entity graph has a cycle: {}", names.join(", ")))
    })
}

fn cell(value: Value) -> Result<Option<String>, GenerationError> {
    Ok(match value {
        Value::Null => None,
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::String(text) => Some(text),
        structured @ (Value::Array(_) | Value::Object(_)) => {
            Some(serde_json::to_string(&structured)?)
        }
    })
}
