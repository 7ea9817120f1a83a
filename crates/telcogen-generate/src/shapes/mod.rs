//! Projections of the canonical dataset.

pub mod document;
pub mod normalized;
pub mod optimized;
pub mod relational;

pub use document::{Collection, DOCUMENT_ID_FIELD, Document, IdStrategy, SyntheticIdCounter};
pub use normalized::{NormalizedProjection, project_normalized};
pub use optimized::{EMBEDDINGS, Embedding, project_optimized};
pub use relational::{RelationalProjection, Table, project_relational};
