//! Core contracts for the telco synthetic dataset.
//!
//! This crate defines the canonical entity types, the entity registry (names,
//! identifier blocks, foreign keys), size presets, and the integrity checks
//! shared by the generator, the projections and the CLI.

pub mod dataset;
pub mod entity;
pub mod error;
pub mod graph;
pub mod model;
pub mod preset;
pub mod validation;

pub use dataset::{CanonicalDataset, EntityLoader, EntityVisitor};
pub use entity::{EntityKind, ForeignKey, ID_BLOCK_SIZE};
pub use error::{Error, Result};
pub use graph::{LoadOrderReport, build_load_order_report};
pub use model::*;
pub use preset::{CountRange, Preset, SizeClass};
pub use validation::{ValidationIssue, ValidationReport, validate_dataset};

/// Version of the dataset contract (entity names, columns, draw order).
pub const DATASET_VERSION: &str = "1";
