//! Deterministic generation engine for the telco synthetic dataset.
//!
//! Given a seed and a size class this crate builds the canonical entity
//! graph, projects it into the normalized, optimized and relational shapes,
//! and writes the artifacts plus a manifest.

pub mod canonical;
pub mod catalog;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod ids;
pub mod manifest;
pub mod model;
pub mod output;
pub mod rng;
pub mod shapes;

pub use canonical::generate_canonical;
pub use engine::{GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use manifest::Manifest;
pub use model::{
    ArtifactReport, GenerateOptions, GenerationReport, Shape, ShapeSelection, parse_seed,
};
pub use rng::RandomSource;
