use thiserror::Error;

use crate::entity::EntityKind;

/// Core error type shared across telcogen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A size class, seed or shape selector could not be resolved.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// A record carries a value outside its closed vocabulary.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
    /// An entity kind ran past the end of its identifier block.
    #[error("identifier space exhausted for {entity} (limit {limit})")]
    IdSpaceExhausted { entity: EntityKind, limit: i64 },
}

/// Convenience alias for results returned by telcogen crates.
pub type Result<T> = std::result::Result<T, Error>;
