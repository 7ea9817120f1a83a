use std::collections::BTreeMap;

use telcogen_core::{EntityKind, Error, ID_BLOCK_SIZE};

/// Mints identifiers from each entity kind's private block.
///
/// Sequences are monotonic per kind and start at `block * ID_BLOCK_SIZE + 1`.
#[derive(Debug, Default)]
pub struct IdAllocator {
    issued: BTreeMap<EntityKind, i64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, kind: EntityKind) -> Result<i64, Error> {
        let block = kind.id_block().ok_or_else(|| {
            Error::InvalidConfiguration(format!("{kind} has no identifier block"))
        })?;
        let issued = self.issued.entry(kind).or_insert(0);
        if *issued >= ID_BLOCK_SIZE - 1 {
            return Err(Error::IdSpaceExhausted {
                entity: kind,
                limit: ID_BLOCK_SIZE - 1,
            });
        }
        *issued += 1;
        Ok(block * ID_BLOCK_SIZE + *issued)
    }

    pub fn issued(&self, kind: EntityKind) -> i64 {
        self.issued.get(&kind).copied().unwrap_or(0)
    }
}
