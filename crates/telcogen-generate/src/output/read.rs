use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use telcogen_core::{CanonicalDataset, Entity, EntityLoader};

use crate::errors::GenerationError;
use crate::manifest::Manifest;

/// Loads canonical entity files written by a previous run.
pub struct CanonicalReader {
    dir: PathBuf,
}

impl CanonicalReader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.jsonl"))
    }
}

impl EntityLoader for CanonicalReader {
    type Error = GenerationError;

    fn load<E: Entity>(&mut self) -> Result<Vec<E>, Self::Error> {
        let path = self.path_for(E::KIND.name());
        let file = File::open(&path).map_err(|err| GenerationError::read(&path, err))?;
        let mut rows = Vec::new();

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|err| GenerationError::read(&path, err))?;
            if line.trim().is_empty() {
                continue;
            }
            let row = serde_json::from_str::<E>(&line).map_err(|err| {
                GenerationError::InvalidRecord(format!(
                    "{}:{}: {err}",
                    path.display(),
                    index + 1
                ))
            })?;
            rows.push(row);
        }

        debug!(entity = %E::KIND, rows = rows.len(), path = %path.display(), "canonical file loaded");
        Ok(rows)
    }
}

/// Rebuild a canonical dataset from `<dir>/<entity>.jsonl` files.
pub fn read_canonical(dir: &Path) -> Result<CanonicalDataset, GenerationError> {
    CanonicalDataset::load(&mut CanonicalReader::new(dir))
}

pub fn read_manifest(path: &Path) -> Result<Manifest, GenerationError> {
    let file = File::open(path).map_err(|err| GenerationError::read(path, err))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|err| {
        GenerationError::InvalidRecord(format!("{}: {err}", path.display()))
    })
}
