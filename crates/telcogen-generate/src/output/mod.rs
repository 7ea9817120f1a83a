//! Artifact layout, overwrite guard and writers.

use std::path::{Path, PathBuf};

use tracing::warn;

use telcogen_core::EntityKind;

use crate::errors::GenerationError;
use crate::manifest::MANIFEST_FILE;
use crate::model::{Shape, ShapeSelection};
use crate::shapes::optimized::EMBEDDINGS;

pub mod atomic;
pub mod csv;
pub mod jsonl;
pub mod read;

/// One file the run will produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedArtifact {
    pub shape: Shape,
    pub kind: EntityKind,
    pub path: PathBuf,
}

/// Every path a run writes, known before any generation work starts.
#[derive(Debug, Clone)]
pub struct ArtifactPlan {
    out_dir: PathBuf,
    artifacts: Vec<PlannedArtifact>,
}

impl ArtifactPlan {
    pub fn new(out_dir: &Path, shapes: &ShapeSelection) -> Self {
        let mut artifacts = Vec::new();
        for shape in shapes.iter() {
            for kind in EntityKind::ALL {
                if shape == Shape::Optimized
                    && EMBEDDINGS.iter().any(|embedding| embedding.child == kind)
                {
                    continue;
                }
                artifacts.push(PlannedArtifact {
                    shape,
                    kind,
                    path: artifact_path(out_dir, shape, kind),
                });
            }
        }
        Self {
            out_dir: out_dir.to_path_buf(),
            artifacts,
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn artifacts(&self) -> &[PlannedArtifact] {
        &self.artifacts
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.out_dir.join(MANIFEST_FILE)
    }

    pub fn path_for(&self, shape: Shape, kind: EntityKind) -> PathBuf {
        artifact_path(&self.out_dir, shape, kind)
    }

    /// Refuse to run when any planned file already exists and overwrite is off.
    pub fn guard(&self, overwrite: bool) -> Result<(), GenerationError> {
        if self.out_dir.exists() && !self.out_dir.is_dir() {
            return Err(GenerationError::InvalidConfiguration(format!(
                "output path '{}' is not a directory",
                self.out_dir.display()
            )));
        }
        if overwrite {
            return Ok(());
        }

        let manifest = self.manifest_path();
        let existing = self
            .artifacts
            .iter()
            .map(|artifact| artifact.path.as_path())
            .chain(std::iter::once(manifest.as_path()))
            .find(|path| path.exists());

        match existing {
            Some(path) => {
                warn!(path = %path.display(), "refusing to overwrite existing artifact");
                Err(GenerationError::DestinationConflict {
                    path: path.to_path_buf(),
                })
            }
            None => Ok(()),
        }
    }
}

pub fn artifact_path(out_dir: &Path, shape: Shape, kind: EntityKind) -> PathBuf {
    out_dir
        .join(shape.as_str())
        .join(format!("{}.{}", kind.name(), shape.file_extension()))
}
