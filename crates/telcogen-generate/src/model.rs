use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use telcogen_core::SizeClass;

use crate::errors::GenerationError;

/// Output projection of the canonical dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Canonical,
    Normalized,
    Optimized,
    Relational,
}

impl Shape {
    pub const ALL: [Shape; 4] = [
        Shape::Canonical,
        Shape::Normalized,
        Shape::Optimized,
        Shape::Relational,
    ];

    /// Name of the shape and of its output directory.
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Canonical => "canonical",
            Shape::Normalized => "normalized",
            Shape::Optimized => "optimized",
            Shape::Relational => "relational",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            Shape::Relational => "csv",
            _ => "jsonl",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shape {
    type Err = GenerationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Shape::ALL
            .into_iter()
            .find(|shape| shape.as_str() == normalized)
            .ok_or_else(|| {
                GenerationError::InvalidConfiguration(format!(
                    "unknown shape '{value}' (expected canonical, normalized, optimized or relational)"
                ))
            })
    }
}

/// Non-empty set of shapes to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Shape>", into = "Vec<Shape>")]
pub struct ShapeSelection {
    shapes: BTreeSet<Shape>,
}

impl ShapeSelection {
    pub fn all() -> Self {
        Self {
            shapes: Shape::ALL.into_iter().collect(),
        }
    }

    pub fn only(shapes: impl IntoIterator<Item = Shape>) -> Result<Self, GenerationError> {
        let shapes: BTreeSet<Shape> = shapes.into_iter().collect();
        if shapes.is_empty() {
            return Err(GenerationError::InvalidConfiguration(
                "at least one shape must be selected".to_string(),
            ));
        }
        Ok(Self { shapes })
    }

    pub fn contains(&self, shape: Shape) -> bool {
        self.shapes.contains(&shape)
    }

    /// Selected shapes in output order.
    pub fn iter(&self) -> impl Iterator<Item = Shape> + '_ {
        self.shapes.iter().copied()
    }

    /// The optimized shape is derived from the normalized documents.
    pub fn needs_documents(&self) -> bool {
        self.contains(Shape::Normalized) || self.contains(Shape::Optimized)
    }
}

impl Default for ShapeSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl TryFrom<Vec<Shape>> for ShapeSelection {
    type Error = GenerationError;

    fn try_from(shapes: Vec<Shape>) -> Result<Self, Self::Error> {
        Self::only(shapes)
    }
}

impl From<ShapeSelection> for Vec<Shape> {
    fn from(selection: ShapeSelection) -> Self {
        selection.shapes.into_iter().collect()
    }
}

impl FromStr for ShapeSelection {
    type Err = GenerationError;

    /// `all`, or a comma-separated subset such as `canonical,relational`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }
        let shapes = value
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Shape>, _>>()?;
        Self::only(shapes)
    }
}

impl fmt::Display for ShapeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Shape::as_str).collect();
        f.write_str(&names.join(","))
    }
}

/// Parse a textual seed into the 32-bit seed space.
pub fn parse_seed(value: &str) -> Result<u32, GenerationError> {
    value.trim().parse::<u32>().map_err(|err| {
        GenerationError::InvalidConfiguration(format!(
            "seed '{value}' is not an unsigned 32-bit integer: {err}"
        ))
    })
}

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub seed: u32,
    pub size: SizeClass,
    /// Root directory for all artifacts.
    pub out_dir: PathBuf,
    pub shapes: ShapeSelection,
    /// Replace artifacts left by a previous run.
    pub overwrite: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            size: SizeClass::Small,
            out_dir: PathBuf::from("out"),
            shapes: ShapeSelection::all(),
            overwrite: false,
        }
    }
}

/// One written file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactReport {
    pub shape: Shape,
    pub name: String,
    pub path: PathBuf,
    pub rows: u64,
    pub bytes: u64,
}

/// Summary of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationReport {
    pub artifacts: Vec<ArtifactReport>,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn record(&mut self, artifact: ArtifactReport) {
        self.bytes_written += artifact.bytes;
        self.artifacts.push(artifact);
    }

    pub fn artifacts_for(&self, shape: Shape) -> impl Iterator<Item = &ArtifactReport> {
        self.artifacts
            .iter()
            .filter(move |artifact| artifact.shape == shape)
    }
}
