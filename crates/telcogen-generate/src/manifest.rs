//! Run manifest: what was generated and how the shapes relate.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use telcogen_core::{CanonicalDataset, DATASET_VERSION, EntityKind, Preset, SizeClass, UsageType};

use crate::errors::GenerationError;
use crate::model::{GenerationReport, Shape, ShapeSelection};
use crate::shapes::document::{DOCUMENT_ID_FIELD, IdStrategy};
use crate::shapes::optimized::{EMBEDDINGS, FEATURE_CODES_FIELD};
use crate::shapes::relational::{STRUCTURED_COLUMNS, load_order};

pub const MANIFEST_FORMAT: &str = "telcogen.manifest";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Inputs that identify a run.
#[derive(Debug, Clone)]
pub struct RunDescriptor {
    pub seed: u32,
    pub size: SizeClass,
    pub preset: Preset,
    pub shapes: ShapeSelection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub format: String,
    pub dataset_version: String,
    pub generator_version: String,
    /// Wall-clock time of the run. Informational only.
    pub generated_at: String,
    pub seed: u32,
    pub size: SizeClass,
    pub preset: Preset,
    pub shapes: ShapeSelection,
    /// Canonical row counts per entity.
    pub counts: BTreeMap<String, u64>,
    pub artifacts: Vec<ManifestArtifact>,
    pub equivalence: EquivalenceRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestArtifact {
    pub shape: Shape,
    pub name: String,
    /// Path relative to the output root, `/`-separated.
    pub path: String,
    pub rows: u64,
    pub bytes: u64,
}

/// Declarative mapping between the canonical, document and relational shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquivalenceRules {
    pub document_id_field: String,
    pub id_strategies: BTreeMap<String, IdRule>,
    pub synthetic_ids: String,
    pub embedded: Vec<EmbeddingRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_codes: Option<FeatureCodesRule>,
    pub usage_units: BTreeMap<String, String>,
    pub usage_pricing: BTreeMap<String, String>,
    pub relational: RelationalRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdRule {
    pub strategy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRule {
    pub collection: String,
    pub into: String,
    pub field: String,
    pub join: String,
    pub fields: Vec<String>,
    pub many: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCodesRule {
    pub collection: String,
    pub field: String,
    pub source: String,
    pub order: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationalRules {
    pub delimiter: String,
    pub quote: String,
    pub escape: String,
    pub null: String,
    pub header: bool,
    pub structured_columns: Vec<String>,
    pub load_order: Vec<String>,
}

impl Manifest {
    /// Describe a finished run. Derived only from already computed outputs.
    pub fn build(
        run: &RunDescriptor,
        dataset: &CanonicalDataset,
        report: &GenerationReport,
        out_dir: &Path,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, GenerationError> {
        let artifacts = report
            .artifacts
            .iter()
            .map(|artifact| ManifestArtifact {
                shape: artifact.shape,
                name: artifact.name.clone(),
                path: relative_path(out_dir, &artifact.path),
                rows: artifact.rows,
                bytes: artifact.bytes,
            })
            .collect();

        Ok(Self {
            format: MANIFEST_FORMAT.to_string(),
            dataset_version: DATASET_VERSION.to_string(),
            generator_version: GENERATOR_VERSION.to_string(),
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            seed: run.seed,
            size: run.size,
            preset: run.preset,
            shapes: run.shapes.clone(),
            counts: dataset.counts(),
            artifacts,
            equivalence: EquivalenceRules::for_preset(&run.preset)?,
        })
    }

    /// Reject manifests this build cannot reproduce.
    pub fn ensure_compatible(&self) -> Result<(), GenerationError> {
        if self.format != MANIFEST_FORMAT {
            return Err(GenerationError::InvalidConfiguration(format!(
                "unsupported manifest format '{}'",
                self.format
            )));
        }
        if self.dataset_version != DATASET_VERSION {
            return Err(GenerationError::InvalidConfiguration(format!(
                "dataset version {} cannot be re-projected by version {DATASET_VERSION}",
                self.dataset_version
            )));
        }
        if self.preset != self.size.preset() {
            return Err(GenerationError::InvalidConfiguration(format!(
                "manifest preset does not match size class {}",
                self.size
            )));
        }
        Ok(())
    }
}

impl EquivalenceRules {
    pub fn for_preset(preset: &Preset) -> Result<Self, GenerationError> {
        let id_strategies = EntityKind::ALL
            .into_iter()
            .map(|kind| {
                let rule = match IdStrategy::for_kind(kind) {
                    IdStrategy::PrimaryKey { field } => IdRule {
                        strategy: "primary_key".to_string(),
                        field: Some(field.to_string()),
                    },
                    IdStrategy::NaturalCode { field } => IdRule {
                        strategy: "natural_code".to_string(),
                        field: Some(field.to_string()),
                    },
                    IdStrategy::Synthetic => IdRule {
                        strategy: "synthetic".to_string(),
                        field: None,
                    },
                };
                (kind.name().to_string(), rule)
            })
            .collect();

        let embedded = EMBEDDINGS
            .iter()
            .map(|embedding| EmbeddingRule {
                collection: embedding.child.name().to_string(),
                into: embedding.parent.name().to_string(),
                field: embedding.field.to_string(),
                join: embedding.join.to_string(),
                fields: embedding.fields.iter().map(|field| field.to_string()).collect(),
                many: embedding.many,
            })
            .collect();

        let feature_codes = preset.embed_feature_codes.then(|| FeatureCodesRule {
            collection: EntityKind::Subscriber.name().to_string(),
            field: FEATURE_CODES_FIELD.to_string(),
            source: "subscriber_features.feature_id -> features.code".to_string(),
            order: "ascending, distinct".to_string(),
        });

        let usage_units = [UsageType::Voice, UsageType::Sms, UsageType::Data]
            .into_iter()
            .map(|kind| (kind.as_str().to_string(), kind.unit_name().to_string()))
            .collect();
        let usage_pricing = BTreeMap::from([
            (
                "voice".to_string(),
                "4 cents per started 60 seconds".to_string(),
            ),
            ("sms".to_string(), "0 cents".to_string()),
            (
                "data".to_string(),
                "2 cents per started 1024 kilobytes".to_string(),
            ),
        ]);

        let relational = RelationalRules {
            delimiter: ",".to_string(),
            quote: "\"".to_string(),
            escape: "fields containing delimiter, quote or line break are quoted; quotes are doubled"
                .to_string(),
            null: "empty field".to_string(),
            header: true,
            structured_columns: STRUCTURED_COLUMNS
                .iter()
                .map(|(kind, column)| format!("{kind}.{column}"))
                .collect(),
            load_order: load_order()?
                .into_iter()
                .map(|kind| kind.name().to_string())
                .collect(),
        };

        Ok(Self {
            document_id_field: DOCUMENT_ID_FIELD.to_string(),
            id_strategies,
            synthetic_ids: "one counter per run starting at 1, assigned in collection then row order"
                .to_string(),
            embedded,
            feature_codes,
            usage_units,
            usage_pricing,
            relational,
        })
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::generate_canonical;
    use chrono::TimeZone;

    fn run() -> RunDescriptor {
        RunDescriptor {
            seed: 42,
            size: SizeClass::Small,
            preset: SizeClass::Small.preset(),
            shapes: ShapeSelection::all(),
        }
    }

    #[test]
    fn counts_come_from_the_canonical_dataset() {
        let run = run();
        let dataset = generate_canonical(run.seed, &run.preset).unwrap();
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let manifest =
            Manifest::build(&run, &dataset, &GenerationReport::default(), Path::new("out"), at)
                .unwrap();

        assert_eq!(manifest.counts["accounts"], 3);
        assert_eq!(manifest.counts["subscribers"], 6);
        assert_eq!(manifest.generated_at, "2026-01-02T03:04:05Z");
        assert!(manifest.ensure_compatible().is_ok());
    }

    #[test]
    fn equivalence_rules_describe_the_projections() {
        let rules = EquivalenceRules::for_preset(&SizeClass::Small.preset()).unwrap();
        assert_eq!(rules.id_strategies["rates"].strategy, "synthetic");
        assert_eq!(
            rules.id_strategies["ticket_status_codes"].field.as_deref(),
            Some("code")
        );
        assert_eq!(rules.usage_units["data"], "kilobytes");
        assert!(rules.feature_codes.is_some());
        assert_eq!(rules.relational.load_order.len(), EntityKind::ALL.len());

        let large = EquivalenceRules::for_preset(&SizeClass::Large.preset()).unwrap();
        assert!(large.feature_codes.is_none());
    }

    #[test]
    fn artifact_paths_are_relative() {
        assert_eq!(
            relative_path(Path::new("/tmp/out"), Path::new("/tmp/out/relational/notes.csv")),
            "relational/notes.csv"
        );
    }
}
