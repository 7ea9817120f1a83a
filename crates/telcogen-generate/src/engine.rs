use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use telcogen_core::{CanonicalDataset, Entity, EntityKind, EntityVisitor};

use crate::canonical::{ensure_integrity, generate_canonical};
use crate::errors::GenerationError;
use crate::manifest::{MANIFEST_FILE, Manifest, RunDescriptor};
use crate::model::{ArtifactReport, GenerateOptions, GenerationReport, Shape};
use crate::output::ArtifactPlan;
use crate::output::atomic::{AtomicFile, write_json_atomic};
use crate::output::csv::write_table_csv;
use crate::output::jsonl::write_jsonl;
use crate::output::read::{read_canonical, read_manifest};
use crate::shapes::document::{Collection, SyntheticIdCounter};
use crate::shapes::normalized::project_normalized;
use crate::shapes::optimized::project_optimized;
use crate::shapes::relational::{Table, project_relational};

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub out_dir: PathBuf,
    pub manifest: Manifest,
    pub report: GenerationReport,
}

/// Entry point for generating and projecting datasets.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate the canonical dataset and write every selected shape.
    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let run = RunDescriptor {
            seed: self.options.seed,
            size: self.options.size,
            preset: self.options.size.preset(),
            shapes: self.options.shapes.clone(),
        };
        let plan = ArtifactPlan::new(&self.options.out_dir, &run.shapes);
        plan.guard(self.options.overwrite)?;

        info!(
            seed = run.seed,
            size = %run.size,
            shapes = %run.shapes,
            out_dir = %self.options.out_dir.display(),
            "generation started"
        );

        let dataset = generate_canonical(run.seed, &run.preset)?;
        for kind in EntityKind::ALL {
            debug!(entity = %kind, rows = dataset.count(kind), "canonical rows");
        }

        self.emit(&plan, &run, &dataset, start)
    }

    /// Re-project the canonical files of a previous run found under `source`.
    ///
    /// Seed and size come from the source manifest, so the derived shapes are
    /// byte-identical to the ones a fresh run would write.
    pub fn run_from_canonical(&self, source: &Path) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let source_manifest = read_manifest(&source.join(MANIFEST_FILE))?;
        source_manifest.ensure_compatible()?;

        let run = RunDescriptor {
            seed: source_manifest.seed,
            size: source_manifest.size,
            preset: source_manifest.preset,
            shapes: self.options.shapes.clone(),
        };
        let plan = ArtifactPlan::new(&self.options.out_dir, &run.shapes);
        plan.guard(self.options.overwrite)?;

        info!(
            seed = run.seed,
            size = %run.size,
            shapes = %run.shapes,
            source = %source.display(),
            out_dir = %self.options.out_dir.display(),
            "projection from canonical started"
        );

        let dataset = read_canonical(&source.join(Shape::Canonical.as_str()))?;
        ensure_integrity(&dataset)?;
        ensure_counts_match(&dataset, &source_manifest, source)?;

        self.emit(&plan, &run, &dataset, start)
    }

    fn emit(
        &self,
        plan: &ArtifactPlan,
        run: &RunDescriptor,
        dataset: &CanonicalDataset,
        start: Instant,
    ) -> Result<GenerationResult, GenerationError> {
        let mut report = GenerationReport::default();

        let normalized = if run.shapes.needs_documents() {
            Some(project_normalized(dataset, &mut SyntheticIdCounter::new())?)
        } else {
            None
        };

        for shape in run.shapes.iter() {
            let shape_start = Instant::now();
            match shape {
                Shape::Canonical => {
                    let mut writer = CanonicalWriter {
                        plan,
                        report: &mut report,
                    };
                    dataset.visit(&mut writer)?;
                }
                Shape::Normalized => {
                    if let Some(normalized) = &normalized {
                        for collection in &normalized.collections {
                            write_collection(plan, shape, collection, &mut report)?;
                        }
                    }
                }
                Shape::Optimized => {
                    if let Some(normalized) = &normalized {
                        let optimized =
                            project_optimized(normalized, run.preset.embed_feature_codes)?;
                        for collection in &optimized.collections {
                            write_collection(plan, shape, collection, &mut report)?;
                        }
                    }
                }
                Shape::Relational => {
                    let relational = project_relational(dataset)?;
                    for table in &relational.tables {
                        write_table(plan, table, &mut report)?;
                    }
                }
            }
            info!(
                shape = %shape,
                files = report.artifacts_for(shape).count(),
                duration_ms = shape_start.elapsed().as_millis() as u64,
                "shape written"
            );
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        let manifest = Manifest::build(run, dataset, &report, plan.out_dir(), chrono::Utc::now())?;
        let manifest_path = plan.manifest_path();
        let manifest_bytes = write_json_atomic(&manifest_path, &manifest)?;
        report.bytes_written += manifest_bytes;

        info!(
            seed = run.seed,
            size = %run.size,
            files = report.artifacts.len() + 1,
            bytes = report.bytes_written,
            duration_ms = report.duration_ms,
            out_dir = %plan.out_dir().display(),
            "generation finished"
        );

        Ok(GenerationResult {
            out_dir: plan.out_dir().to_path_buf(),
            manifest,
            report,
        })
    }
}

/// The canonical files must hold exactly the rows the source manifest lists.
fn ensure_counts_match(
    dataset: &CanonicalDataset,
    manifest: &Manifest,
    source: &Path,
) -> Result<(), GenerationError> {
    for kind in EntityKind::ALL {
        let found = dataset.count(kind) as u64;
        let expected = manifest.counts.get(kind.name()).copied().unwrap_or(0);
        if found != expected {
            warn!(
                source = %source.display(),
                entity = %kind,
                expected,
                found,
                "canonical row count differs from the source manifest"
            );
            return Err(GenerationError::InvalidRecord(format!(
                "{}: {kind} has {found} canonical rows but the manifest lists {expected}",
                source.display()
            )));
        }
    }
    Ok(())
}

struct CanonicalWriter<'a> {
    plan: &'a ArtifactPlan,
    report: &'a mut GenerationReport,
}

impl EntityVisitor for CanonicalWriter<'_> {
    type Error = GenerationError;

    fn visit<E: Entity>(&mut self, rows: &[E]) -> Result<(), Self::Error> {
        let path = self.plan.path_for(Shape::Canonical, E::KIND);
        let mut file = AtomicFile::create(&path)?;
        let lines = write_jsonl(&mut file, rows).map_err(|err| GenerationError::write(&path, err))?;
        let bytes = file.commit()?;
        record(self.report, Shape::Canonical, E::KIND.name(), path, lines, bytes);
        Ok(())
    }
}

fn write_collection(
    plan: &ArtifactPlan,
    shape: Shape,
    collection: &Collection,
    report: &mut GenerationReport,
) -> Result<(), GenerationError> {
    let kind = EntityKind::from_name(&collection.name).ok_or_else(|| {
        GenerationError::Projection(format!("unknown collection '{}'", collection.name))
    })?;
    let path = plan.path_for(shape, kind);
    let mut file = AtomicFile::create(&path)?;
    let lines = write_jsonl(&mut file, &collection.documents)
        .map_err(|err| GenerationError::write(&path, err))?;
    let bytes = file.commit()?;
    record(report, shape, &collection.name, path, lines, bytes);
    Ok(())
}

fn write_table(
    plan: &ArtifactPlan,
    table: &Table,
    report: &mut GenerationReport,
) -> Result<(), GenerationError> {
    let path = plan.path_for(Shape::Relational, table.kind);
    let mut file = write_table_csv(AtomicFile::create(&path)?, table)?;
    file.flush().map_err(|err| GenerationError::write(&path, err))?;
    let bytes = file.commit()?;
    record(
        report,
        Shape::Relational,
        table.name(),
        path,
        table.rows.len() as u64,
        bytes,
    );
    Ok(())
}

fn record(
    report: &mut GenerationReport,
    shape: Shape,
    name: &str,
    path: PathBuf,
    rows: u64,
    bytes: u64,
) {
    debug!(shape = %shape, entity = name, rows, bytes, path = %path.display(), "artifact written");
    report.record(ArtifactReport {
        shape,
        name: name.to_string(),
        path,
        rows,
        bytes,
    });
}
