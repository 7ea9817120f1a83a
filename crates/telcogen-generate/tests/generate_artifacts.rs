use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use telcogen_core::{EntityKind, SizeClass};
use telcogen_generate::{GenerateOptions, GenerationEngine, GenerationError, Shape, ShapeSelection};

fn temp_out_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("telcogen_{label}_{}", uuid::Uuid::new_v4()))
}

fn options(out_dir: &Path, seed: u32, size: SizeClass) -> GenerateOptions {
    GenerateOptions {
        seed,
        size,
        out_dir: out_dir.to_path_buf(),
        ..GenerateOptions::default()
    }
}

fn hash_file(path: &Path) -> Result<String, std::io::Error> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0_u8; 8192];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Digest of every artifact below `root`, keyed by relative path. The
/// manifest is compared separately because it carries a wall-clock stamp.
fn artifact_digests(root: &Path) -> BTreeMap<String, String> {
    let mut digests = BTreeMap::new();
    for shape in Shape::ALL {
        let dir = root.join(shape.as_str());
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries {
            let path = entry.expect("dir entry").path();
            let name = format!(
                "{}/{}",
                shape.as_str(),
                path.file_name().unwrap().to_string_lossy()
            );
            digests.insert(name, hash_file(&path).expect("hash artifact"));
        }
    }
    digests
}

fn manifest_without_timestamp(root: &Path) -> serde_json::Value {
    let text = fs::read_to_string(root.join("manifest.json")).expect("read manifest");
    let mut manifest: serde_json::Value = serde_json::from_str(&text).expect("parse manifest");
    manifest
        .as_object_mut()
        .expect("manifest object")
        .remove("generated_at");
    manifest
}

#[test]
fn same_seed_and_size_are_byte_identical() {
    let out_a = temp_out_dir("determinism_a");
    let out_b = temp_out_dir("determinism_b");

    GenerationEngine::new(options(&out_a, 42, SizeClass::Small))
        .run()
        .expect("run A");
    GenerationEngine::new(options(&out_b, 42, SizeClass::Small))
        .run()
        .expect("run B");

    let digests_a = artifact_digests(&out_a);
    let digests_b = artifact_digests(&out_b);
    assert_eq!(digests_a.len(), 19 * 3 + 17);
    assert_eq!(digests_a, digests_b);
    assert_eq!(
        manifest_without_timestamp(&out_a),
        manifest_without_timestamp(&out_b)
    );

    let _ = fs::remove_dir_all(out_a);
    let _ = fs::remove_dir_all(out_b);
}

#[test]
fn different_seeds_change_the_content() {
    let out_a = temp_out_dir("seed_a");
    let out_b = temp_out_dir("seed_b");

    GenerationEngine::new(options(&out_a, 1, SizeClass::Small))
        .run()
        .expect("run A");
    GenerationEngine::new(options(&out_b, 2, SizeClass::Small))
        .run()
        .expect("run B");

    let accounts_a = fs::read(out_a.join("canonical/accounts.jsonl")).expect("accounts A");
    let accounts_b = fs::read(out_b.join("canonical/accounts.jsonl")).expect("accounts B");
    assert_ne!(accounts_a, accounts_b);

    let regions_a = fs::read(out_a.join("canonical/regions.jsonl")).expect("regions A");
    let regions_b = fs::read(out_b.join("canonical/regions.jsonl")).expect("regions B");
    assert_eq!(regions_a, regions_b, "reference catalogs do not depend on the seed");

    let _ = fs::remove_dir_all(out_a);
    let _ = fs::remove_dir_all(out_b);
}

#[test]
fn small_seed_42_scenario() {
    let out_dir = temp_out_dir("scenario");
    let result = GenerationEngine::new(options(&out_dir, 42, SizeClass::Small))
        .run()
        .expect("run generation");

    assert_eq!(result.manifest.counts["accounts"], 3);
    assert_eq!(result.manifest.counts["subscribers"], 6);
    assert_eq!(result.manifest.counts["subscriber_profiles"], 6);
    assert_eq!(result.manifest.counts["devices"], 6);
    assert_eq!(result.manifest.counts["usage_records"], 6 * 8);
    assert_eq!(result.manifest.seed, 42);
    assert_eq!(result.manifest.size, SizeClass::Small);

    let on_disk: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(out_dir.join("manifest.json")).expect("read manifest"),
    )
    .expect("parse manifest");
    assert_eq!(on_disk["counts"]["accounts"], 3);
    assert_eq!(on_disk["counts"]["subscribers"], 6);
    assert_eq!(on_disk["dataset_version"], "1");

    let accounts = fs::read_to_string(out_dir.join("canonical/accounts.jsonl")).expect("accounts");
    assert_eq!(accounts.lines().count(), 3);
    let subscribers_csv =
        fs::read_to_string(out_dir.join("relational/subscribers.csv")).expect("subscribers csv");
    assert_eq!(subscribers_csv.lines().count(), 7);

    let _ = fs::remove_dir_all(out_dir);
}

#[test]
fn existing_artifacts_block_the_run_without_overwrite() {
    let out_dir = temp_out_dir("conflict");
    fs::create_dir_all(out_dir.join("relational")).expect("create dir");
    fs::write(out_dir.join("relational/notes.csv"), "stale").expect("seed file");

    let err = GenerationEngine::new(options(&out_dir, 42, SizeClass::Small))
        .run()
        .expect_err("conflict expected");
    match err {
        GenerationError::DestinationConflict { path } => {
            assert!(path.ends_with("relational/notes.csv"));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(!out_dir.join("manifest.json").exists());
    assert!(!out_dir.join("canonical").exists());
    assert_eq!(
        fs::read_to_string(out_dir.join("relational/notes.csv")).expect("stale file"),
        "stale"
    );

    let mut overwrite = options(&out_dir, 42, SizeClass::Small);
    overwrite.overwrite = true;
    GenerationEngine::new(overwrite).run().expect("overwrite run");
    let notes = fs::read_to_string(out_dir.join("relational/notes.csv")).expect("notes");
    assert!(notes.starts_with("note_id,ref_type,ref_id,author,body,created_at\n"));

    let _ = fs::remove_dir_all(out_dir);
}

#[test]
fn second_run_into_same_directory_conflicts_on_manifest_or_artifacts() {
    let out_dir = temp_out_dir("rerun");
    GenerationEngine::new(options(&out_dir, 42, SizeClass::Small))
        .run()
        .expect("first run");
    let err = GenerationEngine::new(options(&out_dir, 42, SizeClass::Small))
        .run()
        .expect_err("second run must not overwrite");
    assert!(matches!(err, GenerationError::DestinationConflict { .. }));

    let _ = fs::remove_dir_all(out_dir);
}

#[test]
fn only_selected_shapes_are_written() {
    let out_dir = temp_out_dir("subset");
    let mut opts = options(&out_dir, 7, SizeClass::Small);
    opts.shapes = "relational".parse::<ShapeSelection>().expect("shape list");
    let result = GenerationEngine::new(opts).run().expect("run generation");

    assert!(out_dir.join("relational").is_dir());
    assert!(!out_dir.join("canonical").exists());
    assert!(!out_dir.join("normalized").exists());
    assert!(!out_dir.join("optimized").exists());
    assert!(out_dir.join("manifest.json").is_file());
    assert_eq!(result.report.artifacts.len(), EntityKind::ALL.len());
    assert_eq!(
        result.report.artifacts_for(Shape::Relational).count(),
        EntityKind::ALL.len()
    );
    assert_eq!(result.report.artifacts_for(Shape::Canonical).count(), 0);
    assert_eq!(result.manifest.counts["accounts"], 3);

    let _ = fs::remove_dir_all(out_dir);
}

#[test]
fn optimized_shape_omits_folded_collections() {
    let out_dir = temp_out_dir("optimized");
    let mut opts = options(&out_dir, 42, SizeClass::Small);
    opts.shapes = "optimized".parse().expect("shape list");
    GenerationEngine::new(opts).run().expect("run generation");

    assert!(!out_dir.join("optimized/subscriber_profiles.jsonl").exists());
    assert!(!out_dir.join("optimized/order_items.jsonl").exists());
    let subscribers =
        fs::read_to_string(out_dir.join("optimized/subscribers.jsonl")).expect("subscribers");
    for line in subscribers.lines() {
        let document: serde_json::Value = serde_json::from_str(line).expect("document");
        assert!(document["profile"].is_object());
        assert!(document["feature_codes"].is_array());
        assert!(document["_id"].is_i64());
    }

    let _ = fs::remove_dir_all(out_dir);
}

#[test]
fn no_temporary_files_remain() {
    let out_dir = temp_out_dir("tmpfiles");
    GenerationEngine::new(options(&out_dir, 3, SizeClass::Small))
        .run()
        .expect("run generation");
    for shape in Shape::ALL {
        for entry in fs::read_dir(out_dir.join(shape.as_str())).expect("read dir") {
            let name = entry.expect("entry").file_name();
            assert!(!name.to_string_lossy().ends_with(".tmp"));
        }
    }
    let _ = fs::remove_dir_all(out_dir);
}
