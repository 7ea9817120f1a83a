use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use uuid::Uuid;

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("telcogen-cli-{}", Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn telcogen(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_telcogen"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run telcogen")
}

#[test]
fn generate_prints_output_directory() {
    let root = temp_dir();
    let out = root.join("run");
    let out_arg = out.to_string_lossy().to_string();

    let output = telcogen(&["generate", "--seed", "42", "--size", "small", "--out", &out_arg]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("out_dir={}", out.display()));
    assert!(out.join("manifest.json").is_file());
    assert!(out.join("relational").join("accounts.csv").is_file());

    fs::remove_dir_all(&root).ok();
}

#[test]
fn invalid_seed_exits_with_configuration_status() {
    let root = temp_dir();
    let out_arg = root.join("run").to_string_lossy().to_string();

    let output = telcogen(&["generate", "--seed", "abc", "--out", &out_arg]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(!root.join("run").join("manifest.json").exists());

    fs::remove_dir_all(&root).ok();
}

#[test]
fn existing_output_exits_with_conflict_status() {
    let root = temp_dir();
    let out_arg = root.join("run").to_string_lossy().to_string();

    let first = telcogen(&["generate", "--out", &out_arg, "--shapes", "canonical"]);
    assert!(first.status.success());

    let second = telcogen(&["generate", "--out", &out_arg, "--shapes", "canonical"]);
    assert_eq!(second.status.code(), Some(3));

    let forced = telcogen(&["generate", "--out", &out_arg, "--shapes", "canonical", "--overwrite"]);
    assert!(forced.status.success());

    fs::remove_dir_all(&root).ok();
}

#[test]
fn config_file_supplies_defaults() {
    let root = temp_dir();
    let out = root.join("from-config");
    let config = root.join("telcogen.toml");
    fs::write(
        &config,
        format!(
            "seed = 7\nsize = \"small\"\nout = {:?}\nshapes = [\"normalized\"]\n",
            out.to_string_lossy()
        ),
    )
    .expect("write config");
    let config_arg = config.to_string_lossy().to_string();

    let output = telcogen(&["generate", "--config", &config_arg]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(out.join("normalized").join("subscribers.jsonl").is_file());
    assert!(!out.join("canonical").exists());

    fs::remove_dir_all(&root).ok();
}

#[test]
fn project_rebuilds_shapes_from_canonical_files() {
    let root = temp_dir();
    let source = root.join("source");
    let target = root.join("target");
    let source_arg = source.to_string_lossy().to_string();
    let target_arg = target.to_string_lossy().to_string();

    let generated = telcogen(&["generate", "--seed", "11", "--out", &source_arg]);
    assert!(generated.status.success());

    let projected = telcogen(&[
        "project",
        "--from",
        &source_arg,
        "--out",
        &target_arg,
        "--shapes",
        "relational",
    ]);
    assert!(projected.status.success(), "{}", String::from_utf8_lossy(&projected.stderr));

    let original = fs::read(source.join("relational").join("usage_records.csv")).unwrap();
    let rebuilt = fs::read(target.join("relational").join("usage_records.csv")).unwrap();
    assert_eq!(original, rebuilt);

    fs::remove_dir_all(&root).ok();
}
