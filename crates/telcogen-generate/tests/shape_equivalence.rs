use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use telcogen_core::{EntityKind, Preset, SizeClass, Usage, rate_usage};
use telcogen_generate::generate_canonical;
use telcogen_generate::output::csv::write_table_csv;
use telcogen_generate::shapes::{
    DOCUMENT_ID_FIELD, SyntheticIdCounter, project_normalized, project_optimized,
    project_relational,
};
use telcogen_generate::{GenerateOptions, GenerationEngine, GenerationError};

fn temp_out_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("telcogen_{label}_{}", uuid::Uuid::new_v4()))
}

fn read_lines(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("missing {}", path.display()))
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect()
}

#[test]
fn normalized_documents_mirror_canonical_rows() {
    let dataset = generate_canonical(42, &Preset::for_size(SizeClass::Small)).expect("dataset");
    let normalized =
        project_normalized(&dataset, &mut SyntheticIdCounter::new()).expect("normalized");

    let subscribers = normalized.collection("subscribers").expect("subscribers");
    assert_eq!(subscribers.documents.len(), dataset.subscribers.len());
    for (document, row) in subscribers.documents.iter().zip(&dataset.subscribers) {
        assert_eq!(document[DOCUMENT_ID_FIELD], Value::from(row.subscriber_id));
        let mut fields = document.clone();
        fields.remove(DOCUMENT_ID_FIELD);
        assert_eq!(Value::Object(fields), serde_json::to_value(row).expect("row"));
    }

    let rates = normalized.collection("rates").expect("rates");
    let ids: Vec<i64> = rates
        .documents
        .iter()
        .map(|document| document[DOCUMENT_ID_FIELD].as_i64().expect("synthetic id"))
        .collect();
    assert_eq!(ids.first(), Some(&1));
    assert!(ids.windows(2).all(|pair| pair[1] == pair[0] + 1));
}

#[test]
fn optimized_embeddings_match_normalized_children() {
    let dataset = generate_canonical(9, &Preset::for_size(SizeClass::Medium)).expect("dataset");
    let normalized =
        project_normalized(&dataset, &mut SyntheticIdCounter::new()).expect("normalized");
    let optimized = project_optimized(&normalized, true).expect("optimized");

    let profiles: HashMap<i64, &serde_json::Map<String, Value>> = normalized
        .collection("subscriber_profiles")
        .expect("profiles")
        .documents
        .iter()
        .map(|document| (document["subscriber_id"].as_i64().unwrap(), document))
        .collect();

    let feature_codes: HashMap<i64, &str> = dataset
        .features
        .iter()
        .map(|feature| (feature.feature_id, feature.code.as_str()))
        .collect();

    for subscriber in &optimized.collection("subscribers").expect("subscribers").documents {
        let id = subscriber["subscriber_id"].as_i64().unwrap();
        let profile = subscriber["profile"].as_object().expect("profile");
        let source = profiles[&id];
        for (field, value) in profile {
            assert_eq!(&source[field], value, "profile field {field}");
        }
        assert_eq!(profile.len(), source.len() - 2);

        let mut expected: Vec<&str> = dataset
            .subscriber_features
            .iter()
            .filter(|row| row.subscriber_id == id)
            .map(|row| feature_codes[&row.feature_id])
            .collect();
        expected.sort_unstable();
        expected.dedup();
        let actual: Vec<&str> = subscriber["feature_codes"]
            .as_array()
            .expect("feature codes")
            .iter()
            .map(|code| code.as_str().unwrap())
            .collect();
        assert_eq!(actual, expected);
    }

    for order in &optimized.collection("orders").expect("orders").documents {
        let id = order["order_id"].as_i64().unwrap();
        let items = order["items"].as_array().expect("items");
        let expected: Vec<_> = dataset
            .order_items
            .iter()
            .filter(|item| item.order_id == id)
            .collect();
        assert_eq!(items.len(), expected.len());
        let mut total = 0;
        for (item, row) in items.iter().zip(expected) {
            assert_eq!(item["order_item_id"], Value::from(row.order_item_id));
            assert_eq!(item["sku"], Value::from(row.sku.clone()));
            total += item["quantity"].as_i64().unwrap() * item["unit_price_cents"].as_i64().unwrap();
        }
        assert_eq!(order["total_cents"], Value::from(total));
    }
}

#[test]
fn relational_tables_round_trip_through_a_csv_reader() {
    let dataset = generate_canonical(42, &Preset::for_size(SizeClass::Medium)).expect("dataset");
    let relational = project_relational(&dataset).expect("relational");

    for table in &relational.tables {
        let bytes = write_table_csv(Vec::new(), table).expect("write csv");
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes.as_slice());

        let headers: Vec<String> = reader
            .headers()
            .expect("headers")
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(headers, table.columns, "{}", table.name());

        let records: Vec<csv::StringRecord> = reader
            .records()
            .collect::<Result<_, _>>()
            .expect("records");
        assert_eq!(records.len(), table.rows.len(), "{}", table.name());
        for (record, row) in records.iter().zip(&table.rows) {
            for (decoded, cell) in record.iter().zip(row) {
                assert_eq!(decoded, cell.as_deref().unwrap_or(""), "{}", table.name());
            }
        }
    }
}

#[test]
fn awkward_text_survives_the_relational_shape() {
    let dataset = generate_canonical(5, &Preset::for_size(SizeClass::Medium)).expect("dataset");
    let relational = project_relational(&dataset).expect("relational");
    let notes = relational.table(EntityKind::Note).expect("notes");
    let body = notes.columns.iter().position(|c| *c == "body").unwrap();
    assert!(
        notes
            .rows
            .iter()
            .any(|row| row[body].as_deref().is_some_and(|text| text.contains('\n')))
    );

    let bytes = write_table_csv(Vec::new(), notes).expect("write csv");
    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let bodies: Vec<String> = reader
        .records()
        .map(|record| record.expect("record")[body].to_string())
        .collect();
    let expected: Vec<String> = dataset.notes.iter().map(|note| note.body.clone()).collect();
    assert_eq!(bodies, expected);
}

#[test]
fn usage_units_keep_their_meaning_in_every_shape() {
    let dataset = generate_canonical(42, &Preset::for_size(SizeClass::Small)).expect("dataset");
    let normalized =
        project_normalized(&dataset, &mut SyntheticIdCounter::new()).expect("normalized");
    let relational = project_relational(&dataset).expect("relational");
    let table = relational.table(EntityKind::UsageRecord).expect("usage table");
    let type_column = table.columns.iter().position(|c| *c == "usage_type").unwrap();
    let units_column = table.columns.iter().position(|c| *c == "units").unwrap();

    let documents = &normalized.collection("usage_records").expect("usage").documents;
    for ((row, document), cells) in dataset.usage_records.iter().zip(documents).zip(&table.rows) {
        let (kind, units) = match row.usage {
            Usage::Voice { seconds } => ("voice", seconds),
            Usage::Sms { messages } => ("sms", messages),
            Usage::Data { kilobytes } => ("data", kilobytes),
        };
        assert_eq!(document["usage_type"], kind);
        assert_eq!(document["units"], units);
        assert_eq!(cells[type_column].as_deref(), Some(kind));
        assert_eq!(cells[units_column], Some(units.to_string()));
        assert_eq!(row.rated_cents, rate_usage(row.usage));
    }
}

#[test]
fn projecting_from_canonical_files_is_idempotent() {
    let source = temp_out_dir("project_source");
    let target = temp_out_dir("project_target");

    GenerationEngine::new(GenerateOptions {
        seed: 42,
        out_dir: source.clone(),
        ..GenerateOptions::default()
    })
    .run()
    .expect("full run");

    let result = GenerationEngine::new(GenerateOptions {
        out_dir: target.clone(),
        shapes: "normalized,optimized,relational".parse().expect("shapes"),
        ..GenerateOptions::default()
    })
    .run_from_canonical(&source)
    .expect("projection run");
    assert_eq!(result.manifest.seed, 42);

    for shape in ["normalized", "optimized", "relational"] {
        for entry in fs::read_dir(source.join(shape)).expect("read dir") {
            let path = entry.expect("entry").path();
            let name = path.file_name().unwrap().to_owned();
            let regenerated = fs::read(target.join(shape).join(&name)).expect("regenerated");
            assert_eq!(fs::read(&path).expect("original"), regenerated, "{shape}/{name:?}");
        }
    }
    assert_eq!(
        read_lines(&source.join("canonical/notes.jsonl")).len() as u64,
        result.manifest.counts["notes"]
    );

    let _ = fs::remove_dir_all(source);
    let _ = fs::remove_dir_all(target);
}

#[test]
fn unknown_event_type_in_canonical_input_is_rejected() {
    let source = temp_out_dir("bad_source");
    let target = temp_out_dir("bad_target");
    GenerationEngine::new(GenerateOptions {
        out_dir: source.clone(),
        shapes: "canonical".parse().expect("shapes"),
        ..GenerateOptions::default()
    })
    .run()
    .expect("canonical run");

    let events_path = source.join("canonical/device_events.jsonl");
    let mut events = read_lines(&events_path);
    events[0]["event_type"] = Value::from("teleport");
    let text: String = events
        .iter()
        .map(|event| format!("{event}\n"))
        .collect();
    fs::write(&events_path, text).expect("rewrite events");

    let err = GenerationEngine::new(GenerateOptions {
        out_dir: target.clone(),
        shapes: "relational".parse().expect("shapes"),
        ..GenerateOptions::default()
    })
    .run_from_canonical(&source)
    .expect_err("bad record");
    assert!(matches!(err, GenerationError::InvalidRecord(_)), "{err}");
    assert!(!target.join("manifest.json").exists());

    let _ = fs::remove_dir_all(source);
    let _ = fs::remove_dir_all(target);
}

#[test]
fn truncated_canonical_input_is_rejected() {
    let source = temp_out_dir("short_source");
    let target = temp_out_dir("short_target");
    GenerationEngine::new(GenerateOptions {
        out_dir: source.clone(),
        shapes: "canonical".parse().expect("shapes"),
        ..GenerateOptions::default()
    })
    .run()
    .expect("canonical run");

    let usage_path = source.join("canonical/usage_records.jsonl");
    let kept: String = fs::read_to_string(&usage_path)
        .expect("usage records")
        .lines()
        .skip(10)
        .map(|line| format!("{line}\n"))
        .collect();
    fs::write(&usage_path, kept).expect("rewrite usage records");

    let err = GenerationEngine::new(GenerateOptions {
        out_dir: target.clone(),
        shapes: "relational".parse().expect("shapes"),
        ..GenerateOptions::default()
    })
    .run_from_canonical(&source)
    .expect_err("row counts differ from the manifest");
    match &err {
        GenerationError::InvalidRecord(message) => {
            assert!(message.contains("usage_records"), "{message}")
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!target.join("manifest.json").exists());
    assert!(!target.join("relational").exists());

    let _ = fs::remove_dir_all(source);
    let _ = fs::remove_dir_all(target);
}
