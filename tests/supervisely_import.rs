//! Integration tests for Supervisely JSON import.

use std::fs;
use std::path::Path;

use yolotxt::{
    ClassConfig, ErrorKind, Filter, ImportSummary, LineFormat, SourceClassMap, StoreConfig,
    SuperviselyImporter, YoloTxtError,
};

mod common;
use common::{init_logging, open_store, read_label, write_images};

fn write_json(dir: &Path, name: &str, content: &str) {
    fs::create_dir_all(dir).expect("create json dir");
    fs::write(dir.join(name), content).expect("write json");
}

fn sample_json(class_id: i64, exterior: &str) -> String {
    format!(
        r#"{{"size": {{"width": 10, "height": 10}},
            "objects": [{{"classId": {class_id}, "points": {{"exterior": {exterior}}}}}]}}"#
    )
}

#[test]
fn imports_single_rectangle() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let json_dir = temp.path().join("ann");
    write_json(&json_dir, "img.jpg.json", &sample_json(5, "[[1, 1], [9, 9]]"));

    let store = open_store(temp.path(), None);
    let importer =
        SuperviselyImporter::new(&json_dir, SourceClassMap::from_iter([(5, 0u32)]), store);

    let summary = importer.import(&Filter::all()).expect("import");
    assert_eq!(
        summary,
        ImportSummary {
            files: 1,
            records: 1
        }
    );

    let written = read_label(importer.store().labels_dir(), "img");
    let tokens: Vec<&str> = written.split_whitespace().collect();
    assert_eq!(tokens[0], "0");
    let values: Vec<f64> = tokens[1..]
        .iter()
        .map(|t| t.parse().expect("float"))
        .collect();
    for (got, want) in values.iter().zip([0.5, 0.5, 0.8, 0.8]) {
        assert!((got - want).abs() < 1e-12, "{got} != {want}");
    }
    assert_eq!(written, "0 0.5 0.5 0.8 0.8\n");
}

#[test]
fn import_preserves_object_order_and_overwrites_existing_labels() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let json_dir = temp.path().join("ann");
    write_json(
        &json_dir,
        "scene.json",
        r#"{"size": {"width": 200, "height": 100},
            "objects": [
                {"classId": 20, "points": {"exterior": [[0, 0], [100, 50]]}},
                {"classId": 10, "points": {"exterior": [[100, 50], [200, 100]]}}
            ]}"#,
    );

    let store = open_store(temp.path(), None);
    fs::write(store.label_path("scene"), "9 0.9 0.9 0.9 0.9\n").expect("write stale label");

    let class_map = SourceClassMap::from_iter([(10, 0u32), (20, 1u32)]);
    let importer = SuperviselyImporter::new(&json_dir, class_map, store);
    importer.import(&Filter::all()).expect("import");

    let records = importer.store().read_records("scene").expect("read records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].class_id.as_u32(), 1);
    assert_eq!(records[0].bbox.to_tuple(), (0.25, 0.25, 0.5, 0.5));
    assert_eq!(records[1].class_id.as_u32(), 0);
    assert_eq!(records[1].bbox.to_tuple(), (0.75, 0.75, 0.5, 0.5));
}

#[test]
fn import_with_fixed_precision() {
    init_logging();
    let temp = tempfile::tempdir().expect("create temp dir");
    let json_dir = temp.path().join("ann");
    write_json(&json_dir, "img.json", &sample_json(1, "[[0, 0], [3, 3]]"));

    let config = StoreConfig::new(temp.path().join("images"), temp.path().join("labels"))
        .with_line_format(LineFormat::fixed(6));
    let store = yolotxt::AnnotationStore::open(config).expect("open store");
    let importer = SuperviselyImporter::new(&json_dir, SourceClassMap::from_iter([(1, 0u32)]), store);
    importer.import(&Filter::all()).expect("import");

    assert_eq!(
        read_label(importer.store().labels_dir(), "img"),
        "0 0.150000 0.150000 0.300000 0.300000\n"
    );
}

#[test]
fn import_filter_selects_json_by_base_name() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let json_dir = temp.path().join("ann");
    write_json(&json_dir, "a.jpg.json", &sample_json(5, "[[1, 1], [9, 9]]"));
    write_json(&json_dir, "b.jpg.json", &sample_json(5, "[[1, 1], [9, 9]]"));
    fs::write(json_dir.join("meta.txt"), "not json").expect("write stray file");

    let store = open_store(temp.path(), None);
    let importer =
        SuperviselyImporter::new(&json_dir, SourceClassMap::from_iter([(5, 0u32)]), store);

    let summary = importer.import(&Filter::exact("b")).expect("import");
    assert_eq!(summary.files, 1);
    assert!(!importer.store().label_path("a").exists());
    assert!(importer.store().label_path("b").exists());
}

#[test]
fn unmapped_source_class_is_lookup_error() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let json_dir = temp.path().join("ann");
    write_json(&json_dir, "img.json", &sample_json(42, "[[1, 1], [9, 9]]"));

    let store = open_store(temp.path(), None);
    let importer =
        SuperviselyImporter::new(&json_dir, SourceClassMap::from_iter([(5, 0u32)]), store);

    let err = importer.import(&Filter::all()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
    assert!(matches!(
        err,
        YoloTxtError::SourceClassNotMapped { class_id: 42, .. }
    ));
    assert!(!importer.store().label_path("img").exists());
}

#[test]
fn malformed_json_is_parse_error() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let json_dir = temp.path().join("ann");
    write_json(&json_dir, "img.json", r#"{"objects": []}"#);

    let store = open_store(temp.path(), None);
    let importer = SuperviselyImporter::new(&json_dir, SourceClassMap::new(), store);

    let err = importer.import(&Filter::all()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn image_without_objects_gets_empty_label() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let json_dir = temp.path().join("ann");
    write_json(
        &json_dir,
        "empty.png.json",
        r#"{"size": {"width": 4, "height": 4}, "objects": []}"#,
    );

    let store = open_store(temp.path(), None);
    let importer = SuperviselyImporter::new(&json_dir, SourceClassMap::new(), store);
    let summary = importer.import(&Filter::all()).expect("import");

    assert_eq!(summary.records, 0);
    assert_eq!(read_label(importer.store().labels_dir(), "empty"), "");
}

#[test]
fn importer_exposes_store_operations() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let json_dir = temp.path().join("ann");
    write_json(
        &json_dir,
        "a.jpg.json",
        r#"{"size": {"width": 10, "height": 10},
            "objects": [
                {"classId": 1, "points": {"exterior": [[0, 0], [5, 5]]}},
                {"classId": 2, "points": {"exterior": [[5, 5], [10, 10]]}}
            ]}"#,
    );
    let store = open_store(temp.path(), None);
    write_images(store.images_dir(), &["a.jpg", "b.jpg"]);

    let class_map = SourceClassMap::from_iter([(1, 0u32), (2, 1u32)]);
    let mut importer = SuperviselyImporter::new(&json_dir, class_map, store);
    importer.import(&Filter::all()).expect("import");

    let store = importer.store_mut();
    store.set_class_config(ClassConfig::sequential(2));
    assert_eq!(store.backfill_missing(&Filter::all()).expect("backfill"), 1);
    store.remove_classes([0u32], &Filter::all()).expect("remove");

    let store = importer.into_store();
    assert_eq!(read_label(store.labels_dir(), "a"), "0 0.75 0.75 0.5 0.5\n");
    assert_eq!(read_label(store.labels_dir(), "b"), "");
}
