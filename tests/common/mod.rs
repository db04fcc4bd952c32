#![allow(dead_code)]

use std::fs;
use std::path::Path;

use yolotxt::{AnnotationStore, ClassConfig, StoreConfig};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Writes placeholder image files; only their names matter.
pub fn write_images(images_dir: &Path, names: &[&str]) {
    fs::create_dir_all(images_dir).expect("create images dir");
    for name in names {
        fs::write(images_dir.join(name), b"not really an image").expect("write image");
    }
}

pub fn write_label(labels_dir: &Path, basename: &str, content: &str) {
    fs::create_dir_all(labels_dir).expect("create labels dir");
    fs::write(labels_dir.join(format!("{basename}.txt")), content).expect("write label");
}

pub fn read_label(labels_dir: &Path, basename: &str) -> String {
    fs::read_to_string(labels_dir.join(format!("{basename}.txt"))).expect("read label")
}

/// Opens a store rooted at `root/images` + `root/labels`.
pub fn open_store(root: &Path, classes: Option<ClassConfig>) -> AnnotationStore {
    init_logging();
    let mut config = StoreConfig::new(root.join("images"), root.join("labels"));
    if let Some(classes) = classes {
        config = config.with_class_config(classes);
    }
    AnnotationStore::open(config).expect("open store")
}
