//! Explicit construction-time configuration for an [`AnnotationStore`].
//!
//! Nothing is derived from the process working directory: both directories
//! are always supplied by the caller, either in code or from a YAML file.
//!
//! [`AnnotationStore`]: crate::store::AnnotationStore

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::YoloTxtError;
use crate::record::LineFormat;
use crate::remap::ClassConfig;

/// Where a store finds images and label files, and what it knows about classes.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Directory of images; any extension.
    pub images_dir: PathBuf,
    /// Directory of `<basename>.txt` label files. Created on open.
    pub labels_dir: PathBuf,
    /// Ordered class universe, required before removing classes.
    pub class_config: Option<ClassConfig>,
    /// Float rendering for records the store writes.
    pub line_format: LineFormat,
}

impl StoreConfig {
    pub fn new(images_dir: impl Into<PathBuf>, labels_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
            labels_dir: labels_dir.into(),
            class_config: None,
            line_format: LineFormat::default(),
        }
    }

    pub fn with_class_config(mut self, class_config: ClassConfig) -> Self {
        self.class_config = Some(class_config);
        self
    }

    pub fn with_line_format(mut self, line_format: LineFormat) -> Self {
        self.line_format = line_format;
        self
    }

    /// Loads a config from YAML:
    ///
    /// ```yaml
    /// images_dir: images
    /// labels_dir: labels
    /// classes: [0, 1, 2]   # or `class_file: data.yaml`
    /// precision: 6         # optional
    /// ```
    ///
    /// Relative paths are resolved against the YAML file's directory.
    pub fn from_yaml_file(path: &Path) -> Result<Self, YoloTxtError> {
        let data = fs::read_to_string(path).map_err(YoloTxtError::Io)?;
        let parsed: StoreConfigFile =
            serde_yaml::from_str(&data).map_err(|source| YoloTxtError::DataYamlParse {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let class_config = match (parsed.classes, parsed.class_file) {
            (Some(classes), _) => Some(ClassConfig::new(classes)),
            (None, Some(class_file)) => Some(read_class_file(&base.join(class_file))?),
            (None, None) => None,
        };

        Ok(Self {
            images_dir: base.join(parsed.images_dir),
            labels_dir: base.join(parsed.labels_dir),
            class_config,
            line_format: LineFormat {
                precision: parsed.precision,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoreConfigFile {
    images_dir: PathBuf,
    labels_dir: PathBuf,
    #[serde(default)]
    classes: Option<Vec<u32>>,
    #[serde(default)]
    class_file: Option<PathBuf>,
    #[serde(default)]
    precision: Option<usize>,
}

/// Reads a class list from `data.yaml`/`*.yaml` or a `classes.txt`-style file.
fn read_class_file(path: &Path) -> Result<ClassConfig, YoloTxtError> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    if is_yaml {
        ClassConfig::from_data_yaml(path)
    } else {
        ClassConfig::from_classes_txt(path)
    }
}
