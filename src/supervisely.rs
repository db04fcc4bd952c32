//! Supervisely JSON to YOLO label conversion.
//!
//! Each Supervisely annotation file describes one image:
//!
//! ```json
//! {
//!   "size": {"width": 10, "height": 10},
//!   "objects": [{"classId": 5, "points": {"exterior": [[1, 1], [9, 9]]}}]
//! }
//! ```
//!
//! Only the first and last exterior points are read: they are taken as the
//! top-left and bottom-right corners of the box. Rectangles exported by
//! Supervisely satisfy this; arbitrary polygons produce wrong boxes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;

use crate::error::YoloTxtError;
use crate::files::{self, Filter};
use crate::geometry::{BBoxXYXY, Pixel};
use crate::ids::ClassId;
use crate::record::AnnotationRecord;
use crate::store::AnnotationStore;

pub const JSON_EXTENSION: &str = "json";

/// Maps Supervisely `classId` values to YOLO class ids. Must cover every
/// class that appears in the imported files.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceClassMap {
    map: BTreeMap<i64, ClassId>,
}

impl SourceClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: i64, target: impl Into<ClassId>) {
        self.map.insert(source, target.into());
    }

    pub fn get(&self, source: i64) -> Option<ClassId> {
        self.map.get(&source).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Loads a YAML mapping of `source_class_id: yolo_class_id`.
    pub fn from_yaml_file(path: &Path) -> Result<Self, YoloTxtError> {
        let data = fs::read_to_string(path).map_err(YoloTxtError::Io)?;
        let map: BTreeMap<i64, u32> =
            serde_yaml::from_str(&data).map_err(|source| YoloTxtError::DataYamlParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(map.into_iter().collect())
    }
}

impl<T: Into<ClassId>> FromIterator<(i64, T)> for SourceClassMap {
    fn from_iter<I: IntoIterator<Item = (i64, T)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(source, target)| (source, target.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SlyAnnotation {
    size: SlySize,
    #[serde(default)]
    objects: Vec<SlyObject>,
}

#[derive(Debug, Deserialize)]
struct SlySize {
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlyObject {
    class_id: i64,
    points: SlyPoints,
}

#[derive(Debug, Deserialize)]
struct SlyPoints {
    exterior: Vec<[f64; 2]>,
}

/// Parses one Supervisely annotation and converts its objects to records,
/// in object order.
///
/// `path` is only used for error context.
pub fn parse_supervisely_slice(
    data: &[u8],
    path: &Path,
    class_map: &SourceClassMap,
) -> Result<Vec<AnnotationRecord>, YoloTxtError> {
    let annotation: SlyAnnotation =
        serde_json::from_slice(data).map_err(|source| YoloTxtError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    convert_annotation(&annotation, path, class_map)
}

fn convert_annotation(
    annotation: &SlyAnnotation,
    path: &Path,
    class_map: &SourceClassMap,
) -> Result<Vec<AnnotationRecord>, YoloTxtError> {
    let (width, height) = (annotation.size.width, annotation.size.height);
    let mut records = Vec::with_capacity(annotation.objects.len());

    for (index, object) in annotation.objects.iter().enumerate() {
        let (Some(first), Some(last)) = (
            object.points.exterior.first(),
            object.points.exterior.last(),
        ) else {
            return Err(YoloTxtError::JsonShape {
                path: path.to_path_buf(),
                message: format!("object {index} has no exterior points"),
            });
        };

        let bbox = BBoxXYXY::<Pixel>::from_xyxy(first[0], first[1], last[0], last[1])
            .to_normalized(width as f64, height as f64);

        let class_id =
            class_map
                .get(object.class_id)
                .ok_or_else(|| YoloTxtError::SourceClassNotMapped {
                    path: path.to_path_buf(),
                    class_id: object.class_id,
                })?;

        records.push(AnnotationRecord { class_id, bbox });
    }

    Ok(records)
}

/// Totals from one [`SuperviselyImporter::import`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub files: usize,
    pub records: usize,
}

/// Converts a directory of Supervisely JSON files into an [`AnnotationStore`].
///
/// The importer owns the store it writes to; every store operation stays
/// available through [`store`](Self::store) and [`store_mut`](Self::store_mut).
#[derive(Debug)]
pub struct SuperviselyImporter {
    json_dir: PathBuf,
    class_map: SourceClassMap,
    store: AnnotationStore,
}

impl SuperviselyImporter {
    pub fn new(
        json_dir: impl Into<PathBuf>,
        class_map: SourceClassMap,
        store: AnnotationStore,
    ) -> Self {
        Self {
            json_dir: json_dir.into(),
            class_map,
            store,
        }
    }

    pub fn json_dir(&self) -> &Path {
        &self.json_dir
    }

    pub fn class_map(&self) -> &SourceClassMap {
        &self.class_map
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut AnnotationStore {
        &mut self.store
    }

    pub fn into_store(self) -> AnnotationStore {
        self.store
    }

    /// Maps a Supervisely class id to its YOLO class.
    pub fn map_class(&self, source: i64) -> Option<ClassId> {
        self.class_map.get(source)
    }

    /// Converts every matching `*.json` file into `<basename>.txt` in the
    /// store, replacing existing label files.
    ///
    /// The base name is the JSON file name up to its first `.`, so
    /// `img.jpg.json` writes `img.txt`. Two JSON files sharing a base name
    /// write the same label file and the later one in path order wins.
    pub fn import(&self, filter: &Filter) -> Result<ImportSummary, YoloTxtError> {
        let json_files = files::list_files(&self.json_dir, filter, Some(JSON_EXTENSION))?;
        let mut summary = ImportSummary::default();

        for json_path in &json_files {
            let data = fs::read(json_path).map_err(YoloTxtError::Io)?;
            let records = parse_supervisely_slice(&data, json_path, &self.class_map)?;
            if records.is_empty() {
                warn!("{} has no objects; writing an empty label file", json_path.display());
            }

            let basename = files::basename_without_extension(json_path);
            let label_path = self.store.write_records(&basename, &records)?;
            debug!(
                "{} -> {} ({} record(s))",
                json_path.display(),
                label_path.display(),
                records.len()
            );

            summary.files += 1;
            summary.records += records.len();
        }

        info!(
            "imported {} Supervisely file(s) from {} ({} record(s))",
            summary.files,
            self.json_dir.display(),
            summary.records
        );
        Ok(summary)
    }
}

/// Fuzz-only entrypoint for Supervisely JSON parsing. Every class id in the
/// document is mapped to itself so conversion runs past the lookup.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_supervisely_json(data: &[u8]) -> Result<(), YoloTxtError> {
    let path = Path::new("<fuzz>");
    let annotation: SlyAnnotation =
        serde_json::from_slice(data).map_err(|source| YoloTxtError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    let class_map: SourceClassMap = annotation
        .objects
        .iter()
        .map(|object| (object.class_id, object.class_id.unsigned_abs() as u32))
        .collect();
    let _ = convert_annotation(&annotation, path, &class_map)?;
    Ok(())
}
