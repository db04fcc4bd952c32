//! Class config and class index remapping.
//!
//! Removing classes from a YOLO dataset means every surviving class index
//! has to move down by the number of removed classes that precede it. The
//! order that counts is the order of the [`ClassConfig`], not numeric order,
//! so configs are expected to list `0..N` ascending. [`compute_remap`]
//! refuses configs where the rule would merge, skip or go below zero.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::YoloTxtError;
use crate::ids::ClassId;

/// The ordered universe of class ids used when compacting indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassConfig {
    classes: Vec<ClassId>,
}

impl ClassConfig {
    /// Creates a config from ids in their authoritative order. Duplicates are
    /// kept; [`compute_remap`] ignores repeats.
    pub fn new<I>(classes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ClassId>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// A config of `0..count`.
    pub fn sequential(count: u32) -> Self {
        Self::new(0..count)
    }

    pub fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Builds a sequential config from the `names:` entry of an Ultralytics
    /// `data.yaml`, either a list or an index mapping.
    pub fn from_data_yaml(path: &Path) -> Result<Self, YoloTxtError> {
        let data = fs::read_to_string(path).map_err(YoloTxtError::Io)?;
        let parsed: DataYaml =
            serde_yaml::from_str(&data).map_err(|source| YoloTxtError::DataYamlParse {
                path: path.to_path_buf(),
                source,
            })?;

        let count = match parsed.names {
            DataYamlNames::Sequence(names) => names.len() as u32,
            // Holes in a mapping still occupy an index.
            DataYamlNames::Mapping(mapping) => match mapping.keys().next_back() {
                Some(max) => max.checked_add(1).ok_or_else(|| YoloTxtError::DataYamlInvalid {
                    path: path.to_path_buf(),
                    message: format!("class index {max} is out of range"),
                })?,
                None => 0,
            },
        };
        Ok(Self::sequential(count))
    }

    /// Builds a sequential config from a `classes.txt` with one name per line.
    pub fn from_classes_txt(path: &Path) -> Result<Self, YoloTxtError> {
        let data = fs::read_to_string(path).map_err(YoloTxtError::Io)?;
        let mut count = 0u32;
        for (line_idx, line) in data.lines().enumerate() {
            if line.trim().is_empty() {
                return Err(YoloTxtError::ClassesTxtInvalid {
                    path: path.to_path_buf(),
                    message: format!("line {} is empty", line_idx + 1),
                });
            }
            count += 1;
        }
        Ok(Self::sequential(count))
    }
}

#[derive(Debug, Deserialize)]
struct DataYaml {
    names: DataYamlNames,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataYamlNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<u32, String>),
}

/// A mapping from old class id to new class id.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClassRemap {
    map: BTreeMap<ClassId, ClassId>,
}

impl ClassRemap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, old: impl Into<ClassId>, new: impl Into<ClassId>) {
        self.map.insert(old.into(), new.into());
    }

    pub fn get(&self, old: ClassId) -> Option<ClassId> {
        self.map.get(&old).copied()
    }

    pub fn contains(&self, old: ClassId) -> bool {
        self.map.contains_key(&old)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates `(old, new)` pairs in ascending order of the old id.
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, ClassId)> + '_ {
        self.map.iter().map(|(old, new)| (*old, *new))
    }

    /// The old ids, ascending.
    pub fn sources(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.map.keys().copied()
    }
}

impl<A: Into<ClassId>, B: Into<ClassId>> FromIterator<(A, B)> for ClassRemap {
    fn from_iter<T: IntoIterator<Item = (A, B)>>(iter: T) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(old, new)| (old.into(), new.into()))
                .collect(),
        }
    }
}

impl fmt::Debug for ClassRemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.map.iter().map(|(old, new)| (old.0, new.0)))
            .finish()
    }
}

/// Computes the remap that compacts surviving classes after `to_remove` is
/// dropped.
///
/// Walks `config` in order with a running `shift`: a removed class bumps
/// the shift, any other class not yet seen maps to `id - shift`. Survivors
/// keep their relative order and land on `0..M` with no gaps.
///
/// # Errors
/// [`YoloTxtError::ClassConfigMissing`] when `config` is empty.
/// [`YoloTxtError::RemapConflict`] when `id - shift` is not the next compact
/// id, which happens only for configs that do not list `0..N` ascending.
pub fn compute_remap(
    config: &ClassConfig,
    to_remove: &BTreeSet<ClassId>,
) -> Result<ClassRemap, YoloTxtError> {
    if config.is_empty() {
        return Err(YoloTxtError::ClassConfigMissing);
    }

    let mut keep = ClassRemap::new();
    let mut shift: u32 = 0;
    let mut expected: u32 = 0;

    for &old in config.classes() {
        if to_remove.contains(&old) {
            shift += 1;
        } else if !keep.contains(old) {
            let mapped = i64::from(old.0) - i64::from(shift);
            if mapped != i64::from(expected) {
                return Err(YoloTxtError::RemapConflict {
                    class_id: old.0,
                    mapped,
                    expected,
                });
            }
            keep.insert(old, ClassId(expected));
            expected += 1;
        }
    }

    Ok(keep)
}
