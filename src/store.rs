//! A directory of YOLO label files, one `<basename>.txt` per image.
//!
//! Every batch operation takes a [`Filter`] on base names and walks the
//! matching files one at a time in path order. The first failing file aborts
//! the batch; files rewritten before it stay rewritten.

use std::collections::BTreeSet;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::StoreConfig;
use crate::error::YoloTxtError;
use crate::files::{self, Filter};
use crate::ids::ClassId;
use crate::record::{self, AnnotationRecord, LineFormat};
use crate::remap::{self, ClassConfig, ClassRemap};

pub const LABEL_EXTENSION: &str = "txt";

/// Owns a label directory and the class config used to edit it.
#[derive(Debug)]
pub struct AnnotationStore {
    images_dir: PathBuf,
    labels_dir: PathBuf,
    class_config: Option<ClassConfig>,
    line_format: LineFormat,
}

impl AnnotationStore {
    /// Opens a store, creating the label directory if it does not exist.
    pub fn open(config: StoreConfig) -> Result<Self, YoloTxtError> {
        let labels_dir = files::ensure_dir(&config.labels_dir)?;
        Ok(Self {
            images_dir: config.images_dir,
            labels_dir,
            class_config: config.class_config,
            line_format: config.line_format,
        })
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn labels_dir(&self) -> &Path {
        &self.labels_dir
    }

    pub fn class_config(&self) -> Option<&ClassConfig> {
        self.class_config.as_ref()
    }

    pub fn set_class_config(&mut self, class_config: ClassConfig) {
        self.class_config = Some(class_config);
    }

    pub fn line_format(&self) -> LineFormat {
        self.line_format
    }

    /// Path of the label file for an image base name.
    pub fn label_path(&self, basename: &str) -> PathBuf {
        files::join_path(&self.labels_dir, basename, Some(LABEL_EXTENSION))
    }

    /// Label files matching `filter`, sorted by path.
    pub fn label_files(&self, filter: &Filter) -> Result<Vec<PathBuf>, YoloTxtError> {
        files::list_files(&self.labels_dir, filter, Some(LABEL_EXTENSION))
    }

    /// Truncates every matching label file to zero length.
    ///
    /// Returns the number of files emptied.
    pub fn empty_all(&self, filter: &Filter) -> Result<usize, YoloTxtError> {
        let label_files = self.label_files(filter)?;
        for path in &label_files {
            File::create(path).map_err(YoloTxtError::Io)?;
            debug!("emptied {}", path.display());
        }
        info!(
            "emptied {} label file(s) in {} (filter '{}')",
            label_files.len(),
            self.labels_dir.display(),
            filter.as_str()
        );
        Ok(label_files.len())
    }

    /// Creates an empty label file for every matching image that has none.
    ///
    /// Existing label files are never opened for writing. Returns the number
    /// of files created.
    pub fn backfill_missing(&self, filter: &Filter) -> Result<usize, YoloTxtError> {
        let images = files::list_files(&self.images_dir, filter, None)?;
        let mut created = 0;

        for image in &images {
            let label_path = self.label_path(&files::basename_without_extension(image));
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&label_path)
            {
                Ok(_) => {
                    debug!("created empty {}", label_path.display());
                    created += 1;
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
                Err(err) => return Err(YoloTxtError::Io(err)),
            }
        }

        info!(
            "backfilled {} empty label file(s) for {} image(s)",
            created,
            images.len()
        );
        Ok(created)
    }

    /// Computes the compaction remap for dropping `to_remove` under the
    /// current class config.
    ///
    /// # Errors
    /// [`YoloTxtError::ClassConfigMissing`] if no non-empty class config is set.
    pub fn compute_remap(&self, to_remove: &BTreeSet<ClassId>) -> Result<ClassRemap, YoloTxtError> {
        let config = self
            .class_config
            .as_ref()
            .ok_or(YoloTxtError::ClassConfigMissing)?;
        remap::compute_remap(config, to_remove)
    }

    /// Deletes every record of the given classes and renumbers the rest.
    ///
    /// The remap is computed once and applied to every matching file. Only
    /// the class token of a kept line is rewritten; the coordinates are
    /// copied byte for byte. Blank lines are dropped. A record whose class is
    /// neither removed nor in the class config fails with
    /// [`YoloTxtError::ClassNotMapped`] before that file is modified.
    ///
    /// Returns the remap that was applied. The store's class config is left
    /// unchanged.
    pub fn remove_classes<I>(&self, to_remove: I, filter: &Filter) -> Result<ClassRemap, YoloTxtError>
    where
        I: IntoIterator,
        I::Item: Into<ClassId>,
    {
        let to_remove: BTreeSet<ClassId> = to_remove.into_iter().map(Into::into).collect();
        let keep = self.compute_remap(&to_remove)?;

        let label_files = self.label_files(filter)?;
        let mut dropped_records = 0;
        for path in &label_files {
            let stats = files::rewrite_lines(path, |line, line_num| {
                if line.trim().is_empty() {
                    return Ok(None);
                }
                let (class_id, rest) = record::split_class_token(line, path, line_num)?;
                if to_remove.contains(&class_id) {
                    dropped_records += 1;
                    return Ok(None);
                }
                let new_id = keep
                    .get(class_id)
                    .ok_or_else(|| YoloTxtError::ClassNotMapped {
                        path: path.clone(),
                        line: line_num,
                        class_id: class_id.as_u32(),
                    })?;
                Ok(Some(format!("{new_id} {rest}")))
            })?;
            debug!(
                "{}: kept {} line(s), dropped {}",
                path.display(),
                stats.kept,
                stats.dropped
            );
        }

        info!(
            "removed class(es) {:?} from {} label file(s), {} record(s) dropped",
            to_remove.iter().map(ClassId::as_u32).collect::<Vec<_>>(),
            label_files.len(),
            dropped_records
        );
        Ok(keep)
    }

    /// Rewrites every record's class through `remap`.
    ///
    /// The store's class config becomes the remap's source ids, ascending.
    /// Unlike [`remove_classes`](Self::remove_classes) no record is dropped:
    /// a class with no entry fails with [`YoloTxtError::ClassNotMapped`].
    pub fn replace_classes(&mut self, remap: &ClassRemap, filter: &Filter) -> Result<(), YoloTxtError> {
        self.class_config = Some(ClassConfig::new(remap.sources()));

        let label_files = self.label_files(filter)?;
        for path in &label_files {
            files::rewrite_lines(path, |line, line_num| {
                if line.trim().is_empty() {
                    return Ok(None);
                }
                let (class_id, rest) = record::split_class_token(line, path, line_num)?;
                let new_id = remap
                    .get(class_id)
                    .ok_or_else(|| YoloTxtError::ClassNotMapped {
                        path: path.clone(),
                        line: line_num,
                        class_id: class_id.as_u32(),
                    })?;
                Ok(Some(format!("{new_id} {rest}")))
            })?;
            debug!("remapped {}", path.display());
        }

        info!(
            "replaced classes in {} label file(s) using {:?}",
            label_files.len(),
            remap
        );
        Ok(())
    }

    /// Writes `records` as the complete contents of `<basename>.txt`,
    /// replacing any existing file.
    pub fn write_records(
        &self,
        basename: &str,
        records: &[AnnotationRecord],
    ) -> Result<PathBuf, YoloTxtError> {
        let path = self.label_path(basename);
        let file = File::create(&path).map_err(YoloTxtError::Io)?;
        let mut writer = BufWriter::new(file);
        for record in records {
            writeln!(writer, "{}", record.to_line(self.line_format)).map_err(YoloTxtError::Io)?;
        }
        writer.flush().map_err(YoloTxtError::Io)?;
        Ok(path)
    }

    /// Reads the records of `<basename>.txt`.
    pub fn read_records(&self, basename: &str) -> Result<Vec<AnnotationRecord>, YoloTxtError> {
        record::read_annotation_file(&self.label_path(basename))
    }

    /// Base names of matching images that have no label file.
    pub fn images_without_labels(&self, filter: &Filter) -> Result<Vec<String>, YoloTxtError> {
        let mut missing = Vec::new();
        for image in files::list_files(&self.images_dir, filter, None)? {
            let basename = files::basename_without_extension(&image);
            if !self.label_path(&basename).exists() {
                missing.push(basename);
            }
        }
        Ok(missing)
    }
}
