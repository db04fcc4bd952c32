//! Directory listing and in-place line rewriting.
//!
//! Annotation files and images are paired by base name only: the part of
//! the file name before the first `.`. `photo.jpg`, `photo.txt` and
//! `photo.jpg.json` all share the base name `photo`.

use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::error::YoloTxtError;

/// A glob pattern matched against file base names. `*` selects every file.
#[derive(Clone, Debug)]
pub struct Filter {
    matcher: Matcher,
}

#[derive(Clone, Debug)]
enum Matcher {
    All,
    Exact(String),
    Glob(Pattern),
}

impl Filter {
    /// Parses a glob pattern such as `*`, `img_00?` or `train_*`.
    pub fn new(pattern: &str) -> Result<Self, YoloTxtError> {
        let pattern = Pattern::new(pattern).map_err(|source| YoloTxtError::InvalidFilter {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            matcher: Matcher::Glob(pattern),
        })
    }

    /// Matches every file.
    pub fn all() -> Self {
        Self {
            matcher: Matcher::All,
        }
    }

    /// Matches exactly one base name, with glob metacharacters taken literally.
    pub fn exact(base_name: &str) -> Self {
        Self {
            matcher: Matcher::Exact(base_name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match &self.matcher {
            Matcher::All => "*",
            Matcher::Exact(name) => name,
            Matcher::Glob(pattern) => pattern.as_str(),
        }
    }

    pub fn matches(&self, base_name: &str) -> bool {
        match &self.matcher {
            Matcher::All => true,
            Matcher::Exact(name) => name == base_name,
            Matcher::Glob(pattern) => pattern.matches(base_name),
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::all()
    }
}

/// Lists regular files directly inside `dir` whose base name matches
/// `filter` and, if given, whose extension matches `extension`
/// (case-insensitive). Hidden files (leading `.`) are skipped. Results are
/// sorted by path.
pub fn list_files(
    dir: &Path,
    filter: &Filter,
    extension: Option<&str>,
) -> Result<Vec<PathBuf>, YoloTxtError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = entry.map_err(|source| YoloTxtError::Traversal {
            path: dir.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        if !entry.file_type().is_file() || is_hidden(entry.file_name()) {
            continue;
        }
        if let Some(ext) = extension {
            if !has_extension(entry.path(), ext) {
                continue;
            }
        }
        if filter.matches(&basename_without_extension(entry.path())) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// `dir/basename.extension`, or `dir/basename` when `extension` is `None`.
pub fn join_path(dir: &Path, basename: &str, extension: Option<&str>) -> PathBuf {
    match extension {
        Some(ext) => dir.join(format!("{basename}.{ext}")),
        None => dir.join(basename),
    }
}

/// The file name up to its first `.`.
pub fn basename_without_extension(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((base, _)) => base.to_string(),
        None => name.into_owned(),
    }
}

/// Creates `path` and any missing parents, returning it.
pub fn ensure_dir(path: &Path) -> Result<PathBuf, YoloTxtError> {
    fs::create_dir_all(path).map_err(YoloTxtError::Io)?;
    Ok(path.to_path_buf())
}

/// Line counts from one [`rewrite_lines`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub kept: usize,
    pub dropped: usize,
}

/// Rewrites a text file in place, one line at a time.
///
/// `transform` receives each line with its terminator and its 1-based line
/// number, and returns the replacement text or `None` to drop the line. The
/// whole replacement is built before the file is touched, then the same
/// handle is truncated and written. A failure during that final write can
/// leave the file truncated.
pub fn rewrite_lines<F>(path: &Path, mut transform: F) -> Result<RewriteStats, YoloTxtError>
where
    F: FnMut(&str, usize) -> Result<Option<String>, YoloTxtError>,
{
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(YoloTxtError::Io)?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(YoloTxtError::Io)?;
    let content = decode_label_text(bytes, path)?;

    let mut replacement = String::with_capacity(content.len());
    let mut stats = RewriteStats::default();
    for (line_idx, line) in content.split_inclusive('\n').enumerate() {
        match transform(line, line_idx + 1)? {
            Some(new_line) => {
                replacement.push_str(&new_line);
                stats.kept += 1;
            }
            None => stats.dropped += 1,
        }
    }

    file.seek(SeekFrom::Start(0)).map_err(YoloTxtError::Io)?;
    file.set_len(0).map_err(YoloTxtError::Io)?;
    file.write_all(replacement.as_bytes())
        .map_err(YoloTxtError::Io)?;

    Ok(stats)
}

/// Reads a label file as UTF-8 text.
pub fn read_label_text(path: &Path) -> Result<String, YoloTxtError> {
    let bytes = fs::read(path).map_err(YoloTxtError::Io)?;
    decode_label_text(bytes, path)
}

fn decode_label_text(bytes: Vec<u8>, path: &Path) -> Result<String, YoloTxtError> {
    String::from_utf8(bytes).map_err(|err| {
        let valid = &err.as_bytes()[..err.utf8_error().valid_up_to()];
        YoloTxtError::LabelParse {
            path: path.to_path_buf(),
            line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
            message: "not valid UTF-8".to_string(),
        }
    })
}

fn is_hidden(file_name: &OsStr) -> bool {
    file_name.to_string_lossy().starts_with('.')
}

fn has_extension(path: &Path, allowed: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(allowed))
        .unwrap_or(false)
}
