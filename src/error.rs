use std::path::PathBuf;
use thiserror::Error;

/// The main error type for yolotxt operations.
#[derive(Debug, Error)]
pub enum YoloTxtError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Class config was not set; a full ordered class list is required to remove classes")]
    ClassConfigMissing,

    #[error(
        "Class config cannot be compacted: class {class_id} would become {mapped}, expected {expected}; \
         list the classes as 0..N in order"
    )]
    RemapConflict {
        class_id: u32,
        mapped: i64,
        expected: u32,
    },

    #[error("Class {class_id} in {path} line {line} has no entry in the class remap")]
    ClassNotMapped {
        path: PathBuf,
        line: usize,
        class_id: u32,
    },

    #[error("Source class {class_id} in {path} has no entry in the class map")]
    SourceClassNotMapped { path: PathBuf, class_id: i64 },

    #[error("Failed to parse label file {path} line {line}: {message}")]
    LabelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to parse Supervisely JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected Supervisely JSON shape in {path}: {message}")]
    JsonShape { path: PathBuf, message: String },

    #[error("Failed to parse YAML from {path}: {source}")]
    DataYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid data.yaml at {path}: {message}")]
    DataYamlInvalid { path: PathBuf, message: String },

    #[error("Invalid classes.txt at {path}: {message}")]
    ClassesTxtInvalid { path: PathBuf, message: String },

    #[error("Invalid file filter '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Failed to list {path}: {message}")]
    Traversal { path: PathBuf, message: String },
}

/// Coarse classification of a [`YoloTxtError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The class config is absent or cannot be compacted.
    Configuration,
    /// A class id has no entry in a mapping that must be total.
    Lookup,
    /// Underlying filesystem failure.
    Io,
    /// Malformed JSON, YAML, label line or filter pattern.
    Parse,
}

impl YoloTxtError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            YoloTxtError::ClassConfigMissing | YoloTxtError::RemapConflict { .. } => {
                ErrorKind::Configuration
            }
            YoloTxtError::ClassNotMapped { .. } | YoloTxtError::SourceClassNotMapped { .. } => {
                ErrorKind::Lookup
            }
            YoloTxtError::Io(_) | YoloTxtError::Traversal { .. } => ErrorKind::Io,
            YoloTxtError::LabelParse { .. }
            | YoloTxtError::JsonParse { .. }
            | YoloTxtError::JsonShape { .. }
            | YoloTxtError::DataYamlParse { .. }
            | YoloTxtError::DataYamlInvalid { .. }
            | YoloTxtError::ClassesTxtInvalid { .. }
            | YoloTxtError::InvalidFilter { .. } => ErrorKind::Parse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_failure_site() {
        assert_eq!(
            YoloTxtError::ClassConfigMissing.kind(),
            ErrorKind::Configuration
        );
        let lookup = YoloTxtError::ClassNotMapped {
            path: PathBuf::from("a.txt"),
            line: 1,
            class_id: 7,
        };
        assert_eq!(lookup.kind(), ErrorKind::Lookup);
        let io = YoloTxtError::Io(std::io::Error::other("boom"));
        assert_eq!(io.kind(), ErrorKind::Io);
        let parse = YoloTxtError::LabelParse {
            path: PathBuf::from("a.txt"),
            line: 2,
            message: "missing delimiter".to_string(),
        };
        assert_eq!(parse.kind(), ErrorKind::Parse);
    }
}
