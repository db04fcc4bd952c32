//! YOLO label lines: `<class_id> <x_center> <y_center> <width> <height>`.

use std::fmt;
use std::path::Path;

use crate::error::YoloTxtError;
use crate::files;
use crate::geometry::{BBoxCxCyWh, Normalized};
use crate::ids::ClassId;

/// How floats are rendered when a record is written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineFormat {
    /// Fixed number of decimals, or `None` for the shortest representation
    /// that parses back to the same `f64`.
    pub precision: Option<usize>,
}

impl LineFormat {
    pub fn fixed(precision: usize) -> Self {
        Self {
            precision: Some(precision),
        }
    }

    fn write_float(&self, out: &mut String, value: f64) {
        use std::fmt::Write as _;
        // Writing into a String cannot fail.
        let _ = match self.precision {
            Some(p) => write!(out, "{:.*}", p, value),
            None => write!(out, "{value}"),
        };
    }
}

/// One annotated object of one image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnnotationRecord {
    pub class_id: ClassId,
    pub bbox: BBoxCxCyWh<Normalized>,
}

impl AnnotationRecord {
    pub fn new(class_id: impl Into<ClassId>, x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            class_id: class_id.into(),
            bbox: BBoxCxCyWh::new(x, y, w, h),
        }
    }

    /// Renders the record as a label line, without the trailing newline.
    pub fn to_line(&self, format: LineFormat) -> String {
        let mut line = self.class_id.to_string();
        let (x, y, w, h) = self.bbox.to_tuple();
        for value in [x, y, w, h] {
            line.push(' ');
            format.write_float(&mut line, value);
        }
        line
    }

    /// Parses one label line. Blank lines yield `Ok(None)`.
    pub fn parse_line(
        line: &str,
        file_path: &Path,
        line_num: usize,
    ) -> Result<Option<Self>, YoloTxtError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        // Take at most 6 tokens so pathological inputs do not allocate unbounded memory.
        let tokens: Vec<&str> = trimmed.split_whitespace().take(6).collect();
        if tokens.len() != 5 {
            return Err(YoloTxtError::LabelParse {
                path: file_path.to_path_buf(),
                line: line_num,
                message: format!("expected 5 tokens, found {}", tokens.len()),
            });
        }

        let class_id =
            tokens[0]
                .parse::<ClassId>()
                .map_err(|_| YoloTxtError::LabelParse {
                    path: file_path.to_path_buf(),
                    line: line_num,
                    message: format!(
                        "invalid class_id '{}'; expected non-negative integer",
                        tokens[0]
                    ),
                })?;

        let x = parse_f64_token(tokens[1], "x_center", file_path, line_num)?;
        let y = parse_f64_token(tokens[2], "y_center", file_path, line_num)?;
        let w = parse_f64_token(tokens[3], "width", file_path, line_num)?;
        let h = parse_f64_token(tokens[4], "height", file_path, line_num)?;

        Ok(Some(Self::new(class_id, x, y, w, h)))
    }
}

impl fmt::Display for AnnotationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line(LineFormat::default()))
    }
}

/// Reads every record of a label file, in file order.
pub fn read_annotation_file(path: &Path) -> Result<Vec<AnnotationRecord>, YoloTxtError> {
    let content = files::read_label_text(path)?;
    let mut records = Vec::new();
    for (line_idx, line) in content.lines().enumerate() {
        if let Some(record) = AnnotationRecord::parse_line(line, path, line_idx + 1)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Splits a raw label line into its class id and everything after the first
/// space, which is passed through untouched by class edits.
pub(crate) fn split_class_token<'a>(
    line: &'a str,
    file_path: &Path,
    line_num: usize,
) -> Result<(ClassId, &'a str), YoloTxtError> {
    let (token, rest) = line
        .split_once(' ')
        .ok_or_else(|| YoloTxtError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: "missing ' ' delimiter after class_id".to_string(),
        })?;

    let class_id = token
        .parse::<ClassId>()
        .map_err(|_| YoloTxtError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid class_id '{token}'; expected non-negative integer"),
        })?;

    Ok((class_id, rest))
}

fn parse_f64_token(
    raw: &str,
    field_name: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<f64, YoloTxtError> {
    raw.parse::<f64>().map_err(|_| YoloTxtError::LabelParse {
        path: file_path.to_path_buf(),
        line: line_num,
        message: format!("invalid {field_name} '{raw}'; expected floating-point number"),
    })
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) -> Result<(), YoloTxtError> {
    let _ = AnnotationRecord::parse_line(input, Path::new("<fuzz>"), 1)?;
    let _ = split_class_token(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}
