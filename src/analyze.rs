//! Class frequency over a directory of YOLO label files.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::{debug, warn};
use serde::Serialize;

use crate::error::YoloTxtError;
use crate::files::{self, Filter};
use crate::store::LABEL_EXTENSION;

const BAR_WIDTH: usize = 20;

/// Per-class record counts, ascending by class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassCountReport<K> {
    pub counts: Vec<(K, usize)>,
}

impl<K> ClassCountReport<K> {
    /// Total number of records counted.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }

    /// Classes that were listed as known but never seen.
    pub fn zero_classes(&self) -> impl Iterator<Item = &K> + '_ {
        self.counts
            .iter()
            .filter(|(_, count)| *count == 0)
            .map(|(class, _)| class)
    }

    pub fn into_vec(self) -> Vec<(K, usize)> {
        self.counts
    }
}

/// Counts records per class in every matching `*.txt` file under `dir`.
///
/// Every class in `known` starts at zero so unused classes show up in the
/// result. The first whitespace-delimited token of each non-blank line is
/// the class; it is parsed as `K`, so `String` counts raw tokens and
/// [`ClassId`](crate::ClassId) counts numeric ids. A missing directory
/// yields just the known classes at zero.
pub fn count_classes<K, I>(
    dir: &Path,
    filter: &Filter,
    known: I,
) -> Result<ClassCountReport<K>, YoloTxtError>
where
    K: FromStr + Ord,
    I: IntoIterator<Item = K>,
{
    let mut tally: BTreeMap<K, usize> = known.into_iter().map(|class| (class, 0)).collect();

    if !dir.is_dir() {
        warn!("label directory {} does not exist", dir.display());
        return Ok(ClassCountReport {
            counts: tally.into_iter().collect(),
        });
    }

    let label_files = files::list_files(dir, filter, Some(LABEL_EXTENSION))?;
    for path in &label_files {
        let content = files::read_label_text(path)?;
        for (line_idx, line) in content.lines().enumerate() {
            let Some(token) = line.split_whitespace().next() else {
                continue;
            };
            let class = token.parse::<K>().map_err(|_| YoloTxtError::LabelParse {
                path: path.clone(),
                line: line_idx + 1,
                message: format!("invalid class token '{token}'"),
            })?;
            *tally.entry(class).or_insert(0) += 1;
        }
    }

    debug!(
        "counted classes over {} label file(s) in {}",
        label_files.len(),
        dir.display()
    );
    Ok(ClassCountReport {
        counts: tally.into_iter().collect(),
    })
}

impl<K: fmt::Display> fmt::Display for ClassCountReport<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total();
        writeln!(f, "Classes ({}), {} record(s)", self.counts.len(), total)?;

        if self.counts.is_empty() {
            return writeln!(f, "  No classes found.");
        }

        let max_count = self.counts.iter().map(|(_, count)| *count).max().unwrap_or(0);
        for (class, count) in &self.counts {
            let pct = if total > 0 {
                (*count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            writeln!(
                f,
                "  {:<8} {:>7} {:>5.1}%  {}",
                class.to_string(),
                count,
                pct,
                render_bar(*count, max_count, BAR_WIDTH)
            )?;
        }
        Ok(())
    }
}

/// Render a horizontal bar using Unicode block characters.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return "░".repeat(width);
    }

    let filled = ((count * width) / max_count).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}
