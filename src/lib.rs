//! yolotxt: convert Supervisely JSON to YOLO labels and edit YOLO label
//! directories in place.
//!
//! A YOLO label directory holds one `<basename>.txt` per image, one object
//! per line: `<class_id> <x_center> <y_center> <width> <height>`, with the
//! four spatial values scaled to `[0, 1]` by the image size.
//!
//! # Modules
//!
//! - [`geometry`]: pixel box <-> normalized center box conversion
//! - [`store`]: class removal, class replacement and backfill over a label directory
//! - [`remap`]: class config and the index compaction used by removal
//! - [`supervisely`]: Supervisely JSON importer
//! - [`analyze`]: per-class record counts
//! - [`files`]: listing, base names and in-place line rewriting
//! - [`error`]: Error types for yolotxt operations
//!
//! # Example
//!
//! ```no_run
//! use yolotxt::{AnnotationStore, ClassConfig, Filter, StoreConfig};
//!
//! # fn main() -> Result<(), yolotxt::YoloTxtError> {
//! let config = StoreConfig::new("dataset/images", "dataset/labels")
//!     .with_class_config(ClassConfig::sequential(5));
//! let store = AnnotationStore::open(config)?;
//! store.backfill_missing(&Filter::all())?;
//! let remap = store.remove_classes([1u32, 3], &Filter::all())?;
//! println!("{remap:?}");
//! # Ok(())
//! # }
//! ```

pub mod analyze;
pub mod config;
pub mod error;
pub mod files;
pub mod geometry;
mod ids;
pub mod record;
pub mod remap;
pub mod store;
pub mod supervisely;

pub use analyze::{count_classes, ClassCountReport};
pub use config::StoreConfig;
pub use error::{ErrorKind, YoloTxtError};
pub use files::Filter;
pub use ids::ClassId;
pub use record::{AnnotationRecord, LineFormat};
pub use remap::{compute_remap, ClassConfig, ClassRemap};
pub use store::AnnotationStore;
pub use supervisely::{ImportSummary, SourceClassMap, SuperviselyImporter};
