//! Conversion between absolute pixel boxes and YOLO center-form boxes.
//!
//! The typed API ([`BBoxXYXY`], [`BBoxCxCyWh`]) tags every box with its
//! coordinate space. [`to_normalized`] and [`to_absolute`] are the flat
//! tuple forms used by the importer and by callers that already hold raw
//! numbers.
//!
//! # Example
//!
//! ```
//! use yolotxt::geometry::to_normalized;
//!
//! let (x, y, w, h) = to_normalized(10, 10, 1.0, 1.0, 9.0, 9.0);
//! assert!((x - 0.5).abs() < 1e-12);
//! assert!((w - 0.8).abs() < 1e-12);
//! # let _ = (y, h);
//! ```

mod bbox;
mod space;

pub use bbox::{BBoxCxCyWh, BBoxXYXY};
pub use space::{Normalized, Pixel};

/// Converts a pixel box to normalized `(x_center, y_center, width, height)`.
///
/// `width` and `height` are the image size. For `0 <= xmin <= xmax <= width`
/// (and likewise on y) every output lies in `[0, 1]`; other inputs are
/// converted without complaint.
pub fn to_normalized(
    width: u32,
    height: u32,
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
) -> (f64, f64, f64, f64) {
    BBoxXYXY::<Pixel>::from_xyxy(xmin, ymin, xmax, ymax)
        .to_normalized(width as f64, height as f64)
        .to_tuple()
}

/// Converts center form back to `(xmin, ymin, xmax, ymax)`, truncating
/// toward zero.
///
/// The values are NOT multiplied by the image size first; see
/// [`BBoxCxCyWh::truncated_corners`].
pub fn to_absolute(x: f64, y: f64, w: f64, h: f64) -> (i64, i64, i64, i64) {
    BBoxCxCyWh::<Normalized>::new(x, y, w, h).truncated_corners()
}
