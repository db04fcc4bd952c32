//! Corner-form and center-form bounding boxes.

use std::fmt;
use std::marker::PhantomData;

use super::{Normalized, Pixel};

/// An axis-aligned bounding box in XYXY format (xmin, ymin, xmax, ymax).
///
/// Note: the constructor does NOT enforce `min <= max`. A reversed box still
/// converts, it just yields negative sizes.
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxXYXY<TSpace> {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBoxXYXY<TSpace> {
    /// Creates a new bounding box from explicit corner coordinates.
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
            _space: PhantomData,
        }
    }

    /// Returns the width of the bounding box.
    ///
    /// May be negative if the box is malformed (xmax < xmin).
    #[inline]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Returns the height of the bounding box.
    ///
    /// May be negative if the box is malformed (ymax < ymin).
    #[inline]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Returns true if the box is properly ordered (min <= max for both axes).
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.xmin <= self.xmax && self.ymin <= self.ymax
    }
}

impl<TSpace> fmt::Debug for BBoxXYXY<TSpace> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BBoxXYXY")
            .field("xmin", &self.xmin)
            .field("ymin", &self.ymin)
            .field("xmax", &self.xmax)
            .field("ymax", &self.ymax)
            .finish()
    }
}

/// A bounding box in center form: center point plus size.
///
/// In [`Normalized`] space this is exactly what a YOLO label line stores.
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxCxCyWh<TSpace> {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBoxCxCyWh<TSpace> {
    #[inline]
    pub fn new(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self {
            cx,
            cy,
            w,
            h,
            _space: PhantomData,
        }
    }

    /// Returns `(cx, cy, w, h)`.
    #[inline]
    pub fn to_tuple(&self) -> (f64, f64, f64, f64) {
        (self.cx, self.cy, self.w, self.h)
    }
}

impl<TSpace> fmt::Debug for BBoxCxCyWh<TSpace> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BBoxCxCyWh")
            .field("cx", &self.cx)
            .field("cy", &self.cy)
            .field("w", &self.w)
            .field("h", &self.h)
            .finish()
    }
}

impl BBoxXYXY<Pixel> {
    /// Converts a pixel box to YOLO center form.
    ///
    /// The arithmetic order (`(min + max) / 2 * (1 / size)`) is fixed so that
    /// written labels are bit-for-bit stable across runs.
    pub fn to_normalized(&self, image_width: f64, image_height: f64) -> BBoxCxCyWh<Normalized> {
        let dw = 1.0 / image_width;
        let dh = 1.0 / image_height;
        BBoxCxCyWh::new(
            ((self.xmin + self.xmax) / 2.0) * dw,
            ((self.ymin + self.ymax) / 2.0) * dh,
            (self.xmax - self.xmin) * dw,
            (self.ymax - self.ymin) * dh,
        )
    }
}

impl BBoxCxCyWh<Normalized> {
    /// Converts back to a pixel box, scaling by the image size.
    pub fn to_pixel(&self, image_width: f64, image_height: f64) -> BBoxXYXY<Pixel> {
        BBoxXYXY::from_xyxy(
            (self.cx - self.w / 2.0) * image_width,
            (self.cy - self.h / 2.0) * image_height,
            (self.cx + self.w / 2.0) * image_width,
            (self.cy + self.h / 2.0) * image_height,
        )
    }

    /// Corner coordinates truncated toward zero, without rescaling.
    ///
    /// `x - w / 2` and friends are cast straight to integers, so for normalized input every corner
    /// collapses to 0 (or 1 for a box touching the far edge). Use
    /// [`to_pixel`](Self::to_pixel) for a real pixel box.
    pub fn truncated_corners(&self) -> (i64, i64, i64, i64) {
        (
            (self.cx - self.w / 2.0) as i64,
            (self.cy - self.h / 2.0) as i64,
            (self.cx + self.w / 2.0) as i64,
            (self.cy + self.h / 2.0) as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_dimensions() {
        let bbox: BBoxXYXY<Pixel> = BBoxXYXY::from_xyxy(10.0, 20.0, 100.0, 80.0);
        assert_eq!(bbox.width(), 90.0);
        assert_eq!(bbox.height(), 60.0);
        assert!(bbox.is_ordered());

        let reversed: BBoxXYXY<Pixel> = BBoxXYXY::from_xyxy(100.0, 80.0, 10.0, 20.0);
        assert!(!reversed.is_ordered());
    }

    #[test]
    fn test_to_normalized_centers_box() {
        let bbox: BBoxXYXY<Pixel> = BBoxXYXY::from_xyxy(10.0, 10.0, 50.0, 50.0);
        let (cx, cy, w, h) = bbox.to_normalized(100.0, 100.0).to_tuple();
        assert!((cx - 0.3).abs() < 1e-12);
        assert!((cy - 0.3).abs() < 1e-12);
        assert!((w - 0.4).abs() < 1e-12);
        assert!((h - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_to_pixel_inverts_to_normalized() {
        let original: BBoxXYXY<Pixel> = BBoxXYXY::from_xyxy(12.0, 4.0, 30.0, 9.0);
        let restored = original.to_normalized(40.0, 20.0).to_pixel(40.0, 20.0);
        assert!((restored.xmin - 12.0).abs() < 1e-9);
        assert!((restored.ymin - 4.0).abs() < 1e-9);
        assert!((restored.xmax - 30.0).abs() < 1e-9);
        assert!((restored.ymax - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_truncated_corners_do_not_rescale() {
        let bbox: BBoxCxCyWh<Normalized> = BBoxCxCyWh::new(0.5, 0.5, 0.4, 0.4);
        assert_eq!(bbox.truncated_corners(), (0, 0, 0, 0));

        let full: BBoxCxCyWh<Normalized> = BBoxCxCyWh::new(0.5, 0.5, 1.0, 1.0);
        assert_eq!(full.truncated_corners(), (0, 0, 1, 1));
    }

    #[test]
    fn test_truncation_is_toward_zero() {
        let unscaled: BBoxCxCyWh<Normalized> = BBoxCxCyWh::new(3.0, 3.0, 7.0, 2.0);
        // 3 - 3.5 = -0.5 truncates to 0, not -1.
        assert_eq!(unscaled.truncated_corners(), (0, 2, 6, 4));
    }
}
