//! Frame-geometry classification.
//!
//! Classification works on `height / width`. A 1920x1080 frame therefore has a
//! ratio of 9/16 and lands in [`ShapeCategory::Widescreen`], while 1080x1920
//! has 16/9 and lands in [`ShapeCategory::Tall`].
//!
//! Only the widescreen and tall categories get their own storage folder; the
//! standard (4:3) and square categories are computed but share the `other`
//! folder. Existing object keys depend on this mapping.

use serde::Serialize;
use std::fmt;

/// Absolute tolerance used when comparing a ratio against a reference.
pub const RATIO_TOLERANCE: f64 = 0.01;

/// Reference ratios in the order they are checked. Earlier entries win when a
/// ratio is within tolerance of more than one reference.
const REFERENCE_RATIOS: [(f64, ShapeCategory); 4] = [
    (9.0 / 16.0, ShapeCategory::Widescreen),
    (4.0 / 3.0, ShapeCategory::Standard),
    (16.0 / 9.0, ShapeCategory::Tall),
    (1.0, ShapeCategory::Square),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeCategory {
    Widescreen,
    Standard,
    Tall,
    Square,
    Other,
}

impl ShapeCategory {
    /// Classify a frame from its pixel dimensions.
    ///
    /// A zero width yields a non-finite ratio, which matches no reference and
    /// falls through to [`ShapeCategory::Other`].
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        let ratio = f64::from(height) / f64::from(width);
        Self::from_ratio(ratio)
    }

    pub fn from_ratio(ratio: f64) -> Self {
        REFERENCE_RATIOS
            .iter()
            .find(|(reference, _)| almost_equal(ratio, *reference, RATIO_TOLERANCE))
            .map(|(_, category)| *category)
            .unwrap_or(ShapeCategory::Other)
    }

    /// Storage folder the category maps to.
    pub fn folder(self) -> &'static str {
        match self {
            ShapeCategory::Widescreen => "landscape",
            ShapeCategory::Tall => "portrait",
            ShapeCategory::Standard | ShapeCategory::Square | ShapeCategory::Other => "other",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeCategory::Widescreen => "widescreen",
            ShapeCategory::Standard => "standard",
            ShapeCategory::Tall => "tall",
            ShapeCategory::Square => "square",
            ShapeCategory::Other => "other",
        }
    }
}

impl fmt::Display for ShapeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn almost_equal(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}
