//! Snapshot payloads and size bounding.

use serde::{Deserialize, Serialize};

/// A captured snapshot of the visible surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Final image width in pixels.
    pub width: u32,
    /// Final image height in pixels.
    pub height: u32,
    /// Base64-encoded PNG bytes.
    pub data: String,
}

/// Bound image dimensions to a maximum width, preserving aspect ratio.
///
/// Returns the input unchanged when `max_width` is absent or not smaller
/// than `width`. Otherwise the output width equals `max_width` and the
/// height is proportionally scaled, rounded to nearest, never below 1.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fit_width(width: u32, height: u32, max_width: Option<u32>) -> (u32, u32) {
    let Some(max_width) = max_width else {
        return (width, height);
    };
    if width == 0 || height == 0 || max_width >= width {
        return (width, height);
    }

    let max_width = max_width.max(1);
    let scale = f64::from(max_width) / f64::from(width);
    let scaled = (f64::from(height) * scale).round() as u32;
    (max_width, scaled.max(1))
}
