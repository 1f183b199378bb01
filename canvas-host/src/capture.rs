//! Snapshot finishing: data-URL decoding, size bounding, PNG re-encoding.
//!
//! The page capture hook hands back a PNG data URL. This module turns it
//! into the wire [`Snapshot`]: decoded, downscaled to the requested width
//! bound, and base64-encoded again.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::ImageFormat;

use canvas_commands::{fit_width, ControllerError, ControllerResult, Snapshot};

/// Prefix of the PNG data URLs produced by the page capture hook.
const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Turn a page-produced PNG data URL into a bounded [`Snapshot`].
///
/// When no downscale is needed the original PNG bytes are kept as-is;
/// otherwise the image is resized with Lanczos3 and re-encoded.
///
/// # Errors
///
/// Returns [`ControllerError::Snapshot`] when the data URL is not a PNG,
/// the base64 payload is invalid, or encoding fails.
pub fn finish_capture(data_url: &str, max_width: Option<u32>) -> ControllerResult<Snapshot> {
    let encoded = data_url.strip_prefix(PNG_DATA_URL_PREFIX).ok_or_else(|| {
        ControllerError::Snapshot("capture hook returned a non-PNG data URL".to_string())
    })?;

    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| ControllerError::Snapshot(format!("invalid base64 in capture: {e}")))?;

    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| ControllerError::Snapshot(format!("invalid PNG in capture: {e}")))?;

    let (width, height) = (decoded.width(), decoded.height());
    let (out_width, out_height) = fit_width(width, height, max_width);

    let data = if (out_width, out_height) == (width, height) {
        BASE64.encode(&bytes)
    } else {
        let resized = decoded.resize_exact(out_width, out_height, image::imageops::FilterType::Lanczos3);
        let mut buf = Cursor::new(Vec::new());
        resized
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| ControllerError::Snapshot(format!("PNG encoding failed: {e}")))?;
        BASE64.encode(buf.get_ref())
    };

    Ok(Snapshot {
        width: out_width,
        height: out_height,
        data,
    })
}
