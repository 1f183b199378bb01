//! Parameter payloads carried by commands.
//!
//! Parameters arrive from the remote caller as an opaque JSON blob. Parsing
//! is deliberately lenient: a missing or malformed blob degrades to the
//! default payload and the command behaves as if no parameters were supplied.
//! Field names (`javaScript`, `maxWidth`) are part of the wire contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters for `canvas.navigate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigateParams {
    /// Target URL. Absent, empty, or `/` resets to the bundled scaffold.
    pub url: Option<String>,
}

/// Parameters for `canvas.eval`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvalParams {
    /// Script source to evaluate in the page.
    pub java_script: String,
}

/// Parameters for `canvas.snapshot` and `camera.snapshot`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnapshotParams {
    /// Maximum output width in pixels. Callers may send a fractional value;
    /// it is rounded before use.
    pub max_width: Option<f64>,
}

impl SnapshotParams {
    /// The requested width bound as whole pixels, if usable.
    ///
    /// Non-finite or non-positive values are treated as absent; fractional
    /// values are rounded, never below 1.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn max_width_px(&self) -> Option<u32> {
        let raw = self.max_width?;
        if !raw.is_finite() || raw < 1.0 {
            return None;
        }
        Some((raw.round() as u32).max(1))
    }
}

/// Parameters for `canvas.a2ui.push`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct A2uiPushParams {
    /// One structured UI-update message, forwarded verbatim into the page.
    pub message: Value,
}

/// Parameters for `canvas.a2ui.pushJSONL`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct A2uiPushJsonlParams {
    /// Newline-delimited JSON messages.
    pub jsonl: String,
}

/// Leniently parse a command's parameter blob.
///
/// A missing blob yields the default payload. A malformed blob is logged and
/// also yields the default payload; malformed parameters are never a hard
/// failure.
#[must_use]
pub fn parse_lenient<T>(raw: Option<&Value>) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    match raw {
        None => T::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            tracing::debug!("Malformed command parameters treated as absent: {e}");
            T::default()
        }),
    }
}
