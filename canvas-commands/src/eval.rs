//! Script evaluation harness.
//!
//! User scripts run inside a try/catch wrapper so a throwing script surfaces
//! as an error result instead of disappearing into the webview. The wrapper
//! returns a `{ ok }` or `{ err }` envelope; the webview hands it back as a
//! JSON string which [`parse_result`] unpacks.

use serde::Deserialize;

use crate::error::{ControllerError, ControllerResult};

/// Wrap a user script for evaluation.
///
/// The script source is embedded as a JSON string literal, so arbitrary
/// quoting and newlines in the source are safe. The completion value is
/// stringified; `undefined` and `null` become the empty string.
#[must_use]
pub fn wrap(script: &str) -> String {
    let quoted = serde_json::Value::String(script.to_string()).to_string();
    format!(
        "(function() {{ \
           try {{ \
             const __r = window.eval({quoted}); \
             return {{ ok: (__r === undefined || __r === null) ? '' : String(__r) }}; \
           }} catch (e) {{ \
             return {{ err: String(e) }}; \
           }} \
         }})()"
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Envelope {
    ok: Option<String>,
    err: Option<String>,
}

/// Unpack the `{ ok } / { err }` envelope returned by a wrapped script.
///
/// # Errors
///
/// Returns [`ControllerError::Evaluation`] when the script threw, or when
/// the webview returned something that is not a wrapper envelope (for
/// example after the page navigated away mid-evaluation).
pub fn parse_result(raw: &str) -> ControllerResult<String> {
    let envelope: Envelope = serde_json::from_str(raw)
        .map_err(|e| ControllerError::Evaluation(format!("malformed evaluation envelope: {e}")))?;

    if let Some(err) = envelope.err {
        return Err(ControllerError::Evaluation(err));
    }
    Ok(envelope.ok.unwrap_or_default())
}
