//! A2UI forwarding: the application-to-UI update channel.
//!
//! The bundled scaffold exposes a small runtime at `window.__a2ui` with
//! `push(message)` and `reset()`. The controller forwards opaque JSON
//! messages into it and never interprets the messages itself; the page
//! runtime owns their meaning.

use serde_json::Value;

/// Global object the scaffold exposes for UI updates.
pub const A2UI_GLOBAL: &str = "__a2ui";

/// Expression that is `true` once the page runtime is ready to receive
/// messages. Used by the readiness probe.
pub const READY_MARKER: &str =
    "typeof window.__a2ui === 'object' && typeof window.__a2ui.push === 'function'";

/// Result of splitting a JSONL batch into messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonlBatch {
    /// Parsed messages in input order.
    pub messages: Vec<Value>,
    /// Lines that failed to parse, with the parse error text.
    pub warnings: Vec<String>,
}

/// Split newline-delimited JSON into individual messages.
///
/// Blank lines are skipped. Malformed lines are collected as warnings
/// rather than failing the whole batch.
#[must_use]
pub fn parse_jsonl(input: &str) -> JsonlBatch {
    let mut batch = JsonlBatch::default();
    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(value) => batch.messages.push(value),
            Err(e) => batch.warnings.push(format!("line {}: {e}", idx + 1)),
        }
    }
    batch
}

/// Script that pushes one message into the page runtime.
///
/// The message is embedded as a JSON literal, which is valid JavaScript. A
/// page without the runtime ignores the push.
#[must_use]
pub fn push_script(message: &Value) -> String {
    format!("window.{A2UI_GLOBAL} && window.{A2UI_GLOBAL}.push({message});")
}

/// Script that resets the page runtime.
#[must_use]
pub fn reset_script() -> String {
    format!("window.{A2UI_GLOBAL} && window.{A2UI_GLOBAL}.reset();")
}
