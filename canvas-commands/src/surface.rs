//! The seam between the command dispatcher and a concrete host surface.

use async_trait::async_trait;
use serde_json::Value;

use crate::command::Command;
use crate::error::{ControllerError, ControllerResult};
use crate::snapshot::Snapshot;

/// A single web-rendering surface driven by the command protocol.
///
/// Implementations own the platform webview and are responsible for hopping
/// onto their UI thread; callers may invoke these methods from any thread.
/// Evaluation and snapshot are single-outstanding-result operations: the
/// future resolves when the platform delivers the result or the error, and
/// there is no queuing or cancellation.
#[async_trait]
pub trait CanvasSurface: Send + Sync {
    /// Make the surface visible.
    async fn show(&self) -> ControllerResult<()>;

    /// Hide the surface.
    async fn hide(&self) -> ControllerResult<()>;

    /// Navigate to `url`, or back to the bundled scaffold when the URL is
    /// absent, empty, or `/`. Returns the URL that was actually loaded.
    async fn navigate(&self, url: Option<String>) -> ControllerResult<String>;

    /// Evaluate a script in the page and return its string result.
    async fn eval(&self, script: String) -> ControllerResult<String>;

    /// Capture the visible surface as a PNG, bounded to `max_width`.
    async fn snapshot(&self, max_width: Option<u32>) -> ControllerResult<Snapshot>;

    /// Forward one structured UI-update message into the page runtime.
    async fn a2ui_push(&self, message: Value) -> ControllerResult<()>;

    /// Reset the page's UI-update runtime.
    async fn a2ui_reset(&self) -> ControllerResult<()>;

    /// Capture a camera frame, bounded to `max_width`.
    ///
    /// Hosts without a camera keep this default, which reports the command
    /// as unsupported.
    async fn camera_snapshot(&self, _max_width: Option<u32>) -> ControllerResult<Snapshot> {
        Err(ControllerError::Unsupported(
            Command::CameraSnapshot.as_str().to_string(),
        ))
    }
}
