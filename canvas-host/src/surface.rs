//! Cross-thread handle to the webview surface.
//!
//! The webview lives on the main thread inside the event loop. This handle
//! implements [`CanvasSurface`] by hopping every operation onto that thread
//! as a typed user event; result-bearing operations carry a oneshot reply
//! channel and the caller suspends until the main thread answers.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tao::event_loop::EventLoopProxy;
use tokio::sync::oneshot;

use canvas_commands::{CanvasSurface, ControllerError, ControllerResult, Snapshot};

/// A surface operation hopped onto the main thread.
pub enum SurfaceRequest {
    /// Make the window visible.
    Show,
    /// Hide the window.
    Hide,
    /// Load a URL, or the scaffold when absent/empty.
    Navigate {
        /// Raw `url` parameter.
        url: Option<String>,
        /// Reply with the URL actually loaded.
        reply: oneshot::Sender<ControllerResult<String>>,
    },
    /// Evaluate a script and reply with its string result.
    Eval {
        /// Script source.
        script: String,
        /// Reply with the stringified completion value.
        reply: oneshot::Sender<ControllerResult<String>>,
    },
    /// Capture a snapshot bounded to `max_width`.
    Snapshot {
        /// Width bound in pixels.
        max_width: Option<u32>,
        /// Reply with the finished snapshot.
        reply: oneshot::Sender<ControllerResult<Snapshot>>,
    },
    /// Push one UI-update message into the page runtime.
    A2uiPush {
        /// Opaque message, forwarded verbatim.
        message: Value,
        /// Reply once the push script was issued.
        reply: oneshot::Sender<ControllerResult<()>>,
    },
    /// Reset the page runtime.
    A2uiReset {
        /// Reply once the reset script was issued.
        reply: oneshot::Sender<ControllerResult<()>>,
    },
}

/// Cross-thread [`CanvasSurface`] handle backed by the event-loop proxy.
pub struct WebViewSurface {
    proxy: Mutex<EventLoopProxy<SurfaceRequest>>,
}

impl WebViewSurface {
    /// Wrap an event-loop proxy.
    #[must_use]
    pub fn new(proxy: EventLoopProxy<SurfaceRequest>) -> Self {
        Self {
            proxy: Mutex::new(proxy),
        }
    }

    fn send(&self, request: SurfaceRequest) -> ControllerResult<()> {
        let proxy = self
            .proxy
            .lock()
            .map_err(|_| ControllerError::SurfaceGone("surface handle poisoned".to_string()))?;
        proxy
            .send_event(request)
            .map_err(|_| ControllerError::SurfaceGone("host event loop is not running".to_string()))
    }

    async fn roundtrip<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<ControllerResult<T>>) -> SurfaceRequest,
    ) -> ControllerResult<T> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx))?;
        rx.await
            .map_err(|_| ControllerError::SurfaceGone("host dropped the reply channel".to_string()))?
    }
}

#[async_trait]
impl CanvasSurface for WebViewSurface {
    async fn show(&self) -> ControllerResult<()> {
        self.send(SurfaceRequest::Show)
    }

    async fn hide(&self) -> ControllerResult<()> {
        self.send(SurfaceRequest::Hide)
    }

    async fn navigate(&self, url: Option<String>) -> ControllerResult<String> {
        self.roundtrip(|reply| SurfaceRequest::Navigate { url, reply })
            .await
    }

    async fn eval(&self, script: String) -> ControllerResult<String> {
        self.roundtrip(|reply| SurfaceRequest::Eval { script, reply })
            .await
    }

    async fn snapshot(&self, max_width: Option<u32>) -> ControllerResult<Snapshot> {
        self.roundtrip(|reply| SurfaceRequest::Snapshot { max_width, reply })
            .await
    }

    async fn a2ui_push(&self, message: Value) -> ControllerResult<()> {
        self.roundtrip(|reply| SurfaceRequest::A2uiPush { message, reply })
            .await
    }

    async fn a2ui_reset(&self) -> ControllerResult<()> {
        self.roundtrip(|reply| SurfaceRequest::A2uiReset { reply })
            .await
    }
}
