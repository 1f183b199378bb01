//! Host event loop: the window, the webview, and main-thread dispatch.
//!
//! Everything that touches the webview runs here, on the main thread.
//! Requests arrive as [`SurfaceRequest`] user events from the cross-thread
//! surface handle; snapshot completions arrive through the IPC channel and
//! are correlated with the single outstanding request by id.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use serde::Deserialize;
use serde_json::Value;
use tao::dpi::LogicalSize;
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop};
use tao::window::{Window, WindowBuilder};
use tokio::sync::oneshot;
use url::Url;
use wry::{WebView, WebViewBuilder};

use canvas_commands::{
    a2ui, eval, ControllerError, ControllerResult, NavigationDecision, NavigationPolicy,
    NavigationTarget, OriginPolicy, Snapshot,
};

use crate::bundle::Bundle;
use crate::capture;
use crate::surface::SurfaceRequest;
use crate::HostConfig;

/// Script injected into every document: the IPC bridge and capture hook.
const INIT_SCRIPT: &str = include_str!("../assets/init.js");

/// A script message forwarded from the page to the host.
#[derive(Debug, Clone)]
pub struct ScriptMessage {
    /// URL of the page that sent the message.
    pub page: String,
    /// Flat string-keyed payload, forwarded verbatim.
    pub body: serde_json::Map<String, Value>,
}

/// Host callbacks for page-initiated events. Both run on the main thread.
pub struct HostCallbacks {
    /// Called for each accepted script message.
    pub on_script_message: Box<dyn Fn(ScriptMessage)>,
    /// Called for each intercepted deep link.
    pub on_deep_link: Box<dyn Fn(Url)>,
}

impl Default for HostCallbacks {
    fn default() -> Self {
        Self {
            on_script_message: Box::new(|message| {
                tracing::info!(page = %message.page, "script message: {:?}", message.body);
            }),
            on_deep_link: Box::new(|url| {
                tracing::info!("deep link intercepted: {url}");
            }),
        }
    }
}

/// The single outstanding snapshot request.
struct PendingSnapshot {
    id: u64,
    max_width: Option<u32>,
    reply: oneshot::Sender<ControllerResult<Snapshot>>,
}

type PendingSlot = Rc<RefCell<Option<PendingSnapshot>>>;

/// Payload of an IPC message from the page.
#[derive(Debug, Deserialize)]
#[serde(tag = "channel", rename_all = "lowercase")]
enum IpcPayload {
    /// Completion of a host-initiated capture, correlated by id.
    Snapshot {
        id: u64,
        #[serde(default, rename = "dataUrl")]
        data_url: Option<String>,
        #[serde(default)]
        error: Option<String>,
    },
    /// Page-initiated message for the host callback.
    Host {
        #[serde(default)]
        payload: serde_json::Map<String, Value>,
    },
}

/// Run the host: create the window and webview, then drive the event loop.
///
/// Takes over the calling thread. Returns early only on setup failure; once
/// the event loop starts it runs until the window closes and then exits the
/// process.
///
/// # Errors
///
/// Fails when the window or webview cannot be created, or the bundle has no
/// usable scaffold URL.
pub fn run(
    event_loop: EventLoop<SurfaceRequest>,
    config: &HostConfig,
    bundle: &Bundle,
    callbacks: HostCallbacks,
) -> anyhow::Result<()> {
    let scaffold_url = bundle.scaffold_url()?;
    let origin_policy = bundle.origin_policy();
    let navigation_policy = NavigationPolicy::new(config.deep_link_scheme.clone());

    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(
            f64::from(config.width),
            f64::from(config.height),
        ))
        .with_visible(config.start_visible)
        .build(&event_loop)?;

    let pending_snapshot: PendingSlot = Rc::new(RefCell::new(None));
    let snapshot_seq = Rc::new(Cell::new(0_u64));

    let ipc_pending = Rc::clone(&pending_snapshot);
    let on_script_message = callbacks.on_script_message;
    let on_deep_link = callbacks.on_deep_link;

    let builder = WebViewBuilder::new()
        .with_url(scaffold_url.as_str())
        .with_initialization_script(INIT_SCRIPT)
        .with_ipc_handler(move |message: wry::http::Request<String>| {
            let page = message.uri().to_string();
            handle_ipc(
                &ipc_pending,
                &origin_policy,
                on_script_message.as_ref(),
                &page,
                message.body(),
            );
        })
        .with_navigation_handler(move |url: String| match navigation_policy.decide(&url) {
            NavigationDecision::Load => true,
            NavigationDecision::Intercept(link) => {
                on_deep_link(link);
                false
            }
        });

    #[cfg(not(any(
        target_os = "linux",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
    )))]
    let webview = builder.build(&window)?;
    #[cfg(any(
        target_os = "linux",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
    ))]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window
            .default_vbox()
            .ok_or_else(|| anyhow::anyhow!("window has no default vbox for the webview"))?;
        builder.build_gtk(vbox)?
    };

    tracing::info!("Canvas surface ready, scaffold at {scaffold_url}");

    event_loop.run(move |event, _target, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                tracing::info!("Close requested, exiting");
                *control_flow = ControlFlow::Exit;
            }
            Event::UserEvent(request) => handle_request(
                request,
                &window,
                &webview,
                &scaffold_url,
                &pending_snapshot,
                &snapshot_seq,
            ),
            _ => {}
        }
    })
}

/// Service one surface request on the main thread.
fn handle_request(
    request: SurfaceRequest,
    window: &Window,
    webview: &WebView,
    scaffold_url: &Url,
    pending_snapshot: &PendingSlot,
    snapshot_seq: &Rc<Cell<u64>>,
) {
    match request {
        SurfaceRequest::Show => {
            window.set_visible(true);
            window.set_focus();
        }
        SurfaceRequest::Hide => window.set_visible(false),
        SurfaceRequest::Navigate { url, reply } => {
            let _ = reply.send(navigate(webview, scaffold_url, url.as_deref()));
        }
        SurfaceRequest::Eval { script, reply } => run_eval(webview, &script, reply),
        SurfaceRequest::Snapshot { max_width, reply } => {
            start_snapshot(webview, pending_snapshot, snapshot_seq, max_width, reply);
        }
        SurfaceRequest::A2uiPush { message, reply } => {
            let _ = reply.send(issue_script(webview, &a2ui::push_script(&message)));
        }
        SurfaceRequest::A2uiReset { reply } => {
            let _ = reply.send(issue_script(webview, &a2ui::reset_script()));
        }
    }
}

/// Resolve the navigation target and load it.
fn navigate(
    webview: &WebView,
    scaffold_url: &Url,
    raw: Option<&str>,
) -> ControllerResult<String> {
    let target = NavigationTarget::resolve(raw, scaffold_url)?.into_url(scaffold_url);
    webview
        .load_url(target.as_str())
        .map_err(|e| ControllerError::Navigation(e.to_string()))?;
    tracing::debug!("Navigated to {target}");
    Ok(target.to_string())
}

/// Issue a fire-and-forget script.
fn issue_script(webview: &WebView, script: &str) -> ControllerResult<()> {
    webview
        .evaluate_script(script)
        .map_err(|e| ControllerError::Evaluation(e.to_string()))
}

/// Evaluate a wrapped script and resolve the reply from its callback.
fn run_eval(
    webview: &WebView,
    script: &str,
    reply: oneshot::Sender<ControllerResult<String>>,
) {
    let wrapped = eval::wrap(script);
    let slot = Arc::new(Mutex::new(Some(reply)));
    let callback_slot = Arc::clone(&slot);

    let outcome = webview.evaluate_script_with_callback(&wrapped, move |raw| {
        if let Ok(mut guard) = callback_slot.lock() {
            if let Some(reply) = guard.take() {
                let _ = reply.send(eval::parse_result(&raw));
            }
        }
    });

    if let Err(e) = outcome {
        if let Ok(mut guard) = slot.lock() {
            if let Some(reply) = guard.take() {
                let _ = reply.send(Err(ControllerError::Evaluation(e.to_string())));
            }
        }
    }
}

/// Kick off a capture in the page. Only one snapshot may be outstanding.
fn start_snapshot(
    webview: &WebView,
    pending: &PendingSlot,
    seq: &Rc<Cell<u64>>,
    max_width: Option<u32>,
    reply: oneshot::Sender<ControllerResult<Snapshot>>,
) {
    if pending.borrow().is_some() {
        let _ = reply.send(Err(ControllerError::Snapshot(
            "a snapshot is already in progress".to_string(),
        )));
        return;
    }

    let id = seq.get().wrapping_add(1);
    seq.set(id);
    *pending.borrow_mut() = Some(PendingSnapshot {
        id,
        max_width,
        reply,
    });

    let script = format!("window.__canvasCapture && window.__canvasCapture({id});");
    if let Err(e) = webview.evaluate_script(&script) {
        if let Some(p) = pending.borrow_mut().take() {
            let _ = p.reply.send(Err(ControllerError::Snapshot(e.to_string())));
        }
    }
}

/// Route one IPC message from the page.
///
/// Snapshot completions are host-solicited and correlated by id; the origin
/// policy applies to page-initiated `host` traffic.
fn handle_ipc(
    pending: &PendingSlot,
    origin_policy: &OriginPolicy,
    on_script_message: &dyn Fn(ScriptMessage),
    page: &str,
    body: &str,
) {
    let payload: IpcPayload = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!("Ignoring malformed ipc message: {e}");
            return;
        }
    };

    match payload {
        IpcPayload::Snapshot {
            id,
            data_url,
            error,
        } => {
            let Some(p) = take_pending(pending, id) else {
                tracing::debug!("Dropping stale snapshot reply {id}");
                return;
            };
            let result = match (data_url, error) {
                (Some(data_url), None) => capture::finish_capture(&data_url, p.max_width),
                (_, Some(error)) => Err(ControllerError::Snapshot(error)),
                (None, None) => Err(ControllerError::Snapshot(
                    "capture hook returned nothing".to_string(),
                )),
            };
            let _ = p.reply.send(result);
        }
        IpcPayload::Host { payload } => {
            if !origin_policy.allows(page) {
                tracing::warn!(page, "Dropping script message from untrusted origin");
                return;
            }
            on_script_message(ScriptMessage {
                page: page.to_string(),
                body: payload,
            });
        }
    }
}

/// Take the pending snapshot if the reply id matches it.
fn take_pending(pending: &PendingSlot, id: u64) -> Option<PendingSnapshot> {
    let mut slot = pending.borrow_mut();
    match slot.as_ref() {
        Some(p) if p.id == id => slot.take(),
        _ => None,
    }
}
