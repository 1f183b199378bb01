//! # Canvas Host
//!
//! Native desktop host for the canvas controller.
//!
//! The host owns a tao window with a wry webview showing the bundled
//! scaffold, and exposes the command protocol on a localhost control
//! endpoint. Every surface operation hops onto the main thread through the
//! event-loop proxy; the control server runs on a background tokio runtime.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p canvas-host
//! ```
//!
//! Then drive it:
//!
//! ```bash
//! curl -s http://127.0.0.1:9474/rpc \
//!   -H 'content-type: application/json' \
//!   -d '{"jsonrpc":"2.0","id":1,"method":"canvas.show"}'
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` / `HostConfig` - configuration parsed with clap
//! - `Bundle` - the on-disk scaffold pages and the origin policy over them
//! - `WebViewSurface` - cross-thread [`canvas_commands::CanvasSurface`] handle
//! - `app` - the tao event loop and webview wiring
//! - `control` - the localhost axum server

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod bundle;
pub mod capture;
pub mod control;
pub mod surface;

pub use app::{HostCallbacks, ScriptMessage};
pub use bundle::Bundle;
pub use surface::{SurfaceRequest, WebViewSurface};

use std::path::PathBuf;

use canvas_commands::DEFAULT_DEEP_LINK_SCHEME;
use clap::Parser;

/// Default port for the control server.
pub const DEFAULT_PORT: u16 = 9474;

/// Command-line arguments for canvas-host.
#[derive(Debug, Clone, Parser)]
#[command(name = "canvas-host")]
#[command(about = "Canvas controller desktop host")]
#[command(version)]
pub struct CliArgs {
    /// Control server port (bound to localhost only)
    #[arg(long, env = "CANVAS_CONTROL_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Window width in pixels
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, default_value = "720")]
    pub height: u32,

    /// Directory holding the bundled scaffold pages
    #[arg(long, env = "CANVAS_BUNDLE_DIR")]
    pub bundle_dir: Option<PathBuf>,

    /// Custom URL scheme intercepted as a host deep link
    #[arg(long, default_value = DEFAULT_DEEP_LINK_SCHEME)]
    pub deep_link_scheme: String,

    /// Start with the surface visible instead of waiting for canvas.show
    #[arg(long)]
    pub visible: bool,
}

/// Host configuration.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
    /// Control server port.
    pub port: u16,
    /// Directory holding the bundled scaffold pages.
    pub bundle_dir: PathBuf,
    /// Custom URL scheme intercepted as a host deep link.
    pub deep_link_scheme: String,
    /// Whether the window starts visible.
    pub start_visible: bool,
}

impl HostConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Canvas".to_string(),
            port: DEFAULT_PORT,
            bundle_dir: bundle::default_dir(),
            deep_link_scheme: DEFAULT_DEEP_LINK_SCHEME.to_string(),
            start_visible: false,
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<CliArgs> for HostConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            title: "Canvas".to_string(),
            port: args.port,
            bundle_dir: args.bundle_dir.unwrap_or_else(bundle::default_dir),
            deep_link_scheme: args.deep_link_scheme,
            start_visible: args.visible,
        }
    }
}
