//! # Canvas Host
//!
//! Desktop host binary: the webview surface plus the localhost control
//! server that remote callers drive it through.

use std::sync::Arc;
use std::thread;

use clap::Parser;
use tao::event_loop::EventLoopBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use canvas_host::{app, control, Bundle, CliArgs, HostConfig, SurfaceRequest, WebViewSurface};
use canvas_remote::CommandDispatcher;

/// Initialize structured tracing.
///
/// Set `RUST_LOG` to control log levels. Set `RUST_LOG_FORMAT=json` for JSON
/// output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,canvas_host=debug,tower_http=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = HostConfig::from(args);
    tracing::info!(
        "Window config: {}x{} \"{}\"",
        config.width,
        config.height,
        config.title
    );

    let bundle = Bundle::open(&config.bundle_dir)?;
    tracing::info!("Bundled pages at {}", bundle.dir().display());

    // The event loop owns the main thread; the proxy is the only way back in.
    let event_loop = EventLoopBuilder::<SurfaceRequest>::with_user_event().build();
    let surface = Arc::new(WebViewSurface::new(event_loop.create_proxy()));
    let dispatcher = CommandDispatcher::new(surface);

    let port = config.port;
    let control_dispatcher = dispatcher.clone();
    thread::Builder::new()
        .name("control-server".to_string())
        .spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    tracing::error!("Failed to start control runtime: {e}");
                    return;
                }
            };
            if let Err(e) = runtime.block_on(control::serve(port, control_dispatcher)) {
                tracing::error!("Control server exited: {e}");
            }
        })?;

    app::run(event_loop, &config, &bundle, app::HostCallbacks::default())
}
