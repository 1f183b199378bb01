//! Localhost control server exposing the command protocol.
//!
//! Binds to 127.0.0.1 only: the controller is driven from the local
//! machine, never from the network.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use canvas_remote::{CommandDispatcher, JsonRpcRequest, JsonRpcResponse};

/// How long the readiness probe waits for the surface to answer.
const READINESS_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Shared control server state.
#[derive(Clone)]
pub struct ControlState {
    /// Command dispatcher driving the surface.
    pub dispatcher: CommandDispatcher,
}

/// Health status response.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// Overall status: "healthy" or "unhealthy".
    pub status: &'static str,
    /// Host version.
    pub version: &'static str,
    /// Whether the surface answered the probe evaluation.
    pub surface: bool,
}

/// Build a CORS layer that only allows localhost origins.
fn build_cors_layer(port: u16) -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        format!("http://localhost:{port}"),
        format!("http://127.0.0.1:{port}"),
    ]
    .iter()
    .filter_map(|origin| origin.parse().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Build the control router.
#[must_use]
pub fn router(state: ControlState, port: u16) -> Router {
    Router::new()
        .route("/rpc", post(rpc_handler))
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(build_cors_layer(port))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Bind to localhost and serve until the process exits.
///
/// # Errors
///
/// Fails when the port cannot be bound or the server stops unexpectedly.
pub async fn serve(port: u16, dispatcher: CommandDispatcher) -> anyhow::Result<()> {
    let app = router(ControlState { dispatcher }, port);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Control server listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

/// JSON-RPC command endpoint.
#[tracing::instrument(name = "rpc", skip(state, request), fields(method = %request.method))]
async fn rpc_handler(
    State(state): State<ControlState>,
    Json(request): Json<JsonRpcRequest>,
) -> Json<JsonRpcResponse> {
    Json(state.dispatcher.handle_request(request).await)
}

/// Liveness probe: the process is running.
#[tracing::instrument(name = "liveness_probe")]
async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: the surface still answers an evaluation.
#[tracing::instrument(name = "readiness_probe", skip(state))]
async fn readiness(State(state): State<ControlState>) -> (StatusCode, Json<HealthStatus>) {
    let probe = state.dispatcher.surface().eval("true".to_string());
    let surface_ok = matches!(
        tokio::time::timeout(READINESS_PROBE_TIMEOUT, probe).await,
        Ok(Ok(result)) if result == "true"
    );

    let status = HealthStatus {
        status: if surface_ok { "healthy" } else { "unhealthy" },
        version: env!("CARGO_PKG_VERSION"),
        surface: surface_ok,
    };

    let code = if surface_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(status))
}
