//! Integration tests for the control server over a mock surface.
//!
//! Exercises the HTTP surface of the host (routing, JSON-RPC envelope,
//! health probes) without a real webview.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use canvas_commands::{
    fit_width, CanvasSurface, ControllerError, ControllerResult, Snapshot,
};
use canvas_host::control::{router, ControlState};
use canvas_remote::CommandDispatcher;

/// Surface stub with a fixed natural size; eval answers `true` to the
/// readiness probe.
struct StubSurface {
    broken: bool,
}

#[async_trait]
impl CanvasSurface for StubSurface {
    async fn show(&self) -> ControllerResult<()> {
        Ok(())
    }

    async fn hide(&self) -> ControllerResult<()> {
        Ok(())
    }

    async fn navigate(&self, url: Option<String>) -> ControllerResult<String> {
        Ok(url.unwrap_or_else(|| "file:///bundle/scaffold.html".to_string()))
    }

    async fn eval(&self, script: String) -> ControllerResult<String> {
        if self.broken {
            return Err(ControllerError::SurfaceGone("event loop stopped".into()));
        }
        if script == "true" {
            Ok("true".to_string())
        } else {
            Ok(String::new())
        }
    }

    async fn snapshot(&self, max_width: Option<u32>) -> ControllerResult<Snapshot> {
        let (width, height) = fit_width(1280, 720, max_width);
        Ok(Snapshot {
            width,
            height,
            data: "cGl4ZWxz".to_string(),
        })
    }

    async fn a2ui_push(&self, _message: Value) -> ControllerResult<()> {
        Ok(())
    }

    async fn a2ui_reset(&self) -> ControllerResult<()> {
        Ok(())
    }
}

fn test_router(broken: bool) -> axum::Router {
    let dispatcher = CommandDispatcher::new(Arc::new(StubSurface { broken }));
    router(ControlState { dispatcher }, 9474)
}

async fn rpc(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/rpc")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}

#[tokio::test]
async fn test_rpc_snapshot_roundtrip() {
    let (status, body) = rpc(
        test_router(false),
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "canvas.snapshot",
            "params": { "maxWidth": 640 }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["id"], 1);
    assert_eq!(body["result"]["width"], 640);
    assert_eq!(body["result"]["height"], 360);
    assert_eq!(body["result"]["format"], "png");
}

#[tokio::test]
async fn test_rpc_unknown_method() {
    let (status, body) = rpc(
        test_router(false),
        json!({
            "jsonrpc": "2.0",
            "id": "x",
            "method": "canvas.doesNotExist"
        }),
    )
    .await;

    // JSON-RPC errors still travel as HTTP 200; the error lives in the body.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32601);
}

#[tokio::test]
async fn test_rpc_surface_error_is_reported() {
    let (status, body) = rpc(
        test_router(true),
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "canvas.eval",
            "params": { "javaScript": "1 + 1" }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32000);
    assert!(body["error"]["message"]
        .as_str()
        .expect("message")
        .contains("gone"));
}

#[tokio::test]
async fn test_liveness_probe() {
    let response = test_router(false)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health/live")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_probe_healthy() {
    let response = test_router(false)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health/ready")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["surface"], true);
}

#[tokio::test]
async fn test_readiness_probe_unhealthy_when_surface_gone() {
    let response = test_router(true)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health/ready")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_initialize_over_http() {
    let (status, body) = rpc(
        test_router(false),
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let capabilities = body["result"]["capabilities"].as_array().expect("array");
    assert!(capabilities.contains(&json!("canvas.*")));
}
