//! JSON-RPC 2.0 dispatch of canvas commands onto a surface.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use canvas_commands::{
    a2ui, parse_lenient, A2uiPushJsonlParams, A2uiPushParams, CanvasSurface, Command,
    ControllerResult, EvalParams, Namespace, NavigateParams, SnapshotParams,
};

/// JSON-RPC 2.0 request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Protocol version, expected to be "2.0".
    pub jsonrpc: String,
    /// Request ID, echoed back in the response.
    pub id: Value,
    /// Method name: a command wire name or a bookkeeping method.
    pub method: String,
    /// Opaque parameter blob for the command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Build a request for the given method.
    #[must_use]
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC 2.0 response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Protocol version, always "2.0".
    pub jsonrpc: String,
    /// Request ID this response answers.
    pub id: Value,
    /// Result object on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code.
    pub code: i32,
    /// Error message.
    pub message: String,
}

impl JsonRpcResponse {
    /// Create a success response.
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    #[must_use]
    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Method not found (JSON-RPC reserved code).
const CODE_METHOD_NOT_FOUND: i32 = -32601;
/// Surface operation failed.
const CODE_SURFACE_ERROR: i32 = -32000;

/// Maps command wire names onto a [`CanvasSurface`].
///
/// The dispatcher holds the surface behind an `Arc` and is itself cheap to
/// clone and share across transport handlers.
#[derive(Clone)]
pub struct CommandDispatcher {
    surface: Arc<dyn CanvasSurface>,
}

impl CommandDispatcher {
    /// Create a dispatcher driving the given surface.
    #[must_use]
    pub fn new(surface: Arc<dyn CanvasSurface>) -> Self {
        Self { surface }
    }

    /// The surface this dispatcher drives.
    #[must_use]
    pub fn surface(&self) -> &Arc<dyn CanvasSurface> {
        &self.surface
    }

    /// Handle one JSON-RPC request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::debug!(method = %request.method, "command request");

        match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(request.id, initialize_result()),
            "commands/list" => JsonRpcResponse::success(request.id, commands_list()),
            method => match method.parse::<Command>() {
                Ok(command) => {
                    match self.dispatch(command, request.params.as_ref()).await {
                        Ok(result) => JsonRpcResponse::success(request.id, result),
                        Err(e) => {
                            tracing::warn!(command = %command, "command failed: {e}");
                            JsonRpcResponse::error(request.id, CODE_SURFACE_ERROR, e.to_string())
                        }
                    }
                }
                Err(_) => JsonRpcResponse::error(
                    request.id,
                    CODE_METHOD_NOT_FOUND,
                    format!("Method not found: {method}"),
                ),
            },
        }
    }

    /// Route one command to the surface.
    async fn dispatch(&self, command: Command, params: Option<&Value>) -> ControllerResult<Value> {
        match command {
            Command::Show => {
                self.surface.show().await?;
                Ok(json!({ "visible": true }))
            }
            Command::Hide => {
                self.surface.hide().await?;
                Ok(json!({ "visible": false }))
            }
            Command::Navigate => {
                let params: NavigateParams = parse_lenient(params);
                let loaded = self.surface.navigate(params.url).await?;
                Ok(json!({ "loaded": loaded }))
            }
            Command::Eval => {
                let params: EvalParams = parse_lenient(params);
                let result = self.surface.eval(params.java_script).await?;
                Ok(json!({ "result": result }))
            }
            Command::Snapshot => {
                let params: SnapshotParams = parse_lenient(params);
                let snapshot = self.surface.snapshot(params.max_width_px()).await?;
                Ok(snapshot_result(&snapshot))
            }
            Command::A2uiPush => {
                let params: A2uiPushParams = parse_lenient(params);
                self.surface.a2ui_push(params.message).await?;
                Ok(json!({ "pushed": 1 }))
            }
            Command::A2uiPushJsonl => {
                let params: A2uiPushJsonlParams = parse_lenient(params);
                let batch = a2ui::parse_jsonl(&params.jsonl);
                for warning in &batch.warnings {
                    tracing::warn!("Skipping malformed A2UI line: {warning}");
                }
                let pushed = batch.messages.len();
                for message in batch.messages {
                    self.surface.a2ui_push(message).await?;
                }
                Ok(json!({ "pushed": pushed, "skipped": batch.warnings.len() }))
            }
            Command::A2uiReset => {
                self.surface.a2ui_reset().await?;
                Ok(json!({ "reset": true }))
            }
            Command::CameraSnapshot => {
                let params: SnapshotParams = parse_lenient(params);
                let snapshot = self.surface.camera_snapshot(params.max_width_px()).await?;
                Ok(snapshot_result(&snapshot))
            }
        }
    }
}

fn snapshot_result(snapshot: &canvas_commands::Snapshot) -> Value {
    json!({
        "width": snapshot.width,
        "height": snapshot.height,
        "format": "png",
        "data": snapshot.data,
    })
}

fn initialize_result() -> Value {
    json!({
        "serverInfo": {
            "name": "canvas-controller",
            "version": canvas_commands::VERSION,
        },
        "capabilities": [
            Namespace::Canvas.capability(),
            Namespace::A2ui.capability(),
        ],
    })
}

fn commands_list() -> Value {
    let commands: Vec<Value> = Command::ALL
        .into_iter()
        .map(|command| {
            json!({
                "name": command.as_str(),
                "description": command.describe(),
                "capability": command.namespace().capability(),
            })
        })
        .collect();
    json!({ "commands": commands })
}
