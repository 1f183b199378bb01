//! Error types for controller operations.
//!
//! All of these are local and non-fatal: a failed evaluation or snapshot
//! surfaces as an error result to the async caller and the surface keeps
//! running.

use thiserror::Error;

/// Result type for controller operations.
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Errors that can occur while driving the canvas surface.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The surface reference is gone (the host event loop exited or was
    /// never started).
    #[error("Canvas surface is gone: {0}")]
    SurfaceGone(String),

    /// Script evaluation failed inside the page.
    #[error("Script evaluation failed: {0}")]
    Evaluation(String),

    /// Snapshot capture or encoding failed.
    #[error("Snapshot failed: {0}")]
    Snapshot(String),

    /// The navigation target could not be resolved or loaded.
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// The command is not supported by this host.
    #[error("Unsupported command: {0}")]
    Unsupported(String),

    /// Payload serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
