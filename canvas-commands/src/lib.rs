//! # Canvas Commands
//!
//! Shared vocabulary for the canvas controller: the closed set of wire-stable
//! command names, their parameter payloads, and the policies every host
//! applies when driving its web-rendering surface.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               canvas-commands                │
//! ├──────────────────────────────────────────────┤
//! │  Command names   │  Parameter payloads       │
//! │  - canvas.*      │  - lenient JSON parsing   │
//! │  - canvas.a2ui.* │  - wire field names       │
//! │  - camera.*      │                           │
//! ├──────────────────────────────────────────────┤
//! │  Host policies   │  Surface seam             │
//! │  - origin filter │  - CanvasSurface trait    │
//! │  - deep links    │  - eval harness           │
//! │  - size bounding │  - A2UI forwarding        │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The command names are de-facto wire constants shared with every other host
//! implementation of this protocol; they must stay byte-stable forever.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod a2ui;
pub mod command;
pub mod error;
pub mod eval;
pub mod params;
pub mod policy;
pub mod snapshot;
pub mod surface;
pub mod target;

pub use a2ui::{JsonlBatch, A2UI_GLOBAL, READY_MARKER};
pub use command::{Command, Namespace, UnknownCommand};
pub use error::{ControllerError, ControllerResult};
pub use params::{
    parse_lenient, A2uiPushJsonlParams, A2uiPushParams, EvalParams, NavigateParams, SnapshotParams,
};
pub use policy::{NavigationDecision, NavigationPolicy, OriginPolicy, DEFAULT_DEEP_LINK_SCHEME};
pub use snapshot::{fit_width, Snapshot};
pub use surface::CanvasSurface;
pub use target::NavigationTarget;

/// Crate version, reported by the `initialize` handshake.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
