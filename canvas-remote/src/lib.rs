//! # Canvas Remote
//!
//! Remote-control dispatch for the canvas controller.
//!
//! The remote caller speaks JSON-RPC 2.0; every wire-stable command name from
//! [`canvas_commands::Command`] is a method, plus two bookkeeping methods:
//!
//! - `initialize` - handshake, returns server info and capability namespaces
//! - `commands/list` - enumerate the command vocabulary
//!
//! The dispatcher itself is transport-agnostic: the host wires it to a
//! localhost HTTP endpoint, tests drive it directly.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod dispatch;
pub mod ready;

pub use dispatch::{CommandDispatcher, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
pub use ready::{wait_ready, ReadyProbe};
