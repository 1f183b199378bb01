//! Wire-stable command names for the remote-control protocol.
//!
//! Each command is a string identifier grouped by namespace prefix. The same
//! identifiers are implemented by every host of this protocol, so the string
//! form of a variant is a contract: it is checked for byte equality by the
//! remote caller and must never change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Namespace prefix a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Surface lifecycle and content commands (`canvas.`).
    Canvas,
    /// Structured UI-update forwarding into the page runtime (`canvas.a2ui.`).
    A2ui,
    /// Camera capture commands (`camera.`), reserved for hosts with a camera.
    Camera,
}

impl Namespace {
    /// Wildcard capability string advertised for this namespace.
    #[must_use]
    pub const fn capability(self) -> &'static str {
        match self {
            Self::Canvas => "canvas.*",
            Self::A2ui => "canvas.a2ui.*",
            Self::Camera => "camera.*",
        }
    }
}

/// A command understood by the canvas controller.
///
/// Commands are stateless value identifiers: they carry no payload themselves
/// and are only checked for equality. Parameters travel separately as an
/// opaque JSON blob (see [`crate::params`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Make the surface visible.
    Show,
    /// Hide the surface.
    Hide,
    /// Load a URL, or reset to the bundled scaffold when the URL is empty.
    Navigate,
    /// Evaluate JavaScript in the page and return its string result.
    Eval,
    /// Capture the visible surface as a size-bounded, base64-encoded PNG.
    Snapshot,
    /// Forward one structured UI-update message into the page runtime.
    A2uiPush,
    /// Forward a batch of newline-delimited UI-update messages.
    A2uiPushJsonl,
    /// Reset the page's UI-update runtime.
    A2uiReset,
    /// Capture a camera frame. Hosts without a camera reject this.
    CameraSnapshot,
}

impl Command {
    /// Every defined command, in listing order.
    pub const ALL: [Self; 9] = [
        Self::Show,
        Self::Hide,
        Self::Navigate,
        Self::Eval,
        Self::Snapshot,
        Self::A2uiPush,
        Self::A2uiPushJsonl,
        Self::A2uiReset,
        Self::CameraSnapshot,
    ];

    /// The wire name of this command.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Show => "canvas.show",
            Self::Hide => "canvas.hide",
            Self::Navigate => "canvas.navigate",
            Self::Eval => "canvas.eval",
            Self::Snapshot => "canvas.snapshot",
            Self::A2uiPush => "canvas.a2ui.push",
            Self::A2uiPushJsonl => "canvas.a2ui.pushJSONL",
            Self::A2uiReset => "canvas.a2ui.reset",
            Self::CameraSnapshot => "camera.snapshot",
        }
    }

    /// The namespace this command belongs to.
    #[must_use]
    pub const fn namespace(self) -> Namespace {
        match self {
            Self::Show | Self::Hide | Self::Navigate | Self::Eval | Self::Snapshot => {
                Namespace::Canvas
            }
            Self::A2uiPush | Self::A2uiPushJsonl | Self::A2uiReset => Namespace::A2ui,
            Self::CameraSnapshot => Namespace::Camera,
        }
    }

    /// Short human description used in command listings.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Show => "Make the canvas surface visible",
            Self::Hide => "Hide the canvas surface",
            Self::Navigate => "Load a URL, or the bundled scaffold when the URL is empty",
            Self::Eval => "Evaluate JavaScript in the page and return its string result",
            Self::Snapshot => "Capture the visible surface as a base64-encoded PNG",
            Self::A2uiPush => "Push one structured UI-update message into the page",
            Self::A2uiPushJsonl => "Push a batch of newline-delimited UI-update messages",
            Self::A2uiReset => "Reset the page's UI-update runtime",
            Self::CameraSnapshot => "Capture a camera frame as a base64-encoded PNG",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a defined command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}
