//! Pass configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PassConfig
// ---------------------------------------------------------------------------

/// Settings for a [`SwapEngine`](crate::SwapEngine) and the passes it runs.
///
/// `#[serde(default)]` means a JSON config only has to name the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PassConfig {
    /// Hard cap on the number of rooms a single walk may visit.
    ///
    /// The effective bound is the smaller of this and the graph size plus
    /// one; a walk that exceeds it aborts the pass.
    pub max_walk_len: usize,

    /// What to do when a room with a pending request asks again.
    pub edge_policy: EdgePolicy,

    /// Which way occupants move around an executed cycle.
    pub rotation: RotationDirection,

    /// Capacity of the service command channel.
    pub channel_size: usize,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            max_walk_len: 10_000,
            edge_policy: EdgePolicy::Overwrite,
            rotation: RotationDirection::Predecessor,
            channel_size: 64,
        }
    }
}

impl PassConfig {
    /// The walk bound to use against a graph with `edges` requests.
    pub fn walk_limit(&self, edges: usize) -> usize {
        self.max_walk_len.min(edges.saturating_add(1))
    }
}

// ---------------------------------------------------------------------------
// EdgePolicy
// ---------------------------------------------------------------------------

/// Handling of a second request from a room that already has one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "PascalCase")]
pub enum EdgePolicy {
    /// The new request replaces the old one.
    #[default]
    Overwrite,
    /// The new request is refused; the old one stays.
    Reject,
}

impl fmt::Display for EdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => write!(f, "Overwrite"),
            Self::Reject => write!(f, "Reject"),
        }
    }
}

// ---------------------------------------------------------------------------
// RotationDirection
// ---------------------------------------------------------------------------

/// Where the occupant of `path[i]` ends up when a cycle executes.
///
/// For the cycle `R105 → R106 → R107 → R105` holding `X, Y, Z`:
///
/// ```text
/// Predecessor:  R105=Y  R106=Z  R107=X
/// Successor:    R105=Z  R106=X  R107=Y
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "PascalCase")]
pub enum RotationDirection {
    /// The occupant of `path[i]` moves into `path[i - 1]`. This matches
    /// the allocation behaviour hostels have relied on so far.
    #[default]
    Predecessor,
    /// The occupant of `path[i]` moves into `path[i + 1]`, the room its
    /// own request names.
    Successor,
}

impl RotationDirection {
    /// Index of the room that receives the occupant of `path[i]`.
    pub fn destination(self, i: usize, n: usize) -> usize {
        match self {
            Self::Predecessor => (i + n - 1) % n,
            Self::Successor => (i + 1) % n,
        }
    }
}

impl fmt::Display for RotationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predecessor => write!(f, "Predecessor"),
            Self::Successor => write!(f, "Successor"),
        }
    }
}
