//! The swap request graph.
//!
//! A partial function `RoomId → RoomId`: every room has at most one
//! outgoing request, but any number of rooms may want the same room.

use std::collections::BTreeMap;

use roomswap_protocol::{RoomId, SwapEdge};

/// Pending swap requests, one per requesting room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapGraph {
    edges: BTreeMap<RoomId, RoomId>,
}

impl SwapGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the request `from → to`, replacing any request `from`
    /// already had. Returns the replaced target.
    pub fn set(&mut self, from: RoomId, to: RoomId) -> Option<RoomId> {
        self.edges.insert(from, to)
    }

    /// Drops the request of `from`, if it has one.
    pub fn remove(&mut self, from: &RoomId) -> Option<RoomId> {
        self.edges.remove(from)
    }

    /// The room `from` wants to move into.
    pub fn target(&self, from: &RoomId) -> Option<&RoomId> {
        self.edges.get(from)
    }

    /// Returns `true` if `from` has a pending request.
    pub fn contains(&self, from: &RoomId) -> bool {
        self.edges.contains_key(from)
    }

    /// Every room with a pending request, in room-ID order.
    ///
    /// Passes iterate this copy, never the live map, because executing a
    /// cycle deletes edges.
    pub fn start_rooms(&self) -> Vec<RoomId> {
        self.edges.keys().cloned().collect()
    }

    /// All requests as edges, in room-ID order.
    pub fn edges(&self) -> Vec<SwapEdge> {
        self.edges
            .iter()
            .map(|(from, to)| SwapEdge {
                from: from.clone(),
                to: to.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
