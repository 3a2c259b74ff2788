//! Cycle detection over the swap request graph.
//!
//! Because every room has at most one outgoing request, a walk from any
//! room is a single path: it either loops (a swap cycle) or stops (a
//! chain). No branching, no backtracking.

use std::collections::{BTreeSet, HashMap};

use roomswap_protocol::RoomId;

use crate::{GraphError, OccupancyStore, SwapGraph};

/// Rooms already classified during the current pass.
pub type ProcessedSet = BTreeSet<RoomId>;

/// How a walk ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkResult {
    /// The walk closed a loop. The rooms are in walk order, starting at
    /// the room the loop returns to.
    Cycle(Vec<RoomId>),
    /// The walk stopped without closing: a room with no request, a room
    /// handled earlier in the pass, or a room that isn't registered.
    Chain(Vec<RoomId>),
}

impl WalkResult {
    /// The rooms visited, whichever way the walk ended.
    pub fn path(&self) -> &[RoomId] {
        match self {
            Self::Cycle(path) | Self::Chain(path) => path,
        }
    }

    pub fn into_path(self) -> Vec<RoomId> {
        match self {
            Self::Cycle(path) | Self::Chain(path) => path,
        }
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Cycle(_))
    }
}

/// Walks the request graph without mutating it.
pub struct CycleDetector<'a, S: OccupancyStore> {
    graph: &'a SwapGraph,
    rooms: &'a S,
    limit: usize,
}

impl<'a, S: OccupancyStore> CycleDetector<'a, S> {
    /// `limit` is the most rooms a walk may visit before the graph is
    /// declared inconsistent.
    pub fn new(graph: &'a SwapGraph, rooms: &'a S, limit: usize) -> Self {
        Self {
            graph,
            rooms,
            limit,
        }
    }

    /// Follows requests from `start` until the walk closes or stops.
    ///
    /// A start room that isn't registered is a single-room chain, the same
    /// as an unregistered room reached mid-walk. No cycle returned from
    /// here ever contains a room without an occupant.
    ///
    /// # Errors
    /// If the walk visits more than `limit` rooms:
    /// - [`GraphError::WalkLimitExceeded`] when `limit` is below the
    ///   number of requests, i.e. the configured cap was hit;
    /// - [`GraphError::Inconsistent`] otherwise. With one request per
    ///   room that can't happen on a sound graph, so the pass is aborted
    ///   rather than trusted.
    pub fn walk(
        &self,
        start: &RoomId,
        processed: &ProcessedSet,
    ) -> Result<WalkResult, GraphError> {
        if !self.rooms.contains(start) {
            return Ok(WalkResult::Chain(vec![start.clone()]));
        }

        let mut path: Vec<RoomId> = Vec::new();
        // Room → its index in `path`.
        let mut seen: HashMap<RoomId, usize> = HashMap::new();
        let mut current = start.clone();

        loop {
            if let Some(&first) = seen.get(&current) {
                // Entered a loop that doesn't pass through `start`.
                return Ok(WalkResult::Cycle(path.split_off(first)));
            }
            if path.len() >= self.limit {
                return Err(self.limit_error(start));
            }

            seen.insert(current.clone(), path.len());
            path.push(current.clone());

            let Some(next) = self.graph.target(&current) else {
                return Ok(WalkResult::Chain(path));
            };
            if next == start {
                return Ok(WalkResult::Cycle(path));
            }
            if !self.graph.contains(next)
                || processed.contains(next)
                || !self.rooms.contains(next)
            {
                return Ok(WalkResult::Chain(path));
            }

            current = next.clone();
        }
    }

    // Every room on a walk but the last has a request, so a sound graph
    // never needs more than `graph.len() + 1` rooms.
    fn limit_error(&self, start: &RoomId) -> GraphError {
        let start = start.clone();
        let limit = self.limit;
        if limit <= self.graph.len() {
            GraphError::WalkLimitExceeded { start, limit }
        } else {
            GraphError::Inconsistent { start, limit }
        }
    }
}
