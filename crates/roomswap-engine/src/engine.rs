//! `SwapEngine`: the rooms and requests a pass operates on.

use roomswap_protocol::{
    CycleRecord, OccupantId, PassReport, RoomEntry, RoomId, StateReport, StateRow,
    SwapEdge, SwapSnapshot,
};

use crate::{
    EdgePolicy, EngineError, OccupancyStore, PassConfig, RoomRegistry, SwapGraph,
    execute, run_pass,
};

/// Owns one occupancy store and one request graph.
///
/// All mutation goes through `&mut self`, so a pass can never overlap
/// another pass or a request change on the same engine. To share an
/// engine between tasks, wrap it in the `roomswap` service actor.
#[derive(Debug, Clone)]
pub struct SwapEngine<S: OccupancyStore = RoomRegistry> {
    rooms: S,
    graph: SwapGraph,
    config: PassConfig,
}

impl SwapEngine<RoomRegistry> {
    /// Creates an engine with no rooms and no requests.
    pub fn new(config: PassConfig) -> Self {
        Self::with_store(RoomRegistry::new(), config)
    }

    /// Loads the collaborator's snapshot.
    ///
    /// Requests are admitted in order through [`submit_request`](Self::submit_request),
    /// so the configured [`EdgePolicy`] applies to duplicates in the
    /// snapshot too.
    ///
    /// # Errors
    /// [`EngineError::DuplicateRoom`] if a room is listed twice, or
    /// [`EngineError::DuplicateRequest`] under `EdgePolicy::Reject`.
    pub fn from_snapshot(
        snapshot: SwapSnapshot,
        config: PassConfig,
    ) -> Result<Self, EngineError> {
        let mut rooms = RoomRegistry::new();
        for entry in snapshot.rooms {
            let room_id = entry.room_id.clone();
            if rooms.insert(entry).is_some() {
                return Err(EngineError::DuplicateRoom(room_id));
            }
        }

        let mut engine = Self::with_store(rooms, config);
        for edge in snapshot.requests {
            engine.submit_request(edge)?;
        }
        tracing::info!(
            rooms = engine.rooms.len(),
            requests = engine.graph.len(),
            "swap engine loaded"
        );
        Ok(engine)
    }

    /// Registers a room or replaces its occupant. Returns the previous
    /// occupant.
    pub fn insert_room(&mut self, entry: RoomEntry) -> Option<OccupantId> {
        self.rooms.insert(entry)
    }

    /// Removes a room that no longer has an occupant, along with its own
    /// pending request. Requests from other rooms that target it stay; a
    /// walk treats the missing room as a dead end.
    pub fn vacate(&mut self, room: &RoomId) -> Option<OccupantId> {
        self.graph.remove(room);
        self.rooms.remove(room)
    }
}

impl<S: OccupancyStore> SwapEngine<S> {
    /// Creates an engine on top of an existing store.
    pub fn with_store(rooms: S, config: PassConfig) -> Self {
        Self {
            rooms,
            graph: SwapGraph::new(),
            config,
        }
    }

    pub fn config(&self) -> &PassConfig {
        &self.config
    }

    pub fn rooms(&self) -> &S {
        &self.rooms
    }

    pub fn graph(&self) -> &SwapGraph {
        &self.graph
    }

    /// The occupant of `room`, if registered.
    pub fn occupant(&self, room: &RoomId) -> Option<&OccupantId> {
        self.rooms.occupant(room)
    }

    /// The room `room`'s occupant has asked to move into, if any.
    pub fn pending_target(&self, room: &RoomId) -> Option<&RoomId> {
        self.graph.target(room)
    }

    /// Admits a request the collaborator has already validated.
    ///
    /// Returns the request it replaced, if any.
    ///
    /// # Errors
    /// [`EngineError::DuplicateRequest`] if `edge.from` already has a
    /// request and the policy is [`EdgePolicy::Reject`].
    pub fn submit_request(&mut self, edge: SwapEdge) -> Result<Option<RoomId>, EngineError> {
        if self.config.edge_policy == EdgePolicy::Reject {
            if let Some(existing) = self.graph.target(&edge.from) {
                tracing::warn!(
                    from = %edge.from,
                    to = %edge.to,
                    %existing,
                    "duplicate swap request rejected"
                );
                return Err(EngineError::DuplicateRequest {
                    from: edge.from,
                    existing: existing.clone(),
                });
            }
        }

        tracing::debug!(from = %edge.from, to = %edge.to, "swap request admitted");
        Ok(self.graph.set(edge.from, edge.to))
    }

    /// Withdraws the pending request of `from`. Returns its target.
    pub fn withdraw_request(&mut self, from: &RoomId) -> Option<RoomId> {
        let removed = self.graph.remove(from);
        if removed.is_some() {
            tracing::debug!(%from, "swap request withdrawn");
        }
        removed
    }

    /// Runs a pass over the given start rooms, in order.
    pub fn run_pass(&mut self, candidates: &[RoomId]) -> Result<PassReport, EngineError> {
        run_pass(&mut self.graph, &mut self.rooms, candidates, &self.config)
    }

    /// Runs a pass over every room that currently has a request.
    pub fn run_pass_all(&mut self) -> Result<PassReport, EngineError> {
        let candidates = self.graph.start_rooms();
        self.run_pass(&candidates)
    }

    /// Executes one known cycle outside of a pass.
    ///
    /// # Errors
    /// [`EngineError::NotACycle`] unless every room in `path` requests the
    /// next one and the last requests the first. Nothing is changed then.
    pub fn execute_cycle(&mut self, path: &[RoomId]) -> Result<CycleRecord, EngineError> {
        let closed = !path.is_empty()
            && path.iter().enumerate().all(|(i, room)| {
                let next = &path[(i + 1) % path.len()];
                self.graph.target(room) == Some(next)
            });
        if !closed {
            return Err(EngineError::NotACycle(path.to_vec()));
        }

        let record = execute(path, &mut self.rooms, &mut self.graph, self.config.rotation)?;
        tracing::info!(cycle = %record, "swap executed");
        Ok(record)
    }

    /// The current rooms and requests, in the collaborator's format.
    pub fn snapshot(&self) -> SwapSnapshot {
        SwapSnapshot {
            rooms: self.rooms.entries(),
            requests: self.graph.edges(),
        }
    }

    /// The room table: every room, its occupant, its pending request.
    pub fn state_report(&self) -> StateReport {
        let rows = self
            .rooms
            .entries()
            .into_iter()
            .map(|entry| StateRow {
                wants: self.graph.target(&entry.room_id).cloned(),
                room_id: entry.room_id,
                occupant: entry.occupant,
            })
            .collect();
        StateReport { rows }
    }
}

impl Default for SwapEngine<RoomRegistry> {
    fn default() -> Self {
        Self::new(PassConfig::default())
    }
}
