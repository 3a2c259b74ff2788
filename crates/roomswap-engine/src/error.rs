//! Error types for the engine layer.

use roomswap_protocol::RoomId;

/// A walk could not be classified.
///
/// Fatal for the pass. Always raised before anything is mutated.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A walk ran longer than the graph can possibly allow. The request
    /// graph broke its one-edge-per-room shape.
    #[error("graph inconsistency: walk from {start} exceeded {limit} steps")]
    Inconsistent { start: RoomId, limit: usize },

    /// A walk reached the configured `max_walk_len` before closing or
    /// stopping. The graph may be sound; the cycle is just longer than
    /// the cap allows.
    #[error("walk from {start} reached the configured limit of {limit} rooms")]
    WalkLimitExceeded { start: RoomId, limit: usize },
}

/// A single write to an [`OccupancyStore`](crate::OccupancyStore) failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store has no entry for this room.
    #[error("room {0} is not registered")]
    UnknownRoom(RoomId),

    /// The backing store refused the write.
    #[error("write to room {room} failed: {reason}")]
    WriteFailed { room: RoomId, reason: String },
}

/// Staging or committing a rotation failed.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// A cycle room has no occupant to move. Raised while staging, before
    /// any write.
    #[error("cannot rotate room {0}: no occupant registered")]
    UnknownRoom(RoomId),

    /// A write failed and every write already applied was reverted.
    /// The store is exactly as it was before the commit.
    #[error("rotation rolled back: {source}")]
    RolledBack { source: StoreError },

    /// A write failed and reverting the applied writes failed too.
    /// The rooms in `stranded` hold post-rotation occupants.
    #[error("rotation partially applied, rooms left inconsistent: {stranded:?} ({source})")]
    Partial {
        stranded: Vec<RoomId>,
        source: StoreError,
    },
}

impl CommitError {
    /// Returns `true` if the store may now be inconsistent.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial { .. })
    }
}

/// Errors surfaced by [`SwapEngine`](crate::SwapEngine) operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A snapshot listed the same room twice.
    #[error("room {0} appears more than once in the snapshot")]
    DuplicateRoom(RoomId),

    /// The room already has a pending request and the policy is `Reject`.
    #[error("room {from} already has a pending request for {existing}")]
    DuplicateRequest { from: RoomId, existing: RoomId },

    /// The rooms given to `execute_cycle` are not a closed loop of requests.
    #[error("rooms {0:?} do not form a closed swap cycle")]
    NotACycle(Vec<RoomId>),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Commit(#[from] CommitError),
}

impl EngineError {
    /// Returns `true` for errors that leave the room state untrustworthy.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Commit(e) if e.is_partial())
    }
}
